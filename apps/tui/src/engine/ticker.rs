use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Identifies one schedule. Ticks carrying an older id are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackTick {
    pub id: TickId,
}

/// A cancelable recurring timer driving playback.
pub trait Ticker {
    /// Cancels any live schedule and starts a new one firing every `interval`.
    fn schedule(&mut self, interval: Duration) -> TickId;

    /// Cancels the live schedule, if any.
    fn cancel(&mut self);
}

/// Emits ticks from a spawned tokio task onto an unbounded channel.
#[derive(Debug)]
pub struct TokioTicker {
    sender: UnboundedSender<PlaybackTick>,
    handle: Option<JoinHandle<()>>,
    next_id: u64,
}

impl TokioTicker {
    pub const fn new(sender: UnboundedSender<PlaybackTick>) -> Self {
        Self {
            sender,
            handle: None,
            next_id: 0,
        }
    }

    pub fn channel() -> (Self, UnboundedReceiver<PlaybackTick>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self::new(sender), receiver)
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Ticker for TokioTicker {
    fn schedule(&mut self, interval: Duration) -> TickId {
        self.cancel();

        self.next_id += 1;
        let id = TickId(self.next_id);
        let sender = self.sender.clone();

        self.handle = Some(tokio::spawn(async move {
            let mut timer = tokio::time::interval_at(Instant::now() + interval, interval);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                timer.tick().await;
                if sender.send(PlaybackTick { id }).is_err() {
                    break;
                }
            }
        }));

        tracing::debug!(?interval, id = self.next_id, "playback timer scheduled");
        id
    }

    fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            tracing::debug!(id = self.next_id, "playback timer cancelled");
        }
    }
}

impl Drop for TokioTicker {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Records schedules without spawning anything; ticks are fired by hand.
#[derive(Debug, Default)]
pub struct ManualTicker {
    next_id: u64,
    live: Option<(TickId, Duration)>,
    pub schedules: Vec<Duration>,
    pub cancellations: usize,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn live_interval(&self) -> Option<Duration> {
        match self.live {
            Some((_, interval)) => Some(interval),
            None => None,
        }
    }

    /// The tick the live schedule would deliver next.
    pub fn fire(&self) -> Option<PlaybackTick> {
        self.live.map(|(id, _)| PlaybackTick { id })
    }
}

impl Ticker for ManualTicker {
    fn schedule(&mut self, interval: Duration) -> TickId {
        self.cancel();
        self.next_id += 1;
        let id = TickId(self.next_id);
        self.live = Some((id, interval));
        self.schedules.push(interval);
        id
    }

    fn cancel(&mut self) {
        if self.live.take().is_some() {
            self.cancellations += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn tokio_ticker_fires_after_each_interval() {
        let (mut ticker, mut receiver) = TokioTicker::channel();
        let id = ticker.schedule(Duration::from_millis(300));

        tokio::time::sleep(Duration::from_millis(299)).await;
        assert!(receiver.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(receiver.recv().await, Some(PlaybackTick { id }));

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(receiver.recv().await, Some(PlaybackTick { id }));
    }

    #[tokio::test(start_paused = true)]
    async fn rescheduling_replaces_the_previous_task() {
        let (mut ticker, mut receiver) = TokioTicker::channel();
        let first = ticker.schedule(Duration::from_millis(300));
        let second = ticker.schedule(Duration::from_millis(100));
        assert_ne!(first, second);

        tokio::time::sleep(Duration::from_millis(650)).await;
        let mut ids = Vec::new();
        while let Ok(tick) = receiver.try_recv() {
            ids.push(tick.id);
        }
        assert!(!ids.is_empty());
        assert!(ids.iter().all(|id| *id == second));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_delivery() {
        let (mut ticker, mut receiver) = TokioTicker::channel();
        ticker.schedule(Duration::from_millis(50));
        ticker.cancel();
        tokio::task::yield_now().await;
        assert!(!ticker.is_running());

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn manual_ticker_tracks_live_schedule() {
        let mut ticker = ManualTicker::new();
        assert!(ticker.fire().is_none());

        let id = ticker.schedule(Duration::from_millis(300));
        assert_eq!(ticker.fire(), Some(PlaybackTick { id }));
        assert_eq!(ticker.live_interval(), Some(Duration::from_millis(300)));

        ticker.schedule(Duration::from_millis(150));
        assert_eq!(ticker.cancellations, 1);

        ticker.cancel();
        ticker.cancel();
        assert_eq!(ticker.cancellations, 2);
        assert!(ticker.fire().is_none());
    }
}
