//! Temporal filter and playback engine.
//!
//! Owns the loaded dataset, the filter state (period or year cursor) and the
//! playback loop. Every mutator recomputes the visible subset before returning,
//! so callers can re-pull `visible_records` right after any change.

pub mod filter;
pub mod playback;
pub mod ticker;

pub use filter::{compute_visible, FilterMode, TemporalFilter, YearBounds};
pub use playback::{Advance, PlaybackParams, DEFAULT_CURSOR_YEAR, MAX_SPEED, MIN_SPEED};
pub use ticker::{ManualTicker, PlaybackTick, TickId, Ticker, TokioTicker};

use crate::domain::{Period, Record};
use playback::{clamp_speed, next_cursor, DEFAULT_SPEED, SPEED_STEP};

#[derive(Debug)]
pub struct TimelineEngine<T: Ticker = TokioTicker> {
    records: Vec<Record>,
    visible: Vec<usize>,
    active_period: Option<Period>,
    cursor_year: i32,
    bounds: Option<YearBounds>,
    is_playing: bool,
    speed: f64,
    ticker: T,
    live_tick: Option<TickId>,
}

impl<T: Ticker> TimelineEngine<T> {
    pub const fn new(ticker: T) -> Self {
        Self {
            records: Vec::new(),
            visible: Vec::new(),
            active_period: None,
            cursor_year: DEFAULT_CURSOR_YEAR,
            bounds: None,
            is_playing: false,
            speed: DEFAULT_SPEED,
            ticker,
            live_tick: None,
        }
    }

    /// Replaces the dataset and derives bounds from it.
    pub fn load_records(&mut self, records: Vec<Record>) {
        let bounds = YearBounds::from_records(&records);
        self.records = records;
        self.apply_bounds(bounds);
        tracing::info!(
            records = self.records.len(),
            bounds = ?self.bounds,
            "dataset loaded"
        );
    }

    /// Derives `[min, max]` from the defined years and moves the cursor to
    /// `max(min, 1950)`. Leaves bounds unset when no record has a year.
    pub fn set_dataset_bounds(&mut self, records: &[Record]) {
        self.apply_bounds(YearBounds::from_records(records));
    }

    fn apply_bounds(&mut self, bounds: Option<YearBounds>) {
        self.bounds = bounds;
        if let Some(bounds) = bounds {
            self.cursor_year = bounds.min.max(DEFAULT_CURSOR_YEAR);
        }

        if self.is_playing {
            if self.bounds.is_some() {
                self.reschedule();
            } else {
                self.stop_playback();
            }
        }
        self.refresh();
    }

    /// `Some` switches to period mode and stops playback; `None` returns to
    /// cursor mode at the last cursor year.
    pub fn select_period(&mut self, period: Option<Period>) {
        self.active_period = period;
        if period.is_some() && self.is_playing {
            self.stop_playback();
        }
        self.refresh();
    }

    /// Manual scrubbing. Bounds are the caller's concern.
    pub fn set_cursor_year(&mut self, year: i32) {
        self.cursor_year = year;
        self.refresh();
    }

    pub fn compute_visible<'a>(&self, records: &'a [Record]) -> Vec<&'a Record> {
        compute_visible(records, self.filter())
    }

    pub fn toggle_playback(&mut self) {
        if self.is_playing {
            self.stop_playback();
        } else {
            self.start_playback();
        }
    }

    pub fn increase_speed(&mut self) {
        self.set_speed(self.speed + SPEED_STEP);
    }

    pub fn decrease_speed(&mut self) {
        self.set_speed(self.speed - SPEED_STEP);
    }

    /// Clamps onto the 0.5 grid in `[0.5, 3.0]`. A running loop is replaced
    /// immediately with the new interval.
    pub fn set_speed(&mut self, multiplier: f64) {
        let speed = clamp_speed(multiplier);
        if (speed - self.speed).abs() < f64::EPSILON {
            return;
        }
        self.speed = speed;
        if self.is_playing {
            self.reschedule();
        }
    }

    /// Applies a timer tick. Ticks from a cancelled or replaced schedule are
    /// ignored and return `None`.
    pub fn on_tick(&mut self, tick: PlaybackTick) -> Option<Advance> {
        if self.live_tick != Some(tick.id) {
            tracing::trace!(?tick, "stale playback tick ignored");
            return None;
        }
        self.advance()
    }

    /// One step of the playback loop. Stops at the upper bound.
    pub fn advance(&mut self) -> Option<Advance> {
        if !self.is_playing {
            return None;
        }
        let Some(bounds) = self.bounds else {
            self.stop_playback();
            return None;
        };

        let params = PlaybackParams::new(bounds, self.speed);
        let step = next_cursor(self.cursor_year, bounds, params);
        self.cursor_year = step.year();
        if matches!(step, Advance::Finished(_)) {
            tracing::debug!(year = self.cursor_year, "playback reached upper bound");
            self.stop_playback();
        }
        self.refresh();
        Some(step)
    }

    pub fn filter(&self) -> TemporalFilter {
        self.active_period
            .map_or(TemporalFilter::UpTo(self.cursor_year), TemporalFilter::Period)
    }

    pub const fn mode(&self) -> FilterMode {
        if self.active_period.is_some() {
            FilterMode::Period
        } else {
            FilterMode::Cursor
        }
    }

    pub fn playback_params(&self) -> Option<PlaybackParams> {
        self.bounds
            .map(|bounds| PlaybackParams::new(bounds, self.speed))
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn visible_records(&self) -> impl Iterator<Item = &Record> + '_ {
        self.visible.iter().filter_map(|&index| self.records.get(index))
    }

    pub fn visible_record(&self, position: usize) -> Option<&Record> {
        self.visible
            .get(position)
            .and_then(|&index| self.records.get(index))
    }

    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    pub const fn current_year(&self) -> i32 {
        self.cursor_year
    }

    pub const fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub const fn speed_multiplier(&self) -> f64 {
        self.speed
    }

    pub const fn active_period(&self) -> Option<Period> {
        self.active_period
    }

    pub const fn bounds(&self) -> Option<YearBounds> {
        self.bounds
    }

    pub const fn ticker(&self) -> &T {
        &self.ticker
    }

    fn start_playback(&mut self) {
        if self.bounds.is_none() {
            tracing::debug!("playback requested without dated records");
            return;
        }
        self.is_playing = true;
        self.reschedule();
    }

    fn stop_playback(&mut self) {
        self.is_playing = false;
        self.ticker.cancel();
        self.live_tick = None;
    }

    fn reschedule(&mut self) {
        let Some(params) = self.playback_params() else {
            return;
        };
        self.live_tick = Some(self.ticker.schedule(params.tick_interval));
    }

    fn refresh(&mut self) {
        self.visible = filter::visible_indices(&self.records, self.filter());
    }
}
