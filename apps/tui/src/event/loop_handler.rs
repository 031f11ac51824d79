use color_eyre::eyre::eyre;
use color_eyre::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use serde::Serialize;
use sighting_globe::domain::{format_year, Category, Period, Record};
use sighting_globe::engine::{
    FilterMode, ManualTicker, PlaybackTick, Ticker, TimelineEngine, YearBounds,
};
use sighting_globe::loader::{LoadOutcome, LoadProgress};
use std::convert::TryFrom;
use std::fmt;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::app::actions::{count_by_category, count_by_period};
use crate::app::{handle_input, App, AppActions, LoadMessage};
use crate::terminal::setup::Tui;
use crate::ui;

// States of the background data load
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum LoadState {
    Idle,
    Loading,
    Loaded,
    Fallback,
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Loading => write!(f, "Loading"),
            Self::Loaded => write!(f, "Loaded"),
            Self::Fallback => write!(f, "Fallback"),
        }
    }
}

#[derive(Debug)]
enum LoadEvent {
    Start,
    Progress(LoadProgress),
    Finished(LoadOutcome),
}

impl fmt::Display for LoadEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "Start"),
            Self::Progress(progress) => write!(f, "Progress({}%)", progress.percent),
            Self::Finished(outcome) => write!(f, "Finished({} records)", outcome.records.len()),
        }
    }
}

impl From<LoadMessage> for LoadEvent {
    fn from(message: LoadMessage) -> Self {
        match message {
            LoadMessage::Progress(progress) => Self::Progress(progress),
            LoadMessage::Finished(outcome) => Self::Finished(outcome),
        }
    }
}

#[derive(Debug)]
struct StateTransitionError {
    from: LoadState,
    event: String,
}

impl fmt::Display for StateTransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid transition from {} with event {}",
            self.from, self.event
        )
    }
}

impl std::error::Error for StateTransitionError {}

struct LoadMachine {
    state: LoadState,
}

impl LoadMachine {
    const fn new(initial_state: LoadState) -> Self {
        Self {
            state: initial_state,
        }
    }

    const fn state(&self) -> LoadState {
        self.state
    }

    const fn is_loading(&self) -> bool {
        matches!(self.state, LoadState::Loading)
    }

    fn process_event(
        &mut self,
        event: LoadEvent,
        app: &mut App,
    ) -> std::result::Result<(), StateTransitionError> {
        let next_state = NextState::try_from((self.state, event, app))?;
        self.state = next_state.0;
        Ok(())
    }
}

struct NextState(LoadState);

impl NextState {
    const fn new(state: LoadState) -> Self {
        Self(state)
    }
}

impl LoadState {
    const fn next_state(self) -> NextState {
        NextState::new(self)
    }
}

impl TryFrom<(LoadState, LoadEvent, &mut App)> for NextState {
    type Error = StateTransitionError;

    fn try_from(
        value: (LoadState, LoadEvent, &mut App),
    ) -> std::result::Result<Self, Self::Error> {
        let (current_state, event, app) = value;

        match (current_state, event) {
            (LoadState::Idle | LoadState::Loaded | LoadState::Fallback, LoadEvent::Start) => {
                app.load_progress = Some(LoadProgress::new(0, 1));
                app.status_message = "Loading data...".to_string();
                Ok(LoadState::Loading.next_state())
            }
            (LoadState::Loading, LoadEvent::Progress(progress)) => {
                app.load_progress = Some(progress);
                Ok(LoadState::Loading.next_state())
            }
            (LoadState::Loading, LoadEvent::Finished(outcome)) => {
                let state = if outcome.from_sample {
                    LoadState::Fallback
                } else {
                    LoadState::Loaded
                };
                app.apply_load(outcome);
                Ok(state.next_state())
            }
            (from, event) => Err(StateTransitionError {
                from,
                event: event.to_string(),
            }),
        }
    }
}

fn start_load(
    machine: &mut LoadMachine,
    app: &mut App,
    actions: &AppActions,
) -> Option<UnboundedReceiver<LoadMessage>> {
    if let Err(e) = machine.process_event(LoadEvent::Start, app) {
        tracing::warn!(error = %e, "load not started");
        return None;
    }
    let (_handle, receiver) = actions.spawn_load();
    Some(receiver)
}

/// Applies pending load messages. Returns `false` once the channel is done.
fn drain_load(
    machine: &mut LoadMachine,
    app: &mut App,
    receiver: &mut UnboundedReceiver<LoadMessage>,
) -> bool {
    while let Ok(message) = receiver.try_recv() {
        if let Err(e) = machine.process_event(message.into(), app) {
            tracing::warn!(error = %e, "ignoring load message");
        }
    }
    machine.is_loading()
}

/// Run the main application event loop
pub fn run(
    terminal: &mut Tui,
    app: &mut App,
    actions: &AppActions,
    mut ticks: UnboundedReceiver<PlaybackTick>,
) -> Result<()> {
    // Configure event poll timeout (ms)
    const EVENT_POLL_TIMEOUT: u64 = 50;

    let mut load_machine = LoadMachine::new(LoadState::Idle);
    let mut load = start_load(&mut load_machine, app, actions);

    loop {
        app.update();

        if let Err(e) = terminal.draw(|f| ui::ui(app, f)) {
            return Err(eyre!("Terminal draw error: {e}"));
        }

        if matches!(
            event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT)),
            Ok(true)
        ) {
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    if key.modifiers.contains(KeyModifiers::CONTROL)
                        && key.code == KeyCode::Char('c')
                    {
                        app.running = false;
                    } else {
                        handle_input(app, key.code);
                    }
                    if !app.running {
                        break;
                    }
                }
                Ok(Event::Resize(_, _)) => {
                    if terminal.draw(|f| ui::ui(app, f)).is_err() {
                        // Non-fatal redraw error
                    }
                }
                Ok(_) | Err(_) => {}
            }
        }

        while let Ok(tick) = ticks.try_recv() {
            app.on_tick(tick);
        }

        if let Some(receiver) = load.as_mut() {
            if !drain_load(&mut load_machine, app, receiver) {
                tracing::debug!(state = %load_machine.state(), "load finished");
                load = None;
            }
        }

        if app.reload_requested && load.is_none() {
            app.reload_requested = false;
            load = start_load(&mut load_machine, app, actions);
        }
    }

    Ok(())
}

/// Flags that shape a headless run.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessOptions {
    pub json: bool,
    pub year: Option<i32>,
    pub period: Option<Period>,
    pub speed: Option<f64>,
    pub simulate: bool,
}

/// Run the application in headless mode (no UI)
pub async fn run_headless(actions: &AppActions, options: HeadlessOptions) -> Result<()> {
    let outcome = actions.load().await;
    if let Some(notice) = &outcome.notice {
        tracing::warn!(%notice, "using sample data");
    }

    let mut engine = TimelineEngine::new(ManualTicker::new());
    engine.load_records(outcome.records.clone());
    configure_engine(&mut engine, options);

    let frames = if options.simulate {
        simulate_playback(&mut engine)
    } else {
        Vec::new()
    };

    let stats = build_headless_stats(&engine, &outcome, frames);
    if options.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        render_headless_stats(&stats);
    }

    Ok(())
}

fn configure_engine<T: Ticker>(engine: &mut TimelineEngine<T>, options: HeadlessOptions) {
    if let Some(speed) = options.speed {
        engine.set_speed(speed);
    }
    if let Some(year) = options.year {
        if engine.bounds().is_some_and(|bounds| bounds.contains(year)) {
            engine.set_cursor_year(year);
        } else {
            tracing::warn!(year, bounds = ?engine.bounds(), "ignoring start year outside bounds");
        }
    }
    if options.period.is_some() {
        engine.select_period(options.period);
    }
}

/// Plays from the current cursor to the upper bound, one frame per tick.
fn simulate_playback(engine: &mut TimelineEngine<ManualTicker>) -> Vec<HeadlessFrame> {
    engine.toggle_playback();

    let mut frames = Vec::new();
    while let Some(tick) = engine.ticker().fire() {
        let Some(step) = engine.on_tick(tick) else {
            break;
        };
        frames.push(HeadlessFrame {
            year: step.year(),
            label: format_year(step.year()),
            visible: engine.visible_count(),
        });
    }
    frames
}

fn render_headless_stats(stats: &HeadlessStats) {
    println!("\nSighting Globe Stats");
    println!("====================");
    if let Some(notice) = &stats.notice {
        println!("Notice: {notice}");
    }
    println!("Data: {}", stats.origin);
    println!("Raw entries: {}", stats.raw_entries);
    println!("Records: {}", stats.total_records);
    println!("Dated records: {}", stats.dated_records);

    if let Some(bounds) = stats.bounds {
        println!(
            "Bounds: {} to {}",
            format_year(bounds.min),
            format_year(bounds.max)
        );
    }

    match stats.active_period {
        Some(period) => println!(
            "Visible in {}: {}",
            period.label(),
            stats.visible_records
        ),
        None => println!(
            "Visible by {}: {}",
            format_year(stats.cursor_year),
            stats.visible_records
        ),
    }

    println!("\nRecords by Category:");
    for (category, count) in &stats.by_category {
        println!("- {category}: {count}");
    }

    println!("\nVisible by Category:");
    for (category, count) in &stats.visible_by_category {
        println!("- {category}: {count}");
    }

    println!("\nRecords by Period:");
    for (period, count) in &stats.by_period {
        println!("- {period}: {count}");
    }

    if let Some(playback) = &stats.playback {
        println!(
            "\nPlayback at {}x: +{} years every {} ms",
            playback.speed, playback.year_increment, playback.tick_interval_ms
        );
    }

    if !stats.frames.is_empty() {
        println!("\nPlayback frames:");
        for frame in &stats.frames {
            println!("- {} | {} visible", frame.label, frame.visible);
        }
    }
}

fn build_headless_stats<T: Ticker>(
    engine: &TimelineEngine<T>,
    outcome: &LoadOutcome,
    frames: Vec<HeadlessFrame>,
) -> HeadlessStats {
    let records = engine.records();
    let by_category = labelled(count_by_category(records), Category::as_str);
    let visible_by_category = labelled(count_by_category(engine.visible_records()), Category::as_str);
    let by_period = labelled(count_by_period(records), Period::as_str);

    let playback = engine.playback_params().map(|params| HeadlessPlayback {
        speed: engine.speed_multiplier(),
        year_increment: params.year_increment,
        tick_interval_ms: u64::try_from(params.tick_interval.as_millis()).unwrap_or(u64::MAX),
    });

    HeadlessStats {
        origin: if outcome.from_sample { "sample" } else { "source" },
        notice: outcome.notice.clone(),
        raw_entries: outcome.raw_count,
        total_records: records.len(),
        dated_records: records.iter().filter(|r| r.year.is_some()).count(),
        bounds: engine.bounds(),
        mode: engine.mode(),
        cursor_year: engine.current_year(),
        active_period: engine.active_period(),
        visible_records: engine.visible_count(),
        by_category,
        visible_by_category,
        by_period,
        playback,
        frames,
        sample: engine.visible_records().take(5).map(HeadlessRecord::from).collect(),
    }
}

fn labelled<K>(counts: Vec<(K, usize)>, label: fn(K) -> &'static str) -> Vec<(String, usize)> {
    counts
        .into_iter()
        .map(|(key, count)| (label(key).to_string(), count))
        .collect()
}

#[derive(Debug, Serialize)]
struct HeadlessStats {
    origin: &'static str,
    notice: Option<String>,
    raw_entries: usize,
    total_records: usize,
    dated_records: usize,
    bounds: Option<YearBounds>,
    mode: FilterMode,
    cursor_year: i32,
    active_period: Option<Period>,
    visible_records: usize,
    by_category: Vec<(String, usize)>,
    visible_by_category: Vec<(String, usize)>,
    by_period: Vec<(String, usize)>,
    playback: Option<HeadlessPlayback>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    frames: Vec<HeadlessFrame>,
    sample: Vec<HeadlessRecord>,
}

#[derive(Debug, Serialize)]
struct HeadlessPlayback {
    speed: f64,
    year_increment: i32,
    tick_interval_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct HeadlessFrame {
    year: i32,
    label: String,
    visible: usize,
}

#[derive(Debug, Serialize)]
struct HeadlessRecord {
    id: String,
    title: String,
    year: Option<i32>,
    category: String,
    place: String,
}

impl From<&Record> for HeadlessRecord {
    fn from(record: &Record) -> Self {
        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            year: record.year,
            category: record.category.as_str().to_string(),
            place: record.place_line(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sighting_globe::domain::GeoPoint;
    use sighting_globe::engine::TokioTicker;

    fn record(id: &str, year: Option<i32>) -> Record {
        Record {
            id: id.to_string(),
            position: GeoPoint { lat: 0.0, lng: 0.0 },
            category: Category::Confirmed,
            year,
            title: id.to_string(),
            date: String::new(),
            location: String::new(),
            region: String::new(),
            country: String::new(),
            credibility: 9,
            description: String::new(),
        }
    }

    fn outcome(records: Vec<Record>, from_sample: bool) -> LoadOutcome {
        LoadOutcome {
            raw_count: records.len(),
            records,
            notice: from_sample.then(|| "fallback".to_string()),
            from_sample,
        }
    }

    fn app() -> App {
        let (ticker, _ticks) = TokioTicker::channel();
        App::new(TimelineEngine::new(ticker))
    }

    #[tokio::test]
    async fn load_machine_walks_through_a_load() {
        let mut app = app();
        let mut machine = LoadMachine::new(LoadState::Idle);

        machine.process_event(LoadEvent::Start, &mut app).unwrap();
        assert_eq!(machine.state(), LoadState::Loading);
        assert_eq!(app.load_progress.map(|p| p.percent), Some(0));

        machine
            .process_event(LoadEvent::Progress(LoadProgress::new(1, 2)), &mut app)
            .unwrap();
        assert_eq!(app.load_progress.map(|p| p.percent), Some(50));

        let records = vec![record("a", Some(1990))];
        machine
            .process_event(LoadEvent::Finished(outcome(records, false)), &mut app)
            .unwrap();
        assert_eq!(machine.state(), LoadState::Loaded);
        assert!(app.load_progress.is_none());
        assert_eq!(app.engine.records().len(), 1);
    }

    #[tokio::test]
    async fn sample_outcome_ends_in_fallback_and_can_reload() {
        let mut app = app();
        let mut machine = LoadMachine::new(LoadState::Loading);
        machine
            .process_event(
                LoadEvent::Finished(outcome(vec![record("s", Some(100))], true)),
                &mut app,
            )
            .unwrap();
        assert_eq!(machine.state(), LoadState::Fallback);
        assert_eq!(app.notice.as_deref(), Some("fallback"));

        machine.process_event(LoadEvent::Start, &mut app).unwrap();
        assert!(machine.is_loading());
    }

    #[tokio::test]
    async fn invalid_transitions_are_rejected() {
        let mut app = app();
        let mut machine = LoadMachine::new(LoadState::Idle);
        let result = machine.process_event(LoadEvent::Progress(LoadProgress::new(1, 1)), &mut app);
        assert!(result.is_err());
        assert_eq!(machine.state(), LoadState::Idle);

        let mut loading = LoadMachine::new(LoadState::Loading);
        assert!(loading.process_event(LoadEvent::Start, &mut app).is_err());
    }

    #[test]
    fn simulation_plays_to_the_upper_bound() {
        let mut engine = TimelineEngine::new(ManualTicker::new());
        engine.load_records(vec![record("a", Some(1900)), record("b", Some(1905))]);
        configure_engine(
            &mut engine,
            HeadlessOptions {
                year: Some(1900),
                ..HeadlessOptions::default()
            },
        );

        let frames = simulate_playback(&mut engine);
        let years: Vec<i32> = frames.iter().map(|f| f.year).collect();
        assert_eq!(years, vec![1901, 1902, 1903, 1904, 1905]);
        assert_eq!(frames.last().map(|f| f.visible), Some(2));
        assert!(!engine.is_playing());
    }

    #[test]
    fn start_year_outside_bounds_is_ignored() {
        let mut engine = TimelineEngine::new(ManualTicker::new());
        engine.load_records(vec![record("a", Some(1990))]);
        for year in [99_999, i32::MIN, i32::MAX] {
            configure_engine(
                &mut engine,
                HeadlessOptions {
                    year: Some(year),
                    ..HeadlessOptions::default()
                },
            );
            assert_eq!(engine.current_year(), 1990);
        }
    }

    #[test]
    fn simulation_without_bounds_yields_nothing() {
        let mut engine = TimelineEngine::new(ManualTicker::new());
        engine.load_records(vec![record("a", None)]);
        assert!(simulate_playback(&mut engine).is_empty());
    }

    #[test]
    fn stats_reflect_filters() {
        let records = vec![
            record("a", Some(-500)),
            record("b", Some(1200)),
            record("c", Some(1980)),
            record("d", None),
        ];
        let mut engine = TimelineEngine::new(ManualTicker::new());
        engine.load_records(records.clone());
        configure_engine(
            &mut engine,
            HeadlessOptions {
                period: Some(Period::Ancient),
                ..HeadlessOptions::default()
            },
        );

        let stats = build_headless_stats(&engine, &outcome(records, false), Vec::new());
        assert_eq!(stats.total_records, 4);
        assert_eq!(stats.dated_records, 3);
        assert_eq!(stats.visible_records, 1);
        assert_eq!(stats.mode, FilterMode::Period);
        assert_eq!(stats.bounds, Some(YearBounds { min: -500, max: 1980 }));
        assert_eq!(stats.by_period[0], ("ancient".to_string(), 1));
        assert_eq!(stats.visible_by_category[0], ("confirmed".to_string(), 1));

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["mode"], "period");
        assert_eq!(json["active_period"], "ancient");
        assert!(json.get("frames").is_none());
    }
}
