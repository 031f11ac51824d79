use crate::app::input::helpers::{wrap_decrement, wrap_increment};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use sighting_globe::domain::{format_year, Period, Record};
use sighting_globe::engine::{Advance, PlaybackTick, TimelineEngine};
use sighting_globe::loader::{LoadOutcome, LoadProgress};
use std::time::Instant;

/// Years moved by PgUp/PgDn.
pub const LARGE_YEAR_STEP: i32 = 100;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum AppScreen {
    Globe,
    Details,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum InputState {
    Browsing,
    JumpingToYear,
    Searching,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum DataOrigin {
    Pending,
    Source,
    Sample,
}

#[derive(Debug)]
pub struct App {
    pub running: bool,
    pub screen: AppScreen,
    pub input_state: InputState,
    pub current_input: String,
    pub engine: TimelineEngine,
    pub selected_index: usize,
    pub status_message: String,
    pub notice: Option<String>,
    pub show_help: bool,
    pub animation_counter: f64,
    pub animation_paused: bool,
    pub last_frame: Instant,
    pub load_progress: Option<LoadProgress>,
    pub data_origin: DataOrigin,
    pub raw_count: usize,
    pub reload_requested: bool,
    /// Cursor year and period requested on the command line, applied after the first load.
    pub pending_year: Option<i32>,
    pub pending_period: Option<Period>,
}

impl App {
    pub fn new(engine: TimelineEngine) -> Self {
        Self {
            running: true,
            screen: AppScreen::Globe,
            input_state: InputState::Browsing,
            current_input: String::new(),
            engine,
            selected_index: 0,
            status_message: String::new(),
            notice: None,
            show_help: false,
            animation_counter: 0.0,
            animation_paused: false,
            last_frame: Instant::now(),
            load_progress: None,
            data_origin: DataOrigin::Pending,
            raw_count: 0,
            reload_requested: false,
            pending_year: None,
            pending_period: None,
        }
    }

    pub fn update(&mut self) {
        let now = Instant::now();
        let delta = now.duration_since(self.last_frame);
        self.last_frame = now;

        if self.animation_paused {
            return;
        }

        // Cycles between 0 and 2*PI
        self.animation_counter += delta.as_secs_f64() * 2.0;
        if self.animation_counter > 2.0 * std::f64::consts::PI {
            self.animation_counter -= 2.0 * std::f64::consts::PI;
        }
    }

    pub fn toggle_animation_pause(&mut self) {
        self.animation_paused = !self.animation_paused;
    }

    pub fn apply_load(&mut self, outcome: LoadOutcome) {
        self.data_origin = if outcome.from_sample {
            DataOrigin::Sample
        } else {
            DataOrigin::Source
        };
        self.raw_count = outcome.raw_count;
        self.notice = outcome.notice;
        self.load_progress = None;

        let count = outcome.records.len();
        self.engine.load_records(outcome.records);
        let rejected_year = match self.pending_year.take() {
            Some(year) if !self.apply_start_year(year) => Some(year),
            _ => None,
        };
        if let Some(period) = self.pending_period.take() {
            self.engine.select_period(Some(period));
        }
        self.selected_index = 0;
        self.status_message = match (rejected_year, self.data_origin) {
            (Some(year), _) => format!(
                "Start year {} is outside the dated sightings",
                format_year(year)
            ),
            (None, DataOrigin::Sample) => format!("Loaded {count} sample sightings"),
            (None, _) => format!("Loaded {count} sightings"),
        };
    }

    /// Moves the cursor to a requested start year. Years outside the dataset
    /// bounds are refused and leave the cursor where loading put it.
    fn apply_start_year(&mut self, year: i32) -> bool {
        let in_bounds = self
            .engine
            .bounds()
            .is_some_and(|bounds| bounds.contains(year));
        if in_bounds {
            self.engine.set_cursor_year(year);
        } else {
            tracing::warn!(year, bounds = ?self.engine.bounds(), "ignoring start year outside bounds");
        }
        in_bounds
    }

    pub fn request_reload(&mut self) {
        if self.data_origin != DataOrigin::Pending {
            self.reload_requested = true;
            self.status_message = "Reloading data...".to_string();
        }
    }

    /// Number keys toggle a period; selecting the active one clears it.
    pub fn toggle_period(&mut self, period: Period) {
        if self.engine.active_period() == Some(period) {
            self.clear_period();
            return;
        }
        self.engine.select_period(Some(period));
        self.status_message = format!(
            "{} ({} to {})",
            period.label(),
            format_year(period.start()),
            format_year(period.end())
        );
        self.clamp_selection();
    }

    pub fn clear_period(&mut self) {
        if self.engine.active_period().is_none() {
            return;
        }
        self.engine.select_period(None);
        self.status_message = format!("Timeline at {}", format_year(self.engine.current_year()));
        self.clamp_selection();
    }

    /// Moves the cursor, leaving period mode and staying inside the dataset bounds.
    pub fn step_year(&mut self, delta: i32) {
        let Some(bounds) = self.engine.bounds() else {
            return;
        };
        if self.engine.active_period().is_some() {
            self.engine.select_period(None);
        }
        let year = self
            .engine
            .current_year()
            .saturating_add(delta)
            .clamp(bounds.min, bounds.max);
        self.engine.set_cursor_year(year);
        self.clamp_selection();
    }

    pub fn toggle_playback(&mut self) {
        if self.engine.bounds().is_none() {
            self.status_message = "No dated sightings to play".to_string();
            return;
        }
        self.engine.toggle_playback();
        self.status_message = if self.engine.is_playing() {
            format!("Playing at {}x", self.engine.speed_multiplier())
        } else {
            format!("Paused at {}", format_year(self.engine.current_year()))
        };
    }

    pub fn change_speed(&mut self, faster: bool) {
        if faster {
            self.engine.increase_speed();
        } else {
            self.engine.decrease_speed();
        }
        self.status_message = format!("Speed {}x", self.engine.speed_multiplier());
    }

    pub fn on_tick(&mut self, tick: PlaybackTick) {
        if let Some(Advance::Finished(year)) = self.engine.on_tick(tick) {
            self.status_message = format!("Playback finished at {}", format_year(year));
        }
        self.clamp_selection();
    }

    /// With no dated record there is nothing to filter on, so every record is listed.
    pub fn shows_all_records(&self) -> bool {
        self.engine.bounds().is_none() && self.engine.active_period().is_none()
    }

    pub fn listed_count(&self) -> usize {
        if self.shows_all_records() {
            self.engine.records().len()
        } else {
            self.engine.visible_count()
        }
    }

    pub fn listed_record(&self, position: usize) -> Option<&Record> {
        if self.shows_all_records() {
            self.engine.records().get(position)
        } else {
            self.engine.visible_record(position)
        }
    }

    pub fn listed_records(&self) -> Box<dyn Iterator<Item = &Record> + '_> {
        if self.shows_all_records() {
            Box::new(self.engine.records().iter())
        } else {
            Box::new(self.engine.visible_records())
        }
    }

    pub fn selected_record(&self) -> Option<&Record> {
        self.listed_record(self.selected_index)
    }

    pub fn select_next(&mut self) {
        self.selected_index = wrap_increment(self.selected_index, self.listed_count());
    }

    pub fn select_previous(&mut self) {
        self.selected_index = wrap_decrement(self.selected_index, self.listed_count());
    }

    pub fn clamp_selection(&mut self) {
        let count = self.listed_count();
        if self.selected_index >= count {
            self.selected_index = count.saturating_sub(1);
        }
    }

    pub fn open_details(&mut self) {
        if self.selected_record().is_some() {
            self.screen = AppScreen::Details;
        }
    }

    pub fn close_details(&mut self) {
        self.screen = AppScreen::Globe;
    }

    pub fn begin_jump(&mut self) {
        if self.engine.bounds().is_none() {
            return;
        }
        self.input_state = InputState::JumpingToYear;
        self.current_input.clear();
    }

    /// Applies the typed year when it parses and lies within the bounds.
    /// Anything else leaves the cursor untouched.
    pub fn commit_jump(&mut self) {
        let parsed = self.current_input.trim().parse::<i32>().ok();
        let accepted = parsed.filter(|year| {
            self.engine
                .bounds()
                .is_some_and(|bounds| bounds.contains(*year))
        });

        if let Some(year) = accepted {
            if self.engine.active_period().is_some() {
                self.engine.select_period(None);
            }
            self.engine.set_cursor_year(year);
            self.status_message = format!("Jumped to {}", format_year(year));
            self.clamp_selection();
        } else {
            tracing::debug!(input = %self.current_input, "ignoring invalid year");
        }
        self.cancel_input();
    }

    pub fn begin_search(&mut self) {
        self.input_state = InputState::Searching;
        self.current_input.clear();
    }

    /// Selects the visible record that best matches the query.
    pub fn update_search(&mut self) {
        if let Some(position) = best_match(&self.current_input, self.listed_records()) {
            self.selected_index = position;
        }
    }

    pub fn cancel_input(&mut self) {
        self.input_state = InputState::Browsing;
        self.current_input.clear();
    }

    pub fn dismiss_notice(&mut self) -> bool {
        self.notice.take().is_some()
    }
}

/// Position of the record whose title or place best fuzzy-matches `query`.
pub fn best_match<'a, I>(query: &str, records: I) -> Option<usize>
where
    I: IntoIterator<Item = &'a Record>,
{
    let query = query.trim();
    if query.is_empty() {
        return None;
    }
    let matcher = SkimMatcherV2::default();
    records
        .into_iter()
        .enumerate()
        .filter_map(|(position, record)| {
            let haystack = format!("{} {}", record.title, record.place_line());
            matcher
                .fuzzy_match(&haystack, query)
                .map(|score| (score, position))
        })
        .max_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)))
        .map(|(_, position)| position)
}
