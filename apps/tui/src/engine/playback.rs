use super::filter::YearBounds;
use std::time::Duration;

pub const MIN_SPEED: f64 = 0.5;
pub const MAX_SPEED: f64 = 3.0;
pub const SPEED_STEP: f64 = 0.5;
pub const DEFAULT_SPEED: f64 = 1.0;

/// Cursor position after a dataset loads, unless the data starts later.
pub const DEFAULT_CURSOR_YEAR: i32 = 1950;

const BASE_TICK_MILLIS: f64 = 300.0;
const MIN_TICK_MILLIS: u64 = 50;
const EARLY_ERA_END: i32 = 1800;
const MODERN_ERA_END: i32 = 1950;

/// Snaps a multiplier onto the 0.5 grid inside `[MIN_SPEED, MAX_SPEED]`.
pub fn clamp_speed(multiplier: f64) -> f64 {
    if !multiplier.is_finite() {
        return DEFAULT_SPEED;
    }
    ((multiplier / SPEED_STEP).round() * SPEED_STEP).clamp(MIN_SPEED, MAX_SPEED)
}

/// Coarse steps for datasets spanning millennia, fine steps for recent history.
pub const fn base_increment(total_span: i64) -> i32 {
    if total_span > 4000 {
        20
    } else if total_span > 2000 {
        10
    } else if total_span > 1000 {
        5
    } else {
        2
    }
}

/// Step size for the cursor's current era; shrinks towards the present.
pub const fn era_step(cursor_year: i32, year_increment: i32) -> i32 {
    let step = if cursor_year < EARLY_ERA_END {
        year_increment
    } else if cursor_year < MODERN_ERA_END {
        year_increment / 2
    } else {
        year_increment / 3
    };
    if step < 1 {
        1
    } else {
        step
    }
}

/// Timer parameters derived from the dataset span and the speed multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackParams {
    pub year_increment: i32,
    pub tick_interval: Duration,
}

impl PlaybackParams {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn new(bounds: YearBounds, speed: f64) -> Self {
        let speed = clamp_speed(speed);
        let base = f64::from(base_increment(bounds.span()));
        let year_increment = ((base * speed).round() as i32).max(1);
        let millis = ((BASE_TICK_MILLIS / speed).round() as u64).max(MIN_TICK_MILLIS);

        Self {
            year_increment,
            tick_interval: Duration::from_millis(millis),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Moved(i32),
    /// The cursor reached the upper bound; playback must stop.
    Finished(i32),
}

impl Advance {
    pub const fn year(self) -> i32 {
        match self {
            Self::Moved(year) | Self::Finished(year) => year,
        }
    }
}

pub const fn next_cursor(cursor_year: i32, bounds: YearBounds, params: PlaybackParams) -> Advance {
    let next = cursor_year.saturating_add(era_step(cursor_year, params.year_increment));
    if next >= bounds.max {
        Advance::Finished(bounds.max)
    } else {
        Advance::Moved(next)
    }
}
