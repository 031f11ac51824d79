use crate::app::input::helpers::period_for_digit;
use crate::app::state::{App, LARGE_YEAR_STEP};
use crossterm::event::KeyCode;

pub fn handle_globe_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Char(' ') => app.toggle_playback(),
        KeyCode::Char('+' | '=') => app.change_speed(true),
        KeyCode::Char('-' | '_') => app.change_speed(false),
        KeyCode::Left => app.step_year(-1),
        KeyCode::Right => app.step_year(1),
        KeyCode::PageDown => app.step_year(-LARGE_YEAR_STEP),
        KeyCode::PageUp => app.step_year(LARGE_YEAR_STEP),
        KeyCode::Char('0') => app.clear_period(),
        KeyCode::Char(c) if period_for_digit(c).is_some() => {
            if let Some(period) = period_for_digit(c) {
                app.toggle_period(period);
            }
        }
        KeyCode::Up => app.select_previous(),
        KeyCode::Down => app.select_next(),
        KeyCode::Enter => app.open_details(),
        KeyCode::Char('g') => app.begin_jump(),
        KeyCode::Char('/') => app.begin_search(),
        KeyCode::Char('r') => app.request_reload(),
        KeyCode::Char('a') => app.toggle_animation_pause(),
        KeyCode::Esc => {
            if !app.dismiss_notice() {
                app.status_message.clear();
            }
        }
        KeyCode::Char('q') => app.running = false,
        _ => {}
    }
}
