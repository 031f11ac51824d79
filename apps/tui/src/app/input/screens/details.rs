use crate::app::state::App;
use crossterm::event::KeyCode;

pub fn handle_details_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace => app.close_details(),
        KeyCode::Up => app.select_previous(),
        KeyCode::Down => app.select_next(),
        KeyCode::Char('q') => app.running = false,
        _ => {}
    }
}
