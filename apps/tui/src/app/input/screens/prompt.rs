use crate::app::input::helpers::is_year_char;
use crate::app::state::{App, InputState};
use crossterm::event::KeyCode;

pub fn handle_prompt_input(app: &mut App, key: KeyCode) {
    match app.input_state {
        InputState::JumpingToYear => handle_year_input(app, key),
        InputState::Searching => handle_search_input(app, key),
        InputState::Browsing => {}
    }
}

fn handle_year_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Char(c) if is_year_char(c, &app.current_input) => app.current_input.push(c),
        KeyCode::Backspace => {
            app.current_input.pop();
        }
        KeyCode::Enter => app.commit_jump(),
        KeyCode::Esc => app.cancel_input(),
        _ => {}
    }
}

fn handle_search_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Char(c) => {
            app.current_input.push(c);
            app.update_search();
        }
        KeyCode::Backspace => {
            app.current_input.pop();
            app.update_search();
        }
        KeyCode::Enter => {
            app.cancel_input();
            app.open_details();
        }
        KeyCode::Esc => app.cancel_input(),
        _ => {}
    }
}
