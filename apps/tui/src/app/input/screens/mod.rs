use crate::app::state::{App, AppScreen, InputState};
use crossterm::event::KeyCode;

mod details;
mod globe;
mod help;
mod prompt;

pub fn dispatch_input(app: &mut App, key: KeyCode) {
    if app.input_state != InputState::Browsing {
        prompt::handle_prompt_input(app, key);
        return;
    }

    if help::handle_help_toggle(app, key) {
        return;
    }

    match app.screen {
        AppScreen::Globe => globe::handle_globe_input(app, key),
        AppScreen::Details => details::handle_details_input(app, key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sighting_globe::domain::{Category, GeoPoint, Period, Record};
    use sighting_globe::engine::{TimelineEngine, TokioTicker};
    use sighting_globe::loader::LoadOutcome;

    fn app() -> App {
        let (ticker, _ticks) = TokioTicker::channel();
        let mut app = App::new(TimelineEngine::new(ticker));
        let records = [(-500, "Athens"), (1200, "Paris"), (1980, "Roswell")]
            .into_iter()
            .enumerate()
            .map(|(i, (year, place))| Record {
                id: i.to_string(),
                position: GeoPoint { lat: 1.0, lng: 1.0 },
                category: Category::Probable,
                year: Some(year),
                title: format!("Sighting {i}"),
                date: String::new(),
                location: place.to_string(),
                region: String::new(),
                country: String::new(),
                credibility: 6,
                description: String::new(),
            })
            .collect();
        app.apply_load(LoadOutcome {
            records,
            raw_count: 3,
            notice: Some("sample data".to_string()),
            from_sample: true,
        });
        app
    }

    fn press(app: &mut App, keys: &[KeyCode]) {
        for key in keys {
            dispatch_input(app, *key);
        }
    }

    #[tokio::test]
    async fn help_swallows_keys_until_closed() {
        let mut app = app();
        press(&mut app, &[KeyCode::Char('?'), KeyCode::Char('q')]);
        assert!(app.show_help);
        assert!(app.running);
        press(&mut app, &[KeyCode::Esc]);
        assert!(!app.show_help);
        press(&mut app, &[KeyCode::F(1), KeyCode::F(1)]);
        assert!(!app.show_help);
    }

    #[tokio::test]
    async fn escape_dismisses_notice_first() {
        let mut app = app();
        press(&mut app, &[KeyCode::Esc]);
        assert!(app.notice.is_none());
        assert!(app.running);
    }

    #[tokio::test]
    async fn period_keys_toggle_and_clear() {
        let mut app = app();
        press(&mut app, &[KeyCode::Char('2')]);
        assert_eq!(app.engine.active_period(), Some(Period::Medieval));
        press(&mut app, &[KeyCode::Char('0')]);
        assert_eq!(app.engine.active_period(), None);
        press(&mut app, &[KeyCode::Char('3'), KeyCode::Char('3')]);
        assert_eq!(app.engine.active_period(), None);
    }

    #[tokio::test]
    async fn arrows_and_page_keys_move_the_cursor() {
        let mut app = app();
        press(&mut app, &[KeyCode::Left, KeyCode::Left]);
        assert_eq!(app.engine.current_year(), 1948);
        press(&mut app, &[KeyCode::PageDown]);
        assert_eq!(app.engine.current_year(), 1848);
        press(&mut app, &[KeyCode::PageUp, KeyCode::PageUp]);
        assert_eq!(app.engine.current_year(), 1980);
        press(&mut app, &[KeyCode::Right]);
        assert_eq!(app.engine.current_year(), 1980);
    }

    #[tokio::test]
    async fn space_and_speed_keys_drive_playback() {
        let mut app = app();
        press(&mut app, &[KeyCode::Char(' ')]);
        assert!(app.engine.is_playing());
        press(&mut app, &[KeyCode::Char('+'), KeyCode::Char('+')]);
        assert!((app.engine.speed_multiplier() - 2.0).abs() < f64::EPSILON);
        press(&mut app, &[KeyCode::Char('1')]);
        assert!(!app.engine.is_playing());
    }

    #[tokio::test]
    async fn jump_prompt_accepts_typed_year() {
        let mut app = app();
        press(&mut app, &[KeyCode::Char('g')]);
        assert_eq!(app.input_state, InputState::JumpingToYear);
        press(
            &mut app,
            &[
                KeyCode::Char('1'),
                KeyCode::Char('x'),
                KeyCode::Char('3'),
                KeyCode::Char('0'),
                KeyCode::Char('0'),
                KeyCode::Enter,
            ],
        );
        assert_eq!(app.engine.current_year(), 1300);
        assert_eq!(app.input_state, InputState::Browsing);
    }

    #[tokio::test]
    async fn jump_prompt_takes_bce_year_without_clearing() {
        let mut app = app();
        press(
            &mut app,
            &[
                KeyCode::Char('g'),
                KeyCode::Char('-'),
                KeyCode::Char('4'),
                KeyCode::Char('0'),
                KeyCode::Char('0'),
                KeyCode::Enter,
            ],
        );
        assert_eq!(app.engine.current_year(), -400);
    }

    #[tokio::test]
    async fn escape_cancels_prompt_without_changes() {
        let mut app = app();
        press(&mut app, &[KeyCode::Char('g'), KeyCode::Backspace, KeyCode::Esc]);
        assert_eq!(app.engine.current_year(), 1950);
        assert_eq!(app.input_state, InputState::Browsing);
    }

    #[tokio::test]
    async fn enter_opens_and_escape_closes_details() {
        let mut app = app();
        press(&mut app, &[KeyCode::Down, KeyCode::Enter]);
        assert_eq!(app.screen, AppScreen::Details);
        assert_eq!(app.selected_record().map(|r| r.id.as_str()), Some("1"));
        press(&mut app, &[KeyCode::Esc]);
        assert_eq!(app.screen, AppScreen::Globe);
    }

    #[tokio::test]
    async fn search_prompt_selects_while_typing() {
        let mut app = app();
        press(
            &mut app,
            &[
                KeyCode::Char('/'),
                KeyCode::Char('p'),
                KeyCode::Char('a'),
                KeyCode::Char('r'),
            ],
        );
        assert_eq!(app.selected_index, 1);
        press(&mut app, &[KeyCode::Enter]);
        assert_eq!(app.input_state, InputState::Browsing);
    }

    #[tokio::test]
    async fn q_quits() {
        let mut app = app();
        press(&mut app, &[KeyCode::Char('q')]);
        assert!(!app.running);
    }
}
