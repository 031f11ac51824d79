// Rendering for the globe and the sighting details modal

pub mod screens;
pub mod widgets;

use crate::app::state::AppScreen;
use crate::app::App;
use ratatui::Frame;

pub fn ui(app: &App, f: &mut Frame<'_>) {
    match app.screen {
        AppScreen::Globe => screens::globe::render_globe(app, f),
        AppScreen::Details => screens::details::render_details(app, f),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::InputState;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use sighting_globe::engine::{TimelineEngine, TokioTicker};
    use sighting_globe::loader::{generate_sample, LoadOutcome};

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn loaded_app() -> App {
        let (ticker, _ticks) = TokioTicker::channel();
        let mut app = App::new(TimelineEngine::new(ticker));
        app.apply_load(LoadOutcome {
            records: generate_sample(Some(3)),
            raw_count: 499,
            notice: None,
            from_sample: true,
        });
        app
    }

    #[tokio::test]
    async fn globe_renders_panels() {
        let app = loaded_app();
        let mut terminal = Terminal::new(TestBackend::new(140, 48)).unwrap();
        terminal.draw(|f| ui(&app, f)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("sample data"));
        assert!(text.contains("Analytics"));
        assert!(text.contains("Timeline"));
    }

    #[tokio::test]
    async fn details_and_prompt_render_over_globe() {
        let mut app = loaded_app();
        app.open_details();
        let mut terminal = Terminal::new(TestBackend::new(140, 48)).unwrap();
        terminal.draw(|f| ui(&app, f)).unwrap();
        assert!(buffer_text(&terminal).contains("Credibility"));

        app.close_details();
        app.begin_search();
        assert_eq!(app.input_state, InputState::Searching);
        terminal.draw(|f| ui(&app, f)).unwrap();
        assert!(buffer_text(&terminal).contains("Search sightings"));
    }

    #[tokio::test]
    async fn tiny_terminal_does_not_panic() {
        let app = loaded_app();
        let mut terminal = Terminal::new(TestBackend::new(20, 8)).unwrap();
        terminal.draw(|f| ui(&app, f)).unwrap();
    }
}
