mod app;
mod cli;
mod event;
mod terminal;
mod ui;

use app::{App, AppActions};
use clap::Parser;
use cli::CliArgs;
use color_eyre::Result;
use event::HeadlessOptions;
use sighting_globe::config::{AppConfig, DEFAULT_LOG_LEVEL};
use sighting_globe::engine::{TimelineEngine, TokioTicker};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Setup error handling
    color_eyre::install()?;

    let args = CliArgs::parse();
    args.apply_env_overrides();
    let config = AppConfig::from_env()?;

    let headless = args.headless || args.json || args.simulate || !is_terminal();
    init_tracing(&config, headless)?;

    let actions = AppActions::new(&config);

    if headless {
        let options = HeadlessOptions {
            json: args.json,
            year: args.year,
            period: args.period,
            speed: args.speed,
            simulate: args.simulate,
        };
        return event::run_headless(&actions, options).await;
    }

    let (ticker, ticks) = TokioTicker::channel();
    let mut engine = TimelineEngine::new(ticker);
    if let Some(speed) = args.speed {
        engine.set_speed(speed);
    }

    let mut app = App::new(engine);
    app.pending_year = args.year;
    app.pending_period = args.period;

    let mut terminal = terminal::setup()?;
    let result = event::run(&mut terminal, &mut app, &actions, ticks);
    terminal::cleanup(true, true);

    result
}

// Logs go to stderr in headless mode and to a file while the TUI owns the screen.
fn init_tracing(config: &AppConfig, headless: bool) -> Result<()> {
    let filter = log_filter(config);

    if headless {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        let file = config.open_log_file()?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    }

    Ok(())
}

// SIGHTING_LOG (via the config) decides the level; RUST_LOG is not consulted
fn log_filter(config: &AppConfig) -> EnvFilter {
    EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL))
}

// Check if we're running in a terminal
fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_level_wins_over_rust_log() {
        std::env::set_var("RUST_LOG", "error");
        let config = AppConfig {
            log_level: "debug".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(log_filter(&config).to_string(), "debug");
    }

    #[test]
    fn unparsable_level_falls_back_to_default() {
        let config = AppConfig {
            log_level: "sighting=[".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(log_filter(&config).to_string(), DEFAULT_LOG_LEVEL);
    }
}
