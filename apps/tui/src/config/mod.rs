pub mod config;

pub use config::{AppConfig, DEFAULT_LOG_FILE, DEFAULT_LOG_LEVEL};
