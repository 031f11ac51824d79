// Export our modules for use in binaries and tests
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod loader;

pub use domain::{Category, GeoPoint, Period, Record};
pub use engine::TimelineEngine;
pub use loader::{DataSource, LoadOutcome, Loader};
