//! Data acquisition: fetches raw JSON, normalizes it into records and falls
//! back to generated sample data when nothing usable arrives.

pub mod fetch;
pub mod normalize;
pub mod sample;

pub use fetch::LoadProgress;
pub use normalize::{extract_year, normalize};
pub use sample::generate_sample;

use crate::domain::Record;
use crate::error::{LoadError, LoadResult};
use reqwest::Client;
use serde_json::Value;
use std::fmt;
use tokio::sync::mpsc::UnboundedSender;

pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Where records come from.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    /// A local `.json` path or an http(s) URL.
    Location(String),
    Many(Vec<String>),
    Parsed(Vec<Value>),
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Location(location) => write!(f, "{location}"),
            Self::Many(locations) => write!(f, "{} sources", locations.len()),
            Self::Parsed(values) => write!(f, "{} parsed entries", values.len()),
        }
    }
}

impl DataSource {
    /// One location stays a single source; several become a batched list.
    pub fn from_locations(mut locations: Vec<String>) -> Option<Self> {
        match locations.len() {
            0 => None,
            1 => locations.pop().map(Self::Location),
            _ => Some(Self::Many(locations)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub records: Vec<Record>,
    /// Entries received before normalization.
    pub raw_count: usize,
    /// Set when sample data replaced the requested source.
    pub notice: Option<String>,
    pub from_sample: bool,
}

pub struct Loader {
    client: Client,
    batch_size: usize,
    sample_seed: Option<u64>,
    progress: Option<UnboundedSender<LoadProgress>>,
}

impl Default for Loader {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}

impl Loader {
    pub fn new(batch_size: usize) -> Self {
        Self {
            client: Client::new(),
            batch_size: batch_size.max(1),
            sample_seed: None,
            progress: None,
        }
    }

    #[must_use]
    pub const fn with_sample_seed(mut self, seed: Option<u64>) -> Self {
        self.sample_seed = seed;
        self
    }

    #[must_use]
    pub fn with_progress(mut self, sender: UnboundedSender<LoadProgress>) -> Self {
        self.progress = Some(sender);
        self
    }

    fn report(&self, progress: LoadProgress) {
        if let Some(sender) = &self.progress {
            // The receiver going away only means nobody is watching.
            let _ = sender.send(progress);
        }
    }

    /// Acquires raw entries without normalizing them.
    pub async fn load_raw(&self, source: &DataSource) -> LoadResult<Vec<Value>> {
        let values = match source {
            DataSource::Parsed(values) => values.clone(),
            DataSource::Location(location) => {
                let value = fetch::fetch_location(&self.client, location).await?;
                fetch::flatten_response(value)
            }
            DataSource::Many(locations) => {
                fetch::fetch_batched(&self.client, locations, self.batch_size, |progress| {
                    self.report(progress);
                })
                .await
            }
        };
        self.report(LoadProgress::new(1, 1));
        Ok(values)
    }

    /// Loads and normalizes; zero valid records is an error.
    pub async fn load(&self, source: &DataSource) -> LoadResult<(Vec<Record>, usize)> {
        let values = self.load_raw(source).await?;
        let records = normalize(&values);
        tracing::info!(%source, raw = values.len(), valid = records.len(), "data loaded");
        if records.is_empty() {
            return Err(LoadError::Empty(source.to_string()));
        }
        Ok((records, values.len()))
    }

    /// Never yields an empty dataset: failures substitute sample data.
    pub async fn load_or_sample(&self, source: Option<&DataSource>) -> LoadOutcome {
        let Some(source) = source else {
            tracing::info!("no data source configured, using sample data");
            return self.sample_outcome(None);
        };

        match self.load(source).await {
            Ok((records, raw_count)) => LoadOutcome {
                records,
                raw_count,
                notice: None,
                from_sample: false,
            },
            Err(e) => {
                tracing::warn!(%source, error = %e, "load failed, falling back to sample data");
                self.sample_outcome(Some(format!("{e}. Showing sample data instead.")))
            }
        }
    }

    fn sample_outcome(&self, notice: Option<String>) -> LoadOutcome {
        let records = generate_sample(self.sample_seed);
        self.report(LoadProgress::new(1, 1));
        LoadOutcome {
            raw_count: records.len(),
            records,
            notice,
            from_sample: true,
        }
    }
}
