use crate::error::ConfigError;
use crate::loader::{DataSource, DEFAULT_BATCH_SIZE};
use dotenv::dotenv;
use std::env;
use std::fs::{self, File, OpenOptions};
use std::path::PathBuf;

pub const DEFAULT_LOG_LEVEL: &str = "warn";
pub const DEFAULT_LOG_FILE: &str = "sighting-globe.log";

/// Runtime settings read from the environment (and `.env`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// `DATA_SOURCE`: comma separated `.json` paths or URLs.
    pub data_sources: Vec<String>,
    /// `BATCH_SIZE`: documents fetched concurrently when loading a list.
    pub batch_size: usize,
    /// `SIGHTING_LOG`: tracing filter directive.
    pub log_level: String,
    /// `SIGHTING_LOG_FILE`: where logs go while the TUI owns the terminal.
    pub log_file: PathBuf,
    /// `SAMPLE_SEED`: makes the fallback sample reproducible.
    pub sample_seed: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_sources: Vec::new(),
            batch_size: DEFAULT_BATCH_SIZE,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            sample_seed: None,
        }
    }
}

impl AppConfig {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let data_sources = var("DATA_SOURCE")
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|part| !part.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        let batch_size = match var("BATCH_SIZE") {
            Some(value) => match value.trim().parse::<usize>() {
                Ok(size) if size > 0 => size,
                _ => return Err(invalid("BATCH_SIZE", value)),
            },
            None => defaults.batch_size,
        };

        let sample_seed = match var("SAMPLE_SEED") {
            Some(value) => Some(
                value
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| invalid("SAMPLE_SEED", value))?,
            ),
            None => None,
        };

        Ok(Self {
            data_sources,
            batch_size,
            log_level: var("SIGHTING_LOG").unwrap_or(defaults.log_level),
            log_file: var("SIGHTING_LOG_FILE").map_or(defaults.log_file, PathBuf::from),
            sample_seed,
        })
    }

    pub fn data_source(&self) -> Option<DataSource> {
        DataSource::from_locations(self.data_sources.clone())
    }

    pub fn open_log_file(&self) -> Result<File, ConfigError> {
        if let Some(parent) = self.log_file.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_file)?)
    }
}

fn invalid(key: &'static str, value: String) -> ConfigError {
    ConfigError::InvalidValue { key, value }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(config(&[]).unwrap(), AppConfig::default());
        assert_eq!(AppConfig::default().data_source(), None);
    }

    #[test]
    fn reads_all_keys() {
        let config = config(&[
            ("DATA_SOURCE", "a.json, https://example.com/b.json"),
            ("BATCH_SIZE", "25"),
            ("SIGHTING_LOG", "debug"),
            ("SIGHTING_LOG_FILE", "/tmp/globe.log"),
            ("SAMPLE_SEED", "42"),
        ])
        .unwrap();

        assert_eq!(
            config.data_sources,
            vec!["a.json".to_string(), "https://example.com/b.json".to_string()]
        );
        assert_eq!(config.batch_size, 25);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_file, PathBuf::from("/tmp/globe.log"));
        assert_eq!(config.sample_seed, Some(42));
        assert!(matches!(config.data_source(), Some(DataSource::Many(_))));
    }

    #[test]
    fn rejects_bad_numbers() {
        assert!(matches!(
            config(&[("BATCH_SIZE", "0")]),
            Err(ConfigError::InvalidValue { key: "BATCH_SIZE", .. })
        ));
        assert!(matches!(
            config(&[("SAMPLE_SEED", "abc")]),
            Err(ConfigError::InvalidValue { key: "SAMPLE_SEED", .. })
        ));
    }

    #[test]
    fn log_file_is_created_with_parents() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            log_file: dir.path().join("logs").join("globe.log"),
            ..AppConfig::default()
        };
        config.open_log_file().unwrap();
        assert!(config.log_file.exists());
    }

    #[test]
    fn blank_values_are_ignored() {
        let config = config(&[("DATA_SOURCE", "  "), ("BATCH_SIZE", "")]).unwrap();
        assert!(config.data_sources.is_empty());
        assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
    }
}
