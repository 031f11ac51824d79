use thiserror::Error;

/// Failures while acquiring raw records. All of them are recoverable: the loader
/// substitutes sample data and surfaces the message as a notice.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported data source: {0}")]
    UnsupportedSource(String),

    #[error("No valid records in {0}")]
    Empty(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type LoadResult<T> = std::result::Result<T, LoadError>;
