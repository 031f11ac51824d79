use crate::error::{LoadError, LoadResult};
use futures::future::join_all;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

/// Progress of a batched load, reported once per finished batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoadProgress {
    pub loaded: usize,
    pub total: usize,
    pub percent: u8,
    pub complete: bool,
}

impl LoadProgress {
    pub fn new(loaded: usize, total: usize) -> Self {
        let loaded = loaded.min(total);
        let percent = if total == 0 {
            100
        } else {
            u8::try_from(loaded * 100 / total).unwrap_or(100)
        };
        Self {
            loaded,
            total,
            percent,
            complete: loaded == total,
        }
    }
}

pub fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Fetches or reads a single JSON document.
pub async fn fetch_location(client: &Client, location: &str) -> LoadResult<Value> {
    if is_remote(location) {
        fetch_json(client, location).await
    } else if location.to_ascii_lowercase().ends_with(".json") {
        read_json_file(Path::new(location)).await
    } else {
        Err(LoadError::UnsupportedSource(location.to_string()))
    }
}

pub async fn fetch_json(client: &Client, url: &str) -> LoadResult<Value> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(response.json().await?)
}

pub async fn read_json_file(path: &Path) -> LoadResult<Value> {
    let contents = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&contents)?)
}

/// Unwraps `{ "data": [...] }`, passes arrays through and wraps anything else.
pub fn flatten_response(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Object(mut object) => match object.remove("data") {
            Some(Value::Array(items)) => items,
            Some(other) => {
                object.insert("data".to_string(), other);
                vec![Value::Object(object)]
            }
            None => vec![Value::Object(object)],
        },
        Value::Null => Vec::new(),
        other => vec![other],
    }
}

/// Loads many documents, `batch_size` at a time. Failed documents are logged
/// and skipped; the rest are flattened into one list.
pub async fn fetch_batched<F>(
    client: &Client,
    locations: &[String],
    batch_size: usize,
    mut on_progress: F,
) -> Vec<Value>
where
    F: FnMut(LoadProgress),
{
    let total = locations.len();
    let mut results = Vec::new();
    let mut loaded = 0;

    for batch in locations.chunks(batch_size.max(1)) {
        let responses = join_all(batch.iter().map(|location| fetch_location(client, location))).await;

        for (location, response) in batch.iter().zip(responses) {
            match response {
                Ok(value) => results.extend(flatten_response(value)),
                Err(e) => tracing::warn!(%location, error = %e, "skipping failed source"),
            }
        }

        loaded += batch.len();
        let progress = LoadProgress::new(loaded, total);
        tracing::debug!(loaded, total, percent = progress.percent, "batch loaded");
        on_progress(progress);
    }

    results
}
