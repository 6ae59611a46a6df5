//! Where the sales dataset comes from: an HTTP(S) URL or a local file.

use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use reqwest::blocking::Client;
use tracing::info;

use crate::error::AppError;

/// Public copy of the historical automobile sales dataset.
pub const DEFAULT_DATA_URL: &str = "https://cf-courses-data.s3.us.cloud-object-storage.appdomain.cloud/IBMDeveloperSkillsNetwork-DV0101EN-SkillsNetwork/Data%20Files/historical_automobile_sales.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Url(String),
    File(PathBuf),
}

impl DataSource {
    /// `http://` and `https://` strings are URLs; anything else is a path.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let lower = raw.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            DataSource::Url(raw.to_string())
        } else {
            DataSource::File(PathBuf::from(raw))
        }
    }

    /// Read the raw CSV bytes. No retries: a failure here is fatal for the caller.
    pub fn fetch_bytes(&self) -> Result<Vec<u8>, AppError> {
        let started = Instant::now();
        let bytes = match self {
            DataSource::Url(url) => fetch_url(url)?,
            DataSource::File(path) => fs::read(path)
                .map_err(|e| AppError::source(format!("Failed to read CSV '{}': {e}", path.display())))?,
        };
        info!(
            source = %self,
            bytes = bytes.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "dataset fetched"
        );
        Ok(bytes)
    }
}

impl Default for DataSource {
    fn default() -> Self {
        DataSource::Url(DEFAULT_DATA_URL.to_string())
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Url(url) => write!(f, "{url}"),
            DataSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

fn fetch_url(url: &str) -> Result<Vec<u8>, AppError> {
    let resp = Client::new()
        .get(url)
        .send()
        .map_err(|e| AppError::source(format!("Dataset request failed: {e}")))?;

    if !resp.status().is_success() {
        return Err(AppError::source(format!(
            "Dataset request failed with status {}.",
            resp.status()
        )));
    }

    let body = resp
        .bytes()
        .map_err(|e| AppError::source(format!("Failed to read dataset response: {e}")))?;
    Ok(body.to_vec())
}
