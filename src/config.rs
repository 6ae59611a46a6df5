//! Runtime configuration resolved from CLI flags and the environment.
//!
//! Precedence: CLI flag, then environment (an optional `.env` file is loaded
//! first via `dotenvy`), then built-in defaults.

use std::path::PathBuf;

use crate::data::DataSource;

pub const ENV_DATA_URL: &str = "AUTOSALES_DATA_URL";
pub const ENV_LOG: &str = "AUTOSALES_LOG";
pub const ENV_LOG_FILE: &str = "AUTOSALES_LOG_FILE";

const DEFAULT_LOG_FILTER: &str = "info";
const DEFAULT_LOG_FILE: &str = "logs/autosales.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub source: DataSource,
    /// `EnvFilter` directive string.
    pub log_filter: String,
    /// Log file used while the dashboard owns the terminal.
    pub log_file: PathBuf,
}

impl Config {
    /// Resolve from the process environment (after loading `.env`).
    pub fn from_env(source_flag: Option<&str>) -> Self {
        dotenvy::dotenv().ok();
        Self::resolve(source_flag, |key| std::env::var(key).ok())
    }

    /// Resolve with an explicit environment lookup.
    pub fn resolve(source_flag: Option<&str>, env: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let source = source_flag
            .map(str::to_string)
            .or_else(|| non_empty(ENV_DATA_URL))
            .map(|raw| DataSource::parse(&raw))
            .unwrap_or_default();

        Self {
            source,
            log_filter: non_empty(ENV_LOG).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
            log_file: non_empty(ENV_LOG_FILE)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DEFAULT_DATA_URL;

    #[test]
    fn defaults_when_nothing_set() {
        let cfg = Config::resolve(None, |_| None);
        assert_eq!(cfg.source, DataSource::Url(DEFAULT_DATA_URL.to_string()));
        assert_eq!(cfg.log_filter, "info");
        assert_eq!(cfg.log_file, PathBuf::from("logs/autosales.log"));
    }

    #[test]
    fn flag_beats_environment() {
        let env = |key: &str| match key {
            ENV_DATA_URL => Some("https://mirror.example/sales.csv".to_string()),
            ENV_LOG => Some("debug".to_string()),
            _ => None,
        };
        let cfg = Config::resolve(Some("local.csv"), env);
        assert_eq!(cfg.source, DataSource::File(PathBuf::from("local.csv")));
        assert_eq!(cfg.log_filter, "debug");

        let cfg = Config::resolve(None, env);
        assert_eq!(cfg.source, DataSource::Url("https://mirror.example/sales.csv".to_string()));
    }

    #[test]
    fn blank_environment_values_are_ignored() {
        let cfg = Config::resolve(None, |_| Some("  ".to_string()));
        assert_eq!(cfg.source, DataSource::default());
        assert_eq!(cfg.log_filter, "info");
    }
}
