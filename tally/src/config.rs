//! Runtime settings
//!
//! Read once at startup from the process environment, after `.env` has
//! been merged in.

use std::env;
use std::path::PathBuf;

pub const HISTORY_FILE_PATH: &str = "HISTORY_FILE_PATH";
pub const PLUGIN_DIR: &str = "PLUGIN_DIR";
pub const ENVIRONMENT: &str = "ENVIRONMENT";
pub const LOG_FILTER: &str = "RUST_LOG";
pub const LOAD_HISTORY_ON_START: &str = "LOAD_HISTORY_ON_START";

pub const DEFAULT_HISTORY_FILE: &str = "calculation_history.csv";
pub const DEFAULT_ENVIRONMENT: &str = "PRODUCTION";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub history_path: PathBuf,
    /// Plugin root; `None` registers the built-in catalog directly
    pub plugin_dir: Option<PathBuf>,
    pub environment: String,
    pub log_filter: String,
    pub load_history_on_start: bool,
}

impl Settings {
    /// Load `.env` (if any) and read settings from the environment
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Self {
            history_path: get(HISTORY_FILE_PATH)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_HISTORY_FILE)),
            plugin_dir: get(PLUGIN_DIR).map(PathBuf::from),
            environment: get(ENVIRONMENT).unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string()),
            log_filter: get(LOG_FILTER).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
            load_history_on_start: get(LOAD_HISTORY_ON_START)
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
