//! Runtime configuration resolved from the environment.
//!
//! # Invariants
//! - Blank variables behave as unset.
//! - Unparseable values are errors, never silently replaced by defaults.

use crate::list::DEFAULT_SEARCH_DEBOUNCE;
use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_DB_PATH: &str = "STAFFDIR_DB_PATH";
pub const ENV_LOG_DIR: &str = "STAFFDIR_LOG_DIR";
pub const ENV_LOG_LEVEL: &str = "STAFFDIR_LOG_LEVEL";
pub const ENV_SEED_SAMPLE: &str = "STAFFDIR_SEED_SAMPLE";
pub const ENV_SEARCH_DEBOUNCE_MS: &str = "STAFFDIR_SEARCH_DEBOUNCE_MS";

const DEFAULT_DB_FILE_NAME: &str = "staffdir.sqlite3";
const DEFAULT_LOG_DIR_NAME: &str = "staffdir-logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidBool { var: &'static str, value: String },
    InvalidMillis { var: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBool { var, value } => write!(
                f,
                "{var}=`{value}` is not a boolean; expected 1|0|true|false|yes|no|on|off"
            ),
            Self::InvalidMillis { var, value } => {
                write!(f, "{var}=`{value}` is not a whole number of milliseconds")
            }
        }
    }
}

impl Error for ConfigError {}

/// Application settings shared by the core and the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
    pub seed_sample_data: bool,
    pub search_debounce: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        let temp = std::env::temp_dir();
        Self {
            db_path: temp.join(DEFAULT_DB_FILE_NAME),
            log_dir: temp.join(DEFAULT_LOG_DIR_NAME),
            log_level: default_log_level().to_string(),
            seed_sample_data: true,
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
        }
    }
}

impl AppConfig {
    /// Reads `STAFFDIR_*` variables on top of the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
        };

        let mut config = Self::default();
        if let Some(path) = value(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(dir) = value(ENV_LOG_DIR) {
            config.log_dir = PathBuf::from(dir);
        }
        if let Some(level) = value(ENV_LOG_LEVEL) {
            config.log_level = level;
        }
        if let Some(raw) = value(ENV_SEED_SAMPLE) {
            config.seed_sample_data =
                parse_bool(&raw).ok_or(ConfigError::InvalidBool {
                    var: ENV_SEED_SAMPLE,
                    value: raw,
                })?;
        }
        if let Some(raw) = value(ENV_SEARCH_DEBOUNCE_MS) {
            let millis = raw.parse::<u64>().map_err(|_| ConfigError::InvalidMillis {
                var: ENV_SEARCH_DEBOUNCE_MS,
                value: raw.clone(),
            })?;
            config.search_debounce = Duration::from_millis(millis);
        }
        Ok(config)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ConfigError, ENV_DB_PATH, ENV_SEARCH_DEBOUNCE_MS, ENV_SEED_SAMPLE};
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::time::Duration;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[(ENV_DB_PATH, "   ")])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.search_debounce, Duration::from_millis(300));
    }

    #[test]
    fn values_override_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (ENV_DB_PATH, "/data/staff.db"),
            (ENV_SEED_SAMPLE, "off"),
            (ENV_SEARCH_DEBOUNCE_MS, "50"),
        ]))
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/data/staff.db"));
        assert!(!config.seed_sample_data);
        assert_eq!(config.search_debounce, Duration::from_millis(50));
    }

    #[test]
    fn malformed_values_are_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[(ENV_SEED_SAMPLE, "maybe")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBool { .. }));

        let err =
            AppConfig::from_lookup(lookup_from(&[(ENV_SEARCH_DEBOUNCE_MS, "-5")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidMillis { .. }));
    }
}
