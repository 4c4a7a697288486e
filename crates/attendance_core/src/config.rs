//! Runtime configuration resolved from the environment.

use crate::logging::default_log_level;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "ATTENDANCE_DB_PATH";
pub const LOG_DIR_ENV: &str = "ATTENDANCE_LOG_DIR";
pub const LOG_LEVEL_ENV: &str = "ATTENDANCE_LOG_LEVEL";

pub const DEFAULT_DB_FILE: &str = "attendance.db";
const DEFAULT_LOG_DIR_NAME: &str = "attendance-logs";

/// Database and logging settings for one process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE),
            log_dir: std::env::temp_dir().join(DEFAULT_LOG_DIR_NAME),
            log_level: default_log_level().to_string(),
        }
    }
}

impl CoreConfig {
    /// Reads `ATTENDANCE_*` variables; unset or blank values keep defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(db_path) = read(DB_PATH_ENV) {
            config.db_path = PathBuf::from(db_path);
        }
        if let Some(log_dir) = read(LOG_DIR_ENV) {
            config.log_dir = PathBuf::from(log_dir);
        }
        if let Some(level) = read(LOG_LEVEL_ENV) {
            config.log_level = level;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::{CoreConfig, DB_PATH_ENV, DEFAULT_DB_FILE, LOG_LEVEL_ENV};
    use std::path::PathBuf;

    #[test]
    fn blank_and_missing_values_fall_back_to_defaults() {
        let config = CoreConfig::from_lookup(|key| match key {
            DB_PATH_ENV => Some("   ".to_string()),
            _ => None,
        });
        assert_eq!(config.db_path, PathBuf::from(DEFAULT_DB_FILE));
        assert_eq!(config, CoreConfig::default());
    }

    #[test]
    fn set_values_override_defaults() {
        let config = CoreConfig::from_lookup(|key| match key {
            DB_PATH_ENV => Some("/data/school.db".to_string()),
            LOG_LEVEL_ENV => Some(" warn ".to_string()),
            _ => None,
        });
        assert_eq!(config.db_path, PathBuf::from("/data/school.db"));
        assert_eq!(config.log_level, "warn");
    }
}
