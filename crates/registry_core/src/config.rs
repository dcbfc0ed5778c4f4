//! Runtime configuration for registry front ends.
//!
//! # Responsibility
//! - Resolve the data file path and logging settings.
//! - Apply environment overrides on top of built-in defaults.
//!
//! # Invariants
//! - Blank environment values are ignored, never treated as paths.
//! - Logging stays off unless a log directory is configured.

use crate::logging::default_log_level;
use std::path::PathBuf;

/// Default data file name, relative to the working directory.
pub const DEFAULT_DATA_FILE: &str = "persons.txt";

pub const ENV_DATA_FILE: &str = "REGISTRY_DATA_FILE";
pub const ENV_LOG_LEVEL: &str = "REGISTRY_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "REGISTRY_LOG_DIR";

/// Resolved registry settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Comma-delimited person data file.
    pub data_file: PathBuf,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute directory for rolling logs; `None` disables file logging.
    pub log_dir: Option<PathBuf>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl RegistryConfig {
    /// Defaults overridden by `REGISTRY_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by values from `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(path) = non_blank(lookup(ENV_DATA_FILE)) {
            config.data_file = PathBuf::from(path);
        }
        if let Some(level) = non_blank(lookup(ENV_LOG_LEVEL)) {
            config.log_level = level;
        }
        if let Some(dir) = non_blank(lookup(ENV_LOG_DIR)) {
            config.log_dir = Some(PathBuf::from(dir));
        }
        config
    }

    /// Starts file logging when a log directory is configured.
    ///
    /// Returns `Ok(false)` when logging is disabled.
    pub fn init_logging(&self) -> Result<bool, String> {
        let Some(dir) = &self.log_dir else {
            return Ok(false);
        };
        let dir = dir
            .to_str()
            .ok_or_else(|| format!("log_dir `{}` is not valid UTF-8", dir.display()))?;
        crate::logging::init_logging(&self.log_level, dir)?;
        Ok(true)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}
