/*!
 * Kernel Configuration
 *
 * Boot-time configuration for the descriptor layer. Defaults come from
 * `core::limits`; a JSON file named by `KERNEL_CONFIG` and individual
 * `KERNEL_*` environment variables override them.
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::core::limits::{DEFAULT_MAX_OPEN_FILES, PATH_MAX, RESERVED_FDS, SYSTEM_MAX_OPEN_FILES};

/// Environment variable naming a JSON configuration file
pub const CONFIG_PATH_ENV: &str = "KERNEL_CONFIG";

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {message}")]
    #[diagnostic(code(config::io), help("Check that KERNEL_CONFIG points at a readable file."))]
    Io { path: String, message: String },

    #[error("Malformed config: {0}")]
    #[diagnostic(code(config::parse))]
    Parse(String),

    #[error("Invalid value for {key}: {value:?}")]
    #[diagnostic(code(config::invalid_value), help("Expected a non-negative integer."))]
    InvalidValue { key: String, value: String },

    #[error("Invalid configuration: {0}")]
    #[diagnostic(code(config::invalid))]
    Invalid(String),
}

/// Shape of every per-process descriptor table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TableConfig {
    /// Number of descriptor slots
    pub capacity: usize,
    /// Low descriptors skipped by `place` (standard streams)
    pub reserved: usize,
}

impl TableConfig {
    #[inline]
    #[must_use]
    pub const fn new(capacity: usize, reserved: usize) -> Self {
        Self { capacity, reserved }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::Invalid("table capacity must be non-zero".into()));
        }
        if self.reserved >= self.capacity {
            return Err(ConfigError::Invalid(format!(
                "reserved descriptors ({}) leave no room in a table of {}",
                self.reserved, self.capacity
            )));
        }
        Ok(())
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_OPEN_FILES, RESERVED_FDS)
    }
}

/// Complete boot configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KernelConfig {
    pub table: TableConfig,
    /// Live OpenFiles allowed across all processes
    pub system_max_open_files: usize,
    /// Longest path accepted by open()
    pub path_max: usize,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            table: TableConfig::default(),
            system_max_open_files: SYSTEM_MAX_OPEN_FILES,
            path_max: PATH_MAX,
        }
    }
}

impl KernelConfig {
    /// Load defaults, the optional config file, then environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        let base = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };

        let config = base.with_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&contents)
    }

    /// Apply `KERNEL_*` overrides looked up through `lookup`
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let parse = |key: &str, current: usize| -> Result<usize, ConfigError> {
            match lookup(key) {
                Some(value) => value.trim().parse().map_err(|_| ConfigError::InvalidValue {
                    key: key.to_string(),
                    value,
                }),
                None => Ok(current),
            }
        };

        self.table.capacity = parse("KERNEL_MAX_OPEN_FILES", self.table.capacity)?;
        self.table.reserved = parse("KERNEL_RESERVED_FDS", self.table.reserved)?;
        self.path_max = parse("KERNEL_PATH_MAX", self.path_max)?;
        self.system_max_open_files =
            parse("KERNEL_SYSTEM_MAX_OPEN_FILES", self.system_max_open_files)?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.table.validate()?;
        if self.path_max == 0 {
            return Err(ConfigError::Invalid("path_max must be non-zero".into()));
        }
        if self.system_max_open_files == 0 {
            return Err(ConfigError::Invalid(
                "system_max_open_files must be non-zero".into(),
            ));
        }
        Ok(())
    }
}
