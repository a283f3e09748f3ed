//! Sync configuration.
//!
//! Supports TOML config files, environment variable overrides, and defaults.

use std::env;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SheetError;

/// Configuration for how a sheet maps onto its remote grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Rows above the first data row; the last of them holds column names (default: 1)
    pub header_rows: usize,
    /// Parse numbers and booleans out of raw grid text on load (default: true)
    pub infer_types: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            header_rows: 1,
            infer_types: true,
        }
    }
}

impl SyncConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SheetError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| SheetError::Config(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, SheetError> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| SheetError::Config(format!("Invalid TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Applies environment variable overrides.
    ///
    /// `GRIDSYNC_HEADER_ROWS` overrides `header_rows`,
    /// `GRIDSYNC_INFER_TYPES` overrides `infer_types`.
    pub fn apply_env_overrides(&mut self) -> Result<(), SheetError> {
        if let Ok(val) = env::var("GRIDSYNC_HEADER_ROWS") {
            self.header_rows = val
                .parse()
                .map_err(|_| SheetError::Config(format!("Invalid header_rows: {}", val)))?;
        }
        if let Ok(val) = env::var("GRIDSYNC_INFER_TYPES") {
            self.infer_types = val
                .parse()
                .map_err(|_| SheetError::Config(format!("Invalid infer_types: {}", val)))?;
        }
        self.validate()
    }

    /// Checks the configuration is usable.
    pub fn validate(&self) -> Result<(), SheetError> {
        if self.header_rows == 0 {
            return Err(SheetError::Config(
                "header_rows must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
