// src/config.rs

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{AudioError, Result};
use crate::export::ExportFormat;

/// Engine settings, loadable from a JSON file
///
/// Every field is optional in the file; missing ones take the defaults.
///
/// ```json
/// { "history_limit": 50, "default_format": "wav" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum number of undoable edits; `None` keeps every edit
    pub history_limit: Option<usize>,

    /// Format label used when an export does not name one
    pub default_format: String,

    /// Filename stem used when the source file has no name
    pub default_name: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_limit: None,
            default_format: "mp3".to_string(),
            default_name: "audio".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| AudioError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| AudioError::FileOpen {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::from_json_str(&json)
    }

    fn validate(&self) -> Result<()> {
        if self.history_limit == Some(0) {
            return Err(AudioError::Config(
                "history_limit must be at least 1 (omit it for unlimited)".to_string(),
            ));
        }
        if self.default_name.trim().is_empty() {
            return Err(AudioError::Config("default_name cannot be empty".to_string()));
        }
        self.default_format
            .parse::<ExportFormat>()
            .map_err(|e| AudioError::Config(e.to_string()))?;
        Ok(())
    }
}
