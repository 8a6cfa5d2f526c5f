//! Configuration schema definitions.

use serde::{Deserialize, Serialize};

/// Root configuration, deserialized from `config.toml`. Every section and
/// field is optional in the file; missing pieces take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub output: OutputConfig,
    pub history: HistoryConfig,
}

/// Batch output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format: "table", "csv", or "tsv"
    pub format: String,
    /// Hard cap on a rendered column's width in table output
    pub max_column_width: usize,
    /// Text shown for NULL cells
    pub null_text: String,
}

impl Default for OutputConfig {
    fn default() -> OutputConfig {
        OutputConfig {
            format: "table".to_string(),
            max_column_width: 50,
            null_text: "NULL".to_string(),
        }
    }
}

/// Statement history settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Record executed statements
    pub enabled: bool,
    /// Maximum number of entries kept in the history file
    pub max_entries: usize,
}

impl Default for HistoryConfig {
    fn default() -> HistoryConfig {
        HistoryConfig {
            enabled: true,
            max_entries: 1000,
        }
    }
}
