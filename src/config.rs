//! Dashboard configuration.
//!
//! Settings are read from a JSON file: the path in `SALARY_DASHBOARD_CONFIG`,
//! or `salary_dashboard.json` in the working directory. Every field is
//! optional; a missing file means defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming an alternative config file.
pub const CONFIG_ENV: &str = "SALARY_DASHBOARD_CONFIG";

/// Config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "salary_dashboard.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Initial window size in points.
    pub window_size: [f32; 2],
    /// Bars kept in the industry ranking.
    pub top_industries: usize,
    /// Rows shown in the dataset preview.
    pub preview_rows: usize,
    /// Height of each interactive chart.
    pub chart_height: f32,
    /// Size of exported PNG snapshots.
    pub export_width: u32,
    pub export_height: u32,
    /// Default tracing filter; `RUST_LOG` takes precedence.
    pub log_filter: String,
    /// CSV loaded at startup, if any.
    pub initial_csv: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            window_size: [1200.0, 900.0],
            top_industries: 10,
            preview_rows: 5,
            chart_height: 320.0,
            export_width: 1000,
            export_height: 600,
            log_filter: "info".to_string(),
            initial_csv: None,
        }
    }
}

impl DashboardConfig {
    /// Load from `SALARY_DASHBOARD_CONFIG` or the default file name.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self::load_from(&path)
    }

    /// Load from a specific file. A file that does not exist yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }
}
