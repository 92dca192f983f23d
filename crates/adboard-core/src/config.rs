//! Dashboard configuration
//!
//! Read from `<config dir>/adboard/config.toml`. A missing file yields the
//! defaults; an unreadable or invalid file is an error. Every key is optional.
//!
//! ```toml
//! default_window = 60
//! page_size = 20
//! fetch_latency_ms = 1000
//! material_count = 30
//! seed = 42
//! ```

use crate::analytics::window::TimeWindow;
use crate::error::CoreError;
use crate::table::PageSize;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

const CONFIG_DIR: &str = "adboard";
const CONFIG_FILE: &str = "config.toml";
const MAX_MATERIALS: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Initial look-back window in minutes
    pub default_window: u32,
    /// Initial rows per page (10, 20, 30, 40 or 50)
    pub page_size: usize,
    /// Simulated API latency
    pub fetch_latency_ms: u64,
    /// Materials generated per fetch
    pub material_count: usize,
    /// Fixed seed for reproducible mock data
    pub seed: Option<u64>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_window: TimeWindow::default().minutes(),
            page_size: PageSize::default().get(),
            fetch_latency_ms: 1000,
            material_count: 30,
            seed: None,
        }
    }
}

impl DashboardConfig {
    /// `<config dir>/adboard/config.toml`, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load from the default path (defaults when absent)
    pub fn load_default() -> Result<Self, CoreError> {
        match Self::default_path() {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load and validate a config file; a missing file yields defaults
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(CoreError::ConfigRead {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let config = Self::from_toml(&content).map_err(|source| CoreError::ConfigParse {
            path: path.to_path_buf(),
            message: source.message().to_string(),
            source,
        })?;
        config.validate()?;

        debug!(path = %path.display(), ?config, "Config loaded");
        Ok(config)
    }

    /// Parse without validation
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        TimeWindow::new(self.default_window)?;
        PageSize::new(self.page_size)?;
        if self.material_count > MAX_MATERIALS {
            return Err(CoreError::InvalidConfig {
                message: format!(
                    "material_count {} exceeds the maximum of {}",
                    self.material_count, MAX_MATERIALS
                ),
            });
        }
        Ok(())
    }

    /// Validated window; falls back to the default for invalid values
    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.default_window).unwrap_or_default()
    }

    /// Validated page size; falls back to the default for invalid values
    pub fn page_size(&self) -> PageSize {
        PageSize::new(self.page_size).unwrap_or_default()
    }

    pub fn fetch_latency(&self) -> Duration {
        Duration::from_millis(self.fetch_latency_ms)
    }
}
