//! Error types for adboard-core
//!
//! Errors are reserved for misuse and failed loads. Malformed filter text and
//! missing metric values are not errors: they degrade to inactive criteria and
//! the `-` display sentinel.

use crate::table::ColumnId;
use std::path::PathBuf;
use thiserror::Error;

/// Core error type for adboard operations
#[derive(Error, Debug)]
pub enum CoreError {
    // ===================
    // Data source
    // ===================
    #[error("Failed to fetch dashboard data: {message}")]
    FetchFailed { message: String },

    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange { start: i64, end: i64 },

    // ===================
    // Table state
    // ===================
    #[error("Invalid time window: {minutes} minutes (must be positive)")]
    InvalidWindow { minutes: u32 },

    #[error("Invalid page size: {size} (expected one of 10, 20, 30, 40, 50)")]
    InvalidPageSize { size: usize },

    #[error("Unknown column: {name}")]
    UnknownColumn { name: String },

    #[error("Column {column} is pinned and cannot be hidden or moved")]
    PinnedColumn { column: ColumnId },

    #[error("Index {index} out of range for list of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    // ===================
    // Config
    // ===================
    #[error("Failed to read config file: {path}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ConfigParse {
        path: PathBuf,
        message: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl CoreError {
    /// Short, user-facing description for status bars and error panels
    pub fn user_message(&self) -> String {
        match self {
            CoreError::FetchFailed { .. } => "加载数据时出错".to_string(),
            CoreError::ConfigParse { path, .. } => {
                format!("Invalid config at {} (check TOML syntax)", path.display())
            }
            other => other.to_string(),
        }
    }
}

/// Loading state of the dashboard data
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    /// Nothing requested yet
    #[default]
    Idle,
    /// A fetch is in flight
    Loading,
    /// Data is available
    Ready,
    /// The latest fetch failed; no spinner, show the message
    Failed { message: String },
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, LoadState::Ready)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            LoadState::Failed { message } => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_state_flags() {
        assert!(LoadState::Loading.is_loading());
        assert!(LoadState::Ready.is_ready());
        assert!(!LoadState::Idle.is_ready());

        let failed = LoadState::Failed {
            message: "network down".to_string(),
        };
        assert_eq!(failed.error_message(), Some("network down"));
        assert!(!failed.is_loading());
    }

    #[test]
    fn test_pinned_column_message() {
        let err = CoreError::PinnedColumn {
            column: ColumnId::Preview,
        };
        assert!(err.to_string().contains("preview"));
    }

    #[test]
    fn test_fetch_failed_user_message() {
        let err = CoreError::FetchFailed {
            message: "timeout".to_string(),
        };
        assert_eq!(err.user_message(), "加载数据时出错");
        assert!(err.to_string().contains("timeout"));
    }
}
