//! Timestamp codec errors

use thiserror::Error;

/// Result type for timestamp parsing
pub type TimestampResult<T> = Result<T, TimestampError>;

/// Errors raised while extracting timestamps from names, keys and inputs
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimestampError {
    /// No `YYYYMMDD_HHMMSS` pattern in an artifact name
    #[error("timestamp not found in '{0}'")]
    NotFound(String),

    /// Digits matched but do not form a calendar instant
    #[error("malformed timestamp '{value}' in '{source_name}'")]
    Malformed { source_name: String, value: String },

    /// Key does not have the `YYYY/MM/DD/HH/MM/oplog.bson` shape
    #[error("path timestamp not found in key '{0}'")]
    PathNotFound(String),

    /// Target time input did not match `YYYY/MM/DD HH:MM`
    #[error("invalid target time '{0}', expected format YYYY/MM/DD HH:MM")]
    InvalidTargetTime(String),
}

impl TimestampError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            TimestampError::NotFound(_) => "PITR_TIMESTAMP_NOT_FOUND",
            TimestampError::Malformed { .. } => "PITR_TIMESTAMP_MALFORMED",
            TimestampError::PathNotFound(_) => "PITR_PATH_TIMESTAMP_NOT_FOUND",
            TimestampError::InvalidTargetTime(_) => "PITR_TARGET_TIME_INVALID",
        }
    }
}
