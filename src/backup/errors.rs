//! Backup producer errors

use thiserror::Error;

use crate::object_store::StorageError;
use crate::tools::ToolError;

/// Result type for backup producers
pub type BackupResult<T> = Result<T, BackupError>;

/// Backup producer errors. All of them fail the run.
#[derive(Debug, Error)]
pub enum BackupError {
    /// The dump tool failed
    #[error("MongoDB backup failed: {0}")]
    Dump(#[from] ToolError),

    /// The dump could not be uploaded
    #[error("error uploading {key}: {source}")]
    Upload {
        key: String,
        #[source]
        source: StorageError,
    },

    /// The dump window could not be computed
    #[error("invalid backup window: {0}")]
    InvalidWindow(String),
}

impl BackupError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            BackupError::Dump(_) => "PITR_TOOL_FAILED",
            BackupError::Upload { .. } => "PITR_STORAGE_FAILED",
            BackupError::InvalidWindow(_) => "PITR_CONFIG_INVALID",
        }
    }
}
