//! Recovery error types
//!
//! Every variant aborts the run. Recoverable conditions (malformed catalog
//! keys, cleanup failures) never surface here.
//!
//! Error codes:
//! - PITR_CONFIG_INVALID
//! - PITR_LOCATOR_INVALID
//! - PITR_TIMESTAMP_INVALID
//! - PITR_STORAGE_FAILED
//! - PITR_TOOL_FAILED
//! - PITR_ORDERING_VIOLATION

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::outcome::SegmentOutcome;
use crate::catalog::CatalogError;
use crate::locator::LocatorError;
use crate::object_store::StorageError;
use crate::tools::ToolError;

/// Result type for recovery runs
pub type RecoveryResult<T> = Result<T, RecoveryError>;

/// Run-aborting recovery errors
#[derive(Debug, Error)]
pub enum RecoveryError {
    /// Missing or invalid settings, raised before any I/O
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Full-backup locator could not be resolved
    #[error("failed parsing full dump locator: {0}")]
    Locator(#[from] LocatorError),

    /// Segment catalog could not be listed
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Artifact could not be downloaded
    #[error("failed to stage {key}: {source}")]
    Staging {
        key: String,
        #[source]
        source: StorageError,
    },

    /// Full archive restore failed
    #[error("failed to restore {key}: {source}")]
    Restore {
        key: String,
        #[source]
        source: ToolError,
    },

    /// Segment replay failed; the run halted at this segment
    #[error("failed to apply oplog {key} after {applied} applied segment(s): {source}")]
    SegmentFailed {
        key: String,
        applied: usize,
        outcomes: Vec<SegmentOutcome>,
        #[source]
        source: ToolError,
    },

    /// A segment arrived older than one already applied
    #[error("segment {key} at {timestamp} is older than already applied segment at {previous}")]
    OrderingViolation {
        key: String,
        timestamp: DateTime<Utc>,
        previous: DateTime<Utc>,
    },
}

impl RecoveryError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            RecoveryError::Config(_) => "PITR_CONFIG_INVALID",
            RecoveryError::Locator(LocatorError::Invalid { .. }) => "PITR_LOCATOR_INVALID",
            RecoveryError::Locator(LocatorError::Timestamp(_)) => "PITR_TIMESTAMP_INVALID",
            RecoveryError::Catalog(_) | RecoveryError::Staging { .. } => "PITR_STORAGE_FAILED",
            RecoveryError::Restore { .. } | RecoveryError::SegmentFailed { .. } => "PITR_TOOL_FAILED",
            RecoveryError::OrderingViolation { .. } => "PITR_ORDERING_VIOLATION",
        }
    }
}
