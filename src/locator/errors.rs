//! Locator errors

use thiserror::Error;

use crate::timestamp::TimestampError;

/// Result type for locator resolution
pub type LocatorResult<T> = Result<T, LocatorError>;

/// Errors raised while resolving a backup locator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocatorError {
    /// Not a parseable `scheme://bucket/path` locator
    #[error("invalid backup locator '{locator}': {reason}")]
    Invalid { locator: String, reason: String },

    /// Object name carries no usable creation time
    #[error(transparent)]
    Timestamp(#[from] TimestampError),
}

impl LocatorError {
    pub(crate) fn invalid(locator: &str, reason: impl Into<String>) -> Self {
        LocatorError::Invalid {
            locator: locator.to_string(),
            reason: reason.into(),
        }
    }

    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            LocatorError::Invalid { .. } => "PITR_LOCATOR_INVALID",
            LocatorError::Timestamp(e) => e.code(),
        }
    }
}
