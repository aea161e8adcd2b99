//! Configuration errors
//!
//! All configuration errors are fatal and raised before any I/O against the
//! object store or the database.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::timestamp::TimestampError;

/// Result type for configuration handling
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required settings absent or empty
    #[error("missing required setting: {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    /// ACTION is not a recognised recovery mode
    #[error("{0}")]
    InvalidAction(String),

    /// END_TIME is malformed
    #[error(transparent)]
    TargetTime(#[from] TimestampError),

    /// Any other invalid value
    #[error("invalid setting: {0}")]
    Invalid(String),

    /// Config file could not be read
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Config file is not valid JSON for this command
    #[error("invalid config JSON {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ConfigError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::TargetTime(e) => e.code(),
            _ => "PITR_CONFIG_INVALID",
        }
    }
}

/// Collect the names of empty settings
pub(crate) fn require(fields: &[(&'static str, Option<&str>)]) -> ConfigResult<()> {
    let missing: Vec<&'static str> = fields
        .iter()
        .filter(|(_, value)| value.map_or(true, |v| v.trim().is_empty()))
        .map(|(name, _)| *name)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Missing(missing))
    }
}
