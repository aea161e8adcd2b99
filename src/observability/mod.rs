//! Observability subsystem for mongo-pitr
//!
//! - Structured logging through `tracing`, installed once by the CLI
//! - Typed lifecycle event names carried in every log line's `event` field
//!
//! # Usage
//!
//! ```ignore
//! use mongo_pitr::observability::{init_logging, Event, LoggingConfig};
//!
//! init_logging(&LoggingConfig::default())?;
//! tracing::info!(event = %Event::SegmentApplied, key = %key, "segment applied");
//! ```

mod events;
mod logging;

pub use events::Event;
pub use logging::{init_logging, LogFormat, LoggingConfig, DEFAULT_LOG_LEVEL};

use thiserror::Error;

/// Observability error
///
/// Failure to install logging is reported but never affects a restore.
#[derive(Debug, Error)]
pub enum ObservabilityError {
    /// A global subscriber is already installed, or installation failed
    #[error("failed to install tracing subscriber: {0}")]
    SubscriberInstall(String),

    /// Unknown log format name
    #[error("unknown log format '{0}', expected json, pretty or compact")]
    UnknownFormat(String),
}

impl ObservabilityError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        "PITR_OBSERVABILITY_FAILED"
    }
}

/// Result type for observability operations
pub type ObservabilityResult<T> = Result<T, ObservabilityError>;
