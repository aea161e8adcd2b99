//! CLI-specific error types
//!
//! Every error that reaches the CLI ends the process with a non-zero exit.

use std::io;

use thiserror::Error;

use crate::backup::BackupError;
use crate::config::ConfigError;
use crate::orchestrator::RecoveryError;

/// CLI error
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Recovery(#[from] RecoveryError),

    #[error(transparent)]
    Backup(#[from] BackupError),

    /// Writing the summary to stdout failed
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),

    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
}

impl CliError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            CliError::Config(e) => e.code(),
            CliError::Recovery(e) => e.code(),
            CliError::Backup(e) => e.code(),
            CliError::Output(_) | CliError::Encode(_) => "PITR_OUTPUT_FAILED",
        }
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
