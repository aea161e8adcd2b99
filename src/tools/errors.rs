//! External tool errors

use std::io;

use thiserror::Error;

/// Result type for external tool invocations
pub type ToolResult<T> = Result<T, ToolError>;

/// Errors from dump/restore invocations. Never retried.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The tool could not be started
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The tool ran and reported failure
    #[error("{program} exited with {status}")]
    ExitStatus { program: String, status: String },

    /// Local file handling around the invocation failed
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// The request cannot be expressed for this tool
    #[error("invalid tool request: {0}")]
    InvalidRequest(String),
}

impl ToolError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ToolError::Spawn { .. } => "PITR_TOOL_SPAWN_FAILED",
            ToolError::ExitStatus { .. } => "PITR_TOOL_FAILED",
            ToolError::Io { .. } => "PITR_TOOL_IO",
            ToolError::InvalidRequest(_) => "PITR_TOOL_INVALID_REQUEST",
        }
    }
}
