//! # Object Store Errors

use thiserror::Error;

/// Result type for object store operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Object store errors
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("Bucket not found: {0}")]
    BucketNotFound(String),

    #[error("Object not found: {bucket}/{key}")]
    ObjectNotFound { bucket: String, key: String },

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("{program} exited with status {status}: {detail}")]
    CommandFailed {
        program: String,
        status: String,
        detail: String,
    },
}

impl StorageError {
    pub(crate) fn io(context: impl std::fmt::Display, e: std::io::Error) -> Self {
        StorageError::IoError(format!("{}: {}", context, e))
    }

    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            StorageError::BucketNotFound(_) => "PITR_STORAGE_BUCKET_NOT_FOUND",
            StorageError::ObjectNotFound { .. } => "PITR_STORAGE_OBJECT_NOT_FOUND",
            StorageError::InvalidKey(_) => "PITR_STORAGE_INVALID_KEY",
            StorageError::IoError(_) => "PITR_STORAGE_IO",
            StorageError::CommandFailed { .. } => "PITR_STORAGE_COMMAND_FAILED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(
            StorageError::BucketNotFound("b".into()).code(),
            "PITR_STORAGE_BUCKET_NOT_FOUND"
        );
        let err = StorageError::ObjectNotFound {
            bucket: "b".into(),
            key: "k/x".into(),
        };
        assert_eq!(err.to_string(), "Object not found: b/k/x");
    }
}
