//! Catalog errors

use thiserror::Error;

use crate::object_store::StorageError;

/// Result type for catalog queries
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors that abort a catalog scan
#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    /// The object store could not list `bucket/prefix`
    #[error("failed to list segments in {bucket}/{prefix}: {source}")]
    Listing {
        bucket: String,
        prefix: String,
        #[source]
        source: StorageError,
    },
}

impl CatalogError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            CatalogError::Listing { source, .. } => source.code(),
        }
    }
}
