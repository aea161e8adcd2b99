//! Object store capability
//!
//! Segments and full backups live in a bucketed object store. The recovery
//! core only needs three operations: list keys by prefix, download an object
//! to a local file, and upload a local file.
//!
//! Backends:
//! - [`LocalObjectStore`]: a directory tree, one sub-directory per bucket
//! - [`GcloudStore`]: Google Cloud Storage through the `gcloud storage` CLI

mod backend;
mod errors;
mod gcloud;
mod local;

pub use backend::{validate_key, KeyIter, ObjectStore};
pub use errors::{StorageError, StorageResult};
pub use gcloud::GcloudStore;
pub use local::LocalObjectStore;
