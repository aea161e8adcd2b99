//! Backup locator
//!
//! Resolves a full-backup locator such as
//! `gs://mybucket/prod/app/mongodb_backup_20240601_120000.gz` into the
//! bucket, the object path inside it, and the creation time embedded in the
//! object name.
//!
//! Resolution failures are terminal for a recovery run. There is no fallback
//! backup.

mod errors;
mod reference;

pub use errors::{LocatorError, LocatorResult};
pub use reference::{resolve, BackupReference};
