//! # Object Store Trait

use std::path::{Component, Path};

use super::errors::{StorageError, StorageResult};

/// Lazily produced listing. Items arrive as the backend pages through the
/// bucket, so callers can filter without holding every key in memory.
pub type KeyIter<'a> = Box<dyn Iterator<Item = StorageResult<String>> + 'a>;

/// Backend trait for bucketed object storage
pub trait ObjectStore: Send + Sync + std::fmt::Debug {
    /// List keys in `bucket` starting with `prefix`
    fn list<'a>(&'a self, bucket: &str, prefix: &str) -> StorageResult<KeyIter<'a>>;

    /// Download `bucket/key` into the local file `dest`
    fn get(&self, bucket: &str, key: &str, dest: &Path) -> StorageResult<()>;

    /// Upload the local file `src` to `bucket/key`
    fn put(&self, bucket: &str, key: &str, src: &Path) -> StorageResult<()>;
}

/// Reject keys that would escape a directory when joined onto it.
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    let escapes = Path::new(key)
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}
