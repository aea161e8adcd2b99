//! # Local Filesystem Object Store
//!
//! Layout: `<root>/<bucket>/<key>`. Used for development, air-gapped
//! restores from a mounted backup volume, and tests.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::backend::{validate_key, KeyIter, ObjectStore};
use super::errors::{StorageError, StorageResult};

/// Local filesystem object store
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    /// Create a new local store rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory holding one sub-directory per bucket
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn bucket_dir(&self, bucket: &str) -> StorageResult<PathBuf> {
        validate_key(bucket).map_err(|_| StorageError::BucketNotFound(bucket.to_string()))?;
        Ok(self.root.join(bucket))
    }

    fn object_path(&self, bucket: &str, key: &str) -> StorageResult<PathBuf> {
        validate_key(key)?;
        Ok(self.bucket_dir(bucket)?.join(key))
    }
}

/// Convert a file below `bucket_dir` into a `/`-separated key
fn key_for(bucket_dir: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(bucket_dir).ok()?;
    let parts: Option<Vec<&str>> = relative.components().map(|c| c.as_os_str().to_str()).collect();
    Some(parts?.join("/"))
}

impl ObjectStore for LocalObjectStore {
    fn list<'a>(&'a self, bucket: &str, prefix: &str) -> StorageResult<KeyIter<'a>> {
        let bucket_dir = self.bucket_dir(bucket)?;
        if !bucket_dir.is_dir() {
            return Err(StorageError::BucketNotFound(bucket.to_string()));
        }

        // Only walk the deepest directory the prefix pins down.
        let start = match prefix.rfind('/') {
            Some(idx) if idx > 0 => {
                validate_key(&prefix[..idx])?;
                bucket_dir.join(&prefix[..idx])
            }
            _ => bucket_dir.clone(),
        };
        if !start.is_dir() {
            return Ok(Box::new(std::iter::empty()));
        }

        let prefix = prefix.to_string();
        let iter = WalkDir::new(start)
            .sort_by_file_name()
            .into_iter()
            .filter_map(move |entry| match entry {
                Ok(entry) if entry.file_type().is_file() => {
                    let key = key_for(&bucket_dir, entry.path())?;
                    key.starts_with(&prefix).then_some(Ok(key))
                }
                Ok(_) => None,
                Err(e) => Some(Err(StorageError::IoError(format!("listing failed: {}", e)))),
            });

        Ok(Box::new(iter))
    }

    fn get(&self, bucket: &str, key: &str, dest: &Path) -> StorageResult<()> {
        let src = self.object_path(bucket, key)?;
        if !self.bucket_dir(bucket)?.is_dir() {
            return Err(StorageError::BucketNotFound(bucket.to_string()));
        }

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| StorageError::io(format!("create {}", parent.display()), e))?;
        }

        fs::copy(&src, dest).map(|_| ()).map_err(|e| {
            if e.kind() == ErrorKind::NotFound && !src.exists() {
                StorageError::ObjectNotFound {
                    bucket: bucket.to_string(),
                    key: key.to_string(),
                }
            } else {
                StorageError::io(format!("copy {} to {}", src.display(), dest.display()), e)
            }
        })
    }

    fn put(&self, bucket: &str, key: &str, src: &Path) -> StorageResult<()> {
        let dest = self.object_path(bucket, key)?;

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| StorageError::io(format!("create {}", parent.display()), e))?;
        }

        fs::copy(src, &dest)
            .map(|_| ())
            .map_err(|e| StorageError::io(format!("copy {} to {}", src.display(), dest.display()), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn seed(store: &LocalObjectStore, bucket: &str, key: &str, data: &[u8]) {
        let path = store.root().join(bucket).join(key);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, data).unwrap();
    }

    fn keys(store: &LocalObjectStore, bucket: &str, prefix: &str) -> Vec<String> {
        let mut keys: Vec<String> = store
            .list(bucket, prefix)
            .unwrap()
            .collect::<StorageResult<_>>()
            .unwrap();
        keys.sort();
        keys
    }

    #[test]
    fn test_put_get() {
        let temp = TempDir::new().unwrap();
        let store = LocalObjectStore::new(temp.path().join("store"));

        let src = temp.path().join("upload.bin");
        fs::write(&src, b"hello").unwrap();
        store.put("bucket", "a/b/c/file.bin", &src).unwrap();

        let dest = temp.path().join("download/file.bin");
        store.get("bucket", "a/b/c/file.bin", &dest).unwrap();
        assert_eq!(fs::read(&dest).unwrap(), b"hello");
    }

    #[test]
    fn test_list_recursive_with_prefix() {
        let temp = TempDir::new().unwrap();
        let store = LocalObjectStore::new(temp.path());
        seed(&store, "b", "prod/2024/06/01/13/00/oplog.bson", b"1");
        seed(&store, "b", "prod/2024/06/01/14/00/oplog.bson", b"2");
        seed(&store, "b", "production/2024/06/01/14/00/oplog.bson", b"3");
        seed(&store, "b", "staging/2024/06/01/14/00/oplog.bson", b"4");

        assert_eq!(
            keys(&store, "b", "prod/"),
            vec![
                "prod/2024/06/01/13/00/oplog.bson".to_string(),
                "prod/2024/06/01/14/00/oplog.bson".to_string(),
            ]
        );
        assert_eq!(keys(&store, "b", "prod").len(), 3);
        assert_eq!(keys(&store, "b", "").len(), 4);
    }

    #[test]
    fn test_list_missing_prefix_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = LocalObjectStore::new(temp.path());
        seed(&store, "b", "prod/x", b"1");
        assert!(keys(&store, "b", "dev/").is_empty());
    }

    #[test]
    fn test_list_missing_bucket() {
        let temp = TempDir::new().unwrap();
        let store = LocalObjectStore::new(temp.path());
        assert!(matches!(
            store.list("nope", "prod/"),
            Err(StorageError::BucketNotFound(_))
        ));
    }

    #[test]
    fn test_get_not_found() {
        let temp = TempDir::new().unwrap();
        let store = LocalObjectStore::new(temp.path());
        seed(&store, "b", "other", b"1");

        let result = store.get("b", "missing.gz", &temp.path().join("out"));
        assert!(matches!(result, Err(StorageError::ObjectNotFound { .. })));
    }

    #[test]
    fn test_rejects_traversal() {
        let temp = TempDir::new().unwrap();
        let store = LocalObjectStore::new(temp.path());
        let result = store.get("b", "../secret", &temp.path().join("out"));
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }
}
