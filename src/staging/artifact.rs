//! Staged artifact lifecycle

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::object_store::{validate_key, ObjectStore, StorageError, StorageResult};
use crate::observability::Event;

/// Result of removing a staged file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupOutcome {
    /// The file existed and was deleted
    Removed,
    /// The file was not there
    AlreadyAbsent,
    /// The file could not be deleted
    Failed(String),
}

/// Remove a staged file, logging the outcome.
pub fn remove_staged_file(path: &Path) -> CleanupOutcome {
    match fs::remove_file(path) {
        Ok(()) => {
            info!(event = %Event::ArtifactRemoved, path = %path.display(), "deleted staged file");
            CleanupOutcome::Removed
        }
        Err(e) if e.kind() == ErrorKind::NotFound => CleanupOutcome::AlreadyAbsent,
        Err(e) => {
            warn!(
                event = %Event::CleanupFailed,
                path = %path.display(),
                error = %e,
                "failed to delete staged file"
            );
            CleanupOutcome::Failed(e.to_string())
        }
    }
}

/// Local directory where remote artifacts are materialised
#[derive(Debug, Clone)]
pub struct StagingArea {
    root: PathBuf,
}

impl StagingArea {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Local path for `bucket/key`
    pub fn path_for(&self, bucket: &str, key: &str) -> StorageResult<PathBuf> {
        validate_key(bucket)?;
        validate_key(key)?;
        Ok(self.root.join(bucket).join(key))
    }

    /// Download `bucket/key` into the staging area.
    ///
    /// A failed download leaves no partial file behind.
    pub fn stage(&self, store: &dyn ObjectStore, bucket: &str, key: &str) -> StorageResult<StagedArtifact> {
        let path = self.path_for(bucket, key)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| StorageError::io(format!("create {}", parent.display()), e))?;
        }

        info!(bucket = %bucket, key = %key, "downloading artifact");
        if let Err(e) = store.get(bucket, key, &path) {
            remove_staged_file(&path);
            return Err(e);
        }
        info!(event = %Event::ArtifactStaged, path = %path.display(), "artifact staged");

        Ok(StagedArtifact {
            bucket: bucket.to_string(),
            key: key.to_string(),
            path,
            cleaned: None,
        })
    }
}

/// A downloaded artifact owned by one apply step.
///
/// Call [`StagedArtifact::cleanup`] when the step ends; if it is dropped
/// without cleanup the file is removed anyway.
#[derive(Debug)]
pub struct StagedArtifact {
    bucket: String,
    key: String,
    path: PathBuf,
    cleaned: Option<CleanupOutcome>,
}

impl StagedArtifact {
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Local file location
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the local file. Idempotent.
    pub fn cleanup(&mut self) -> CleanupOutcome {
        if let Some(outcome) = &self.cleaned {
            return outcome.clone();
        }
        let outcome = remove_staged_file(&self.path);
        self.cleaned = Some(outcome.clone());
        outcome
    }
}

impl Drop for StagedArtifact {
    fn drop(&mut self) {
        if self.cleaned.is_none() {
            self.cleanup();
        }
    }
}
