//! # Google Cloud Storage through the `gcloud` CLI
//!
//! Listing streams `gcloud storage ls` output line by line so that very large
//! buckets never need to be held in memory.

use std::fs;
use std::io::{BufRead, BufReader, Lines, Read};
use std::path::Path;
use std::process::{Child, ChildStdout, Command, Stdio};

use tracing::debug;

use super::backend::{validate_key, KeyIter, ObjectStore};
use super::errors::{StorageError, StorageResult};

/// gcloud prints this when a wildcard listing matches nothing
const NO_MATCH_MARKER: &str = "matched no objects";

/// Object store backed by `gcloud storage`
#[derive(Debug, Clone)]
pub struct GcloudStore {
    program: String,
}

impl GcloudStore {
    /// Use `gcloud` from `PATH`
    pub fn new() -> Self {
        Self::with_program("gcloud")
    }

    /// Use a specific `gcloud` executable
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn object_url(bucket: &str, key: &str) -> String {
        format!("gs://{}/{}", bucket, key)
    }

    fn run(&self, args: &[String]) -> StorageResult<()> {
        debug!(program = %self.program, args = ?args, "running object store command");
        let output = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| StorageError::io(format!("spawn {}", self.program), e))?;

        if output.status.success() {
            return Ok(());
        }
        Err(StorageError::CommandFailed {
            program: self.program.clone(),
            status: output.status.to_string(),
            detail: last_line(&String::from_utf8_lossy(&output.stderr)),
        })
    }
}

impl Default for GcloudStore {
    fn default() -> Self {
        Self::new()
    }
}

fn last_line(text: &str) -> String {
    text.lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .unwrap_or("")
        .trim()
        .to_string()
}

/// Keys parsed from a running `gcloud storage ls`
struct ListingStream {
    program: String,
    url_prefix: String,
    child: Option<Child>,
    lines: Lines<BufReader<ChildStdout>>,
}

impl ListingStream {
    /// Reap the child once stdout is exhausted
    fn finish(&mut self) -> Option<StorageResult<String>> {
        let mut child = self.child.take()?;

        let mut stderr = String::new();
        if let Some(mut pipe) = child.stderr.take() {
            let _ = pipe.read_to_string(&mut stderr);
        }

        match child.wait() {
            Ok(status) if status.success() => None,
            Ok(_) if stderr.contains(NO_MATCH_MARKER) => None,
            Ok(status) => Some(Err(StorageError::CommandFailed {
                program: self.program.clone(),
                status: status.to_string(),
                detail: last_line(&stderr),
            })),
            Err(e) => Some(Err(StorageError::io(format!("wait for {}", self.program), e))),
        }
    }
}

impl Iterator for ListingStream {
    type Item = StorageResult<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.child.as_ref()?;
        loop {
            match self.lines.next() {
                Some(Ok(line)) => {
                    let Some(key) = line.trim().strip_prefix(&self.url_prefix) else {
                        continue;
                    };
                    if key.is_empty() || key.ends_with('/') {
                        continue;
                    }
                    return Some(Ok(key.to_string()));
                }
                Some(Err(e)) => {
                    let err = StorageError::io(format!("read {} output", self.program), e);
                    if let Some(mut child) = self.child.take() {
                        let _ = child.kill();
                        let _ = child.wait();
                    }
                    return Some(Err(err));
                }
                None => return self.finish(),
            }
        }
    }
}

impl Drop for ListingStream {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

impl ObjectStore for GcloudStore {
    fn list<'a>(&'a self, bucket: &str, prefix: &str) -> StorageResult<KeyIter<'a>> {
        let pattern = format!("{}**", Self::object_url(bucket, prefix));
        debug!(program = %self.program, pattern = %pattern, "listing objects");

        let mut child = Command::new(&self.program)
            .args(["storage", "ls", &pattern])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| StorageError::io(format!("spawn {}", self.program), e))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| StorageError::IoError(format!("{} stdout unavailable", self.program)))?;

        Ok(Box::new(ListingStream {
            program: self.program.clone(),
            url_prefix: format!("gs://{}/", bucket),
            child: Some(child),
            lines: BufReader::new(stdout).lines(),
        }))
    }

    fn get(&self, bucket: &str, key: &str, dest: &Path) -> StorageResult<()> {
        validate_key(key)?;
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| StorageError::io(format!("create {}", parent.display()), e))?;
        }
        self.run(&[
            "storage".to_string(),
            "cp".to_string(),
            Self::object_url(bucket, key),
            dest.display().to_string(),
        ])
    }

    fn put(&self, bucket: &str, key: &str, src: &Path) -> StorageResult<()> {
        validate_key(key)?;
        self.run(&[
            "storage".to_string(),
            "cp".to_string(),
            src.display().to_string(),
            Self::object_url(bucket, key),
        ])
    }
}
