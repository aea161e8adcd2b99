//! Shared fakes for integration tests
//!
//! The object store is a real `LocalObjectStore` on a temp dir; the database
//! tools are recording fakes.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, TimeZone, Utc};
use mongo_pitr::object_store::LocalObjectStore;
use mongo_pitr::staging::StagingArea;
use mongo_pitr::tools::{DumpSpec, DumpTool, RestoreMode, RestoreTool, ToolError, ToolResult};
use tempfile::TempDir;

pub const BACKUP_BUCKET: &str = "mybucket";
pub const OPLOG_BUCKET: &str = "oplogs";
pub const BACKUP_KEY: &str = "prod/app/mongodb_backup_20240601_120000.gz";

pub fn at(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, h, m, 0).unwrap()
}

pub fn segment(h: u32, m: u32) -> String {
    format!("prod/2024/06/01/{:02}/{:02}/oplog.bson", h, m)
}

pub fn backup_locator() -> String {
    format!("gs://{}/{}", BACKUP_BUCKET, BACKUP_KEY)
}

/// Temp dirs for the store and the staging area
pub struct Fixture {
    pub store_dir: TempDir,
    pub staging_dir: TempDir,
    pub store: LocalObjectStore,
}

impl Fixture {
    pub fn new() -> Self {
        let store_dir = TempDir::new().expect("Failed to create temp dir");
        let staging_dir = TempDir::new().expect("Failed to create temp dir");
        let store = LocalObjectStore::new(store_dir.path());
        Self {
            store_dir,
            staging_dir,
            store,
        }
    }

    /// Place an object directly into the store
    pub fn seed(&self, bucket: &str, key: &str, content: &[u8]) {
        let path = self.store_dir.path().join(bucket).join(key);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    pub fn staging(&self) -> StagingArea {
        StagingArea::new(self.staging_dir.path())
    }

    /// Regular files left anywhere under the staging root
    pub fn staged_files(&self) -> Vec<PathBuf> {
        walk(self.staging_dir.path())
    }
}

fn walk(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if let Ok(entries) = fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                files.extend(walk(&path));
            } else {
                files.push(path);
            }
        }
    }
    files
}

/// One restore invocation as seen by the fake
#[derive(Debug, Clone)]
pub struct RestoreCall {
    pub path: PathBuf,
    pub mode: RestoreMode,
    /// Whether the staged file existed while the tool ran
    pub existed: bool,
    pub content: Vec<u8>,
}

/// Restore tool that records calls and fails for paths ending in `fail_on`
#[derive(Debug, Default)]
pub struct RecordingRestore {
    calls: Mutex<Vec<RestoreCall>>,
    fail_on: Option<String>,
}

impl RecordingRestore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(key: impl Into<String>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_on: Some(key.into()),
        }
    }

    pub fn calls(&self) -> Vec<RestoreCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Staged paths in call order, relative to the staging root and bucket
    pub fn keys(&self, staging_root: &Path, bucket: &str) -> Vec<String> {
        let base = staging_root.join(bucket);
        self.calls()
            .iter()
            .map(|c| {
                c.path
                    .strip_prefix(&base)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }
}

impl RestoreTool for RecordingRestore {
    fn restore(&self, source: &Path, mode: &RestoreMode) -> ToolResult<()> {
        let existed = source.is_file();
        let content = fs::read(source).unwrap_or_default();
        self.calls.lock().unwrap().push(RestoreCall {
            path: source.to_path_buf(),
            mode: mode.clone(),
            existed,
            content,
        });

        let failing = self
            .fail_on
            .as_deref()
            .map_or(false, |key| source.to_string_lossy().replace('\\', "/").ends_with(key));
        if failing {
            return Err(ToolError::ExitStatus {
                program: "mongorestore".to_string(),
                status: "exit status: 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Dump tool that writes fixed bytes to the requested output
#[derive(Debug, Default)]
pub struct FakeDump {
    pub specs: Mutex<Vec<DumpSpec>>,
}

impl DumpTool for FakeDump {
    fn dump(&self, spec: &DumpSpec) -> ToolResult<PathBuf> {
        let output = spec.output().clone();
        fs::create_dir_all(output.parent().unwrap()).unwrap();
        let content: &[u8] = match spec {
            DumpSpec::FullArchive { .. } => b"archive",
            DumpSpec::Oplog { .. } => b"oplog",
        };
        fs::write(&output, content).unwrap();
        self.specs.lock().unwrap().push(spec.clone());
        Ok(output)
    }
}
