//! Oplog segment producer

use std::path::PathBuf;

use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use tracing::info;

use super::errors::{BackupError, BackupResult};
use crate::object_store::ObjectStore;
use crate::observability::Event;
use crate::staging::remove_staged_file;
use crate::timestamp::{segment_key, SEGMENT_FILE_NAME};
use crate::tools::{DumpSpec, DumpTool, OplogRange};

/// Default length of the window covered by one segment
pub const DEFAULT_INTERVAL_MINUTES: u32 = 60;

/// Parameters of one oplog segment dump
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OplogBackupPlan {
    pub bucket: String,
    pub env: String,
    pub interval_minutes: u32,
    pub staging_dir: PathBuf,
}

/// Time range covered by one segment, ending on an hour boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OplogWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl OplogWindow {
    /// Window of `interval_minutes` ending at `now` truncated to the hour
    pub fn ending_at(now: DateTime<Utc>, interval_minutes: u32) -> BackupResult<Self> {
        if interval_minutes == 0 {
            return Err(BackupError::InvalidWindow("interval must be positive".to_string()));
        }
        let end = now
            .duration_trunc(TimeDelta::hours(1))
            .map_err(|e| BackupError::InvalidWindow(e.to_string()))?;
        let start = end - TimeDelta::minutes(i64::from(interval_minutes));
        Ok(Self { start, end })
    }

    pub fn range(&self) -> OplogRange {
        OplogRange::between(self.start, self.end)
    }
}

/// Dump the oplog window ending before `now`, upload it under its
/// path-shaped key, remove the local copy. Returns the uploaded key.
pub fn run_oplog_backup(
    dump: &dyn DumpTool,
    store: &dyn ObjectStore,
    plan: &OplogBackupPlan,
    now: DateTime<Utc>,
) -> BackupResult<String> {
    let window = OplogWindow::ending_at(now, plan.interval_minutes)?;
    info!(start = %window.start, end = %window.end, "dumping oplog window");

    let output = plan.staging_dir.join(SEGMENT_FILE_NAME);
    let dumped = dump.dump(&DumpSpec::Oplog {
        output,
        range: window.range(),
    })?;

    let key = segment_key(&plan.env, window.end);
    info!(file = %dumped.display(), bucket = %plan.bucket, key = %key, "uploading oplog segment");
    let uploaded = store.put(&plan.bucket, &key, &dumped);
    remove_staged_file(&dumped);
    uploaded.map_err(|source| BackupError::Upload {
        key: key.clone(),
        source,
    })?;

    info!(event = %Event::UploadComplete, key = %key, "upload complete");
    Ok(key)
}
