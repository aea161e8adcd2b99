//! Backup Producer Round-Trip Tests
//!
//! Artifacts produced by the backup commands must be found and applied by a
//! recovery run without any renaming.

mod common;

use chrono::{TimeZone, Utc};
use mongo_pitr::backup::{run_full_backup, run_oplog_backup, BackupError, FullBackupPlan, OplogBackupPlan};
use mongo_pitr::locator::resolve;
use mongo_pitr::object_store::{ObjectStore, StorageError, StorageResult};
use mongo_pitr::orchestrator::{RecoveryOrchestrator, RecoveryPlan, SegmentSource};
use mongo_pitr::timestamp::parse_path_timestamp;
use mongo_pitr::tools::DumpSpec;
use tempfile::TempDir;

use common::*;

fn full_plan(staging: &TempDir) -> FullBackupPlan {
    FullBackupPlan {
        bucket: BACKUP_BUCKET.to_string(),
        env: "prod".to_string(),
        app_name: "app".to_string(),
        staging_dir: staging.path().to_path_buf(),
        scheme: "local".to_string(),
    }
}

fn oplog_plan(staging: &TempDir) -> OplogBackupPlan {
    OplogBackupPlan {
        bucket: OPLOG_BUCKET.to_string(),
        env: "prod".to_string(),
        interval_minutes: 60,
        staging_dir: staging.path().to_path_buf(),
    }
}

#[test]
fn test_full_backup_locator_resolves() {
    let fx = Fixture::new();
    let staging = TempDir::new().unwrap();
    let dump = FakeDump::default();

    let locator = run_full_backup(&dump, &fx.store, &full_plan(&staging), at(12, 0)).unwrap();
    assert_eq!(locator, format!("local://{}/{}", BACKUP_BUCKET, BACKUP_KEY));

    let backup = resolve(&locator).unwrap();
    assert_eq!(backup.bucket(), BACKUP_BUCKET);
    assert_eq!(backup.object_path(), BACKUP_KEY);
    assert_eq!(backup.created_at(), at(12, 0));

    assert!(fx.store_dir.path().join(BACKUP_BUCKET).join(BACKUP_KEY).is_file());
    assert_eq!(std::fs::read_dir(staging.path()).unwrap().count(), 0);
}

#[test]
fn test_oplog_segment_key_parses_to_window_end() {
    let fx = Fixture::new();
    let staging = TempDir::new().unwrap();
    let dump = FakeDump::default();
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 13, 7, 42).unwrap();

    let key = run_oplog_backup(&dump, &fx.store, &oplog_plan(&staging), now).unwrap();

    assert_eq!(key, segment(13, 0));
    assert_eq!(parse_path_timestamp(&key).unwrap(), at(13, 0));

    let specs = dump.specs.lock().unwrap();
    match &specs[0] {
        DumpSpec::Oplog { range, .. } => {
            assert_eq!(range.start.seconds, at(12, 0).timestamp());
            assert_eq!(range.end.seconds, at(13, 0).timestamp());
        }
        other => panic!("unexpected dump: {other:?}"),
    }
}

#[test]
fn test_produced_artifacts_replay() {
    let fx = Fixture::new();
    let staging = TempDir::new().unwrap();
    let dump = FakeDump::default();

    let locator = run_full_backup(&dump, &fx.store, &full_plan(&staging), at(12, 0)).unwrap();
    for (h, m) in [(13, 5), (14, 5), (16, 5)] {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, h, m, 0).unwrap();
        run_oplog_backup(&dump, &fx.store, &oplog_plan(&staging), now).unwrap();
    }

    let restore = RecordingRestore::new();
    let plan = RecoveryPlan::oplog_replay(
        locator,
        SegmentSource::new(OPLOG_BUCKET, "prod"),
        Some(at(14, 30)),
    );
    let report = RecoveryOrchestrator::new(&fx.store, &restore, fx.staging())
        .run(&plan)
        .unwrap();

    assert_eq!(report.applied_count(), 2);
    assert_eq!(
        restore.keys(fx.staging_dir.path(), OPLOG_BUCKET),
        vec![segment(13, 0), segment(14, 0)]
    );
}

/// Store whose uploads always fail
#[derive(Debug)]
struct ReadOnlyStore;

impl ObjectStore for ReadOnlyStore {
    fn list<'a>(&'a self, _bucket: &str, _prefix: &str) -> StorageResult<mongo_pitr::object_store::KeyIter<'a>> {
        Ok(Box::new(std::iter::empty()))
    }

    fn get(&self, bucket: &str, key: &str, _dest: &std::path::Path) -> StorageResult<()> {
        Err(StorageError::ObjectNotFound {
            bucket: bucket.to_string(),
            key: key.to_string(),
        })
    }

    fn put(&self, _bucket: &str, _key: &str, _src: &std::path::Path) -> StorageResult<()> {
        Err(StorageError::IoError("read-only".to_string()))
    }
}

#[test]
fn test_failed_upload_removes_local_archive() {
    let staging = TempDir::new().unwrap();
    let dump = FakeDump::default();

    let err = run_full_backup(&dump, &ReadOnlyStore, &full_plan(&staging), at(12, 0)).unwrap_err();

    assert!(matches!(err, BackupError::Upload { .. }));
    assert_eq!(std::fs::read_dir(staging.path()).unwrap().count(), 0);
}
