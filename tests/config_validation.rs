//! Configuration Gate Tests
//!
//! Config files are validated into plans before any store or tool is
//! touched, and a valid file drives a complete run.

mod common;

use std::fs;

use mongo_pitr::config::{ConfigError, RestoreConfig};
use mongo_pitr::orchestrator::RecoveryOrchestrator;
use serde_json::json;
use tempfile::TempDir;

use common::*;

fn write_config(dir: &TempDir, value: serde_json::Value) -> std::path::PathBuf {
    let path = dir.path().join("restore.json");
    fs::write(&path, value.to_string()).unwrap();
    path
}

#[test]
fn test_config_file_drives_replay() {
    let fx = Fixture::new();
    fx.seed(OPLOG_BUCKET, &segment(13, 0), b"ops");
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        json!({
            "action": "SEGMENT_REPLAY",
            "full_dump_uri": backup_locator(),
            "mongo_uri": "mongodb://localhost:27017",
            "oplog_bucket_name": OPLOG_BUCKET,
            "env": "prod",
            "end_time": "2024/06/01 14:30",
            "staging_dir": fx.staging_dir.path(),
            "store": { "backend": "local", "local_root": fx.store_dir.path() }
        }),
    );

    let config = RestoreConfig::load(&path).unwrap();
    let plan = config.recovery_plan().unwrap();
    let store = config.store.build().unwrap();
    let restore = RecordingRestore::new();

    let report = RecoveryOrchestrator::new(store.as_ref(), &restore, fx.staging())
        .run(&plan)
        .unwrap();

    assert_eq!(report.applied_count(), 1);
    assert!(fx.staged_files().is_empty());
}

#[test]
fn test_invalid_action_reported_before_other_checks() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        json!({
            "action": "RESTORE_EVERYTHING",
            "full_dump_uri": backup_locator(),
            "mongo_uri": "mongodb://localhost:27017",
            "end_time": "not a time"
        }),
    );

    let err = RestoreConfig::load(&path).unwrap().recovery_plan().unwrap_err();
    assert!(matches!(err, ConfigError::InvalidAction(_)));
    assert_eq!(err.code(), "PITR_CONFIG_INVALID");
}

#[test]
fn test_replay_without_bucket_fails_before_resolve() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        json!({
            "action": "OPLOG_REPLAY",
            "full_dump_uri": "gs://mybucket/latest.gz",
            "mongo_uri": "mongodb://localhost:27017",
            "env": "prod"
        }),
    );

    // The locator has no timestamp; the missing bucket must be reported first.
    let err = RestoreConfig::load(&path).unwrap().recovery_plan().unwrap_err();
    assert_eq!(err.to_string(), "missing required setting: OPLOG_BUCKET_NAME");
}

#[test]
fn test_unknown_backend_in_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, json!({ "store": { "backend": "s3" } }));
    assert!(matches!(RestoreConfig::load(&path), Err(ConfigError::Parse { .. })));
}
