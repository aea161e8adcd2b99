//! CLI command implementations
//!
//! Each command turns its arguments into a validated plan before touching
//! the object store or the database, wires the concrete store and tools,
//! runs once, and returns a JSON summary for stdout.

use chrono::Utc;
use serde_json::{json, Value};
use tracing::info;

use crate::backup::{run_full_backup, run_oplog_backup};
use crate::observability::Event;
use crate::orchestrator::RecoveryOrchestrator;
use crate::staging::StagingArea;

use super::args::{BackupCommand, Command, FullBackupArgs, OplogBackupArgs, RestoreArgs};
use super::errors::CliResult;

/// Dispatch a parsed command
pub fn run_command(command: &Command) -> CliResult<Value> {
    match command {
        Command::Restore(args) => restore(args),
        Command::Backup(BackupCommand::Full(args)) => backup_full(args),
        Command::Backup(BackupCommand::Oplog(args)) => backup_oplog(args),
    }
}

/// Run one recovery
pub fn restore(args: &RestoreArgs) -> CliResult<Value> {
    let config = args.to_config()?;
    let plan = config.recovery_plan()?;
    info!(
        event = %Event::ConfigLoaded,
        action = %plan.action,
        backup = %plan.backup_locator,
        staging_dir = %config.staging_dir.display(),
        "configuration loaded"
    );

    let store = config.store.build()?;
    let tools = config.tools.build(config.mongo_uri()?);
    let staging = StagingArea::new(config.staging_dir.clone());

    let report = RecoveryOrchestrator::new(store.as_ref(), &tools, staging).run(&plan)?;
    Ok(report.summary())
}

/// Produce one full backup
pub fn backup_full(args: &FullBackupArgs) -> CliResult<Value> {
    let config = args.to_config()?;
    let plan = config.plan()?;
    info!(
        event = %Event::ConfigLoaded,
        bucket = %plan.bucket,
        env = %plan.env,
        app = %plan.app_name,
        "configuration loaded"
    );

    let store = config.store.build()?;
    let tools = config.tools.build(config.mongo_uri()?);
    let locator = run_full_backup(&tools, store.as_ref(), &plan, Utc::now())?;
    Ok(json!({ "status": "ok", "locator": locator }))
}

/// Produce one oplog segment
pub fn backup_oplog(args: &OplogBackupArgs) -> CliResult<Value> {
    let config = args.to_config()?;
    let plan = config.plan()?;
    info!(
        event = %Event::ConfigLoaded,
        bucket = %plan.bucket,
        env = %plan.env,
        interval_minutes = plan.interval_minutes,
        "configuration loaded"
    );

    let store = config.store.build()?;
    let tools = config.tools.build(config.mongo_uri()?);
    let key = run_oplog_backup(&tools, store.as_ref(), &plan, Utc::now())?;
    Ok(json!({ "status": "ok", "bucket": plan.bucket, "key": key }))
}
