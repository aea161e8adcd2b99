//! Backup producers
//!
//! One-shot producers for the two artifact kinds a recovery consumes:
//!
//! - Full backup: gzip archive uploaded to `<env>/<app>/mongodb_backup_<YYYYMMDD_HHMMSS>.gz`
//! - Oplog segment: oplog range dump uploaded to `<env>/<YYYY/MM/DD/HH/MM>/oplog.bson`
//!
//! Names are produced with the same codec the recovery side parses, so a
//! produced artifact always resolves back to the instant it was taken at.
//!
//! Scheduling is left to whatever runs these commands (cron, a Kubernetes
//! CronJob). Each invocation produces exactly one artifact.

mod errors;
mod full;
mod oplog;

pub use errors::{BackupError, BackupResult};
pub use full::{full_backup_file_name, run_full_backup, FullBackupPlan};
pub use oplog::{run_oplog_backup, OplogBackupPlan, OplogWindow, DEFAULT_INTERVAL_MINUTES};
