//! CLI argument definitions using clap
//!
//! Commands:
//! - mongo-pitr restore [--config <path>]
//! - mongo-pitr backup full [--config <path>]
//! - mongo-pitr backup oplog [--config <path>]
//!
//! Every flag falls back to an environment variable. When `--config` is
//! given the file replaces the flags entirely.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::catalog::DEFAULT_GRACE_WINDOW_MINUTES;
use crate::backup::DEFAULT_INTERVAL_MINUTES;
use crate::config::{
    default_staging_dir, ConfigResult, FullBackupConfig, OplogBackupConfig, RestoreConfig,
    StoreBackend, StoreSettings, ToolSettings,
};
use crate::observability::{Event, LogFormat, LoggingConfig, DEFAULT_LOG_LEVEL};

/// mongo-pitr - point-in-time recovery for MongoDB from object storage
#[derive(Parser, Debug)]
#[command(name = "mongo-pitr")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log output format: json, pretty or compact
    #[arg(long, env = "LOG_FORMAT", default_value = "json", global = true)]
    pub log_format: LogFormat,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, env = "LOG_LEVEL", default_value = DEFAULT_LOG_LEVEL, global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Restore the full backup or replay oplog segments
    Restore(RestoreArgs),

    /// Produce backup artifacts
    #[command(subcommand)]
    Backup(BackupCommand),
}

#[derive(Subcommand, Debug)]
pub enum BackupCommand {
    /// Dump the whole deployment and upload the archive
    Full(FullBackupArgs),

    /// Dump the last oplog window and upload it as a segment
    Oplog(OplogBackupArgs),
}

/// Object store selection
#[derive(Args, Debug, Clone)]
pub struct StoreArgs {
    /// Object store backend: gcs or local
    #[arg(long, env = "STORAGE_BACKEND", default_value = "gcs")]
    pub storage_backend: StoreBackend,

    /// Root directory of the local backend
    #[arg(long, env = "LOCAL_STORE_ROOT")]
    pub local_store_root: Option<PathBuf>,

    /// gcloud executable
    #[arg(long, env = "GCLOUD_BIN", default_value = "gcloud")]
    pub gcloud_bin: String,
}

impl StoreArgs {
    fn settings(&self) -> StoreSettings {
        StoreSettings {
            backend: self.storage_backend,
            local_root: self.local_store_root.clone(),
            gcloud_bin: self.gcloud_bin.clone(),
        }
    }
}

/// External tool executables
#[derive(Args, Debug, Clone)]
pub struct ToolArgs {
    #[arg(long, env = "MONGODUMP_BIN", default_value = "mongodump")]
    pub mongodump_bin: String,

    #[arg(long, env = "MONGORESTORE_BIN", default_value = "mongorestore")]
    pub mongorestore_bin: String,
}

impl ToolArgs {
    fn settings(&self) -> ToolSettings {
        ToolSettings {
            mongodump_bin: self.mongodump_bin.clone(),
            mongorestore_bin: self.mongorestore_bin.clone(),
        }
    }
}

#[derive(Args, Debug)]
pub struct RestoreArgs {
    /// JSON config file, replaces all other flags
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// FULL_RESTORE or OPLOG_REPLAY
    #[arg(long, env = "ACTION")]
    pub action: Option<String>,

    /// Locator of the full backup archive
    #[arg(long, env = "FULL_DUMP_URI")]
    pub full_dump_uri: Option<String>,

    /// Connection string of the target deployment
    #[arg(long, env = "MONGO_URI", hide_env_values = true)]
    pub mongo_uri: Option<String>,

    /// Bucket holding the oplog segments
    #[arg(long, env = "OPLOG_BUCKET_NAME")]
    pub oplog_bucket_name: Option<String>,

    /// Environment prefix of the oplog segments
    #[arg(long, env = "ENV")]
    pub env: Option<String>,

    /// Recovery target, `YYYY/MM/DD HH:MM` UTC; defaults to now
    #[arg(long, env = "END_TIME")]
    pub end_time: Option<String>,

    /// Minutes past the target still scanned for segments
    #[arg(long, env = "GRACE_WINDOW_MINUTES", default_value_t = DEFAULT_GRACE_WINDOW_MINUTES)]
    pub grace_window_minutes: u32,

    /// Local directory for downloaded artifacts
    #[arg(long, env = "STAGING_DIR")]
    pub staging_dir: Option<PathBuf>,

    #[command(flatten)]
    pub store: StoreArgs,

    #[command(flatten)]
    pub tools: ToolArgs,
}

impl RestoreArgs {
    pub fn to_config(&self) -> ConfigResult<RestoreConfig> {
        if let Some(path) = &self.config {
            return RestoreConfig::load(path);
        }
        Ok(RestoreConfig {
            action: self.action.clone(),
            full_dump_uri: self.full_dump_uri.clone(),
            mongo_uri: self.mongo_uri.clone(),
            oplog_bucket_name: self.oplog_bucket_name.clone(),
            env: self.env.clone(),
            end_time: self.end_time.clone(),
            grace_window_minutes: self.grace_window_minutes,
            staging_dir: self.staging_dir.clone().unwrap_or_else(default_staging_dir),
            store: self.store.settings(),
            tools: self.tools.settings(),
        })
    }
}

#[derive(Args, Debug)]
pub struct FullBackupArgs {
    /// JSON config file, replaces all other flags
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, env = "MONGO_URI", hide_env_values = true)]
    pub mongo_uri: Option<String>,

    /// Destination bucket
    #[arg(long, env = "BUCKET_NAME")]
    pub bucket_name: Option<String>,

    #[arg(long, env = "ENV")]
    pub env: Option<String>,

    #[arg(long, env = "APP_NAME")]
    pub app_name: Option<String>,

    #[arg(long, env = "STAGING_DIR")]
    pub staging_dir: Option<PathBuf>,

    #[command(flatten)]
    pub store: StoreArgs,

    #[command(flatten)]
    pub tools: ToolArgs,
}

impl FullBackupArgs {
    pub fn to_config(&self) -> ConfigResult<FullBackupConfig> {
        if let Some(path) = &self.config {
            return FullBackupConfig::load(path);
        }
        Ok(FullBackupConfig {
            mongo_uri: self.mongo_uri.clone(),
            bucket_name: self.bucket_name.clone(),
            env: self.env.clone(),
            app_name: self.app_name.clone(),
            staging_dir: self.staging_dir.clone().unwrap_or_else(default_staging_dir),
            store: self.store.settings(),
            tools: self.tools.settings(),
        })
    }
}

#[derive(Args, Debug)]
pub struct OplogBackupArgs {
    /// JSON config file, replaces all other flags
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, env = "MONGO_URI", hide_env_values = true)]
    pub mongo_uri: Option<String>,

    /// Destination bucket
    #[arg(long, env = "OPLOG_BUCKET_NAME")]
    pub oplog_bucket_name: Option<String>,

    #[arg(long, env = "ENV")]
    pub env: Option<String>,

    /// Length of the dumped window in minutes
    #[arg(long, env = "INTERVAL_IN_MINS", default_value_t = DEFAULT_INTERVAL_MINUTES)]
    pub interval_in_mins: u32,

    #[arg(long, env = "STAGING_DIR")]
    pub staging_dir: Option<PathBuf>,

    #[command(flatten)]
    pub store: StoreArgs,

    #[command(flatten)]
    pub tools: ToolArgs,
}

impl OplogBackupArgs {
    pub fn to_config(&self) -> ConfigResult<OplogBackupConfig> {
        if let Some(path) = &self.config {
            return OplogBackupConfig::load(path);
        }
        Ok(OplogBackupConfig {
            mongo_uri: self.mongo_uri.clone(),
            oplog_bucket_name: self.oplog_bucket_name.clone(),
            env: self.env.clone(),
            interval_in_mins: self.interval_in_mins,
            staging_dir: self.staging_dir.clone().unwrap_or_else(default_staging_dir),
            store: self.store.settings(),
            tools: self.tools.settings(),
        })
    }
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    pub fn logging(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.log_level.clone(),
            format: self.log_format,
        }
    }
}

impl Command {
    /// Event logged when this command fails
    pub fn failure_event(&self) -> Event {
        match self {
            Command::Restore(_) => Event::RecoveryFailed,
            Command::Backup(_) => Event::BackupFailed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::RecoveryAction;

    #[test]
    fn test_parse_restore_flags() {
        let cli = Cli::try_parse_from([
            "mongo-pitr",
            "--log-format",
            "compact",
            "restore",
            "--action",
            "SEGMENT_REPLAY",
            "--full-dump-uri",
            "gs://mybucket/prod/app/mongodb_backup_20240601_120000.gz",
            "--mongo-uri",
            "mongodb://localhost:27017",
            "--oplog-bucket-name",
            "oplogs",
            "--env",
            "prod",
            "--end-time",
            "2024/06/01 14:30",
            "--grace-window-minutes",
            "30",
        ])
        .unwrap();
        assert_eq!(cli.log_format, LogFormat::Compact);

        let Command::Restore(args) = cli.command else {
            panic!("expected restore");
        };
        let plan = args.to_config().unwrap().recovery_plan().unwrap();
        assert_eq!(plan.action, RecoveryAction::OplogReplay);
        assert_eq!(plan.grace_window, chrono::TimeDelta::minutes(30));
    }

    #[test]
    fn test_config_file_replaces_flags() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("restore.json");
        std::fs::write(
            &path,
            r#"{"action": "FULL_RESTORE", "full_dump_uri": "gs://b/mongodb_backup_20240601_120000.gz", "mongo_uri": "mongodb://db"}"#,
        )
        .unwrap();

        let cli = Cli::try_parse_from([
            "mongo-pitr",
            "restore",
            "--config",
            path.to_str().unwrap(),
            "--action",
            "OPLOG_REPLAY",
        ])
        .unwrap();
        let Command::Restore(args) = cli.command else {
            panic!("expected restore");
        };
        let config = args.to_config().unwrap();
        assert_eq!(config.action.as_deref(), Some("FULL_RESTORE"));
    }

    #[test]
    fn test_parse_backup_commands() {
        let cli = Cli::try_parse_from([
            "mongo-pitr",
            "backup",
            "oplog",
            "--mongo-uri",
            "mongodb://db",
            "--oplog-bucket-name",
            "oplogs",
            "--env",
            "prod",
            "--interval-in-mins",
            "30",
        ])
        .unwrap();
        assert_eq!(cli.command.failure_event(), Event::BackupFailed);
        let Command::Backup(BackupCommand::Oplog(args)) = cli.command else {
            panic!("expected backup oplog");
        };
        assert_eq!(args.to_config().unwrap().plan().unwrap().interval_minutes, 30);

        let err = Cli::try_parse_from(["mongo-pitr", "backup", "oplog", "--interval-in-mins", "soon"]);
        assert!(err.is_err());
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let result = Cli::try_parse_from(["mongo-pitr", "restore", "--storage-backend", "s3"]);
        assert!(result.is_err());
    }
}
