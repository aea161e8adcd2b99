//! `mongodump` / `mongorestore` backend

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, info};

use super::errors::{ToolError, ToolResult};
use super::policy::{DumpSpec, NamespacePolicy, OplogLimit, RestoreMode};
use super::{DumpTool, RestoreTool};
use crate::observability::Event;

/// Runs the MongoDB database tools against one deployment
#[derive(Clone)]
pub struct MongoTools {
    uri: String,
    mongodump: String,
    mongorestore: String,
}

impl std::fmt::Debug for MongoTools {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MongoTools")
            .field("uri", &"<redacted>")
            .field("mongodump", &self.mongodump)
            .field("mongorestore", &self.mongorestore)
            .finish()
    }
}

/// Replace the connection string in an argument list
pub fn redact_args(args: &[String]) -> Vec<String> {
    args.iter()
        .map(|arg| {
            if arg.starts_with("--uri=") {
                "--uri=<redacted>".to_string()
            } else {
                arg.clone()
            }
        })
        .collect()
}

impl MongoTools {
    /// Tools from `PATH` against `uri`
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            mongodump: "mongodump".to_string(),
            mongorestore: "mongorestore".to_string(),
        }
    }

    /// Override the executables
    pub fn with_programs(mut self, mongodump: impl Into<String>, mongorestore: impl Into<String>) -> Self {
        self.mongodump = mongodump.into();
        self.mongorestore = mongorestore.into();
        self
    }

    fn uri_arg(&self) -> String {
        format!("--uri={}", self.uri)
    }

    /// Arguments for a full archive restore
    pub fn archive_restore_args(&self, archive: &Path, policy: &NamespacePolicy) -> Vec<String> {
        let mut args = vec![self.uri_arg()];
        args.extend(policy.include.iter().map(|ns| format!("--nsInclude={}", ns)));
        args.extend(policy.exclude.iter().map(|ns| format!("--nsExclude={}", ns)));
        args.push("--gzip".to_string());
        args.push(format!("--archive={}", archive.display()));
        if policy.drop_existing {
            args.push("--drop".to_string());
        }
        args
    }

    /// Arguments for replaying one oplog dump up to `limit`
    pub fn oplog_replay_args(&self, oplog_file: &Path, limit: OplogLimit) -> ToolResult<Vec<String>> {
        let dir = oplog_file.parent().ok_or_else(|| {
            ToolError::InvalidRequest(format!("oplog file has no parent: {}", oplog_file.display()))
        })?;
        Ok(vec![
            self.uri_arg(),
            "--oplogReplay".to_string(),
            format!("--oplogLimit={}", limit),
            format!("--oplogFile={}", oplog_file.display()),
            format!("--dir={}/", dir.display()),
        ])
    }

    /// Arguments for a full gzip archive dump
    pub fn archive_dump_args(&self, output: &Path) -> Vec<String> {
        vec![
            self.uri_arg(),
            "--gzip".to_string(),
            format!("--archive={}", output.display()),
        ]
    }

    /// Arguments for an oplog range dump written to stdout
    pub fn oplog_dump_args(&self, query: &serde_json::Value) -> Vec<String> {
        vec![
            self.uri_arg(),
            "--db=local".to_string(),
            "--collection=oplog.rs".to_string(),
            format!("--query={}", query),
            "--out".to_string(),
            "-".to_string(),
        ]
    }

    fn run(&self, program: &str, args: &[String], stdout: Stdio) -> ToolResult<()> {
        debug!(program = %program, args = ?redact_args(args), "running external tool");
        let status = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| ToolError::Spawn {
                program: program.to_string(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(ToolError::ExitStatus {
                program: program.to_string(),
                status: status.to_string(),
            })
        }
    }
}

fn ensure_parent(path: &Path) -> ToolResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| ToolError::Io {
            context: format!("create {}", parent.display()),
            source,
        })?;
    }
    Ok(())
}

impl RestoreTool for MongoTools {
    fn restore(&self, source: &Path, mode: &RestoreMode) -> ToolResult<()> {
        match mode {
            RestoreMode::Archive(policy) => {
                info!(archive = %source.display(), "restoring from archive");
                let args = self.archive_restore_args(source, policy);
                self.run(&self.mongorestore, &args, Stdio::inherit())
            }
            RestoreMode::OplogReplay { limit } => {
                info!(oplog_file = %source.display(), limit = %limit, "replaying oplog");
                let args = self.oplog_replay_args(source, *limit)?;
                self.run(&self.mongorestore, &args, Stdio::null())
            }
        }
    }
}

impl DumpTool for MongoTools {
    fn dump(&self, spec: &DumpSpec) -> ToolResult<PathBuf> {
        ensure_parent(spec.output())?;
        info!(event = %Event::DumpStart, output = %spec.output().display(), "running mongodump");

        match spec {
            DumpSpec::FullArchive { output } => {
                let args = self.archive_dump_args(output);
                self.run(&self.mongodump, &args, Stdio::inherit())?;
            }
            DumpSpec::Oplog { output, range } => {
                let file = File::create(output).map_err(|source| ToolError::Io {
                    context: format!("create {}", output.display()),
                    source,
                })?;
                let args = self.oplog_dump_args(&range.to_query());
                self.run(&self.mongodump, &args, Stdio::from(file))?;
            }
        }

        info!(event = %Event::DumpComplete, output = %spec.output().display(), "dump completed");
        Ok(spec.output().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::OplogRange;
    use chrono::{TimeZone, Utc};

    fn tools() -> MongoTools {
        MongoTools::new("mongodb://user:secret@db:27017")
    }

    #[test]
    fn test_archive_restore_args() {
        let args = tools().archive_restore_args(
            Path::new("/tmp/b/prod/mongodb_backup_20240601_120000.gz"),
            &NamespacePolicy::full_restore(),
        );
        assert_eq!(args[0], "--uri=mongodb://user:secret@db:27017");
        assert_eq!(args[1], "--nsInclude=*");
        assert!(args.contains(&"--nsExclude=config.system.preimages".to_string()));
        assert!(args.contains(&"--gzip".to_string()));
        assert!(args.contains(&"--archive=/tmp/b/prod/mongodb_backup_20240601_120000.gz".to_string()));
        assert_eq!(args.last().unwrap(), "--drop");
    }

    #[test]
    fn test_oplog_replay_args() {
        let target = Utc.with_ymd_and_hms(2024, 6, 1, 14, 30, 0).unwrap();
        let args = tools()
            .oplog_replay_args(Path::new("/tmp/b/prod/2024/06/01/13/00/oplog.bson"), OplogLimit::at(target))
            .unwrap();
        assert_eq!(
            &args[1..],
            &[
                "--oplogReplay".to_string(),
                "--oplogLimit=1717252200:0".to_string(),
                "--oplogFile=/tmp/b/prod/2024/06/01/13/00/oplog.bson".to_string(),
                "--dir=/tmp/b/prod/2024/06/01/13/00/".to_string(),
            ]
        );
    }

    #[test]
    fn test_oplog_dump_args() {
        let end = Utc.with_ymd_and_hms(2024, 6, 1, 14, 0, 0).unwrap();
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 13, 0, 0).unwrap();
        let args = tools().oplog_dump_args(&OplogRange::between(start, end).to_query());
        assert!(args.contains(&"--db=local".to_string()));
        assert!(args.contains(&"--collection=oplog.rs".to_string()));
        let query = args.iter().find(|a| a.starts_with("--query=")).unwrap();
        assert!(query.contains("\"$gte\""));
        assert!(query.contains(&start.timestamp().to_string()));
    }

    #[test]
    fn test_redaction() {
        let redacted = redact_args(&tools().archive_dump_args(Path::new("/tmp/x.gz")));
        assert_eq!(redacted[0], "--uri=<redacted>");
        assert!(!format!("{:?}", tools()).contains("secret"));
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let tools = tools().with_programs("no-such-mongodump", "no-such-mongorestore");
        let err = tools
            .restore(Path::new("/tmp/x.gz"), &RestoreMode::Archive(NamespacePolicy::full_restore()))
            .unwrap_err();
        assert!(matches!(err, ToolError::Spawn { .. }));
    }
}
