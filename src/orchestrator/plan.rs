//! Validated input of a recovery run

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use super::errors::{RecoveryError, RecoveryResult};
use crate::catalog::DEFAULT_GRACE_WINDOW_MINUTES;

/// Recovery mode, selected by configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecoveryAction {
    /// Restore the full backup archive
    #[serde(rename = "FULL_RESTORE")]
    FullRestore,
    /// Replay oplog segments recorded after the full backup
    #[serde(rename = "OPLOG_REPLAY", alias = "SEGMENT_REPLAY")]
    OplogReplay,
}

impl RecoveryAction {
    /// Recognised configuration values
    pub const VALUES: [&'static str; 2] = ["FULL_RESTORE", "OPLOG_REPLAY"];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecoveryAction::FullRestore => "FULL_RESTORE",
            RecoveryAction::OplogReplay => "OPLOG_REPLAY",
        }
    }
}

impl fmt::Display for RecoveryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecoveryAction {
    type Err = RecoveryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "FULL_RESTORE" => Ok(RecoveryAction::FullRestore),
            "OPLOG_REPLAY" | "SEGMENT_REPLAY" => Ok(RecoveryAction::OplogReplay),
            other => Err(RecoveryError::Config(format!(
                "invalid value '{}' for ACTION, allowed values: {}",
                other,
                Self::VALUES.join(", ")
            ))),
        }
    }
}

/// Where oplog segments are catalogued
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentSource {
    pub bucket: String,
    /// Environment discriminator, always ending in `/`
    pub prefix: String,
}

impl SegmentSource {
    pub fn new(bucket: impl Into<String>, env: &str) -> Self {
        let env = env.trim().trim_matches('/');
        Self {
            bucket: bucket.into().trim().to_string(),
            prefix: if env.is_empty() {
                String::new()
            } else {
                format!("{}/", env)
            },
        }
    }
}

/// Everything one recovery run needs, built once at the entry point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveryPlan {
    pub action: RecoveryAction,
    /// `scheme://bucket/path/name_YYYYMMDD_HHMMSS.ext`
    pub backup_locator: String,
    /// Required for `OPLOG_REPLAY`
    pub segment_source: Option<SegmentSource>,
    /// Recovery instant; `None` means now
    pub target_time: Option<DateTime<Utc>>,
    /// Added to the target when scanning the catalog
    pub grace_window: TimeDelta,
}

impl RecoveryPlan {
    pub fn full_restore(backup_locator: impl Into<String>) -> Self {
        Self {
            action: RecoveryAction::FullRestore,
            backup_locator: backup_locator.into(),
            segment_source: None,
            target_time: None,
            grace_window: TimeDelta::minutes(i64::from(DEFAULT_GRACE_WINDOW_MINUTES)),
        }
    }

    pub fn oplog_replay(
        backup_locator: impl Into<String>,
        source: SegmentSource,
        target_time: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            action: RecoveryAction::OplogReplay,
            segment_source: Some(source),
            target_time,
            ..Self::full_restore(backup_locator)
        }
    }

    pub fn with_grace_window(mut self, grace: TimeDelta) -> Self {
        self.grace_window = grace;
        self
    }

    /// Reject plans that cannot run. Performs no I/O.
    pub fn validate(&self) -> RecoveryResult<()> {
        if self.backup_locator.trim().is_empty() {
            return Err(RecoveryError::Config("missing FULL_DUMP_URI".to_string()));
        }
        if self.grace_window < TimeDelta::zero() {
            return Err(RecoveryError::Config("grace window must not be negative".to_string()));
        }
        if self.action == RecoveryAction::OplogReplay {
            self.replay_source()?;
        }
        Ok(())
    }

    /// Segment source of an `OPLOG_REPLAY` plan
    pub fn replay_source(&self) -> RecoveryResult<&SegmentSource> {
        match &self.segment_source {
            Some(source) if !source.bucket.is_empty() && !source.prefix.is_empty() => Ok(source),
            _ => Err(RecoveryError::Config(
                "missing required setting for OPLOG_REPLAY: OPLOG_BUCKET_NAME, ENV".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_action() {
        assert_eq!("FULL_RESTORE".parse::<RecoveryAction>().unwrap(), RecoveryAction::FullRestore);
        assert_eq!("OPLOG_REPLAY".parse::<RecoveryAction>().unwrap(), RecoveryAction::OplogReplay);
        assert_eq!("SEGMENT_REPLAY".parse::<RecoveryAction>().unwrap(), RecoveryAction::OplogReplay);

        let err = "full_restore".parse::<RecoveryAction>().unwrap_err();
        assert_eq!(err.code(), "PITR_CONFIG_INVALID");
        assert!(err.to_string().contains("FULL_RESTORE, OPLOG_REPLAY"));
    }

    #[test]
    fn test_action_serde() {
        let action: RecoveryAction = serde_json::from_str("\"SEGMENT_REPLAY\"").unwrap();
        assert_eq!(action, RecoveryAction::OplogReplay);
        assert_eq!(serde_json::to_string(&RecoveryAction::FullRestore).unwrap(), "\"FULL_RESTORE\"");
    }

    #[test]
    fn test_segment_source_prefix() {
        assert_eq!(SegmentSource::new("b", "prod").prefix, "prod/");
        assert_eq!(SegmentSource::new("b", "/prod/").prefix, "prod/");
        assert_eq!(SegmentSource::new("b", "").prefix, "");
    }

    #[test]
    fn test_replay_requires_source() {
        let mut plan = RecoveryPlan::oplog_replay(
            "gs://b/mongodb_backup_20240601_120000.gz",
            SegmentSource::new("oplogs", "prod"),
            None,
        );
        assert!(plan.validate().is_ok());

        plan.segment_source = Some(SegmentSource::new("oplogs", ""));
        assert!(plan.validate().is_err());

        plan.segment_source = None;
        assert!(matches!(plan.validate(), Err(RecoveryError::Config(_))));
    }

    #[test]
    fn test_full_restore_needs_no_source() {
        let plan = RecoveryPlan::full_restore("gs://b/mongodb_backup_20240601_120000.gz");
        assert!(plan.validate().is_ok());
        assert!(RecoveryPlan::full_restore(" ").validate().is_err());
    }
}
