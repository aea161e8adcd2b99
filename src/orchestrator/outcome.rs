//! Per-artifact outcomes and the run report

use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use uuid::Uuid;

use super::plan::RecoveryAction;
use crate::catalog::{RecoveryWindow, SkippedKey};
use crate::locator::BackupReference;
use crate::staging::CleanupOutcome;

/// What happened to one artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeStatus {
    Applied,
    /// Outside the recovery window; never staged
    Skipped { reason: String },
    Failed { cause: String },
}

impl OutcomeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeStatus::Applied => "applied",
            OutcomeStatus::Skipped { .. } => "skipped",
            OutcomeStatus::Failed { .. } => "failed",
        }
    }
}

/// Outcome of one artifact handled by the orchestrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentOutcome {
    pub key: String,
    /// Segment timestamp; `None` for the full archive
    pub timestamp: Option<DateTime<Utc>>,
    pub status: OutcomeStatus,
    /// `None` when nothing was staged
    pub cleanup: Option<CleanupOutcome>,
}

impl SegmentOutcome {
    pub fn is_applied(&self) -> bool {
        self.status == OutcomeStatus::Applied
    }
}

/// Summary of a successful run
#[derive(Debug, Clone)]
pub struct RecoveryReport {
    pub run_id: Uuid,
    pub action: RecoveryAction,
    pub backup: BackupReference,
    /// Set for `OPLOG_REPLAY`
    pub window: Option<RecoveryWindow>,
    pub outcomes: Vec<SegmentOutcome>,
    /// Catalog keys skipped because their timestamp was malformed
    pub skipped_keys: Vec<SkippedKey>,
}

impl RecoveryReport {
    pub fn applied_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_applied()).count()
    }

    /// One-line JSON summary printed by the CLI
    pub fn summary(&self) -> Value {
        json!({
            "run_id": self.run_id.to_string(),
            "action": self.action.as_str(),
            "backup": {
                "locator": self.backup.to_string(),
                "created_at": self.backup.created_at().to_rfc3339(),
            },
            "target_time": self.window.map(|w| w.target().to_rfc3339()),
            "applied": self.applied_count(),
            "outcomes": self.outcomes.iter().map(|o| json!({
                "key": o.key,
                "status": o.status.as_str(),
            })).collect::<Vec<_>>(),
            "skipped_keys": self.skipped_keys.iter().map(|s| s.key.clone()).collect::<Vec<_>>(),
        })
    }
}
