//! Recovery state machine

use chrono::{DateTime, Utc};
use tracing::{error, info, info_span, warn};
use uuid::Uuid;

use super::errors::{RecoveryError, RecoveryResult};
use super::outcome::{OutcomeStatus, RecoveryReport, SegmentOutcome};
use super::plan::{RecoveryAction, RecoveryPlan};
use crate::catalog::{RecoveryWindow, SegmentCatalog, SegmentDescriptor};
use crate::locator::{resolve, BackupReference};
use crate::object_store::ObjectStore;
use crate::observability::Event;
use crate::staging::StagingArea;
use crate::tools::{NamespacePolicy, OplogLimit, RestoreMode, RestoreTool};

/// Sequential, single-threaded recovery driver.
///
/// Holds the external collaborators; all run parameters arrive in a
/// [`RecoveryPlan`].
#[derive(Debug)]
pub struct RecoveryOrchestrator<'a> {
    store: &'a dyn ObjectStore,
    restore: &'a dyn RestoreTool,
    staging: StagingArea,
}

impl<'a> RecoveryOrchestrator<'a> {
    pub fn new(store: &'a dyn ObjectStore, restore: &'a dyn RestoreTool, staging: StagingArea) -> Self {
        Self {
            store,
            restore,
            staging,
        }
    }

    /// Execute one recovery run.
    ///
    /// The plan is validated before anything is resolved, listed or
    /// downloaded.
    pub fn run(&self, plan: &RecoveryPlan) -> RecoveryResult<RecoveryReport> {
        plan.validate()?;

        let run_id = Uuid::new_v4();
        let span = info_span!("recovery", run_id = %run_id, action = %plan.action);
        let _entered = span.enter();
        info!(event = %Event::RecoveryStart, "recovery run started");

        let report = match plan.action {
            RecoveryAction::FullRestore => self.full_restore(plan, run_id)?,
            RecoveryAction::OplogReplay => self.oplog_replay(plan, run_id)?,
        };

        info!(
            event = %Event::RecoveryComplete,
            applied = report.applied_count(),
            "MongoDB restore process completed successfully"
        );
        Ok(report)
    }

    fn resolve_backup(&self, plan: &RecoveryPlan) -> RecoveryResult<BackupReference> {
        let backup = resolve(&plan.backup_locator)?;
        info!(
            event = %Event::BackupResolved,
            bucket = %backup.bucket(),
            object = %backup.object_path(),
            created_at = %backup.created_at(),
            "full backup details"
        );
        Ok(backup)
    }

    fn full_restore(&self, plan: &RecoveryPlan, run_id: Uuid) -> RecoveryResult<RecoveryReport> {
        let backup = self.resolve_backup(plan)?;
        let key = backup.object_path().to_string();

        let mut artifact = self
            .staging
            .stage(self.store, backup.bucket(), &key)
            .map_err(|source| RecoveryError::Staging {
                key: key.clone(),
                source,
            })?;

        info!(event = %Event::RestoreStart, archive = %artifact.path().display(), "restoring MongoDB from archive");
        let restored = self.restore.restore(
            artifact.path(),
            &RestoreMode::Archive(NamespacePolicy::full_restore()),
        );
        let cleanup = artifact.cleanup();
        restored.map_err(|source| RecoveryError::Restore {
            key: key.clone(),
            source,
        })?;
        info!(event = %Event::RestoreComplete, "MongoDB restore from archive completed");

        Ok(RecoveryReport {
            run_id,
            action: plan.action,
            backup,
            window: None,
            outcomes: vec![SegmentOutcome {
                key,
                timestamp: None,
                status: OutcomeStatus::Applied,
                cleanup: Some(cleanup),
            }],
            skipped_keys: Vec::new(),
        })
    }

    fn oplog_replay(&self, plan: &RecoveryPlan, run_id: Uuid) -> RecoveryResult<RecoveryReport> {
        let source = plan.replay_source()?;
        let backup = self.resolve_backup(plan)?;

        let target = plan.target_time.unwrap_or_else(Utc::now);
        let window = RecoveryWindow::with_grace(backup.created_at(), target, plan.grace_window);

        let scan = SegmentCatalog::new(self.store, &source.bucket, &source.prefix).find_segments(&window)?;

        let mut report = RecoveryReport {
            run_id,
            action: plan.action,
            backup,
            window: Some(window),
            outcomes: Vec::new(),
            skipped_keys: scan.skipped,
        };

        if scan.segments.is_empty() {
            warn!(
                event = %Event::NoSegments,
                lower = %window.lower_exclusive(),
                target = %window.target(),
                "no oplog files found for the given timeframe"
            );
            return Ok(report);
        }

        info!(
            segments = ?scan.segments.iter().map(|s| s.key.as_str()).collect::<Vec<_>>(),
            "oplog segments selected"
        );
        report.outcomes = self.replay_segments(&source.bucket, &scan.segments, &window)?;
        Ok(report)
    }

    /// Stage, replay and clean up each segment in order.
    ///
    /// Segments outside `window` are skipped. A segment older than one
    /// already applied aborts the run before it is staged. The first replay
    /// failure aborts the run; later segments are not attempted.
    pub fn replay_segments(
        &self,
        bucket: &str,
        segments: &[SegmentDescriptor],
        window: &RecoveryWindow,
    ) -> RecoveryResult<Vec<SegmentOutcome>> {
        let mode = RestoreMode::OplogReplay {
            limit: OplogLimit::at(window.target()),
        };
        let mut outcomes = Vec::with_capacity(segments.len());
        let mut previous: Option<DateTime<Utc>> = None;
        let mut applied = 0;

        for segment in segments {
            if !window.contains(segment.timestamp) {
                warn!(event = %Event::SegmentSkipped, key = %segment.key, "segment outside recovery window");
                outcomes.push(SegmentOutcome {
                    key: segment.key.clone(),
                    timestamp: Some(segment.timestamp),
                    status: OutcomeStatus::Skipped {
                        reason: "outside recovery window".to_string(),
                    },
                    cleanup: None,
                });
                continue;
            }

            if let Some(previous) = previous.filter(|p| segment.timestamp < *p) {
                return Err(RecoveryError::OrderingViolation {
                    key: segment.key.clone(),
                    timestamp: segment.timestamp,
                    previous,
                });
            }

            info!(event = %Event::SegmentApplyStart, key = %segment.key, "applying oplog segment");
            let mut artifact = self
                .staging
                .stage(self.store, bucket, &segment.key)
                .map_err(|source| RecoveryError::Staging {
                    key: segment.key.clone(),
                    source,
                })?;

            let replayed = self.restore.restore(artifact.path(), &mode);
            let cleanup = artifact.cleanup();

            match replayed {
                Ok(()) => {
                    info!(event = %Event::SegmentApplied, key = %segment.key, "oplog replay completed");
                    applied += 1;
                    previous = Some(segment.timestamp);
                    outcomes.push(SegmentOutcome {
                        key: segment.key.clone(),
                        timestamp: Some(segment.timestamp),
                        status: OutcomeStatus::Applied,
                        cleanup: Some(cleanup),
                    });
                }
                Err(source) => {
                    error!(
                        event = %Event::SegmentFailed,
                        key = %segment.key,
                        error = %source,
                        "failed to apply oplog"
                    );
                    outcomes.push(SegmentOutcome {
                        key: segment.key.clone(),
                        timestamp: Some(segment.timestamp),
                        status: OutcomeStatus::Failed {
                            cause: source.to_string(),
                        },
                        cleanup: Some(cleanup),
                    });
                    return Err(RecoveryError::SegmentFailed {
                        key: segment.key.clone(),
                        applied,
                        outcomes,
                        source,
                    });
                }
            }
        }

        Ok(outcomes)
    }
}
