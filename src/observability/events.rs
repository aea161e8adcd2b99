//! Observable events for mongo-pitr
//!
//! Every lifecycle log line carries one of these names in its `event` field
//! so that runs can be followed with a plain filter on the JSON output.
//!
//! Events are explicit and typed.

use std::fmt;

/// Observable events in a backup or recovery run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration loaded and validated
    ConfigLoaded,

    // Recovery run
    /// Recovery run started
    RecoveryStart,
    /// Full-backup locator resolved
    BackupResolved,
    /// Catalog listing complete
    CatalogScanned,
    /// Segment-shaped key skipped during a scan
    SegmentKeySkipped,
    /// No segments inside the recovery window
    NoSegments,
    /// Artifact downloaded to the staging area
    ArtifactStaged,
    /// Full archive restore started
    RestoreStart,
    /// Full archive restore complete
    RestoreComplete,
    /// Segment replay started
    SegmentApplyStart,
    /// Segment applied
    SegmentApplied,
    /// Segment outside the recovery window, not applied
    SegmentSkipped,
    /// Segment replay failed (run halts)
    SegmentFailed,
    /// Staged artifact removed
    ArtifactRemoved,
    /// Staged artifact could not be removed
    CleanupFailed,
    /// Recovery run finished successfully
    RecoveryComplete,
    /// Recovery run aborted
    RecoveryFailed,

    // Producer
    /// Dump tool started
    DumpStart,
    /// Dump tool finished
    DumpComplete,
    /// Artifact uploaded to the object store
    UploadComplete,
    /// Backup run failed
    BackupFailed,
}

impl Event {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::RecoveryStart => "RECOVERY_START",
            Event::BackupResolved => "BACKUP_RESOLVED",
            Event::CatalogScanned => "CATALOG_SCANNED",
            Event::SegmentKeySkipped => "SEGMENT_KEY_SKIPPED",
            Event::NoSegments => "NO_SEGMENTS",
            Event::ArtifactStaged => "ARTIFACT_STAGED",
            Event::RestoreStart => "RESTORE_START",
            Event::RestoreComplete => "RESTORE_COMPLETE",
            Event::SegmentApplyStart => "SEGMENT_APPLY_START",
            Event::SegmentApplied => "SEGMENT_APPLIED",
            Event::SegmentSkipped => "SEGMENT_SKIPPED",
            Event::SegmentFailed => "SEGMENT_FAILED",
            Event::ArtifactRemoved => "ARTIFACT_REMOVED",
            Event::CleanupFailed => "CLEANUP_FAILED",
            Event::RecoveryComplete => "RECOVERY_COMPLETE",
            Event::RecoveryFailed => "RECOVERY_FAILED",
            Event::DumpStart => "DUMP_START",
            Event::DumpComplete => "DUMP_COMPLETE",
            Event::UploadComplete => "UPLOAD_COMPLETE",
            Event::BackupFailed => "BACKUP_FAILED",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
