//! Staging area for downloaded artifacts
//!
//! A staged artifact is a local copy of a remote object that lives exactly
//! as long as one apply step. It is removed when the step ends, whether the
//! step succeeded or failed.
//!
//! # Cleanup rules
//!
//! - Removal is best-effort
//! - A file that is already gone is not an error
//! - Any other removal failure is logged and never escalated

mod artifact;

pub use artifact::{remove_staged_file, CleanupOutcome, StagedArtifact, StagingArea};
