//! Recovery orchestrator
//!
//! Drives one recovery run in one of two modes:
//!
//! - `FULL_RESTORE`: stage the full backup, restore it with the system
//!   namespaces excluded and destination collections dropped, clean up
//! - `OPLOG_REPLAY`: select the oplog segments between the backup time and
//!   the target time, then stage → replay → clean up each one in ascending
//!   order with the target time as the replay cutoff
//!
//! # Invariants
//!
//! - Configuration is validated before any I/O
//! - Segments are applied strictly in timestamp order, one at a time
//! - The first failed segment halts the run; later segments are not attempted
//! - Every staged artifact is removed when its step ends, success or failure
//! - Nothing is retried

mod errors;
mod outcome;
mod plan;
mod runner;

pub use errors::{RecoveryError, RecoveryResult};
pub use outcome::{OutcomeStatus, RecoveryReport, SegmentOutcome};
pub use plan::{RecoveryAction, RecoveryPlan, SegmentSource};
pub use runner::RecoveryOrchestrator;
