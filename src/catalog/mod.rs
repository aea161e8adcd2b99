//! Segment catalog
//!
//! Selects the oplog segments that must be replayed on top of a full backup.
//!
//! A segment qualifies when its path timestamp falls strictly inside
//! `(backup_time, target_time + grace)`. The grace window tolerates segment
//! producers that upload a little after the nominal hour boundary.
//!
//! # Scan policy
//!
//! - Keys without the segment path shape are ignored silently
//! - Keys with the shape but an impossible date are logged and skipped
//! - Listing failures abort the scan
//! - Matches are sorted explicitly; listing order is never trusted

mod errors;
mod scan;
mod window;

pub use errors::{CatalogError, CatalogResult};
pub use scan::{CatalogScan, SegmentCatalog, SegmentDescriptor, SkippedKey};
pub use window::{RecoveryWindow, DEFAULT_GRACE_WINDOW_MINUTES};
