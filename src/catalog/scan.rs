//! Segment discovery over an object store listing

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use super::errors::{CatalogError, CatalogResult};
use super::window::RecoveryWindow;
use crate::object_store::ObjectStore;
use crate::observability::Event;
use crate::timestamp::{parse_path_timestamp, TimestampError};

/// A replayable oplog segment. Recomputed on every scan, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SegmentDescriptor {
    /// Storage key
    pub key: String,
    /// Minute-resolution timestamp parsed from the key
    pub timestamp: DateTime<Utc>,
}

impl SegmentDescriptor {
    pub fn new(key: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            key: key.into(),
            timestamp,
        }
    }
}

/// A key that looked like a segment but could not be dated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedKey {
    pub key: String,
    pub reason: TimestampError,
}

/// Result of one catalog query
#[derive(Debug, Clone, Default)]
pub struct CatalogScan {
    /// Matching segments, ascending by timestamp
    pub segments: Vec<SegmentDescriptor>,
    /// Segment-shaped keys skipped because their timestamp was malformed
    pub skipped: Vec<SkippedKey>,
    /// Keys examined
    pub scanned: u64,
}

impl CatalogScan {
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Segment listing for one bucket and prefix
#[derive(Debug, Clone, Copy)]
pub struct SegmentCatalog<'a> {
    store: &'a dyn ObjectStore,
    bucket: &'a str,
    prefix: &'a str,
}

impl<'a> SegmentCatalog<'a> {
    pub fn new(store: &'a dyn ObjectStore, bucket: &'a str, prefix: &'a str) -> Self {
        Self {
            store,
            bucket,
            prefix,
        }
    }

    /// Find the segments inside `window`, sorted ascending.
    ///
    /// Filtering happens while the listing is consumed; only matches are
    /// buffered. An empty result means there is nothing to replay.
    pub fn find_segments(&self, window: &RecoveryWindow) -> CatalogResult<CatalogScan> {
        let mut scan = CatalogScan::default();

        if window.is_empty() {
            debug!(
                lower = %window.lower_exclusive(),
                target = %window.target(),
                "recovery window is empty, skipping listing"
            );
            return Ok(scan);
        }

        let listing_error = |source| CatalogError::Listing {
            bucket: self.bucket.to_string(),
            prefix: self.prefix.to_string(),
            source,
        };

        for key in self.store.list(self.bucket, self.prefix).map_err(listing_error)? {
            let key = key.map_err(listing_error)?;
            scan.scanned += 1;

            match parse_path_timestamp(&key) {
                Ok(ts) if window.contains(ts) => scan.segments.push(SegmentDescriptor::new(key, ts)),
                Ok(_) => {}
                Err(TimestampError::PathNotFound(_)) => {}
                Err(reason) => {
                    warn!(
                        event = %Event::SegmentKeySkipped,
                        key = %key,
                        error = %reason,
                        "skipping segment with unparseable timestamp"
                    );
                    scan.skipped.push(SkippedKey { key, reason });
                }
            }
        }

        scan.segments
            .sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.key.cmp(&b.key)));

        debug!(
            event = %Event::CatalogScanned,
            bucket = %self.bucket,
            prefix = %self.prefix,
            scanned = scan.scanned,
            matched = scan.segments.len(),
            skipped = scan.skipped.len(),
            "catalog scan complete"
        );

        Ok(scan)
    }
}
