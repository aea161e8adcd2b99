//! Requests passed to the dump and restore tools

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde_json::{json, Value};

/// System namespaces never restored from a full archive: session and
/// transaction state, change-image and pre-image collections, index-build
/// bookkeeping, and time-series/profile/view/stored-procedure collections.
pub const EXCLUDED_NAMESPACES: &[&str] = &[
    "admin.system.*",
    "admin.sessions.*",
    "local.*",
    "config.system.sessions",
    "config.transactions",
    "config.image_collection",
    "config.system.indexBuilds",
    "config.system.preimages",
    "*.system.buckets",
    "*.system.profile",
    "*.system.views",
    "*.system.js",
];

/// Namespace filter for a full archive restore
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespacePolicy {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    /// Drop destination collections before restoring them
    pub drop_existing: bool,
}

impl NamespacePolicy {
    /// All user namespaces, system collections excluded, destination dropped
    pub fn full_restore() -> Self {
        Self {
            include: vec!["*".to_string()],
            exclude: EXCLUDED_NAMESPACES.iter().map(|ns| ns.to_string()).collect(),
            drop_existing: true,
        }
    }
}

impl Default for NamespacePolicy {
    fn default() -> Self {
        Self::full_restore()
    }
}

/// Database-native oplog timestamp: seconds since epoch plus an ordinal
/// distinguishing operations within the same second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct BsonTimestamp {
    pub seconds: i64,
    pub ordinal: u32,
}

impl BsonTimestamp {
    pub fn new(seconds: i64, ordinal: u32) -> Self {
        Self { seconds, ordinal }
    }

    /// Extended-JSON form used in dump queries
    pub fn to_extended_json(self) -> Value {
        json!({ "$timestamp": { "t": self.seconds, "i": self.ordinal } })
    }
}

impl fmt::Display for BsonTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.seconds, self.ordinal)
    }
}

/// Replay cutoff. Replay never advances past this point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OplogLimit(BsonTimestamp);

impl OplogLimit {
    /// Cutoff at second precision for `target`, ordinal 0
    pub fn at(target: DateTime<Utc>) -> Self {
        Self(BsonTimestamp::new(target.timestamp(), 0))
    }

    pub fn timestamp(&self) -> BsonTimestamp {
        self.0
    }
}

impl fmt::Display for OplogLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Oplog range selected by a segment dump: `[start:1, end:0]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OplogRange {
    pub start: BsonTimestamp,
    pub end: BsonTimestamp,
}

impl OplogRange {
    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start: BsonTimestamp::new(start.timestamp(), 1),
            end: BsonTimestamp::new(end.timestamp(), 0),
        }
    }

    /// Dump query filter on the oplog `ts` field
    pub fn to_query(&self) -> Value {
        json!({
            "ts": {
                "$gte": self.start.to_extended_json(),
                "$lte": self.end.to_extended_json(),
            }
        })
    }
}

/// What a dump should produce
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DumpSpec {
    /// Gzip archive of the whole deployment
    FullArchive { output: PathBuf },
    /// Raw BSON dump of the oplog entries in `range`
    Oplog { output: PathBuf, range: OplogRange },
}

impl DumpSpec {
    pub fn output(&self) -> &PathBuf {
        match self {
            DumpSpec::FullArchive { output } | DumpSpec::Oplog { output, .. } => output,
        }
    }
}

/// How a staged artifact is applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreMode {
    /// Restore a gzip archive under a namespace policy
    Archive(NamespacePolicy),
    /// Replay an oplog dump, stopping at `limit`
    OplogReplay { limit: OplogLimit },
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_full_restore_policy() {
        let policy = NamespacePolicy::full_restore();
        assert_eq!(policy.include, vec!["*"]);
        assert!(policy.drop_existing);
        assert!(policy.exclude.iter().any(|ns| ns == "config.transactions"));
        assert!(policy.exclude.iter().any(|ns| ns == "*.system.views"));
        assert_eq!(policy.exclude.len(), 12);
    }

    #[test]
    fn test_oplog_limit_second_precision() {
        let target = Utc.with_ymd_and_hms(2024, 6, 1, 14, 30, 0).unwrap();
        let limit = OplogLimit::at(target);
        assert_eq!(limit.to_string(), format!("{}:0", target.timestamp()));
        assert_eq!(limit.to_string(), "1717252200:0");
    }

    #[test]
    fn test_range_query() {
        let end = Utc.with_ymd_and_hms(2024, 6, 1, 14, 0, 0).unwrap();
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 13, 0, 0).unwrap();
        let query = OplogRange::between(start, end).to_query();
        assert_eq!(query["ts"]["$gte"]["$timestamp"]["t"], start.timestamp());
        assert_eq!(query["ts"]["$gte"]["$timestamp"]["i"], 1);
        assert_eq!(query["ts"]["$lte"]["$timestamp"]["t"], end.timestamp());
        assert_eq!(query["ts"]["$lte"]["$timestamp"]["i"], 0);
    }
}
