//! Timestamp codec for backup artifacts and oplog segments
//!
//! Two naming conventions carry recovery-window boundaries:
//!
//! - Full backups embed their creation time in the object name:
//!   `mongodb_backup_20240131_235900.gz`
//! - Oplog segments are stored under a minute-resolution path:
//!   `{env}/2024/01/31/23/00/oplog.bson`
//!
//! All timestamps are interpreted as UTC.

mod codec;
mod errors;

pub use codec::{
    format_embedded_timestamp, format_path_prefix, parse_embedded_timestamp,
    parse_path_timestamp, parse_target_time, segment_key, EMBEDDED_FORMAT, PATH_FORMAT,
    SEGMENT_FILE_NAME, TARGET_TIME_FORMAT,
};
pub use errors::{TimestampError, TimestampResult};
