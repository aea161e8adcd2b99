//! Parsing and formatting of recovery-window boundaries

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;

use super::errors::{TimestampError, TimestampResult};

/// chrono format of the timestamp embedded in full-backup object names
pub const EMBEDDED_FORMAT: &str = "%Y%m%d_%H%M%S";

/// chrono format of the path segment that locates an oplog segment
pub const PATH_FORMAT: &str = "%Y/%m/%d/%H/%M";

/// chrono format accepted for an explicit recovery target
pub const TARGET_TIME_FORMAT: &str = "%Y/%m/%d %H:%M";

/// Terminal file name of every oplog segment key
pub const SEGMENT_FILE_NAME: &str = "oplog.bson";

static EMBEDDED_PATTERN: OnceLock<Regex> = OnceLock::new();
static PATH_PATTERN: OnceLock<Regex> = OnceLock::new();
static TARGET_PATTERN: OnceLock<Regex> = OnceLock::new();

fn embedded_pattern() -> &'static Regex {
    EMBEDDED_PATTERN.get_or_init(|| {
        Regex::new(r"(?:^|\D)(\d{8})_?(\d{6})(?:\D|$)").expect("embedded timestamp pattern is a valid literal")
    })
}

fn path_pattern() -> &'static Regex {
    PATH_PATTERN.get_or_init(|| {
        Regex::new(r"(?:^|/)(\d{4})/(\d{2})/(\d{2})/(\d{2})/(\d{2})/oplog\.bson$")
            .expect("path timestamp pattern is a valid literal")
    })
}

fn target_pattern() -> &'static Regex {
    TARGET_PATTERN.get_or_init(|| {
        Regex::new(r"^\d{4}/\d{2}/\d{2} \d{2}:\d{2}$").expect("target time pattern is a valid literal")
    })
}

/// Extract the creation time embedded in an artifact name.
///
/// Accepts both `YYYYMMDD_HHMMSS` and `YYYYMMDDHHMMSS`, bounded by non-digits.
/// The first match wins.
pub fn parse_embedded_timestamp(name: &str) -> TimestampResult<DateTime<Utc>> {
    let caps = embedded_pattern()
        .captures(name)
        .ok_or_else(|| TimestampError::NotFound(name.to_string()))?;

    let value = format!("{}{}", &caps[1], &caps[2]);
    NaiveDateTime::parse_from_str(&value, "%Y%m%d%H%M%S")
        .map(|naive| naive.and_utc())
        .map_err(|_| TimestampError::Malformed {
            source_name: name.to_string(),
            value,
        })
}

/// Extract the minute-resolution timestamp from an oplog segment key.
///
/// The `YYYY/MM/DD/HH/MM` components must immediately precede
/// [`SEGMENT_FILE_NAME`] at the end of the key.
pub fn parse_path_timestamp(key: &str) -> TimestampResult<DateTime<Utc>> {
    let caps = path_pattern()
        .captures(key)
        .ok_or_else(|| TimestampError::PathNotFound(key.to_string()))?;

    let malformed = || TimestampError::Malformed {
        source_name: key.to_string(),
        value: format!("{}/{}/{}/{}/{}", &caps[1], &caps[2], &caps[3], &caps[4], &caps[5]),
    };

    // All groups are \d{2,4}, so integer parsing cannot overflow.
    let field = |i: usize| caps[i].parse::<u32>().map_err(|_| malformed());
    let year = caps[1].parse::<i32>().map_err(|_| malformed())?;

    NaiveDate::from_ymd_opt(year, field(2)?, field(3)?)
        .and_then(|date| date.and_hms_opt(field(4).ok()?, field(5).ok()?, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(malformed)
}

/// Format a timestamp as the `YYYY/MM/DD/HH/MM` key component.
///
/// Seconds are dropped; the result round-trips through
/// [`parse_path_timestamp`] once [`SEGMENT_FILE_NAME`] is appended.
pub fn format_path_prefix(t: DateTime<Utc>) -> String {
    t.format(PATH_FORMAT).to_string()
}

/// Format a timestamp the way full-backup object names embed it.
pub fn format_embedded_timestamp(t: DateTime<Utc>) -> String {
    t.format(EMBEDDED_FORMAT).to_string()
}

/// Build the full storage key of the segment covering `t`.
pub fn segment_key(prefix: &str, t: DateTime<Utc>) -> String {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        format!("{}/{}", format_path_prefix(t), SEGMENT_FILE_NAME)
    } else {
        format!("{}/{}/{}", prefix, format_path_prefix(t), SEGMENT_FILE_NAME)
    }
}

/// Parse an operator-supplied recovery target (`YYYY/MM/DD HH:MM`, UTC).
pub fn parse_target_time(input: &str) -> TimestampResult<DateTime<Utc>> {
    let trimmed = input.trim();
    if !target_pattern().is_match(trimmed) {
        return Err(TimestampError::InvalidTargetTime(input.to_string()));
    }
    NaiveDateTime::parse_from_str(trimmed, TARGET_TIME_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| TimestampError::InvalidTargetTime(input.to_string()))
}
