//! Recovery window bounds

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

/// Default grace added past the target time when scanning for segments
pub const DEFAULT_GRACE_WINDOW_MINUTES: u32 = 60;

/// Time interval between a full backup and the requested recovery instant.
///
/// `lower_exclusive` is the backup creation time. The catalog keeps segments
/// in `(lower_exclusive, target + grace)`, both bounds strict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecoveryWindow {
    lower_exclusive: DateTime<Utc>,
    target: DateTime<Utc>,
    #[serde(skip)]
    grace: TimeDelta,
}

impl RecoveryWindow {
    /// Window with the default one-hour grace
    pub fn new(lower_exclusive: DateTime<Utc>, target: DateTime<Utc>) -> Self {
        Self::with_grace(
            lower_exclusive,
            target,
            TimeDelta::minutes(i64::from(DEFAULT_GRACE_WINDOW_MINUTES)),
        )
    }

    /// Window with an explicit grace period
    pub fn with_grace(lower_exclusive: DateTime<Utc>, target: DateTime<Utc>, grace: TimeDelta) -> Self {
        Self {
            lower_exclusive,
            target,
            grace,
        }
    }

    /// Backup creation time (exclusive)
    pub fn lower_exclusive(&self) -> DateTime<Utc> {
        self.lower_exclusive
    }

    /// Requested recovery instant; also the replay cutoff
    pub fn target(&self) -> DateTime<Utc> {
        self.target
    }

    /// Exclusive upper bound used when selecting segments.
    ///
    /// Saturates at the latest representable instant.
    pub fn relevant_end(&self) -> DateTime<Utc> {
        self.target
            .checked_add_signed(self.grace)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// A window whose target does not lie after the backup selects nothing
    pub fn is_empty(&self) -> bool {
        self.lower_exclusive >= self.target || self.lower_exclusive >= self.relevant_end()
    }

    /// Whether a segment at `ts` belongs to the window
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        !self.is_empty() && self.lower_exclusive < ts && ts < self.relevant_end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, h, m, 0).unwrap()
    }

    #[test]
    fn test_bounds_are_strict() {
        let w = RecoveryWindow::new(at(12, 0), at(14, 30));
        assert_eq!(w.relevant_end(), at(15, 30));
        assert!(!w.contains(at(12, 0)));
        assert!(w.contains(at(12, 1)));
        assert!(w.contains(at(14, 30)));
        assert!(w.contains(at(15, 29)));
        assert!(!w.contains(at(15, 30)));
    }

    #[test]
    fn test_inverted_window_is_empty() {
        let w = RecoveryWindow::new(at(16, 0), at(14, 0));
        assert!(w.is_empty());
        assert!(!w.contains(at(16, 30)));

        let w = RecoveryWindow::new(at(14, 0), at(14, 0));
        assert!(w.is_empty());
    }

    #[test]
    fn test_relevant_end_saturates() {
        let w = RecoveryWindow::new(at(12, 0), DateTime::<Utc>::MAX_UTC);
        assert_eq!(w.relevant_end(), DateTime::<Utc>::MAX_UTC);
        assert!(!w.is_empty());
        assert!(w.contains(at(13, 0)));
    }

    #[test]
    fn test_custom_grace() {
        let w = RecoveryWindow::with_grace(at(12, 0), at(14, 0), TimeDelta::minutes(15));
        assert!(w.contains(at(14, 14)));
        assert!(!w.contains(at(14, 15)));
    }
}
