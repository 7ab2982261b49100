//! Pure accept/reject predicate for relay-close records.

use chrono::{DateTime, Utc};

/// Filter applied to every relay-close record before accumulation.
///
/// The time window is half-open: a record stamped exactly at `since` is
/// rejected, one stamped exactly at `before` is accepted. The name
/// filters compare display names, i.e. after alias resolution.
#[derive(Debug, Clone)]
pub struct RecordFilter {
    /// Exclusive lower bound of the reporting window.
    pub since: DateTime<Utc>,
    /// Inclusive upper bound of the reporting window.
    pub before: DateTime<Utc>,
    /// When set, only this user's sessions are counted.
    pub user: Option<String>,
    /// When set, only sessions to this asset are counted.
    pub asset: Option<String>,
}

impl RecordFilter {
    /// Whether `ts` falls inside the reporting window.
    pub fn accepts_time(&self, ts: DateTime<Utc>) -> bool {
        self.since < ts && ts <= self.before
    }

    /// Whether the resolved user and asset names pass the name filters.
    pub fn accepts_names(&self, user: &str, asset: &str) -> bool {
        self.user.as_deref().map(|u| u == user).unwrap_or(true)
            && self.asset.as_deref().map(|a| a == asset).unwrap_or(true)
    }

    /// Combined time and name predicate.
    pub fn accepts(&self, ts: DateTime<Utc>, user: &str, asset: &str) -> bool {
        self.accepts_time(ts) && self.accepts_names(user, asset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn window() -> RecordFilter {
        RecordFilter {
            since: utc("2025-08-01T00:00:00Z"),
            before: utc("2025-08-02T00:00:00Z"),
            user: None,
            asset: None,
        }
    }

    // ── Time window ───────────────────────────────────────────────────────────

    #[test]
    fn test_record_at_since_is_excluded() {
        let filter = window();
        assert!(!filter.accepts_time(filter.since));
    }

    #[test]
    fn test_record_just_after_since_is_included() {
        let filter = window();
        assert!(filter.accepts_time(filter.since + Duration::milliseconds(1)));
    }

    #[test]
    fn test_record_at_before_is_included() {
        let filter = window();
        assert!(filter.accepts_time(filter.before));
    }

    #[test]
    fn test_record_after_before_is_excluded() {
        let filter = window();
        assert!(!filter.accepts_time(filter.before + Duration::milliseconds(1)));
    }

    // ── Name filters ──────────────────────────────────────────────────────────

    #[test]
    fn test_no_name_filters_accept_everything() {
        let filter = window();
        assert!(filter.accepts_names("anyone", "anything"));
    }

    #[test]
    fn test_user_filter_is_exact() {
        let filter = RecordFilter {
            user: Some("Administrator".to_string()),
            ..window()
        };
        assert!(filter.accepts_names("Administrator", "My Pi"));
        assert!(!filter.accepts_names("administrator", "My Pi"));
        assert!(!filter.accepts_names("alice", "My Pi"));
    }

    #[test]
    fn test_both_filters_must_match() {
        let filter = RecordFilter {
            user: Some("Administrator".to_string()),
            asset: Some("My Pi".to_string()),
            ..window()
        };
        assert!(filter.accepts_names("Administrator", "My Pi"));
        assert!(!filter.accepts_names("Administrator", "Other"));
        assert!(!filter.accepts_names("alice", "My Pi"));
    }

    #[test]
    fn test_accepts_combines_time_and_names() {
        let filter = RecordFilter {
            user: Some("Administrator".to_string()),
            ..window()
        };
        let inside = utc("2025-08-01T12:00:00Z");
        let outside = utc("2025-08-03T12:00:00Z");
        assert!(filter.accepts(inside, "Administrator", "My Pi"));
        assert!(!filter.accepts(outside, "Administrator", "My Pi"));
        assert!(!filter.accepts(inside, "alice", "My Pi"));
    }
}
