use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use tracing::debug;

use crate::error::{ReportError, Result};

// ── Granularity ───────────────────────────────────────────────────────────────

/// Accepted aggregation periods in minutes: divisors of an hour, then whole
/// hours that divide a day, up to one day.
pub const VALID_GRANULARITIES: [u32; 17] = [
    1, 2, 3, 4, 5, 6, 10, 15, 20, 30, 60, 120, 180, 240, 360, 720, 1440,
];

/// Minutes in one day, the default and coarsest granularity.
pub const DAY_MINUTES: u32 = 1440;

/// Parse and validate a `--granularity` argument.
pub fn parse_granularity(arg: &str) -> Result<u32> {
    arg.parse::<u32>()
        .ok()
        .filter(|g| VALID_GRANULARITIES.contains(g))
        .ok_or_else(|| ReportError::InvalidGranularity(arg.to_string()))
}

// ── Bucketing ─────────────────────────────────────────────────────────────────

/// Floor `ts` to the start of its time bucket.
///
/// Seconds and sub-seconds are always dropped. For sub-hour granularities
/// the minute is floored to the nearest lower multiple; for 60 the minute
/// is zeroed; for multi-hour granularities the hour is floored to the
/// nearest lower multiple of `granularity / 60` as well.
pub fn bucket_start(ts: DateTime<Utc>, granularity: u32) -> DateTime<Utc> {
    let mut hour = ts.hour();
    let mut minute = ts.minute();

    if granularity >= 60 {
        minute = 0;
        let hours = granularity / 60;
        if hours > 1 {
            hour = hour / hours * hours;
        }
    } else if granularity > 1 {
        minute = minute / granularity * granularity;
    }

    ts.date_naive()
        .and_hms_opt(hour, minute, 0)
        .map(|naive| naive.and_utc())
        .unwrap_or(ts)
}

/// The string key under which a timestamp's bytes are accumulated.
///
/// Day granularity uses a date-only label; everything finer keeps the
/// bucket's hour and minute. Both orders lexicographically in
/// chronological order.
pub fn bucket_label(ts: DateTime<Utc>, granularity: u32) -> String {
    let start = bucket_start(ts, granularity);
    if granularity == DAY_MINUTES {
        start.format("%Y-%m-%d").to_string()
    } else {
        start.format("%Y-%m-%d %H:%M").to_string()
    }
}

// ── --since / --before parsing ────────────────────────────────────────────────

/// Input templates accepted for `--since` and `--before`, tried in order.
/// All of them are interpreted as UTC.
pub const TIME_FORMATS: [&str; 6] = [
    "%Y-%m-%dZ%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d",
    "%H:%M:%S",
    "%H:%M",
    "%Hh",
];

/// Which window bound is being parsed; the two differ in how a time-only
/// value in the future is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    Since,
    Before,
}

/// Lower bound used when `--since` is absent: 2000-01-01T00:00:00Z.
pub fn default_since() -> DateTime<Utc> {
    DateTime::from_timestamp(946_684_800, 0).unwrap_or_default()
}

/// clap value-parser for `--since`.
pub fn parse_since(arg: &str) -> Result<DateTime<Utc>> {
    parse_time_arg(arg, Bound::Since, Utc::now())
}

/// clap value-parser for `--before`.
pub fn parse_before(arg: &str) -> Result<DateTime<Utc>> {
    parse_time_arg(arg, Bound::Before, Utc::now())
}

/// Shared implementation; `now` is injected so tests are deterministic.
///
/// Time-only values are anchored to today's date. When that lands in the
/// future, `--since` assumes the same time yesterday and `--before` clamps
/// to now.
fn parse_time_arg(arg: &str, bound: Bound, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dZ%H:%M:%S", "%Y-%m-%d %H:%M:%S"];
    const CLOCK_FORMATS: [&str; 3] = ["%H:%M:%S", "%H:%M", "%Hh"];

    for fmt in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(arg, fmt) {
            return Ok(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(arg, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }

    for fmt in CLOCK_FORMATS {
        if let Ok(time) = NaiveTime::parse_from_str(arg, fmt) {
            let mut ts = now.date_naive().and_time(time).and_utc();
            if ts > now {
                match bound {
                    Bound::Since => {
                        debug!("\"{}\" is in the future; assuming yesterday", arg);
                        ts = ts - Duration::days(1);
                    }
                    Bound::Before => {
                        debug!("before \"{}\" is in the future; clamping to now", arg);
                        ts = now;
                    }
                }
            }
            return Ok(ts);
        }
    }

    Err(ReportError::TimestampParse(arg.to_string()))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    // ── parse_granularity ─────────────────────────────────────────────────────

    #[test]
    fn test_parse_granularity_accepts_valid_values() {
        for g in VALID_GRANULARITIES {
            assert_eq!(parse_granularity(&g.to_string()).unwrap(), g);
        }
    }

    #[test]
    fn test_parse_granularity_rejects_other_values() {
        for bad in ["0", "7", "45", "90", "2880", "sixty", ""] {
            assert!(parse_granularity(bad).is_err(), "{bad} should be rejected");
        }
    }

    // ── bucket_start ──────────────────────────────────────────────────────────

    #[test]
    fn test_bucket_start_drops_seconds_at_one_minute() {
        let ts = utc("2025-08-01T09:37:42Z");
        assert_eq!(bucket_start(ts, 1), utc("2025-08-01T09:37:00Z"));
    }

    #[test]
    fn test_bucket_start_floors_minutes() {
        let ts = utc("2025-08-01T09:37:42Z");
        assert_eq!(bucket_start(ts, 15), utc("2025-08-01T09:30:00Z"));
        assert_eq!(bucket_start(ts, 10), utc("2025-08-01T09:30:00Z"));
        assert_eq!(bucket_start(ts, 30), utc("2025-08-01T09:30:00Z"));
        assert_eq!(bucket_start(ts, 2), utc("2025-08-01T09:36:00Z"));
    }

    #[test]
    fn test_bucket_start_hour_granularity_zeroes_minutes() {
        let ts = utc("2025-08-01T09:37:42Z");
        assert_eq!(bucket_start(ts, 60), utc("2025-08-01T09:00:00Z"));
    }

    #[test]
    fn test_bucket_start_floors_hours() {
        let ts = utc("2025-08-01T09:37:42Z");
        assert_eq!(bucket_start(ts, 120), utc("2025-08-01T08:00:00Z"));
        assert_eq!(bucket_start(ts, 360), utc("2025-08-01T06:00:00Z"));
        assert_eq!(bucket_start(ts, 720), utc("2025-08-01T00:00:00Z"));
    }

    #[test]
    fn test_bucket_start_day_granularity_is_midnight() {
        let ts = utc("2025-08-01T23:59:59Z");
        assert_eq!(bucket_start(ts, DAY_MINUTES), utc("2025-08-01T00:00:00Z"));
    }

    #[test]
    fn test_bucket_start_idempotent() {
        let ts = utc("2025-08-01T09:37:42Z");
        for g in VALID_GRANULARITIES {
            let once = bucket_start(ts, g);
            assert_eq!(bucket_start(once, g), once, "granularity {g}");
        }
    }

    // ── bucket_label ──────────────────────────────────────────────────────────

    #[test]
    fn test_bucket_label_day_is_date_only() {
        let ts = utc("2025-08-01T14:03:00Z");
        assert_eq!(bucket_label(ts, DAY_MINUTES), "2025-08-01");
    }

    #[test]
    fn test_bucket_label_sub_day_keeps_time() {
        let ts = utc("2025-08-01T14:03:00Z");
        assert_eq!(bucket_label(ts, 60), "2025-08-01 14:00");
        assert_eq!(bucket_label(ts, 1), "2025-08-01 14:03");
    }

    #[test]
    fn test_bucket_label_idempotent_through_reparse() {
        let ts = utc("2025-08-01T14:03:27Z");
        let label = bucket_label(ts, 20);
        let reparsed = NaiveDateTime::parse_from_str(&label, "%Y-%m-%d %H:%M")
            .unwrap()
            .and_utc();
        assert_eq!(bucket_label(reparsed, 20), label);
    }

    // ── parse_time_arg ────────────────────────────────────────────────────────

    #[test]
    fn test_parse_full_datetime_formats() {
        let now = utc("2025-08-07T12:00:00Z");
        assert_eq!(
            parse_time_arg("2025-08-01Z09:30:00", Bound::Since, now).unwrap(),
            utc("2025-08-01T09:30:00Z")
        );
        assert_eq!(
            parse_time_arg("2025-08-01 09:30:00", Bound::Since, now).unwrap(),
            utc("2025-08-01T09:30:00Z")
        );
    }

    #[test]
    fn test_parse_date_only_is_midnight() {
        let now = utc("2025-08-07T12:00:00Z");
        assert_eq!(
            parse_time_arg("2025-08-01", Bound::Before, now).unwrap(),
            utc("2025-08-01T00:00:00Z")
        );
    }

    #[test]
    fn test_parse_time_only_past_uses_today() {
        let now = utc("2025-08-07T12:00:00Z");
        assert_eq!(
            parse_time_arg("09:30", Bound::Since, now).unwrap(),
            utc("2025-08-07T09:30:00Z")
        );
        assert_eq!(
            parse_time_arg("09:30:15", Bound::Since, now).unwrap(),
            utc("2025-08-07T09:30:15Z")
        );
        assert_eq!(
            parse_time_arg("9h", Bound::Since, now).unwrap(),
            utc("2025-08-07T09:00:00Z")
        );
    }

    #[test]
    fn test_parse_time_only_future_since_means_yesterday() {
        let now = utc("2025-08-07T08:00:00Z");
        assert_eq!(
            parse_time_arg("12h", Bound::Since, now).unwrap(),
            utc("2025-08-06T12:00:00Z")
        );
    }

    #[test]
    fn test_parse_time_only_future_before_clamps_to_now() {
        let now = utc("2025-08-07T08:00:00Z");
        assert_eq!(parse_time_arg("12h", Bound::Before, now).unwrap(), now);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let now = utc("2025-08-07T08:00:00Z");
        for bad in ["yesterday", "2025/08/01", "25h", ""] {
            assert!(
                parse_time_arg(bad, Bound::Since, now).is_err(),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_default_since_is_y2k() {
        assert_eq!(default_since(), utc("2000-01-01T00:00:00Z"));
    }
}
