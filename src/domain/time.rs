use chrono::{DateTime, NaiveDate, Utc};

/// Compact relative label used in recent-activity lists: "5m ago", "3h ago", "2d ago".
/// Timestamps in the future are reported as "0m ago".
pub fn format_time_ago(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - timestamp).num_minutes().max(0);

    if minutes < 60 {
        format!("{}m ago", minutes)
    } else if minutes < 24 * 60 {
        format!("{}h ago", minutes / 60)
    } else {
        format!("{}d ago", minutes / (24 * 60))
    }
}

/// Long display form: "Dec 31, 2025".
pub fn format_date(date: DateTime<Utc>) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Display form with time of day: "Jul 1, 2025, 9:05 AM".
pub fn format_date_time(date: DateTime<Utc>) -> String {
    date.format("%b %-d, %Y, %-I:%M %p").to_string()
}

/// Parse a YYYY-MM-DD date as midnight UTC.
pub fn parse_date(input: &str) -> Option<DateTime<Utc>> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn at(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_format_time_ago() {
        let now = at("2025-07-20T12:00:00Z");
        assert_eq!(format_time_ago(now, now), "0m ago");
        assert_eq!(format_time_ago(now - Duration::minutes(59), now), "59m ago");
        assert_eq!(format_time_ago(now - Duration::minutes(60), now), "1h ago");
        assert_eq!(format_time_ago(now - Duration::hours(23), now), "23h ago");
        assert_eq!(format_time_ago(now - Duration::hours(24), now), "1d ago");
        assert_eq!(format_time_ago(now - Duration::days(10), now), "10d ago");
        assert_eq!(format_time_ago(now + Duration::hours(2), now), "0m ago");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(at("2025-12-31T08:00:00Z")), "Dec 31, 2025");
        assert_eq!(
            format_date_time(at("2025-07-01T09:05:00Z")),
            "Jul 1, 2025, 9:05 AM"
        );
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2025-07-15"), Some(at("2025-07-15T00:00:00Z")));
        assert_eq!(parse_date("15/07/2025"), None);
        assert_eq!(parse_date("2025-02-30"), None);
    }
}
