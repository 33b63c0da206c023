use chrono::{DateTime, NaiveDateTime, Utc};

/// Parse a strict ISO 8601 millisecond-precision UTC timestamp, e.g.
/// `2016-01-01T00:00:00.000Z`.
///
/// Anything that is not exactly 24 characters ending in `Z` is rejected.
pub fn parse_iso8601_timestamp(timestamp: &str) -> Option<DateTime<Utc>> {
    if timestamp.len() != 24 || !timestamp.ends_with('Z') {
        return None;
    }

    NaiveDateTime::parse_from_str(&timestamp[..23], "%Y-%m-%dT%H:%M:%S%.3f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Format a UTC timestamp in the same millisecond-precision form
pub fn format_iso8601_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_valid_timestamp() {
        let parsed = parse_iso8601_timestamp("2016-05-29T11:45:13.381Z").unwrap();
        assert_eq!(
            parsed,
            Utc.with_ymd_and_hms(2016, 5, 29, 11, 45, 13).unwrap()
                + chrono::Duration::milliseconds(381)
        );
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        assert!(parse_iso8601_timestamp("2016-05-29T11:45:13Z").is_none());
        assert!(parse_iso8601_timestamp("").is_none());
    }

    #[test]
    fn test_parse_rejects_missing_zulu() {
        assert!(parse_iso8601_timestamp("2016-05-29T11:45:13.381X").is_none());
    }

    #[test]
    fn test_format_round_trip() {
        let raw = "2016-01-01T00:00:00.000Z";
        let parsed = parse_iso8601_timestamp(raw).unwrap();
        assert_eq!(format_iso8601_timestamp(parsed), raw);
    }
}
