//! Shared utility functions for PDE crates.

/// Timestamp and interval parsing helpers
pub mod dates {
    use chrono::{Duration, NaiveDateTime};

    /// Formats accepted for user-supplied timestamps, tried in order.
    const INPUT_FORMATS: [&str; 3] = [
        "%Y-%m-%d %H:%M:%S",
        "%m/%d/%Y %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
    ];

    /// Parse a timestamp in "YYYY-MM-DD HH:MM:SS", "MM/DD/YYYY HH:MM:SS",
    /// or ISO-8601 "T" form.
    pub fn parse_timestamp(s: &str) -> anyhow::Result<NaiveDateTime> {
        let trimmed = s.trim();
        for format in INPUT_FORMATS {
            if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
                return Ok(parsed);
            }
        }
        anyhow::bail!("unrecognized timestamp: {:?}", s)
    }

    /// Format a timestamp as "YYYY-MM-DD HH:MM:SS"
    pub fn format_timestamp(ts: &NaiveDateTime) -> String {
        ts.format("%Y-%m-%d %H:%M:%S").to_string()
    }

    /// Format a timestamp for the IQ lab-data format: "MM/DD/YYYY HH:MM:SS"
    pub fn format_iq_timestamp(ts: &NaiveDateTime) -> String {
        ts.format("%m/%d/%Y %H:%M:%S").to_string()
    }

    /// Parse a grid interval like "30s", "15m", "1h", or "1d".
    pub fn parse_interval(s: &str) -> anyhow::Result<Duration> {
        let trimmed = s.trim();
        let (number, suffix) = trimmed.split_at(trimmed.len().saturating_sub(1));
        let count: i64 = number
            .parse()
            .map_err(|_| anyhow::anyhow!("bad interval: {:?}", s))?;
        if count <= 0 {
            anyhow::bail!("interval must be positive: {:?}", s);
        }
        match suffix {
            "s" => Ok(Duration::seconds(count)),
            "m" => Ok(Duration::minutes(count)),
            "h" => Ok(Duration::hours(count)),
            "d" => Ok(Duration::days(count)),
            _ => anyhow::bail!("bad interval unit (want s/m/h/d): {:?}", s),
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_parse_timestamp_formats() {
            let expected = parse_timestamp("2024-01-15 08:30:00").unwrap();
            assert_eq!(parse_timestamp("01/15/2024 08:30:00").unwrap(), expected);
            assert_eq!(parse_timestamp("2024-01-15T08:30:00").unwrap(), expected);
        }

        #[test]
        fn test_parse_timestamp_rejects_garbage() {
            assert!(parse_timestamp("yesterday").is_err());
        }

        #[test]
        fn test_format_round_trip() {
            let ts = parse_timestamp("2024-06-15 23:59:59").unwrap();
            assert_eq!(format_timestamp(&ts), "2024-06-15 23:59:59");
            assert_eq!(format_iq_timestamp(&ts), "06/15/2024 23:59:59");
        }

        #[test]
        fn test_parse_interval() {
            assert_eq!(parse_interval("30s").unwrap(), Duration::seconds(30));
            assert_eq!(parse_interval("15m").unwrap(), Duration::minutes(15));
            assert_eq!(parse_interval("1h").unwrap(), Duration::hours(1));
            assert_eq!(parse_interval("2d").unwrap(), Duration::days(2));
        }

        #[test]
        fn test_parse_interval_rejects_bad_input() {
            assert!(parse_interval("h").is_err());
            assert!(parse_interval("0m").is_err());
            assert!(parse_interval("-5m").is_err());
            assert!(parse_interval("10w").is_err());
        }
    }
}
