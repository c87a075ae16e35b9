use chrono::{DateTime, NaiveDate, NaiveDateTime};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%m/%d/%Y"];

pub fn format_timestamp(value: &NaiveDateTime) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

/// Parses the mixed timestamp layouts found in reading tables.
/// Unparseable text yields `None` rather than an error.
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.naive_local());
    }
    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(parsed);
        }
    }
    // day-first wins when both readings are valid
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parse_timestamp_accepts_mixed_layouts() {
        let plain = parse_timestamp("2024-01-05").expect("date only");
        assert_eq!((plain.year(), plain.month(), plain.day()), (2024, 1, 5));

        let stamped = parse_timestamp("2024-01-05 13:45:10").expect("live layout");
        assert_eq!((stamped.hour(), stamped.minute(), stamped.second()), (13, 45, 10));

        assert!(parse_timestamp("2024-01-05T13:45:10").is_some());
        assert!(parse_timestamp("2024-01-05T13:45:10+05:30").is_some());
        assert!(parse_timestamp("2024-01-05 13:45").is_some());

        let day_first = parse_timestamp("25/01/2024").expect("day first");
        assert_eq!((day_first.month(), day_first.day()), (1, 25));
    }

    #[test]
    fn parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("2024-13-45").is_none());
    }

    #[test]
    fn format_timestamp_uses_second_precision() {
        let value = parse_timestamp("2024-03-09T07:08:09.750").expect("fractional seconds");
        assert_eq!(format_timestamp(&value), "2024-03-09 07:08:09");
    }
}
