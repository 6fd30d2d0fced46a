/// Utility functions for timestamps, rounding and log formatting
use std::sync::OnceLock;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

/// ISO-8601 local datetime with microsecond precision and no offset
const ISO_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:6]");

/// Same as [`ISO_FORMAT`] for whole seconds, where the fraction is omitted
const ISO_WHOLE_SECOND_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

/// Accepts timestamps with or without the fractional part
const ISO_PARSE_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]");

/// Second-resolution stamp embedded in file names (sorts chronologically)
const FILE_STAMP_FORMAT: &[FormatItem<'static>] =
    format_description!("[year][month][day]_[hour][minute][second]");

const LOG_FORMAT: &[FormatItem<'static>] =
    format_description!("[day].[month].[year] - [hour]:[minute]:[second]");

static LOCAL_OFFSET: OnceLock<UtcOffset> = OnceLock::new();

/// Current wall-clock time in the local zone, truncated to microseconds
///
/// The offset is looked up once and reused. It falls back to UTC when it
/// cannot be determined (the `time` crate refuses to read it while other
/// threads are running), so the first call should happen before any
/// blocking I/O starts.
pub fn now_local() -> PrimitiveDateTime {
    let offset = *LOCAL_OFFSET
        .get_or_init(|| UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC));
    let now = OffsetDateTime::now_utc().to_offset(offset);
    let now = PrimitiveDateTime::new(now.date(), now.time());
    let micros_only = now.nanosecond() / 1_000 * 1_000;
    now.replace_nanosecond(micros_only).unwrap_or(now)
}

/// Format a timestamp as `YYYY-MM-DDTHH:MM:SS.ffffff`
///
/// The fraction is left out entirely when it is zero.
pub fn format_iso(dt: &PrimitiveDateTime) -> String {
    let format = if dt.nanosecond() == 0 {
        ISO_WHOLE_SECOND_FORMAT
    } else {
        ISO_FORMAT
    };
    dt.format(format).unwrap_or_else(|_| dt.to_string())
}

/// Parse a timestamp written by [`format_iso`] (fraction optional)
pub fn parse_iso(value: &str) -> Result<PrimitiveDateTime, time::error::Parse> {
    PrimitiveDateTime::parse(value, ISO_PARSE_FORMAT)
}

/// Format a timestamp as `YYYYMMDD_HHMMSS` for file names
pub fn file_stamp(dt: &PrimitiveDateTime) -> String {
    dt.format(FILE_STAMP_FORMAT).unwrap_or_else(|_| dt.to_string())
}

/// Local time as `DD.MM.YYYY - HH:MM:SS` for log lines
pub fn format_datetime(dt: &PrimitiveDateTime) -> String {
    dt.format(LOG_FORMAT).unwrap_or_else(|_| dt.to_string())
}

/// Round a measurement to one decimal place
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Arithmetic mean, `None` for an empty set
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Redact an API key for logging
///
/// Keys longer than six characters show only their first and last three
/// characters. Shorter keys are shown as they are.
pub fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 6 {
        return key.to_string();
    }

    let head: String = chars[..3].iter().collect();
    let tail: String = chars[chars.len() - 3..].iter().collect();
    format!("{}...{}", head, tail)
}

/// Serde adapter storing a `PrimitiveDateTime` as an ISO-8601 string
pub mod iso_timestamp {
    use serde::{de, Deserialize, Deserializer, Serializer};
    use time::PrimitiveDateTime;

    pub fn serialize<S>(dt: &PrimitiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_iso(dt))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<PrimitiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_iso(&raw).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_iso_format_keeps_microseconds() {
        let dt = datetime!(2024-03-05 07:08:09.123456);
        assert_eq!(format_iso(&dt), "2024-03-05T07:08:09.123456");
        assert_eq!(parse_iso("2024-03-05T07:08:09.123456").unwrap(), dt);
    }

    #[test]
    fn test_iso_format_drops_zero_fraction() {
        let dt = datetime!(2024-03-05 07:08:09);
        assert_eq!(format_iso(&dt), "2024-03-05T07:08:09");
        assert_eq!(
            format_iso(&datetime!(2024-03-05 07:08:09.000001)),
            "2024-03-05T07:08:09.000001"
        );
        assert_eq!(parse_iso(&format_iso(&dt)).unwrap(), dt);
    }

    #[test]
    fn test_parse_iso_without_fraction() {
        let dt = parse_iso("2024-03-05T07:08:09").unwrap();
        assert_eq!(dt, datetime!(2024-03-05 07:08:09));
    }

    #[test]
    fn test_file_stamp() {
        let dt = datetime!(2024-12-31 23:59:58.5);
        assert_eq!(file_stamp(&dt), "20241231_235958");
    }

    #[test]
    fn test_format_datetime() {
        let dt = datetime!(2024-01-02 03:04:05);
        assert_eq!(format_datetime(&dt), "02.01.2024 - 03:04:05");
    }

    #[test]
    fn test_now_local_has_microsecond_precision() {
        let now = now_local();
        assert_eq!(now.nanosecond() % 1_000, 0);
        assert_eq!(parse_iso(&format_iso(&now)).unwrap(), now);
    }

    #[test]
    fn test_round_to_tenth() {
        assert_eq!(round_to_tenth(23.46), 23.5);
        assert_eq!(round_to_tenth(15.0), 15.0);
        assert_eq!(round_to_tenth(1029.94), 1029.9);
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(Vec::new()), None);
        assert_eq!(mean(vec![20.0]), Some(20.0));
        assert_eq!(mean(vec![10.0, 20.0, 30.0]), Some(20.0));
    }

    #[test]
    fn test_mask_api_key() {
        assert_eq!(mask_api_key("default-key"), "def...key");
        assert_eq!(mask_api_key("abcdef"), "abcdef");
        assert_eq!(mask_api_key("abc"), "abc");
        assert_eq!(mask_api_key(""), "");
        assert_eq!(mask_api_key("abcdefg"), "abc...efg");
    }
}
