// Registry timestamp (de)serialization
//
// The registry mixes RFC 3339 timestamps with offset-less ones, notably its
// `0001-01-01T00:00:00` "never" sentinel. Offset-less values are read as UTC.
// Use with `#[serde(default, with = "crate::domain::timestamp")]` on
// `Option<DateTime<Utc>>` fields.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse an RFC 3339 timestamp, falling back to a naive one taken as UTC
pub fn parse(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    let raw = raw.trim();
    match DateTime::parse_from_rfc3339(raw) {
        Ok(t) => Ok(t.with_timezone(&Utc)),
        Err(rfc_err) => NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .map(|naive| Utc.from_utc_datetime(&naive))
            .ok_or(rfc_err),
    }
}

pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    value.serialize(serializer)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    raw.map(|s| {
        parse(&s).map_err(|e| serde::de::Error::custom(format!("invalid timestamp {:?}: {}", s, e)))
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_naive_sentinel_is_utc() {
        let t = parse("0001-01-01T00:00:00").unwrap();
        assert_eq!(t.year(), 1);
        assert_eq!(t.hour(), 0);
    }

    #[test]
    fn test_offset_forms() {
        let expected = parse("2024-03-01T10:15:30Z").unwrap();

        assert_eq!(parse("2024-03-01T10:15:30+00:00").unwrap(), expected);
        assert_eq!(parse("2024-03-01T12:15:30+02:00").unwrap(), expected);
        assert_eq!(parse("2024-03-01T10:15:30").unwrap(), expected);
        assert_eq!(parse("0001-01-01T00:00:00.000-00:00").unwrap().year(), 1);
    }

    #[test]
    fn test_seven_digit_fraction() {
        let t = parse("2024-03-01T10:15:30.1234567").unwrap();
        assert_eq!(t.nanosecond(), 123_456_700);
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(parse("yesterday").is_err());
        assert!(parse("").is_err());
    }
}
