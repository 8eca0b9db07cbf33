//! Lenient timestamp handling for the finance API.
//!
//! The backend emits a mix of RFC 3339 timestamps, naive `YYYY-MM-DDTHH:MM:SS`
//! values (which are UTC) and bare dates. Everything is normalised to
//! [`OffsetDateTime`] in UTC and written back as RFC 3339.

use serde::{Deserialize, Deserializer, Serializer};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};

/// Parse any timestamp shape the backend produces.
pub fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(dt);
    }

    let with_fraction =
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]");
    let without_fraction = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
    if let Ok(dt) = PrimitiveDateTime::parse(raw, &with_fraction)
        .or_else(|_| PrimitiveDateTime::parse(raw, &without_fraction))
    {
        return Some(dt.assume_utc());
    }

    parse_date(raw).map(|date| PrimitiveDateTime::new(date, Time::MIDNIGHT).assume_utc())
}

/// Parse a `YYYY-MM-DD` date, as typed into a form field.
pub fn parse_date(raw: &str) -> Option<Date> {
    let format = format_description!("[year]-[month]-[day]");
    Date::parse(raw.trim(), &format).ok()
}

/// Midnight UTC on the given date.
pub fn start_of_day(date: Date) -> OffsetDateTime {
    PrimitiveDateTime::new(date, Time::MIDNIGHT).assume_utc()
}

fn to_rfc3339(dt: &OffsetDateTime) -> Result<String, time::error::Format> {
    dt.format(&Rfc3339)
}

pub fn serialize<S>(dt: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let formatted = to_rfc3339(dt).map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&formatted)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw)))
}

pub mod option {
    use super::*;

    pub fn serialize<S>(dt: &Option<OffsetDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match dt {
            Some(dt) => super::serialize(dt, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(s) if s.trim().is_empty() => Ok(None),
            Some(s) => parse_timestamp(&s)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", s))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn parses_rfc3339() {
        assert_eq!(
            parse_timestamp("2025-03-01T12:30:00Z"),
            Some(datetime!(2025-03-01 12:30:00 UTC))
        );
    }

    #[test]
    fn naive_timestamps_are_utc() {
        assert_eq!(
            parse_timestamp("2025-03-01T12:30:00"),
            Some(datetime!(2025-03-01 12:30:00 UTC))
        );
        assert_eq!(
            parse_timestamp("2025-03-01T12:30:00.1234567"),
            Some(datetime!(2025-03-01 12:30:00.1234567 UTC))
        );
    }

    #[test]
    fn bare_dates_are_midnight() {
        assert_eq!(
            parse_timestamp("2025-03-01"),
            Some(datetime!(2025-03-01 00:00:00 UTC))
        );
    }

    #[test]
    fn garbage_is_rejected() {
        assert_eq!(parse_timestamp("not a date"), None);
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_date("2025-13-01"), None);
    }
}
