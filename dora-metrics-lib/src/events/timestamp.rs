use crate::Result;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use core::cmp::Ordering;
use core::fmt::{Display, Formatter};
use ohno::app_err;
use serde::Deserialize;

/// Formats with an explicit UTC offset, tried after RFC 3339.
const ZONED_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
];

/// Formats without offset information.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A parsed point in time, with or without an offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampValue {
    Zoned(DateTime<FixedOffset>),
    Naive(NaiveDateTime),
}

/// A permissively parsed ISO-8601 timestamp that remembers its original text.
///
/// The civil date used for bucketing is the date as written: no timezone
/// conversion happens, so `2024-01-01T23:30:00-05:00` falls on January 1st even
/// though it is January 2nd in UTC.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct EventTimestamp {
    raw: String,
    value: TimestampValue,
}

impl EventTimestamp {
    /// Parse a timestamp, accepting RFC 3339 and common ISO-8601 variants with
    /// or without an offset, a space or `T` separator, optional fractional
    /// seconds, and bare dates.
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();

        let value = parse_value(trimmed).ok_or_else(|| app_err!("unrecognized timestamp format '{text}'"))?;

        Ok(Self {
            raw: trimmed.to_string(),
            value,
        })
    }

    /// The timestamp text as it appeared in the input.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub const fn value(&self) -> TimestampValue {
        self.value
    }

    /// The civil date as stated in the timestamp's own clock.
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        match self.value {
            TimestampValue::Zoned(dt) => dt.date_naive(),
            TimestampValue::Naive(dt) => dt.date(),
        }
    }

    /// The instant this timestamp denotes. Naive timestamps are read as UTC.
    #[must_use]
    pub fn instant(&self) -> DateTime<Utc> {
        match self.value {
            TimestampValue::Zoned(dt) => dt.with_timezone(&Utc),
            TimestampValue::Naive(dt) => dt.and_utc(),
        }
    }

    /// Signed number of seconds from `self` to `later`. Negative when `later` is earlier.
    #[must_use]
    #[expect(clippy::cast_precision_loss, reason = "whole-second deltas fit comfortably in f64")]
    pub fn seconds_until(&self, later: &Self) -> f64 {
        let delta = later.instant() - self.instant();

        // subsec_nanos carries the sign of the delta
        delta.num_seconds() as f64 + f64::from(delta.subsec_nanos()) / 1_000_000_000.0
    }

    /// Chronological ordering by instant, falling back to the raw text for ties.
    #[must_use]
    pub fn chronological_cmp(&self, other: &Self) -> Ordering {
        self.instant().cmp(&other.instant()).then_with(|| self.raw.cmp(&other.raw))
    }
}

fn parse_value(text: &str) -> Option<TimestampValue> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(TimestampValue::Zoned(dt));
    }

    for format in ZONED_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(text, format) {
            return Some(TimestampValue::Zoned(dt));
        }
    }

    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(TimestampValue::Naive(dt));
        }
    }

    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .ok()
        .map(|date| TimestampValue::Naive(date.and_time(NaiveTime::MIN)))
}

impl TryFrom<String> for EventTimestamp {
    type Error = ohno::AppError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl Display for EventTimestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.raw)
    }
}
