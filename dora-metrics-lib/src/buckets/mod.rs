//! Calendar bucketing of canonical records per service
//!
//! Every canonical record carries an event timestamp and a service. The
//! bucketer maps each record to a [`BucketKey`] made of the calendar
//! [`Period`] containing the timestamp's stated civil date and the service.
//!
//! No timezone normalization happens here: two events written with different
//! offsets bucket by their own local dates. Weeks follow the ISO calendar and
//! are labelled `YYYY-Www`; months are labelled `YYYY-MM`.

mod period;

pub use period::{Granularity, Period};

use crate::events::EventTimestamp;
use std::collections::BTreeMap;

/// A record that can be assigned to a calendar bucket.
pub trait Bucketable {
    fn timestamp(&self) -> &EventTimestamp;
    fn service(&self) -> &str;
}

/// A (calendar period, service) grouping key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BucketKey {
    pub period: Period,
    pub service: String,
}

impl BucketKey {
    #[must_use]
    pub fn of<T: Bucketable>(record: &T, granularity: Granularity) -> Self {
        Self {
            period: granularity.period_of(record.timestamp().date()),
            service: record.service().to_string(),
        }
    }
}

/// Group records by bucket at the given granularity.
///
/// Buckets iterate in (period, service) order. Every record lands in exactly one bucket.
pub fn bucket_records<'a, T, I>(records: I, granularity: Granularity) -> BTreeMap<BucketKey, Vec<&'a T>>
where
    T: Bucketable + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut buckets: BTreeMap<BucketKey, Vec<&'a T>> = BTreeMap::new();
    for record in records {
        buckets.entry(BucketKey::of(record, granularity)).or_default().push(record);
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    struct Row {
        timestamp: EventTimestamp,
        service: &'static str,
    }

    impl Bucketable for Row {
        fn timestamp(&self) -> &EventTimestamp {
            &self.timestamp
        }

        fn service(&self) -> &str {
            self.service
        }
    }

    fn row(ts: &str, service: &'static str) -> Row {
        Row {
            timestamp: EventTimestamp::parse(ts).unwrap(),
            service,
        }
    }

    fn day(y: i32, m: u32, d: u32) -> Period {
        Period::Day(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn test_same_day_same_service_share_bucket() {
        let rows = [
            row("2024-01-01T00:00:01Z", "a"),
            row("2024-01-01T23:59:59+05:00", "a"),
            row("2024-01-01 12:00:00", "a"),
        ];

        let buckets = bucket_records(&rows, Granularity::Daily);
        assert_eq!(buckets.len(), 1);
        let (key, members) = buckets.iter().next().unwrap();
        assert_eq!(key.period, day(2024, 1, 1));
        assert_eq!(key.service, "a");
        assert_eq!(members.len(), 3);
    }

    #[test]
    fn test_services_are_bucketed_separately() {
        let rows = [row("2024-01-01T10:00:00Z", "b"), row("2024-01-01T10:00:00Z", "a")];

        let buckets = bucket_records(&rows, Granularity::Daily);
        let services: Vec<&str> = buckets.keys().map(|k| k.service.as_str()).collect();
        assert_eq!(services, vec!["a", "b"]);
    }

    #[test]
    fn test_local_date_is_not_normalized() {
        // same instant, different stated dates
        let rows = [row("2024-01-01T23:30:00-05:00", "a"), row("2024-01-02T04:30:00Z", "a")];

        let buckets = bucket_records(&rows, Granularity::Daily);
        let periods: Vec<Period> = buckets.keys().map(|k| k.period).collect();
        assert_eq!(periods, vec![day(2024, 1, 1), day(2024, 1, 2)]);
    }

    #[test]
    fn test_weekly_and_monthly_views() {
        let rows = [
            row("2024-01-29T10:00:00Z", "a"),
            row("2024-02-02T10:00:00Z", "a"),
            row("2024-02-05T10:00:00Z", "a"),
        ];

        let weekly = bucket_records(&rows, Granularity::Weekly);
        let weekly: Vec<(String, usize)> = weekly.iter().map(|(k, v)| (k.period.to_string(), v.len())).collect();
        assert_eq!(weekly, vec![("2024-W05".to_string(), 2), ("2024-W06".to_string(), 1)]);

        let monthly = bucket_records(&rows, Granularity::Monthly);
        let monthly: Vec<(String, usize)> = monthly.iter().map(|(k, v)| (k.period.to_string(), v.len())).collect();
        assert_eq!(monthly, vec![("2024-01".to_string(), 1), ("2024-02".to_string(), 2)]);
    }

    #[test]
    fn test_empty_input_gives_no_buckets() {
        let rows: [Row; 0] = [];
        assert!(bucket_records(&rows, Granularity::Monthly).is_empty());
    }
}
