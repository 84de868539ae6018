use crate::Dataset;
use crate::buckets::{Granularity, Period, bucket_records};
use crate::events::LeadTimeRecord;

/// Lead time statistics for one (day, service) bucket, in hours.
#[derive(Debug, Clone, PartialEq)]
pub struct LeadTimeRow {
    pub period: Period,
    pub service: String,
    pub avg_lead_time_hours: f64,
    pub median_lead_time_hours: f64,
    pub min_lead_time_hours: f64,
    pub max_lead_time_hours: f64,

    /// Number of lead time records behind the statistics.
    pub sample_count: usize,
}

/// Summarize lead times per (day, service).
///
/// All records count, including negative lead times. Days without records for
/// a service do not produce a row.
#[must_use]
pub fn aggregate_daily(records: &Dataset<LeadTimeRecord>) -> Dataset<LeadTimeRow> {
    bucket_records(records, Granularity::Daily)
        .into_iter()
        .filter_map(|(key, members)| {
            let hours: Vec<f64> = members.iter().map(|r| r.lead_time_hours()).collect();
            let stats = Summary::of(hours)?;

            Some(LeadTimeRow {
                period: key.period,
                service: key.service,
                avg_lead_time_hours: stats.mean,
                median_lead_time_hours: stats.median,
                min_lead_time_hours: stats.min,
                max_lead_time_hours: stats.max,
                sample_count: stats.count,
            })
        })
        .collect()
}

/// Central tendency and range of a non-empty sample.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Summary {
    count: usize,
    mean: f64,
    median: f64,
    min: f64,
    max: f64,
}

impl Summary {
    /// Returns `None` for an empty sample.
    #[expect(clippy::cast_precision_loss, reason = "sample sizes are far below f64 precision limits")]
    fn of(mut values: Vec<f64>) -> Option<Self> {
        values.sort_by(f64::total_cmp);

        let count = values.len();
        let min = *values.first()?;
        let max = *values.last()?;
        let mean = values.iter().sum::<f64>() / count as f64;

        let mid = count / 2;
        let median = if count % 2 == 0 {
            f64::midpoint(values[mid - 1], values[mid])
        } else {
            values[mid]
        };

        Some(Self {
            count,
            mean,
            median,
            min,
            max,
        })
    }
}
