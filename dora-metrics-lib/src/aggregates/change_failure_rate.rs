use crate::Dataset;
use crate::buckets::{Granularity, Period, bucket_records};
use crate::events::{ChangeOutcomeRecord, ChangeStatus};

/// Per-status change counts for one bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub success: u64,
    pub failure: u64,

    /// Changes with any other status. Not part of `total_changes`.
    pub other: u64,
}

impl StatusCounts {
    pub fn record(&mut self, status: &ChangeStatus) {
        match status {
            ChangeStatus::Success => self.success += 1,
            ChangeStatus::Failure => self.failure += 1,
            ChangeStatus::Other(_) => self.other += 1,
        }
    }

    /// Successes plus failures; other statuses are excluded.
    #[must_use]
    pub const fn total_changes(&self) -> u64 {
        self.success + self.failure
    }

    /// Failure percentage rounded to two decimals, 0 when there are no changes.
    #[must_use]
    pub fn failure_rate(&self) -> f64 {
        percentage(self.failure, self.total_changes())
    }

    /// Success percentage rounded to two decimals, 0 when there are no changes.
    #[must_use]
    pub fn success_rate(&self) -> f64 {
        percentage(self.success, self.total_changes())
    }
}

/// Change failure statistics for one (period, service) bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeFailureRow {
    pub period: Period,
    pub service: String,
    pub counts: StatusCounts,
    pub total_changes: u64,
    pub failure_rate: f64,

    /// Only reported for the daily view.
    pub success_rate: Option<f64>,
}

/// Daily and weekly change failure tables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeFailureRate {
    pub daily: Dataset<ChangeFailureRow>,
    pub weekly: Dataset<ChangeFailureRow>,
}

impl ChangeFailureRate {
    /// Compute both views; each independently re-groups the full table.
    #[must_use]
    pub fn aggregate(records: &Dataset<ChangeOutcomeRecord>) -> Self {
        Self {
            daily: failure_rates(records, Granularity::Daily, true),
            weekly: failure_rates(records, Granularity::Weekly, false),
        }
    }
}

fn failure_rates(
    records: &Dataset<ChangeOutcomeRecord>,
    granularity: Granularity,
    with_success_rate: bool,
) -> Dataset<ChangeFailureRow> {
    bucket_records(records, granularity)
        .into_iter()
        .map(|(key, members)| {
            let mut counts = StatusCounts::default();
            for record in members {
                counts.record(&record.status);
            }

            ChangeFailureRow {
                period: key.period,
                service: key.service,
                counts,
                total_changes: counts.total_changes(),
                failure_rate: counts.failure_rate(),
                success_rate: with_success_rate.then(|| counts.success_rate()),
            }
        })
        .collect()
}

#[expect(clippy::cast_precision_loss, reason = "change counts are far below f64 precision limits")]
fn percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }

    round2(part as f64 / total as f64 * 100.0)
}

/// Round to two decimals, ties to even, so complementary rates still sum to 100.
fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
