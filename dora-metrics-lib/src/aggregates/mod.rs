//! Per-metric reduction of canonical records into bucketed tables
//!
//! Each aggregator owns its metric's canonical table and regroups it
//! independently for every granularity it reports, so no view is ever derived
//! from another view. All tables come out ordered by (period, service) and are
//! [`Dataset::Empty`] when their input had no rows.
//!
//! - Deployment frequency: counts per day, ISO week and month.
//! - Lead time for changes: mean, median, min and max hours per day.
//! - Change failure rate: status counts and percentages per day and ISO week.

mod change_failure_rate;
mod deployment_frequency;
mod lead_time;

pub use change_failure_rate::{ChangeFailureRate, ChangeFailureRow, StatusCounts};
pub use deployment_frequency::{DeploymentCountRow, DeploymentFrequency, count_deployments};
pub use lead_time::{LeadTimeRow, aggregate_daily as aggregate_lead_time_daily};

use crate::Dataset;
use crate::events::{ClassifiedEvents, LeadTimeRecord, MetricKind};
use strum::IntoEnumIterator;

const LOG_TARGET: &str = " aggregate";

/// Every aggregate table produced by one run.
#[derive(Debug, Clone, Default)]
pub struct AggregateSet {
    pub deployment_frequency: DeploymentFrequency,
    pub lead_time_daily: Dataset<LeadTimeRow>,

    /// The canonical lead time rows, kept for the raw export.
    pub lead_time_records: Dataset<LeadTimeRecord>,

    pub change_failure_rate: ChangeFailureRate,
}

impl AggregateSet {
    /// Aggregate every metric. A metric with no records yields empty tables and
    /// is reported at info level; the other metrics are unaffected.
    #[must_use]
    pub fn compute(classified: ClassifiedEvents) -> Self {
        for kind in MetricKind::iter() {
            if classified.count(kind) == 0 {
                log::info!(target: LOG_TARGET, "No {kind} data found");
            }
        }

        let deployment_frequency = DeploymentFrequency::aggregate(&classified.deployments);
        let lead_time_daily = lead_time::aggregate_daily(&classified.lead_times);
        let change_failure_rate = ChangeFailureRate::aggregate(&classified.change_outcomes);

        log::debug!(
            target: LOG_TARGET,
            "Aggregated {} deployments, {} lead times, {} change outcomes",
            classified.deployments.len(),
            classified.lead_times.len(),
            classified.change_outcomes.len()
        );

        Self {
            deployment_frequency,
            lead_time_daily,
            lead_time_records: classified.lead_times,
            change_failure_rate,
        }
    }

    /// True when no metric produced any row.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.deployment_frequency.daily.is_empty() && self.lead_time_daily.is_empty() && self.change_failure_rate.daily.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{MetricEvent, classify_events};

    fn event(json: &str) -> MetricEvent {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_metrics_are_independent() {
        let events = [
            event(r#"{"timestamp":"2024-01-01T10:00:00Z","service":"A","deployment_frequency":{"deployment_id":"1"}}"#),
            event(r#"{"timestamp":"2024-01-01T11:00:00Z","service":"A","change_failure_rate":{"status":"success"}}"#),
        ];

        let set = AggregateSet::compute(classify_events(&events));
        assert_eq!(set.deployment_frequency.daily.len(), 1);
        assert!(set.lead_time_daily.is_empty());
        assert!(set.lead_time_records.is_empty());
        assert_eq!(set.change_failure_rate.daily.len(), 1);
        assert!(!set.is_empty());
    }

    #[test]
    fn test_no_records_gives_empty_set() {
        let set = AggregateSet::compute(ClassifiedEvents::default());
        assert!(set.is_empty());
        assert!(set.deployment_frequency.monthly.is_empty());
        assert!(set.change_failure_rate.weekly.is_empty());
    }
}
