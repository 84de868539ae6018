use crate::Dataset;
use crate::buckets::{Granularity, Period, bucket_records};
use crate::events::DeploymentRecord;

/// Number of deployments in one (period, service) bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentCountRow {
    pub period: Period,
    pub service: String,
    pub deployment_count: u64,
}

/// Deployment counts at every granularity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeploymentFrequency {
    pub daily: Dataset<DeploymentCountRow>,
    pub weekly: Dataset<DeploymentCountRow>,
    pub monthly: Dataset<DeploymentCountRow>,
}

impl DeploymentFrequency {
    /// Count deployments per bucket. Each granularity re-groups the full table.
    #[must_use]
    pub fn aggregate(records: &Dataset<DeploymentRecord>) -> Self {
        Self {
            daily: count_deployments(records, Granularity::Daily),
            weekly: count_deployments(records, Granularity::Weekly),
            monthly: count_deployments(records, Granularity::Monthly),
        }
    }

    #[must_use]
    pub const fn table(&self, granularity: Granularity) -> &Dataset<DeploymentCountRow> {
        match granularity {
            Granularity::Daily => &self.daily,
            Granularity::Weekly => &self.weekly,
            Granularity::Monthly => &self.monthly,
        }
    }
}

/// Count deployments per (period, service) at a single granularity.
#[must_use]
pub fn count_deployments(records: &Dataset<DeploymentRecord>, granularity: Granularity) -> Dataset<DeploymentCountRow> {
    bucket_records(records, granularity)
        .into_iter()
        .map(|(key, members)| DeploymentCountRow {
            period: key.period,
            service: key.service,
            deployment_count: members.len() as u64,
        })
        .collect()
}
