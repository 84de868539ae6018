use super::EventTimestamp;
use crate::buckets::Bucketable;
use core::fmt::{Display, Formatter};

const SECONDS_PER_MINUTE: f64 = 60.0;
const SECONDS_PER_HOUR: f64 = 3600.0;

/// Branch recorded when a deployment payload does not name one.
pub const UNKNOWN_BRANCH: &str = "unknown";

/// One deployment. Duplicate deployment ids are counted separately.
#[derive(Debug, Clone, PartialEq)]
pub struct DeploymentRecord {
    pub timestamp: EventTimestamp,
    pub service: String,
    pub deployment_id: String,
    pub branch: String,
    pub commit_sha: String,
}

/// One commit-to-deploy interval.
#[derive(Debug, Clone, PartialEq)]
pub struct LeadTimeRecord {
    pub timestamp: EventTimestamp,
    pub service: String,
    pub commit_sha: String,
    pub commit_timestamp: EventTimestamp,
    pub deploy_timestamp: EventTimestamp,

    /// `deploy_timestamp - commit_timestamp`. Negative values are kept as-is.
    pub lead_time_seconds: f64,
}

impl LeadTimeRecord {
    #[must_use]
    pub fn lead_time_minutes(&self) -> f64 {
        self.lead_time_seconds / SECONDS_PER_MINUTE
    }

    #[must_use]
    pub fn lead_time_hours(&self) -> f64 {
        self.lead_time_seconds / SECONDS_PER_HOUR
    }

    /// Deployed before it was committed, which signals clock skew or out-of-order data.
    #[must_use]
    pub fn is_suspect(&self) -> bool {
        self.lead_time_seconds < 0.0
    }
}

/// Outcome of a change as reported by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChangeStatus {
    Success,
    Failure,

    /// Any other reported status. Kept in the table but excluded from failure-rate math.
    Other(String),
}

impl ChangeStatus {
    #[must_use]
    pub fn parse(status: &str) -> Self {
        match status {
            "success" => Self::Success,
            "failure" => Self::Failure,
            other => Self::Other(other.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
            Self::Other(s) => s,
        }
    }
}

impl Display for ChangeStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One change with its success or failure outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeOutcomeRecord {
    pub timestamp: EventTimestamp,
    pub service: String,
    pub status: ChangeStatus,
    pub workflow_run_id: String,
    pub commit_sha: String,
}

impl Bucketable for DeploymentRecord {
    fn timestamp(&self) -> &EventTimestamp {
        &self.timestamp
    }

    fn service(&self) -> &str {
        &self.service
    }
}

impl Bucketable for LeadTimeRecord {
    fn timestamp(&self) -> &EventTimestamp {
        &self.timestamp
    }

    fn service(&self) -> &str {
        &self.service
    }
}

impl Bucketable for ChangeOutcomeRecord {
    fn timestamp(&self) -> &EventTimestamp {
        &self.timestamp
    }

    fn service(&self) -> &str {
        &self.service
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lead_time(seconds: f64) -> LeadTimeRecord {
        LeadTimeRecord {
            timestamp: EventTimestamp::parse("2024-01-01T00:00:00Z").unwrap(),
            service: "api".to_string(),
            commit_sha: String::new(),
            commit_timestamp: EventTimestamp::parse("2024-01-01T00:00:00Z").unwrap(),
            deploy_timestamp: EventTimestamp::parse("2024-01-01T00:00:00Z").unwrap(),
            lead_time_seconds: seconds,
        }
    }

    #[test]
    fn test_lead_time_unit_conversions() {
        let record = lead_time(5400.0);
        assert!((record.lead_time_minutes() - 90.0).abs() < f64::EPSILON);
        assert!((record.lead_time_hours() - 1.5).abs() < f64::EPSILON);
        assert!(!record.is_suspect());
    }

    #[test]
    fn test_negative_lead_time_is_suspect_not_clamped() {
        let record = lead_time(-3600.0);
        assert!(record.is_suspect());
        assert!((record.lead_time_hours() + 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_change_status_parse() {
        assert_eq!(ChangeStatus::parse("success"), ChangeStatus::Success);
        assert_eq!(ChangeStatus::parse("failure"), ChangeStatus::Failure);
        assert_eq!(ChangeStatus::parse("cancelled"), ChangeStatus::Other("cancelled".to_string()));
    }

    #[test]
    fn test_change_status_is_case_sensitive() {
        assert_eq!(ChangeStatus::parse("Success"), ChangeStatus::Other("Success".to_string()));
    }

    #[test]
    fn test_change_status_display() {
        assert_eq!(ChangeStatus::Success.to_string(), "success");
        assert_eq!(ChangeStatus::Other("skipped".to_string()).to_string(), "skipped");
    }
}
