use super::{CanonicalRecord, ChangeOutcomeRecord, DeploymentRecord, LeadTimeRecord, MetricEvent, MetricKind};
use crate::Dataset;

const LOG_TARGET: &str = "  classify";

/// Loaded events split into one canonical table per metric.
#[derive(Debug, Clone, Default)]
pub struct ClassifiedEvents {
    pub deployments: Dataset<DeploymentRecord>,
    pub lead_times: Dataset<LeadTimeRecord>,
    pub change_outcomes: Dataset<ChangeOutcomeRecord>,

    /// Events that carry no recognized metric payload.
    pub inert: usize,

    /// Events that carry a payload but could not be extracted.
    pub rejected: usize,
}

impl ClassifiedEvents {
    /// Number of canonical records in the table for `kind`.
    #[must_use]
    pub fn count(&self, kind: MetricKind) -> usize {
        match kind {
            MetricKind::DeploymentFrequency => self.deployments.len(),
            MetricKind::LeadTimeForChanges => self.lead_times.len(),
            MetricKind::ChangeFailureRate => self.change_outcomes.len(),
        }
    }
}

/// Route each event to its metric's canonical table.
///
/// Events that fail extraction are logged and left out; they never abort the
/// batch or affect other metrics.
#[must_use]
pub fn classify_events<'a>(events: impl IntoIterator<Item = &'a MetricEvent>) -> ClassifiedEvents {
    let mut deployments = Vec::new();
    let mut lead_times = Vec::new();
    let mut change_outcomes = Vec::new();
    let mut inert = 0;
    let mut rejected = 0;

    for event in events {
        match event.classify() {
            Ok(Some(CanonicalRecord::Deployment(record))) => deployments.push(record),
            Ok(Some(CanonicalRecord::LeadTime(record))) => {
                if record.is_suspect() {
                    log::warn!(
                        target: LOG_TARGET,
                        "Negative lead time of {:.2}h for service '{}' at {} (commit {} deployed {})",
                        record.lead_time_hours(),
                        record.service,
                        record.timestamp,
                        record.commit_timestamp,
                        record.deploy_timestamp
                    );
                }
                lead_times.push(record);
            }
            Ok(Some(CanonicalRecord::ChangeOutcome(record))) => change_outcomes.push(record),
            Ok(None) => {
                log::trace!(target: LOG_TARGET, "Event for service '{}' at {} has no metric payload", event.service, event.timestamp);
                inert += 1;
            }
            Err(e) => {
                log::warn!(target: LOG_TARGET, "Skipping event for service '{}' at {}: {e}", event.service, event.timestamp);
                rejected += 1;
            }
        }
    }

    ClassifiedEvents {
        deployments: Dataset::from_rows(deployments),
        lead_times: Dataset::from_rows(lead_times),
        change_outcomes: Dataset::from_rows(change_outcomes),
        inert,
        rejected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn events(values: &[serde_json::Value]) -> Vec<MetricEvent> {
        values.iter().map(|v| serde_json::from_value(v.clone()).unwrap()).collect()
    }

    #[test]
    fn test_routes_each_kind() {
        let events = events(&[
            json!({"timestamp": "2024-01-01T00:00:00Z", "service": "a", "deployment_frequency": {"deployment_id": "1"}}),
            json!({"timestamp": "2024-01-01T00:00:00Z", "service": "a", "deployment_frequency": {"deployment_id": "1"}}),
            json!({"timestamp": "2024-01-01T00:00:00Z", "service": "a", "lead_time_for_changes": {
                "commit_timestamp": "2024-01-01T00:00:00Z", "deploy_timestamp": "2024-01-01T01:00:00Z"}}),
            json!({"timestamp": "2024-01-01T00:00:00Z", "service": "a", "change_failure_rate": {"status": "failure"}}),
        ]);

        let classified = classify_events(&events);
        // duplicate deployment ids are not deduplicated
        assert_eq!(classified.count(MetricKind::DeploymentFrequency), 2);
        assert_eq!(classified.count(MetricKind::LeadTimeForChanges), 1);
        assert_eq!(classified.count(MetricKind::ChangeFailureRate), 1);
        assert_eq!(classified.inert, 0);
        assert_eq!(classified.rejected, 0);
    }

    #[test]
    fn test_unknown_kind_appears_in_no_table() {
        let events = events(&[json!({"timestamp": "2024-01-01T00:00:00Z", "service": "a", "unknown_kind": {}})]);

        let classified = classify_events(&events);
        assert!(classified.deployments.is_empty());
        assert!(classified.lead_times.is_empty());
        assert!(classified.change_outcomes.is_empty());
        assert_eq!(classified.inert, 1);
        assert_eq!(classified.rejected, 0);
    }

    #[test]
    fn test_bad_record_does_not_affect_others() {
        let events = events(&[
            json!({"timestamp": "2024-01-01T00:00:00Z", "service": "a", "deployment_frequency": {}}),
            json!({"timestamp": "2024-01-01T00:00:00Z", "service": "a", "deployment_frequency": {"deployment_id": "2"}}),
            json!({"timestamp": "2024-01-01T00:00:00Z", "service": "a", "change_failure_rate": {"status": "success"}}),
        ]);

        let classified = classify_events(&events);
        assert_eq!(classified.deployments.len(), 1);
        assert_eq!(classified.deployments.rows()[0].deployment_id, "2");
        assert_eq!(classified.change_outcomes.len(), 1);
        assert_eq!(classified.rejected, 1);
    }

    #[test]
    fn test_no_events_gives_empty_tables() {
        let classified = classify_events(core::iter::empty::<&MetricEvent>());
        assert!(classified.deployments.is_empty());
        assert!(classified.lead_times.is_empty());
        assert!(classified.change_outcomes.is_empty());
    }
}
