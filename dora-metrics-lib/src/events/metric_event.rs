use super::records::UNKNOWN_BRANCH;
use super::{
    ChangeOutcomeRecord, ChangeStatus, DeploymentRecord, EventTimestamp, ExtractError, LeadTimeRecord, MetricKind,
};
use serde::Deserialize;
use serde_json::{Map, Value};

/// A raw metric event as emitted by a CI/CD pipeline.
///
/// Only `timestamp` and `service` are required. Keys other than the three
/// metric payloads are ignored, so an event with an unrecognized payload loads
/// fine and simply contributes to no metric.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MetricEvent {
    pub timestamp: EventTimestamp,
    pub service: String,

    #[serde(default)]
    pub deployment_frequency: Option<Value>,

    #[serde(default)]
    pub lead_time_for_changes: Option<Value>,

    #[serde(default)]
    pub change_failure_rate: Option<Value>,
}

/// A fully resolved record for exactly one metric.
#[derive(Debug, Clone, PartialEq)]
pub enum CanonicalRecord {
    Deployment(DeploymentRecord),
    LeadTime(LeadTimeRecord),
    ChangeOutcome(ChangeOutcomeRecord),
}

impl CanonicalRecord {
    #[must_use]
    pub const fn kind(&self) -> MetricKind {
        match self {
            Self::Deployment(_) => MetricKind::DeploymentFrequency,
            Self::LeadTime(_) => MetricKind::LeadTimeForChanges,
            Self::ChangeOutcome(_) => MetricKind::ChangeFailureRate,
        }
    }
}

impl MetricEvent {
    /// The payload value for a metric, if the event carries one.
    #[must_use]
    pub const fn payload(&self, kind: MetricKind) -> Option<&Value> {
        match kind {
            MetricKind::DeploymentFrequency => self.deployment_frequency.as_ref(),
            MetricKind::LeadTimeForChanges => self.lead_time_for_changes.as_ref(),
            MetricKind::ChangeFailureRate => self.change_failure_rate.as_ref(),
        }
    }

    /// Turn this event into its canonical record.
    ///
    /// Returns `Ok(None)` for inert events that carry no metric payload.
    pub fn classify(&self) -> Result<Option<CanonicalRecord>, ExtractError> {
        let present: Vec<MetricKind> = [
            MetricKind::DeploymentFrequency,
            MetricKind::LeadTimeForChanges,
            MetricKind::ChangeFailureRate,
        ]
        .into_iter()
        .filter(|kind| self.payload(*kind).is_some())
        .collect();

        let kind = match present.as_slice() {
            [] => return Ok(None),
            [kind] => *kind,
            _ => return Err(ExtractError::AmbiguousKind(present)),
        };

        let payload = self
            .payload(kind)
            .and_then(Value::as_object)
            .ok_or(ExtractError::PayloadNotAnObject(kind))?;
        let fields = PayloadFields { kind, map: payload };

        let record = match kind {
            MetricKind::DeploymentFrequency => CanonicalRecord::Deployment(DeploymentRecord {
                timestamp: self.timestamp.clone(),
                service: self.service.clone(),
                deployment_id: fields.required_text("deployment_id")?,
                branch: fields.optional_text("branch")?.unwrap_or_else(|| UNKNOWN_BRANCH.to_string()),
                commit_sha: fields.optional_text("commit_sha")?.unwrap_or_default(),
            }),

            MetricKind::LeadTimeForChanges => {
                let commit_timestamp = fields.required_timestamp("commit_timestamp")?;
                let deploy_timestamp = fields.required_timestamp("deploy_timestamp")?;
                let lead_time_seconds = commit_timestamp.seconds_until(&deploy_timestamp);

                CanonicalRecord::LeadTime(LeadTimeRecord {
                    timestamp: self.timestamp.clone(),
                    service: self.service.clone(),
                    commit_sha: fields.optional_text("commit_sha")?.unwrap_or_default(),
                    commit_timestamp,
                    deploy_timestamp,
                    lead_time_seconds,
                })
            }

            MetricKind::ChangeFailureRate => CanonicalRecord::ChangeOutcome(ChangeOutcomeRecord {
                timestamp: self.timestamp.clone(),
                service: self.service.clone(),
                status: ChangeStatus::parse(&fields.required_text("status")?),
                workflow_run_id: fields.optional_text("workflow_run_id")?.unwrap_or_default(),
                commit_sha: fields.optional_text("commit_sha")?.unwrap_or_default(),
            }),
        };

        Ok(Some(record))
    }
}

/// Typed access to the fields of one metric payload.
struct PayloadFields<'a> {
    kind: MetricKind,
    map: &'a Map<String, Value>,
}

impl PayloadFields<'_> {
    /// A field rendered as text. Strings are taken verbatim; numbers and
    /// booleans use their JSON spelling so numeric ids stay opaque strings.
    fn optional_text(&self, field: &'static str) -> Result<Option<String>, ExtractError> {
        match self.map.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(Value::Bool(b)) => Ok(Some(b.to_string())),
            Some(Value::Array(_) | Value::Object(_)) => Err(ExtractError::InvalidField {
                kind: self.kind,
                field,
                reason: "expected a scalar value".to_string(),
            }),
        }
    }

    fn required_text(&self, field: &'static str) -> Result<String, ExtractError> {
        self.optional_text(field)?.ok_or(ExtractError::MissingField { kind: self.kind, field })
    }

    fn required_timestamp(&self, field: &'static str) -> Result<EventTimestamp, ExtractError> {
        let text = self.required_text(field)?;
        EventTimestamp::parse(&text).map_err(|e| ExtractError::InvalidField {
            kind: self.kind,
            field,
            reason: e.to_string(),
        })
    }
}
