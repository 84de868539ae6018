use super::MetricKind;
use core::fmt::{Display, Formatter};

/// Why a single raw event could not be turned into a canonical record.
///
/// Each of these excludes exactly one event from its metric's table; none of
/// them aborts the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// The event carries more than one metric payload.
    AmbiguousKind(Vec<MetricKind>),

    /// The payload value is not a JSON object.
    PayloadNotAnObject(MetricKind),

    /// A mandatory payload field is absent or null.
    MissingField { kind: MetricKind, field: &'static str },

    /// A payload field is present but has an unusable value.
    InvalidField {
        kind: MetricKind,
        field: &'static str,
        reason: String,
    },
}

impl Display for ExtractError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AmbiguousKind(kinds) => {
                let names: Vec<&str> = kinds.iter().map(|k| k.payload_key()).collect();
                write!(f, "event carries more than one metric payload ({})", names.join(", "))
            }
            Self::PayloadNotAnObject(kind) => write!(f, "'{kind}' payload is not an object"),
            Self::MissingField { kind, field } => write!(f, "'{kind}' payload is missing required field '{field}'"),
            Self::InvalidField { kind, field, reason } => write!(f, "'{kind}' payload has invalid field '{field}': {reason}"),
        }
    }
}

impl core::error::Error for ExtractError {}
