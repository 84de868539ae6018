//! Raw metric events and their classification into canonical records
//!
//! # Implementation Model
//!
//! Ingestion walks a directory tree and deserializes every `*.json` file into a
//! [`MetricEvent`]. Files that fail to parse are skipped with a diagnostic; a
//! missing root is reported as "no data" rather than as an error.
//!
//! Classification inspects which metric payload an event carries and builds
//! exactly one [`CanonicalRecord`] for it, applying defaults for optional
//! fields at construction time. Events without a recognized payload are inert,
//! and events with a broken or ambiguous payload are rejected individually with
//! an [`ExtractError`].

mod classifier;
mod extract_error;
mod loader;
mod metric_event;
mod metric_kind;
mod records;
mod timestamp;

pub use classifier::{ClassifiedEvents, classify_events};
pub use extract_error::ExtractError;
pub use loader::{LoadedEvents, load_events};
pub use metric_event::{CanonicalRecord, MetricEvent};
pub use metric_kind::MetricKind;
pub use records::{ChangeOutcomeRecord, ChangeStatus, DeploymentRecord, LeadTimeRecord, UNKNOWN_BRANCH};
pub use timestamp::{EventTimestamp, TimestampValue};
