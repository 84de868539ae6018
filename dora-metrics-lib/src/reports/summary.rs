use crate::Result;
use crate::events::MetricEvent;
use chrono::{DateTime, Local};
use ohno::IntoAppError;
use serde::Serialize;
use std::io::Write;

/// Format of `generated_at`: local wall-clock time without an offset, microsecond precision.
const GENERATED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Earliest and latest event timestamps, as written in the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

/// Metadata describing one aggregation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub generated_at: String,

    /// Every loaded event, including inert and rejected ones.
    pub total_metrics: usize,

    pub date_range: DateRange,
}

impl RunSummary {
    /// Summarize a run over `events`. Returns `None` when there are no events.
    pub fn new<'a>(events: impl IntoIterator<Item = &'a MetricEvent>, generated_at: DateTime<Local>) -> Option<Self> {
        let mut total_metrics = 0;
        let mut earliest: Option<&MetricEvent> = None;
        let mut latest: Option<&MetricEvent> = None;

        for event in events {
            total_metrics += 1;

            if earliest.is_none_or(|e| event.timestamp.chronological_cmp(&e.timestamp).is_lt()) {
                earliest = Some(event);
            }

            if latest.is_none_or(|e| event.timestamp.chronological_cmp(&e.timestamp).is_gt()) {
                latest = Some(event);
            }
        }

        Some(Self {
            generated_at: generated_at.naive_local().format(GENERATED_AT_FORMAT).to_string(),
            total_metrics,
            date_range: DateRange {
                start: earliest?.timestamp.to_string(),
                end: latest?.timestamp.to_string(),
            },
        })
    }

    /// Write the summary as pretty-printed JSON.
    pub fn write_json<W: Write>(&self, mut writer: W) -> Result<()> {
        serde_json::to_writer_pretty(&mut writer, self).into_app_err("unable to serialize run summary")?;
        writer.flush().into_app_err("unable to flush run summary")?;
        Ok(())
    }
}
