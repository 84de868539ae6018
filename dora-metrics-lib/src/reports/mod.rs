//! Export of aggregate tables and the run summary
//!
//! # Implementation Model
//!
//! Every aggregate table is first flattened into a [`Table`] of formatted
//! cells with a fixed header, named after its metric and granularity. The
//! [`Exporter`] then writes each non-empty table to
//! `{export_dir}/{metric}_{granularity}_{YYYYMMDD}.csv` and the [`RunSummary`]
//! to `{summary_dir}/summary_{YYYYMMDD}.json`.
//!
//! Floats are written in shortest round-trip form with whole numbers keeping
//! one decimal place, so a 50% failure rate reads `50.0`.

mod exporter;
mod summary;
mod table;
mod tables;

pub use exporter::{ExportOutcome, Exporter};
pub use summary::{DateRange, RunSummary};
pub use table::{Table, format_float};
