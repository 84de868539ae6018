#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core library for dora-metrics
//!
//! This library computes DORA delivery-performance metrics from per-event JSON
//! records emitted by CI/CD pipelines and exports time-bucketed aggregates.
//!
//! # Module Organization
//!
//! Data flows strictly forward through the modules:
//!
//! - [`events`]: Ingestion of raw records and classification into canonical records
//! - [`buckets`]: Calendar bucketing by day, ISO week and month per service
//! - [`aggregates`]: Per-metric reduction of bucketed rows
//! - [`reports`]: CSV tables, the run summary, and the exporter
//! - [`artifacts`]: Retrieval of metric artifacts from GitHub Actions
//! - `commands`: Command-line interface and orchestration

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

pub mod aggregates;
pub mod artifacts;
pub mod buckets;
pub mod dataset;
pub mod events;
pub mod reports;

#[cfg(any(debug_assertions, test))]
pub mod commands;
#[cfg(not(any(debug_assertions, test)))]
mod commands;

pub use crate::commands::{Host, run};
pub use crate::dataset::Dataset;
