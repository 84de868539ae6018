//! Command-line interface and orchestration for dora-metrics
//!
//! This module implements the CLI commands and wires the ingestion,
//! aggregation, export, and artifact retrieval pieces into end-to-end
//! workflows.
//!
//! ## Commands
//!
//! - **aggregate**: Load raw metric events, aggregate every metric, and export
//!   CSV tables plus a run summary
//! - **download**: Fetch recent metric artifacts from GitHub Actions into the
//!   raw metrics directory
//! - **init**: Generate a default configuration file
//!
//! ## Execution Flow
//!
//! The `run` function parses command-line arguments using clap and routes
//! to the appropriate command handler. Every command starts by initializing
//! logging and loading the configuration through `CommonArgs::setup`, after
//! which explicit command-line values take precedence over configured ones.
//!
//! Configuration is managed through an optional TOML file (`dora.toml` by
//! default) holding directory locations and artifact download settings.

mod aggregate;
mod common;
mod config;
mod download;
mod host;
mod init;
mod run;

#[cfg(debug_assertions)]
pub use config::Config;

pub use aggregate::{AggregateArgs, aggregate_metrics};
pub use common::{CommonArgs, LogLevel};
pub use download::{DownloadArgs, download_metrics};
pub use host::Host;
pub use init::{InitArgs, init_config};
pub use run::run;
