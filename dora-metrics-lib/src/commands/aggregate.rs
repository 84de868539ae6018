use super::Host;
use super::common::CommonArgs;
use crate::Result;
use crate::aggregates::AggregateSet;
use crate::events::{classify_events, load_events};
use crate::reports::{Exporter, RunSummary};
use camino::Utf8PathBuf;
use chrono::Local;
use clap::Parser;
use ohno::{app_err, bail};
use std::io::Write;

const LOG_TARGET: &str = " aggregate";

#[derive(Parser, Debug)]
pub struct AggregateArgs {
    /// Directory scanned recursively for raw metric files
    #[arg(long, value_name = "PATH")]
    pub raw_dir: Option<Utf8PathBuf>,

    /// Directory receiving the CSV tables
    #[arg(long, value_name = "PATH")]
    pub export_dir: Option<Utf8PathBuf>,

    /// Directory receiving the run summary
    #[arg(long, value_name = "PATH")]
    pub summary_dir: Option<Utf8PathBuf>,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Load raw events, aggregate every metric and export the results.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or if any export file
/// could not be written. All files are attempted before failing.
pub fn aggregate_metrics<H: Host>(host: &mut H, args: &AggregateArgs) -> Result<()> {
    let config = args.common.setup()?;

    let raw_dir = args.raw_dir.clone().unwrap_or(config.raw_dir);
    let export_dir = args.export_dir.clone().unwrap_or(config.export_dir);
    let summary_dir = args.summary_dir.clone().unwrap_or(config.summary_dir);

    let loaded = load_events(&raw_dir);
    if !loaded.rejected.is_empty() {
        let _ = writeln!(host.error(), "Skipped {} unreadable metric file(s) in '{raw_dir}'", loaded.rejected.len());
    }

    if loaded.events.is_empty() {
        let _ = writeln!(host.output(), "No metrics found in '{raw_dir}'");
        return Ok(());
    }

    let now = Local::now();
    let summary = RunSummary::new(&loaded.events, now).ok_or_else(|| app_err!("no metrics to summarize"))?;

    let classified = classify_events(&loaded.events);
    log::debug!(
        target: LOG_TARGET,
        "Classified {} events: {} inert, {} rejected",
        loaded.events.len(),
        classified.inert,
        classified.rejected
    );
    if classified.rejected > 0 {
        let _ = writeln!(host.error(), "Skipped {} malformed metric record(s)", classified.rejected);
    }

    let aggregates = AggregateSet::compute(classified);
    let exporter = Exporter::new(export_dir, summary_dir, now.date_naive(), config.export_lead_time_raw);
    let outcome = exporter.export(&aggregates, &summary);

    let _ = writeln!(host.output(), "Processed {} metrics from '{raw_dir}'", summary.total_metrics);
    let _ = writeln!(
        host.output(),
        "Date range: {} to {}",
        summary.date_range.start,
        summary.date_range.end
    );

    for path in &outcome.written {
        let _ = writeln!(host.output(), "  wrote {path}");
    }

    if outcome.is_success() {
        return Ok(());
    }

    let summary_path = exporter.summary_path();
    let describe = |path: &Utf8PathBuf| {
        if *path == summary_path {
            format!("run summary '{path}'")
        } else {
            format!("'{path}'")
        }
    };

    for (path, e) in &outcome.failed {
        let _ = writeln!(host.error(), "  failed to write {}: {e:#}", describe(path));
    }

    let failed: Vec<String> = outcome.failed.iter().map(|(path, _)| describe(path)).collect();
    bail!("unable to export {} file(s): {}", failed.len(), failed.join(", "))
}
