use super::summary::RunSummary;
use super::table::Table;
use super::tables;
use crate::Result;
use crate::aggregates::AggregateSet;
use crate::buckets::Granularity;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::NaiveDate;
use ohno::{AppError, IntoAppError};
use std::fs::{self, File};
use std::io::{BufWriter, Write};

const LOG_TARGET: &str = "    export";

const STAMP_FORMAT: &str = "%Y%m%d";

/// What happened to each file of one export.
#[derive(Debug, Default)]
pub struct ExportOutcome {
    /// Files written successfully, in the order they were produced.
    pub written: Vec<Utf8PathBuf>,

    /// Tables that had no rows and therefore produced no file.
    pub skipped: Vec<String>,

    /// Files that could not be written, with the reason.
    pub failed: Vec<(Utf8PathBuf, AppError)>,
}

impl ExportOutcome {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Writes aggregate tables as date-stamped CSV files and the run summary as JSON.
///
/// Every file is attempted; a failure to write one file is recorded and the
/// remaining files are still written. Re-exporting with the same stamp
/// overwrites the previous files.
#[derive(Debug, Clone)]
pub struct Exporter {
    export_dir: Utf8PathBuf,
    summary_dir: Utf8PathBuf,
    stamp: String,
    include_lead_time_raw: bool,
}

impl Exporter {
    #[must_use]
    pub fn new(export_dir: impl Into<Utf8PathBuf>, summary_dir: impl Into<Utf8PathBuf>, run_date: NaiveDate, include_lead_time_raw: bool) -> Self {
        Self {
            export_dir: export_dir.into(),
            summary_dir: summary_dir.into(),
            stamp: run_date.format(STAMP_FORMAT).to_string(),
            include_lead_time_raw,
        }
    }

    /// The `YYYYMMDD` stamp embedded in every file name.
    #[must_use]
    pub fn stamp(&self) -> &str {
        &self.stamp
    }

    /// Where the run summary is written.
    #[must_use]
    pub fn summary_path(&self) -> Utf8PathBuf {
        self.summary_dir.join(format!("summary_{}.json", self.stamp))
    }

    pub fn export(&self, aggregates: &AggregateSet, summary: &RunSummary) -> ExportOutcome {
        let mut outcome = ExportOutcome::default();

        for table in self.tables(aggregates) {
            if table.is_empty() {
                log::debug!(target: LOG_TARGET, "Skipping empty table '{}'", table.name);
                outcome.skipped.push(table.name);
                continue;
            }

            let path = self.export_dir.join(format!("{}_{}.csv", table.name, self.stamp));
            record(&mut outcome, path, |p| write_table(&table, p));
        }

        record(&mut outcome, self.summary_path(), |p| write_summary(summary, p));

        outcome
    }

    fn tables(&self, aggregates: &AggregateSet) -> Vec<Table> {
        let mut result = vec![
            tables::deployment_frequency(&aggregates.deployment_frequency, Granularity::Daily),
            tables::deployment_frequency(&aggregates.deployment_frequency, Granularity::Weekly),
            tables::deployment_frequency(&aggregates.deployment_frequency, Granularity::Monthly),
            tables::lead_time_daily(&aggregates.lead_time_daily),
        ];

        if self.include_lead_time_raw {
            result.push(tables::lead_time_raw(&aggregates.lead_time_records));
        }

        result.push(tables::change_failure_rate(&aggregates.change_failure_rate.daily, Granularity::Daily));
        result.push(tables::change_failure_rate(&aggregates.change_failure_rate.weekly, Granularity::Weekly));
        result
    }
}

fn record(outcome: &mut ExportOutcome, path: Utf8PathBuf, write: impl FnOnce(&Utf8Path) -> Result<()>) {
    match write(&path) {
        Ok(()) => {
            log::info!(target: LOG_TARGET, "Exported '{path}'");
            outcome.written.push(path);
        }
        Err(e) => {
            log::error!(target: LOG_TARGET, "Unable to export '{path}': {e:#}");
            outcome.failed.push((path, e));
        }
    }
}

fn create_file(path: &Utf8Path) -> Result<BufWriter<File>> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).into_app_err_with(|| format!("unable to create directory '{parent}'"))?;
    }

    let file = File::create(path).into_app_err_with(|| format!("unable to create file '{path}'"))?;
    Ok(BufWriter::new(file))
}

fn write_table(table: &Table, path: &Utf8Path) -> Result<()> {
    let mut writer = create_file(path)?;
    table.write_csv(&mut writer)?;
    writer.flush().into_app_err_with(|| format!("unable to flush file '{path}'"))
}

fn write_summary(summary: &RunSummary, path: &Utf8Path) -> Result<()> {
    let writer = create_file(path)?;
    summary.write_json(writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{MetricEvent, classify_events};
    use chrono::{Local, TimeZone};

    fn events() -> Vec<MetricEvent> {
        [
            r#"{"timestamp":"2024-01-01T10:00:00Z","service":"A","deployment_frequency":{"deployment_id":"1"}}"#,
            r#"{"timestamp":"2024-01-01T11:00:00Z","service":"A","change_failure_rate":{"status":"success"}}"#,
            r#"{"timestamp":"2024-01-01T12:00:00Z","service":"A","change_failure_rate":{"status":"failure"}}"#,
        ]
        .iter()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
    }

    fn run_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
    }

    fn summary(events: &[MetricEvent]) -> RunSummary {
        RunSummary::new(events, Local.with_ymd_and_hms(2024, 1, 2, 8, 0, 0).unwrap()).unwrap()
    }

    fn utf8(path: &std::path::Path) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(path.to_path_buf()).unwrap()
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_empty_tables_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let root = utf8(dir.path());
        let events = events();
        let aggregates = AggregateSet::compute(classify_events(&events));

        let exporter = Exporter::new(root.join("powerbi"), root.join("aggregated"), run_date(), true);
        let outcome = exporter.export(&aggregates, &summary(&events));

        assert!(outcome.is_success());
        assert_eq!(outcome.skipped, vec!["lead_time_daily", "lead_time_raw"]);

        let names: Vec<&str> = outcome.written.iter().filter_map(|p| p.file_name()).collect();
        assert_eq!(
            names,
            vec![
                "deployment_frequency_daily_20240102.csv",
                "deployment_frequency_weekly_20240102.csv",
                "deployment_frequency_monthly_20240102.csv",
                "change_failure_rate_daily_20240102.csv",
                "change_failure_rate_weekly_20240102.csv",
                "summary_20240102.json",
            ]
        );

        assert!(root.join("aggregated/summary_20240102.json").is_file());
        let cfr = fs::read_to_string(root.join("powerbi/change_failure_rate_daily_20240102.csv")).unwrap();
        assert_eq!(
            cfr,
            "date,service,success,failure,other,total_changes,failure_rate,success_rate\n2024-01-01,A,1,1,0,2,50.0,50.0\n"
        );
    }

    #[test]
    fn test_raw_lead_time_export_can_be_disabled() {
        let exporter = Exporter::new("unused", "unused", run_date(), false);
        let names: Vec<String> = exporter.tables(&AggregateSet::default()).into_iter().map(|t| t.name).collect();
        assert!(!names.iter().any(|n| n == "lead_time_raw"));
        assert_eq!(exporter.stamp(), "20240102");
        assert_eq!(exporter.summary_path(), Utf8Path::new("unused").join("summary_20240102.json"));
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_write_failure_does_not_stop_other_exports() {
        let dir = tempfile::tempdir().unwrap();
        let root = utf8(dir.path());

        // a regular file where the export directory should be
        let blocked = root.join("blocked");
        fs::write(&blocked, b"not a directory").unwrap();

        let events = events();
        let aggregates = AggregateSet::compute(classify_events(&events));
        let exporter = Exporter::new(&blocked, root.join("aggregated"), run_date(), true);
        let outcome = exporter.export(&aggregates, &summary(&events));

        assert!(!outcome.is_success());
        assert_eq!(outcome.failed.len(), 5);
        assert_eq!(outcome.written, vec![root.join("aggregated/summary_20240102.json")]);
    }
}
