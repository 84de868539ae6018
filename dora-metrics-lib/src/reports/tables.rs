//! Conversion of aggregate tables into exportable CSV tables.

use super::table::{Table, format_float};
use crate::Dataset;
use crate::aggregates::{ChangeFailureRow, DeploymentCountRow, DeploymentFrequency, LeadTimeRow};
use crate::buckets::Granularity;
use crate::events::{LeadTimeRecord, MetricKind};

pub fn deployment_frequency(frequency: &DeploymentFrequency, granularity: Granularity) -> Table {
    deployment_counts(frequency.table(granularity), granularity)
}

fn deployment_counts(rows: &Dataset<DeploymentCountRow>, granularity: Granularity) -> Table {
    let mut table = Table::new(
        table_name(MetricKind::DeploymentFrequency, granularity),
        vec![granularity.column_name(), "service", "deployment_count"],
    );

    for row in rows {
        table.push_row(vec![row.period.to_string(), row.service.clone(), row.deployment_count.to_string()]);
    }

    table
}

pub fn lead_time_daily(rows: &Dataset<LeadTimeRow>) -> Table {
    let mut table = Table::new(
        table_name(MetricKind::LeadTimeForChanges, Granularity::Daily),
        vec![
            Granularity::Daily.column_name(),
            "service",
            "avg_lead_time_hours",
            "median_lead_time_hours",
            "min_lead_time_hours",
            "max_lead_time_hours",
        ],
    );

    for row in rows {
        table.push_row(vec![
            row.period.to_string(),
            row.service.clone(),
            format_float(row.avg_lead_time_hours),
            format_float(row.median_lead_time_hours),
            format_float(row.min_lead_time_hours),
            format_float(row.max_lead_time_hours),
        ]);
    }

    table
}

/// One row per lead time record, in ingestion order.
pub fn lead_time_raw(records: &Dataset<LeadTimeRecord>) -> Table {
    let mut table = Table::new(
        format!("{}_raw", MetricKind::LeadTimeForChanges.export_stem()),
        vec![
            "timestamp",
            "service",
            "commit_sha",
            "commit_timestamp",
            "deploy_timestamp",
            "lead_time_seconds",
            "lead_time_minutes",
            "lead_time_hours",
            "date",
        ],
    );

    for record in records {
        table.push_row(vec![
            record.timestamp.to_string(),
            record.service.clone(),
            record.commit_sha.clone(),
            record.commit_timestamp.to_string(),
            record.deploy_timestamp.to_string(),
            format_float(record.lead_time_seconds),
            format_float(record.lead_time_minutes()),
            format_float(record.lead_time_hours()),
            record.timestamp.date().format("%Y-%m-%d").to_string(),
        ]);
    }

    table
}

pub fn change_failure_rate(rows: &Dataset<ChangeFailureRow>, granularity: Granularity) -> Table {
    let with_success_rate = granularity == Granularity::Daily;

    let mut header = vec![
        granularity.column_name(),
        "service",
        "success",
        "failure",
        "other",
        "total_changes",
        "failure_rate",
    ];
    if with_success_rate {
        header.push("success_rate");
    }

    let mut table = Table::new(table_name(MetricKind::ChangeFailureRate, granularity), header);

    for row in rows {
        let mut cells = vec![
            row.period.to_string(),
            row.service.clone(),
            row.counts.success.to_string(),
            row.counts.failure.to_string(),
            row.counts.other.to_string(),
            row.total_changes.to_string(),
            format_float(row.failure_rate),
        ];
        if with_success_rate {
            cells.push(format_float(row.success_rate.unwrap_or_default()));
        }
        table.push_row(cells);
    }

    table
}

fn table_name(kind: MetricKind, granularity: Granularity) -> String {
    format!("{}_{granularity}", kind.export_stem())
}
