use crate::Result;
use ohno::IntoAppError;
use std::io::Write;

/// A rectangular table of already-formatted cells, ready to be written as CSV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// File stem identifying the metric and granularity, e.g. `lead_time_daily`.
    pub name: String,
    pub header: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    #[must_use]
    pub fn new(name: impl Into<String>, header: Vec<&'static str>) -> Self {
        Self {
            name: name.into(),
            header,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        debug_assert_eq!(row.len(), self.header.len(), "row width must match header for table '{}'", self.name);
        self.rows.push(row);
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Write the header and every row as RFC 4180 CSV.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer
            .write_record(&self.header)
            .into_app_err_with(|| format!("unable to write header of table '{}'", self.name))?;

        for row in &self.rows {
            csv_writer
                .write_record(row)
                .into_app_err_with(|| format!("unable to write row of table '{}'", self.name))?;
        }

        csv_writer.flush().into_app_err_with(|| format!("unable to flush table '{}'", self.name))?;
        Ok(())
    }
}

/// Format a float the way dataframe CSV writers do: shortest round-trip form,
/// but whole numbers keep one decimal (`50.0`, not `50`).
#[must_use]
pub fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(50.0), "50.0");
        assert_eq!(format_float(0.0), "0.0");
        assert_eq!(format_float(-2.0), "-2.0");
        assert_eq!(format_float(66.67), "66.67");
        assert_eq!(format_float(1.5), "1.5");
        assert_eq!(format_float(1.0 / 3.0), "0.3333333333333333");
    }

    #[test]
    fn test_write_csv() {
        let mut table = Table::new("sample_daily", vec!["date", "service", "count"]);
        table.push_row(vec!["2024-01-01".into(), "api".into(), "1".into()]);
        table.push_row(vec!["2024-01-01".into(), "web, east".into(), "2".into()]);

        let mut out = Vec::new();
        table.write_csv(&mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "date,service,count\n2024-01-01,api,1\n2024-01-01,\"web, east\",2\n");
    }

    #[test]
    fn test_empty_table_writes_header_only() {
        let table = Table::new("empty", vec!["a", "b"]);
        assert!(table.is_empty());

        let mut out = Vec::new();
        table.write_csv(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a,b\n");
    }
}
