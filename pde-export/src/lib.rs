//! Flat-file exporters over a [`pde_align::table::ResultTable`].
//!
//! Four formats, each a fixed layout downstream tooling parses by position:
//!
//! - clean CSV: comma-delimited, metadata header rows, no Status column
//! - TSV: tab-delimited, single header row, no Status column
//! - DMC TXT: tab-delimited, `(timezone:…)` header line, Time/tag/Status
//!   interleaved columns with description and unit rows
//! - IQ: tab-delimited lab-data form, Timestamp renamed `Time` and formatted
//!   `MM/DD/YYYY HH:MM:SS`, no Status column

pub mod clean;
pub mod dmc;
pub mod iq;

use pde_align::table::ResultTable;
use std::collections::HashMap;
use std::io::Write;

/// The flat-file formats a fetch result can be written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Tsv,
    Dmc,
    Iq,
}

/// Write `table` to `out` in the given format.
///
/// `timezone` labels the DMC header line and `display_names` optionally
/// renames tags in the DMC column header; both are ignored by the other
/// formats.
pub fn write_table<W: Write>(
    format: ExportFormat,
    table: &ResultTable,
    timezone: &str,
    display_names: &HashMap<String, String>,
    out: W,
) -> anyhow::Result<()> {
    match format {
        ExportFormat::Csv => clean::write_csv(table, out),
        ExportFormat::Tsv => clean::write_tsv(table, out),
        ExportFormat::Dmc => dmc::write_dmc(table, timezone, display_names, out),
        ExportFormat::Iq => iq::write_iq(table, out),
    }
}

/// Render one optional value as a cell; nulls become empty cells.
pub(crate) fn value_cell(value: Option<f64>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => String::new(),
    }
}


#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::NaiveDateTime;
    use pde_align::table::{OutputRow, ResultTable};
    use std::collections::HashMap;

    pub fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    /// A two-tag grid table with one null and tag metadata.
    pub fn grid_table() -> ResultTable {
        let mut descriptions = HashMap::new();
        descriptions.insert("TAG1".to_string(), "Temperature Sensor".to_string());
        descriptions.insert("TAG2".to_string(), "Pressure Sensor".to_string());
        let mut units = HashMap::new();
        units.insert("TAG1".to_string(), "degC".to_string());
        units.insert("TAG2".to_string(), "kPa".to_string());
        ResultTable {
            columns: vec!["TAG1".to_string(), "TAG2".to_string()],
            rows: vec![
                OutputRow::new(
                    ts("2024-01-01 00:00:00"),
                    None,
                    vec![Some(10.0), Some(100.0)],
                ),
                OutputRow::new(ts("2024-01-01 01:00:00"), None, vec![Some(15.5), None]),
            ],
            descriptions,
            units,
        }
    }

    /// A one-lab one-process inferential table with actual sample times.
    pub fn inferential_table() -> ResultTable {
        ResultTable {
            columns: vec!["LAB1".to_string(), "PROC1".to_string()],
            rows: vec![OutputRow::new(
                ts("2024-01-01 08:00:00"),
                Some(ts("2024-01-01 08:05:00")),
                vec![Some(5.5), Some(11.99)],
            )],
            descriptions: HashMap::new(),
            units: HashMap::new(),
        }
    }
}
