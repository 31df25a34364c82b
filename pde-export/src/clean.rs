//! Clean CSV and TSV writers: data without the Status column.

use crate::value_cell;
use csv::WriterBuilder;
use pde_align::table::ResultTable;
use pde_utils::dates::format_timestamp;
use std::io::Write;

/// Column headers for the data columns, with the actual-sample-time column
/// inserted after Timestamp for inferential tables.
fn header(table: &ResultTable, timestamp_label: &str) -> Vec<String> {
    let mut row = vec![timestamp_label.to_string()];
    if table.has_actual_time() {
        row.push("Actual_Sample_Time".to_string());
    }
    row.extend(table.columns.iter().cloned());
    row
}

fn data_row(table: &ResultTable, index: usize, format: fn(&chrono::NaiveDateTime) -> String) -> Vec<String> {
    let row = &table.rows[index];
    let mut cells = vec![format(&row.timestamp)];
    if table.has_actual_time() {
        cells.push(row.actual_time.map(|t| format(&t)).unwrap_or_default());
    }
    cells.extend(row.values.iter().map(|v| value_cell(*v)));
    cells
}

/// Write the comma-delimited CSV layout with embedded metadata headers:
/// tag names, then descriptions (lead cell `Time`), then units, a blank
/// separator row, then the data. No Status column.
pub fn write_csv<W: Write>(table: &ResultTable, out: W) -> anyhow::Result<()> {
    let mut writer = WriterBuilder::new()
        .delimiter(b',')
        .flexible(true)
        .from_writer(out);

    writer.write_record(&header(table, "Timestamp"))?;

    let mut desc_row = vec!["Time".to_string()];
    if table.has_actual_time() {
        desc_row.push(String::new());
    }
    desc_row.extend(
        table
            .columns
            .iter()
            .map(|tag| table.descriptions.get(tag).cloned().unwrap_or_default()),
    );
    writer.write_record(&desc_row)?;

    let mut units_row = vec![String::new()];
    if table.has_actual_time() {
        units_row.push(String::new());
    }
    units_row.extend(
        table
            .columns
            .iter()
            .map(|tag| table.units.get(tag).cloned().unwrap_or_default()),
    );
    writer.write_record(&units_row)?;

    writer.write_record([""])?;

    for index in 0..table.rows.len() {
        writer.write_record(&data_row(table, index, format_timestamp))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the tab-delimited TSV layout: a single header row then data rows.
/// No metadata rows, no Status column.
pub fn write_tsv<W: Write>(table: &ResultTable, out: W) -> anyhow::Result<()> {
    let mut writer = WriterBuilder::new().delimiter(b'\t').from_writer(out);
    writer.write_record(&header(table, "Timestamp"))?;
    for index in 0..table.rows.len() {
        writer.write_record(&data_row(table, index, format_timestamp))?;
    }
    writer.flush()?;
    Ok(())
}
