//! IQ writer: tab-delimited lab-data-compatible layout.

use crate::value_cell;
use csv::{QuoteStyle, WriterBuilder};
use pde_align::table::ResultTable;
use pde_utils::dates::format_iq_timestamp;
use std::io::Write;

/// Write the IQ layout: tab-delimited with quoting disabled, the Timestamp
/// column renamed `Time` and formatted `MM/DD/YYYY HH:MM:SS`, no Status
/// column. Inferential tables carry their `Actual_Sample_Time` column in the
/// same format.
pub fn write_iq<W: Write>(table: &ResultTable, out: W) -> anyhow::Result<()> {
    let mut writer = WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(QuoteStyle::Never)
        .from_writer(out);

    let mut header = vec!["Time".to_string()];
    if table.has_actual_time() {
        header.push("Actual_Sample_Time".to_string());
    }
    header.extend(table.columns.iter().cloned());
    writer.write_record(&header)?;

    for row in &table.rows {
        let mut cells = vec![format_iq_timestamp(&row.timestamp)];
        if table.has_actual_time() {
            cells.push(
                row.actual_time
                    .map(|t| format_iq_timestamp(&t))
                    .unwrap_or_default(),
            );
        }
        cells.extend(row.values.iter().map(|v| value_cell(*v)));
        writer.write_record(&cells)?;
    }
    writer.flush()?;
    Ok(())
}
