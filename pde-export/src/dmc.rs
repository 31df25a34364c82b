//! DMC TXT writer: the tab-delimited Time/tag/Status interleaved layout.

use crate::value_cell;
use csv::WriterBuilder;
use pde_align::table::ResultTable;
use std::collections::HashMap;
use std::io::Write;

/// ISO-8601 form used for DMC data rows.
const DMC_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Write the DMC TXT layout:
///
/// 1. `(timezone:<tz>)` header line
/// 2. `Time` then, per tag, its column name and a `Status` column
/// 3. description row (blank under each Status)
/// 4. units row (blank under each Status)
/// 5. data rows: ISO timestamp then, per tag, value and row status
///
/// `display_names` substitutes a presentation name for a tag in the column
/// header; descriptions note the original tag when a substitution happened.
/// There is no path parsing here; callers supply explicit names.
pub fn write_dmc<W: Write>(
    table: &ResultTable,
    timezone: &str,
    display_names: &HashMap<String, String>,
    out: W,
) -> anyhow::Result<()> {
    let mut writer = WriterBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .from_writer(out);

    writer.write_record([format!("(timezone:{})", timezone)])?;

    let mut header = vec!["Time".to_string()];
    for tag in &table.columns {
        let name = display_names.get(tag).unwrap_or(tag);
        header.push(name.clone());
        header.push("Status".to_string());
    }
    writer.write_record(&header)?;

    let mut desc_row = vec![String::new()];
    for tag in &table.columns {
        let mut desc = table.descriptions.get(tag).cloned().unwrap_or_default();
        if let Some(name) = display_names.get(tag) {
            if name != tag {
                if desc.is_empty() {
                    desc = format!("Mapped from {}", tag);
                } else {
                    desc = format!("{} (Original: {})", desc, tag);
                }
            }
        }
        desc_row.push(desc);
        desc_row.push(String::new());
    }
    writer.write_record(&desc_row)?;

    let mut units_row = vec![String::new()];
    for tag in &table.columns {
        units_row.push(table.units.get(tag).cloned().unwrap_or_default());
        units_row.push(String::new());
    }
    writer.write_record(&units_row)?;

    for row in &table.rows {
        let mut cells = vec![row.timestamp.format(DMC_TIMESTAMP_FORMAT).to_string()];
        for value in &row.values {
            cells.push(value_cell(*value));
            cells.push(row.status.clone());
        }
        writer.write_record(&cells)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::grid_table;

    fn render(display_names: &HashMap<String, String>) -> Vec<String> {
        let mut buf = Vec::new();
        write_dmc(&grid_table(), "Local", display_names, &mut buf).unwrap();
        String::from_utf8(buf)
            .unwrap()
            .lines()
            .map(|l| l.to_string())
            .collect()
    }

    #[test]
    fn test_dmc_layout() {
        let lines = render(&HashMap::new());
        assert_eq!(lines[0], "(timezone:Local)");
        assert_eq!(lines[1], "Time\tTAG1\tStatus\tTAG2\tStatus");
        assert_eq!(lines[2], "\tTemperature Sensor\t\tPressure Sensor\t");
        assert_eq!(lines[3], "\tdegC\t\tkPa\t");
        assert_eq!(lines[4], "2024-01-01T00:00:00\t10\tG\t100\tG");
        // The null cell keeps its slot and its status.
        assert_eq!(lines[5], "2024-01-01T01:00:00\t15.5\tG\t\tG");
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn test_dmc_status_after_every_value() {
        let lines = render(&HashMap::new());
        let header: Vec<&str> = lines[1].split('\t').collect();
        assert_eq!(header[0], "Time");
        for pair in header[1..].chunks(2) {
            assert_eq!(pair[1], "Status");
        }
    }

    #[test]
    fn test_dmc_display_name_substitution() {
        let mut names = HashMap::new();
        names.insert("TAG1".to_string(), "FIC101.PV".to_string());
        let lines = render(&names);
        assert_eq!(lines[1], "Time\tFIC101.PV\tStatus\tTAG2\tStatus");
        assert!(lines[2].contains("Temperature Sensor (Original: TAG1)"));
    }
}
