//! Grid fetch command: interpolated process data over a fixed range.

use crate::{split_tags, OutputFormat};
use log::info;
use pde_align::driver;
use pde_align::error::CancelToken;
use pde_align::progress::LogSink;
use pde_align::request::GridRequest;
use pde_historian::memory::MemorySource;
use pde_utils::dates::{parse_interval, parse_timestamp};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufWriter;

/// Run a grid fetch against a historian dump and write the result.
#[allow(clippy::too_many_arguments)]
pub async fn run_grid(
    dump_csv: &str,
    meta_csv: Option<&str>,
    tags: &str,
    start: &str,
    end: &str,
    interval: &str,
    output: &str,
    format: OutputFormat,
    timezone: &str,
) -> anyhow::Result<()> {
    let tags = split_tags(tags);
    if tags.is_empty() {
        anyhow::bail!("no process tags given");
    }
    let start = parse_timestamp(start)?;
    let end = parse_timestamp(end)?;
    if end < start {
        anyhow::bail!("end {} is before start {}", end, start);
    }
    let interval = parse_interval(interval)?;

    let source = load_source(dump_csv, meta_csv)?;
    let request = GridRequest {
        tags,
        start,
        end,
        interval,
    };

    info!(
        "Fetching {} tags from {} to {}",
        request.tags.len(),
        start,
        end
    );
    let table = tokio::task::spawn_blocking(move || {
        driver::run_process_grid(&source, &request, &LogSink, &CancelToken::new())
    })
    .await??;

    let writer = BufWriter::new(File::create(output)?);
    pde_export::write_table(format.into(), &table, timezone, &HashMap::new(), writer)?;

    info!(
        "Grid fetch complete. {} rows x {} tags written to {}",
        table.row_count(),
        table.columns.len(),
        output
    );
    Ok(())
}

/// Load the offline historian source from dump and metadata CSV files.
pub(crate) fn load_source(
    dump_csv: &str,
    meta_csv: Option<&str>,
) -> anyhow::Result<MemorySource> {
    let dump = std::fs::read_to_string(dump_csv)?;
    let meta = match meta_csv {
        Some(path) => Some(std::fs::read_to_string(path)?),
        None => None,
    };
    let source = MemorySource::from_dump_csv(&dump, meta.as_deref())
        .map_err(|e| anyhow::anyhow!("failed to parse historian dump {}: {}", dump_csv, e))?;
    info!("Loaded {} tags from {}", source.tag_count(), dump_csv);
    Ok(source)
}
