//! Inferential fetch command: lab events aligned with weighted process data.

use crate::grid::load_source;
use crate::{split_tags, OutputFormat};
use log::info;
use pde_align::driver;
use pde_align::error::CancelToken;
use pde_align::progress::LogSink;
use pde_align::request::InferentialRequest;
use pde_align::window::{WindowMode, WindowParams};
use pde_utils::dates::parse_timestamp;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufWriter;

/// Run an inferential fetch against a historian dump and write the result.
#[allow(clippy::too_many_arguments)]
pub async fn run_inferential(
    dump_csv: &str,
    meta_csv: Option<&str>,
    lab_tags: &str,
    process_tags: &str,
    start: &str,
    end: &str,
    past_window: i64,
    future_window: i64,
    legacy_window: bool,
    output: &str,
    format: OutputFormat,
    timezone: &str,
) -> anyhow::Result<()> {
    let lab_tags = split_tags(lab_tags);
    if lab_tags.is_empty() {
        anyhow::bail!("no lab tags given");
    }
    let process_tags = split_tags(process_tags);
    if process_tags.is_empty() {
        anyhow::bail!("no process tags given");
    }
    if past_window < 0 {
        anyhow::bail!("past window must be non-negative, got {}", past_window);
    }
    let start = parse_timestamp(start)?;
    let end = parse_timestamp(end)?;
    if end < start {
        anyhow::bail!("end {} is before start {}", end, start);
    }
    let mode = if legacy_window {
        WindowMode::Legacy
    } else {
        WindowMode::ActualTime
    };

    let source = load_source(dump_csv, meta_csv)?;
    let request = InferentialRequest {
        lab_tags,
        process_tags,
        start,
        end,
        window: WindowParams::new(past_window, future_window, mode),
    };

    info!(
        "Aligning {} process tags to {} lab tags from {} to {} (past {}m, future {}m, {:?})",
        request.process_tags.len(),
        request.lab_tags.len(),
        start,
        end,
        past_window,
        future_window,
        mode
    );
    let table = tokio::task::spawn_blocking(move || {
        driver::run_inferential(&source, &request, &LogSink, &CancelToken::new())
    })
    .await??;

    let writer = BufWriter::new(File::create(output)?);
    pde_export::write_table(format.into(), &table, timezone, &HashMap::new(), writer)?;

    info!(
        "Inferential fetch complete. {} rows written to {}",
        table.row_count(),
        output
    );
    Ok(())
}
