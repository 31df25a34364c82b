//! The two fetch entry points: process grid and inferential alignment.
//!
//! Both run one operation end to end against a [`HistorianSource`],
//! sequentially per tag, reporting progress and recoverable failures through
//! a [`ProgressSink`] and checking a [`CancelToken`] between iterations.

use crate::aggregate::aggregate;
use crate::error::{AlignError, CancelToken};
use crate::lab::collect_lab_samples;
use crate::progress::ProgressSink;
use crate::request::{FetchRequest, GridRequest, InferentialRequest};
use crate::table::{OutputRow, ResultTable};
use pde_historian::sample::RawSeries;
use pde_historian::source::HistorianSource;
use std::collections::HashMap;

/// Dispatch one fetch request to the matching driver.
pub fn run(
    source: &dyn HistorianSource,
    request: &FetchRequest,
    sink: &dyn ProgressSink,
    cancel: &CancelToken,
) -> Result<ResultTable, AlignError> {
    match request {
        FetchRequest::Grid(grid) => run_process_grid(source, grid, sink, cancel),
        FetchRequest::Inferential(inferential) => {
            run_inferential(source, inferential, sink, cancel)
        }
    }
}

/// Fetch grid-interpolated values per tag over a fixed range/interval and
/// outer-join them into one table.
///
/// Tags are fetched strictly sequentially in request order. A tag-level
/// failure is reported and that tag is excluded from the merge; the
/// operation only fails if zero tags succeeded. Description/unit metadata is
/// captured alongside each successful tag. Progress runs to 90 during the
/// per-tag fetch, 95 during the merge, 100 on completion.
pub fn run_process_grid(
    source: &dyn HistorianSource,
    request: &GridRequest,
    sink: &dyn ProgressSink,
    cancel: &CancelToken,
) -> Result<ResultTable, AlignError> {
    let total = request.tags.len();
    let mut fetched: Vec<RawSeries> = Vec::new();
    let mut descriptions: HashMap<String, String> = HashMap::new();
    let mut units: HashMap<String, String> = HashMap::new();

    for (i, tag) in request.tags.iter().enumerate() {
        if cancel.is_cancelled() {
            sink.error("Fetch cancelled; partial process data discarded.");
            return Err(AlignError::Cancelled);
        }
        sink.progress((i * 90 / total) as u8, &format!("Fetching {}", tag), "");
        match source.interpolated_values(tag, request.start, request.end, request.interval) {
            Ok(series) => {
                if let Some(meta) = source.tag_meta(tag) {
                    descriptions.insert(tag.clone(), meta.description);
                    units.insert(tag.clone(), meta.unit);
                }
                fetched.push(series);
            }
            Err(e) => {
                sink.error(&format!("Failed to fetch {}: {}", tag, e));
            }
        }
    }

    if fetched.is_empty() {
        return Err(AlignError::NoDataFetched);
    }

    sink.progress(95, "Merging data...", "");
    let mut table = ResultTable::merge_series(&fetched);
    table.descriptions = descriptions;
    table.units = units;
    sink.progress(
        100,
        "Complete!",
        &format!("Retrieved {} tags", table.columns.len()),
    );
    Ok(table)
}

/// Align sparse lab sample events with time-weighted windows of process data.
///
/// Collects lab events first (only a total absence of lab data is fatal),
/// then walks them in ascending order: for each event the actual sample time
/// is derived from the window offset and every process tag is aggregated
/// around it. Per-tag failures degrade to nulls and never abort the run.
/// Columns come out as the fetched lab tags followed by every requested
/// process tag; a process tag that never yields a value keeps its column of
/// nulls. Progress runs to 95 across events, 100 on completion.
pub fn run_inferential(
    source: &dyn HistorianSource,
    request: &InferentialRequest,
    sink: &dyn ProgressSink,
    cancel: &CancelToken,
) -> Result<ResultTable, AlignError> {
    let lab = collect_lab_samples(source, &request.lab_tags, request.start, request.end, sink)?;
    let total = lab.events.len();

    let mut columns = lab.tags.clone();
    columns.extend(request.process_tags.iter().cloned());

    let mut rows: Vec<OutputRow> = Vec::with_capacity(total);
    for (i, event) in lab.events.iter().enumerate() {
        if cancel.is_cancelled() {
            sink.error("Fetch cancelled; partial inferential data discarded.");
            return Err(AlignError::Cancelled);
        }
        let actual = request.window.actual_time(event.timestamp);
        let mut values: Vec<Option<f64>> = event.values.iter().map(|v| Some(*v)).collect();
        for tag in &request.process_tags {
            values.push(aggregate(source, tag, event.timestamp, &request.window, sink));
        }
        rows.push(OutputRow::new(event.timestamp, Some(actual), values));
        sink.progress(
            (i * 95 / total) as u8,
            &format!("Sample {}/{}", i + 1, total),
            &format!("Time: {}", event.timestamp),
        );
    }

    sink.progress(
        100,
        "Inferential dataset complete!",
        &format!("{} rows", rows.len()),
    );
    Ok(ResultTable {
        columns,
        rows,
        descriptions: HashMap::new(),
        units: HashMap::new(),
    })
}
