use chrono::NaiveDateTime;
use pde_historian::sample::RawSeries;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// The single Status value every output row carries. The source system does
/// not track per-point quality in this pipeline; downstream consumers depend
/// on the literal constant.
pub const GOOD_STATUS: &str = "G";

/// One row of a fetch result: the recorded (or grid) timestamp, the inferred
/// actual sample time for inferential rows, one value slot per column, and
/// the row status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputRow {
    pub timestamp: NaiveDateTime,
    pub actual_time: Option<NaiveDateTime>,
    pub values: Vec<Option<f64>>,
    pub status: String,
}

impl OutputRow {
    pub fn new(
        timestamp: NaiveDateTime,
        actual_time: Option<NaiveDateTime>,
        values: Vec<Option<f64>>,
    ) -> Self {
        OutputRow {
            timestamp,
            actual_time,
            values,
            status: GOOD_STATUS.to_string(),
        }
    }
}

/// The final tabular result of one fetch operation, plus per-tag metadata.
///
/// Rows are ascending by timestamp and each row holds exactly one value slot
/// (possibly null) per column. Created once per fetch, replaces any prior
/// result, and is consumed read-only after that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ResultTable {
    pub columns: Vec<String>,
    pub rows: Vec<OutputRow>,
    pub descriptions: HashMap<String, String>,
    pub units: HashMap<String, String>,
}

impl ResultTable {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// True when any row carries an actual sample time (inferential results).
    pub fn has_actual_time(&self) -> bool {
        self.rows.iter().any(|r| r.actual_time.is_some())
    }

    /// Outer-join per-tag series on exact timestamp into one table.
    ///
    /// Column order follows `series_list` order. Rows come out ascending by
    /// timestamp; a tag with no sample at a joined timestamp gets a null
    /// slot. Status is appended once per row here, after the merge, never
    /// per tag.
    pub fn merge_series(series_list: &[RawSeries]) -> ResultTable {
        let columns: Vec<String> = series_list.iter().map(|s| s.tag.clone()).collect();
        let mut joined: BTreeMap<NaiveDateTime, Vec<Option<f64>>> = BTreeMap::new();
        for (slot, series) in series_list.iter().enumerate() {
            for sample in &series.samples {
                joined
                    .entry(sample.timestamp)
                    .or_insert_with(|| vec![None; series_list.len()])[slot] = Some(sample.value);
            }
        }
        let rows = joined
            .into_iter()
            .map(|(timestamp, values)| OutputRow::new(timestamp, None, values))
            .collect();
        ResultTable {
            columns,
            rows,
            descriptions: HashMap::new(),
            units: HashMap::new(),
        }
    }
}
