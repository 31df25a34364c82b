use crate::error::AlignError;
use crate::progress::ProgressSink;
use chrono::NaiveDateTime;
use pde_historian::source::HistorianSource;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One synchronized lab sample: a recorded timestamp at which every fetched
/// lab tag reported a value. Values are aligned to [`LabSampleSet::tags`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabSampleEvent {
    pub timestamp: NaiveDateTime,
    pub values: Vec<f64>,
}

/// The ordered outcome of lab sample collection: which lab tags were
/// successfully fetched (request order preserved) and the events where all
/// of them coincide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabSampleSet {
    pub tags: Vec<String>,
    pub events: Vec<LabSampleEvent>,
}

/// Fetch all lab tags over `[start, end]` and join them into sample events.
///
/// A tag-level fetch failure is reported through the sink and that tag is
/// excluded from the join. The series are outer-joined on exact timestamp
/// equality and any row with a missing value is dropped, so an event is only
/// emitted where every surviving lab tag reported at that instant. Output is
/// ascending by timestamp.
///
/// Fails with [`AlignError::NoLabData`] iff zero lab series were fetched;
/// with nothing to anchor to, the whole inferential run aborts.
pub fn collect_lab_samples(
    source: &dyn HistorianSource,
    lab_tags: &[String],
    start: NaiveDateTime,
    end: NaiveDateTime,
    sink: &dyn ProgressSink,
) -> Result<LabSampleSet, AlignError> {
    let mut fetched: Vec<(String, Vec<(NaiveDateTime, f64)>)> = Vec::new();
    for tag in lab_tags {
        match source.recorded_values(tag, start, end) {
            Ok(series) => {
                let points = series
                    .samples
                    .iter()
                    .map(|s| (s.timestamp, s.value))
                    .collect();
                fetched.push((tag.clone(), points));
            }
            Err(e) => {
                sink.error(&format!("Lab tag {} failed: {}", tag, e));
            }
        }
    }
    if fetched.is_empty() {
        return Err(AlignError::NoLabData);
    }

    // Outer join on exact timestamp, one slot per surviving tag.
    let tag_count = fetched.len();
    let mut joined: BTreeMap<NaiveDateTime, Vec<Option<f64>>> = BTreeMap::new();
    for (slot, (_, points)) in fetched.iter().enumerate() {
        for (timestamp, value) in points {
            joined
                .entry(*timestamp)
                .or_insert_with(|| vec![None; tag_count])[slot] = Some(*value);
        }
    }

    // Keep only rows where every tag reported; BTreeMap iteration gives the
    // ascending order.
    let events = joined
        .into_iter()
        .filter_map(|(timestamp, row)| {
            row.into_iter()
                .collect::<Option<Vec<f64>>>()
                .map(|values| LabSampleEvent { timestamp, values })
        })
        .collect();

    Ok(LabSampleSet {
        tags: fetched.into_iter().map(|(tag, _)| tag).collect(),
        events,
    })
}
