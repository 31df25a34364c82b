use crate::progress::ProgressSink;
use crate::window::WindowParams;
use chrono::NaiveDateTime;
use pde_historian::sample::Sample;
use pde_historian::source::HistorianSource;

/// Inverse-distance-in-time weighted average of `samples` around `anchor`.
///
/// Weight for each sample is `1 / (|t - anchor|_seconds + 1)`; the `+1`
/// avoids division by zero at exact coincidence and caps the maximum weight
/// at 1. Returns `None` for an empty slice. The result always lies within
/// `[min, max]` of the input values.
pub fn weighted_average(samples: &[Sample], anchor: NaiveDateTime) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    let mut weighted_sum = 0.0;
    let mut weight_sum = 0.0;
    for sample in samples {
        let distance_secs =
            (sample.timestamp - anchor).num_milliseconds().abs() as f64 / 1000.0;
        let weight = 1.0 / (distance_secs + 1.0);
        weighted_sum += sample.value * weight;
        weight_sum += weight;
    }
    Some(weighted_sum / weight_sum)
}

/// Compute one weighted value for `tag` around a recorded lab timestamp.
///
/// Fetches raw samples over the configured window and weights them against
/// the window anchor. A fetch failure is reported through the sink and
/// yields `None`; an empty window yields `None`. A single tag's failure
/// never aborts the batch.
pub fn aggregate(
    source: &dyn HistorianSource,
    tag: &str,
    recorded: NaiveDateTime,
    params: &WindowParams,
    sink: &dyn ProgressSink,
) -> Option<f64> {
    let window = params.window_for(recorded);
    if window.is_inverted() {
        return None;
    }
    match source.recorded_values(tag, window.start, window.end) {
        Ok(series) => weighted_average(&series.samples, window.anchor),
        Err(e) => {
            sink.error(&format!(
                "{} fetch around {} (actual {}) failed: {}",
                tag,
                recorded,
                params.actual_time(recorded),
                e
            ));
            None
        }
    }
}
