use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Which instant the aggregation window is fixed to.
///
/// The pipeline evolved from `Legacy` (window anchored to the recorded lab
/// timestamp) to `ActualTime` (window anchored to the physically-inferred
/// sample instant). `ActualTime` is the default; `Legacy` is kept for
/// datasets calibrated against the old behavior.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize, Default)]
pub enum WindowMode {
    Legacy,
    #[default]
    ActualTime,
}

/// Windowing configuration for one inferential run.
///
/// `past_minutes` must be non-negative. `future_minutes` may be negative
/// (sample physically taken before the recorded time) or positive (analysis
/// delay after it).
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub struct WindowParams {
    pub past_minutes: i64,
    pub future_minutes: i64,
    pub mode: WindowMode,
}

impl WindowParams {
    pub fn new(past_minutes: i64, future_minutes: i64, mode: WindowMode) -> Self {
        WindowParams {
            past_minutes,
            future_minutes,
            mode,
        }
    }

    /// The inferred physical sampling instant for a recorded lab timestamp.
    pub fn actual_time(&self, recorded: NaiveDateTime) -> NaiveDateTime {
        recorded + Duration::minutes(self.future_minutes)
    }

    /// The query window and weighting anchor for a recorded lab timestamp.
    ///
    /// - `Legacy`: anchor = recorded; window
    ///   `[recorded - past, recorded + future]`. A negative future pulls the
    ///   end before the recorded time; an inverted window fetches nothing.
    /// - `ActualTime`: anchor = recorded + future; window
    ///   `[anchor - past, anchor + max(future, 0)]`.
    pub fn window_for(&self, recorded: NaiveDateTime) -> AggregationWindow {
        let past = Duration::minutes(self.past_minutes);
        let future = Duration::minutes(self.future_minutes);
        match self.mode {
            WindowMode::Legacy => AggregationWindow {
                start: recorded - past,
                end: recorded + future,
                anchor: recorded,
            },
            WindowMode::ActualTime => {
                let anchor = self.actual_time(recorded);
                let future_side = Duration::minutes(self.future_minutes.max(0));
                AggregationWindow {
                    start: anchor - past,
                    end: anchor + future_side,
                    anchor,
                }
            }
        }
    }
}

/// A resolved aggregation window: the fetch range and the instant weights
/// are measured from.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct AggregationWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub anchor: NaiveDateTime,
}

impl AggregationWindow {
    /// True when the window cannot contain any samples.
    pub fn is_inverted(&self) -> bool {
        self.end < self.start
    }
}
