use crate::window::WindowParams;
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Configuration for one process-grid fetch: interpolated values for each
/// tag at fixed `interval` spacing over `[start, end]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridRequest {
    pub tags: Vec<String>,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    #[serde(with = "duration_seconds")]
    pub interval: Duration,
}

/// Configuration for one inferential fetch: lab events over `[start, end]`
/// aligned with weighted windows of each process tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferentialRequest {
    pub lab_tags: Vec<String>,
    pub process_tags: Vec<String>,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub window: WindowParams,
}

/// One fetch operation. The explicit value object handed to the worker in
/// place of any mutable selection state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FetchRequest {
    Grid(GridRequest),
    Inferential(InferentialRequest),
}

mod duration_seconds {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_i64(d.num_seconds())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::seconds(i64::deserialize(d)?))
    }
}
