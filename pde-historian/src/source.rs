use crate::sample::RawSeries;
use crate::tag::TagMeta;
use chrono::{Duration, NaiveDateTime};

/// A recoverable per-tag fetch failure from the historian.
///
/// These never propagate unchecked through the alignment core; each one is
/// reported through the error channel and degrades to a null value.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceError {
    pub tag: String,
    pub message: String,
}

impl SourceError {
    pub fn new(tag: impl Into<String>, message: impl Into<String>) -> Self {
        SourceError {
            tag: tag.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.tag, self.message)
    }
}

impl std::error::Error for SourceError {}

/// The historian collaborator boundary.
///
/// Exposes, per tag: raw recorded samples in a range, grid-interpolated
/// samples at a fixed step, and optional description/unit metadata. All
/// errors are per-tag and recoverable; connection-level failures belong to
/// whatever constructs the source, upstream of the alignment core.
pub trait HistorianSource {
    /// Raw recorded samples for `tag` in `[start, end]` inclusive,
    /// ascending by timestamp.
    fn recorded_values(
        &self,
        tag: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<RawSeries, SourceError>;

    /// Grid-interpolated samples for `tag` at fixed `interval` spacing over
    /// `[start, end]`, ascending by timestamp.
    fn interpolated_values(
        &self,
        tag: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
        interval: Duration,
    ) -> Result<RawSeries, SourceError>;

    /// Description/unit metadata for `tag`, if the historian has any.
    fn tag_meta(&self, tag: &str) -> Option<TagMeta>;
}
