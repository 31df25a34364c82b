use crate::sample::{DumpError, DumpRow, RawSeries, Sample};
use crate::source::{HistorianSource, SourceError};
use crate::tag::TagMeta;
use chrono::{Duration, NaiveDateTime};
use std::collections::{BTreeMap, HashMap};

/// An in-memory historian backed by per-tag sorted sample vectors.
///
/// This is the offline stand-in for a live historian connection: the CLI
/// loads one from an exported dump file, and the test suites build them
/// directly. Interpolated reads are served by linear interpolation between
/// the bracketing raw samples; grid points outside the recorded range are
/// omitted rather than extrapolated.
#[derive(Debug, Default, Clone)]
pub struct MemorySource {
    series: BTreeMap<String, Vec<Sample>>,
    meta: HashMap<String, TagMeta>,
}

impl MemorySource {
    pub fn new() -> Self {
        MemorySource::default()
    }

    /// Load a source from a historian dump CSV body and an optional tag
    /// metadata CSV body.
    pub fn from_dump_csv(dump: &str, meta_csv: Option<&str>) -> Result<Self, DumpError> {
        let rows = DumpRow::parse_dump(dump)?;
        let mut source = MemorySource::new();
        for (tag, samples) in DumpRow::rows_to_series(rows) {
            source.series.insert(tag, samples);
        }
        if let Some(meta_body) = meta_csv {
            source.meta =
                TagMeta::parse_meta_csv(meta_body).map_err(|_| DumpError::DumpCollectionError)?;
        }
        Ok(source)
    }

    /// Add (or replace) the sample series for one tag.
    pub fn with_series(mut self, tag: impl Into<String>, mut samples: Vec<Sample>) -> Self {
        samples.sort_by_key(|s| s.timestamp);
        self.series.insert(tag.into(), samples);
        self
    }

    /// Add (or replace) the metadata for one tag.
    pub fn with_meta(mut self, tag: impl Into<String>, meta: TagMeta) -> Self {
        self.meta.insert(tag.into(), meta);
        self
    }

    pub fn tag_count(&self) -> usize {
        self.series.len()
    }

    fn samples_for(&self, tag: &str) -> Result<&[Sample], SourceError> {
        self.series
            .get(tag)
            .map(|v| v.as_slice())
            .ok_or_else(|| SourceError::new(tag, "tag not found in historian"))
    }

    /// Linearly interpolate the series value at `at`, if `at` lies within
    /// the recorded range.
    fn value_at(samples: &[Sample], at: NaiveDateTime) -> Option<f64> {
        let first = samples.first()?;
        let last = samples.last()?;
        if at < first.timestamp || at > last.timestamp {
            return None;
        }
        // Index of the first sample at or after `at`.
        let idx = samples.partition_point(|s| s.timestamp < at);
        let upper = &samples[idx];
        if upper.timestamp == at || idx == 0 {
            return Some(upper.value);
        }
        let lower = &samples[idx - 1];
        let span = (upper.timestamp - lower.timestamp).num_seconds();
        if span == 0 {
            return Some(upper.value);
        }
        let elapsed = (at - lower.timestamp).num_seconds();
        let slope = (upper.value - lower.value) / span as f64;
        Some(lower.value + slope * elapsed as f64)
    }
}

impl HistorianSource for MemorySource {
    fn recorded_values(
        &self,
        tag: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<RawSeries, SourceError> {
        let samples = self.samples_for(tag)?;
        let in_range = samples
            .iter()
            .filter(|s| s.timestamp >= start && s.timestamp <= end)
            .copied()
            .collect();
        Ok(RawSeries::new(tag, in_range))
    }

    fn interpolated_values(
        &self,
        tag: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
        interval: Duration,
    ) -> Result<RawSeries, SourceError> {
        if interval <= Duration::zero() {
            return Err(SourceError::new(tag, "interpolation interval must be positive"));
        }
        let samples = self.samples_for(tag)?;
        let mut grid = Vec::new();
        let mut at = start;
        while at <= end {
            if let Some(value) = Self::value_at(samples, at) {
                grid.push(Sample::new(at, value));
            }
            at = at + interval;
        }
        Ok(RawSeries::new(tag, grid))
    }

    fn tag_meta(&self, tag: &str) -> Option<TagMeta> {
        self.meta.get(tag).cloned()
    }
}
