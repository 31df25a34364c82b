use chrono::NaiveDateTime;
use csv::{ReaderBuilder, StringRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Timestamp format used in historian dump CSV files: "YYYY-MM-DD HH:MM:SS"
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Expected number of columns in a historian dump CSV row: tag, timestamp, value.
pub const CSV_ROW_LENGTH: usize = 3;

/// Errors that can occur when parsing a historian dump.
#[derive(Debug, PartialEq, Clone, Copy, Hash)]
pub enum DumpError {
    RowParseError,
    DumpCollectionError,
}

impl std::fmt::Display for DumpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DumpError::RowParseError => write!(f, "failed to parse historian dump row"),
            DumpError::DumpCollectionError => write!(f, "failed to collect historian dump rows"),
        }
    }
}

impl std::error::Error for DumpError {}

/// Represents one recorded cell value from a historian dump.
/// - `Bad`: the historian flagged the point as bad quality ("BAD")
/// - `NoData`: missing or unavailable data (represented as "---" in dumps)
/// - `Value(f64)`: an actual measurement
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub enum PointValue {
    Bad,
    NoData,
    Value(f64),
}

impl PointValue {
    /// The numeric value, if this cell holds one.
    pub fn as_value(&self) -> Option<f64> {
        match self {
            PointValue::Value(v) => Some(*v),
            _ => None,
        }
    }
}

/// A single (timestamp, value) measurement for one tag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub timestamp: NaiveDateTime,
    pub value: f64,
}

impl Sample {
    pub fn new(timestamp: NaiveDateTime, value: f64) -> Self {
        Sample { timestamp, value }
    }
}

/// An ordered (by timestamp, ascending) sequence of samples for one tag over
/// one query range. Produced fresh per query and owned by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSeries {
    pub tag: String,
    pub samples: Vec<Sample>,
}

impl RawSeries {
    /// Build a series, sorting samples ascending by timestamp.
    pub fn new(tag: impl Into<String>, mut samples: Vec<Sample>) -> Self {
        samples.sort_by_key(|s| s.timestamp);
        RawSeries {
            tag: tag.into(),
            samples,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }
}

/// One parsed historian dump row: which tag it belongs to plus the sample.
#[derive(Debug, Clone, PartialEq)]
pub struct DumpRow {
    pub tag: String,
    pub timestamp: NaiveDateTime,
    pub value: PointValue,
}

impl DumpRow {
    /// Parse a historian dump CSV body into rows.
    ///
    /// Expected columns (with header): `TAG,TIMESTAMP,VALUE` where TIMESTAMP
    /// is [`TIMESTAMP_FORMAT`] and VALUE is numeric, `---`, or `BAD`.
    pub fn parse_dump(body: &str) -> Result<Vec<DumpRow>, DumpError> {
        let records = ReaderBuilder::new()
            .has_headers(true)
            .from_reader(body.as_bytes())
            .records()
            .collect::<Result<Vec<StringRecord>, _>>()
            .map_err(|_| DumpError::DumpCollectionError)?;
        records
            .into_iter()
            .map(DumpRow::try_from)
            .collect::<Result<Vec<DumpRow>, _>>()
            .map_err(|_| DumpError::DumpCollectionError)
    }

    /// Group parsed dump rows by tag, keeping only numeric values.
    ///
    /// `Bad` and `NoData` cells are dropped here; they never enter a
    /// [`RawSeries`].
    pub fn rows_to_series(rows: Vec<DumpRow>) -> HashMap<String, Vec<Sample>> {
        let mut result: HashMap<String, Vec<Sample>> = HashMap::new();
        for row in rows {
            let entry = result.entry(row.tag).or_default();
            if let Some(value) = row.value.as_value() {
                entry.push(Sample::new(row.timestamp, value));
            }
        }
        for samples in result.values_mut() {
            samples.sort_by_key(|s| s.timestamp);
        }
        result
    }
}

impl TryFrom<StringRecord> for DumpRow {
    type Error = DumpError;

    fn try_from(record: StringRecord) -> Result<Self, Self::Error> {
        if record.len() != CSV_ROW_LENGTH {
            return Err(DumpError::RowParseError);
        }
        let tag = record.get(0).ok_or(DumpError::RowParseError)?.trim();
        if tag.is_empty() {
            return Err(DumpError::RowParseError);
        }
        let timestamp = NaiveDateTime::parse_from_str(
            record.get(1).ok_or(DumpError::RowParseError)?.trim(),
            TIMESTAMP_FORMAT,
        )
        .map_err(|_| DumpError::RowParseError)?;
        let value = match record.get(2).ok_or(DumpError::RowParseError)?.trim() {
            "---" => PointValue::NoData,
            "BAD" => PointValue::Bad,
            s => match s.parse::<f64>() {
                Ok(v) => PointValue::Value(v),
                Err(_) => return Err(DumpError::RowParseError),
            },
        };
        Ok(DumpRow {
            tag: tag.to_string(),
            timestamp,
            value,
        })
    }
}
