//! Core types and the data-source boundary for historian time series.
//!
//! All pipeline arithmetic is done on [`chrono::NaiveDateTime`], a single
//! consistent naive wall clock. Timezone handling, where it exists at all,
//! happens at the export boundary as a label, never as a conversion.

pub mod memory;
pub mod sample;
pub mod source;
pub mod tag;
