//! The inferential data-alignment core.
//!
//! Two entry points, both in [`driver`]: a grid fetch that resamples
//! process tags onto a fixed-interval timeline and outer-joins them into one
//! table, and an inferential fetch that anchors a time-weighted window of
//! process data to each discrete lab sample event. Everything here is
//! synchronous and UI-free; callers provide a [`progress::ProgressSink`] for
//! observation and may run the drivers on whatever worker they like.

pub mod aggregate;
pub mod driver;
pub mod error;
pub mod lab;
pub mod progress;
pub mod request;
pub mod table;
pub mod window;
