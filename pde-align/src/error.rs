use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Fatal outcomes of one fetch operation.
///
/// Per-tag failures never surface here; they degrade to nulls and are
/// reported through the error channel. Only total data absence (or an
/// explicit cancel) aborts a run.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum AlignError {
    /// No lab series could be fetched at all; there is nothing to anchor to.
    NoLabData,
    /// No process tag could be fetched at all in grid mode.
    NoDataFetched,
    /// The operation was cancelled between tag iterations.
    Cancelled,
}

impl fmt::Display for AlignError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlignError::NoLabData => write!(f, "No lab data found."),
            AlignError::NoDataFetched => write!(f, "No process data fetched."),
            AlignError::Cancelled => write!(f, "Fetch cancelled."),
        }
    }
}

impl std::error::Error for AlignError {}

/// Cooperative cancellation flag, checked between tag iterations and lab
/// events. Cloning shares the flag.
#[derive(Debug, Default, Clone)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        CancelToken::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
