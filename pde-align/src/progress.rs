use log::{info, warn};

/// Observational channel for fetch progress and recoverable failures.
///
/// Percent is bounded [0, 100] and monotonic within one operation; the final
/// call of a successful run is always 100. Error messages are human-readable
/// and name the tag and time context, so operators can diagnose historian
/// gaps without aborting a long run.
pub trait ProgressSink {
    fn progress(&self, percent: u8, status: &str, detail: &str);
    fn error(&self, message: &str);
}

/// Routes progress to `log::info!` and recoverable failures to `log::warn!`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl ProgressSink for LogSink {
    fn progress(&self, percent: u8, status: &str, detail: &str) {
        if detail.is_empty() {
            info!("[{:3}%] {}", percent, status);
        } else {
            info!("[{:3}%] {} ({})", percent, status, detail);
        }
    }

    fn error(&self, message: &str) {
        warn!("{}", message);
    }
}

/// Discards everything. Useful where a caller has no observer to attach.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn progress(&self, _percent: u8, _status: &str, _detail: &str) {}
    fn error(&self, _message: &str) {}
}
