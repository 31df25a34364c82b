//! Background fetch worker: one designated job per fetch, off the caller's
//! thread, progress and warnings streamed over a channel.
//!
//! The driver itself is synchronous; the job runs it on the blocking pool
//! and forwards sink calls as [`WorkerEvent`]s. A [`FetchSession`] enforces
//! the one-fetch-in-flight rule; cancellation is cooperative through the
//! job's [`CancelToken`].

use pde_align::driver;
use pde_align::error::CancelToken;
use pde_align::progress::ProgressSink;
use pde_align::request::FetchRequest;
use pde_align::table::ResultTable;
use pde_historian::source::HistorianSource;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Events a fetch job emits, in order: zero or more Progress/Warning events,
/// then exactly one Complete or Failed.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkerEvent {
    Progress {
        percent: u8,
        status: String,
        detail: String,
    },
    /// A recoverable per-tag failure; the fetch keeps going.
    Warning(String),
    Complete(ResultTable),
    Failed(String),
}

/// Forwards sink calls into the worker's event channel.
struct ChannelSink {
    events: mpsc::UnboundedSender<WorkerEvent>,
}

impl ProgressSink for ChannelSink {
    fn progress(&self, percent: u8, status: &str, detail: &str) {
        let _ = self.events.send(WorkerEvent::Progress {
            percent,
            status: status.to_string(),
            detail: detail.to_string(),
        });
    }

    fn error(&self, message: &str) {
        let _ = self.events.send(WorkerEvent::Warning(message.to_string()));
    }
}

/// One background fetch operation.
pub struct FetchJob {
    pub events: mpsc::UnboundedReceiver<WorkerEvent>,
    cancel: CancelToken,
    handle: tokio::task::JoinHandle<()>,
}

impl FetchJob {
    /// Run `request` against `source` on the blocking pool.
    pub fn spawn(
        source: Arc<dyn HistorianSource + Send + Sync>,
        request: FetchRequest,
    ) -> FetchJob {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancelToken::new();
        let job_cancel = cancel.clone();
        let handle = tokio::task::spawn_blocking(move || {
            let sink = ChannelSink { events: tx.clone() };
            match driver::run(source.as_ref(), &request, &sink, &job_cancel) {
                Ok(table) => {
                    let _ = tx.send(WorkerEvent::Complete(table));
                }
                Err(e) => {
                    let _ = tx.send(WorkerEvent::Failed(e.to_string()));
                }
            }
        });
        FetchJob {
            events: rx,
            cancel,
            handle,
        }
    }

    /// Request cooperative cancellation; the job stops at the next tag
    /// iteration and emits `Failed`.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the blocking task to finish. The event channel closing only
    /// means the last event was sent; this observes actual task exit.
    pub async fn join(&mut self) -> Result<(), tokio::task::JoinError> {
        (&mut self.handle).await
    }
}

/// Refused because a fetch is already in flight on this session.
#[derive(Debug, PartialEq, Eq)]
pub struct FetchBusy;

impl std::fmt::Display for FetchBusy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "a fetch is already in flight on this session")
    }
}

impl std::error::Error for FetchBusy {}

/// Owns at most one in-flight fetch at a time.
#[derive(Default)]
pub struct FetchSession {
    current: Option<FetchJob>,
}

impl FetchSession {
    pub fn new() -> Self {
        FetchSession::default()
    }

    /// Start a fetch, refusing if one is still running.
    pub fn start(
        &mut self,
        source: Arc<dyn HistorianSource + Send + Sync>,
        request: FetchRequest,
    ) -> Result<&mut FetchJob, FetchBusy> {
        if let Some(job) = &self.current {
            if !job.is_finished() {
                return Err(FetchBusy);
            }
        }
        self.current = Some(FetchJob::spawn(source, request));
        Ok(self.current.as_mut().expect("job just stored"))
    }

    /// The in-flight (or last) job, if any.
    pub fn job_mut(&mut self) -> Option<&mut FetchJob> {
        self.current.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDateTime};
    use pde_align::request::GridRequest;
    use pde_align::table::GOOD_STATUS;
    use pde_historian::memory::MemorySource;
    use pde_historian::sample::{RawSeries, Sample};
    use pde_historian::source::SourceError;
    use pde_historian::tag::TagMeta;
    use std::sync::{Condvar, Mutex};

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn source() -> MemorySource {
        MemorySource::new().with_series(
            "T1",
            vec![
                Sample::new(ts("2024-01-01 00:00:00"), 1.0),
                Sample::new(ts("2024-01-01 01:00:00"), 2.0),
            ],
        )
    }

    fn grid_request(tags: &[&str]) -> FetchRequest {
        FetchRequest::Grid(GridRequest {
            tags: tags.iter().map(|s| s.to_string()).collect(),
            start: ts("2024-01-01 00:00:00"),
            end: ts("2024-01-01 01:00:00"),
            interval: Duration::hours(1),
        })
    }

    /// A source whose fetches block until the gate is opened. Lets the tests
    /// hold a job in flight deterministically.
    struct GatedSource {
        inner: MemorySource,
        gate: Mutex<bool>,
        opened: Condvar,
    }

    impl GatedSource {
        fn new(inner: MemorySource) -> Self {
            GatedSource {
                inner,
                gate: Mutex::new(false),
                opened: Condvar::new(),
            }
        }

        fn open(&self) {
            let mut open = self.gate.lock().unwrap();
            *open = true;
            self.opened.notify_all();
        }

        fn wait(&self) {
            let mut open = self.gate.lock().unwrap();
            while !*open {
                open = self.opened.wait(open).unwrap();
            }
        }
    }

    impl HistorianSource for GatedSource {
        fn recorded_values(
            &self,
            tag: &str,
            start: NaiveDateTime,
            end: NaiveDateTime,
        ) -> Result<RawSeries, SourceError> {
            self.wait();
            self.inner.recorded_values(tag, start, end)
        }

        fn interpolated_values(
            &self,
            tag: &str,
            start: NaiveDateTime,
            end: NaiveDateTime,
            interval: Duration,
        ) -> Result<RawSeries, SourceError> {
            self.wait();
            self.inner.interpolated_values(tag, start, end, interval)
        }

        fn tag_meta(&self, tag: &str) -> Option<TagMeta> {
            self.inner.tag_meta(tag)
        }
    }

    #[tokio::test]
    async fn test_job_emits_progress_then_complete() {
        let mut job = FetchJob::spawn(Arc::new(source()), grid_request(&["T1"]));
        let mut events = Vec::new();
        while let Some(event) = job.events.recv().await {
            events.push(event);
        }
        let last = events.last().unwrap();
        match last {
            WorkerEvent::Complete(table) => {
                assert_eq!(table.row_count(), 2);
                assert!(table.rows.iter().all(|r| r.status == GOOD_STATUS));
            }
            other => panic!("expected Complete, got {:?}", other),
        }
        assert!(events
            .iter()
            .any(|e| matches!(e, WorkerEvent::Progress { percent: 100, .. })));
    }

    #[tokio::test]
    async fn test_job_failure_reports_failed() {
        let mut job = FetchJob::spawn(Arc::new(source()), grid_request(&["GHOST"]));
        let mut saw_warning = false;
        let mut last = None;
        while let Some(event) = job.events.recv().await {
            if matches!(event, WorkerEvent::Warning(_)) {
                saw_warning = true;
            }
            last = Some(event);
        }
        assert!(saw_warning);
        assert_eq!(last, Some(WorkerEvent::Failed("No process data fetched.".into())));
    }

    #[tokio::test]
    async fn test_session_allows_one_fetch_in_flight() {
        let gated = Arc::new(GatedSource::new(source()));
        let mut session = FetchSession::new();
        session
            .start(gated.clone(), grid_request(&["T1"]))
            .expect("first fetch starts");

        let busy = session.start(gated.clone(), grid_request(&["T1"]));
        assert!(busy.is_err());

        gated.open();
        let job = session.job_mut().unwrap();
        while job.events.recv().await.is_some() {}
        job.join().await.unwrap();

        // The first job has exited; a new fetch may start.
        assert!(session.start(gated, grid_request(&["T1"])).is_ok());
    }

    #[tokio::test]
    async fn test_cancel_stops_between_tags() {
        let gated = Arc::new(GatedSource::new(source().with_series(
            "T2",
            vec![Sample::new(ts("2024-01-01 00:00:00"), 5.0)],
        )));
        let mut job = FetchJob::spawn(gated.clone(), grid_request(&["T1", "T2"]));
        job.cancel();
        gated.open();
        let mut last = None;
        while let Some(event) = job.events.recv().await {
            last = Some(event);
        }
        assert_eq!(last, Some(WorkerEvent::Failed("Fetch cancelled.".into())));
    }
}
