//! Generation task state machine
//!
//! A [`GenerationTask`] owns one job's lifecycle: it is initialized with
//! a [`JobConfiguration`], submits the job through a
//! [`GenerationBackend`], polls for incremental log events and status at
//! the configured interval, and resolves a terminal state. The same
//! machine drives both object and HDRI generation; only the backend
//! client differs.
//!
//! Callers observe the task through an explicit snapshot query
//! ([`GenerationTask::snapshot`]), a broadcast log channel carrying both
//! backend event lines and local narration, and a finished channel that
//! fires exactly once per run when a terminal state is reached.

use std::ops::ControlFlow;
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use tokio::sync::broadcast;
use tracing::{error, warn};

use scenegen_client::backend::GenerationBackend;
use scenegen_core::domain::job::{JobConfiguration, JobStatus};
use scenegen_core::domain::log::EventLog;

use crate::scheduler::Poller;

const LOG_CHANNEL_CAPACITY: usize = 256;
const FINISHED_CHANNEL_CAPACITY: usize = 16;

/// Point-in-time view of a task's externally observable state.
#[derive(Debug, Clone)]
pub struct TaskSnapshot {
    pub status: JobStatus,
    /// Backend-assigned job id; empty before submission
    pub job_id: String,
    /// Result locator; empty until the run completes
    pub result_url: String,
    /// Whether a run is active (between submit and terminal resolution)
    pub busy: bool,
    /// Backend event lines received so far, in arrival order
    pub events: Vec<String>,
}

#[derive(Debug, Default)]
struct TaskState {
    config: Option<JobConfiguration>,
    job_id: String,
    result_url: String,
    status: JobStatus,
    log: EventLog,
    busy: bool,
}

struct Inner<B> {
    backend: B,
    state: Mutex<TaskState>,
    log_tx: broadcast::Sender<String>,
    finished_tx: broadcast::Sender<()>,
    poller: Mutex<Option<Poller>>,
}

/// State machine for one pending generation job.
///
/// Not re-entrant: the busy flag serializes runs, and only one poller
/// exists at a time. Cloning the handle shares the same underlying task.
pub struct GenerationTask<B> {
    inner: Arc<Inner<B>>,
}

impl<B> Clone for GenerationTask<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<B: GenerationBackend + 'static> GenerationTask<B> {
    pub fn new(backend: B) -> Self {
        let (log_tx, _) = broadcast::channel(LOG_CHANNEL_CAPACITY);
        let (finished_tx, _) = broadcast::channel(FINISHED_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                backend,
                state: Mutex::new(TaskState::default()),
                log_tx,
                finished_tx,
                poller: Mutex::new(None),
            }),
        }
    }

    /// Subscribes to the log channel.
    ///
    /// Carries backend event lines and local status narration in one
    /// stream, in the order the task produced them.
    pub fn subscribe_log(&self) -> broadcast::Receiver<String> {
        self.inner.log_tx.subscribe()
    }

    /// Subscribes to the finished channel; one signal per run.
    pub fn subscribe_finished(&self) -> broadcast::Receiver<()> {
        self.inner.finished_tx.subscribe()
    }

    pub fn snapshot(&self) -> TaskSnapshot {
        let state = self.inner.state.lock().unwrap();
        TaskSnapshot {
            status: state.status,
            job_id: state.job_id.clone(),
            result_url: state.result_url.clone(),
            busy: state.busy,
            events: state.log.all().to_vec(),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.inner.state.lock().unwrap().busy
    }

    /// Readies the task for a new run.
    ///
    /// Rejected while a run is active: the rejection is narrated on the
    /// log channel and the call changes nothing. Otherwise any previous
    /// job id, result, and event log are discarded and the new
    /// configuration is stored.
    pub fn initialize(&self, config: JobConfiguration) {
        {
            let mut state = self.inner.state.lock().unwrap();
            if state.busy {
                drop(state);
                warn!("Cannot reinitialize a generation task while a run is active.");
                self.inner
                    .emit("Cannot reinitialize while a generation run is active.");
                return;
            }
            state.config = Some(config);
            state.job_id.clear();
            state.result_url.clear();
            state.status = JobStatus::NotStarted;
            state.log.clear();
        }

        // A poller from a finished run has already stopped; this only
        // clears the stale handle.
        if let Some(poller) = self.inner.poller.lock().unwrap().take() {
            poller.cancel();
        }
    }

    /// Submits the configured job and starts polling.
    ///
    /// Rejected while a run is active or before
    /// [`GenerationTask::initialize`] has been called; both rejections
    /// are narrated and ignored. A submission that yields no job id is a
    /// terminal failure: the run ends without ever reaching
    /// `InProgress`, and the finished signal fires.
    pub async fn submit(&self) {
        let config = {
            let mut state = self.inner.state.lock().unwrap();
            if state.busy {
                drop(state);
                warn!("Cannot submit while a generation run is active.");
                self.inner.emit("Cannot submit while a generation run is active.");
                return;
            }
            let Some(config) = state.config.clone() else {
                drop(state);
                warn!("Cannot submit before the task has been initialized.");
                self.inner
                    .emit("Cannot submit before the task has been initialized.");
                return;
            };
            state.busy = true;
            config
        };

        match &config.reference {
            Some(reference) => self.inner.emit(format!(
                "Starting generation job with prompt: `{}` and image: `{}`",
                config.prompt, reference.file_name
            )),
            None => self.inner.emit(format!(
                "Starting generation job with prompt: `{}`",
                config.prompt
            )),
        }

        match self.inner.backend.submit(&config).await {
            Ok(job_id) if !job_id.is_empty() => {
                self.inner
                    .emit(format!("Generation job submitted. Job id: `{job_id}`"));
                {
                    let mut state = self.inner.state.lock().unwrap();
                    state.job_id = job_id.clone();
                    state.log.clear();
                    state.status = JobStatus::InProgress;
                }
                self.start_polling(job_id, config.poll_interval);
            }
            Ok(_) => {
                self.inner
                    .fail_submission("Failed to get a job id from the generation request.".into());
            }
            Err(e) => {
                self.inner
                    .fail_submission(format!("Generation job submission failed: {e}"));
            }
        }
    }

    fn start_polling(&self, job_id: String, period: Duration) {
        let weak: Weak<Inner<B>> = Arc::downgrade(&self.inner);
        let poller = Poller::spawn(period, move || {
            let weak = weak.clone();
            let job_id = job_id.clone();
            async move {
                match weak.upgrade() {
                    Some(inner) => Inner::tick(inner, job_id).await,
                    None => ControlFlow::Break(()),
                }
            }
        });
        *self.inner.poller.lock().unwrap() = Some(poller);
    }
}

impl<B: GenerationBackend> Inner<B> {
    fn emit(&self, line: impl Into<String>) {
        let _ = self.log_tx.send(line.into());
    }

    fn finish(&self) {
        let _ = self.finished_tx.send(());
    }

    fn fail_submission(&self, message: String) {
        error!("{message}");
        self.emit(message);
        {
            let mut state = self.state.lock().unwrap();
            state.status = JobStatus::Failed;
            state.busy = false;
        }
        self.finish();
    }

    /// One scheduled poll: fetch new events, then status.
    ///
    /// `job_id` is the id this poller was started for; every response is
    /// applied only if it still matches the task's current id, so a
    /// reply that outlives its run is dropped on the floor.
    async fn tick(inner: Arc<Self>, job_id: String) -> ControlFlow<()> {
        {
            let state = inner.state.lock().unwrap();
            if state.job_id.is_empty() {
                warn!("No current job id to poll.");
                return ControlFlow::Continue(());
            }
            if state.job_id != job_id {
                return ControlFlow::Break(());
            }
        }

        inner.poll_events(&job_id).await;
        inner.poll_status(&job_id).await
    }

    async fn poll_events(&self, job_id: &str) {
        let received = self.state.lock().unwrap().log.cursor();

        match self.backend.fetch_events(job_id, received).await {
            Ok(batch) => {
                let mut state = self.state.lock().unwrap();
                if state.job_id != job_id {
                    return;
                }
                for event in &batch.events {
                    let _ = self.log_tx.send(event.clone());
                }
                state.log.set_received(batch.total_received);
                state.log.append(batch.events);
            }
            // Transient: polling carries on and refetches next tick.
            Err(e) => warn!("Failed to fetch generation events: {e}"),
        }
    }

    async fn poll_status(&self, job_id: &str) -> ControlFlow<()> {
        let status = match self.backend.fetch_status(job_id).await {
            Ok(status) => status,
            Err(e) => {
                // Transient as well; only a backend-reported FAILED or a
                // failed result resolution terminates the run.
                warn!("Failed to fetch generation status: {e}");
                return ControlFlow::Continue(());
            }
        };

        {
            let state = self.state.lock().unwrap();
            if state.job_id != job_id {
                return ControlFlow::Break(());
            }
        }

        match status {
            JobStatus::Completed => {
                self.resolve_result(job_id).await;
                ControlFlow::Break(())
            }
            JobStatus::Failed => {
                let message = format!("Generation job `{job_id}` failed.");
                warn!("{message}");
                self.emit(message);
                {
                    let mut state = self.state.lock().unwrap();
                    state.status = JobStatus::Failed;
                    state.busy = false;
                }
                self.finish();
                ControlFlow::Break(())
            }
            JobStatus::InProgress | JobStatus::NotStarted => ControlFlow::Continue(()),
        }
    }

    /// Single-attempt result fetch after observing a completed status.
    ///
    /// A missing or empty locator despite the completed status degrades
    /// the run to failure.
    async fn resolve_result(&self, job_id: &str) {
        match self.backend.fetch_result(job_id).await {
            Ok(url) if !url.is_empty() => {
                {
                    let mut state = self.state.lock().unwrap();
                    if state.job_id != job_id {
                        return;
                    }
                    state.result_url = url.clone();
                    state.status = JobStatus::Completed;
                    state.busy = false;
                }
                self.emit(format!(
                    "Generation job `{job_id}` completed successfully. Url: {url}"
                ));
                self.finish();
            }
            Ok(_) => self.fail_result(
                job_id,
                format!("The backend returned an empty result url for job `{job_id}`."),
            ),
            Err(e) => self.fail_result(
                job_id,
                format!("Failed to fetch the result for job `{job_id}`: {e}"),
            ),
        }
    }

    fn fail_result(&self, job_id: &str, message: String) {
        error!("{message}");
        {
            let mut state = self.state.lock().unwrap();
            if state.job_id != job_id {
                return;
            }
            state.status = JobStatus::Failed;
            state.busy = false;
        }
        self.emit(message);
        self.finish();
    }
}
