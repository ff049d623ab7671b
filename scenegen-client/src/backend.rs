//! Backend capability trait
//!
//! The narrow contract the task state machine needs from a backend:
//! submit a job, fetch new log events, fetch status, fetch the result.
//! [`crate::GenerationClient`] is the HTTP implementation; tests supply
//! scripted stand-ins.

use async_trait::async_trait;

use crate::error::Result;
use scenegen_core::domain::job::{JobConfiguration, JobStatus};

/// A batch of newly delivered event lines.
#[derive(Debug, Clone)]
pub struct EventBatch {
    /// Event lines beyond the count the caller reported as received
    pub events: Vec<String>,
    /// Updated total to report on the next fetch (cursor protocol)
    pub total_received: usize,
}

/// Remote operations for one generation job family
///
/// All four operations report failure through their result; none of them
/// holds mutable task state, so implementations must be safe to share
/// across concurrently running tasks.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Submit a new generation job
    ///
    /// Returns the backend-assigned job id verbatim. The backend may
    /// answer with an empty id; callers treat that as a failed
    /// submission.
    async fn submit(&self, config: &JobConfiguration) -> Result<String>;

    /// Fetch log events beyond the first `received` ones
    async fn fetch_events(&self, job_id: &str, received: usize) -> Result<EventBatch>;

    /// Fetch the job's current status
    async fn fetch_status(&self, job_id: &str) -> Result<JobStatus>;

    /// Fetch the result locator for a completed job
    ///
    /// Only meaningful once the job's status has been observed as
    /// `Completed`; errors if the backend reports no successful result.
    async fn fetch_result(&self, job_id: &str) -> Result<String>;
}
