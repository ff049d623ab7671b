//! Job DTOs
//!
//! Response bodies returned by the generation backend. Field names match
//! the server's JSON exactly.

use serde::{Deserialize, Serialize};

/// Response to a job submission.
///
/// An empty `task_id` means the backend accepted the request but assigned
/// no job; callers treat that as a failed submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    #[serde(default)]
    pub task_id: String,
}

/// Response to an incremental event fetch.
///
/// `events` contains only lines beyond the count the caller reported as
/// already received; `n_received` is the new total to report next time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventsResponse {
    pub events: Vec<String>,
    pub n_received: usize,
}

/// Response to a status fetch. `status` is an opaque token string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

/// Response to a result fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultResponse {
    pub success: bool,
    #[serde(default)]
    pub url: String,
}
