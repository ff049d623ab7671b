//! Job domain types

use std::fmt;
use std::time::Duration;

/// Poll interval used when a configuration does not supply one.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Lifecycle status of a generation job.
///
/// `Completed` and `Failed` are terminal; a task in a terminal state only
/// leaves it through a fresh initialize-then-submit cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JobStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
    Failed,
}

impl JobStatus {
    /// Parses a backend status token.
    ///
    /// Returns `None` for tokens the backend contract does not define, so
    /// callers can treat them as a fetch failure instead of panicking.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "NOT_STARTED" => Some(Self::NotStarted),
            "IN_PROGRESS" => Some(Self::InProgress),
            "COMPLETED" => Some(Self::Completed),
            "FAILED" => Some(Self::Failed),
            _ => None,
        }
    }

    /// The wire token for this status.
    pub fn as_token(&self) -> &'static str {
        match self {
            Self::NotStarted => "NOT_STARTED",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
        }
    }

    /// Whether no further automatic transitions occur from this status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

/// Reference artifact attached to an object-generation submission.
#[derive(Debug, Clone)]
pub struct ReferenceImage {
    pub file_name: String,
    /// MIME type sent with the upload; `image/*` when unknown.
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ReferenceImage {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

/// Immutable per-submission input for one generation run.
///
/// Owned exclusively by the task it was handed to and replaced wholesale
/// on reinitialization. The reference image is present for object
/// generation and absent for HDRI generation.
#[derive(Debug, Clone)]
pub struct JobConfiguration {
    pub prompt: String,
    pub reference: Option<ReferenceImage>,
    pub poll_interval: Duration,
}

impl JobConfiguration {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            reference: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Attaches a reference image to the submission.
    pub fn with_reference(mut self, reference: ReferenceImage) -> Self {
        self.reference = Some(reference);
        self
    }

    /// Overrides the poll interval.
    ///
    /// A zero duration is treated as unset and keeps the default.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        if !interval.is_zero() {
            self.poll_interval = interval;
        }
        self
    }
}
