use std::fmt;

use crawl_monitor_core::{JobSnapshot, JobStatus};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Body of the job-creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct CreateJobRequest<'a> {
    pub vendor_name: &'a str,
    pub base_url: &'a str,
    pub start_urls: &'a [String],
    pub page_limit: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct CreateJobResponse {
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct StatusResponse {
    pub status: String,
    #[serde(default)]
    pub discovered: u64,
    #[serde(default)]
    pub extracted: u64,
    #[serde(default)]
    pub failed: u64,
}

impl From<StatusResponse> for JobSnapshot {
    fn from(response: StatusResponse) -> Self {
        JobSnapshot {
            status: JobStatus::from_wire(&response.status),
            discovered: response.discovered,
            extracted: response.extracted,
            failed: response.failed,
        }
    }
}

/// What a single poll tick produced, as handed to a [`crate::SnapshotSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollEvent {
    Snapshot {
        job_id: String,
        snapshot: JobSnapshot,
    },
    /// The status endpoint does not know the job yet.
    Missed { job_id: String },
    Failed { job_id: String, error: ApiError },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// A 404 from the status endpoint: the job record is not queryable yet.
    pub fn is_soft_miss(&self) -> bool {
        self.kind == FailureKind::HttpStatus(404)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    MalformedBody,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::MalformedBody => write!(f, "malformed response body"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("job submission failed: {0}")]
pub struct SubmissionError(#[from] pub ApiError);
