use std::fmt;

/// Opaque identifier of a remote crawl job, issued by the engine on creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobHandle {
    job_id: String,
}

impl JobHandle {
    pub fn new(job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
        }
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.job_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Queued,
    Running,
    Completed,
    Failed,
    /// Any status value the engine reports that this client does not know.
    Unknown,
}

impl JobStatus {
    /// Maps the engine's wire value. `starting` is the engine's initial record.
    pub fn from_wire(value: &str) -> Self {
        match value {
            "queued" | "starting" => JobStatus::Queued,
            "running" => JobStatus::Running,
            "completed" => JobStatus::Completed,
            "failed" => JobStatus::Failed,
            _ => JobStatus::Unknown,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    pub fn label(self) -> &'static str {
        match self {
            JobStatus::Queued => "QUEUED",
            JobStatus::Running => "RUNNING",
            JobStatus::Completed => "COMPLETED",
            JobStatus::Failed => "FAILED",
            JobStatus::Unknown => "UNKNOWN",
        }
    }
}

/// One point-in-time status report for a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobSnapshot {
    pub status: JobStatus,
    pub discovered: u64,
    pub extracted: u64,
    pub failed: u64,
}

impl JobSnapshot {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Where the results of a finished job can be looked at, relative to the engine's base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobArtifacts {
    pub preview_path: String,
    pub csv_export_path: String,
}

impl JobArtifacts {
    pub fn for_job(job: &JobHandle) -> Self {
        Self {
            preview_path: format!("/vendor-import/preview?session_id={}", job.job_id()),
            csv_export_path: format!("/api/export/csv/{}", job.job_id()),
        }
    }
}

/// Flat record of the last submitted parameters, as kept by a config store.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SavedParameters {
    pub vendor_name: String,
    pub base_url: String,
    pub start_urls: Vec<String>,
    pub page_limit: u32,
}
