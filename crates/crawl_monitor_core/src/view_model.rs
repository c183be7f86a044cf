use crate::JobArtifacts;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonitorPhase {
    #[default]
    Idle,
    Submitting,
    Polling,
    Terminal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Failed,
}

/// Read-only projection of the session for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MonitorViewModel {
    pub phase: MonitorPhase,
    pub job_id: Option<String>,
    pub status_text: String,
    pub discovered: u64,
    pub extracted: u64,
    pub failed: u64,
    pub progress_text: String,
    /// `None` while no estimate is available yet.
    pub progress_percent: Option<u8>,
    pub outcome: Option<Outcome>,
    pub artifacts: Option<JobArtifacts>,
    pub start_enabled: bool,
    pub cancel_enabled: bool,
    /// Hard poll failures since the last accepted snapshot.
    pub poll_failures: u32,
    pub last_error: Option<String>,
}
