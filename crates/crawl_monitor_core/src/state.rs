use crate::view_model::{MonitorPhase, MonitorViewModel, Outcome};
use crate::{JobArtifacts, JobHandle, JobSnapshot, JobStatus, ProgressEstimator};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MonitorState {
    #[default]
    Idle,
    Submitting,
    Polling {
        job: JobHandle,
        /// `None` until the first snapshot arrives.
        latest: Option<JobSnapshot>,
        progress: Option<u8>,
    },
    Terminal {
        job: JobHandle,
        snapshot: JobSnapshot,
        artifacts: JobArtifacts,
    },
}

impl MonitorState {
    pub fn phase(&self) -> MonitorPhase {
        match self {
            MonitorState::Idle => MonitorPhase::Idle,
            MonitorState::Submitting => MonitorPhase::Submitting,
            MonitorState::Polling { .. } => MonitorPhase::Polling,
            MonitorState::Terminal { .. } => MonitorPhase::Terminal,
        }
    }

    pub fn job(&self) -> Option<&JobHandle> {
        match self {
            MonitorState::Polling { job, .. } | MonitorState::Terminal { job, .. } => Some(job),
            MonitorState::Idle | MonitorState::Submitting => None,
        }
    }

    pub fn latest_snapshot(&self) -> Option<&JobSnapshot> {
        match self {
            MonitorState::Polling { latest, .. } => latest.as_ref(),
            MonitorState::Terminal { snapshot, .. } => Some(snapshot),
            MonitorState::Idle | MonitorState::Submitting => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, MonitorState::Terminal { .. })
    }
}

/// Everything the monitor owns for one session. Only `update` mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MonitorSession {
    state: MonitorState,
    estimator: ProgressEstimator,
    poll_failures: u32,
    last_error: Option<String>,
    dirty: bool,
}

impl MonitorSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    /// Returns whether anything visible changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn view(&self) -> MonitorViewModel {
        let snapshot = self.state.latest_snapshot();
        let progress_percent = match &self.state {
            MonitorState::Polling { progress, .. } => *progress,
            MonitorState::Terminal { .. } => Some(crate::PROGRESS_COMPLETE),
            MonitorState::Idle | MonitorState::Submitting => None,
        };
        let outcome = match &self.state {
            MonitorState::Terminal { snapshot, .. } => match snapshot.status {
                JobStatus::Failed => Some(Outcome::Failed),
                _ => Some(Outcome::Completed),
            },
            _ => None,
        };
        let artifacts = match &self.state {
            MonitorState::Terminal { artifacts, .. } => Some(artifacts.clone()),
            _ => None,
        };
        let phase = self.state.phase();

        MonitorViewModel {
            phase,
            job_id: self.state.job().map(|job| job.job_id().to_string()),
            status_text: status_text(&self.state),
            discovered: snapshot.map_or(0, |s| s.discovered),
            extracted: snapshot.map_or(0, |s| s.extracted),
            failed: snapshot.map_or(0, |s| s.failed),
            progress_text: format!(
                "{} products extracted",
                snapshot.map_or(0, |s| s.extracted)
            ),
            progress_percent,
            outcome,
            artifacts,
            start_enabled: matches!(phase, MonitorPhase::Idle | MonitorPhase::Terminal),
            cancel_enabled: matches!(phase, MonitorPhase::Submitting | MonitorPhase::Polling),
            poll_failures: self.poll_failures,
            last_error: self.last_error.clone(),
        }
    }

    pub(crate) fn begin_submission(&mut self) {
        self.state = MonitorState::Submitting;
        self.estimator.reset();
        self.poll_failures = 0;
        self.last_error = None;
        self.mark_dirty();
    }

    pub(crate) fn submission_succeeded(&mut self, job: JobHandle) {
        self.state = MonitorState::Polling {
            job,
            latest: None,
            progress: None,
        };
        self.mark_dirty();
    }

    pub(crate) fn submission_failed(&mut self, reason: String) {
        self.state = MonitorState::Idle;
        self.last_error = Some(reason);
        self.mark_dirty();
    }

    /// Applies a snapshot to the session. Returns `true` if it ended the job.
    pub(crate) fn apply_snapshot(&mut self, snapshot: JobSnapshot) -> bool {
        let job = match &self.state {
            MonitorState::Polling { job, .. } => job.clone(),
            _ => return false,
        };
        let progress = self.estimator.observe(&snapshot);
        self.poll_failures = 0;
        self.state = if snapshot.is_terminal() {
            MonitorState::Terminal {
                artifacts: JobArtifacts::for_job(&job),
                job,
                snapshot,
            }
        } else {
            MonitorState::Polling {
                job,
                latest: Some(snapshot),
                progress,
            }
        };
        self.mark_dirty();
        self.state.is_terminal()
    }

    pub(crate) fn record_poll_failure(&mut self) {
        self.poll_failures = self.poll_failures.saturating_add(1);
        self.mark_dirty();
    }

    pub(crate) fn abandon(&mut self) {
        self.state = MonitorState::Idle;
        self.estimator.reset();
        self.poll_failures = 0;
        self.mark_dirty();
    }

    /// Whether a poll result for `job_id` belongs to the job currently being polled.
    pub(crate) fn is_polling_job(&self, job_id: &str) -> bool {
        matches!(&self.state, MonitorState::Polling { job, .. } if job.job_id() == job_id)
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}

fn status_text(state: &MonitorState) -> String {
    match state {
        MonitorState::Idle => "Idle".to_string(),
        MonitorState::Submitting => "Starting crawl...".to_string(),
        MonitorState::Polling { latest: None, .. } => "Status: WAITING".to_string(),
        MonitorState::Polling {
            latest: Some(snapshot),
            ..
        } => format!("Status: {}", snapshot.status.label()),
        MonitorState::Terminal { snapshot, .. } => format!("Status: {}", snapshot.status.label()),
    }
}
