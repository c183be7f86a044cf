use std::sync::Arc;
use std::time::Duration;

use crawl_monitor_core::{
    update, Effect, JobHandle, JobInput, JobParameters, JobSnapshot, MonitorSession, MonitorState,
    MonitorViewModel, Msg, SavedParameters, ValidationError,
};
use monitor_logging::{monitor_debug, monitor_info, monitor_warn};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::poller::{ChannelSnapshotSink, SnapshotSink, StatusPoller, DEFAULT_POLL_INTERVAL};
use crate::{ConfigStore, JobApi, JobSubmitter, PollEvent, SubmissionError};

#[derive(Debug, Clone)]
pub struct MonitorSettings {
    pub poll_interval: Duration,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("invalid job parameters: {0}")]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
    #[error("a job is already being monitored")]
    SessionActive,
}

/// Receives every visible change of the monitor state.
pub trait StateObserver: Send {
    fn on_state_change(&mut self, state: &MonitorState);
}

impl<F> StateObserver for F
where
    F: FnMut(&MonitorState) + Send,
{
    fn on_state_change(&mut self, state: &MonitorState) {
        self(state)
    }
}

/// Runs one crawl job from submission to its terminal status.
///
/// This is the only writer of the [`MonitorState`]: poll results travel through a
/// channel and are applied by `next_update`, so the background poller never
/// touches the state itself.
pub struct JobLifecycleMonitor {
    session: MonitorSession,
    submitter: JobSubmitter,
    poller: StatusPoller,
    sink: Arc<dyn SnapshotSink>,
    events: mpsc::UnboundedReceiver<PollEvent>,
    observers: Vec<Box<dyn StateObserver>>,
    config_store: Option<Box<dyn ConfigStore>>,
}

impl JobLifecycleMonitor {
    pub fn new(api: Arc<dyn JobApi>, settings: MonitorSettings) -> Self {
        let (tx, events) = mpsc::unbounded_channel();
        Self {
            session: MonitorSession::new(),
            submitter: JobSubmitter::new(api.clone()),
            poller: StatusPoller::new(api, settings.poll_interval),
            sink: Arc::new(ChannelSnapshotSink::new(tx)),
            events,
            observers: Vec::new(),
            config_store: None,
        }
    }

    pub fn with_config_store(mut self, store: impl ConfigStore + 'static) -> Self {
        self.config_store = Some(Box::new(store));
        self
    }

    pub fn subscribe(&mut self, observer: impl StateObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn state(&self) -> &MonitorState {
        self.session.state()
    }

    pub fn view(&self) -> MonitorViewModel {
        self.session.view()
    }

    pub fn is_polling(&self) -> bool {
        self.poller.is_active()
    }

    /// Last parameters the operator submitted, if a config store is attached.
    pub fn restore_parameters(&self) -> Option<SavedParameters> {
        self.config_store.as_ref().and_then(|store| store.load())
    }

    /// Validates `input`, submits the job and starts polling it.
    ///
    /// Returns once the engine accepted the job; polling runs in the background
    /// and its results are applied by [`Self::next_update`]. Invalid input fails
    /// before any request is sent.
    pub async fn start(&mut self, input: JobInput) -> Result<JobHandle, MonitorError> {
        let params = JobParameters::try_from(input).inspect_err(|err| {
            monitor_warn!("Rejected job parameters: {}", err);
        })?;
        // The session drops a start while busy, so no submission comes back.
        let (_, effects) = self.dispatch(Msg::StartRequested(params));
        let Some(params) = self.run_effects(effects) else {
            monitor_warn!("Start ignored; job already in progress");
            return Err(MonitorError::SessionActive);
        };

        match self.submitter.submit(&params).await {
            Ok(job) => {
                let (_, effects) = self.dispatch(Msg::SubmitSucceeded(job.clone()));
                self.run_effects(effects);
                Ok(job)
            }
            Err(err) => {
                let (_, effects) = self.dispatch(Msg::SubmitFailed {
                    reason: err.to_string(),
                });
                self.run_effects(effects);
                Err(err.into())
            }
        }
    }

    /// Abandons the current job. Results still in flight are discarded.
    pub fn cancel(&mut self) {
        let (_, effects) = self.dispatch(Msg::CancelRequested);
        self.run_effects(effects);
        self.poller.cancel();
        let mut dropped = 0usize;
        while self.events.try_recv().is_ok() {
            dropped += 1;
        }
        if dropped > 0 {
            monitor_debug!("Dropped {} queued poll results on cancel", dropped);
        }
    }

    /// Waits for the next poll result that changes the session and returns the new state.
    ///
    /// Returns `None` when no job is being polled (idle, cancelled or terminal).
    pub async fn next_update(&mut self) -> Option<MonitorState> {
        while matches!(self.state(), MonitorState::Polling { .. }) {
            let event = self.events.recv().await?;
            if self.apply_poll_event(event) {
                return Some(self.state().clone());
            }
        }
        None
    }

    /// Drives polling until the job ends. `None` if it was not running or got cancelled.
    pub async fn run_to_completion(&mut self) -> Option<JobSnapshot> {
        while self.next_update().await.is_some() {}
        match self.state() {
            MonitorState::Terminal { snapshot, .. } => Some(*snapshot),
            _ => None,
        }
    }

    fn apply_poll_event(&mut self, event: PollEvent) -> bool {
        let msg = match event {
            PollEvent::Snapshot { job_id, snapshot } => Msg::SnapshotReceived { job_id, snapshot },
            PollEvent::Missed { job_id } => Msg::PollMissed { job_id },
            PollEvent::Failed { job_id, error } => Msg::PollFailed {
                job_id,
                reason: error.to_string(),
            },
        };
        let (changed, effects) = self.dispatch(msg);
        self.run_effects(effects);
        changed
    }

    fn dispatch(&mut self, msg: Msg) -> (bool, Vec<Effect>) {
        let session = std::mem::take(&mut self.session);
        let (mut session, effects) = update(session, msg);
        let changed = session.consume_dirty();
        self.session = session;
        if changed {
            let state = self.session.state();
            if let MonitorState::Terminal { job, snapshot, .. } = state {
                monitor_info!(
                    "Job {} finished: {:?} (extracted={}, failed={})",
                    job,
                    snapshot.status,
                    snapshot.extracted,
                    snapshot.failed
                );
            }
            for observer in self.observers.iter_mut() {
                observer.on_state_change(state);
            }
        }
        (changed, effects)
    }

    /// Runs the effects that complete synchronously. A submission has to be
    /// awaited, so its parameters are handed back to `start` instead.
    fn run_effects(&mut self, effects: Vec<Effect>) -> Option<JobParameters> {
        let mut submission = None;
        for effect in effects {
            match effect {
                Effect::SaveParameters(record) => {
                    if let Some(store) = &self.config_store {
                        store.save(&record);
                    }
                }
                Effect::SubmitJob(params) => submission = Some(params),
                Effect::BeginPolling(job) => self.poller.begin(job, self.sink.clone()),
                Effect::StopPolling => self.poller.cancel(),
            }
        }
        submission
    }
}
