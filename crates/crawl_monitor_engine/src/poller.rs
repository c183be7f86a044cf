use std::sync::Arc;
use std::time::Duration;

use crawl_monitor_core::JobHandle;
use monitor_logging::{monitor_debug, monitor_info, monitor_warn};
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::{JobApi, PollEvent};

/// Reference cadence of the status poll.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

pub trait SnapshotSink: Send + Sync {
    fn publish(&self, event: PollEvent);
}

pub struct ChannelSnapshotSink {
    tx: mpsc::UnboundedSender<PollEvent>,
}

impl ChannelSnapshotSink {
    pub fn new(tx: mpsc::UnboundedSender<PollEvent>) -> Self {
        Self { tx }
    }
}

impl SnapshotSink for ChannelSnapshotSink {
    fn publish(&self, event: PollEvent) {
        let _ = self.tx.send(event);
    }
}

/// Periodically fetches the status of one job until it is terminal or cancelled.
///
/// Ticks are serialized: a slow fetch delays the next one instead of overlapping it.
/// Fetches already in flight when the poller stops are left to finish, and their
/// results are dropped.
pub struct StatusPoller {
    api: Arc<dyn JobApi>,
    period: Duration,
    active: Option<ActivePoll>,
}

struct ActivePoll {
    job: JobHandle,
    token: CancellationToken,
}

impl StatusPoller {
    pub fn new(api: Arc<dyn JobApi>, period: Duration) -> Self {
        Self {
            api,
            // tokio intervals reject a zero period.
            period: period.max(Duration::from_millis(1)),
            active: None,
        }
    }

    /// Starts polling `job`. Any poll already running is stopped first.
    ///
    /// Must be called from within a tokio runtime.
    pub fn begin(&mut self, job: JobHandle, sink: Arc<dyn SnapshotSink>) {
        self.cancel();
        monitor_info!(
            "Polling job_id={} every {}ms",
            job,
            self.period.as_millis()
        );
        let token = CancellationToken::new();
        tokio::spawn(poll_loop(
            self.api.clone(),
            job.clone(),
            self.period,
            token.clone(),
            sink,
        ));
        self.active = Some(ActivePoll { job, token });
    }

    /// Stops polling. Has no effect on a stopped poller.
    pub fn cancel(&mut self) {
        if let Some(active) = self.active.take() {
            if !active.token.is_cancelled() {
                monitor_info!("Polling cancelled job_id={}", active.job);
                active.token.cancel();
            }
        }
    }

    /// False once cancelled or after the terminal snapshot was published.
    pub fn is_active(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|active| !active.token.is_cancelled())
    }

    pub fn job(&self) -> Option<&JobHandle> {
        self.active.as_ref().map(|active| &active.job)
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

impl Drop for StatusPoller {
    fn drop(&mut self) {
        self.cancel();
    }
}

async fn poll_loop(
    api: Arc<dyn JobApi>,
    job: JobHandle,
    period: Duration,
    token: CancellationToken,
    sink: Arc<dyn SnapshotSink>,
) {
    // First fetch one period after start, like a plain repeating timer.
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let job_id = job.job_id().to_string();

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = interval.tick() => {}
        }

        let result = api.fetch_status(&job).await;
        let (event, terminal) = match result {
            Ok(snapshot) => {
                monitor_debug!(
                    "job_id={} status={:?} discovered={} extracted={} failed={}",
                    job_id,
                    snapshot.status,
                    snapshot.discovered,
                    snapshot.extracted,
                    snapshot.failed
                );
                let terminal = snapshot.is_terminal().then_some(snapshot.status);
                let event = PollEvent::Snapshot {
                    job_id: job_id.clone(),
                    snapshot,
                };
                (event, terminal)
            }
            Err(err) if err.is_soft_miss() => {
                monitor_debug!("Job {} not visible yet; waiting for next tick", job_id);
                let event = PollEvent::Missed {
                    job_id: job_id.clone(),
                };
                (event, None)
            }
            Err(err) => {
                monitor_warn!("Status poll for job {} failed: {}", job_id, err);
                let event = PollEvent::Failed {
                    job_id: job_id.clone(),
                    error: err,
                };
                (event, None)
            }
        };

        if !publish_unless_stopped(&token, sink.as_ref(), event) {
            monitor_debug!("Dropping status for job_id={} that resolved after stop", job_id);
            break;
        }
        if let Some(status) = terminal {
            monitor_info!("Job {} reached {:?}; polling stopped", job_id, status);
            token.cancel();
            break;
        }
    }
}

/// Publishes `event` unless polling was stopped, and reports whether it did.
///
/// The check and the publish are not atomic: a stop from another thread can
/// still let this one event through. The monitor ignores events for a job it
/// is no longer polling, and `cancel` drains what is already queued.
fn publish_unless_stopped(
    token: &CancellationToken,
    sink: &dyn SnapshotSink,
    event: PollEvent,
) -> bool {
    if token.is_cancelled() {
        return false;
    }
    sink.publish(event);
    true
}
