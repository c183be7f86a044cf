#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crawl_monitor_core::{JobHandle, JobInput, JobParameters, JobSnapshot, JobStatus};
use crawl_monitor_engine::{ApiError, ChannelSnapshotSink, FailureKind, JobApi, PollEvent};
use tokio::sync::{mpsc, Notify};

pub fn init_logging() {
    monitor_logging::initialize_for_tests();
}

pub fn acme_input() -> JobInput {
    JobInput {
        vendor_name: "Acme".to_string(),
        base_url: "https://acme.test".to_string(),
        start_urls: vec!["https://acme.test/cat".to_string()],
        page_limit: "50".to_string(),
    }
}

pub fn snapshot(status: JobStatus, discovered: u64, extracted: u64, failed: u64) -> JobSnapshot {
    JobSnapshot {
        status,
        discovered,
        extracted,
        failed,
    }
}

pub fn not_found() -> ApiError {
    ApiError {
        kind: FailureKind::HttpStatus(404),
        message: "404 Not Found".to_string(),
    }
}

pub fn network_error() -> ApiError {
    ApiError {
        kind: FailureKind::Network,
        message: "connection reset".to_string(),
    }
}

pub fn channel_sink() -> (Arc<ChannelSnapshotSink>, mpsc::UnboundedReceiver<PollEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Arc::new(ChannelSnapshotSink::new(tx)), rx)
}

pub enum Step {
    Reply(Result<JobSnapshot, ApiError>),
    /// Stays in flight until `release` is notified.
    Hold {
        release: Arc<Notify>,
        reply: Result<JobSnapshot, ApiError>,
    },
}

/// Job engine double that answers status fetches from a script.
///
/// Once the script runs out, fetches never resolve.
pub struct ScriptedApi {
    job_id: String,
    steps: Mutex<VecDeque<Step>>,
    creates: AtomicUsize,
    fetches: AtomicUsize,
}

impl ScriptedApi {
    pub fn new(job_id: &str, steps: Vec<Step>) -> Arc<Self> {
        Arc::new(Self {
            job_id: job_id.to_string(),
            steps: Mutex::new(steps.into()),
            creates: AtomicUsize::new(0),
            fetches: AtomicUsize::new(0),
        })
    }

    pub fn creates(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl JobApi for ScriptedApi {
    async fn create_job(&self, _params: &JobParameters) -> Result<JobHandle, ApiError> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        Ok(JobHandle::new(self.job_id.clone()))
    }

    async fn fetch_status(&self, _job: &JobHandle) -> Result<JobSnapshot, ApiError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let step = self.steps.lock().unwrap().pop_front();
        match step {
            Some(Step::Reply(reply)) => reply,
            Some(Step::Hold { release, reply }) => {
                release.notified().await;
                reply
            }
            None => std::future::pending().await,
        }
    }
}
