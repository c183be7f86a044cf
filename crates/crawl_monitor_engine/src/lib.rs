//! Crawl monitor engine: HTTP plumbing, status polling and effect execution.
mod client;
mod monitor;
mod persist;
mod poller;
mod store;
mod submitter;
mod types;

pub use client::{ApiRoutes, ClientSettings, JobApi, ReqwestJobApi};
pub use monitor::{JobLifecycleMonitor, MonitorError, MonitorSettings, StateObserver};
pub use persist::{read_if_exists, AtomicFileWriter, PersistError};
pub use poller::{ChannelSnapshotSink, SnapshotSink, StatusPoller, DEFAULT_POLL_INTERVAL};
pub use store::{ConfigStore, MemoryConfigStore};
pub use submitter::JobSubmitter;
pub use types::{ApiError, FailureKind, PollEvent, SubmissionError};
