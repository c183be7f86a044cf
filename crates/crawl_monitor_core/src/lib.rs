//! Crawl monitor core: pure job lifecycle state machine and view-model helpers.
mod effect;
mod msg;
mod params;
mod progress;
mod state;
mod types;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use params::{JobInput, JobParameters, ValidationError};
pub use progress::{estimate, ProgressEstimator, PROGRESS_CEILING, PROGRESS_COMPLETE};
pub use state::{MonitorSession, MonitorState};
pub use types::{JobArtifacts, JobHandle, JobSnapshot, JobStatus, SavedParameters};
pub use update::update;
pub use view_model::{MonitorPhase, MonitorViewModel, Outcome};
