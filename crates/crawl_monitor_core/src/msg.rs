use crate::{JobHandle, JobParameters, JobSnapshot};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Operator started a job with validated parameters.
    StartRequested(JobParameters),
    /// The engine accepted the job.
    SubmitSucceeded(JobHandle),
    /// The creation request failed or returned garbage.
    SubmitFailed { reason: String },
    /// A well-formed status report arrived for `job_id`.
    SnapshotReceived {
        job_id: String,
        snapshot: JobSnapshot,
    },
    /// The status endpoint does not serve the job yet.
    PollMissed { job_id: String },
    /// A status fetch failed for a network or parse reason.
    PollFailed { job_id: String, reason: String },
    /// Operator abandoned the session.
    CancelRequested,
    /// Leaves the session and its dirty flag untouched.
    NoOp,
}
