use crate::{JobHandle, JobParameters, SavedParameters};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SaveParameters(SavedParameters),
    SubmitJob(JobParameters),
    BeginPolling(JobHandle),
    StopPolling,
}
