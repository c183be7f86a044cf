use crate::{Effect, MonitorSession, MonitorState, Msg};

/// Pure update function: applies a message to the session and returns any effects.
pub fn update(mut session: MonitorSession, msg: Msg) -> (MonitorSession, Vec<Effect>) {
    let effects = match msg {
        Msg::StartRequested(params) => match session.state() {
            MonitorState::Idle | MonitorState::Terminal { .. } => {
                session.begin_submission();
                vec![
                    Effect::SaveParameters(params.to_saved()),
                    Effect::SubmitJob(params),
                ]
            }
            // One job per monitor: a second start while busy is dropped.
            MonitorState::Submitting | MonitorState::Polling { .. } => Vec::new(),
        },
        Msg::SubmitSucceeded(job) => {
            if *session.state() == MonitorState::Submitting {
                session.submission_succeeded(job.clone());
                vec![Effect::BeginPolling(job)]
            } else {
                Vec::new()
            }
        }
        Msg::SubmitFailed { reason } => {
            if *session.state() == MonitorState::Submitting {
                session.submission_failed(reason);
            }
            Vec::new()
        }
        Msg::SnapshotReceived { job_id, snapshot } => {
            // Late or foreign results are discarded here; after Terminal the
            // session is no longer polling, so a second terminal cannot land.
            if session.is_polling_job(&job_id) && session.apply_snapshot(snapshot) {
                vec![Effect::StopPolling]
            } else {
                Vec::new()
            }
        }
        Msg::PollMissed { .. } => Vec::new(),
        Msg::PollFailed { job_id, .. } => {
            if session.is_polling_job(&job_id) {
                session.record_poll_failure();
            }
            Vec::new()
        }
        Msg::CancelRequested => match session.state() {
            MonitorState::Submitting | MonitorState::Polling { .. } => {
                session.abandon();
                vec![Effect::StopPolling]
            }
            MonitorState::Idle | MonitorState::Terminal { .. } => Vec::new(),
        },
        Msg::NoOp => Vec::new(),
    };

    (session, effects)
}
