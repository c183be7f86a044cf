use std::sync::Once;

use crawl_monitor_core::{
    update, Effect, JobArtifacts, JobHandle, JobInput, JobParameters, JobSnapshot, JobStatus,
    MonitorPhase, MonitorSession, MonitorState, Msg, Outcome,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(monitor_logging::initialize_for_tests);
}

fn acme_params() -> JobParameters {
    JobParameters::try_from(JobInput {
        vendor_name: "Acme".to_string(),
        base_url: "https://acme.test".to_string(),
        start_urls: vec!["https://acme.test/cat".to_string()],
        page_limit: "50".to_string(),
    })
    .expect("valid params")
}

fn snapshot(status: JobStatus, discovered: u64, extracted: u64, failed: u64) -> JobSnapshot {
    JobSnapshot {
        status,
        discovered,
        extracted,
        failed,
    }
}

fn received(job_id: &str, snapshot: JobSnapshot) -> Msg {
    Msg::SnapshotReceived {
        job_id: job_id.to_string(),
        snapshot,
    }
}

fn polling_session(job_id: &str) -> MonitorSession {
    let (session, _) = update(MonitorSession::new(), Msg::StartRequested(acme_params()));
    let (mut session, _) = update(session, Msg::SubmitSucceeded(JobHandle::new(job_id)));
    session.consume_dirty();
    session
}

#[test]
fn start_moves_idle_to_submitting_and_requests_submission() {
    init_logging();
    let params = acme_params();
    let (mut session, effects) = update(MonitorSession::new(), Msg::StartRequested(params.clone()));

    assert_eq!(*session.state(), MonitorState::Submitting);
    assert!(session.consume_dirty());
    assert_eq!(
        effects,
        vec![
            Effect::SaveParameters(params.to_saved()),
            Effect::SubmitJob(params),
        ]
    );
}

#[test]
fn successful_submission_begins_polling() {
    init_logging();
    let (session, _) = update(MonitorSession::new(), Msg::StartRequested(acme_params()));
    let job = JobHandle::new("abc123");
    let (session, effects) = update(session, Msg::SubmitSucceeded(job.clone()));

    assert_eq!(
        *session.state(),
        MonitorState::Polling {
            job: job.clone(),
            latest: None,
            progress: None,
        }
    );
    assert_eq!(effects, vec![Effect::BeginPolling(job)]);
    let view = session.view();
    assert_eq!(view.status_text, "Status: WAITING");
    assert!(!view.start_enabled);
    assert!(view.cancel_enabled);
}

#[test]
fn failed_submission_returns_to_idle_with_error() {
    init_logging();
    let (session, _) = update(MonitorSession::new(), Msg::StartRequested(acme_params()));
    let (session, effects) = update(
        session,
        Msg::SubmitFailed {
            reason: "http status 500".to_string(),
        },
    );

    assert_eq!(*session.state(), MonitorState::Idle);
    assert!(effects.is_empty());
    let view = session.view();
    assert!(view.start_enabled);
    assert_eq!(view.last_error.as_deref(), Some("http status 500"));
}

#[test]
fn second_start_while_busy_is_ignored() {
    init_logging();
    let session = polling_session("abc123");
    let (mut next, effects) = update(session.clone(), Msg::StartRequested(acme_params()));

    assert_eq!(next.state(), session.state());
    assert!(effects.is_empty());
    assert!(!next.consume_dirty());
}

#[test]
fn acme_scenario_reaches_terminal_once() {
    init_logging();
    let session = polling_session("abc123");

    let (mut session, effects) = update(
        session,
        received("abc123", snapshot(JobStatus::Running, 10, 2, 0)),
    );
    assert!(effects.is_empty());
    assert!(session.consume_dirty());
    let view = session.view();
    assert_eq!(view.phase, MonitorPhase::Polling);
    assert_eq!(view.progress_percent, Some(20));
    assert_eq!(view.status_text, "Status: RUNNING");
    assert_eq!(view.progress_text, "2 products extracted");

    let done = snapshot(JobStatus::Completed, 10, 9, 1);
    let (mut session, effects) = update(session, received("abc123", done));
    assert_eq!(effects, vec![Effect::StopPolling]);
    assert!(session.consume_dirty());
    assert_eq!(
        *session.state(),
        MonitorState::Terminal {
            job: JobHandle::new("abc123"),
            snapshot: done,
            artifacts: JobArtifacts {
                preview_path: "/vendor-import/preview?session_id=abc123".to_string(),
                csv_export_path: "/api/export/csv/abc123".to_string(),
            },
        }
    );
    let view = session.view();
    assert_eq!(view.progress_percent, Some(100));
    assert_eq!(view.outcome, Some(Outcome::Completed));
    assert!(view.start_enabled);

    // A late response after the terminal one is dropped without a state change.
    let (mut session, effects) = update(
        session,
        received("abc123", snapshot(JobStatus::Failed, 10, 9, 1)),
    );
    assert!(effects.is_empty());
    assert!(!session.consume_dirty());
    assert_eq!(session.view().outcome, Some(Outcome::Completed));
}

#[test]
fn failed_job_is_terminal_with_failed_outcome() {
    init_logging();
    let session = polling_session("abc123");
    let (session, effects) = update(
        session,
        received("abc123", snapshot(JobStatus::Failed, 4, 1, 3)),
    );

    assert_eq!(effects, vec![Effect::StopPolling]);
    let view = session.view();
    assert_eq!(view.phase, MonitorPhase::Terminal);
    assert_eq!(view.outcome, Some(Outcome::Failed));
    assert_eq!(view.progress_percent, Some(100));
    assert_eq!(view.status_text, "Status: FAILED");
}

#[test]
fn progress_never_decreases_while_running() {
    init_logging();
    let mut session = polling_session("abc123");
    let mut shown = Vec::new();
    for (discovered, extracted, failed) in [(0, 0, 0), (10, 6, 0), (30, 8, 1), (30, 20, 1)] {
        let (next, _) = update(
            session,
            received(
                "abc123",
                snapshot(JobStatus::Running, discovered, extracted, failed),
            ),
        );
        shown.push(next.view().progress_percent);
        session = next;
    }

    assert_eq!(shown, vec![None, Some(60), Some(60), Some(70)]);
}

#[test]
fn snapshots_for_other_jobs_are_discarded() {
    init_logging();
    let session = polling_session("abc123");
    let (mut next, effects) = update(
        session.clone(),
        received("stale999", snapshot(JobStatus::Completed, 1, 1, 0)),
    );

    assert_eq!(next.state(), session.state());
    assert!(effects.is_empty());
    assert!(!next.consume_dirty());
}

#[test]
fn soft_miss_changes_nothing() {
    init_logging();
    let session = polling_session("abc123");
    let (mut next, effects) = update(
        session.clone(),
        Msg::PollMissed {
            job_id: "abc123".to_string(),
        },
    );

    assert_eq!(next, session);
    assert!(effects.is_empty());
    assert!(!next.consume_dirty());
}

#[test]
fn hard_failures_are_counted_until_next_snapshot() {
    init_logging();
    let session = polling_session("abc123");
    let failure = || Msg::PollFailed {
        job_id: "abc123".to_string(),
        reason: "timeout".to_string(),
    };
    let (session, effects) = update(session, failure());
    let (session, _) = update(session, failure());

    assert!(effects.is_empty());
    assert_eq!(session.view().poll_failures, 2);
    assert_eq!(session.view().phase, MonitorPhase::Polling);

    let (session, _) = update(
        session,
        received("abc123", snapshot(JobStatus::Queued, 0, 0, 0)),
    );
    assert_eq!(session.view().poll_failures, 0);
    assert_eq!(session.view().status_text, "Status: QUEUED");
}

#[test]
fn cancel_abandons_polling_and_drops_later_results() {
    init_logging();
    let session = polling_session("abc123");
    let (mut session, effects) = update(session, Msg::CancelRequested);

    assert_eq!(effects, vec![Effect::StopPolling]);
    assert_eq!(*session.state(), MonitorState::Idle);
    assert!(session.consume_dirty());

    let (mut session, effects) = update(
        session,
        received("abc123", snapshot(JobStatus::Running, 5, 1, 0)),
    );
    assert!(effects.is_empty());
    assert_eq!(*session.state(), MonitorState::Idle);
    assert!(!session.consume_dirty());
}

#[test]
fn cancel_when_idle_is_noop() {
    init_logging();
    let (mut session, effects) = update(MonitorSession::new(), Msg::CancelRequested);
    assert!(effects.is_empty());
    assert!(!session.consume_dirty());
}

#[test]
fn restart_after_terminal_resets_progress() {
    init_logging();
    let session = polling_session("abc123");
    let (session, _) = update(
        session,
        received("abc123", snapshot(JobStatus::Completed, 10, 10, 0)),
    );
    let (session, effects) = update(session, Msg::StartRequested(acme_params()));
    assert_eq!(effects.len(), 2);
    let (session, _) = update(session, Msg::SubmitSucceeded(JobHandle::new("def456")));
    let (session, _) = update(
        session,
        received("def456", snapshot(JobStatus::Running, 10, 1, 0)),
    );

    assert_eq!(session.view().progress_percent, Some(10));
    assert_eq!(session.view().job_id.as_deref(), Some("def456"));
}
