//! FSM unit tests

use samson_job::deploy::fsm::{PollEvent, PollFsm, PollState};
use samson_job::models::deploy::DeployStatus;

fn observed(status: &str) -> PollEvent {
    PollEvent::StatusObserved(DeployStatus::new(status, format!("Deploy {}", status)))
}

#[test]
fn test_fsm_initial_state() {
    let fsm = PollFsm::new();
    assert_eq!(fsm.state(), PollState::Polling);
    assert!(fsm.latest().is_none());
    assert!(fsm.error().is_none());
    assert_eq!(fsm.queries(), 0);
}

#[test]
fn test_fsm_success_flow() {
    let mut fsm = PollFsm::new();

    for _ in 0..3 {
        assert_eq!(fsm.process(observed("running")).unwrap(), PollState::Polling);
    }
    assert_eq!(fsm.process(observed("succeeded")).unwrap(), PollState::Succeeded);
    assert_eq!(fsm.latest().unwrap().status, "succeeded");
    assert_eq!(fsm.queries(), 4);
}

#[test]
fn test_fsm_done_non_success_flow() {
    for status in ["failed", "errored", "cancelled"] {
        let mut fsm = PollFsm::new();
        assert_eq!(fsm.process(observed(status)).unwrap(), PollState::DoneNonSuccess);
        assert_eq!(fsm.latest().unwrap().status, status);
    }
}

#[test]
fn test_fsm_unknown_status_keeps_polling() {
    let mut fsm = PollFsm::new();
    assert_eq!(fsm.process(observed("stuck")).unwrap(), PollState::Polling);
    assert_eq!(fsm.latest().unwrap().status, "stuck");
}

#[test]
fn test_fsm_query_failure_keeps_latest_status() {
    let mut fsm = PollFsm::new();

    fsm.process(observed("running")).unwrap();
    fsm.process(PollEvent::QueryFailed("timeout".to_string())).unwrap();

    assert_eq!(fsm.state(), PollState::Polling);
    assert_eq!(fsm.latest().unwrap().status, "running");
    assert_eq!(fsm.error(), Some("timeout"));
    assert_eq!(fsm.failed_queries(), 1);
}

#[test]
fn test_fsm_deadline_after_failures_times_out() {
    let mut fsm = PollFsm::new();

    fsm.process(PollEvent::QueryFailed("refused".to_string())).unwrap();
    fsm.process(PollEvent::QueryFailed("refused".to_string())).unwrap();
    assert_eq!(fsm.process(PollEvent::DeadlineElapsed).unwrap(), PollState::TimedOut);
}

#[test]
fn test_fsm_fault_errors() {
    let mut fsm = PollFsm::new();
    assert_eq!(
        fsm.process(PollEvent::Fault("worker panicked".to_string())).unwrap(),
        PollState::Errored
    );
    assert_eq!(fsm.error(), Some("worker panicked"));
}

#[test]
fn test_fsm_no_double_report() {
    let mut fsm = PollFsm::new();
    fsm.process(PollEvent::DeadlineElapsed).unwrap();

    // A late status must not override the timeout
    let result = fsm.process(observed("succeeded"));
    assert!(result.is_err());
    assert_eq!(fsm.state(), PollState::TimedOut);
    assert!(fsm.latest().is_none());
}
