//! Finite State Machine for deploy status polling

use crate::deploy::terminal::{is_done, is_success};
use crate::models::deploy::DeployStatus;

/// Poll state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    /// Waiting for a terminal status
    Polling,

    /// Deploy finished with a success status
    Succeeded,

    /// Deploy finished with any other terminal status
    DoneNonSuccess,

    /// Deadline elapsed before a terminal status was seen
    TimedOut,

    /// The poll worker stopped unexpectedly
    Errored,
}

impl PollState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PollState::Polling)
    }
}

/// Poll event
#[derive(Debug, Clone)]
pub enum PollEvent {
    /// A status query returned
    StatusObserved(DeployStatus),

    /// A status query failed
    QueryFailed(String),

    /// The overall deadline elapsed
    DeadlineElapsed,

    /// The poll worker went away without a result
    Fault(String),
}

/// Poll FSM
#[derive(Debug, Clone)]
pub struct PollFsm {
    state: PollState,
    latest: Option<DeployStatus>,
    error: Option<String>,
    queries: u32,
    failed_queries: u32,
}

impl PollFsm {
    /// Create a new FSM in polling state
    pub fn new() -> Self {
        Self {
            state: PollState::Polling,
            latest: None,
            error: None,
            queries: 0,
            failed_queries: 0,
        }
    }

    /// Get current state
    pub fn state(&self) -> PollState {
        self.state
    }

    /// Most recently observed status, if any query has succeeded
    pub fn latest(&self) -> Option<&DeployStatus> {
        self.latest.as_ref()
    }

    /// Last query error, or the fault that ended polling
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Number of status queries answered, successfully or not
    pub fn queries(&self) -> u32 {
        self.queries
    }

    /// Number of status queries that failed
    pub fn failed_queries(&self) -> u32 {
        self.failed_queries
    }

    /// Process an event and transition state
    pub fn process(&mut self, event: PollEvent) -> Result<PollState, String> {
        if self.state.is_terminal() {
            return Err(format!(
                "Invalid transition: {:?} -> {:?}",
                self.state, event
            ));
        }

        self.state = match event {
            PollEvent::StatusObserved(status) => {
                self.queries += 1;
                let next = if is_success(&status.status) {
                    PollState::Succeeded
                } else if is_done(&status.status) {
                    PollState::DoneNonSuccess
                } else {
                    PollState::Polling
                };
                self.latest = Some(status);
                next
            }
            PollEvent::QueryFailed(err) => {
                self.queries += 1;
                self.failed_queries += 1;
                self.error = Some(err);
                PollState::Polling
            }
            PollEvent::DeadlineElapsed => PollState::TimedOut,
            PollEvent::Fault(err) => {
                self.error = Some(err);
                PollState::Errored
            }
        };

        Ok(self.state)
    }
}

impl Default for PollFsm {
    fn default() -> Self {
        Self::new()
    }
}
