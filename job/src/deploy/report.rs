//! Maps the final deploy result to a process outcome

use std::process::ExitCode;

use crate::deploy::terminal::is_success;
use crate::errors::JobError;
use crate::models::deploy::DeployStatus;

/// Binary result of a job run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    /// Classify a terminal status
    pub fn from_status(status: &DeployStatus) -> Self {
        if is_success(&status.status) {
            Outcome::Success
        } else {
            Outcome::Failure
        }
    }

    /// Classify the result of waiting on a deploy. Any error is a failure.
    pub fn from_result(result: &Result<DeployStatus, JobError>) -> Self {
        match result {
            Ok(status) => Self::from_status(status),
            Err(_) => Outcome::Failure,
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            Outcome::Success => 0,
            Outcome::Failure => 1,
        }
    }
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        ExitCode::from(outcome.exit_code())
    }
}
