//! Error types for the Samson job

use std::time::Duration;

use thiserror::Error;

/// Main error type for the Samson job
#[derive(Error, Debug)]
pub enum JobError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Remote rejected request with status {status}: {body}")]
    RemoteRejected { status: u16, body: String },

    #[error("Response format error: {0}")]
    ResponseFormat(String),

    #[error("Timed out after {0:?} waiting for deploy result")]
    Timeout(Duration),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for JobError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            JobError::ResponseFormat(err.to_string())
        } else {
            JobError::Connection(err.to_string())
        }
    }
}

impl From<serde_json::Error> for JobError {
    fn from(err: serde_json::Error) -> Self {
        JobError::ResponseFormat(err.to_string())
    }
}
