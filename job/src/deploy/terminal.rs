//! Terminal status classification for Samson deploys

/// Statuses after which Samson no longer changes the deploy
pub const DONE_STATUSES: &[&str] = &["succeeded", "failed", "errored", "cancelled"];

/// Statuses that count as a successful deploy. Every entry is also in [`DONE_STATUSES`].
pub const SUCCESS_STATUSES: &[&str] = &["succeeded"];

/// Whether polling should stop on this status
pub fn is_done(status: &str) -> bool {
    DONE_STATUSES.contains(&status)
}

/// Whether this status should be reported as success
pub fn is_success(status: &str) -> bool {
    SUCCESS_STATUSES.contains(&status)
}
