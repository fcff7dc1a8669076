//! Run options derived from the job configuration

use std::time::Duration;

use crate::config::JobConfig;
use crate::workers::poller;

/// Options for waiting on a triggered deploy
#[derive(Debug, Clone)]
pub struct WaitOptions {
    /// Overall bound, measured from when polling begins
    pub deploy_timeout: Duration,

    /// Poller worker options
    pub poller: poller::Options,
}

impl From<&JobConfig> for WaitOptions {
    fn from(config: &JobConfig) -> Self {
        Self {
            deploy_timeout: config.deploy_timeout,
            poller: poller::Options {
                interval: config.poll_interval,
            },
        }
    }
}
