//! Polling worker for deploy status

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::deploy::fsm::PollEvent;
use crate::http::deploys::DeployApi;
use crate::models::deploy::DeployHandle;

/// Poller worker options
#[derive(Debug, Clone)]
pub struct Options {
    /// Polling interval
    pub interval: Duration,
}

/// Run the poller worker.
///
/// Queries fire at `started + n * interval` for n >= 1. A slow query delays the
/// next tick, which then fires as soon as the query returns; queries never overlap.
/// Every answer is forwarded on `events`. The worker stops on shutdown or once
/// the receiving side is gone.
pub async fn run<A>(
    options: &Options,
    api: &A,
    project: &str,
    handle: &DeployHandle,
    started: Instant,
    events: mpsc::Sender<PollEvent>,
    mut shutdown_signal: Pin<Box<dyn Future<Output = ()> + Send>>,
) where
    A: DeployApi + ?Sized,
{
    info!("Poller worker starting...");

    let mut ticker = tokio::time::interval_at(started + options.interval, options.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);

    loop {
        tokio::select! {
            _ = &mut shutdown_signal => {
                info!("Poller worker shutting down...");
                return;
            }
            _ = ticker.tick() => {
                // Continue with poll
            }
        }

        debug!("Polling for deploy result...");

        let event = tokio::select! {
            _ = &mut shutdown_signal => {
                info!("Poller worker shutting down mid-query...");
                return;
            }
            result = api.deploy_status(project, handle) => match result {
                Ok(status) => {
                    debug!("Deploy {} ({})", status.status, status.summary);
                    PollEvent::StatusObserved(status)
                }
                Err(e) => {
                    error!("Status query failed: {}", e);
                    PollEvent::QueryFailed(e.to_string())
                }
            },
        };

        tokio::select! {
            _ = &mut shutdown_signal => {
                info!("Poller worker shutting down...");
                return;
            }
            sent = events.send(event) => {
                if sent.is_err() {
                    debug!("Poll result receiver dropped, stopping poller");
                    return;
                }
            }
        }
    }
}
