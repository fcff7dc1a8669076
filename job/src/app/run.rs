//! Main job run: trigger, wait, report

use std::future::Future;
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tokio::time::Instant;
use tracing::{debug, error, info};

use crate::app::options::WaitOptions;
use crate::config::JobConfig;
use crate::deploy::fsm::{PollEvent, PollFsm, PollState};
use crate::deploy::report::Outcome;
use crate::errors::JobError;
use crate::http::deploys::DeployApi;
use crate::models::deploy::{DeployHandle, DeployStatus};
use crate::workers::poller;

/// Run the Samson job and classify its result
pub async fn run<A>(config: &JobConfig, api: Arc<A>) -> Outcome
where
    A: DeployApi + 'static,
{
    let result = execute(config, api).await;
    if let Ok(status) = &result {
        info!(
            "Deploy finished with status '{}': {}",
            status.status, status.summary
        );
    }
    let outcome = Outcome::from_result(&result);
    debug!("Reporting {:?} for deploy.", outcome);
    outcome
}

/// Run the Samson job unless `shutdown` resolves first.
///
/// On shutdown the job future is dropped, which closes the poller's shutdown
/// channel and stops polling. The run is reported as a failure.
pub async fn run_until<A, S>(config: &JobConfig, api: Arc<A>, shutdown: S) -> Outcome
where
    A: DeployApi + 'static,
    S: Future<Output = &'static str>,
{
    tokio::select! {
        outcome = run(config, api) => outcome,
        signal = shutdown => {
            error!("{} received, abandoning deploy", signal);
            Outcome::Failure
        }
    }
}

/// Trigger a deploy and wait for its terminal status
pub async fn execute<A>(config: &JobConfig, api: Arc<A>) -> Result<DeployStatus, JobError>
where
    A: DeployApi + 'static,
{
    info!(
        "Triggering deploy of '{}' to {}/{}...",
        config.reference, config.project, config.stage
    );

    let handle = api
        .trigger_deploy(&config.project, &config.stage, &config.reference)
        .await
        .map_err(|e| {
            error!("Failed to trigger deploy: {}", e);
            e
        })?;

    info!("Deploy {} triggered, waiting for result...", handle);
    let id = handle.to_string();
    await_deploy_result(api, config.project.clone(), handle, &WaitOptions::from(config))
        .await
        .map_err(|e| {
            error!("Failed waiting for deploy {}: {}", id, e);
            e
        })
}

/// Poll a deploy until it reaches a terminal status or the deadline elapses.
///
/// The poller worker is stopped and joined before this returns.
pub async fn await_deploy_result<A>(
    api: Arc<A>,
    project: String,
    handle: DeployHandle,
    options: &WaitOptions,
) -> Result<DeployStatus, JobError>
where
    A: DeployApi + 'static,
{
    let started = Instant::now();
    let (Some(deadline), Some(_)) = (
        started.checked_add(options.deploy_timeout),
        started.checked_add(options.poller.interval),
    ) else {
        return Err(JobError::Config(format!(
            "Deploy timeout {:?} or poll interval {:?} is out of range",
            options.deploy_timeout, options.poller.interval
        )));
    };
    let deadline = tokio::time::sleep_until(deadline);
    tokio::pin!(deadline);

    let (events_tx, mut events_rx) = mpsc::channel(1);
    let (shutdown_tx, mut shutdown_rx) = broadcast::channel::<()>(1);

    let poller_options = options.poller.clone();
    let poller_handle = tokio::spawn(async move {
        poller::run(
            &poller_options,
            api.as_ref(),
            &project,
            &handle,
            started,
            events_tx,
            Box::pin(async move {
                let _ = shutdown_rx.recv().await;
            }),
        )
        .await;
    });

    let mut fsm = PollFsm::new();
    while !fsm.state().is_terminal() {
        let event = tokio::select! {
            _ = &mut deadline => PollEvent::DeadlineElapsed,
            event = events_rx.recv() => event.unwrap_or_else(|| {
                PollEvent::Fault("poller worker stopped without a result".to_string())
            }),
        };
        if let Err(e) = fsm.process(event) {
            error!("{}", e);
            break;
        }
    }

    // Stop polling before anything is reported
    drop(events_rx);
    let _ = shutdown_tx.send(());
    if let Err(e) = poller_handle.await {
        error!("Poller worker did not shut down cleanly: {}", e);
    }
    debug!(
        "Polling finished in state {:?} after {} queries ({} failed)",
        fsm.state(),
        fsm.queries(),
        fsm.failed_queries()
    );

    match (fsm.state(), fsm.latest()) {
        (PollState::Succeeded | PollState::DoneNonSuccess, Some(status)) => Ok(status.clone()),
        (PollState::TimedOut, _) => Err(JobError::Timeout(options.deploy_timeout)),
        (PollState::Errored, _) => Err(JobError::Internal(
            fsm.error().unwrap_or("poller worker failed").to_string(),
        )),
        (state, _) => Err(JobError::Internal(format!(
            "polling ended in unexpected state {:?}",
            state
        ))),
    }
}
