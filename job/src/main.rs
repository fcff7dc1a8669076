//! Samson Job - Entry Point
//!
//! Triggers a Samson deploy and exits 0 if it succeeds, non-zero otherwise.
//! Intended to run as a step in a CI/CD pipeline.

use std::env;
use std::process::ExitCode;
use std::sync::Arc;

use samson_job::app::run::run_until;
use samson_job::config::JobConfig;
use samson_job::deploy::report::Outcome;
use samson_job::http::client::HttpClient;
use samson_job::logs::{init_logging, LogOptions};
use samson_job::utils::version_info;

use tracing::{debug, error, info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    // Handle standalone flags like --version
    let flags: Vec<String> = env::args()
        .skip(1)
        .map(|arg| arg.trim_start_matches('-').to_string())
        .collect();

    if flags.iter().any(|f| f == "version") {
        return match serde_json::to_string_pretty(&version_info()) {
            Ok(version) => {
                println!("{}", version);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Failed to render version info: {e}");
                ExitCode::FAILURE
            }
        };
    }

    // Initialize logging
    let (log_options, log_warnings) = LogOptions::from_lookup(|name| env::var(name).ok());
    if let Err(e) = init_logging(log_options) {
        eprintln!("Failed to initialize logging: {e}");
    }
    for warning in log_warnings {
        warn!("{}", warning);
    }

    let config = match JobConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return Outcome::Failure.into();
        }
    };

    let client = match HttpClient::new(&config.url, config.token.clone()) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("Failed to create HTTP client: {}", e);
            return Outcome::Failure.into();
        }
    };

    debug!("Starting Samson deploy with {:?}", config);

    run_until(&config, client, await_shutdown_signal()).await.into()
}

#[cfg(unix)]
async fn await_shutdown_signal() -> &'static str {
    use tokio::signal::unix::{signal, SignalKind};

    let (mut sigterm, mut sigint) =
        match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
            (Ok(sigterm), Ok(sigint)) => (sigterm, sigint),
            _ => {
                warn!("Failed to install signal handlers, falling back to Ctrl+C");
                return await_ctrl_c().await;
            }
        };

    tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
        name = await_ctrl_c() => name,
    }
}

#[cfg(not(unix))]
async fn await_shutdown_signal() -> &'static str {
    await_ctrl_c().await
}

async fn await_ctrl_c() -> &'static str {
    if let Err(e) = tokio::signal::ctrl_c().await {
        info!("Unable to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    "Ctrl+C"
}
