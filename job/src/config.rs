//! Job configuration sourced from the environment

use std::fmt;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::errors::JobError;

pub const DEPLOY_TIMEOUT_VAR: &str = "DEPLOY_TIMEOUT";
pub const POLL_INTERVAL_VAR: &str = "POLL_INTERVAL";
pub const PROJECT_VAR: &str = "SAMSON_PROJECT";
pub const REFERENCE_VAR: &str = "REFERENCE";
pub const STAGE_VAR: &str = "SAMSON_STAGE";
pub const TOKEN_VAR: &str = "SAMSON_TOKEN";
pub const URL_VAR: &str = "SAMSON_URL";

/// Default overall deploy wait, in minutes
pub const DEFAULT_DEPLOY_TIMEOUT_MINS: u64 = 120;

/// Default status query cadence, in seconds
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

/// Longest accepted deploy wait, in minutes (one week)
pub const MAX_DEPLOY_TIMEOUT_MINS: u64 = 7 * 24 * 60;

/// Longest accepted status query cadence, in seconds (one day)
pub const MAX_POLL_INTERVAL_SECS: u64 = 24 * 60 * 60;

/// Immutable configuration for a single deploy run
#[derive(Clone)]
pub struct JobConfig {
    /// Overall bound on waiting for a terminal status
    pub deploy_timeout: Duration,

    /// Delay between status queries
    pub poll_interval: Duration,

    /// Samson project permalink
    pub project: String,

    /// Commit, branch or tag to deploy
    pub reference: String,

    /// Stage permalink within the project
    pub stage: String,

    /// Bearer token for the Samson API
    pub token: SecretString,

    /// Base URL of the Samson instance, without trailing slash
    pub url: String,
}

impl fmt::Debug for JobConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobConfig")
            .field("deploy_timeout", &self.deploy_timeout)
            .field("poll_interval", &self.poll_interval)
            .field("project", &self.project)
            .field("reference", &self.reference)
            .field("stage", &self.stage)
            .field("token", &"[REDACTED]")
            .field("url", &self.url)
            .finish()
    }
}

impl JobConfig {
    /// Load the configuration from the process environment
    pub fn from_env() -> Result<Self, JobError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load the configuration through an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset. Required settings have no fallback.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, JobError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let deploy_timeout_mins = parse_bounded(
            DEPLOY_TIMEOUT_VAR,
            get(DEPLOY_TIMEOUT_VAR),
            DEFAULT_DEPLOY_TIMEOUT_MINS,
            MAX_DEPLOY_TIMEOUT_MINS,
        )?;
        let poll_interval_secs = parse_bounded(
            POLL_INTERVAL_VAR,
            get(POLL_INTERVAL_VAR),
            DEFAULT_POLL_INTERVAL_SECS,
            MAX_POLL_INTERVAL_SECS,
        )?;

        let project = required(PROJECT_VAR, get(PROJECT_VAR))?;
        let reference = required(REFERENCE_VAR, get(REFERENCE_VAR))?;
        let stage = required(STAGE_VAR, get(STAGE_VAR))?;
        let token = required(TOKEN_VAR, get(TOKEN_VAR))?;
        let url = validate_url(&required(URL_VAR, get(URL_VAR))?)?;

        Ok(Self {
            deploy_timeout: Duration::from_secs(deploy_timeout_mins * 60),
            poll_interval: Duration::from_secs(poll_interval_secs),
            project,
            reference,
            stage,
            token: SecretString::from(token),
            url,
        })
    }
}

fn required(name: &str, value: Option<String>) -> Result<String, JobError> {
    value.ok_or_else(|| JobError::Config(format!("{} is not set", name)))
}

/// Parse a positive integer no larger than `max`
fn parse_bounded(
    name: &str,
    value: Option<String>,
    default: u64,
    max: u64,
) -> Result<u64, JobError> {
    let Some(raw) = value else {
        return Ok(default);
    };
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(JobError::Config(format!("{} must be greater than zero", name))),
        Ok(parsed) if parsed > max => Err(JobError::Config(format!(
            "{} must be at most {}, got {}",
            name, max, parsed
        ))),
        Ok(parsed) => Ok(parsed),
        Err(_) => Err(JobError::Config(format!("Failed to parse {}: {:?}", name, raw))),
    }
}

fn validate_url(raw: &str) -> Result<String, JobError> {
    let parsed = Url::parse(raw.trim())
        .map_err(|e| JobError::Config(format!("{} is not a valid URL: {}", URL_VAR, e)))?;
    match parsed.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(JobError::Config(format!(
                "{} has unsupported scheme: {}",
                URL_VAR, scheme
            )))
        }
    }
    Ok(raw.trim().trim_end_matches('/').to_string())
}
