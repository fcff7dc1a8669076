//! Scripted in-memory `DeployApi`

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use samson_job::errors::JobError;
use samson_job::http::deploys::DeployApi;
use samson_job::models::deploy::{DeployHandle, DeployStatus};

pub fn running() -> Result<DeployStatus, JobError> {
    Ok(DeployStatus::new("running", "is running"))
}

pub fn status(code: &str) -> Result<DeployStatus, JobError> {
    Ok(DeployStatus::new(code, format!("is {}", code)))
}

pub fn refused() -> Result<DeployStatus, JobError> {
    Err(JobError::Connection("connection refused".to_string()))
}

pub struct FakeApi {
    trigger: Mutex<Option<Result<DeployHandle, JobError>>>,
    script: Mutex<VecDeque<Result<DeployStatus, JobError>>>,
    /// Answer once the script is exhausted; `None` means every query fails
    fallback: Option<DeployStatus>,
    query_delay: Duration,
    queries: Mutex<Vec<Instant>>,
    handles: Mutex<Vec<String>>,
    in_flight: AtomicU32,
    max_in_flight: AtomicU32,
}

impl FakeApi {
    pub fn new(script: Vec<Result<DeployStatus, JobError>>) -> Self {
        Self {
            trigger: Mutex::new(None),
            script: Mutex::new(script.into()),
            fallback: Some(DeployStatus::new("running", "is running")),
            query_delay: Duration::ZERO,
            queries: Mutex::new(Vec::new()),
            handles: Mutex::new(Vec::new()),
            in_flight: AtomicU32::new(0),
            max_in_flight: AtomicU32::new(0),
        }
    }

    pub fn failing_trigger(mut self, err: JobError) -> Self {
        self.trigger = Mutex::new(Some(Err(err)));
        self
    }

    pub fn without_fallback(mut self) -> Self {
        self.fallback = None;
        self
    }

    pub fn with_query_delay(mut self, delay: Duration) -> Self {
        self.query_delay = delay;
        self
    }

    /// Offsets from `start` at which each status query began
    pub fn query_offsets(&self, start: Instant) -> Vec<Duration> {
        self.queries
            .lock()
            .unwrap()
            .iter()
            .map(|at| at.duration_since(start))
            .collect()
    }

    pub fn query_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }

    pub fn queried_handles(&self) -> Vec<String> {
        self.handles.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> u32 {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DeployApi for FakeApi {
    async fn trigger_deploy(
        &self,
        _project: &str,
        _stage: &str,
        _reference: &str,
    ) -> Result<DeployHandle, JobError> {
        self.trigger
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Ok(DeployHandle::new("42")))
    }

    async fn deploy_status(
        &self,
        _project: &str,
        handle: &DeployHandle,
    ) -> Result<DeployStatus, JobError> {
        self.queries.lock().unwrap().push(Instant::now());
        self.handles.lock().unwrap().push(handle.to_string());

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        if !self.query_delay.is_zero() {
            tokio::time::sleep(self.query_delay).await;
        }

        let next = self.script.lock().unwrap().pop_front();
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match next {
            Some(result) => result,
            None => match &self.fallback {
                Some(status) => Ok(status.clone()),
                None => refused(),
            },
        }
    }
}
