//! Samson deploy API

use async_trait::async_trait;
use tracing::debug;

use crate::errors::JobError;
use crate::http::client::HttpClient;
use crate::models::deploy::{
    DeployHandle, DeployStatus, DeployStatusResponse, TriggerDeployRequest, TriggerDeployResponse,
};

/// Deploy operations against Samson, behind a trait for testability
#[async_trait]
pub trait DeployApi: Send + Sync {
    /// Start a deploy of `reference` to `project`/`stage`
    async fn trigger_deploy(
        &self,
        project: &str,
        stage: &str,
        reference: &str,
    ) -> Result<DeployHandle, JobError>;

    /// Fetch the current status of a deploy
    async fn deploy_status(
        &self,
        project: &str,
        handle: &DeployHandle,
    ) -> Result<DeployStatus, JobError>;
}

#[async_trait]
impl DeployApi for HttpClient {
    async fn trigger_deploy(
        &self,
        project: &str,
        stage: &str,
        reference: &str,
    ) -> Result<DeployHandle, JobError> {
        let path = format!("/projects/{}/stages/{}/deploys", project, stage);
        let response: TriggerDeployResponse =
            self.post(&path, &TriggerDeployRequest::new(reference)).await?;
        debug!("Triggered deploy ({})", response.url);
        Ok(response.id)
    }

    async fn deploy_status(
        &self,
        project: &str,
        handle: &DeployHandle,
    ) -> Result<DeployStatus, JobError> {
        debug!("Fetching deploy (id: {}) status...", handle);
        let path = format!("/projects/{}/deploys/{}", project, handle);
        let response: DeployStatusResponse = self.get(&path).await?;
        Ok(response.deploy)
    }
}
