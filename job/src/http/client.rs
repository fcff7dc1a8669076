//! HTTP client implementation

use std::time::Duration;

use reqwest::{header, Client, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::errors::JobError;

/// Per-request timeout, distinct from the overall deploy timeout
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP client for the Samson API
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: SecretString,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new(base_url: &str, token: SecretString) -> Result<Self, JobError> {
        Self::with_timeout(base_url, token, REQUEST_TIMEOUT)
    }

    /// Create a new HTTP client with a custom per-request timeout
    pub fn with_timeout(
        base_url: &str,
        token: SecretString,
        timeout: Duration,
    ) -> Result<Self, JobError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| JobError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.token.expose_secret())
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, JobError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .header(header::AUTHORIZATION, self.bearer())
            .send()
            .await?;

        read_json("GET", response).await
    }

    /// Make a POST request with a JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, JobError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("POST {}", url);

        // `json()` sets the Content-Type header
        let response = self
            .client
            .post(&url)
            .header(header::ACCEPT, "application/json")
            .header(header::AUTHORIZATION, self.bearer())
            .json(body)
            .send()
            .await?;

        read_json("POST", response).await
    }
}

async fn read_json<T: DeserializeOwned>(method: &str, response: Response) -> Result<T, JobError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        debug!("HTTP {} rejected with {}: {}", method, status, body);
        return Err(JobError::RemoteRejected {
            status: status.as_u16(),
            body,
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| JobError::Connection(format!("Failed to read response body: {}", e)))?;
    Ok(serde_json::from_str(&body)?)
}
