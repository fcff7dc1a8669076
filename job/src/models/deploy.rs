//! Deploy models

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Opaque identifier of a deploy, as returned by the trigger call
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeployHandle(String);

impl DeployHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for DeployHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for DeployHandle {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Samson returns numeric ids, but strings are accepted too
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(serde_json::Number),
            Text(String),
        }

        let id = match RawId::deserialize(deserializer)? {
            RawId::Number(n) => n.to_string(),
            RawId::Text(s) => s,
        };
        if id.is_empty() {
            return Err(serde::de::Error::custom("deploy id is empty"));
        }
        Ok(DeployHandle(id))
    }
}

/// Latest known state of a deploy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployStatus {
    /// Status code, e.g. "running" or "succeeded"
    pub status: String,

    /// Human readable summary
    #[serde(default)]
    pub summary: String,
}

impl DeployStatus {
    pub fn new(status: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            summary: summary.into(),
        }
    }
}

/// Body of the trigger request
#[derive(Debug, Clone, Serialize)]
pub struct TriggerDeployRequest {
    pub deploy: TriggerDeployParams,
}

#[derive(Debug, Clone, Serialize)]
pub struct TriggerDeployParams {
    pub reference: String,
}

impl TriggerDeployRequest {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            deploy: TriggerDeployParams {
                reference: reference.into(),
            },
        }
    }
}

/// Body returned by the trigger call
#[derive(Debug, Clone, Deserialize)]
pub struct TriggerDeployResponse {
    pub id: DeployHandle,

    /// Link to the deploy page
    #[serde(default)]
    pub url: String,
}

/// Body returned by the status call
#[derive(Debug, Clone, Deserialize)]
pub struct DeployStatusResponse {
    pub deploy: DeployStatus,
}
