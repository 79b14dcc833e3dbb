//! Orchestrator connector: opaque GraphQL queries over HTTP.

use crate::config::Capability;
use crate::error::DamonError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

const HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Settings for the Dagster GraphQL backend.
#[derive(Debug, Clone, Deserialize)]
pub struct DagsterSettings {
    pub endpoint: String,
    pub api_token: String,
}

impl DagsterSettings {
    pub fn from_table(table: toml::value::Table) -> Result<Self, DamonError> {
        super::settings_from_table(Capability::Orchestrator, table)
    }
}

/// Executes an opaque query against the orchestrator and returns the raw
/// structured response. Network and HTTP failures surface as transport
/// errors; the response body is never interpreted here.
#[async_trait]
pub trait OrchestratorConnector: Send + Sync {
    async fn execute(&self, query: &str) -> Result<Value, DamonError>;
}

/// Dagster Cloud GraphQL client.
pub struct DagsterOrchestrator {
    client: Client,
    endpoint: String,
    api_token: String,
}

impl DagsterOrchestrator {
    pub fn new(settings: DagsterSettings) -> Result<Self, DamonError> {
        let client = Client::builder()
            .connect_timeout(HTTP_CONNECT_TIMEOUT)
            .timeout(HTTP_REQUEST_TIMEOUT)
            .build()
            .map_err(|e| DamonError::Transport(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            client,
            endpoint: settings.endpoint,
            api_token: settings.api_token,
        })
    }
}

#[async_trait]
impl OrchestratorConnector for DagsterOrchestrator {
    async fn execute(&self, query: &str) -> Result<Value, DamonError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .header("Dagster-Cloud-Api-Token", &self.api_token)
            .json(&json!({ "query": query }))
            .send()
            .await
            .map_err(map_http_error)?
            .error_for_status()
            .map_err(map_http_error)?;

        response
            .json()
            .await
            .map_err(|e| DamonError::Transport(format!("Failed to parse response: {}", e)))
    }
}

fn map_http_error(error: reqwest::Error) -> DamonError {
    if error.is_status() {
        DamonError::Transport(format!(
            "Request failed with status {}: {}",
            error.status().map(|s| s.to_string()).unwrap_or_default(),
            error
        ))
    } else if error.is_timeout() {
        DamonError::Transport(format!("Request timeout: {}", error))
    } else if error.is_connect() {
        DamonError::Transport(format!("Connection error: {}", error))
    } else {
        DamonError::Transport(format!("HTTP error: {}", error))
    }
}
