//! HTTP tool client
//!
//! Posts tool inputs as JSON to `{base_url}/{tool}` and returns the JSON
//! response. Transport failures and non-success statuses both surface as
//! `ToolError` carrying the tool's name.

use async_trait::async_trait;
use serde_json::Value;

use docweave_core::tool::{ToolClient, ToolError};

const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Tool client talking to remote tool endpoints over HTTP.
pub struct HttpToolClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpToolClient {
    /// Create a client for the given tool-endpoint base URL.
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn build_url(&self, tool: &str) -> String {
        format!("{}/{}", self.base_url, tool)
    }
}

#[async_trait]
impl ToolClient for HttpToolClient {
    async fn call(&self, tool: &str, input: Value) -> Result<Value, ToolError> {
        let url = self.build_url(tool);
        tracing::debug!(%tool, %url, "calling tool endpoint");

        let mut request = self.client.post(&url).json(&input);
        if let Some(key) = &self.api_key {
            request = request.header("api-key", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ToolError::new(tool, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ToolError::new(tool, format!("HTTP {}: {}", status, text)));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ToolError::new(tool, format!("invalid JSON response: {}", e)))
    }
}
