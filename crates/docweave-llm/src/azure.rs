//! Azure OpenAI backend implementation.
//!
//! Talks to an Azure OpenAI deployment through the chat-completions
//! endpoint (`/openai/deployments/{deployment}/chat/completions`).

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};

use crate::backend::{BackendError, CompletionRequest, GenerativeBackend};

/// Azure OpenAI client configuration.
#[derive(Debug, Clone)]
pub struct AzureOpenAiConfig {
    /// Resource endpoint, e.g. `https://my-resource.openai.azure.com`.
    pub endpoint: String,
    /// API key sent in the `api-key` header.
    pub api_key: String,
    /// Deployment (model) name.
    pub deployment: String,
    /// API version query parameter.
    pub api_version: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for AzureOpenAiConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            deployment: String::new(),
            api_version: "2024-02-15-preview".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Azure OpenAI chat-completions backend.
pub struct AzureOpenAiBackend {
    client: reqwest::Client,
    config: AzureOpenAiConfig,
}

impl AzureOpenAiBackend {
    /// Create a new backend.
    pub fn new(config: AzureOpenAiConfig) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| BackendError::Http(e.to_string()))?;
        Ok(Self { client, config })
    }

    fn build_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.config.endpoint.trim_end_matches('/'),
            self.config.deployment,
            self.config.api_version
        )
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: String,
}

#[async_trait]
impl GenerativeBackend for AzureOpenAiBackend {
    async fn complete(&self, request: CompletionRequest) -> Result<String, BackendError> {
        let url = self.build_url();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "api-key",
            HeaderValue::from_str(&self.config.api_key)
                .map_err(|e| BackendError::Http(e.to_string()))?,
        );

        let mut messages = Vec::new();
        if !request.system.is_empty() {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: request.system,
            });
        }
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: request.prompt,
        });

        let body = ChatRequest {
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let response = self
            .client
            .post(&url)
            .headers(headers)
            .json(&body)
            .send()
            .await
            .map_err(|e| BackendError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(BackendError::Response {
                status: status.as_u16(),
                message: text,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| BackendError::Http(e.to_string()))?;
        let parsed: ChatResponse =
            serde_json::from_str(&text).map_err(|e| BackendError::Serialization(e.to_string()))?;

        let content = parsed
            .choices
            .first()
            .map(|c| c.message.content.trim().to_string())
            .ok_or_else(|| BackendError::Serialization("missing choices".to_string()))?;

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url_joins_deployment_and_api_version() {
        let backend = AzureOpenAiBackend::new(AzureOpenAiConfig {
            endpoint: "https://unit.openai.azure.com/".to_string(),
            api_key: "k".to_string(),
            deployment: "gpt-4o".to_string(),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(
            backend.build_url(),
            "https://unit.openai.azure.com/openai/deployments/gpt-4o/chat/completions?api-version=2024-02-15-preview"
        );
    }

    #[test]
    fn test_default_api_version() {
        let config = AzureOpenAiConfig::default();
        assert_eq!(config.api_version, "2024-02-15-preview");
        assert_eq!(config.timeout_secs, 30);
    }
}
