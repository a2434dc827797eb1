//! Configuration types for the docweave agent.
//!
//! Settings are grouped by concern: the agent's tool-endpoint surface, the
//! generative-model deployment, planner tuning, and the backend retry
//! policy. Secrets can come from the environment instead of the file (see
//! `loader`).

use serde::{Deserialize, Serialize};

mod loader;

pub use loader::{load_config, ConfigError, AGENT_API_KEY_ENV, LLM_API_KEY_ENV};

/// Full docweave configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DocweaveConfig {
    pub agent: AgentConfig,
    pub llm: LlmConfig,
    pub planner: PlannerConfig,
    pub retry: RetryConfig,
}

/// Tool-endpoint surface settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Base URL of the tool endpoints.
    pub api_base_url: String,
    /// API key sent to the tool endpoints, when required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Folder name merged output lands in.
    pub output_dir: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:9100".to_string(),
            api_key: None,
            output_dir: "output".to_string(),
        }
    }
}

impl AgentConfig {
    /// Tool endpoints live under `/tools`.
    pub fn tools_url(&self) -> String {
        format!("{}/tools", self.api_base_url.trim_end_matches('/'))
    }
}

/// Generative-model deployment settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Azure OpenAI resource endpoint. Must be HTTPS.
    pub endpoint: String,
    /// API key; prefer the environment override for this.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Deployment (model) name.
    pub deployment: String,
    pub api_version: String,
    /// Default completion token budget.
    pub max_tokens: u32,
    /// Default sampling temperature.
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: None,
            deployment: String::new(),
            api_version: "2024-02-15-preview".to_string(),
            max_tokens: 1000,
            temperature: 0.7,
        }
    }
}

/// Planner tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Minimum similarity ratio for a fuzzy catalog hit.
    pub similarity_threshold: f32,
    /// Token budget for the planning completion.
    pub plan_max_tokens: u32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.70,
            plan_max_tokens: 1000,
        }
    }
}

/// Retry policy for backend calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1_000,
            max_delay_ms: 10_000,
        }
    }
}
