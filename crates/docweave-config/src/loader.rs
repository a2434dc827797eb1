//! Configuration loading and validation.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::DocweaveConfig;

/// Environment variable overriding `llm.api_key`.
pub const LLM_API_KEY_ENV: &str = "DOCWEAVE_LLM_API_KEY";
/// Environment variable overriding `agent.api_key`.
pub const AGENT_API_KEY_ENV: &str = "DOCWEAVE_AGENT_API_KEY";

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Load configuration from a YAML file, apply environment overrides for
/// secrets, and validate.
pub fn load_config(path: &Path) -> Result<DocweaveConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let mut config: DocweaveConfig = serde_yaml::from_str(&content)?;
    apply_env_overrides(&mut config);
    validate_config(&config)?;
    Ok(config)
}

fn apply_env_overrides(config: &mut DocweaveConfig) {
    if let Ok(key) = std::env::var(LLM_API_KEY_ENV) {
        if !key.trim().is_empty() {
            config.llm.api_key = Some(key);
        }
    }
    if let Ok(key) = std::env::var(AGENT_API_KEY_ENV) {
        if !key.trim().is_empty() {
            config.agent.api_key = Some(key);
        }
    }
}

fn validate_config(config: &DocweaveConfig) -> Result<(), ConfigError> {
    if config.agent.api_base_url.trim().is_empty() {
        return Err(ConfigError::Invalid(
            "agent.api_base_url must not be empty".to_string(),
        ));
    }

    if !config.llm.endpoint.is_empty() {
        if !config.llm.endpoint.starts_with("https://") {
            return Err(ConfigError::Invalid(
                "llm.endpoint must be a valid HTTPS URL".to_string(),
            ));
        }
        if config.llm.deployment.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "llm.deployment is required when llm.endpoint is set".to_string(),
            ));
        }
    }

    if config.llm.max_tokens == 0 {
        return Err(ConfigError::Invalid(
            "llm.max_tokens must be > 0".to_string(),
        ));
    }

    let threshold = config.planner.similarity_threshold;
    if !(threshold > 0.0 && threshold <= 1.0) {
        return Err(ConfigError::Invalid(
            "planner.similarity_threshold must be in (0, 1]".to_string(),
        ));
    }

    if config.retry.max_attempts == 0 {
        return Err(ConfigError::Invalid(
            "retry.max_attempts must be > 0".to_string(),
        ));
    }
    if config.retry.max_delay_ms < config.retry.base_delay_ms {
        return Err(ConfigError::Invalid(
            "retry.max_delay_ms must be >= retry.base_delay_ms".to_string(),
        ));
    }

    Ok(())
}
