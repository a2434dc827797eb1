//! Command service
//!
//! The boundary of the agent core: accept a command, plan it, execute the
//! plan, and map every outcome — advisory answer, completed execution, or
//! failure — onto the response surface. Nothing here panics; every failure
//! path yields a structured response.

use std::time::Duration;

use thiserror::Error;
use tracing::{error, info};

use docweave_config::DocweaveConfig;
use docweave_core::catalog::PlanCatalog;
use docweave_core::executor::{ExecutionResult, Executor};
use docweave_core::planner::{Planner, PlannerOutput};
use docweave_core::tool::{ToolClient, ToolRegistry};
use docweave_llm::{
    AzureOpenAiBackend, AzureOpenAiConfig, BackendError, RetryPolicy, RetryingBackend,
};
use docweave_planners::{CommandPlanner, CommandPlannerConfig};

use crate::client::HttpToolClient;
use crate::dto::{CommandRequest, CommandResponse};

/// Errors building the service from configuration.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("failed to build generative backend: {0}")]
    Backend(#[from] BackendError),
    #[error("failed to build tool client: {0}")]
    ToolClient(String),
}

/// Plan-and-execute service over a planner and a tool client.
pub struct CommandService<P, C> {
    planner: P,
    executor: Executor<C>,
}

/// Service wired from configuration: Azure backend behind the retry
/// policy, built-in catalog and registry, HTTP tool client.
pub type ConfiguredCommandService =
    CommandService<CommandPlanner<RetryingBackend<AzureOpenAiBackend>>, HttpToolClient>;

impl<P: Planner, C: ToolClient> CommandService<P, C> {
    pub fn new(planner: P, executor: Executor<C>) -> Self {
        Self { planner, executor }
    }

    /// Plan the command and execute the resulting steps.
    pub async fn plan_and_execute(&self, request: CommandRequest) -> CommandResponse {
        if request.command.trim().is_empty() {
            return CommandResponse::error("No command provided.");
        }

        let output = match self.planner.plan(&request.command, None).await {
            Ok(output) => output,
            Err(e) => {
                error!(error = %e, "planning failed");
                return CommandResponse::error(e.to_string());
            }
        };

        let plan = match output {
            PlannerOutput::Message(message) => return CommandResponse::advisory(message),
            PlannerOutput::Plan(plan) => plan,
        };

        info!(step_count = plan.len(), "executing plan");
        match self.executor.execute(&plan).await {
            ExecutionResult::Completed(result) => CommandResponse::completed(result),
            ExecutionResult::Failed { tool, message } => {
                CommandResponse::error(format!("Tool '{}' failed: {}", tool, message))
            }
        }
    }
}

/// Build the fully wired service from configuration.
pub fn build_service(config: &DocweaveConfig) -> Result<ConfiguredCommandService, BuildError> {
    let backend = AzureOpenAiBackend::new(AzureOpenAiConfig {
        endpoint: config.llm.endpoint.clone(),
        api_key: config.llm.api_key.clone().unwrap_or_default(),
        deployment: config.llm.deployment.clone(),
        api_version: config.llm.api_version.clone(),
        ..AzureOpenAiConfig::default()
    })?;
    let backend = RetryingBackend::new(
        backend,
        RetryPolicy {
            max_attempts: config.retry.max_attempts,
            base_delay: Duration::from_millis(config.retry.base_delay_ms),
            max_delay: Duration::from_millis(config.retry.max_delay_ms),
            ..RetryPolicy::default()
        },
    );

    let registry = ToolRegistry::builtin();
    let catalog = PlanCatalog::builtin().with_threshold(config.planner.similarity_threshold);
    let planner = CommandPlanner::new(backend, catalog, registry.clone()).with_config(
        CommandPlannerConfig {
            max_tokens: config.planner.plan_max_tokens,
            temperature: 0.0,
        },
    );

    let client = HttpToolClient::new(config.agent.tools_url(), config.agent.api_key.clone())
        .map_err(|e| BuildError::ToolClient(e.to_string()))?;

    Ok(CommandService::new(planner, Executor::new(client, registry)))
}
