//! Plan executor
//!
//! Runs a plan strictly sequentially: each step's input may depend on the
//! previous step's output, so step *i+1* never starts before step *i*
//! finishes. The first failure — unknown tool, binding error, or tool
//! error — is terminal for the plan; later steps are skipped entirely.

use serde_json::Value;

use crate::binder::BinderRegistry;
use crate::tool::{ToolClient, ToolRegistry};
use crate::types::Plan;

const MAX_LOG_JSON_CHARS: usize = 2_000;

/// Terminal outcome of a plan execution
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionResult {
    /// All steps completed; carries the last step's raw result
    /// (`Null` for an empty plan).
    Completed(Value),
    /// A step failed; no further steps were executed.
    Failed {
        /// Name of the failing tool
        tool: String,
        message: String,
    },
}

impl ExecutionResult {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    fn failed(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Failed {
            tool: tool.into(),
            message: message.into(),
        }
    }
}

/// The executor — drives a plan to a terminal result.
pub struct Executor<C> {
    client: C,
    registry: ToolRegistry,
    binders: BinderRegistry,
}

impl<C: ToolClient> Executor<C> {
    /// Create an executor with the built-in binders.
    pub fn new(client: C, registry: ToolRegistry) -> Self {
        Self {
            client,
            registry,
            binders: BinderRegistry::builtin(),
        }
    }

    /// Replace the binder registry.
    pub fn with_binders(mut self, binders: BinderRegistry) -> Self {
        self.binders = binders;
        self
    }

    /// Execute every step in order, threading each result into the next
    /// step's binding. Stops at the first failure.
    pub async fn execute(&self, plan: &Plan) -> ExecutionResult {
        let mut last_result: Option<Value> = None;

        for (index, step) in plan.steps.iter().enumerate() {
            if !self.registry.contains(&step.tool) {
                tracing::error!(step = index, tool = %step.tool, "unknown tool in plan");
                return ExecutionResult::failed(&step.tool, "unknown tool");
            }

            let bound = match self
                .binders
                .bind(&step.input, last_result.as_ref(), &step.tool, &step.input)
            {
                Ok(bound) => bound,
                Err(e) => {
                    tracing::error!(step = index, tool = %step.tool, error = %e, "binding failed");
                    return ExecutionResult::failed(&step.tool, e.to_string());
                }
            };

            tracing::info!(step = index, tool = %step.tool, "step started");
            if tracing::enabled!(tracing::Level::DEBUG) {
                tracing::debug!(
                    step = index,
                    tool = %step.tool,
                    input = %truncate_json_for_log(&bound, MAX_LOG_JSON_CHARS),
                    "step input bound"
                );
            }

            match self.client.call(&step.tool, bound).await {
                Ok(result) => {
                    tracing::info!(step = index, tool = %step.tool, "step completed");
                    if tracing::enabled!(tracing::Level::DEBUG) {
                        tracing::debug!(
                            step = index,
                            tool = %step.tool,
                            result = %truncate_json_for_log(&result, MAX_LOG_JSON_CHARS),
                            "step result"
                        );
                    }
                    last_result = Some(result);
                }
                Err(e) => {
                    tracing::error!(step = index, tool = %step.tool, error = %e.message, "step failed");
                    return ExecutionResult::failed(e.tool, e.message);
                }
            }
        }

        ExecutionResult::Completed(last_result.unwrap_or(Value::Null))
    }
}

fn truncate_json_for_log(value: &Value, max_chars: usize) -> String {
    let text = value.to_string();
    let char_count = text.chars().count();
    if char_count <= max_chars {
        return text;
    }
    let mut preview: String = text.chars().take(max_chars).collect();
    preview.push_str(&format!("... [truncated, total_chars={}]", char_count));
    preview
}
