//! Planner abstraction
//!
//! A planner turns a free-form command into either an executable plan or a
//! plain advisory message (the backend answering a general question). The
//! two are distinct non-error outcomes; `PlanError` is reserved for output
//! that was neither.

use async_trait::async_trait;
use thiserror::Error;

use crate::types::Plan;

/// Planner errors
#[derive(Debug, Error)]
pub enum PlanError {
    /// The generative backend could not be reached or failed terminally.
    #[error("planner backend error: {0}")]
    Backend(String),

    /// The backend produced valid JSON that is not a step list.
    #[error("planner returned a malformed plan: {0}")]
    MalformedPlan(String),

    /// A generated step names a tool that is not registered.
    #[error("plan references unknown tool '{0}'")]
    UnknownTool(String),
}

/// Successful planner outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum PlannerOutput {
    /// A list of steps to execute.
    Plan(Plan),
    /// Prose for the caller; no plan is executed.
    Message(String),
}

/// Planner trait — generates a plan (or advisory answer) for a command.
///
/// Implementations may consult a static catalog, a generative backend, or
/// both.
#[async_trait]
pub trait Planner: Send + Sync {
    async fn plan(&self, command: &str, context: Option<&str>)
        -> Result<PlannerOutput, PlanError>;
}

#[async_trait]
impl Planner for std::sync::Arc<dyn Planner> {
    async fn plan(
        &self,
        command: &str,
        context: Option<&str>,
    ) -> Result<PlannerOutput, PlanError> {
        (**self).plan(command, context).await
    }
}
