//! # Docweave Core
//!
//! Core abstractions and deterministic logic for the docweave document
//! workflow agent.
//!
//! This crate contains:
//! - Document / Plan / Step / StepInput / FolderUpdate definitions
//! - The known-command plan catalog (exact + similarity lookup)
//! - The result binder (per-tool placeholder substitution)
//! - The sequential plan executor
//! - Tool registry and the `ToolClient` / `Planner` seams
//!
//! This crate does NOT care about:
//! - Which LLM provider generates plans or summaries
//! - How tool calls travel over the wire
//! - How the caller hosts the request surface

pub mod binder;
pub mod catalog;
pub mod executor;
pub mod planner;
pub mod tool;
pub mod types;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::binder::{BindError, BinderRegistry};
    pub use crate::catalog::{PlanCatalog, DEFAULT_SIMILARITY_THRESHOLD};
    pub use crate::executor::{ExecutionResult, Executor};
    pub use crate::planner::{PlanError, Planner, PlannerOutput};
    pub use crate::tool::{ToolClient, ToolError, ToolRegistry, ToolSpec};
    pub use crate::types::{
        Document, DocumentOutcome, FolderUpdate, Plan, Step, StepInput, SummaryStatus,
    };
}

// Re-export key types at crate root
pub use binder::{BindError, BinderRegistry};
pub use catalog::PlanCatalog;
pub use executor::{ExecutionResult, Executor};
pub use planner::{PlanError, Planner, PlannerOutput};
pub use tool::{ToolClient, ToolError, ToolRegistry, ToolSpec};
pub use types::{Document, DocumentOutcome, FolderUpdate, Plan, Step, StepInput, SummaryStatus};
