//! Tool registry and tool-client abstraction
//!
//! The registry holds static descriptions of the invocable tools — name,
//! description, and an example input — used both to build planning prompts
//! and to reject unknown tool names before execution. The `ToolClient`
//! trait is the seam to whatever actually performs the remote call.

use async_trait::async_trait;
use serde_json::{json, Value};
use thiserror::Error;

/// Fetches documents and their folder layout from storage.
pub const FETCH_DOCUMENTS: &str = "fetch_documents";
/// Summarizes a document collection.
pub const BATCH_SUMMARIZE: &str = "batch_summarize";
/// Merges summarized documents into a Word document.
pub const MERGE_DOCUMENT: &str = "merge_document";
/// Creates output folders.
pub const CREATE_DIRECTORY: &str = "create_directory";

/// Static description of one invocable tool
#[derive(Debug, Clone)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    /// Example input shown to the planner
    pub example_input: Value,
}

impl ToolSpec {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        example_input: Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            example_input,
        }
    }
}

/// Ordered registry of tool descriptions
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<ToolSpec>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry of the built-in document workflow tools.
    ///
    /// `create_directory` is advertised for planning even though the agent
    /// itself never binds a special input shape for it.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(ToolSpec::new(
            FETCH_DOCUMENTS,
            "Fetches documents from blob storage and the search index.",
            json!({"source": "blob_storage"}),
        ));
        registry.register(ToolSpec::new(
            BATCH_SUMMARIZE,
            "Summarizes documents.",
            json!({"documents": "..."}),
        ));
        registry.register(ToolSpec::new(
            MERGE_DOCUMENT,
            "Merges summarized documents into a Word document.",
            json!({"folder_updates": "...", "output_filename": "merged.docx"}),
        ));
        registry.register(ToolSpec::new(
            CREATE_DIRECTORY,
            "Creates output folders.",
            json!({"directory_name": "folder_name"}),
        ));
        registry
    }

    /// Register a tool description. A later registration with the same name
    /// replaces the earlier one.
    pub fn register(&mut self, spec: ToolSpec) {
        if let Some(existing) = self.tools.iter_mut().find(|t| t.name == spec.name) {
            *existing = spec;
        } else {
            self.tools.push(spec);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.iter().any(|t| t.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&ToolSpec> {
        self.tools.iter().find(|t| t.name == name)
    }

    /// Iterate specs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ToolSpec> {
        self.tools.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }
}

/// Failure of one tool invocation
#[derive(Debug, Clone, Error)]
#[error("tool '{tool}' failed: {message}")]
pub struct ToolError {
    /// Name of the failing tool
    pub tool: String,
    pub message: String,
}

impl ToolError {
    pub fn new(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            message: message.into(),
        }
    }
}

/// Client performing the actual tool call.
///
/// Implementations are black boxes to the executor; transport failures and
/// non-success responses both surface as `ToolError`.
#[async_trait]
pub trait ToolClient: Send + Sync {
    async fn call(&self, tool: &str, input: Value) -> Result<Value, ToolError>;
}

#[async_trait]
impl<C: ToolClient + ?Sized> ToolClient for std::sync::Arc<C> {
    async fn call(&self, tool: &str, input: Value) -> Result<Value, ToolError> {
        (**self).call(tool, input).await
    }
}
