//! Result binder
//!
//! Transforms a step's input template into the concrete tool input by
//! substituting the previous step's result wherever the template carries
//! the placeholder. The substitution is tool-aware: each tool that needs a
//! reshaped previous result registers one pure function here, so adding a
//! tool never edits a shared conditional.

use std::collections::HashMap;

use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::tool::{BATCH_SUMMARIZE, MERGE_DOCUMENT};
use crate::types::StepInput;

/// Default output file name when the step declares none.
const DEFAULT_MERGE_FILENAME: &str = "merged.docx";
/// Folder the merge tool writes into.
const DEFAULT_OUTPUT_FOLDER: &str = "output";
/// Folder assigned to documents that arrive without one.
const DEFAULT_FOLDER_NAME: &str = "Default";

/// Binding failure. Fatal to the plan.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    #[error("step input references the previous result, but no previous result is available")]
    NoPreviousResult,
}

/// Pure transformation from a previous result (plus the step's own input)
/// into the value substituted for the placeholder.
pub type BindFn = fn(&Value, &StepInput) -> Result<Value, BindError>;

/// Registry of per-tool bind functions.
///
/// Tools without an entry receive the previous result unchanged.
#[derive(Debug, Clone)]
pub struct BinderRegistry {
    binders: HashMap<String, BindFn>,
}

impl BinderRegistry {
    /// Empty registry: every placeholder passes the previous result through.
    pub fn new() -> Self {
        Self {
            binders: HashMap::new(),
        }
    }

    /// Registry with the built-in document-tool binders.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(BATCH_SUMMARIZE, bind_summarize_documents);
        registry.register(MERGE_DOCUMENT, bind_merge_input);
        registry
    }

    /// Register the bind function for one tool.
    pub fn register(&mut self, tool: impl Into<String>, binder: BindFn) {
        self.binders.insert(tool.into(), binder);
    }

    /// Substitute placeholders in `template`, dispatching on `tool`.
    ///
    /// `step_input` is the step's own declared input, available to binders
    /// that lift fields out of it (the merge binder reads
    /// `output_filename`). Templates without a placeholder come through
    /// structurally unchanged regardless of `previous`.
    pub fn bind(
        &self,
        template: &StepInput,
        previous: Option<&Value>,
        tool: &str,
        step_input: &StepInput,
    ) -> Result<Value, BindError> {
        match template {
            StepInput::UsePrevious => {
                let previous = previous.ok_or(BindError::NoPreviousResult)?;
                match self.binders.get(tool) {
                    Some(binder) => binder(previous, step_input),
                    None => Ok(previous.clone()),
                }
            }
            StepInput::Array(items) => items
                .iter()
                .map(|item| self.bind(item, previous, tool, step_input))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            StepInput::Object(map) => map
                .iter()
                .map(|(key, value)| {
                    self.bind(value, previous, tool, step_input)
                        .map(|bound| (key.clone(), bound))
                })
                .collect::<Result<Map<String, Value>, _>>()
                .map(Value::Object),
            leaf => Ok(Value::from(leaf.clone())),
        }
    }
}

impl Default for BinderRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Binder for the summarization tool: reshape the previous result's
/// document collection into summarizer input documents.
///
/// Falls back field by field: content from prior analysis text, file name
/// from the outcome's document name, folder to "Default".
fn bind_summarize_documents(previous: &Value, _step_input: &StepInput) -> Result<Value, BindError> {
    let documents = previous
        .get("documents")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let bound = documents
        .iter()
        .map(|doc| {
            let content = str_field(doc, "content")
                .or_else(|| str_field(doc, "analysis"))
                .unwrap_or_default();
            let file_name = str_field(doc, "file_name")
                .filter(|name| !name.is_empty())
                .or_else(|| str_field(doc, "document_name"))
                .unwrap_or_default();
            let folder_name =
                str_field(doc, "folder_name").unwrap_or_else(|| DEFAULT_FOLDER_NAME.to_string());
            json!({
                "content": content,
                "summary": doc.get("summary").cloned().unwrap_or(Value::Null),
                "blob_path": doc.get("blob_path").cloned().unwrap_or(Value::Null),
                "file_name": file_name,
                "folder_name": folder_name,
            })
        })
        .collect();

    Ok(Value::Array(bound))
}

/// Binder for the merge tool: flatten folder updates back into a flat
/// document list, with the summary text carried in `summary` and empty
/// content. `output_filename` is taken from the step's own input when
/// declared there.
fn bind_merge_input(previous: &Value, step_input: &StepInput) -> Result<Value, BindError> {
    let folder_updates = previous
        .get("folder_updates")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let mut documents = Vec::new();
    for folder in folder_updates {
        let folder_name =
            str_field(folder, "folder").unwrap_or_else(|| DEFAULT_FOLDER_NAME.to_string());
        let docs = folder
            .get("documents")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        for doc in docs {
            documents.push(json!({
                "content": "",
                "summary": str_field(doc, "analysis").unwrap_or_default(),
                "blob_path": str_field(doc, "blob_path").unwrap_or_default(),
                "file_name": str_field(doc, "document_name").unwrap_or_default(),
                "folder_name": folder_name,
            }));
        }
    }

    let output_filename = step_input
        .get("output_filename")
        .and_then(StepInput::as_str)
        .unwrap_or(DEFAULT_MERGE_FILENAME);

    Ok(json!({
        "documents": documents,
        "output_folder": DEFAULT_OUTPUT_FOLDER,
        "output_filename": output_filename,
    }))
}

fn str_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_without_placeholder_is_structurally_unchanged() {
        let registry = BinderRegistry::builtin();
        let template = StepInput::from(json!({"source": "blob_storage", "depth": 2}));

        for previous in [None, Some(json!({"documents": [1, 2]}))] {
            let bound = registry
                .bind(&template, previous.as_ref(), "fetch_documents", &template)
                .unwrap();
            assert_eq!(bound, json!({"source": "blob_storage", "depth": 2}));
        }
    }

    #[test]
    fn test_placeholder_without_previous_result_fails() {
        let registry = BinderRegistry::builtin();
        let template = StepInput::UsePrevious;
        let err = registry
            .bind(&template, None, MERGE_DOCUMENT, &template)
            .unwrap_err();
        assert_eq!(err, BindError::NoPreviousResult);
    }

    #[test]
    fn test_unregistered_tool_passes_previous_through() {
        let registry = BinderRegistry::builtin();
        let template = StepInput::UsePrevious;
        let previous = json!({"anything": [true, null]});
        let bound = registry
            .bind(&template, Some(&previous), "create_directory", &template)
            .unwrap();
        assert_eq!(bound, previous);
    }

    #[test]
    fn test_summarize_binder_reshapes_documents() {
        let registry = BinderRegistry::builtin();
        let template = StepInput::from(json!({"documents": "use_previous_result"}));
        let previous = json!({
            "documents": [
                {
                    "content": "full text",
                    "summary": "old summary",
                    "blob_path": "a/x.txt",
                    "file_name": "x.txt",
                    "folder_name": "a"
                },
                // Outcome-shaped document: analysis instead of content,
                // document_name instead of file_name, no folder.
                {"analysis": "prior analysis", "document_name": "y.txt", "blob_path": "y"}
            ]
        });

        let bound = registry
            .bind(&template, Some(&previous), BATCH_SUMMARIZE, &template)
            .unwrap();
        assert_eq!(
            bound,
            json!({
                "documents": [
                    {
                        "content": "full text",
                        "summary": "old summary",
                        "blob_path": "a/x.txt",
                        "file_name": "x.txt",
                        "folder_name": "a"
                    },
                    {
                        "content": "prior analysis",
                        "summary": null,
                        "blob_path": "y",
                        "file_name": "y.txt",
                        "folder_name": "Default"
                    }
                ]
            })
        );
    }

    #[test]
    fn test_merge_binder_flattens_folder_updates_with_defaults() {
        let registry = BinderRegistry::builtin();
        let template = StepInput::UsePrevious;
        let previous = json!({
            "folder_updates": [
                {"folder": "A", "documents": [{"document_name": "x.txt", "analysis": "sum"}]}
            ]
        });

        let bound = registry
            .bind(&template, Some(&previous), MERGE_DOCUMENT, &template)
            .unwrap();
        assert_eq!(
            bound,
            json!({
                "documents": [{
                    "content": "",
                    "summary": "sum",
                    "blob_path": "",
                    "file_name": "x.txt",
                    "folder_name": "A"
                }],
                "output_folder": "output",
                "output_filename": "merged.docx"
            })
        );
    }

    #[test]
    fn test_merge_binder_honors_declared_output_filename() {
        let registry = BinderRegistry::builtin();
        let step_input = StepInput::from(json!({
            "folder_updates": "use_previous_result",
            "output_filename": "report.docx"
        }));
        let previous = json!({"folder_updates": []});

        let bound = registry
            .bind(&step_input, Some(&previous), MERGE_DOCUMENT, &step_input)
            .unwrap();
        // Placeholder sat under a key; the merge input lands there.
        assert_eq!(
            bound.pointer("/folder_updates/output_filename"),
            Some(&json!("report.docx"))
        );
        assert_eq!(bound.get("output_filename"), Some(&json!("report.docx")));
    }

    #[test]
    fn test_nested_placeholder_inside_array() {
        let registry = BinderRegistry::new();
        let template = StepInput::from(json!({"batch": ["use_previous_result", "literal"]}));
        let previous = json!(41);
        let bound = registry
            .bind(&template, Some(&previous), "echo", &template)
            .unwrap();
        assert_eq!(bound, json!({"batch": [41, "literal"]}));
    }
}
