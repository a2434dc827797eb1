//! Document and folder-outcome wire types
//!
//! These are the payload shapes exchanged with the document tools: the
//! fetched document itself, the per-document summarization outcome, and the
//! folder-grouped updates the merge step consumes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single document flowing through the workflow.
///
/// Immutable apart from `summary`, which is absent until the summarization
/// step sets it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Full text content
    pub content: String,
    /// Summary, once produced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Opaque blob locator
    pub blob_path: String,
    pub file_name: String,
    pub folder_name: String,
}

impl Document {
    pub fn new(
        content: impl Into<String>,
        blob_path: impl Into<String>,
        file_name: impl Into<String>,
        folder_name: impl Into<String>,
    ) -> Self {
        Self {
            content: content.into(),
            summary: None,
            blob_path: blob_path.into(),
            file_name: file_name.into(),
            folder_name: folder_name.into(),
        }
    }
}

/// Terminal status of one document's summarization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryStatus {
    Summarized,
    Failed,
}

/// Outcome record for one document within a folder update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentOutcome {
    pub blob_path: String,
    pub document_name: String,
    pub status: SummaryStatus,
    /// Summary text, or the failure message when `status` is `failed`
    pub analysis: String,
}

/// Summarization outcomes for one folder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderUpdate {
    pub folder: String,
    pub documents: Vec<DocumentOutcome>,
}

/// Response contract of the document-fetch tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchDocumentsResponse {
    pub documents: Vec<Document>,
    /// Folder path to file names, as laid out in blob storage
    pub folder_map: BTreeMap<String, Vec<String>>,
}

/// Request contract of the document-merge tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeDocumentRequest {
    pub documents: Vec<Document>,
    pub output_filename: String,
    pub output_folder: String,
}

/// Response contract of the document-merge tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeDocumentResponse {
    pub output_file_path: String,
}
