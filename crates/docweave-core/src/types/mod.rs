//! Core type definitions for docweave
//!
//! This module contains the fundamental types used throughout the system:
//! - Document: a fetched document and its folder placement
//! - Plan / Step: the tool-invocation sequence derived from a command
//! - StepInput: tagged input tree with the previous-result placeholder
//! - FolderUpdate: per-folder summarization outcomes

mod document;
mod plan;
mod step;

pub use document::{
    Document, DocumentOutcome, FetchDocumentsResponse, FolderUpdate, MergeDocumentRequest,
    MergeDocumentResponse, SummaryStatus,
};
pub use plan::Plan;
pub use step::{Step, StepInput, USE_PREVIOUS_RESULT};
