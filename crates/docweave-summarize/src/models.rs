//! Batch summarization payloads

use serde::{Deserialize, Serialize};

use docweave_core::types::{Document, FolderUpdate};

fn default_max_tokens() -> u32 {
    1000
}

fn default_temperature() -> f32 {
    0.7
}

/// Request payload for batch summarization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummarizeRequest {
    pub documents: Vec<Document>,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

/// Response payload for batch summarization.
///
/// Deliberately omits the input documents: only folder-grouped outcome
/// records and the summary strings go back to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummarizeResponse {
    pub summaries: Vec<String>,
    pub folder_updates: Vec<FolderUpdate>,
}
