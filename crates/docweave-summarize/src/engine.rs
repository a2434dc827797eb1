//! Fan-out summarization engine
//!
//! Scatter: one task per document, each building a deterministic prompt
//! and calling the generative backend independently. Join: aggregation
//! waits for every task — there is no partial aggregation. Reduce: task
//! outcomes are grouped by folder into one `FolderUpdate` per distinct
//! folder, and the human-readable summary strings are collected in task
//! completion order (which is not stable across runs).
//!
//! A failing task never aborts its siblings or the batch; the failure is
//! recorded as a `failed` outcome for that document only.

use std::sync::Arc;

use futures_util::stream::{FuturesUnordered, StreamExt};
use tracing::{info, warn};

use docweave_core::types::{Document, DocumentOutcome, FolderUpdate, SummaryStatus};
use docweave_llm::{CompletionRequest, GenerativeBackend};

use crate::models::{BatchSummarizeRequest, BatchSummarizeResponse};

/// Analysis text recorded when a document could not be summarized.
const FAILURE_MARKER: &str = "Summary generation failed.";
/// Degenerate completion some model deployments emit instead of an error.
const NO_RESPONSE_MARKER: &str = "No response generated";

const SUMMARY_SYSTEM_PROMPT: &str =
    "You are a helpful assistant that analyzes documents and provides concise summaries.";

/// Outcome of one per-document task
#[derive(Debug, Clone)]
struct TaskOutcome {
    folder: String,
    record: DocumentOutcome,
    summary_text: String,
}

/// Transient state for one batch run: outcomes land here unordered as
/// tasks complete, then a single reduce pass groups them.
#[derive(Debug, Default)]
struct BatchState {
    outcomes: Vec<TaskOutcome>,
}

impl BatchState {
    fn record(&mut self, outcome: TaskOutcome) {
        self.outcomes.push(outcome);
    }

    /// Group outcomes by folder and collect summary strings. Runs strictly
    /// after the join; single writer.
    fn reduce(self) -> BatchSummarizeResponse {
        let mut folder_updates: Vec<FolderUpdate> = Vec::new();
        let mut summaries = Vec::new();

        for outcome in self.outcomes {
            summaries.push(outcome.summary_text);
            match folder_updates
                .iter_mut()
                .find(|update| update.folder == outcome.folder)
            {
                Some(update) => update.documents.push(outcome.record),
                None => folder_updates.push(FolderUpdate {
                    folder: outcome.folder,
                    documents: vec![outcome.record],
                }),
            }
        }

        BatchSummarizeResponse {
            summaries,
            folder_updates,
        }
    }
}

/// Scatter/gather summarizer over a generative backend.
pub struct FanOutSummarizer<B> {
    backend: Arc<B>,
}

impl<B: GenerativeBackend + 'static> FanOutSummarizer<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Summarize every document concurrently and reduce the outcomes.
    pub async fn run(
        &self,
        documents: Vec<Document>,
        max_tokens: u32,
        temperature: f32,
    ) -> BatchSummarizeResponse {
        info!(document_count = documents.len(), "batch summarize started");

        let mut in_flight = FuturesUnordered::new();
        for document in documents {
            let backend = Arc::clone(&self.backend);
            in_flight.push(async move {
                let blob_path = document.blob_path.clone();
                let file_name = document.file_name.clone();
                let folder_name = document.folder_name.clone();
                let handle = tokio::spawn(summarize_document(
                    backend,
                    document,
                    max_tokens,
                    temperature,
                ));
                match handle.await {
                    Ok(outcome) => outcome,
                    // The task itself died; contain it like any other
                    // per-document failure.
                    Err(join_error) => failed_outcome(
                        blob_path,
                        file_name,
                        folder_name,
                        format!("Summary generation failed: task aborted: {}", join_error),
                    ),
                }
            });
        }

        // Join barrier: every task finishes before any aggregation.
        let mut state = BatchState::default();
        while let Some(outcome) = in_flight.next().await {
            state.record(outcome);
        }

        let response = state.reduce();
        info!(
            summary_count = response.summaries.len(),
            folder_count = response.folder_updates.len(),
            "batch summarize completed"
        );
        response
    }

    /// Serve a batch request, mirroring the summarization tool contract.
    pub async fn handle(&self, request: BatchSummarizeRequest) -> BatchSummarizeResponse {
        self.run(request.documents, request.max_tokens, request.temperature)
            .await
    }
}

/// Summarize one document. Never fails: errors and degenerate completions
/// become a `failed` outcome.
async fn summarize_document<B: GenerativeBackend>(
    backend: Arc<B>,
    document: Document,
    max_tokens: u32,
    temperature: f32,
) -> TaskOutcome {
    let prompt = format!(
        "Document: {}\nPlease analyze the document and provide a concise summary.",
        document.content
    );
    let request = CompletionRequest::new(prompt, max_tokens, temperature)
        .with_system(SUMMARY_SYSTEM_PROMPT);

    let (status, analysis) = match backend.complete(request).await {
        Ok(analysis) if analysis.trim().is_empty() || analysis == NO_RESPONSE_MARKER => {
            warn!(file = %document.file_name, "degenerate completion");
            (SummaryStatus::Failed, FAILURE_MARKER.to_string())
        }
        Ok(analysis) => (SummaryStatus::Summarized, analysis),
        Err(error) => {
            warn!(file = %document.file_name, error = %error, "summarization failed");
            (
                SummaryStatus::Failed,
                format!("Summary generation failed: {}", error),
            )
        }
    };

    let summary_text = format!("Summary for {}:\n{}", document.file_name, analysis);
    TaskOutcome {
        folder: document.folder_name,
        record: DocumentOutcome {
            blob_path: document.blob_path,
            document_name: document.file_name,
            status,
            analysis,
        },
        summary_text,
    }
}

fn failed_outcome(
    blob_path: String,
    file_name: String,
    folder: String,
    analysis: String,
) -> TaskOutcome {
    let summary_text = format!("Summary for {}:\n{}", file_name, analysis);
    TaskOutcome {
        folder,
        record: DocumentOutcome {
            blob_path,
            document_name: file_name,
            status: SummaryStatus::Failed,
            analysis,
        },
        summary_text,
    }
}
