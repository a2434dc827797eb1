//! Concurrent batch summarization for docweave.
//!
//! The summarization tool fans a document collection out into independent
//! per-document tasks, joins them, and reduces the outcomes into
//! folder-grouped updates. Per-document failures are contained; the batch
//! itself never fails.

mod engine;
mod models;

pub use engine::FanOutSummarizer;
pub use models::{BatchSummarizeRequest, BatchSummarizeResponse};
