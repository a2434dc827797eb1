//! Generative backend clients for docweave.
//!
//! This crate provides:
//! - The `GenerativeBackend` trait and error taxonomy
//! - An explicit retry policy with exponential backoff for transient
//!   failures
//! - The Azure OpenAI chat-completions implementation
//!
//! Use `RetryingBackend` to wrap any backend with the retry policy.

mod azure;
mod backend;
mod retry;

pub use azure::{AzureOpenAiBackend, AzureOpenAiConfig};
pub use backend::{BackendError, CompletionRequest, GenerativeBackend, MockBackend};
pub use retry::{RetryPolicy, RetryingBackend};
