//! Generative backend abstraction

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

/// One text-completion request
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// System instruction; empty when the caller has none.
    pub system: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>, max_tokens: u32, temperature: f32) -> Self {
        Self {
            system: String::new(),
            prompt: prompt.into(),
            max_tokens,
            temperature,
        }
    }

    /// Attach a system instruction.
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = system.into();
        self
    }
}

/// Backend errors
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("http error: {0}")]
    Http(String),
    #[error("response error: HTTP {status}: {message}")]
    Response { status: u16, message: String },
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl BackendError {
    /// Whether retrying the call could plausibly succeed.
    ///
    /// Transport failures and throttling/server statuses are transient;
    /// other HTTP statuses (auth, validation) and malformed payloads are
    /// not.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(_) => true,
            Self::Response { status, .. } => *status == 429 || *status >= 500,
            Self::Serialization(_) => false,
        }
    }
}

/// Text-completion backend trait
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String, BackendError>;
}

#[async_trait]
impl<B: GenerativeBackend + ?Sized> GenerativeBackend for Arc<B> {
    async fn complete(&self, request: CompletionRequest) -> Result<String, BackendError> {
        (**self).complete(request).await
    }
}

/// Mock backend for tests/examples: replays a fixed response and counts
/// calls.
pub struct MockBackend {
    pub response: Result<String, fn() -> BackendError>,
    pub calls: std::sync::atomic::AtomicUsize,
}

impl MockBackend {
    pub fn replying(response: impl Into<String>) -> Self {
        Self {
            response: Ok(response.into()),
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    pub fn failing(error: fn() -> BackendError) -> Self {
        Self {
            response: Err(error),
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerativeBackend for MockBackend {
    async fn complete(&self, _request: CompletionRequest) -> Result<String, BackendError> {
        self.calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        match &self.response {
            Ok(text) => Ok(text.clone()),
            Err(make_error) => Err(make_error()),
        }
    }
}
