//! Retry policy for backend calls
//!
//! The policy is an explicit value — attempts, base delay, cap, and a
//! retryability predicate — applied by a wrapping backend. Non-transient
//! errors are never retried.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;

use crate::backend::{BackendError, CompletionRequest, GenerativeBackend};

/// Retry policy for transient backend failures.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first (must be ≥ 1).
    pub max_attempts: u32,
    /// Backoff delay before the first retry.
    pub base_delay: Duration,
    /// Cap for the exponential backoff.
    pub max_delay: Duration,
    /// Decides which errors are worth retrying.
    pub retryable: fn(&BackendError) -> bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(10),
            retryable: BackendError::is_transient,
        }
    }
}

impl RetryPolicy {
    /// Policy that never retries.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Backoff delay before retry number `retries_used + 1`, doubling from
    /// the base and capped at `max_delay`.
    pub fn backoff_delay(&self, retries_used: u32) -> Duration {
        let base_ms = self.base_delay.as_millis();
        if base_ms == 0 {
            return Duration::from_millis(0);
        }
        let max_ms = self.max_delay.as_millis().max(base_ms);
        let shift = retries_used.min(20);
        let multiplier = 1u128 << shift;
        let backoff_ms = base_ms.saturating_mul(multiplier).min(max_ms);
        Duration::from_millis(u64::try_from(backoff_ms).unwrap_or(u64::MAX))
    }

    /// Run `op` under this policy.
    pub async fn run<F, Fut, T>(&self, mut op: F) -> Result<T, BackendError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, BackendError>>,
    {
        let mut retries_used: u32 = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(error) => {
                    let attempts = retries_used.saturating_add(1);
                    if attempts >= self.max_attempts.max(1) || !(self.retryable)(&error) {
                        return Err(error);
                    }
                    let delay = self.backoff_delay(retries_used);
                    tracing::warn!(
                        error = %error,
                        retry_attempt = attempts,
                        retry_in_ms = delay.as_millis() as u64,
                        "retrying backend call after transient error"
                    );
                    if !delay.is_zero() {
                        sleep(delay).await;
                    }
                    retries_used = attempts;
                }
            }
        }
    }
}

/// Backend wrapper applying a `RetryPolicy` to every completion call.
pub struct RetryingBackend<B> {
    inner: B,
    policy: RetryPolicy,
}

impl<B> RetryingBackend<B> {
    pub fn new(inner: B, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}

#[async_trait]
impl<B: GenerativeBackend> GenerativeBackend for RetryingBackend<B> {
    async fn complete(&self, request: CompletionRequest) -> Result<String, BackendError> {
        self.policy
            .run(|| self.inner.complete(request.clone()))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Fails with the given error until `failures_left` reaches zero.
    struct FlakyBackend {
        failures_left: AtomicUsize,
        calls: Arc<AtomicUsize>,
        error: fn() -> BackendError,
    }

    #[async_trait]
    impl GenerativeBackend for FlakyBackend {
        async fn complete(&self, _request: CompletionRequest) -> Result<String, BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failures_left.load(Ordering::SeqCst) > 0 {
                self.failures_left.fetch_sub(1, Ordering::SeqCst);
                return Err((self.error)());
            }
            Ok("ok".to_string())
        }
    }

    fn zero_delay_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay: Duration::from_millis(0),
            max_delay: Duration::from_millis(0),
            ..RetryPolicy::default()
        }
    }

    fn request() -> CompletionRequest {
        CompletionRequest::new("prompt", 100, 0.0)
    }

    #[test]
    fn test_transient_error_is_retried_until_success() {
        tokio_test::block_on(async {
            let calls = Arc::new(AtomicUsize::new(0));
            let backend = RetryingBackend::new(
                FlakyBackend {
                    failures_left: AtomicUsize::new(2),
                    calls: calls.clone(),
                    error: || BackendError::Http("reset".into()),
                },
                zero_delay_policy(3),
            );

            let result = backend.complete(request()).await;
            assert_eq!(result.unwrap(), "ok");
            assert_eq!(calls.load(Ordering::SeqCst), 3);
        });
    }

    #[test]
    fn test_budget_exhaustion_surfaces_last_error() {
        tokio_test::block_on(async {
            let calls = Arc::new(AtomicUsize::new(0));
            let backend = RetryingBackend::new(
                FlakyBackend {
                    failures_left: AtomicUsize::new(10),
                    calls: calls.clone(),
                    error: || BackendError::Http("reset".into()),
                },
                zero_delay_policy(3),
            );

            let result = backend.complete(request()).await;
            assert!(matches!(result, Err(BackendError::Http(_))));
            assert_eq!(calls.load(Ordering::SeqCst), 3);
        });
    }

    #[test]
    fn test_non_transient_error_is_not_retried() {
        tokio_test::block_on(async {
            let calls = Arc::new(AtomicUsize::new(0));
            let backend = RetryingBackend::new(
                FlakyBackend {
                    failures_left: AtomicUsize::new(10),
                    calls: calls.clone(),
                    error: || BackendError::Response {
                        status: 401,
                        message: "bad key".into(),
                    },
                },
                zero_delay_policy(3),
            );

            let result = backend.complete(request()).await;
            assert!(matches!(
                result,
                Err(BackendError::Response { status: 401, .. })
            ));
            assert_eq!(calls.load(Ordering::SeqCst), 1);
        });
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let policy = RetryPolicy {
            max_attempts: 5,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(10),
            ..RetryPolicy::default()
        };
        assert_eq!(policy.backoff_delay(0), Duration::from_secs(1));
        assert_eq!(policy.backoff_delay(1), Duration::from_secs(2));
        assert_eq!(policy.backoff_delay(2), Duration::from_secs(4));
        assert_eq!(policy.backoff_delay(3), Duration::from_secs(8));
        assert_eq!(policy.backoff_delay(4), Duration::from_secs(10));
        assert_eq!(policy.backoff_delay(20), Duration::from_secs(10));
    }
}
