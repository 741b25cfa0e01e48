//! Quota-aware retry with exponential backoff.
//!
//! Only quota failures are retried; everything else propagates on the first
//! failure. Between attempts the server-suggested delay is honored when the
//! error payload carries one, otherwise a doubling backoff applies.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::{AiError, AiResult};

/// Configuration for quota retry behavior.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the initial one.
    pub max_attempts: u32,
    /// Base delay for exponential backoff (doubles each attempt).
    pub base_delay: Duration,
    /// Padding added on top of a server-suggested delay.
    pub suggested_delay_pad: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(5),
            suggested_delay_pad: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// Delay before the attempt following failure number `attempt`
    /// (0-based), preferring the server-suggested delay when present.
    ///
    /// A suggested delay of N seconds waits `N * 1000 + 500` ms; the default
    /// schedule is `base * 2^attempt` (5s, 10s, ...).
    pub fn delay_after(&self, attempt: u32, suggested: Option<Duration>) -> Duration {
        match suggested {
            Some(d) => d + self.suggested_delay_pad,
            None => self.base_delay.saturating_mul(2u32.saturating_pow(attempt)),
        }
    }
}

/// Execute an async operation, retrying quota failures only.
///
/// `label` names the operation in logs and in the terminal
/// [`AiError::QuotaExceeded`] raised once all attempts are exhausted.
/// Non-quota errors propagate immediately with zero delays.
pub async fn with_quota_retry<F, Fut, T>(
    policy: &RetryPolicy,
    label: &str,
    operation: F,
) -> AiResult<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = AiResult<T>>,
{
    let mut attempt = 0u32;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if !e.is_quota() => return Err(e),
            Err(e) => {
                attempt += 1;
                if attempt >= policy.max_attempts {
                    warn!(
                        operation = label,
                        attempts = attempt,
                        "Quota exhausted on every attempt, giving up"
                    );
                    return Err(AiError::QuotaExceeded {
                        operation: label.to_string(),
                    });
                }

                let delay = policy.delay_after(attempt - 1, e.suggested_retry_delay());
                warn!(
                    operation = label,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "Quota failure, retrying: {}",
                    e
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn quota_error() -> AiError {
        AiError::remote(Some(429), Some("RESOURCE_EXHAUSTED".to_string()), "quota", None)
    }

    #[test]
    fn test_delay_prefers_suggestion() {
        let policy = RetryPolicy::default();
        let delay = policy.delay_after(0, Some(Duration::from_secs(12)));
        assert_eq!(delay, Duration::from_millis(12_500));
    }

    #[test]
    fn test_delay_default_schedule_doubles() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_after(0, None), Duration::from_millis(5_000));
        assert_eq!(policy.delay_after(1, None), Duration::from_millis(10_000));
        assert_eq!(policy.delay_after(2, None), Duration::from_millis(20_000));
    }

    #[tokio::test]
    async fn test_non_quota_error_never_retried() {
        let calls = AtomicU32::new(0);

        let result: AiResult<u32> = with_quota_retry(&RetryPolicy::default(), "test", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(AiError::InvalidApiKey) }
        })
        .await;

        assert!(matches!(result, Err(AiError::InvalidApiKey)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_quota_success_on_third_attempt() {
        let calls = AtomicU32::new(0);
        let started = tokio::time::Instant::now();

        let result = with_quota_retry(&RetryPolicy::default(), "test", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(quota_error())
                } else {
                    Ok(7)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // Exactly two backoff delays: 5s then 10s.
        assert_eq!(started.elapsed(), Duration::from_secs(15));
    }

    #[tokio::test(start_paused = true)]
    async fn test_quota_exhaustion_yields_labeled_error() {
        let calls = AtomicU32::new(0);

        let result: AiResult<u32> = with_quota_retry(&RetryPolicy::default(), "video generation", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(quota_error()) }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        match result {
            Err(AiError::QuotaExceeded { operation }) => {
                assert_eq!(operation, "video generation");
            }
            other => panic!("expected QuotaExceeded, got {:?}", other.err()),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_suggested_delay_honored() {
        let calls = AtomicU32::new(0);
        let started = tokio::time::Instant::now();

        let result = with_quota_retry(&RetryPolicy::default(), "test", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err(AiError::remote(
                        Some(429),
                        Some("RESOURCE_EXHAUSTED".to_string()),
                        "quota",
                        Some(Duration::from_secs(3)),
                    ))
                } else {
                    Ok(())
                }
            }
        })
        .await;

        assert!(result.is_ok());
        assert_eq!(started.elapsed(), Duration::from_millis(3_500));
    }
}
