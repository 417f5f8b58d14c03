//! Exponential backoff for outbound directory calls.

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first one (0 means a single attempt).
    pub max_retries: u32,
    /// Delay before the first retry; doubles for each following retry.
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay_ms: 500,
            max_delay_ms: 4000,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay_ms: u64, max_delay_ms: u64) -> Self {
        Self {
            max_retries,
            base_delay_ms,
            max_delay_ms,
        }
    }

    /// Delay before retry number `attempt` (0-indexed): `base * 2^attempt`, capped.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponential = self
            .base_delay_ms
            .saturating_mul(2_u64.saturating_pow(attempt));
        Duration::from_millis(exponential.min(self.max_delay_ms))
    }
}

/// Run `operation` until it succeeds, the error is not retryable, or the
/// policy's retry budget is spent. The last error is returned on failure.
pub async fn retry_with_backoff<F, Fut, T, E, P>(
    mut operation: F,
    policy: &RetryPolicy,
    is_retryable: P,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    debug!(attempts = attempt + 1, "request succeeded after retry");
                }
                return Ok(value);
            }
            Err(err) => {
                if !is_retryable(&err) {
                    return Err(err);
                }
                if attempt >= policy.max_retries {
                    warn!(
                        attempts = attempt + 1,
                        max_retries = policy.max_retries,
                        "retry budget exhausted"
                    );
                    return Err(err);
                }
                let delay = policy.delay_for(attempt);
                debug!(
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    "retrying after delay"
                );
                sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
