//! Retry loop with exponential backoff.

use log::{debug, warn};
use std::future::Future;
use std::time::Duration;

use super::error::RequestFailure;
use crate::config::{Config, DEFAULT_MAX_RETRIES};

/// Delay before the second attempt.
pub const BASE_DELAY_MS: u64 = 1000;

/// Upper bound for any single backoff delay.
pub const MAX_DELAY_MS: u64 = 10_000;

/// How many times to try, and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: usize,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RETRIES)
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: usize) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay: Duration::from_millis(BASE_DELAY_MS),
            max_delay: Duration::from_millis(MAX_DELAY_MS),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.max_retries)
    }

    /// Wait after the given failed attempt (1-based): `base * 2^(attempt-1)`,
    /// capped at `max_delay`.
    pub fn delay_for(&self, attempt: usize) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31) as u32;
        self.base_delay
            .checked_mul(1u32 << exponent)
            .map_or(self.max_delay, |d| d.min(self.max_delay))
    }
}

/// Runs `operation` until it succeeds, fails permanently, or runs out of
/// attempts.
///
/// Permanent failures (see [`RequestFailure::is_retryable`]) and the failure
/// of the last attempt are returned unchanged. The backoff wait is an async
/// sleep, so other tasks keep running meanwhile.
pub async fn with_retry<F, Fut, T>(
    policy: &RetryPolicy,
    operation_name: &str,
    operation: F,
) -> Result<T, RequestFailure>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, RequestFailure>>,
{
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                if !e.is_retryable() {
                    debug!("{}: non-retryable error: {}", operation_name, e);
                    return Err(e);
                }

                if attempt >= policy.max_attempts {
                    debug!(
                        "{}: giving up after {} attempts: {}",
                        operation_name, attempt, e
                    );
                    return Err(e);
                }

                let delay = policy.delay_for(attempt);
                warn!(
                    "{}: attempt {}/{} failed ({}), retrying in {}ms...",
                    operation_name,
                    attempt,
                    policy.max_attempts,
                    e,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
