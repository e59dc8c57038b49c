//! Bounded retry with exponential backoff
//!
//! Wraps a fallible async operation and re-runs it while it fails with a
//! retryable error (see [`LedgerError::is_retryable`]), sleeping between
//! attempts. Non-retryable errors are returned immediately.

use crate::types::LedgerError;
use std::future::Future;
use std::time::Duration;
use tracing::{info, warn};

/// Retry configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one (at least 1)
    pub max_attempts: u32,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Upper bound on any single delay
    pub max_delay: Duration,
    /// Factor applied to the delay after every retry
    pub backoff_multiplier: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(8),
            backoff_multiplier: 2,
        }
    }
}

/// The operation did not succeed within the policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryFailure {
    /// Attempts actually made
    pub attempts: u32,
    /// Error returned by the last attempt
    pub error: LedgerError,
}

impl RetryPolicy {
    /// Create a policy with the default backoff shape
    pub fn new(max_attempts: u32, initial_delay: Duration) -> Self {
        Self {
            max_attempts,
            initial_delay,
            ..Self::default()
        }
    }

    /// Delay before retry number `retry` (0-based)
    pub fn delay_for(&self, retry: u32) -> Duration {
        self.initial_delay
            .saturating_mul(self.backoff_multiplier.saturating_pow(retry))
            .min(self.max_delay.max(self.initial_delay))
    }

    /// Run `operation` until it succeeds, fails permanently, or attempts run out
    ///
    /// # Arguments
    ///
    /// * `operation_name` - Label used in log lines
    /// * `operation` - Factory producing a fresh future per attempt
    pub async fn run<F, Fut, T>(&self, operation_name: &str, mut operation: F) -> Result<T, RetryFailure>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, LedgerError>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match operation().await {
                Ok(value) => {
                    if attempt > 1 {
                        info!(operation = operation_name, attempt, "succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(error) if error.is_retryable() && attempt < max_attempts => {
                    let delay = self.delay_for(attempt - 1);
                    warn!(
                        operation = operation_name,
                        attempt,
                        max_attempts,
                        ?delay,
                        %error,
                        "attempt failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(error) => {
                    return Err(RetryFailure {
                        attempts: attempt,
                        error,
                    })
                }
            }
        }
    }
}
