//! Bounded retry policy for upstream Sheets calls.
//!
//! The default policy makes exactly one attempt. Raising `max_attempts`
//! retries transport failures and 5xx responses with a fixed backoff;
//! 4xx responses are never retried. Only reads use the policy: an append
//! that failed with a 5xx may still have landed, so it is never repeated.

use std::time::Duration;

/// Default fixed delay between attempts.
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one. Values below 1 act as 1.
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

impl RetryPolicy {
    /// A single attempt, no retries.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            backoff: DEFAULT_RETRY_BACKOFF,
        }
    }

    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts,
            backoff,
        }
    }

    /// Whether another attempt is allowed after `attempt` (1-based) failed.
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts.max(1)
    }

    /// Whether an upstream status is worth retrying.
    pub fn is_retryable_status(status: reqwest::StatusCode) -> bool {
        status.is_server_error()
    }
}
