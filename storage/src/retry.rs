//! Reconnection retry policy.
//!
//! The default policy retries forever with a fixed 5s delay. A cap on attempts and
//! exponential backoff are opt-in.

use std::time::Duration;

use crate::error::StorageError;

pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(5000);

/// How the wait between consecutive connect attempts grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// Every attempt waits the base delay.
    Fixed,
    /// The n-th wait is `delay * 2^(n-1)`, capped at `max_delay`.
    Exponential { max_delay: Duration },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub delay: Duration,
    /// `None` retries until a connect succeeds or the supervisor shuts down.
    pub max_attempts: Option<u32>,
    pub backoff: Backoff,
    /// When true a rejected write drops the connection just like a connection failure.
    pub reconnect_on_write_failure: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::fixed(DEFAULT_RETRY_DELAY)
    }
}

impl RetryPolicy {
    /// Unbounded, fixed-delay policy.
    pub fn fixed(delay: Duration) -> Self {
        Self {
            delay,
            max_attempts: None,
            backoff: Backoff::Fixed,
            reconnect_on_write_failure: true,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    pub fn with_exponential_backoff(mut self, max_delay: Duration) -> Self {
        self.backoff = Backoff::Exponential { max_delay };
        self
    }

    pub fn with_reconnect_on_write_failure(mut self, enabled: bool) -> Self {
        self.reconnect_on_write_failure = enabled;
        self
    }

    /// Wait before the next attempt, given how many consecutive attempts have failed (1-based).
    pub fn delay_after(&self, failed_attempts: u32) -> Duration {
        match self.backoff {
            Backoff::Fixed => self.delay,
            Backoff::Exponential { max_delay } => {
                let shift = failed_attempts.saturating_sub(1).min(31);
                self.delay
                    .checked_mul(1u32 << shift)
                    .map_or(max_delay, |d| d.min(max_delay))
            }
        }
    }

    pub fn is_exhausted(&self, failed_attempts: u32) -> bool {
        self.max_attempts
            .is_some_and(|max| failed_attempts >= max)
    }

    /// Whether `error` should take the connection down and start the reconnection loop.
    pub fn should_reconnect(&self, error: &StorageError) -> bool {
        match error {
            StorageError::ConnectionFailure(_) => true,
            StorageError::WriteFailure(_) => self.reconnect_on_write_failure,
            StorageError::ConfigurationError(_) => false,
        }
    }
}
