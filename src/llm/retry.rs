//! Attempt accounting and exponential backoff.

use std::time::Duration;

use crate::error::AttemptError;

/// How many attempts to make and how long to wait between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    backoff_unit: Duration,
}

impl RetryPolicy {
    /// `max_retries` attempts with `2^attempt` seconds between them.
    /// Zero is treated as one attempt.
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries: max_retries.max(1),
            backoff_unit: crate::constants::BACKOFF_UNIT,
        }
    }

    /// Replaces the unit the `2^attempt` factor multiplies.
    #[must_use]
    pub fn with_backoff_unit(mut self, unit: Duration) -> Self {
        self.backoff_unit = unit;
        self
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Delay after failed attempt number `attempt` (1-based). Uncapped;
    /// saturates instead of overflowing.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.backoff_unit.saturating_mul(factor)
    }
}

/// Progress through one `llm_chat` call.
#[derive(Debug)]
pub struct RetryState {
    policy: RetryPolicy,
    attempt: u32,
    last_error: Option<AttemptError>,
}

impl RetryState {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            attempt: 0,
            last_error: None,
        }
    }

    /// Starts the next attempt, returning its 1-based number, or `None` when
    /// all attempts are used.
    pub fn next_attempt(&mut self) -> Option<u32> {
        if self.attempt >= self.policy.max_retries() {
            return None;
        }
        self.attempt += 1;
        Some(self.attempt)
    }

    /// Records a failed attempt. Returns the delay before the next one, or
    /// `None` if that was the last attempt.
    pub fn fail(&mut self, error: AttemptError) -> Option<Duration> {
        self.last_error = Some(error);
        (self.attempt < self.policy.max_retries()).then(|| self.policy.backoff(self.attempt))
    }

    pub fn attempts(&self) -> u32 {
        self.attempt
    }

    pub fn into_last_error(self) -> Option<AttemptError> {
        self.last_error
    }
}
