//! Retry classification and exponential backoff.

use std::time::Duration;

use crate::error::ClientError;

/// Retry configuration for one client.
///
/// The schedule is a pure capped exponential:
/// `delay = min(initial_delay * multiplier^attempt, max_delay)`. Attempt
/// numbering starts at 0 for the first retry; the initial network try
/// consumes no retry budget.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of retries. Total attempts = `max_retries + 1`.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Ceiling applied to every computed delay.
    pub max_delay: Duration,
    /// Multiplicative factor for each subsequent retry.
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(10_000),
            multiplier: 2.0,
        }
    }
}

/// What the executor should do with a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    Retry { delay: Duration },
    GiveUp,
}

/// Per-call retry bookkeeping. Created fresh for each logical call and
/// discarded when the call finishes.
#[derive(Debug, Clone, Copy, Default)]
pub struct RetryState {
    attempt: u32,
    elapsed: Duration,
}

impl RetryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Retries consumed so far.
    pub const fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Total backoff time slept so far.
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Record one consumed retry and the delay slept before it.
    pub fn record(&mut self, delay: Duration) {
        self.attempt += 1;
        self.elapsed += delay;
    }
}

impl RetryPolicy {
    pub fn exponential(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Backoff delay for a given retry attempt (0-based).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let scale = self.multiplier.powi(attempt as i32);
        let seconds = self.initial_delay.as_secs_f64() * scale;
        Duration::from_secs_f64(seconds.min(self.max_delay.as_secs_f64()))
    }

    /// Classify a failed attempt.
    ///
    /// Final errors and an exhausted budget both yield [`RetryDecision::GiveUp`];
    /// the caller surfaces the original error unchanged. A `Retry-After` hint
    /// on a rate-limit error acts as a floor under the computed delay, never
    /// replacing the schedule outright.
    pub fn decide(&self, error: &ClientError, state: &RetryState) -> RetryDecision {
        if !error.retryable() {
            return RetryDecision::GiveUp;
        }

        if state.attempt() >= self.max_retries {
            return RetryDecision::GiveUp;
        }

        let mut delay = self.delay_for_attempt(state.attempt());
        if let Some(hint) = error.retry_after() {
            delay = delay.max(hint);
        }

        RetryDecision::Retry { delay }
    }
}
