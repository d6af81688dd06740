//! Retry policy for node execution.
//!
//! Off by default. When enabled, only transient failures are retried
//! (see [`AgentError::is_transient`]); a model that answers with an unparseable
//! route or plan fails the run on the first attempt.

use std::time::Duration;

use crate::error::AgentError;

/// How many times, and how far apart, a failing node is re-run.
#[derive(Debug, Clone, Default)]
pub enum RetryPolicy {
    /// Fail immediately on error.
    #[default]
    None,
    /// Constant delay between attempts.
    Fixed {
        max_attempts: usize,
        interval: Duration,
    },
    /// Delay grows by `multiplier` per attempt, capped at `max_interval`.
    Exponential {
        max_attempts: usize,
        initial_interval: Duration,
        max_interval: Duration,
        multiplier: f64,
    },
}

impl RetryPolicy {
    pub fn none() -> Self {
        RetryPolicy::None
    }

    pub fn fixed(max_attempts: usize, interval: Duration) -> Self {
        RetryPolicy::Fixed {
            max_attempts,
            interval,
        }
    }

    pub fn exponential(
        max_attempts: usize,
        initial_interval: Duration,
        max_interval: Duration,
        multiplier: f64,
    ) -> Self {
        RetryPolicy::Exponential {
            max_attempts,
            initial_interval,
            max_interval,
            multiplier,
        }
    }

    /// Maximum number of retries after the first attempt.
    pub fn max_attempts(&self) -> usize {
        match self {
            RetryPolicy::None => 0,
            RetryPolicy::Fixed { max_attempts, .. }
            | RetryPolicy::Exponential { max_attempts, .. } => *max_attempts,
        }
    }

    /// Whether `error`, raised on retry number `attempt` (0-based), should be retried.
    pub fn should_retry(&self, attempt: usize, error: &AgentError) -> bool {
        error.is_transient() && attempt < self.max_attempts()
    }

    /// Delay before retry number `attempt` (0-based).
    pub fn delay(&self, attempt: usize) -> Duration {
        match self {
            RetryPolicy::None => Duration::ZERO,
            RetryPolicy::Fixed { interval, .. } => *interval,
            RetryPolicy::Exponential {
                initial_interval,
                max_interval,
                multiplier,
                ..
            } => {
                let secs = initial_interval.as_secs_f64() * multiplier.powi(attempt as i32);
                Duration::from_secs_f64(secs).min(*max_interval)
            }
        }
    }
}
