//! Exponential backoff policy for validator exchanges

use std::time::Duration;

/// Exponential backoff: `multiplier * 2^(attempt - 1)` seconds, clamped to
/// `[min_wait, max_wait]`
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Scale applied to the exponential term, in seconds
    pub multiplier: f64,
    /// Floor on every wait
    pub min_wait: Duration,
    /// Ceiling on every wait
    pub max_wait: Duration,
    /// Stop after this many attempts (None = retry forever)
    pub max_attempts: Option<u32>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            multiplier: 1.0,
            min_wait: Duration::from_secs(4),
            max_wait: Duration::from_secs(30),
            max_attempts: None,
        }
    }
}

impl RetryPolicy {
    /// A policy that retries immediately, for tests and local tooling
    pub fn immediate() -> Self {
        Self {
            multiplier: 0.0,
            min_wait: Duration::ZERO,
            max_wait: Duration::ZERO,
            max_attempts: None,
        }
    }

    /// Set a cap on attempts
    pub fn max_attempts(mut self, n: u32) -> Self {
        self.max_attempts = Some(n);
        self
    }

    /// Wait before retrying after failed attempt number `attempt` (1-based)
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(63) as i32;
        let secs = self.multiplier * 2f64.powi(exponent);

        let max = self.max_wait.max(self.min_wait);
        let raw = if secs.is_finite() && secs > 0.0 {
            Duration::try_from_secs_f64(secs).unwrap_or(max)
        } else {
            Duration::ZERO
        };

        raw.clamp(self.min_wait, max)
    }

    /// Whether another attempt is allowed after `attempt` failures
    pub fn should_retry(&self, attempt: u32) -> bool {
        self.max_attempts.map_or(true, |max| attempt < max)
    }
}
