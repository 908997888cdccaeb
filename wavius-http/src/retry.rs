//! Retry policy.

use std::time::Duration;

use crate::TransportError;

/// Fixed-delay retry policy for transport failures.
///
/// `max_attempts` counts every attempt, the first one included. HTTP error
/// statuses never reach this policy; only [`TransportError`]s do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts.
    pub max_attempts: u32,
    /// Delay between two attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    /// Create a fixed-delay policy. At least one attempt is always made.
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// A single attempt, no retries.
    pub fn none() -> Self {
        Self::fixed(1, Duration::ZERO)
    }

    /// Whether another attempt should follow `attempts_made` failed ones.
    pub fn should_retry(&self, attempts_made: u32, error: &TransportError) -> bool {
        attempts_made < self.max_attempts && error.is_retryable()
    }

    /// Delay before the next attempt. Constant by construction.
    pub fn delay_for_attempt(&self, _attempt: u32) -> Duration {
        self.delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_delay() {
        let policy = RetryPolicy::fixed(3, Duration::from_millis(500));

        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(500));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(500));
    }

    #[test]
    fn test_attempt_budget() {
        let policy = RetryPolicy::fixed(3, Duration::ZERO);
        let err = TransportError::Connection("reset".into());

        assert!(policy.should_retry(1, &err));
        assert!(policy.should_retry(2, &err));
        assert!(!policy.should_retry(3, &err));
    }

    #[test]
    fn test_non_retryable_error() {
        let policy = RetryPolicy::default();
        assert!(!policy.should_retry(1, &TransportError::Request("bad".into())));
    }

    #[test]
    fn test_zero_attempts_clamped() {
        assert_eq!(RetryPolicy::fixed(0, Duration::ZERO).max_attempts, 1);
        assert_eq!(RetryPolicy::none().max_attempts, 1);
    }
}
