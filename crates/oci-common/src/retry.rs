//! Retry policies, backoff schedules, and idempotency tokens.
//!
//! A [`RetryPolicy`] describes how many attempts an invocation may spend and
//! how long to sleep between them. Policies are resolved once per invocation
//! from three layers (request override, client default, operation default)
//! and stay fixed for every attempt of that invocation.

use crate::error::Error;
use rand::distr::Alphanumeric;
use rand::Rng;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Total attempts of the service-recommended default policy.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 8;

/// Initial backoff of the default policy in milliseconds.
pub const DEFAULT_INITIAL_DELAY_MS: u64 = 1000;

/// Backoff cap of the default policy in milliseconds.
pub const DEFAULT_MAX_DELAY_MS: u64 = 30_000;

/// Fraction of the computed backoff used as the jitter window (+/-).
pub const JITTER_RATIO: f64 = 0.2;

/// Length of generated idempotency tokens (alphanumeric characters).
pub const RETRY_TOKEN_LENGTH: usize = 32;

/// Statuses treated as transient and therefore eligible for retry.
const RETRYABLE_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// Retry policy with jittered exponential backoff.
///
/// `max_attempts` counts the first attempt too: a value of 1 disables
/// retries entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,

    /// Delay before the first retry
    pub initial_delay: Duration,

    /// Cap on the backoff schedule
    pub max_delay: Duration,

    /// Backoff multiplier (typically 2 for exponential backoff)
    pub backoff_multiplier: u32,
}

impl RetryPolicy {
    /// The service-recommended default policy: 8 attempts, exponential
    /// backoff from 1 second capped at 30 seconds.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_delay: Duration::from_millis(DEFAULT_INITIAL_DELAY_MS),
            max_delay: Duration::from_millis(DEFAULT_MAX_DELAY_MS),
            backoff_multiplier: 2,
        }
    }

    /// A single-attempt policy.
    #[must_use]
    pub const fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            initial_delay: Duration::from_millis(0),
            max_delay: Duration::from_millis(0),
            backoff_multiplier: 1,
        }
    }

    /// Set the attempt ceiling (minimum 1).
    #[must_use]
    pub const fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = if attempts == 0 { 1 } else { attempts };
        self
    }

    /// Set the initial delay.
    #[must_use]
    pub const fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Set the backoff cap.
    #[must_use]
    pub const fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Set the backoff multiplier.
    #[must_use]
    pub const fn with_backoff_multiplier(mut self, multiplier: u32) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Check if more than one attempt is allowed.
    #[must_use]
    pub const fn has_retries(&self) -> bool {
        self.max_attempts > 1
    }

    /// Calculate the raw delay before the given retry.
    ///
    /// Uses exponential backoff: delay = min(initial_delay * multiplier^(retry - 1), max_delay)
    #[must_use]
    pub fn delay_for_attempt(&self, retry: u32) -> Duration {
        if retry == 0 {
            return Duration::from_secs(0);
        }

        let multiplier = self.backoff_multiplier.saturating_pow(retry - 1);
        let initial_ms = self.initial_delay.as_millis().min(u128::from(u64::MAX)) as u64;
        let delay_ms = initial_ms.saturating_mul(u64::from(multiplier));
        let delay = Duration::from_millis(delay_ms);

        std::cmp::min(delay, self.max_delay)
    }

    /// Calculate the jittered delay before the given retry.
    ///
    /// Applies a uniform +/- [`JITTER_RATIO`] window around the raw delay,
    /// clamped to `max_delay`, so simultaneous retries spread out.
    #[must_use]
    pub fn jittered_delay_for_attempt(&self, retry: u32) -> Duration {
        let backoff = self.delay_for_attempt(retry);
        let backoff_ms = backoff.as_millis().min(u128::from(u64::MAX)) as u64;
        if backoff_ms <= 1 {
            return backoff;
        }

        let max_ms = self.max_delay.as_millis().min(u128::from(u64::MAX)) as u64;
        let span = ((backoff_ms as f64) * JITTER_RATIO).round().max(1.0) as u64;
        let low = backoff_ms.saturating_sub(span);
        let high = backoff_ms.saturating_add(span).max(low);

        let mut rng = rand::rng();
        let sampled_ms = rng.random_range(low..=high).min(max_ms.max(1));
        Duration::from_millis(sampled_ms)
    }

    /// Whether a response status is transient enough to retry.
    #[must_use]
    pub fn is_retryable_status(&self, status: StatusCode) -> bool {
        RETRYABLE_STATUSES.contains(&status.as_u16())
    }

    /// Whether a normalised failure is transient enough to retry.
    ///
    /// Transport and timeout failures always qualify; service failures
    /// qualify by status. Everything else is terminal.
    #[must_use]
    pub fn is_retryable_failure(&self, err: &Error) -> bool {
        match err {
            Error::Timeout { .. } | Error::Transport { .. } => true,
            Error::Service { status, .. } => self.is_retryable_status(*status),
            _ => false,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new()
    }
}

/// Retry stance an operation declares in its descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationRetry {
    /// The operation runs a single attempt unless a caller opts in
    None,
    /// The operation recommends the default policy
    Default,
}

impl OperationRetry {
    /// The policy this stance stands for when nothing overrides it.
    #[must_use]
    pub const fn policy(self) -> RetryPolicy {
        match self {
            Self::None => RetryPolicy::no_retry(),
            Self::Default => RetryPolicy::new(),
        }
    }
}

/// Resolve the effective policy for one invocation.
///
/// Precedence: request override, then the client-wide default, then the
/// operation's declared stance. The result never changes mid-invocation.
#[must_use]
pub fn resolve_policy(
    request_override: Option<RetryPolicy>,
    client_default: Option<RetryPolicy>,
    operation_default: OperationRetry,
) -> RetryPolicy {
    request_override
        .or(client_default)
        .unwrap_or_else(|| operation_default.policy())
}

/// Generate an idempotency token for `opc-retry-token`.
///
/// 32 alphanumeric characters, URL-safe, comfortably above 16 bytes of
/// entropy. Generated once per invocation and reused verbatim on every
/// retry of that invocation.
#[must_use]
pub fn generate_retry_token() -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(RETRY_TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_policy_new() {
        let policy = RetryPolicy::new();
        assert_eq!(policy.max_attempts, DEFAULT_MAX_ATTEMPTS);
        assert_eq!(
            policy.initial_delay,
            Duration::from_millis(DEFAULT_INITIAL_DELAY_MS)
        );
        assert_eq!(policy.max_delay, Duration::from_millis(DEFAULT_MAX_DELAY_MS));
        assert_eq!(policy.backoff_multiplier, 2);
        assert!(policy.has_retries());
    }

    #[test]
    fn test_retry_policy_no_retry() {
        let policy = RetryPolicy::no_retry();
        assert_eq!(policy.max_attempts, 1);
        assert!(!policy.has_retries());
    }

    #[test]
    fn test_retry_policy_builder() {
        let policy = RetryPolicy::new()
            .with_max_attempts(5)
            .with_initial_delay(Duration::from_millis(100))
            .with_max_delay(Duration::from_secs(10))
            .with_backoff_multiplier(3);

        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.initial_delay, Duration::from_millis(100));
        assert_eq!(policy.max_delay, Duration::from_secs(10));
        assert_eq!(policy.backoff_multiplier, 3);
    }

    #[test]
    fn test_with_max_attempts_floors_at_one() {
        let policy = RetryPolicy::new().with_max_attempts(0);
        assert_eq!(policy.max_attempts, 1);
    }

    #[test]
    fn test_delay_calculation() {
        let policy = RetryPolicy::new()
            .with_initial_delay(Duration::from_millis(500))
            .with_max_delay(Duration::from_millis(5000));

        // Retry 0 is "before the first attempt": no sleep
        assert_eq!(policy.delay_for_attempt(0), Duration::from_secs(0));

        // Retry 1: 500ms * 2^0
        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(500));

        // Retry 2: 500ms * 2^1
        assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(1000));

        // Retry 3: 500ms * 2^2
        assert_eq!(policy.delay_for_attempt(3), Duration::from_millis(2000));

        // Retry 4: 500ms * 2^3
        assert_eq!(policy.delay_for_attempt(4), Duration::from_millis(4000));

        // Retry 5 would be 8000ms but caps at 5000ms
        assert_eq!(policy.delay_for_attempt(5), Duration::from_millis(5000));
    }

    #[test]
    fn test_default_policy_caps_at_thirty_seconds() {
        let policy = RetryPolicy::new();
        assert_eq!(policy.delay_for_attempt(1), Duration::from_secs(1));
        assert_eq!(policy.delay_for_attempt(5), Duration::from_secs(16));
        assert_eq!(policy.delay_for_attempt(6), Duration::from_secs(30));
        assert_eq!(policy.delay_for_attempt(10), Duration::from_secs(30));
    }

    #[test]
    fn test_oversized_initial_delay_still_caps_at_max() {
        // A millisecond count past u64 must clamp, not wrap to a tiny delay
        let policy = RetryPolicy::new()
            .with_initial_delay(Duration::from_secs(u64::MAX / 1000 + 1))
            .with_max_delay(Duration::from_secs(30));

        assert_eq!(policy.delay_for_attempt(1), Duration::from_secs(30));
    }

    #[test]
    fn test_jittered_delay_never_exceeds_max() {
        let policy = RetryPolicy::new()
            .with_initial_delay(Duration::from_millis(100))
            .with_max_delay(Duration::from_millis(120));

        for _ in 0..256 {
            let delay = policy.jittered_delay_for_attempt(3);
            assert!(delay <= Duration::from_millis(120));
        }
    }

    #[test]
    fn test_jittered_delay_stays_in_window() {
        let policy = RetryPolicy::new()
            .with_initial_delay(Duration::from_millis(1000))
            .with_max_delay(Duration::from_secs(60));

        // Window for retry 1 is 1000ms +/- 200ms
        for _ in 0..256 {
            let delay = policy.jittered_delay_for_attempt(1);
            assert!(delay >= Duration::from_millis(800));
            assert!(delay <= Duration::from_millis(1200));
        }
    }

    #[test]
    fn test_jitter_noop_for_zero_delay() {
        let policy = RetryPolicy::no_retry();
        assert_eq!(policy.jittered_delay_for_attempt(0), Duration::from_secs(0));
    }

    #[test]
    fn test_retryable_statuses() {
        let policy = RetryPolicy::new();
        assert!(policy.is_retryable_status(StatusCode::TOO_MANY_REQUESTS));
        assert!(policy.is_retryable_status(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(policy.is_retryable_status(StatusCode::BAD_GATEWAY));
        assert!(policy.is_retryable_status(StatusCode::SERVICE_UNAVAILABLE));
        assert!(policy.is_retryable_status(StatusCode::GATEWAY_TIMEOUT));

        assert!(!policy.is_retryable_status(StatusCode::OK));
        assert!(!policy.is_retryable_status(StatusCode::NOT_FOUND));
        assert!(!policy.is_retryable_status(StatusCode::CONFLICT));
        assert!(!policy.is_retryable_status(StatusCode::NOT_IMPLEMENTED));
    }

    #[test]
    fn test_retryable_failure_classification() {
        let policy = RetryPolicy::new();

        assert!(policy.is_retryable_failure(&Error::Timeout {
            service: "Compute",
            operation: "GetInstance",
            message: "request timed out".to_string(),
        }));
        assert!(policy.is_retryable_failure(&Error::Transport {
            service: "Compute",
            operation: "GetInstance",
            message: "connection refused".to_string(),
        }));
        assert!(policy.is_retryable_failure(&Error::Service {
            service: "Compute",
            operation: "GetInstance",
            status: StatusCode::SERVICE_UNAVAILABLE,
            code: "InternalServerError".to_string(),
            message: "try again".to_string(),
            opc_request_id: None,
            reference: None,
        }));

        assert!(!policy.is_retryable_failure(&Error::Service {
            service: "Compute",
            operation: "GetInstance",
            status: StatusCode::NOT_FOUND,
            code: "NotAuthorizedOrNotFound".to_string(),
            message: "missing".to_string(),
            opc_request_id: None,
            reference: None,
        }));
        assert!(!policy.is_retryable_failure(&Error::binding(
            "GetInstance",
            "path parameter \"instanceId\" must not be empty",
        )));
    }

    #[test]
    fn test_operation_retry_policies() {
        assert_eq!(OperationRetry::None.policy(), RetryPolicy::no_retry());
        assert_eq!(OperationRetry::Default.policy(), RetryPolicy::new());
    }

    #[test]
    fn test_resolve_policy_precedence() {
        let request = RetryPolicy::new().with_max_attempts(2);
        let client = RetryPolicy::new().with_max_attempts(4);

        // Request override wins over everything
        assert_eq!(
            resolve_policy(Some(request), Some(client), OperationRetry::Default).max_attempts,
            2
        );

        // Client default beats the operation stance
        assert_eq!(
            resolve_policy(None, Some(client), OperationRetry::None).max_attempts,
            4
        );

        // Operation stance is the floor
        assert_eq!(
            resolve_policy(None, None, OperationRetry::Default).max_attempts,
            DEFAULT_MAX_ATTEMPTS
        );
        assert_eq!(
            resolve_policy(None, None, OperationRetry::None).max_attempts,
            1
        );
    }

    #[test]
    fn test_retry_token_shape() {
        let token = generate_retry_token();
        assert_eq!(token.len(), RETRY_TOKEN_LENGTH);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_retry_tokens_are_distinct() {
        let first = generate_retry_token();
        let second = generate_retry_token();
        assert_ne!(first, second);
    }
}
