use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::GatewayError;

static RATE_LIMIT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)rate[\s_-]?limit|too many requests")
        .expect("RATE_LIMIT_PATTERN is a valid regex pattern")
});
static TIMEOUT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)time[\s_-]?out|timed out|etimedout")
        .expect("TIMEOUT_PATTERN is a valid regex pattern")
});
static NETWORK_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)network|econnreset|connection reset|econnrefused|connection refused")
        .expect("NETWORK_PATTERN is a valid regex pattern")
});

/// Transient failure classes. Everything except `Other` is retried.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetryableErrorClass {
    RateLimited,
    ServerUnavailable,
    Network,
    Timeout,
    Other,
}

impl RetryableErrorClass {
    pub fn of(err: &GatewayError) -> Self {
        match err {
            GatewayError::Timeout(_) => RetryableErrorClass::Timeout,
            GatewayError::Transport { status, message } => {
                match status {
                    Some(429) => return RetryableErrorClass::RateLimited,
                    Some(500 | 502 | 503 | 504) => return RetryableErrorClass::ServerUnavailable,
                    _ => {}
                }
                Self::from_message(message)
            }
            GatewayError::MissingCredential(_) | GatewayError::RetriesExhausted { .. } => {
                RetryableErrorClass::Other
            }
        }
    }

    fn from_message(message: &str) -> Self {
        if RATE_LIMIT_PATTERN.is_match(message) {
            RetryableErrorClass::RateLimited
        } else if TIMEOUT_PATTERN.is_match(message) {
            RetryableErrorClass::Timeout
        } else if NETWORK_PATTERN.is_match(message) {
            RetryableErrorClass::Network
        } else {
            RetryableErrorClass::Other
        }
    }

    pub fn is_retryable(&self) -> bool {
        !matches!(self, RetryableErrorClass::Other)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Sleep before the attempt that follows the zero-based `attempt_index`.
    pub fn delay_after(&self, attempt_index: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt_index))
    }
}
