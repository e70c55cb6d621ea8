use std::time::Duration;

use crate::constants::{DEFAULT_MAX_INNER_ATTEMPTS, DEFAULT_MAX_OUTER_PASSES};

use super::error::ErrorClass;

const MALFORMED_REQUEST_BACKOFF: Duration = Duration::from_secs(1);
const UNAVAILABLE_BACKOFF: Duration = Duration::from_secs(1);
const RATE_LIMIT_BACKOFF: Duration = Duration::from_secs(40);
const API_ERROR_BACKOFF: Duration = Duration::from_secs(5);
const AUTH_BACKOFF: Duration = Duration::from_secs(10);
const TIMEOUT_BACKOFF: Duration = Duration::from_secs(10);
const CONNECTION_BACKOFF: Duration = Duration::from_secs(10);

/// Fixed delay per error class, slept before the next attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackoffTable {
    pub malformed_request: Duration,
    pub rate_limited: Duration,
    pub api: Duration,
    pub authentication: Duration,
    pub timeout: Duration,
    pub connection: Duration,
    pub unavailable: Duration,
}

impl Default for BackoffTable {
    fn default() -> Self {
        Self {
            malformed_request: MALFORMED_REQUEST_BACKOFF,
            rate_limited: RATE_LIMIT_BACKOFF,
            api: API_ERROR_BACKOFF,
            authentication: AUTH_BACKOFF,
            timeout: TIMEOUT_BACKOFF,
            connection: CONNECTION_BACKOFF,
            unavailable: UNAVAILABLE_BACKOFF,
        }
    }
}

impl BackoffTable {
    /// Every class waits `delay`.
    pub fn uniform(delay: Duration) -> Self {
        Self {
            malformed_request: delay,
            rate_limited: delay,
            api: delay,
            authentication: delay,
            timeout: delay,
            connection: delay,
            unavailable: delay,
        }
    }

    pub fn delay_for(&self, class: ErrorClass) -> Duration {
        match class {
            ErrorClass::MalformedRequest => self.malformed_request,
            ErrorClass::RateLimited => self.rate_limited,
            ErrorClass::Api => self.api,
            ErrorClass::Authentication => self.authentication,
            ErrorClass::Timeout => self.timeout,
            ErrorClass::Connection => self.connection,
            ErrorClass::Unavailable => self.unavailable,
        }
    }
}

/// Two-level retry budget.
///
/// Inner: up to `max_inner_attempts` calls per request per pass, sleeping the class
/// delay between calls. Outer: up to `max_outer_passes` extra passes over the requests
/// that still ended as the failure sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_inner_attempts: u32,
    pub max_outer_passes: u32,
    pub backoff: BackoffTable,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_inner_attempts: DEFAULT_MAX_INNER_ATTEMPTS,
            max_outer_passes: DEFAULT_MAX_OUTER_PASSES,
            backoff: BackoffTable::default(),
        }
    }
}

impl RetryPolicy {
    pub fn with_max_inner_attempts(mut self, attempts: u32) -> Self {
        self.max_inner_attempts = attempts.max(1);
        self
    }

    pub fn with_max_outer_passes(mut self, passes: u32) -> Self {
        self.max_outer_passes = passes;
        self
    }

    pub fn with_backoff(mut self, backoff: BackoffTable) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn delay_for(&self, class: ErrorClass) -> Duration {
        self.backoff.delay_for(class)
    }

    /// Whether another call is allowed after `attempts_this_pass` failures of `class`.
    pub fn should_retry(&self, class: ErrorClass, attempts_this_pass: u32) -> bool {
        class.is_retryable() && attempts_this_pass < self.max_inner_attempts
    }
}
