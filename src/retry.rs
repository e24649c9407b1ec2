//! Retry with exponential backoff for the geocoding and archive requests.
//!
//! Retries transport timeouts, connection failures, 5xx, 408 and 429.
//! Any other 4xx, decode failures and successful responses are returned as-is.

use log::{debug, info, warn};
use reqwest::{Response, StatusCode};
use std::future::Future;
use std::time::Duration;

pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_INITIAL_DELAY_MS: u64 = 200;
pub const DEFAULT_MAX_DELAY_MS: u64 = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt; `0` disables retrying.
    pub max_retries: u32,
    /// Delay before the first retry, doubled for each one after it.
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_delay: Duration::from_millis(DEFAULT_INITIAL_DELAY_MS),
            max_delay: Duration::from_millis(DEFAULT_MAX_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, initial_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_retries,
            initial_delay,
            max_delay,
        }
    }

    /// A policy that sends every request exactly once.
    pub fn none() -> Self {
        Self::new(0, Duration::ZERO, Duration::ZERO)
    }

    /// Backoff before retry number `attempt + 1`: `initial_delay * 2^attempt`, capped at `max_delay`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.initial_delay
            .saturating_mul(factor)
            .min(self.max_delay)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RetryDecision {
    Retry,
    NoRetry,
}

fn classify_error(error: &reqwest::Error) -> RetryDecision {
    if error.is_timeout() || error.is_connect() {
        return RetryDecision::Retry;
    }
    match error.status() {
        Some(status) => classify_status(status),
        None => RetryDecision::NoRetry,
    }
}

fn classify_status(status: StatusCode) -> RetryDecision {
    if status.is_server_error()
        || status == StatusCode::TOO_MANY_REQUESTS
        || status == StatusCode::REQUEST_TIMEOUT
    {
        RetryDecision::Retry
    } else {
        RetryDecision::NoRetry
    }
}

/// Runs `operation` until it yields a non-retryable outcome or the policy is exhausted.
///
/// When every attempt hits a retryable status, the last response is returned so the caller
/// can report its status code.
pub async fn send_with_retry<F, Fut>(
    policy: &RetryPolicy,
    url: &str,
    operation: F,
) -> Result<Response, reqwest::Error>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<Response, reqwest::Error>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(response) => {
                let status = response.status();
                if attempt >= policy.max_retries
                    || classify_status(status) == RetryDecision::NoRetry
                {
                    if attempt > 0 {
                        info!("{} answered {} after {} retries", url, status, attempt);
                    }
                    return Ok(response);
                }
                warn!(
                    "{} returned retryable status {} (attempt {} of {})",
                    url,
                    status,
                    attempt + 1,
                    policy.max_retries + 1
                );
            }
            Err(e) => {
                if attempt >= policy.max_retries || classify_error(&e) == RetryDecision::NoRetry {
                    debug!("Giving up on {} after {} attempts: {}", url, attempt + 1, e);
                    return Err(e);
                }
                warn!(
                    "Request to {} failed (attempt {} of {}): {}",
                    url,
                    attempt + 1,
                    policy.max_retries + 1,
                    e
                );
            }
        }

        tokio::time::sleep(policy.delay_for_attempt(attempt)).await;
        attempt += 1;
    }
}
