//! Retry support for transient Kassal API failures.
//!
//! The API allows 60 requests per minute on the free tier and answers 429
//! past that. The client defaults to zero retries; operators can opt into
//! exponential backoff through configuration.

use std::future::Future;
use std::time::Duration;

use crate::error::KassalError;

/// Returns `true` if `err` is transient and worth another attempt.
///
/// Retriable: [`KassalError::RateLimited`], [`KassalError::Http`] (connection
/// reset, timeout), and 5xx [`KassalError::UnexpectedStatus`]. Everything
/// else (404, 4xx, bad JSON, invalid input) is returned immediately.
fn is_retriable(err: &KassalError) -> bool {
    match err {
        KassalError::RateLimited { .. } | KassalError::Http(_) => true,
        KassalError::UnexpectedStatus { status, .. } => *status >= 500,
        _ => false,
    }
}

/// Seconds to wait before retry number `attempt + 1`.
///
/// Exponential in `attempt`; a 429 never waits less than the `Retry-After`
/// the API sent.
fn retry_delay_secs(err: &KassalError, attempt: u32, backoff_base_secs: u64) -> u64 {
    let backoff = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
    match err {
        KassalError::RateLimited { retry_after_secs } => backoff.max(*retry_after_secs),
        _ => backoff,
    }
}

/// Executes `operation`, retrying transient errors up to `max_retries` extra
/// times with a `backoff_base_secs * 2^attempt` second sleep in between,
/// stretched to the server's `Retry-After` on 429.
///
/// With `max_retries = 0` the operation runs exactly once.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, KassalError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, KassalError>>,
{
    let mut attempt = 0u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if !is_retriable(&err) || attempt >= max_retries => return Err(err),
            Err(err) => err,
        };

        let delay_secs = retry_delay_secs(&err, attempt, backoff_base_secs);
        tracing::warn!(
            attempt,
            max_retries,
            delay_secs,
            error = %err,
            "transient Kassal API error, retrying after backoff"
        );
        tokio::time::sleep(Duration::from_secs(delay_secs)).await;
        attempt += 1;
    }
}
