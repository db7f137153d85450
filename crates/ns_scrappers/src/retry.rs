use std::future::Future;
use std::time::Duration;

use ns_core::{Error, Result};

use crate::logging::Logger;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts before giving up; zero is treated as one
    pub retries: u32,
    /// Fixed pause between attempts
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 3,
            delay: Duration::from_secs(5),
        }
    }
}

/// Runs `operation` until it succeeds, fails with an error `is_transient`
/// rejects, or has failed transiently `policy.retries` times in a row.
///
/// Exhaustion is reported as [`Error::RetryExhausted`] naming `name`.
pub async fn retry_if<T, F, Fut, P>(
    name: &str,
    policy: &RetryPolicy,
    is_transient: P,
    logger: &Logger,
    mut operation: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
    P: Fn(&Error) -> bool,
{
    let attempts = policy.retries.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if !is_transient(&e) => return Err(e),
            Err(e) if attempt >= attempts => {
                logger.error(&format!("{} failed after {} attempts: {}", name, attempts, e));
                return Err(Error::RetryExhausted {
                    operation: name.to_string(),
                    attempts,
                    last_error: e.to_string(),
                });
            }
            Err(e) => {
                logger.warn(&format!(
                    "{}: attempt {} failed with error: {}. Retrying in {:?}.",
                    name, attempt, e, policy.delay
                ));
                tokio::time::sleep(policy.delay).await;
            }
        }
    }
}

/// [`retry_if`] with the default classification: element lookups and timeouts
/// are transient, everything else is not.
pub async fn retry<T, F, Fut>(name: &str, policy: &RetryPolicy, logger: &Logger, operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    retry_if(name, policy, Error::is_transient, logger, operation).await
}
