//! Retry utilities for resilient operations
//!
//! A deliberately small retry: a fixed pause between attempts and no
//! backoff, so a persistently broken source surfaces quickly.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration for retry behavior
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Extra attempts after the first one
    pub max_retries: u32,

    /// Fixed pause before each extra attempt
    pub delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 1,
            delay: Duration::from_secs(2),
        }
    }
}

impl RetryConfig {
    /// Create a retry configuration with a single retry after `delay`
    pub fn single(delay: Duration) -> Self {
        Self {
            max_retries: 1,
            delay,
        }
    }

    /// Retry configuration without any pause, for tests and dry runs
    pub fn immediate(max_retries: u32) -> Self {
        Self {
            max_retries,
            delay: Duration::ZERO,
        }
    }
}

/// Execute an operation, retrying after a fixed delay on failure
///
/// The last error is returned unchanged once all attempts fail.
///
/// # Example
///
/// ```no_run
/// use ticketwatch::utils::retry::{with_retry, RetryConfig};
///
/// # async fn run() -> Result<(), std::io::Error> {
/// let config = RetryConfig::default();
/// let body = with_retry(&config, || async { Ok::<_, std::io::Error>("page") }).await?;
/// # Ok(())
/// # }
/// ```
pub async fn with_retry<T, E, F, Fut>(config: &RetryConfig, operation: F) -> Result<T, E>
where
    E: Display,
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 0;

    loop {
        match operation().await {
            Ok(result) => {
                if attempt > 0 {
                    debug!(attempt = attempt, "Operation succeeded after retry");
                }
                return Ok(result);
            }
            Err(e) if attempt < config.max_retries => {
                attempt += 1;
                warn!(
                    attempt = attempt,
                    delay_ms = config.delay.as_millis() as u64,
                    error = %e,
                    "Operation failed, retrying after delay"
                );
                tokio::time::sleep(config.delay).await;
            }
            Err(e) => {
                warn!(attempt = attempt, error = %e, "Operation failed, giving up");
                return Err(e);
            }
        }
    }
}
