use std::fmt;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Fixed-delay retry policy: no backoff, no jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(10),
        }
    }
}

impl RetryConfig {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }
}

/// How the retry loop should treat a failure.
pub trait Retryable: fmt::Display {
    /// A terminal failure is a recognised end state. It is reported to the
    /// caller on the spot and never retried.
    fn is_terminal(&self) -> bool {
        false
    }

    /// Connection-level faults (reset, abort, timeout) usually point at the proxy.
    fn is_connection_fault(&self) -> bool {
        false
    }
}

impl Retryable for anyhow::Error {}

#[derive(Debug)]
pub enum RetryOutcome<T, E> {
    Success { value: T, attempts: u32 },
    /// Stopped on a terminal failure without retrying
    Halted { error: E, attempts: u32 },
    /// Every attempt failed
    Exhausted { error: E, attempts: u32 },
}

impl<T, E> RetryOutcome<T, E> {
    pub fn attempts(&self) -> u32 {
        match self {
            RetryOutcome::Success { attempts, .. } => *attempts,
            RetryOutcome::Halted { attempts, .. } | RetryOutcome::Exhausted { attempts, .. } => {
                *attempts
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RetryOutcome::Success { .. })
    }

    pub fn ok(self) -> Option<T> {
        match self {
            RetryOutcome::Success { value, .. } => Some(value),
            _ => None,
        }
    }
}

/// Runs `operation` up to `config.max_attempts` times.
///
/// Each non-terminal failure before the last attempt logs a warning and
/// sleeps `config.delay`. Exhaustion is logged as an error (with a proxy
/// hint for connection faults) and returned, never propagated.
pub async fn with_retry<T, E, F, Fut>(
    config: &RetryConfig,
    label: &str,
    operation_name: &str,
    mut operation: F,
) -> RetryOutcome<T, E>
where
    E: Retryable,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!("[{}] {} succeeded on attempt {}", label, operation_name, attempt);
                }
                return RetryOutcome::Success {
                    value,
                    attempts: attempt,
                };
            }
            Err(e) if e.is_terminal() => {
                return RetryOutcome::Halted {
                    error: e,
                    attempts: attempt,
                };
            }
            Err(e) if attempt >= max_attempts => {
                error!(
                    "[{}] {} Failed after {} attempts: {}",
                    label, operation_name, max_attempts, e
                );
                if e.is_connection_fault() {
                    warn!(
                        "[{}] Proxy connection issue detected, continuing...",
                        label
                    );
                }
                return RetryOutcome::Exhausted {
                    error: e,
                    attempts: attempt,
                };
            }
            Err(e) => {
                warn!(
                    "[{}] {} - Attempt {} failed: {}",
                    label, operation_name, attempt, e
                );
                tokio::time::sleep(config.delay).await;
                attempt += 1;
            }
        }
    }
}
