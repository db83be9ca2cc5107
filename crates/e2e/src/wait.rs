//! Bounded polling
//!
//! Every synchronisation with the browser goes through [`Wait`]: evaluate a
//! probe immediately, then keep re-evaluating it at a fixed interval until it
//! yields a value or the budget runs out. Probe errors count as "not yet".
//! If the last evaluation before the deadline failed with a driver error,
//! that error is returned as is; otherwise the wait ends in a timeout.

use std::future::Future;
use std::time::{Duration, Instant};
use tracing::trace;

use crate::error::{E2eError, E2eResult};

/// Default polling interval
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Timeout and poll interval for one wait
#[derive(Debug, Clone, Copy)]
pub struct Wait {
    timeout: Duration,
    poll: Duration,
}

impl Wait {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            poll: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Set the polling interval; zero is bumped to one millisecond
    pub fn with_poll(mut self, poll: Duration) -> Self {
        self.poll = poll.max(Duration::from_millis(1));
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn poll(&self) -> Duration {
        self.poll
    }

    /// Poll `probe` until it returns `Some`.
    ///
    /// A zero timeout still evaluates the probe once.
    pub async fn until<T, F, Fut>(&self, condition: &str, mut probe: F) -> E2eResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = E2eResult<Option<T>>>,
    {
        let start = Instant::now();
        let mut last_error: Option<E2eError> = None;
        let mut failed_last = false;
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            match probe().await {
                Ok(Some(value)) => {
                    trace!(condition, attempts, "wait satisfied");
                    return Ok(value);
                }
                Ok(None) => failed_last = false,
                Err(e) => {
                    trace!(condition, attempts, error = %e, "probe failed, retrying");
                    failed_last = true;
                    last_error = Some(e);
                }
            }

            let elapsed = start.elapsed();
            if elapsed >= self.timeout {
                return Err(match last_error {
                    Some(e) if failed_last && !e.is_miss() => e,
                    last_error => E2eError::Timeout {
                        condition: condition.to_string(),
                        elapsed,
                        last_error: last_error.map(|e| e.to_string()),
                    },
                });
            }

            tokio::time::sleep(self.poll.min(self.timeout - elapsed)).await;
        }
    }

    /// Poll a boolean predicate until it holds
    pub async fn until_true<F, Fut>(&self, condition: &str, mut predicate: F) -> E2eResult<()>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = E2eResult<bool>>,
    {
        self.until(condition, || {
            let check = predicate();
            async move { Ok(check.await?.then_some(())) }
        })
        .await
    }
}
