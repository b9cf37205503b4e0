//! Per-call timeout and retry, clipped to the run deadline.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

use crate::errors::ProviderError;

/// Timeout and retry settings for one kind of external call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallPolicy {
    pub timeout: Duration,
    /// Attempts after the first one.
    pub retries: u32,
    /// Backoff before the first retry; doubles for each further retry.
    pub backoff: Duration,
}

impl CallPolicy {
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        self.backoff.saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
    }
}

/// Shared wall-clock budget for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunDeadline {
    at: Instant,
}

impl RunDeadline {
    pub fn after(budget: Duration) -> Self {
        Self {
            at: Instant::now() + budget,
        }
    }

    /// A deadline far enough away to never fire in practice.
    pub fn unbounded() -> Self {
        Self::after(Duration::from_secs(60 * 60 * 24 * 365))
    }

    pub fn instant(&self) -> Instant {
        self.at
    }

    pub fn remaining(&self) -> Duration {
        self.at.saturating_duration_since(Instant::now())
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.at
    }

    /// The smaller of `timeout` and the time left.
    pub fn clip(&self, timeout: Duration) -> Duration {
        timeout.min(self.remaining())
    }
}

/// Outcome of a retried call plus the number of attempts made.
#[derive(Debug)]
pub struct Attempted<T> {
    pub result: Result<T, ProviderError>,
    pub attempts: u32,
}

/// Run `call` under `policy`: each attempt gets its own timeout clipped to
/// `deadline`, and transient failures are retried with exponential backoff
/// while time remains. Non-transient errors return immediately.
pub async fn call_with_retry<T, F, Fut>(
    policy: CallPolicy,
    deadline: RunDeadline,
    operation: &str,
    mut call: F,
) -> Attempted<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ProviderError>>,
{
    let mut attempts = 0;
    loop {
        attempts += 1;
        let budget = deadline.clip(policy.timeout);
        let result = if budget.is_zero() {
            Err(timeout_error(operation, budget))
        } else {
            match tokio::time::timeout(budget, call()).await {
                Ok(r) => r,
                Err(_) => Err(timeout_error(operation, budget)),
            }
        };

        let err = match result {
            Ok(v) => {
                return Attempted {
                    result: Ok(v),
                    attempts,
                }
            }
            Err(e) => e,
        };

        if !err.is_transient() || attempts > policy.retries {
            return Attempted {
                result: Err(err),
                attempts,
            };
        }

        let wait = policy.backoff_for(attempts);
        if deadline.remaining() <= wait {
            return Attempted {
                result: Err(err),
                attempts,
            };
        }
        tracing::debug!(
            operation,
            attempt = attempts,
            backoff_ms = wait.as_millis() as u64,
            error = %err,
            "retrying after transient failure"
        );
        tokio::time::sleep(wait).await;
    }
}

fn timeout_error(operation: &str, budget: Duration) -> ProviderError {
    ProviderError::Timeout {
        operation: operation.to_string(),
        timeout_ms: budget.as_millis() as u64,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    fn policy(retries: u32) -> CallPolicy {
        CallPolicy {
            timeout: Duration::from_millis(100),
            retries,
            backoff: Duration::from_millis(10),
        }
    }

    fn unavailable() -> ProviderError {
        ProviderError::Unavailable {
            provider: "test".into(),
            reason: "down".into(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn transient_failure_is_retried_once() {
        let calls = AtomicU32::new(0);
        let out = call_with_retry(policy(1), RunDeadline::unbounded(), "search", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err(unavailable())
                } else {
                    Ok(7)
                }
            }
        })
        .await;
        assert_eq!(out.result.unwrap(), 7);
        assert_eq!(out.attempts, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn malformed_output_is_not_retried() {
        let calls = AtomicU32::new(0);
        let out: Attempted<()> =
            call_with_retry(policy(3), RunDeadline::unbounded(), "plan", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(ProviderError::malformed("plan", "not json")) }
            })
            .await;
        assert!(out.result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_call_times_out() {
        let out: Attempted<()> =
            call_with_retry(policy(1), RunDeadline::unbounded(), "search", || async {
                std::future::pending::<Result<(), ProviderError>>().await
            })
            .await;
        assert!(out.result.unwrap_err().is_timeout());
        assert_eq!(out.attempts, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_is_clipped_to_deadline() {
        let deadline = RunDeadline::after(Duration::from_millis(30));
        let started = Instant::now();
        let out: Attempted<()> = call_with_retry(policy(0), deadline, "search", || async {
            std::future::pending::<Result<(), ProviderError>>().await
        })
        .await;
        assert!(out.result.is_err());
        assert!(started.elapsed() <= Duration::from_millis(31));
    }

    #[test]
    fn backoff_doubles() {
        let p = policy(3);
        assert_eq!(p.backoff_for(1), Duration::from_millis(10));
        assert_eq!(p.backoff_for(3), Duration::from_millis(40));
    }
}
