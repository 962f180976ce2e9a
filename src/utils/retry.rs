//! Retry with exponential backoff for remote index fetches.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;

/// Backoff policy for retried operations.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    /// Delay multiplier applied after each failed attempt.
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(5),
            multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    #[must_use]
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    fn next_delay(&self, current: Duration) -> Duration {
        Duration::from_secs_f64(current.as_secs_f64() * self.multiplier).min(self.max_delay)
    }
}

/// Outcome of a retried operation.
#[derive(Debug)]
pub enum RetryOutcome<T, E> {
    Success { value: T, attempts: u32 },
    Failed { last_error: E, attempts: u32 },
}

impl<T, E> RetryOutcome<T, E> {
    pub fn into_result(self) -> Result<T, E> {
        match self {
            RetryOutcome::Success { value, .. } => Ok(value),
            RetryOutcome::Failed { last_error, .. } => Err(last_error),
        }
    }

    pub fn attempts(&self) -> u32 {
        match self {
            RetryOutcome::Success { attempts, .. } | RetryOutcome::Failed { attempts, .. } => {
                *attempts
            }
        }
    }
}

/// Classifies errors as transient.
pub trait Retryable {
    fn is_retryable(&self) -> bool;
}

/// Run `operation` until it succeeds, fails permanently, or attempts run out.
pub async fn with_retry<T, E, F, Fut>(policy: &RetryPolicy, mut operation: F) -> RetryOutcome<T, E>
where
    E: Retryable + std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempts = 0;
    let mut delay = policy.initial_delay;

    loop {
        attempts += 1;

        match operation().await {
            Ok(value) => return RetryOutcome::Success { value, attempts },
            Err(error) => {
                if attempts >= policy.max_attempts || !error.is_retryable() {
                    return RetryOutcome::Failed {
                        last_error: error,
                        attempts,
                    };
                }

                let jitter = jitter_ms(delay.as_millis() as u64 / 4);
                tracing::debug!(attempt = attempts, error = %error, "retrying after transient failure");
                sleep(delay + Duration::from_millis(jitter)).await;
                delay = policy.next_delay(delay);
            }
        }
    }
}

fn jitter_ms(max: u64) -> u64 {
    if max == 0 {
        return 0;
    }
    (uuid::Uuid::new_v4().as_u128() % u128::from(max)) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Debug)]
    struct FetchError(&'static str);

    impl std::fmt::Display for FetchError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(self.0)
        }
    }

    impl Retryable for FetchError {
        fn is_retryable(&self) -> bool {
            self.0.contains("unavailable")
        }
    }

    #[tokio::test]
    async fn test_succeeds_first_attempt() {
        let calls = AtomicU32::new(0);
        let outcome = with_retry(&RetryPolicy::new(3), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, FetchError>("index")
        })
        .await;

        assert_eq!(outcome.attempts(), 1);
        assert_eq!(outcome.into_result().unwrap(), "index");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_recovers_from_transient_failures() {
        let calls = AtomicU32::new(0);
        let outcome = with_retry(
            &RetryPolicy::new(3).with_initial_delay(Duration::from_millis(5)),
            || async {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(FetchError("service unavailable"))
                } else {
                    Ok("index")
                }
            },
        )
        .await;

        assert_eq!(outcome.attempts(), 3);
        assert!(outcome.into_result().is_ok());
    }

    #[tokio::test]
    async fn test_permanent_failure_stops_immediately() {
        let calls = AtomicU32::new(0);
        let outcome = with_retry(&RetryPolicy::new(3), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err::<(), _>(FetchError("not found"))
        })
        .await;

        assert!(matches!(outcome, RetryOutcome::Failed { attempts: 1, .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let outcome = with_retry(
            &RetryPolicy::new(2).with_initial_delay(Duration::from_millis(5)),
            || async { Err::<(), _>(FetchError("unavailable")) },
        )
        .await;

        assert!(matches!(outcome, RetryOutcome::Failed { attempts: 2, .. }));
    }

    #[test]
    fn test_delay_is_capped() {
        let policy = RetryPolicy::new(5).with_max_delay(Duration::from_millis(300));
        assert_eq!(
            policy.next_delay(Duration::from_millis(200)),
            Duration::from_millis(300)
        );
    }
}
