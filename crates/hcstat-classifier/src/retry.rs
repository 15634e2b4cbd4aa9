//! Fixed-delay retry for remote model calls

use hcstat_core::error::Result;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// How often and how patiently a failed call is retried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Pause between two attempts
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(3),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// Run `op` until it succeeds or the attempts are used up
    ///
    /// Every error is retried. The error of the last attempt is returned.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < max_attempts => {
                    warn!(
                        "Retry request ({}/{}) - Wait {:.1} seconds - Exception: {}",
                        attempt,
                        max_attempts - 1,
                        self.delay.as_secs_f64(),
                        e
                    );
                    tokio::time::sleep(self.delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hcstat_core::error::HcstatError;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_policy() -> RetryPolicy {
        RetryPolicy::new(3, Duration::from_millis(1))
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.delay, Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_succeeds_after_failures() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result = fast_policy()
            .run(move || async move {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                if n < 3 {
                    Err(HcstatError::Api {
                        status: 503,
                        message: "overloaded".into(),
                    })
                } else {
                    Ok(n)
                }
            })
            .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_final_error_propagated() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result: Result<()> = fast_policy()
            .run(move || async move {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                Err(HcstatError::InvalidAnswer(format!("attempt {n}")))
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(
            result.unwrap_err().to_string(),
            "Invalid challenge answer: attempt 3"
        );
    }

    #[tokio::test]
    async fn test_first_success_not_retried() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result = fast_policy()
            .run(move || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, HcstatError>("done")
            })
            .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_zero_attempts_still_runs_once() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let policy = RetryPolicy::new(0, Duration::from_millis(1));
        let _: Result<()> = policy
            .run(move || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(HcstatError::Config("nope".into()))
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
