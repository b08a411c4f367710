//! Fail-open utilities for infrastructure operations
//!
//! Fixture loading, cleanup, and failure screenshots must never turn a
//! passing journey into a failing one. Use these for infrastructure
//! operations only.
//!
//! DO NOT use fail-open for:
//! - Page-object actions and assertions (the test itself)
//! - The auth bootstrap (credentials are a hard precondition)
//! - The backend readiness probe (no meaningful test can run without it)

use std::future::Future;
use std::time::Duration;
use tracing::warn;

use crate::Result;

/// Execute an operation that should fail open.
///
/// Logs the error via `tracing::warn!` on failure and returns `None`.
///
/// Appropriate for:
/// - Fixture load/clean under the lenient policy
/// - Failure-screenshot capture
/// - Suite-report writing
pub async fn fail_open<F, Fut, T>(operation_name: &str, f: F) -> Option<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    match f().await {
        Ok(val) => Some(val),
        Err(e) => {
            warn!("{} failed (fail-open): {}", operation_name, e);
            None
        }
    }
}

/// Retry an operation that must eventually succeed, with a fixed delay.
///
/// Unlike [`fail_open`], exhaustion is an error: this is for operations the
/// suite cannot proceed without, such as waiting for the backend to answer
/// its health endpoint while containers are still starting.
pub async fn retry_until_ok<F, Fut, T>(
    operation_name: &str,
    mut f: F,
    max_attempts: usize,
    delay: Duration,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        match f().await {
            Ok(val) => return Ok(val),
            Err(e) if attempt < max_attempts => {
                warn!(
                    "{} failed (attempt {}/{}): {}",
                    operation_name, attempt, max_attempts, e
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LabratError;

    #[tokio::test]
    async fn test_fail_open_success() {
        let result = fail_open("test_op", || async { Ok::<_, LabratError>(42) }).await;
        assert_eq!(result, Some(42));
    }

    #[tokio::test]
    async fn test_fail_open_failure() {
        let result = fail_open("test_op", || async {
            Err::<i32, _>(LabratError::Fixture("psql exited 1".to_string()))
        })
        .await;
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_retry_until_ok_succeeds_after_transient_failure() {
        let mut attempts = 0;
        let result = retry_until_ok(
            "probe",
            || {
                attempts += 1;
                async move {
                    if attempts < 3 {
                        Err(LabratError::BackendNotReady("connection refused".into()))
                    } else {
                        Ok(attempts)
                    }
                }
            },
            5,
            Duration::from_millis(1),
        )
        .await;
        assert_eq!(result.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_retry_until_ok_exhaustion_is_error() {
        let result = retry_until_ok(
            "probe",
            || async { Err::<(), _>(LabratError::BackendNotReady("down".into())) },
            3,
            Duration::from_millis(1),
        )
        .await;
        assert!(matches!(result, Err(LabratError::BackendNotReady(_))));
    }
}
