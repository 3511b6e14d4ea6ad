//! Per-operation deadline

use std::future::Future;
use std::time::Duration;

use crate::error::{AuthError, AuthResult};

/// Run `operation` under `limit`; elapsed deadline is `AuthError::Timeout`.
///
/// Dropping the returned future drops `operation` with it.
pub(crate) async fn within<T>(
    limit: Duration,
    name: &'static str,
    operation: impl Future<Output = AuthResult<T>>,
) -> AuthResult<T> {
    match tokio::time::timeout(limit, operation).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(operation = name, limit_ms = limit.as_millis() as u64, "Deadline exceeded");
            Err(AuthError::Timeout)
        }
    }
}

/// Run blocking work (password hashing) on the blocking pool
pub(crate) async fn blocking<T, F>(work: F) -> AuthResult<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AuthError::Internal(format!("blocking task failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_within_passes_result_through() {
        let ok = within(Duration::from_secs(1), "ok", async { Ok(7) }).await;
        assert_eq!(ok.unwrap(), 7);

        let err: AuthResult<()> =
            within(Duration::from_secs(1), "err", async { Err(AuthError::AccountNotFound) }).await;
        assert!(matches!(err, Err(AuthError::AccountNotFound)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_within_times_out() {
        let result: AuthResult<()> = within(Duration::from_millis(50), "slow", async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok(())
        })
        .await;
        assert!(matches!(result, Err(AuthError::Timeout)));
    }

    #[tokio::test]
    async fn test_blocking_runs_closure() {
        assert_eq!(blocking(|| 2 + 2).await.unwrap(), 4);
    }
}
