//! Per-operation deadline

use std::future::Future;
use std::time::Duration;

use crate::error::{KinolistError, KinolistResult};

/// Run `operation` under `limit`; elapsed deadline is `KinolistError::Timeout`.
pub(crate) async fn within<T>(
    limit: Duration,
    name: &'static str,
    operation: impl Future<Output = KinolistResult<T>>,
) -> KinolistResult<T> {
    tokio::time::timeout(limit, operation).await.unwrap_or_else(|_| {
        tracing::warn!(operation = name, limit_ms = limit.as_millis() as u64, "Deadline exceeded");
        Err(KinolistError::Timeout)
    })
}
