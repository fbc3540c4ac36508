//! Per-attempt timeout race.

use std::future::Future;
use std::time::Duration;

use crate::error::RouteError;

/// Race a future against a deadline.
///
/// When the timer fires first the attempt fails with
/// [`RouteError::Timeout`]; the in-flight future is dropped, not cancelled
/// at the backend, so invocation semantics are at-least-once.
pub async fn with_timeout<T>(
    duration: Duration,
    future: impl Future<Output = Result<T, RouteError>>,
) -> Result<T, RouteError> {
    match tokio::time::timeout(duration, future).await {
        Ok(result) => result,
        Err(_) => Err(RouteError::Timeout(duration.as_millis() as u64)),
    }
}
