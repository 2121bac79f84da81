//! Per-task failure isolation
//!
//! Wraps one unit of enrichment work so that neither an error nor a panic
//! inside it can take down the surrounding batch.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;

use crate::error::EnrichmentFailure;

/// Run `future`, converting a panic into [`EnrichmentFailure::Panicked`]
///
/// # Errors
///
/// Returns the future's own failure, or `Panicked` if it panicked.
pub async fn isolate<F, T>(future: F) -> Result<T, EnrichmentFailure>
where
    F: Future<Output = Result<T, EnrichmentFailure>>,
{
    match AssertUnwindSafe(future).catch_unwind().await {
        Ok(result) => result,
        Err(payload) => Err(EnrichmentFailure::Panicked(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string())
}
