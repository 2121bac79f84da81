//! Travel-mode selection rules
//!
//! Both rules run over the configured mode order, never over map
//! iteration order, so ties always resolve to the earlier mode.

use domain::TravelMode;

use crate::error::EnrichmentFailure;

/// Pick the first successful mode in precedence order
///
/// # Errors
///
/// Returns every `(mode, failure)` pair, in order, when no mode succeeded.
pub fn select_by_precedence<T>(
    results: Vec<(TravelMode, Result<T, EnrichmentFailure>)>,
) -> Result<(TravelMode, T), Vec<(TravelMode, EnrichmentFailure)>> {
    let mut failures = Vec::with_capacity(results.len());
    for (mode, result) in results {
        match result {
            Ok(value) => return Ok((mode, value)),
            Err(failure) => failures.push((mode, failure)),
        }
    }
    Err(failures)
}

/// Pick the candidate with the smallest duration
///
/// The first minimum in slice order wins. Returns `None` for an empty slice.
pub fn select_fastest<T>(
    candidates: &[(TravelMode, T)],
    duration: impl Fn(&T) -> f64,
) -> Option<&(TravelMode, T)> {
    candidates.iter().reduce(|best, candidate| {
        if duration(&candidate.1) < duration(&best.1) {
            candidate
        } else {
            best
        }
    })
}
