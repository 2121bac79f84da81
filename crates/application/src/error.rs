//! Application-level errors

use domain::DomainError;
use domain::TravelMode;
use thiserror::Error;

use crate::ports::Severity;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Storage or runtime failure
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Provider statuses that mean "nothing there" rather than "something broke"
const NO_RESULT_STATUSES: [&str; 2] = ["ZERO_RESULTS", "NOT_FOUND"];

const PANICKED: &str = "panicked";

/// Why a single enrichment step produced no data
///
/// Every variant is absorbed at the gateway boundary and turned into an
/// empty or partial result; callers only ever see it in diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnrichmentFailure {
    /// No API key configured for the mapping provider
    #[error("Mapping provider API key is not configured")]
    MissingConfiguration,

    /// Network-level failure: timeout, DNS, connection reset, body read
    #[error("Transport failure: {0}")]
    Transport(String),

    /// Provider answered with a non-200 HTTP status
    #[error("Provider returned HTTP {0}")]
    HttpStatus(u16),

    /// HTTP 200 but the provider or element status was not `OK`
    #[error("Provider status {0}")]
    ProviderStatus(String),

    /// Body did not have the expected shape
    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    /// Every candidate travel mode failed for a destination
    #[error("No route found for {destination} ({})", describe_attempts(.attempts))]
    NoRouteFound {
        /// Display name of the destination
        destination: String,
        /// Each tried mode with the cause tag of its failure
        attempts: Vec<(TravelMode, String)>,
    },

    /// The enrichment task panicked and was contained
    #[error("Enrichment task panicked: {0}")]
    Panicked(String),
}

impl EnrichmentFailure {
    /// Stable tag identifying the failure class, e.g. `http_status:503`
    #[must_use]
    pub fn cause_tag(&self) -> String {
        match self {
            Self::MissingConfiguration => "missing_configuration".to_string(),
            Self::Transport(_) => "transport".to_string(),
            Self::HttpStatus(code) => format!("http_status:{code}"),
            Self::ProviderStatus(status) => format!("provider_status:{status}"),
            Self::MalformedResponse(_) => "malformed_response".to_string(),
            Self::NoRouteFound { .. } => "no_route_found".to_string(),
            Self::Panicked(_) => PANICKED.to_string(),
        }
    }

    /// Log severity matching the failure class
    ///
    /// "No result" conditions are warnings. Transport problems, unexpected
    /// provider statuses, exhausted single-mode lookups and anything that
    /// panicked are errors.
    #[must_use]
    pub fn severity(&self) -> Severity {
        match self {
            Self::MissingConfiguration => Severity::Warning,
            Self::ProviderStatus(status) if is_no_result_status(status) => Severity::Warning,
            Self::NoRouteFound { attempts, .. }
                if attempts.len() > 1 && !attempts.iter().any(|(_, cause)| cause == PANICKED) =>
            {
                Severity::Warning
            },
            _ => Severity::Error,
        }
    }
}

/// Whether a provider status only reports an empty result
#[must_use]
pub fn is_no_result_status(status: &str) -> bool {
    NO_RESULT_STATUSES.contains(&status)
}

fn describe_attempts(attempts: &[(TravelMode, String)]) -> String {
    if attempts.is_empty() {
        return "no modes tried".to_string();
    }
    attempts
        .iter()
        .map(|(mode, cause)| format!("{mode}: {cause}"))
        .collect::<Vec<_>>()
        .join(", ")
}
