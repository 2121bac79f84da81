//! Maps client error types

use thiserror::Error;

/// Errors that can occur when calling the Google Maps web services
#[derive(Debug, Error)]
pub enum MapsError {
    /// No API key configured; nothing was sent
    #[error("Google Maps API key is not configured")]
    MissingApiKey,

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Connection to the service failed, or the body could not be read
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },

    /// Non-200 HTTP status
    #[error("HTTP status {0}")]
    HttpStatus(u16),

    /// Body was not valid JSON or had no `status` field
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Top-level `status` was not `OK`
    #[error("Provider status {status}{}", .error_message.as_ref().map(|m| format!(": {m}")).unwrap_or_default())]
    ProviderStatus {
        /// Status value, e.g. `ZERO_RESULTS` or `REQUEST_DENIED`
        status: String,
        /// Optional `error_message` from the body
        error_message: Option<String>,
    },
}

impl MapsError {
    /// Whether the provider only reported an empty result
    #[must_use]
    pub fn is_no_result(&self) -> bool {
        matches!(self, Self::ProviderStatus { status, .. } if status == "ZERO_RESULTS" || status == "NOT_FOUND")
    }
}
