//! Google Maps web service client
//!
//! One GET per call, no retries. Outcomes are logged at debug level only;
//! callers decide how loudly a failure is reported.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::config::MapsConfig;
use crate::error::MapsError;
use crate::models::{MapsEndpoint, ProviderEnvelope};

/// Trait for mapping provider clients
#[async_trait]
pub trait MapsClient: Send + Sync {
    /// Whether an API key is available
    fn is_configured(&self) -> bool;

    /// GET an endpoint with the given query parameters
    ///
    /// The API key is appended as `key`. Returns the parsed body when the
    /// HTTP status is 200 and the provider status is `OK`.
    async fn query(
        &self,
        endpoint: MapsEndpoint,
        params: &[(&str, String)],
    ) -> Result<Value, MapsError>;
}

/// `reqwest`-based Google Maps client
#[derive(Debug)]
pub struct GoogleMapsClient {
    client: Client,
    config: MapsConfig,
}

impl GoogleMapsClient {
    /// Create a new Google Maps client
    ///
    /// A missing API key is accepted; every query then fails with
    /// [`MapsError::MissingApiKey`] without touching the network.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be initialized.
    pub fn new(config: &MapsConfig) -> Result<Self, MapsError> {
        config.validate().map_err(MapsError::ConfigurationError)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| MapsError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    fn endpoint_url(&self, endpoint: MapsEndpoint) -> String {
        format!(
            "{}{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint.path()
        )
    }

    fn send_error(&self, e: &reqwest::Error) -> MapsError {
        if e.is_timeout() {
            MapsError::Timeout {
                timeout_secs: self.config.timeout_secs,
            }
        } else {
            MapsError::ConnectionFailed(e.to_string())
        }
    }

    /// Check the provider status of a 200 body
    fn check_envelope(body: &str) -> Result<Value, MapsError> {
        let value: Value =
            serde_json::from_str(body).map_err(|e| MapsError::ParseError(e.to_string()))?;
        let envelope =
            ProviderEnvelope::deserialize(&value).map_err(|e| MapsError::ParseError(e.to_string()))?;

        if envelope.is_ok() {
            Ok(value)
        } else {
            Err(MapsError::ProviderStatus {
                status: envelope.status,
                error_message: envelope.error_message,
            })
        }
    }

    async fn fetch(
        &self,
        endpoint: MapsEndpoint,
        params: &[(&str, String)],
    ) -> Result<Value, MapsError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|_| self.config.has_api_key())
            .ok_or(MapsError::MissingApiKey)?;

        let mut query: Vec<(&str, &str)> = params.iter().map(|(k, v)| (*k, v.as_str())).collect();
        query.push(("key", api_key));

        let url = self.endpoint_url(endpoint);
        debug!(%endpoint, "Querying Google Maps");

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| self.send_error(&e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(MapsError::HttpStatus(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.send_error(&e))?;

        Self::check_envelope(&body)
    }
}

#[async_trait]
impl MapsClient for GoogleMapsClient {
    fn is_configured(&self) -> bool {
        self.config.has_api_key()
    }

    #[instrument(skip(self, params), fields(endpoint = %endpoint))]
    async fn query(
        &self,
        endpoint: MapsEndpoint,
        params: &[(&str, String)],
    ) -> Result<Value, MapsError> {
        let result = self.fetch(endpoint, params).await;
        match &result {
            Ok(_) => debug!("Google Maps request succeeded"),
            Err(e) => debug!(error = %e, no_result = e.is_no_result(), "Google Maps request failed"),
        }
        result
    }
}
