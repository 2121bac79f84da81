//! Maps provider adapter - Implements MapsProviderPort using integration_maps

use std::sync::Arc;

use application::error::EnrichmentFailure;
use application::ports::{EndpointKind, MapsProviderPort, ProviderRequest};
use async_trait::async_trait;
use integration_maps::{GoogleMapsClient, MapsClient, MapsConfig, MapsEndpoint, MapsError};
use serde_json::Value;
use tracing::instrument;

/// Adapter for the Google Maps web services
pub struct MapsProviderAdapter {
    client: Arc<dyn MapsClient>,
}

impl std::fmt::Debug for MapsProviderAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapsProviderAdapter")
            .field("configured", &self.client.is_configured())
            .finish_non_exhaustive()
    }
}

impl MapsProviderAdapter {
    /// Wrap an existing client
    #[must_use]
    pub fn new(client: Arc<dyn MapsClient>) -> Self {
        Self { client }
    }

    /// Build a Google Maps client from configuration and wrap it
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be initialized.
    pub fn from_config(config: &MapsConfig) -> Result<Self, MapsError> {
        let client = GoogleMapsClient::new(config)?;
        Ok(Self::new(Arc::new(client)))
    }

    const fn convert_endpoint(endpoint: EndpointKind) -> MapsEndpoint {
        match endpoint {
            EndpointKind::DistanceMatrix => MapsEndpoint::DistanceMatrix,
            EndpointKind::NearbySearch => MapsEndpoint::NearbySearch,
            EndpointKind::PlaceDetails => MapsEndpoint::PlaceDetails,
            EndpointKind::Directions => MapsEndpoint::Directions,
        }
    }

    fn convert_error(error: MapsError) -> EnrichmentFailure {
        match error {
            MapsError::MissingApiKey | MapsError::ConfigurationError(_) => {
                EnrichmentFailure::MissingConfiguration
            },
            MapsError::ConnectionFailed(message) => EnrichmentFailure::Transport(message),
            e @ MapsError::Timeout { .. } => EnrichmentFailure::Transport(e.to_string()),
            MapsError::HttpStatus(code) => EnrichmentFailure::HttpStatus(code),
            MapsError::ParseError(message) => EnrichmentFailure::MalformedResponse(message),
            MapsError::ProviderStatus { status, .. } => EnrichmentFailure::ProviderStatus(status),
        }
    }
}

#[async_trait]
impl MapsProviderPort for MapsProviderAdapter {
    fn is_configured(&self) -> bool {
        self.client.is_configured()
    }

    #[instrument(skip(self, request), fields(endpoint = request.endpoint.name()))]
    async fn query(&self, request: &ProviderRequest) -> Result<Value, EnrichmentFailure> {
        self.client
            .query(Self::convert_endpoint(request.endpoint), &request.params)
            .await
            .map_err(Self::convert_error)
    }
}
