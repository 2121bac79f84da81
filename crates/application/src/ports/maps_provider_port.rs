//! Mapping provider port
//!
//! Raw access to the provider's REST endpoint families. The port returns
//! the parsed JSON body of a successful call; turning it into travel legs
//! or place details is the normalizer's job.

use async_trait::async_trait;
use domain::value_objects::{GeoLocation, TravelMode};
#[cfg(test)]
use mockall::automock;
use serde_json::Value;

use crate::error::EnrichmentFailure;

/// Endpoint family of a provider request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointKind {
    /// Travel distance and time between origins and destinations
    DistanceMatrix,
    /// Places around a coordinate
    NearbySearch,
    /// Details of a single place by identifier
    PlaceDetails,
    /// Full routes between two points
    Directions,
}

impl EndpointKind {
    /// Short name used in logs
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::DistanceMatrix => "distance_matrix",
            Self::NearbySearch => "nearby_search",
            Self::PlaceDetails => "place_details",
            Self::Directions => "directions",
        }
    }
}

/// One outbound provider call: endpoint plus query parameters
///
/// Parameter names are the provider's wire names. The API key is not part
/// of the request; the provider adapter attaches it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderRequest {
    /// Endpoint family to call
    pub endpoint: EndpointKind,
    /// Query parameters in insertion order
    pub params: Vec<(&'static str, String)>,
}

impl ProviderRequest {
    /// Create an empty request for an endpoint
    #[must_use]
    pub const fn new(endpoint: EndpointKind) -> Self {
        Self {
            endpoint,
            params: Vec::new(),
        }
    }

    /// Append a query parameter
    #[must_use]
    pub fn with_param(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.params.push((name, value.into()));
        self
    }

    /// Look up a parameter value by name
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Distance matrix request for a single origin/destination pair
    #[must_use]
    pub fn distance_matrix(origin: &GeoLocation, destination: &GeoLocation, mode: TravelMode) -> Self {
        Self::new(EndpointKind::DistanceMatrix)
            .with_param("origins", origin.to_query_value())
            .with_param("destinations", destination.to_query_value())
            .with_param("mode", mode.as_str())
    }

    /// Nearby search around a coordinate
    #[must_use]
    pub fn nearby_search(location: &GeoLocation, radius_meters: u32) -> Self {
        Self::new(EndpointKind::NearbySearch)
            .with_param("location", location.to_query_value())
            .with_param("radius", radius_meters.to_string())
    }

    /// Place details lookup by place identifier
    #[must_use]
    pub fn place_details(place_id: &str, fields: &str) -> Self {
        Self::new(EndpointKind::PlaceDetails)
            .with_param("place_id", place_id)
            .with_param("fields", fields)
    }

    /// Directions between two points, asking for alternative routes
    #[must_use]
    pub fn directions(origin: &GeoLocation, destination: &GeoLocation, mode: TravelMode) -> Self {
        Self::new(EndpointKind::Directions)
            .with_param("origin", origin.to_query_value())
            .with_param("destination", destination.to_query_value())
            .with_param("mode", mode.as_str())
            .with_param("alternatives", "true")
    }
}

/// Port for the mapping provider's REST APIs
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MapsProviderPort: Send + Sync {
    /// Whether an API key is available
    ///
    /// The gateway checks this before issuing any request.
    fn is_configured(&self) -> bool;

    /// Perform one GET against the provider
    ///
    /// Returns the parsed body when the HTTP status is 200 and the
    /// provider's top-level `status` is `OK`.
    async fn query(&self, request: &ProviderRequest) -> Result<Value, EnrichmentFailure>;
}
