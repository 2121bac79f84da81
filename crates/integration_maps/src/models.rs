//! Endpoint and envelope models

use std::fmt;

use serde::Deserialize;

/// Provider status meaning the request succeeded
pub const STATUS_OK: &str = "OK";

/// Google Maps web service endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapsEndpoint {
    /// `/distancematrix/json`
    DistanceMatrix,
    /// `/place/nearbysearch/json`
    NearbySearch,
    /// `/place/details/json`
    PlaceDetails,
    /// `/directions/json`
    Directions,
}

impl MapsEndpoint {
    /// Path relative to the base URL
    #[must_use]
    pub const fn path(&self) -> &'static str {
        match self {
            Self::DistanceMatrix => "/distancematrix/json",
            Self::NearbySearch => "/place/nearbysearch/json",
            Self::PlaceDetails => "/place/details/json",
            Self::Directions => "/directions/json",
        }
    }
}

impl fmt::Display for MapsEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Fields every response body shares
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProviderEnvelope {
    /// Top-level status, `OK` on success
    pub status: String,
    /// Human-readable detail for error statuses
    #[serde(default)]
    pub error_message: Option<String>,
}

impl ProviderEnvelope {
    /// Whether the status is `OK`
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}
