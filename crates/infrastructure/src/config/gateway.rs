//! Enrichment gateway configuration

use application::{GatewayConfig, GatewayProfile};
use serde::{Deserialize, Serialize};

/// Gateway settings; travel modes come from the profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayAppConfig {
    /// `attractions` or `generic_locations`
    #[serde(default)]
    pub profile: GatewayProfile,

    /// In-flight provider calls per fan-out level (1 = sequential)
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Nearby search radius for place details, in meters
    #[serde(default = "default_place_search_radius")]
    pub place_search_radius_m: u32,
}

const fn default_max_concurrency() -> usize {
    1
}

const fn default_place_search_radius() -> u32 {
    100
}

impl Default for GatewayAppConfig {
    fn default() -> Self {
        Self {
            profile: GatewayProfile::default(),
            max_concurrency: default_max_concurrency(),
            place_search_radius_m: default_place_search_radius(),
        }
    }
}

impl GatewayAppConfig {
    /// Expand into the gateway's full configuration
    #[must_use]
    pub fn to_gateway_config(&self) -> GatewayConfig {
        GatewayConfig {
            max_concurrency: self.max_concurrency,
            place_search_radius_m: self.place_search_radius_m,
            ..GatewayConfig::for_profile(self.profile)
        }
    }
}
