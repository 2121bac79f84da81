//! Travel mode value object
//!
//! The transport method tag used when querying route and distance data.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Transport method used for distance and route queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    /// Car travel on the road network
    Driving,
    /// Pedestrian paths
    Walking,
    /// Bicycle paths and roads
    Bicycling,
    /// Public transport
    Transit,
}

impl TravelMode {
    /// Every supported mode, in declaration order
    pub const ALL: [Self; 4] = [Self::Driving, Self::Walking, Self::Bicycling, Self::Transit];

    /// Provider wire tag (`mode` query parameter value)
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Driving => "driving",
            Self::Walking => "walking",
            Self::Bicycling => "bicycling",
            Self::Transit => "transit",
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TravelMode {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "driving" | "car" => Ok(Self::Driving),
            "walking" | "walk" => Ok(Self::Walking),
            "bicycling" | "cycling" | "bike" => Ok(Self::Bicycling),
            "transit" | "public_transport" => Ok(Self::Transit),
            _ => Err("Invalid travel mode"),
        }
    }
}
