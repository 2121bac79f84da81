//! Normalized enrichment records
//!
//! Stable output shapes of the enrichment gateway. They are built fresh
//! per call and never persisted.

use std::collections::BTreeMap;

use domain::{LocationCategory, LocationId, TravelMode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Distance and duration of one provider leg
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelLeg {
    /// Mode the leg was computed for
    pub mode: TravelMode,
    /// Distance in meters
    pub distance_meters: u32,
    /// Provider display text for the distance, copied verbatim
    pub distance_text: String,
    /// Duration in seconds
    pub duration_seconds: u32,
    /// Provider display text for the duration, copied verbatim
    pub duration_text: String,
    /// Number of steps (directions only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<usize>,
    /// Encoded overview polyline (directions only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub polyline: Option<String>,
}

impl TravelLeg {
    /// Distance in kilometers
    #[must_use]
    pub fn distance_km(&self) -> f64 {
        f64::from(self.distance_meters) / 1000.0
    }

    /// Duration in minutes
    #[must_use]
    pub fn duration_minutes(&self) -> f64 {
        f64::from(self.duration_seconds) / 60.0
    }
}

/// One destination of a distance matrix batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedDistanceResult {
    /// Store id, when the resolver recognised the destination
    pub location_id: Option<LocationId>,
    /// Store name, when the resolver recognised the destination
    pub location_name: Option<String>,
    /// Store category, when the resolver recognised the destination
    pub location_type: Option<LocationCategory>,
    /// Travel distance in kilometers
    pub distance_km: f64,
    /// Provider display text for the distance
    pub distance_text: String,
    /// Travel time in minutes
    pub travel_time_min: f64,
    /// Provider display text for the travel time
    pub travel_time_text: String,
    /// Mode the figures were computed for
    pub travel_mode: TravelMode,
}

/// Route figures for one commute mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    /// Route distance in kilometers
    pub distance_km: f64,
    /// Provider display text for the distance
    pub distance_text: String,
    /// Route duration in minutes
    pub duration_min: f64,
    /// Provider display text for the duration
    pub duration_text: String,
    /// Number of steps of the first leg
    pub steps: usize,
    /// Encoded overview polyline
    pub polyline: String,
}

impl From<TravelLeg> for RouteSummary {
    fn from(leg: TravelLeg) -> Self {
        Self {
            distance_km: leg.distance_km(),
            duration_min: leg.duration_minutes(),
            steps: leg.steps.unwrap_or_default(),
            polyline: leg.polyline.unwrap_or_default(),
            distance_text: leg.distance_text,
            duration_text: leg.duration_text,
        }
    }
}

/// All successful commute modes plus the fastest of them
///
/// `best_commute_mode` is always a key of `all_options`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommuteOptions {
    best_commute_mode: TravelMode,
    best_commute: RouteSummary,
    all_options: BTreeMap<TravelMode, RouteSummary>,
}

impl CommuteOptions {
    /// Build from the successful routes in configured mode order
    ///
    /// The best option is the minimum duration; on a tie the earlier mode
    /// wins. Returns `None` when `routes` is empty.
    #[must_use]
    pub fn from_routes(routes: Vec<(TravelMode, RouteSummary)>) -> Option<Self> {
        let (best_commute_mode, best_commute) =
            super::mode_selection::select_fastest(&routes, |route| route.duration_min)
                .map(|(mode, route)| (*mode, route.clone()))?;
        Some(Self {
            best_commute_mode,
            best_commute,
            all_options: routes.into_iter().collect(),
        })
    }

    /// The fastest mode
    #[must_use]
    pub const fn best_commute_mode(&self) -> TravelMode {
        self.best_commute_mode
    }

    /// The fastest route
    #[must_use]
    pub const fn best_commute(&self) -> &RouteSummary {
        &self.best_commute
    }

    /// Every successful mode
    #[must_use]
    pub const fn all_options(&self) -> &BTreeMap<TravelMode, RouteSummary> {
        &self.all_options
    }
}

/// Details of the place closest to a coordinate
///
/// Nested provider objects are passed through opaquely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceDetails {
    /// Provider `opening_hours` object
    pub opening_hours: Option<Value>,
    /// Flattened `opening_hours.open_now`
    pub is_open: Option<bool>,
    /// Average rating
    pub rating: Option<f64>,
    /// Provider review objects
    pub reviews: Option<Vec<Value>>,
    /// Formatted postal address
    pub formatted_address: Option<String>,
}

impl PlaceDetails {
    /// Whether no field carries data
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.opening_hours.is_none()
            && self.is_open.is_none()
            && self.rating.is_none()
            && self.reviews.is_none()
            && self.formatted_address.is_none()
    }
}
