//! Destination identity resolution
//!
//! The gateway treats every destination the same way; a resolver decides
//! which of them carry store identity in the output.

use domain::{GeoLocation, LocationCategory, LocationId, StoredLocation};

/// A distance matrix destination
#[derive(Debug, Clone, PartialEq)]
pub enum Destination {
    /// A location from the store
    Stored(StoredLocation),
    /// A bare coordinate with no identity
    Point(GeoLocation),
}

impl Destination {
    /// Coordinate sent to the provider
    #[must_use]
    pub const fn coordinate(&self) -> GeoLocation {
        match self {
            Self::Stored(location) => location.coordinate(),
            Self::Point(point) => *point,
        }
    }

    /// Name used in diagnostics
    #[must_use]
    pub fn display_name(&self) -> String {
        match self {
            Self::Stored(location) => location.name().to_string(),
            Self::Point(point) => point.to_query_value(),
        }
    }
}

impl From<StoredLocation> for Destination {
    fn from(location: StoredLocation) -> Self {
        Self::Stored(location)
    }
}

impl From<GeoLocation> for Destination {
    fn from(point: GeoLocation) -> Self {
        Self::Point(point)
    }
}

impl From<(f64, f64)> for Destination {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self::Point(GeoLocation::new_unchecked(latitude, longitude))
    }
}

/// Identity fields copied into an enriched result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationIdentity {
    /// Store id
    pub id: LocationId,
    /// Store name
    pub name: String,
    /// Store category
    pub category: LocationCategory,
}

impl DestinationIdentity {
    fn of(location: &StoredLocation) -> Self {
        Self {
            id: location.id(),
            name: location.name().to_string(),
            category: location.category(),
        }
    }
}

/// Decides which destinations report store identity
pub trait DestinationResolver: Send + Sync {
    /// Identity of `destination`, or `None` to leave the fields empty
    fn identify(&self, destination: &Destination) -> Option<DestinationIdentity>;
}

/// Identifies the four attraction categories
#[derive(Debug, Clone, Copy, Default)]
pub struct AttractionResolver;

impl DestinationResolver for AttractionResolver {
    fn identify(&self, destination: &Destination) -> Option<DestinationIdentity> {
        match destination {
            Destination::Stored(location) if location.category().is_attraction() => {
                Some(DestinationIdentity::of(location))
            },
            _ => None,
        }
    }
}

/// Identifies generic locations only
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericLocationResolver;

impl DestinationResolver for GenericLocationResolver {
    fn identify(&self, destination: &Destination) -> Option<DestinationIdentity> {
        match destination {
            Destination::Stored(location) if location.category() == LocationCategory::Location => {
                Some(DestinationIdentity::of(location))
            },
            _ => None,
        }
    }
}
