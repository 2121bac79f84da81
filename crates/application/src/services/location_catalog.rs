//! Location catalog service
//!
//! Use cases over the location store: listing, creating and radius search,
//! plus the "near me" view that runs the distance matrix over the hits.

use std::sync::Arc;

use domain::{GeoLocation, LocationCategory, NewLocation, StoredLocation};
use tracing::{debug, error, info, instrument};

use super::enrichment::{Destination, EnrichedDistanceResult, EnrichmentGateway};
use crate::error::ApplicationError;
use crate::ports::LocationRepository;

/// Catalog of stored points of interest
pub struct LocationCatalog {
    repository: Arc<dyn LocationRepository>,
}

impl std::fmt::Debug for LocationCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationCatalog").finish_non_exhaustive()
    }
}

impl LocationCatalog {
    /// Create a catalog over a repository
    #[must_use]
    pub fn new(repository: Arc<dyn LocationRepository>) -> Self {
        Self { repository }
    }

    /// List every location, or only one category
    ///
    /// # Errors
    ///
    /// Propagates repository failures.
    #[instrument(skip(self))]
    pub async fn list_locations(
        &self,
        category: Option<LocationCategory>,
    ) -> Result<Vec<StoredLocation>, ApplicationError> {
        let locations = self.repository.list_all(category).await?;
        info!(
            count = locations.len(),
            category = category.map_or("all", |c| c.as_str()),
            "Retrieved locations"
        );
        Ok(locations)
    }

    /// Validate and store a new location
    ///
    /// # Errors
    ///
    /// Returns a domain validation error for a bad name or tag, or the
    /// repository's error if the insert fails.
    #[instrument(skip(self, location), fields(category = %location.category, name = %location.name))]
    pub async fn create_location(
        &self,
        location: NewLocation,
    ) -> Result<StoredLocation, ApplicationError> {
        let result = match location.validate() {
            Ok(()) => self.repository.create(&location).await,
            Err(e) => Err(e.into()),
        };
        match &result {
            Ok(stored) => info!(id = %stored.id(), "Location created"),
            Err(e) => error!(error = %e, "Failed to create location"),
        }
        result
    }

    /// Locations of the given categories within `radius_km` of `center`
    ///
    /// # Errors
    ///
    /// Propagates repository failures.
    #[instrument(skip(self, categories), fields(categories = categories.len()))]
    pub async fn find_nearby(
        &self,
        categories: &[LocationCategory],
        center: GeoLocation,
        radius_km: f64,
    ) -> Result<Vec<StoredLocation>, ApplicationError> {
        let hits = self.repository.filter_by(categories, &center, radius_km).await?;
        debug!(hits = hits.len(), "Radius search complete");
        Ok(hits)
    }

    /// Radius search followed by the distance matrix from `origin`
    ///
    /// # Errors
    ///
    /// Only the repository lookup can fail; enrichment problems shrink the
    /// result instead.
    pub async fn nearby_with_distances(
        &self,
        gateway: &EnrichmentGateway,
        origin: GeoLocation,
        categories: &[LocationCategory],
        radius_km: f64,
    ) -> Result<Vec<EnrichedDistanceResult>, ApplicationError> {
        let destinations: Vec<Destination> = self
            .find_nearby(categories, origin, radius_km)
            .await?
            .into_iter()
            .map(Destination::from)
            .collect();
        if destinations.is_empty() {
            return Ok(Vec::new());
        }
        Ok(gateway
            .get_distance_matrix(origin.latitude(), origin.longitude(), &destinations)
            .await)
    }
}
