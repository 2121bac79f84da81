//! Location repository port
//!
//! The data store that owns points of interest. The enrichment core only
//! reads from it and forwards creation requests.

use async_trait::async_trait;
use domain::{GeoLocation, LocationCategory, NewLocation, StoredLocation};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for stored points of interest
#[cfg_attr(test, automock)]
#[async_trait]
pub trait LocationRepository: Send + Sync {
    /// List every stored location, or only those of one category
    async fn list_all(
        &self,
        category: Option<LocationCategory>,
    ) -> Result<Vec<StoredLocation>, ApplicationError>;

    /// Persist a new location and return it with its assigned id
    async fn create(&self, location: &NewLocation) -> Result<StoredLocation, ApplicationError>;

    /// Locations of the given categories within `radius_km` of `center`
    async fn filter_by(
        &self,
        categories: &[LocationCategory],
        center: &GeoLocation,
        radius_km: f64,
    ) -> Result<Vec<StoredLocation>, ApplicationError>;
}
