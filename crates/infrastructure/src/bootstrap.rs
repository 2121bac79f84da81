//! Wiring of adapters into the application services

use std::sync::Arc;

use application::{EnrichmentGateway, LocationCatalog};
use integration_maps::MapsError;
use thiserror::Error;
use tracing::info;

use crate::adapters::MapsProviderAdapter;
use crate::config::AppConfig;
use crate::persistence::{DatabaseError, SqliteLocationRepository, create_pool};

/// Startup failures
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Settings failed validation; carries every problem found
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The Google Maps client could not be built
    #[error("Maps client: {0}")]
    Maps(#[from] MapsError),

    /// The location database could not be opened or migrated
    #[error("Database: {0}")]
    Database(#[from] DatabaseError),
}

/// Enrichment gateway backed by the Google Maps client
///
/// # Errors
///
/// Fails if the maps settings are unusable. A missing API key is not a
/// failure; the gateway then returns empty results.
pub fn build_gateway(config: &AppConfig) -> Result<EnrichmentGateway, BootstrapError> {
    let adapter = MapsProviderAdapter::from_config(&config.maps.to_maps_config())?;
    let gateway = EnrichmentGateway::new(Arc::new(adapter), config.gateway.profile)
        .with_config(config.gateway.to_gateway_config());
    info!(
        profile = ?config.gateway.profile,
        max_concurrency = config.gateway.max_concurrency,
        "Enrichment gateway ready"
    );
    Ok(gateway)
}

/// SQLite-backed location repository
///
/// # Errors
///
/// Fails if the pool cannot be created or migrations fail.
pub fn build_location_repository(
    config: &AppConfig,
) -> Result<SqliteLocationRepository, BootstrapError> {
    let pool = create_pool(&config.database)?;
    Ok(SqliteLocationRepository::new(Arc::new(pool)))
}

/// Location catalog over the SQLite repository
///
/// # Errors
///
/// See [`build_location_repository`].
pub fn build_catalog(config: &AppConfig) -> Result<LocationCatalog, BootstrapError> {
    let repository = build_location_repository(config)?;
    Ok(LocationCatalog::new(Arc::new(repository)))
}

/// Validate the configuration and build both services
///
/// # Errors
///
/// Returns [`BootstrapError::Config`] for out-of-range settings, otherwise
/// the first construction failure.
pub fn build_services(
    config: &AppConfig,
) -> Result<(EnrichmentGateway, LocationCatalog), BootstrapError> {
    config.validate().map_err(BootstrapError::Config)?;
    Ok((build_gateway(config)?, build_catalog(config)?))
}
