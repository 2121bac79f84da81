//! Infrastructure layer for Wayfarer
//!
//! Google Maps adapter, SQLite location store, configuration loading,
//! telemetry setup and the wiring that assembles the application services.

pub mod adapters;
pub mod bootstrap;
pub mod config;
pub mod persistence;
pub mod telemetry;

pub use adapters::MapsProviderAdapter;
pub use bootstrap::{
    BootstrapError, build_catalog, build_gateway, build_location_repository, build_services,
};
pub use config::{AppConfig, DatabaseConfig, GatewayAppConfig, MapsAppConfig};
pub use persistence::{ConnectionPool, DatabaseError, SqliteLocationRepository, create_pool};
pub use telemetry::{TelemetryConfig, TelemetryError, TelemetryGuard, init_telemetry};
