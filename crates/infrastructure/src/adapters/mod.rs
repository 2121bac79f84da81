//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod maps_provider_adapter;

pub use maps_provider_adapter::MapsProviderAdapter;
