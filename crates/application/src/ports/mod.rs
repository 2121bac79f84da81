//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod diagnostics_port;
mod location_repository;
mod maps_provider_port;

pub use diagnostics_port::{Diagnostic, DiagnosticsPort, Severity, TracingDiagnostics};
#[cfg(test)]
pub use location_repository::MockLocationRepository;
pub use location_repository::LocationRepository;
#[cfg(test)]
pub use maps_provider_port::MockMapsProviderPort;
pub use maps_provider_port::{EndpointKind, MapsProviderPort, ProviderRequest};
