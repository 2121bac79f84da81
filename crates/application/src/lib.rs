//! Application layer - Use cases and orchestration
//!
//! Contains the enrichment gateway, the location catalog and the port
//! definitions that infrastructure adapters implement.

pub mod error;
pub mod ports;
pub mod services;

pub use error::{ApplicationError, EnrichmentFailure};
pub use ports::*;
pub use services::*;
