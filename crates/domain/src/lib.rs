//! Domain layer for Wayfarer
//!
//! Contains the points-of-interest entities, the geographic value objects
//! and the domain errors. This layer has no I/O and defines the ubiquitous
//! language shared by the enrichment gateway and the location catalog.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
