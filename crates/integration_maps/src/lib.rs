//! Google Maps web service integration for Wayfarer
//!
//! Thin HTTP client over the distance matrix, nearby search, place details
//! and directions endpoints. [`MapsClient`] defines the interface and
//! [`GoogleMapsClient`] implements it with `reqwest`.
//!
//! The client only transports: it attaches the API key, enforces the
//! timeout, checks the HTTP and provider status and hands back the parsed
//! JSON body. Interpreting the body is left to the caller.
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_maps::{GoogleMapsClient, MapsClient, MapsConfig, MapsEndpoint};
//!
//! let config = MapsConfig::default().with_api_key("my-key");
//! let client = GoogleMapsClient::new(&config)?;
//!
//! let body = client
//!     .query(
//!         MapsEndpoint::DistanceMatrix,
//!         &[
//!             ("origins", "53.3498,-6.2603".to_string()),
//!             ("destinations", "53.3438,-6.2546".to_string()),
//!             ("mode", "walking".to_string()),
//!         ],
//!     )
//!     .await?;
//! ```

mod client;
mod config;
mod error;
mod models;

pub use client::{GoogleMapsClient, MapsClient};
pub use config::MapsConfig;
pub use error::MapsError;
pub use models::{MapsEndpoint, ProviderEnvelope, STATUS_OK};
