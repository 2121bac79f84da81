//! Geo-enrichment over the mapping provider
//!
//! Leaves first: [`mode_selection`] and [`normalizer`] are pure, the
//! [`gateway`] drives the provider port and combines them.

pub mod gateway;
pub mod isolation;
pub mod mode_selection;
pub mod normalizer;
pub mod records;
pub mod resolver;

pub use gateway::{
    DEFAULT_PLACE_DETAIL_FIELDS, EnrichmentGateway, GatewayConfig, GatewayProfile,
};
pub use records::{CommuteOptions, EnrichedDistanceResult, PlaceDetails, RouteSummary, TravelLeg};
pub use resolver::{
    AttractionResolver, Destination, DestinationIdentity, DestinationResolver,
    GenericLocationResolver,
};
