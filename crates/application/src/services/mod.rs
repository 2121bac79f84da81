//! Application services - Use case implementations

pub mod enrichment;
mod location_catalog;

pub use enrichment::{
    AttractionResolver, CommuteOptions, DEFAULT_PLACE_DETAIL_FIELDS, Destination,
    DestinationIdentity, DestinationResolver, EnrichedDistanceResult, EnrichmentGateway,
    GatewayConfig, GatewayProfile, GenericLocationResolver, PlaceDetails, RouteSummary, TravelLeg,
};
pub use location_catalog::LocationCatalog;
