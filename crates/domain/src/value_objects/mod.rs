//! Value Objects - Immutable, identity-less domain primitives

mod geo_location;
mod location_category;
mod location_id;
mod travel_mode;

pub use geo_location::{BoundingBox, GeoLocation, InvalidCoordinates};
pub use location_category::LocationCategory;
pub use location_id::LocationId;
pub use travel_mode::TravelMode;
