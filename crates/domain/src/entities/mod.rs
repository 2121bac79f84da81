//! Entities - Domain objects with identity

mod stored_location;

pub use stored_location::{MAX_NAME_LEN, NewLocation, StoredLocation};
