//! Persistence module
//!
//! SQLite storage for points of interest.

pub mod connection;
pub mod location_repository;
pub mod migrations;

pub use connection::{ConnectionPool, DatabaseError, MEMORY_PATH, create_pool};
pub use location_repository::SqliteLocationRepository;
