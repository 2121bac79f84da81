//! Stored location entity
//!
//! A point of interest as persisted by the location store: a name, a
//! coordinate and a short fact, filed under one category.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::DomainError;
use crate::value_objects::{GeoLocation, LocationCategory, LocationId};

/// Maximum length of a location name in characters
pub const MAX_NAME_LEN: usize = 255;

/// A persisted point of interest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredLocation {
    id: LocationId,
    category: LocationCategory,
    name: String,
    coordinate: GeoLocation,
    fact: String,
    /// Free-text tag, only meaningful for the generic `Location` category
    category_tag: Option<String>,
    created_at: DateTime<Utc>,
}

impl StoredLocation {
    /// Restore a location from storage
    #[must_use]
    pub const fn restore(
        id: LocationId,
        category: LocationCategory,
        name: String,
        coordinate: GeoLocation,
        fact: String,
        category_tag: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            category,
            name,
            coordinate,
            fact,
            category_tag,
            created_at,
        }
    }

    /// Get the store identifier
    #[must_use]
    pub const fn id(&self) -> LocationId {
        self.id
    }

    /// Get the category
    #[must_use]
    pub const fn category(&self) -> LocationCategory {
        self.category
    }

    /// Get the display name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the coordinate
    #[must_use]
    pub const fn coordinate(&self) -> GeoLocation {
        self.coordinate
    }

    /// Get the fact / description
    #[must_use]
    pub fn fact(&self) -> &str {
        &self.fact
    }

    /// Get the free-text category tag of a generic location
    #[must_use]
    pub fn category_tag(&self) -> Option<&str> {
        self.category_tag.as_deref()
    }

    /// Get the creation timestamp
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl fmt::Display for StoredLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.name, self.fact)
    }
}

/// A creation request for a new point of interest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLocation {
    /// Category to file the location under
    pub category: LocationCategory,
    /// Display name
    pub name: String,
    /// Position
    pub coordinate: GeoLocation,
    /// Fact or description shown alongside the name
    pub fact: String,
    /// Free-text tag for generic locations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_tag: Option<String>,
}

impl NewLocation {
    /// Create a new location request
    #[must_use]
    pub fn new(
        category: LocationCategory,
        name: impl Into<String>,
        coordinate: GeoLocation,
        fact: impl Into<String>,
    ) -> Self {
        Self {
            category,
            name: name.into(),
            coordinate,
            fact: fact.into(),
            category_tag: None,
        }
    }

    /// Attach a free-text category tag
    #[must_use]
    pub fn with_category_tag(mut self, tag: impl Into<String>) -> Self {
        self.category_tag = Some(tag.into());
        self
    }

    /// Validate the request before it reaches the store
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for an empty or overlong name, or a
    /// category tag on one of the themed categories.
    pub fn validate(&self) -> Result<(), DomainError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(DomainError::ValidationError(
                "name must not be empty".to_string(),
            ));
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(DomainError::ValidationError(format!(
                "name must be at most {MAX_NAME_LEN} characters"
            )));
        }
        if self.category.is_attraction() && self.category_tag.is_some() {
            return Err(DomainError::ValidationError(format!(
                "category tag is only allowed for generic locations, not {}",
                self.category
            )));
        }
        Ok(())
    }
}
