//! Location category value object
//!
//! Points of interest are grouped into four themed categories plus a
//! generic `Location` bucket that carries its own free-text tag.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category a stored point of interest belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocationCategory {
    /// Notable buildings and structures
    Architecture,
    /// Film and TV locations
    Films,
    /// Historic sites
    History,
    /// Music venues and landmarks
    Music,
    /// Generic location with a free-text category tag
    Location,
}

impl LocationCategory {
    /// The themed categories, in listing order
    pub const ATTRACTIONS: [Self; 4] = [Self::Architecture, Self::Films, Self::History, Self::Music];

    /// Every category, in listing order
    pub const ALL: [Self; 5] = [
        Self::Architecture,
        Self::Films,
        Self::History,
        Self::Music,
        Self::Location,
    ];

    /// Type name as exposed to API consumers and stored in the database
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Architecture => "Architecture",
            Self::Films => "Films",
            Self::History => "History",
            Self::Music => "Music",
            Self::Location => "Location",
        }
    }

    /// Whether this is one of the themed attraction categories
    #[must_use]
    pub const fn is_attraction(&self) -> bool {
        !matches!(self, Self::Location)
    }
}

impl fmt::Display for LocationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LocationCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "architecture" => Ok(Self::Architecture),
            "films" | "film" => Ok(Self::Films),
            "history" => Ok(Self::History),
            "music" => Ok(Self::Music),
            "location" => Ok(Self::Location),
            _ => Err(format!("Invalid location category: {s}")),
        }
    }
}
