//! Location identifier value object

use std::fmt;

use serde::{Deserialize, Serialize};

/// Store-assigned identifier of a point of interest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationId(i64);

impl LocationId {
    /// Wrap a raw store identifier
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the raw identifier
    pub const fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for LocationId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}
