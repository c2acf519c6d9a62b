use serde::{Deserialize, Serialize};
use std::fmt;

use crate::store::CuisineRow;
use crate::EntityId;

/// A named category attached to zero or more lunch spots.
///
/// Unique by case-insensitive name; the id is assigned by the store on
/// creation and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cuisine {
    pub id: EntityId,
    pub name: String,
}

impl Cuisine {
    /// Build an unsaved reference value carrying only a name.
    ///
    /// This is how callers refer to a cuisine when creating or updating a
    /// lunch spot: the services resolve the reference by name and ignore
    /// the placeholder id.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
        }
    }
}

impl From<CuisineRow> for Cuisine {
    fn from(row: CuisineRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
        }
    }
}

impl fmt::Display for Cuisine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (#{})", self.name, self.id)
    }
}
