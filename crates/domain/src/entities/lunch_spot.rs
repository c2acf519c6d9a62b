use serde::{Deserialize, Serialize};
use std::fmt;

use super::Cuisine;
use crate::EntityId;

/// A named establishment associated with exactly one resolved cuisine.
///
/// The cuisine field is optional only because callers hand this same shape
/// back as an update request; every `LunchSpot` RETURNED by the service
/// layer has its cuisine attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LunchSpot {
    pub id: EntityId,
    pub name: String,
    pub cuisine: Option<Cuisine>,
}

impl LunchSpot {
    /// Build an unsaved change-set value for [`LunchSpotService::update`].
    ///
    /// [`LunchSpotService::update`]: crate::services::LunchSpotService::update
    pub fn changes(name: impl Into<String>, cuisine: Option<Cuisine>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            cuisine,
        }
    }
}

impl fmt::Display for LunchSpot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.cuisine {
            Some(cuisine) => write!(f, "{} (#{}, {})", self.name, self.id, cuisine.name),
            None => write!(f, "{} (#{})", self.name, self.id),
        }
    }
}
