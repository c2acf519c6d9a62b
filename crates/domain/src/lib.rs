//! Domain Layer - Lunch Roulette catalog business logic
//!
//! Contains ONLY the catalog consistency rules, independent of:
//! - Storage engines (SQLite, in-memory) - those implement [`CatalogStore`]
//! - Caller surfaces (CLI, HTTP) - those consume the services
//!
//! Layout:
//! - Entities: `Cuisine` and `LunchSpot` as the caller sees them
//! - Storage port: the `CatalogStore` contract plus the persisted row shapes
//! - Sequence: the `EntityStream` abstraction and the single-result rule
//! - Services: `CuisineService` and `LunchSpotService` lifecycles

pub mod entities;
pub mod errors;
pub mod sequence;
pub mod services;
pub mod store;
pub mod strings;

// Re-export core domain types
pub use entities::{Cuisine, LunchSpot};
pub use errors::{CatalogError, CatalogResult};
pub use sequence::{single_match_or, single_or, EntityStream};
pub use services::{CuisineService, LunchSpotService};
pub use store::{CatalogStore, CuisineRow, LunchSpotRow};

/// Identifier type assigned by the store on insert.
pub type EntityId = i32;
