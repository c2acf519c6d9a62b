//! Storage port - the persistence contract the catalog services consume
//!
//! Implementations live in the infrastructure crate. The port deliberately
//! stays small: insert-with-id-assignment, save, one ambient transaction,
//! and collection scans in both eager (`Vec`) and lazy (`EntityStream`)
//! form. All lookups are built on scans plus the single-result rule; the
//! store never interprets names or enforces catalog invariants (the SQLite
//! backend's unique index is defense in depth, not part of the contract).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::CatalogResult;
use crate::sequence::EntityStream;
use crate::EntityId;

/// Persisted cuisine row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CuisineRow {
    /// Assigned by the store on insert; 0 on an unsaved row.
    pub id: EntityId,
    pub name: String,
}

/// Persisted lunch spot row. The foreign key is nullable at this level;
/// the service layer refuses to write an unresolved cuisine reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LunchSpotRow {
    pub id: EntityId,
    pub name: String,
    pub cuisine_id: Option<EntityId>,
}

/// Persistence abstraction for the two catalog collections.
///
/// One ambient transaction at a time: `begin` opens it, `commit`/`rollback`
/// close it. Writes outside a transaction are legal (the services always
/// open one around their check-then-write sequences).
#[async_trait]
pub trait CatalogStore: Send + Sync + 'static {
    async fn begin(&self) -> CatalogResult<()>;
    async fn commit(&self) -> CatalogResult<()>;
    async fn rollback(&self) -> CatalogResult<()>;

    /// Insert a cuisine row, assigning its id. Returns the stored row.
    async fn insert_cuisine(&self, row: CuisineRow) -> CatalogResult<CuisineRow>;

    /// Persist changes to an existing cuisine row, matched by id.
    async fn save_cuisine(&self, row: CuisineRow) -> CatalogResult<()>;

    /// Eagerly materialize every cuisine row.
    async fn cuisines(&self) -> CatalogResult<Vec<CuisineRow>>;

    /// Lazy scan over cuisine rows; nothing is read until first poll.
    fn cuisine_stream(&self) -> EntityStream<CuisineRow>;

    /// Insert a lunch spot row, assigning its id. Returns the stored row.
    async fn insert_lunch_spot(&self, row: LunchSpotRow) -> CatalogResult<LunchSpotRow>;

    /// Persist changes to an existing lunch spot row, matched by id.
    async fn save_lunch_spot(&self, row: LunchSpotRow) -> CatalogResult<()>;

    /// Eagerly materialize every lunch spot row.
    async fn lunch_spots(&self) -> CatalogResult<Vec<LunchSpotRow>>;

    /// Lazy scan over lunch spot rows.
    fn lunch_spot_stream(&self) -> EntityStream<LunchSpotRow>;
}
