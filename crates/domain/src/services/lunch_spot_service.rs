use std::sync::Arc;

use tracing::debug;

use crate::entities::{Cuisine, LunchSpot};
use crate::errors::{CatalogError, CatalogResult};
use crate::sequence::{single_match_or, EntityStream};
use crate::store::{CatalogStore, LunchSpotRow};
use crate::strings;
use crate::EntityId;

use super::CuisineService;

/// Owns the lunch spot lifecycle. Every write first resolves the cuisine
/// reference by name through [`CuisineService`]; an unresolvable reference
/// is a hard failure, never a persisted null foreign key.
pub struct LunchSpotService<S: CatalogStore> {
    cuisines: CuisineService<S>,
    store: Arc<S>,
}

impl<S: CatalogStore> LunchSpotService<S> {
    pub fn new(cuisines: CuisineService<S>, store: Arc<S>) -> Self {
        Self { cuisines, store }
    }

    /// Create a lunch spot under an existing cuisine.
    ///
    /// The cuisine reference is resolved by case-insensitive exact name; an
    /// absent reference resolves to "no name to match" and fails the same
    /// way. The returned entity carries the full resolved cuisine so
    /// callers never need a follow-up lookup.
    pub async fn create(
        &self,
        name: &str,
        cuisine_ref: Option<&Cuisine>,
    ) -> CatalogResult<LunchSpot> {
        let cuisine = self.resolve_cuisine(cuisine_ref).await?;

        self.store.begin().await?;
        match self.insert_spot(name, &cuisine).await {
            Ok(spot) => {
                self.store.commit().await?;
                Ok(spot)
            }
            Err(e) => {
                let _ = self.store.rollback().await;
                Err(e)
            }
        }
    }

    async fn insert_spot(&self, name: &str, cuisine: &Cuisine) -> CatalogResult<LunchSpot> {
        let row = self
            .store
            .insert_lunch_spot(LunchSpotRow {
                id: 0,
                name: strings::title_case(name),
                cuisine_id: Some(cuisine.id),
            })
            .await?;
        debug!("created lunch spot '{}' as #{}", row.name, row.id);
        Ok(LunchSpot {
            id: row.id,
            name: row.name,
            cuisine: Some(cuisine.clone()),
        })
    }

    async fn resolve_cuisine(&self, cuisine_ref: Option<&Cuisine>) -> CatalogResult<Cuisine> {
        match cuisine_ref {
            Some(cuisine) => self.cuisines.resolve_by_name(&cuisine.name).await,
            None => Err(CatalogError::CuisineNotFound),
        }
    }

    /// Fetch a lunch spot by id with its cuisine attached.
    pub async fn get_by_id(&self, id: EntityId) -> CatalogResult<LunchSpot> {
        let row = single_match_or(
            self.store.lunch_spot_stream(),
            move |row| row.id == id,
            CatalogError::LunchSpotNotFound,
        )
        .await?;
        self.attach_cuisine(row).await
    }

    async fn attach_cuisine(&self, row: LunchSpotRow) -> CatalogResult<LunchSpot> {
        let cuisine = match row.cuisine_id {
            Some(fk) => Some(self.cuisines.get_by_id(fk).await?),
            None => None,
        };
        Ok(LunchSpot {
            id: row.id,
            name: row.name,
            cuisine,
        })
    }

    /// Update a lunch spot's name and cuisine association.
    ///
    /// The name is normalized and applied unconditionally, and the cuisine
    /// is re-resolved from `changes.cuisine` exactly as in [`Self::create`]
    /// - an update always requires a valid cuisine name, even when only the
    /// spot's name is changing.
    pub async fn update(&self, id: EntityId, changes: &LunchSpot) -> CatalogResult<LunchSpot> {
        let row = single_match_or(
            self.store.lunch_spot_stream(),
            move |row| row.id == id,
            CatalogError::LunchSpotNotFound,
        )
        .await?;

        self.store.begin().await?;
        match self.apply_update(row, changes).await {
            Ok(spot) => {
                self.store.commit().await?;
                Ok(spot)
            }
            Err(e) => {
                let _ = self.store.rollback().await;
                Err(e)
            }
        }
    }

    async fn apply_update(
        &self,
        mut row: LunchSpotRow,
        changes: &LunchSpot,
    ) -> CatalogResult<LunchSpot> {
        let cuisine = self.resolve_cuisine(changes.cuisine.as_ref()).await?;

        row.name = strings::title_case(&changes.name);
        row.cuisine_id = Some(cuisine.id);
        self.store.save_lunch_spot(row.clone()).await?;
        debug!("updated lunch spot #{} to '{}'", row.id, row.name);
        Ok(LunchSpot {
            id: row.id,
            name: row.name,
            cuisine: Some(cuisine),
        })
    }

    /// Every lunch spot with its cuisine attached, as a lazy restartable
    /// stream. The cuisine set is materialized once per evaluation and the
    /// spots are joined against it.
    pub fn list(&self) -> EntityStream<LunchSpot> {
        let store = Arc::clone(&self.store);
        EntityStream::deferred(async move {
            let cuisines = store.cuisines().await?;
            let rows = store.lunch_spots().await?;
            Ok(rows
                .into_iter()
                .map(|row| {
                    let cuisine = row
                        .cuisine_id
                        .and_then(|fk| cuisines.iter().find(|c| c.id == fk))
                        .cloned()
                        .map(Cuisine::from);
                    LunchSpot {
                        id: row.id,
                        name: row.name,
                        cuisine,
                    }
                })
                .collect())
        })
    }

    /// Lunch spots matching a caller-supplied predicate over name and/or
    /// cuisine name.
    pub fn list_filtered<F>(&self, predicate: F) -> EntityStream<LunchSpot>
    where
        F: FnMut(&LunchSpot) -> bool + Send + 'static,
    {
        self.list().filter(predicate)
    }
}
