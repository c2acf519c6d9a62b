use std::sync::Arc;

use tracing::{debug, warn};

use crate::entities::Cuisine;
use crate::errors::{CatalogError, CatalogResult};
use crate::sequence::{single_match_or, EntityStream};
use crate::store::{CatalogStore, CuisineRow};
use crate::strings;
use crate::EntityId;

/// Owns the cuisine lifecycle: idempotent creation, rename with the
/// uniqueness check, lookup and filtered listing.
pub struct CuisineService<S: CatalogStore> {
    store: Arc<S>,
}

impl<S: CatalogStore> Clone for CuisineService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: CatalogStore> CuisineService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Ensure a cuisine with this name exists, creating it if necessary.
    ///
    /// The name lookup is case-insensitive; on a hit the existing cuisine
    /// is returned unchanged and no write happens, so calling this twice
    /// with names differing only in case yields the same id both times.
    /// The check-then-insert sequence runs inside one ambient transaction;
    /// any failure rolls back before propagating.
    pub async fn create(&self, name: &str) -> CatalogResult<Cuisine> {
        self.store.begin().await?;
        match self.create_or_get(name).await {
            Ok(cuisine) => {
                self.store.commit().await?;
                Ok(cuisine)
            }
            Err(e) => {
                let _ = self.store.rollback().await;
                Err(e)
            }
        }
    }

    async fn create_or_get(&self, name: &str) -> CatalogResult<Cuisine> {
        let wanted = name.to_string();
        let mut matches = self
            .store
            .cuisine_stream()
            .filter(move |row| strings::eq_ignore_case(&row.name, &wanted));
        if let Some(row) = matches.next().await {
            let row = row?;
            debug!("cuisine '{}' already exists as #{}", row.name, row.id);
            return Ok(row.into());
        }

        let row = self
            .store
            .insert_cuisine(CuisineRow {
                id: 0,
                name: strings::title_case(name),
            })
            .await?;
        debug!("created cuisine '{}' as #{}", row.name, row.id);
        Ok(row.into())
    }

    /// Fetch a cuisine by id.
    pub async fn get_by_id(&self, id: EntityId) -> CatalogResult<Cuisine> {
        let row = single_match_or(
            self.store.cuisine_stream(),
            move |row| row.id == id,
            CatalogError::CuisineNotFound,
        )
        .await?;
        Ok(row.into())
    }

    /// Resolve a cuisine by case-insensitive exact name.
    ///
    /// The shared resolution path for lunch spot creation and update. Zero
    /// matches fail; so would more than one, though the uniqueness
    /// invariant keeps that from arising.
    pub async fn resolve_by_name(&self, name: &str) -> CatalogResult<Cuisine> {
        let wanted = name.to_string();
        let row = single_match_or(
            self.store.cuisine_stream(),
            move |row| strings::eq_ignore_case(&row.name, &wanted),
            CatalogError::CuisineNotFound,
        )
        .await?;
        Ok(row.into())
    }

    /// Every cuisine, as a lazy restartable stream.
    pub fn list(&self) -> EntityStream<Cuisine> {
        self.store.cuisine_stream().map(Cuisine::from)
    }

    /// Cuisines matching a caller-supplied predicate.
    pub fn list_filtered<F>(&self, predicate: F) -> EntityStream<Cuisine>
    where
        F: FnMut(&Cuisine) -> bool + Send + 'static,
    {
        self.list().filter(predicate)
    }

    /// Rename a cuisine, enforcing case-insensitive uniqueness.
    ///
    /// The collision scan compares the new name against every cuisine row,
    /// the target included, so renaming a cuisine to its own current name
    /// is rejected as a conflict. Deliberately kept: existing callers rely
    /// on "a rename must change something".
    pub async fn rename(&self, id: EntityId, new_name: &str) -> CatalogResult<Cuisine> {
        let target = single_match_or(
            self.store.cuisine_stream(),
            move |row| row.id == id,
            CatalogError::CuisineNotFound,
        )
        .await?;

        self.store.begin().await?;
        match self.rename_checked(target, new_name).await {
            Ok(cuisine) => {
                self.store.commit().await?;
                Ok(cuisine)
            }
            Err(e) => {
                let _ = self.store.rollback().await;
                Err(e)
            }
        }
    }

    async fn rename_checked(&self, mut target: CuisineRow, new_name: &str) -> CatalogResult<Cuisine> {
        let clash = self
            .store
            .cuisines()
            .await?
            .iter()
            .any(|row| strings::eq_ignore_case(&row.name, new_name));
        if clash {
            warn!("rename of cuisine #{} to '{}' collides", target.id, new_name);
            return Err(CatalogError::CuisineNameConflict {
                name: new_name.to_string(),
            });
        }

        target.name = new_name.to_string();
        self.store.save_cuisine(target.clone()).await?;
        debug!("renamed cuisine #{} to '{}'", target.id, target.name);
        Ok(target.into())
    }
}
