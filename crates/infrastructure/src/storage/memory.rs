use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use domain::{
    CatalogError, CatalogResult, CatalogStore, CuisineRow, EntityStream, LunchSpotRow,
};

/// In-memory catalog store.
///
/// The counterpart of a relational in-memory test provider: ids are
/// assigned from per-collection counters and the ambient transaction is a
/// full snapshot of both collections - `begin` captures it, `rollback`
/// restores it, `commit` discards it. The case-insensitive uniqueness of
/// cuisine names is NOT enforced here; that is the service layer's
/// check-then-act sequence (and its documented race window).
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Default)]
struct Inner {
    cuisines: Vec<CuisineRow>,
    lunch_spots: Vec<LunchSpotRow>,
    next_cuisine_id: i32,
    next_spot_id: i32,
    snapshot: Option<Snapshot>,
}

struct Snapshot {
    cuisines: Vec<CuisineRow>,
    lunch_spots: Vec<LunchSpotRow>,
    next_cuisine_id: i32,
    next_spot_id: i32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn begin(&self) -> CatalogResult<()> {
        let mut inner = self.inner.write().await;
        if inner.snapshot.is_some() {
            return Err(CatalogError::storage("transaction already open"));
        }
        let snapshot = Snapshot {
            cuisines: inner.cuisines.clone(),
            lunch_spots: inner.lunch_spots.clone(),
            next_cuisine_id: inner.next_cuisine_id,
            next_spot_id: inner.next_spot_id,
        };
        inner.snapshot = Some(snapshot);
        Ok(())
    }

    async fn commit(&self) -> CatalogResult<()> {
        let mut inner = self.inner.write().await;
        if inner.snapshot.take().is_none() {
            return Err(CatalogError::storage("no open transaction to commit"));
        }
        Ok(())
    }

    async fn rollback(&self) -> CatalogResult<()> {
        let mut inner = self.inner.write().await;
        match inner.snapshot.take() {
            Some(snapshot) => {
                debug!("rolling back in-memory transaction");
                inner.cuisines = snapshot.cuisines;
                inner.lunch_spots = snapshot.lunch_spots;
                inner.next_cuisine_id = snapshot.next_cuisine_id;
                inner.next_spot_id = snapshot.next_spot_id;
                Ok(())
            }
            None => Err(CatalogError::storage("no open transaction to roll back")),
        }
    }

    async fn insert_cuisine(&self, mut row: CuisineRow) -> CatalogResult<CuisineRow> {
        let mut inner = self.inner.write().await;
        inner.next_cuisine_id += 1;
        row.id = inner.next_cuisine_id;
        inner.cuisines.push(row.clone());
        Ok(row)
    }

    async fn save_cuisine(&self, row: CuisineRow) -> CatalogResult<()> {
        let mut inner = self.inner.write().await;
        match inner.cuisines.iter_mut().find(|r| r.id == row.id) {
            Some(existing) => {
                *existing = row;
                Ok(())
            }
            None => Err(CatalogError::storage(format!(
                "cannot save cuisine row #{}: not stored",
                row.id
            ))),
        }
    }

    async fn cuisines(&self) -> CatalogResult<Vec<CuisineRow>> {
        Ok(self.inner.read().await.cuisines.clone())
    }

    fn cuisine_stream(&self) -> EntityStream<CuisineRow> {
        let inner = Arc::clone(&self.inner);
        EntityStream::deferred(async move { Ok(inner.read().await.cuisines.clone()) })
    }

    async fn insert_lunch_spot(&self, mut row: LunchSpotRow) -> CatalogResult<LunchSpotRow> {
        let mut inner = self.inner.write().await;
        inner.next_spot_id += 1;
        row.id = inner.next_spot_id;
        inner.lunch_spots.push(row.clone());
        Ok(row)
    }

    async fn save_lunch_spot(&self, row: LunchSpotRow) -> CatalogResult<()> {
        let mut inner = self.inner.write().await;
        match inner.lunch_spots.iter_mut().find(|r| r.id == row.id) {
            Some(existing) => {
                *existing = row;
                Ok(())
            }
            None => Err(CatalogError::storage(format!(
                "cannot save lunch spot row #{}: not stored",
                row.id
            ))),
        }
    }

    async fn lunch_spots(&self) -> CatalogResult<Vec<LunchSpotRow>> {
        Ok(self.inner.read().await.lunch_spots.clone())
    }

    fn lunch_spot_stream(&self) -> EntityStream<LunchSpotRow> {
        let inner = Arc::clone(&self.inner);
        EntityStream::deferred(async move { Ok(inner.read().await.lunch_spots.clone()) })
    }
}
