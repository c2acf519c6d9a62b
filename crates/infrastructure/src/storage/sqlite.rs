use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use rusqlite::{params, Connection};
use tokio::sync::Mutex;
use tracing::{debug, info};

use domain::{
    CatalogError, CatalogResult, CatalogStore, CuisineRow, EntityStream, LunchSpotRow,
};

/// SQLite catalog store.
///
/// The persistent relational backend. Unlike the in-memory store, the
/// case-insensitive uniqueness of cuisine names is also enforced here by a
/// unique index over `lower(name)`, which closes the service layer's
/// check-then-act race for this backend: a concurrent duplicate insert
/// fails at the index instead of slipping through.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS cuisines (
        id   INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS lunch_spots (
        id         INTEGER PRIMARY KEY AUTOINCREMENT,
        name       TEXT NOT NULL,
        cuisine_id INTEGER REFERENCES cuisines(id)
    );

    CREATE UNIQUE INDEX IF NOT EXISTS cuisines_name_ci ON cuisines(lower(name));
"#;

impl SqliteStore {
    /// Open (or create) a catalog database at the given path.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
        }
        let conn = Connection::open(path.as_ref()).context("failed to open catalog database")?;
        info!("opened catalog database at {}", path.as_ref().display());
        Self::with_connection(conn)
    }

    /// Throwaway database for tests and dry runs.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)
            .context("failed to apply catalog schema")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

fn scan_cuisines(conn: &Connection) -> CatalogResult<Vec<CuisineRow>> {
    let mut stmt = conn
        .prepare("SELECT id, name FROM cuisines ORDER BY id")
        .map_err(CatalogError::storage)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(CuisineRow {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })
        .map_err(CatalogError::storage)?;
    rows.collect::<std::result::Result<Vec<_>, _>>()
        .map_err(CatalogError::storage)
}

fn scan_lunch_spots(conn: &Connection) -> CatalogResult<Vec<LunchSpotRow>> {
    let mut stmt = conn
        .prepare("SELECT id, name, cuisine_id FROM lunch_spots ORDER BY id")
        .map_err(CatalogError::storage)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(LunchSpotRow {
                id: row.get(0)?,
                name: row.get(1)?,
                cuisine_id: row.get(2)?,
            })
        })
        .map_err(CatalogError::storage)?;
    rows.collect::<std::result::Result<Vec<_>, _>>()
        .map_err(CatalogError::storage)
}

#[async_trait]
impl CatalogStore for SqliteStore {
    async fn begin(&self) -> CatalogResult<()> {
        let conn = self.conn.lock().await;
        conn.execute_batch("BEGIN IMMEDIATE")
            .map_err(CatalogError::storage)
    }

    async fn commit(&self) -> CatalogResult<()> {
        let conn = self.conn.lock().await;
        conn.execute_batch("COMMIT").map_err(CatalogError::storage)
    }

    async fn rollback(&self) -> CatalogResult<()> {
        debug!("rolling back catalog transaction");
        let conn = self.conn.lock().await;
        conn.execute_batch("ROLLBACK")
            .map_err(CatalogError::storage)
    }

    async fn insert_cuisine(&self, mut row: CuisineRow) -> CatalogResult<CuisineRow> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO cuisines (name) VALUES (?1)",
            params![row.name],
        )
        .map_err(CatalogError::storage)?;
        row.id = conn.last_insert_rowid() as i32;
        Ok(row)
    }

    async fn save_cuisine(&self, row: CuisineRow) -> CatalogResult<()> {
        let conn = self.conn.lock().await;
        let changed = conn
            .execute(
                "UPDATE cuisines SET name = ?1 WHERE id = ?2",
                params![row.name, row.id],
            )
            .map_err(CatalogError::storage)?;
        if changed == 0 {
            return Err(CatalogError::storage(format!(
                "cannot save cuisine row #{}: not stored",
                row.id
            )));
        }
        Ok(())
    }

    async fn cuisines(&self) -> CatalogResult<Vec<CuisineRow>> {
        let conn = self.conn.lock().await;
        scan_cuisines(&conn)
    }

    fn cuisine_stream(&self) -> EntityStream<CuisineRow> {
        let conn = Arc::clone(&self.conn);
        EntityStream::deferred(async move {
            let conn = conn.lock().await;
            scan_cuisines(&conn)
        })
    }

    async fn insert_lunch_spot(&self, mut row: LunchSpotRow) -> CatalogResult<LunchSpotRow> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO lunch_spots (name, cuisine_id) VALUES (?1, ?2)",
            params![row.name, row.cuisine_id],
        )
        .map_err(CatalogError::storage)?;
        row.id = conn.last_insert_rowid() as i32;
        Ok(row)
    }

    async fn save_lunch_spot(&self, row: LunchSpotRow) -> CatalogResult<()> {
        let conn = self.conn.lock().await;
        let changed = conn
            .execute(
                "UPDATE lunch_spots SET name = ?1, cuisine_id = ?2 WHERE id = ?3",
                params![row.name, row.cuisine_id, row.id],
            )
            .map_err(CatalogError::storage)?;
        if changed == 0 {
            return Err(CatalogError::storage(format!(
                "cannot save lunch spot row #{}: not stored",
                row.id
            )));
        }
        Ok(())
    }

    async fn lunch_spots(&self) -> CatalogResult<Vec<LunchSpotRow>> {
        let conn = self.conn.lock().await;
        scan_lunch_spots(&conn)
    }

    fn lunch_spot_stream(&self) -> EntityStream<LunchSpotRow> {
        let conn = Arc::clone(&self.conn);
        EntityStream::deferred(async move {
            let conn = conn.lock().await;
            scan_lunch_spots(&conn)
        })
    }
}
