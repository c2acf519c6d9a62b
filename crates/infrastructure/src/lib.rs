//! Infrastructure Layer - storage port implementations and configuration
//!
//! Two [`domain::CatalogStore`] backends:
//! - `MemoryStore`: snapshot-transactional in-memory store, the test and
//!   throwaway backend
//! - `SqliteStore`: the persistent relational backend
//!
//! Plus config loading for picking between them.

pub mod config;
pub mod storage;

pub use config::{CatalogConfig, ConfigLoader, StorageBackend, StorageConfig};
pub use storage::{MemoryStore, SqliteStore};
