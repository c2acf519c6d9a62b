//! lunchr - command line caller for the lunch catalog
//!
//! Stands where an HTTP layer would stand: parses a command, builds the
//! configured store and the two services, runs exactly one catalog
//! operation and prints the result as JSON.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use infrastructure::{ConfigLoader, MemoryStore, SqliteStore, StorageBackend};

mod commands;
use commands::{run, Commands};

#[derive(Parser)]
#[command(name = "lunchr")]
#[command(about = "Lunch spot catalog", version)]
struct Cli {
    /// Explicit config file (wins over lunchr.toml / lunchr.json lookup)
    #[arg(long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Override the database file (implies the sqlite backend)
    #[arg(long, global = true)]
    db: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut loader = ConfigLoader::new();
    if let Some(path) = cli.config.clone() {
        loader = loader.with_path(path);
    }
    let mut config = loader.load()?;
    if let Some(db) = cli.db.clone() {
        config.storage.backend = StorageBackend::Sqlite;
        config.storage.path = Some(db);
    }

    match config.storage.backend {
        StorageBackend::Memory => {
            let store = std::sync::Arc::new(MemoryStore::new());
            run(store, cli.command).await
        }
        StorageBackend::Sqlite => {
            let store = SqliteStore::open(config.storage.database_path()).await?;
            run(std::sync::Arc::new(store), cli.command).await
        }
    }
}
