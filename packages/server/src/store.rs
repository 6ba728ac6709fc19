//! Record store selection from a database URL.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use hostname_extraction::{MemoryStore, PostgresStore, RecordStore, SqliteStore};

/// Which backend a database URL selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Memory,
    Sqlite,
    Postgres,
}

impl StoreKind {
    pub fn from_url(database_url: &str) -> Result<Self> {
        if database_url == "memory" {
            Ok(Self::Memory)
        } else if database_url.starts_with("sqlite:") {
            Ok(Self::Sqlite)
        } else if database_url.starts_with("postgres://")
            || database_url.starts_with("postgresql://")
        {
            Ok(Self::Postgres)
        } else {
            bail!("unsupported DATABASE_URL scheme: {}", database_url)
        }
    }
}

/// Connect to the store named by `database_url`, creating its table if needed.
pub async fn connect_store(database_url: &str) -> Result<Arc<dyn RecordStore>> {
    let store: Arc<dyn RecordStore> = match StoreKind::from_url(database_url)? {
        StoreKind::Memory => Arc::new(MemoryStore::new()),
        StoreKind::Sqlite if database_url.contains(":memory:") => Arc::new(
            SqliteStore::in_memory()
                .await
                .context("Failed to open in-memory SQLite store")?,
        ),
        StoreKind::Sqlite => Arc::new(
            SqliteStore::new(database_url)
                .await
                .context("Failed to open SQLite store")?,
        ),
        StoreKind::Postgres => Arc::new(
            PostgresStore::new(database_url)
                .await
                .context("Failed to connect to PostgreSQL store")?,
        ),
    };
    Ok(store)
}
