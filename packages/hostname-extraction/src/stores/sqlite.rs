//! SQLite storage implementation.
//!
//! A file-based storage backend using SQLite. Good for:
//! - Local development
//! - Single-server deployments
//! - Testing with persistent data

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;
use tracing::{debug, instrument};

use crate::error::{ExtractionError, Result};
use crate::traits::store::RecordStore;
use crate::types::record::{MergeOutcome, StoredRecord};

/// SQLite-based record store.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Create a new SQLite store with the given connection URL.
    ///
    /// # Example URLs
    /// - `sqlite:./extracted.db?mode=rwc` - File-based, create if missing
    /// - `sqlite::memory:` - In-memory database (use [`SqliteStore::in_memory`])
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .map_err(|e| ExtractionError::Storage(e.to_string().into()))?;

        Self::from_pool(pool).await
    }

    /// Create an in-memory SQLite store (for testing).
    ///
    /// Pinned to one connection that never expires; every connection to
    /// `:memory:` would otherwise get its own empty database.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| ExtractionError::Storage(e.to_string().into()))?;

        Self::from_pool(pool).await
    }

    /// Create a store from an existing pool, creating the table if absent.
    pub async fn from_pool(pool: SqlitePool) -> Result<Self> {
        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    /// Run database migrations.
    async fn run_migrations(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS all_extracted_names (
                host TEXT NOT NULL,
                name TEXT NOT NULL,
                extracted_hostname TEXT NOT NULL,
                extraction_date TEXT NOT NULL,
                filename TEXT NOT NULL,
                UNIQUE (host, name, extracted_hostname, extraction_date, filename)
            );

            CREATE INDEX IF NOT EXISTS idx_all_extracted_names_filename
                ON all_extracted_names(filename);
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| ExtractionError::Storage(e.to_string().into()))?;

        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

// Row type for sqlx queries
#[derive(Debug, FromRow)]
struct RecordRow {
    host: String,
    name: String,
    extracted_hostname: String,
    extraction_date: NaiveDate,
    filename: String,
}

impl From<RecordRow> for StoredRecord {
    fn from(row: RecordRow) -> Self {
        StoredRecord {
            host: row.host,
            name: row.name,
            extracted_hostname: row.extracted_hostname,
            extraction_date: row.extraction_date,
            filename: row.filename,
        }
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    #[instrument(skip(self, records), fields(submitted = records.len()))]
    async fn merge(&self, records: &[StoredRecord]) -> Result<MergeOutcome> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| ExtractionError::Storage(e.to_string().into()))?;

        let mut inserted = 0usize;
        for record in records {
            let result = sqlx::query(
                r#"
                INSERT INTO all_extracted_names
                    (host, name, extracted_hostname, extraction_date, filename)
                VALUES (?, ?, ?, ?, ?)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(&record.host)
            .bind(&record.name)
            .bind(&record.extracted_hostname)
            .bind(record.extraction_date)
            .bind(&record.filename)
            .execute(&mut *tx)
            .await
            .map_err(|e| ExtractionError::Storage(e.to_string().into()))?;

            inserted += result.rows_affected() as usize;
        }

        tx.commit()
            .await
            .map_err(|e| ExtractionError::Storage(e.to_string().into()))?;

        let outcome = MergeOutcome::new(records.len(), inserted);
        debug!(inserted = outcome.inserted, skipped = outcome.skipped, "Merged records");
        Ok(outcome)
    }

    async fn count(&self) -> Result<usize> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM all_extracted_names")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| ExtractionError::Storage(e.to_string().into()))?;

        Ok(count.0 as usize)
    }

    async fn records_for_file(&self, filename: &str) -> Result<Vec<StoredRecord>> {
        let rows = sqlx::query_as::<_, RecordRow>(
            r#"
            SELECT host, name, extracted_hostname, extraction_date, filename
            FROM all_extracted_names
            WHERE filename = ?
            ORDER BY host, name, extracted_hostname, extraction_date
            "#,
        )
        .bind(filename)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ExtractionError::Storage(e.to_string().into()))?;

        Ok(rows.into_iter().map(StoredRecord::from).collect())
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| ExtractionError::Storage(e.to_string().into()))?;
        Ok(())
    }
}
