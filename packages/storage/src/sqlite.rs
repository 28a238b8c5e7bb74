// ABOUTME: SQLite-backed record store
// ABOUTME: One documents table keyed by collection and id, fields kept as JSON text

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{migrate::MigrateDatabase, Row};
use tracing::{debug, info};

use crate::{
    Document, Fields, RecordStore, StorageConfig, StorageError, StorageResult, RESERVED_FIELDS,
};
use crm_core::generate_document_id;

/// SQLite implementation of RecordStore
pub struct SqliteRecordStore {
    pool: SqlitePool,
}

impl SqliteRecordStore {
    /// Open (creating if needed) the database described by `config`
    pub async fn new(config: &StorageConfig) -> StorageResult<Self> {
        if let Some(parent) = config.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let database_url = format!("sqlite:{}", config.path.display());

        if !sqlx::Sqlite::database_exists(&database_url).await? {
            debug!("Creating database at: {}", database_url);
            sqlx::Sqlite::create_database(&database_url).await?;
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(std::time::Duration::from_secs(config.busy_timeout_seconds))
            .connect(&database_url)
            .await?;

        if config.enable_wal {
            sqlx::query("PRAGMA journal_mode = WAL")
                .execute(&pool)
                .await?;
        }

        sqlx::query("PRAGMA synchronous = NORMAL")
            .execute(&pool)
            .await?;

        let store = Self::from_pool(pool).await?;
        info!("Record store opened at {}", config.path.display());
        Ok(store)
    }

    /// Wrap an existing pool, applying pending migrations
    pub async fn from_pool(pool: SqlitePool) -> StorageResult<Self> {
        let store = Self { pool };
        store.initialize().await?;
        Ok(store)
    }

    async fn initialize(&self) -> StorageResult<()> {
        debug!("Running record store migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(StorageError::Migration)?;
        Ok(())
    }

    fn timestamp(at: &DateTime<Utc>) -> String {
        at.to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    fn parse_timestamp(value: &str, column: &str) -> StorageResult<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(value)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| StorageError::Database(format!("Invalid {} timestamp", column)))
    }

    /// Convert a database row to a Document
    fn row_to_document(row: &SqliteRow) -> StorageResult<Document> {
        let fields_json: String = row.try_get("fields")?;
        let fields: Fields = serde_json::from_str(&fields_json)?;

        let created_at: String = row.try_get("created_at")?;
        let updated_at: String = row.try_get("updated_at")?;

        Ok(Document {
            id: row.try_get("id")?,
            fields,
            created_at: Self::parse_timestamp(&created_at, "created_at")?,
            updated_at: Self::parse_timestamp(&updated_at, "updated_at")?,
        })
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn create(&self, collection: &str, mut fields: Fields) -> StorageResult<Document> {
        for field in RESERVED_FIELDS {
            fields.remove(field);
        }

        // Stored with microsecond precision; hand back what a later read returns
        let now = Utc::now().trunc_subsecs(6);
        let document = Document {
            id: generate_document_id(),
            fields,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, fields, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(collection)
        .bind(&document.id)
        .bind(serde_json::to_string(&document.fields)?)
        .bind(Self::timestamp(&now))
        .bind(Self::timestamp(&now))
        .execute(&self.pool)
        .await?;

        debug!("Created {}/{}", collection, document.id);
        Ok(document)
    }

    async fn list(&self, collection: &str) -> StorageResult<Vec<Document>> {
        let rows = sqlx::query(
            "SELECT id, fields, created_at, updated_at FROM documents WHERE collection = ? ORDER BY seq",
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_document).collect()
    }

    async fn get(&self, collection: &str, id: &str) -> StorageResult<Option<Document>> {
        let row = sqlx::query(
            "SELECT id, fields, created_at, updated_at FROM documents WHERE collection = ? AND id = ?",
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::row_to_document).transpose()
    }

    async fn update(&self, collection: &str, id: &str, mut fields: Fields) -> StorageResult<()> {
        for field in RESERVED_FIELDS {
            fields.remove(field);
        }

        // json_patch merges top-level keys into the stored object
        let result = sqlx::query(
            r#"
            UPDATE documents
            SET fields = json_patch(fields, ?),
                updated_at = MAX(updated_at, ?)
            WHERE collection = ? AND id = ?
            "#,
        )
        .bind(serde_json::to_string(&fields)?)
        .bind(Self::timestamp(&Utc::now()))
        .bind(collection)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }

        debug!("Updated {}/{}", collection, id);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> StorageResult<()> {
        sqlx::query("DELETE FROM documents WHERE collection = ? AND id = ?")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await?;

        debug!("Deleted {}/{}", collection, id);
        Ok(())
    }
}
