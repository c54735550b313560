//! SQLite vector store backend.
//!
//! Provides [`SqliteVectorStore`], the persistent store used by the CLI. It
//! lives in a single database file inside the configured directory:
//!
//! | Table | Columns |
//! |-------|---------|
//! | `collections` | `name`, `dimension` (set on first write) |
//! | `embeddings` | `collection`, `id`, `document`, `metadata` (JSON), `embedding` (LE `f32`) |
//!
//! Search is a brute-force scan of the collection; data volumes are small.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::document::{QueryMatch, Record};
use crate::error::{RagError, Result};
use crate::vectorstore::{VectorStore, nearest, squared_l2};

const BACKEND: &str = "sqlite";

/// File name of the database inside the store directory.
pub const DB_FILE_NAME: &str = "ragent.sqlite3";

/// A persistent [`VectorStore`] backed by SQLite.
pub struct SqliteVectorStore {
    pool: SqlitePool,
    db_path: PathBuf,
}

impl SqliteVectorStore {
    /// Open (creating if needed) the store in `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Io`] if the directory cannot be created and
    /// [`RagError::VectorStoreError`] if the database cannot be opened.
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir).map_err(|e| RagError::io(dir, e))?;
        Self::with_path(dir.join(DB_FILE_NAME)).await
    }

    /// Open (creating if needed) the database file at `db_path`.
    pub async fn with_path(db_path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = db_path.into();
        let options = SqliteConnectOptions::new()
            .filename(&db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(Self::map_err)?;

        let store = Self { pool, db_path };
        store.init_schema().await?;
        debug!(path = %store.db_path.display(), "opened sqlite vector store");
        Ok(store)
    }

    /// Path of the database file.
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Close the underlying pool, flushing the WAL.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    fn map_err(e: sqlx::Error) -> RagError {
        RagError::store(BACKEND, e.to_string())
    }

    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS collections (
                name TEXT PRIMARY KEY,
                dimension INTEGER
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(Self::map_err)?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS embeddings (
                collection TEXT NOT NULL REFERENCES collections(name) ON DELETE CASCADE,
                id TEXT NOT NULL,
                document TEXT NOT NULL,
                metadata TEXT NOT NULL DEFAULT '{}',
                embedding BLOB NOT NULL,
                PRIMARY KEY (collection, id)
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(Self::map_err)?;

        Ok(())
    }

    /// `None` if the collection is missing, `Some(None)` if it has no records yet.
    async fn dimension(&self, collection: &str) -> Result<Option<Option<usize>>> {
        let row = sqlx::query("SELECT dimension FROM collections WHERE name = ?1")
            .bind(collection)
            .fetch_optional(&self.pool)
            .await
            .map_err(Self::map_err)?;
        Ok(row.map(|row| row.get::<Option<i64>, _>("dimension").map(|d| d as usize)))
    }

    async fn require_dimension(&self, collection: &str) -> Result<Option<usize>> {
        self.dimension(collection)
            .await?
            .ok_or_else(|| RagError::CollectionNotFound(collection.to_string()))
    }

    fn serialize_embedding(embedding: &[f32]) -> Vec<u8> {
        embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    fn deserialize_embedding(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect()
    }

    fn decode_metadata(id: &str, raw: &str) -> Result<HashMap<String, String>> {
        serde_json::from_str(raw).map_err(|e| {
            RagError::store(BACKEND, format!("invalid metadata for record '{id}': {e}"))
        })
    }

    fn row_to_record(row: &SqliteRow) -> Result<Record> {
        let id: String = row.get("id");
        let metadata: String = row.get("metadata");
        let embedding: Vec<u8> = row.get("embedding");
        Ok(Record {
            metadata: Self::decode_metadata(&id, &metadata)?,
            id,
            text: row.get("document"),
            embedding: Self::deserialize_embedding(&embedding),
        })
    }
}

fn dimension_mismatch(expected: usize, actual: usize) -> RagError {
    RagError::store(
        BACKEND,
        format!("embedding dimension {actual} does not match collection dimension {expected}"),
    )
}

#[async_trait]
impl VectorStore for SqliteVectorStore {
    async fn create_collection(&self, name: &str) -> Result<()> {
        sqlx::query("INSERT OR IGNORE INTO collections (name, dimension) VALUES (?1, NULL)")
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(Self::map_err)?;
        Ok(())
    }

    async fn delete_collection(&self, name: &str) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(Self::map_err)?;

        sqlx::query("DELETE FROM embeddings WHERE collection = ?1")
            .bind(name)
            .execute(&mut *tx)
            .await
            .map_err(Self::map_err)?;
        let deleted = sqlx::query("DELETE FROM collections WHERE name = ?1")
            .bind(name)
            .execute(&mut *tx)
            .await
            .map_err(Self::map_err)?
            .rows_affected();

        tx.commit().await.map_err(Self::map_err)?;

        if deleted == 0 {
            return Err(RagError::CollectionNotFound(name.to_string()));
        }
        debug!(collection = name, "deleted collection");
        Ok(())
    }

    async fn add(&self, collection: &str, records: &[Record]) -> Result<()> {
        let stored = self.require_dimension(collection).await?;
        let Some(first) = records.first() else {
            return Ok(());
        };

        let dimension = stored.unwrap_or(first.embedding.len());
        if let Some(bad) = records.iter().find(|r| r.embedding.len() != dimension) {
            return Err(dimension_mismatch(dimension, bad.embedding.len()));
        }

        let mut tx = self.pool.begin().await.map_err(Self::map_err)?;

        if stored.is_none() {
            sqlx::query("UPDATE collections SET dimension = ?1 WHERE name = ?2")
                .bind(dimension as i64)
                .bind(collection)
                .execute(&mut *tx)
                .await
                .map_err(Self::map_err)?;
        }

        for record in records {
            let metadata = serde_json::to_string(&record.metadata)
                .map_err(|e| RagError::store(BACKEND, format!("failed to encode metadata: {e}")))?;

            sqlx::query(
                "INSERT OR REPLACE INTO embeddings (collection, id, document, metadata, embedding)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )
            .bind(collection)
            .bind(&record.id)
            .bind(&record.text)
            .bind(&metadata)
            .bind(Self::serialize_embedding(&record.embedding))
            .execute(&mut *tx)
            .await
            .map_err(Self::map_err)?;
        }

        tx.commit().await.map_err(Self::map_err)?;
        debug!(collection, count = records.len(), dimension, "added records");
        Ok(())
    }

    async fn query(
        &self,
        collection: &str,
        embedding: &[f32],
        k: usize,
    ) -> Result<Vec<QueryMatch>> {
        let Some(dimension) = self.require_dimension(collection).await? else {
            return Ok(Vec::new());
        };
        if dimension != embedding.len() {
            return Err(dimension_mismatch(dimension, embedding.len()));
        }

        let rows = sqlx::query(
            "SELECT id, document, metadata, embedding FROM embeddings WHERE collection = ?1",
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await
        .map_err(Self::map_err)?;

        let scored = rows
            .iter()
            .map(|row| {
                let record = Self::row_to_record(row)?;
                Ok(QueryMatch {
                    distance: squared_l2(&record.embedding, embedding),
                    id: record.id,
                    text: record.text,
                    metadata: record.metadata,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(nearest(scored, k))
    }

    async fn count(&self, collection: &str) -> Result<usize> {
        self.require_dimension(collection).await?;
        let count: i64 = sqlx::query("SELECT COUNT(*) AS n FROM embeddings WHERE collection = ?1")
            .bind(collection)
            .fetch_one(&self.pool)
            .await
            .map_err(Self::map_err)?
            .get("n");
        Ok(count as usize)
    }

    async fn list_collections(&self) -> Result<Vec<String>> {
        let rows = sqlx::query("SELECT name FROM collections ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(Self::map_err)?;
        Ok(rows.iter().map(|row| row.get("name")).collect())
    }

    async fn get_all(&self, collection: &str) -> Result<Vec<Record>> {
        self.require_dimension(collection).await?;
        let rows = sqlx::query(
            "SELECT id, document, metadata, embedding FROM embeddings
             WHERE collection = ?1 ORDER BY id",
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await
        .map_err(Self::map_err)?;
        rows.iter().map(Self::row_to_record).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedding_blob_is_little_endian_f32() {
        let blob = SqliteVectorStore::serialize_embedding(&[1.0, -2.5]);
        assert_eq!(blob.len(), 8);
        assert_eq!(&blob[..4], &1.0f32.to_le_bytes());
        assert_eq!(SqliteVectorStore::deserialize_embedding(&blob), vec![1.0, -2.5]);
    }

    #[tokio::test]
    async fn corrupt_metadata_is_a_store_error() {
        let temp = tempfile::tempdir().unwrap();
        let store = SqliteVectorStore::open(temp.path()).await.unwrap();
        store.create_collection("facts").await.unwrap();
        let record = Record {
            id: "paris.txt".into(),
            text: "Paris".into(),
            embedding: vec![1.0, 0.0],
            metadata: HashMap::from([("source".to_string(), "paris.txt".to_string())]),
        };
        store.add("facts", &[record]).await.unwrap();

        sqlx::query("UPDATE embeddings SET metadata = '{not json' WHERE id = 'paris.txt'")
            .execute(&store.pool)
            .await
            .unwrap();

        let err = store.get_all("facts").await.unwrap_err();
        match err {
            RagError::VectorStoreError { message, .. } => assert!(message.contains("paris.txt")),
            other => panic!("unexpected error: {other}"),
        }
        let err = store.query("facts", &[1.0, 0.0], 3).await.unwrap_err();
        assert!(matches!(err, RagError::VectorStoreError { .. }));
    }
}
