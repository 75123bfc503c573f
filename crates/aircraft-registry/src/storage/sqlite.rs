//! `SQLite`-backed document store.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::{Error, Result};

use super::{migrations, Document, DocumentStore};

/// Document store keeping JSON documents in a local `SQLite` database.
///
/// All access goes through one connection guarded by a mutex; the blocking
/// calls run on tokio's blocking pool.
#[derive(Debug, Clone)]
pub struct SqliteDocumentStore {
    /// Path to the database file.
    path: PathBuf,
    /// Shared database connection.
    conn: Arc<Mutex<Connection>>,
}

impl SqliteDocumentStore {
    /// Open or create a document store at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    /// Initializes the schema if this is a new database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        // Enable WAL mode for better concurrent read performance
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        migrations::initialize_schema(&conn)?;

        info!("Database opened successfully at {}", path.display());
        Ok(Self {
            path,
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Create an in-memory document store for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run a closure against the connection on the blocking pool.
    async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| Error::store("database connection lock poisoned"))?;
            f(&guard)
        })
        .await
        .map_err(|e| Error::internal(format!("database task failed: {e}")))?
    }

    /// Generate a new document id.
    fn new_id() -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }

    /// Current time in the fixed-width format used for ordering.
    fn now() -> String {
        Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    /// Convert a database row to a Document.
    fn row_to_document(row: &rusqlite::Row) -> rusqlite::Result<(String, String)> {
        Ok((row.get(0)?, row.get(1)?))
    }

    /// Parse a stored JSON body.
    fn parse_body(id: String, body: &str) -> Result<Document> {
        match serde_json::from_str(body)? {
            Value::Object(data) => Ok(Document { id, data }),
            _ => Err(Error::store(format!("document {id} is not a JSON object"))),
        }
    }
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn add(&self, collection: &str, data: Map<String, Value>) -> Result<String> {
        let collection = collection.to_string();
        let body = serde_json::to_string(&data)?;
        let id = Self::new_id();
        let now = Self::now();

        let inserted = id.clone();
        self.with_conn(move |conn| {
            conn.execute(
                r"
                INSERT INTO documents (collection, id, data, created_at, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?4)
                ",
                params![collection, inserted, body, now],
            )?;
            Ok(())
        })
        .await?;

        debug!("Inserted document {}", id);
        Ok(id)
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let collection = collection.to_string();
        let id = id.to_string();

        self.with_conn(move |conn| {
            let row = conn
                .query_row(
                    "SELECT id, data FROM documents WHERE collection = ?1 AND id = ?2",
                    params![collection, id],
                    Self::row_to_document,
                )
                .optional()?;
            row.map(|(id, body)| Self::parse_body(id, &body))
                .transpose()
        })
        .await
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>> {
        let collection = collection.to_string();

        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(
                r"
                SELECT id, data FROM documents WHERE collection = ?1
                ORDER BY created_at ASC, rowid ASC
                ",
            )?;
            let rows = stmt
                .query_map([collection], Self::row_to_document)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            rows.into_iter()
                .map(|(id, body)| Self::parse_body(id, &body))
                .collect()
        })
        .await
    }

    async fn update(&self, collection: &str, id: &str, data: Map<String, Value>) -> Result<bool> {
        let collection = collection.to_string();
        let id = id.to_string();
        let now = Self::now();

        self.with_conn(move |conn| {
            let tx = conn.unchecked_transaction()?;
            let existing: Option<String> = tx
                .query_row(
                    "SELECT data FROM documents WHERE collection = ?1 AND id = ?2",
                    params![collection, id],
                    |row| row.get(0),
                )
                .optional()?;

            let Some(existing) = existing else {
                return Ok(false);
            };

            let mut merged = Self::parse_body(id.clone(), &existing)?.data;
            merged.extend(data);
            let body = serde_json::to_string(&merged)?;

            tx.execute(
                "UPDATE documents SET data = ?1, updated_at = ?2 WHERE collection = ?3 AND id = ?4",
                params![body, now, collection, id],
            )?;
            tx.commit()?;
            Ok(true)
        })
        .await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool> {
        let collection = collection.to_string();
        let id = id.to_string();

        let affected = self
            .with_conn(move |conn| {
                Ok(conn.execute(
                    "DELETE FROM documents WHERE collection = ?1 AND id = ?2",
                    params![collection, id],
                )?)
            })
            .await?;
        Ok(affected > 0)
    }
}
