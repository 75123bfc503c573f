//! Storage layer for the aircraft registry.
//!
//! The registry treats its database as an opaque document store: named
//! collections of JSON documents with store-assigned ids. [`DocumentStore`]
//! is that seam, [`SqliteDocumentStore`] the bundled implementation, and
//! [`RecordStoreClient`] the typed adapter the rest of the crate uses.

pub mod client;
pub mod migrations;
pub mod schema;
pub mod sqlite;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::OnceCell;
use tracing::info;

use crate::error::{Error, Result};

pub use client::RecordStoreClient;
pub use sqlite::SqliteDocumentStore;

/// A stored document: its id and JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Store-assigned identifier.
    pub id: String,
    /// Document body.
    pub data: Map<String, Value>,
}

/// Create/read/update/delete/list primitives over named collections.
#[async_trait]
pub trait DocumentStore: Send + Sync + std::fmt::Debug {
    /// Add a document to a collection and return its new id.
    async fn add(&self, collection: &str, data: Map<String, Value>) -> Result<String>;

    /// Fetch one document, or `None` if it does not exist.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>>;

    /// Fetch every document of a collection in creation order.
    async fn list(&self, collection: &str) -> Result<Vec<Document>>;

    /// Merge `data` into an existing document.
    ///
    /// Keys present in `data` replace stored values, other stored keys are
    /// kept. Returns `false` if the document does not exist.
    async fn update(&self, collection: &str, id: &str, data: Map<String, Value>) -> Result<bool>;

    /// Delete a document. Returns `false` if it did not exist.
    async fn delete(&self, collection: &str, id: &str) -> Result<bool>;
}

/// Process-wide handle to the document store.
///
/// The store is opened on first use and then shared by reference; concurrent
/// first callers wait on the same initialization.
#[derive(Debug)]
pub struct StoreHandle {
    database_path: PathBuf,
    cell: OnceCell<Arc<dyn DocumentStore>>,
}

impl StoreHandle {
    /// Create a handle that opens the `SQLite` store at `database_path` on first use.
    #[must_use]
    pub fn new(database_path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: database_path.into(),
            cell: OnceCell::new(),
        }
    }

    /// Create a handle around an already-open store.
    #[must_use]
    pub fn from_store(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            database_path: PathBuf::new(),
            cell: OnceCell::new_with(Some(store)),
        }
    }

    /// Get the shared store, opening it if this is the first call.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be opened. A failed open is
    /// retried by the next caller.
    pub async fn store(&self) -> Result<Arc<dyn DocumentStore>> {
        let store = self
            .cell
            .get_or_try_init(|| async {
                let path = self.database_path.clone();
                info!("Initializing document store at {}", path.display());
                let store = tokio::task::spawn_blocking(move || SqliteDocumentStore::open(path))
                    .await
                    .map_err(|e| Error::internal(format!("store initialization failed: {e}")))??;
                Ok::<Arc<dyn DocumentStore>, Error>(Arc::new(store))
            })
            .await?;
        Ok(Arc::clone(store))
    }

    /// Whether the store has been opened.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.cell.initialized()
    }
}
