//! Typed client for the aircraft collection.

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::model::{Aircraft, AircraftFields, CREATED_AT_KEY, UPDATED_AT_KEY};

use super::StoreHandle;

/// Create/read/update/delete/list for aircraft records in one collection.
///
/// Every call is a single round-trip to the document store. Failures are
/// returned unchanged; nothing is retried.
#[derive(Debug, Clone)]
pub struct RecordStoreClient {
    handle: Arc<StoreHandle>,
    collection: String,
}

impl RecordStoreClient {
    /// Create a client for `collection` on the shared store handle.
    #[must_use]
    pub fn new(handle: Arc<StoreHandle>, collection: impl Into<String>) -> Self {
        Self {
            handle,
            collection: collection.into(),
        }
    }

    /// Name of the collection this client reads and writes.
    #[must_use]
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Create a record and return its store-assigned id.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the write.
    pub async fn create(&self, fields: &AircraftFields, image_url: &str) -> Result<String> {
        let mut data = fields.to_document(image_url)?;
        data.insert(CREATED_AT_KEY.to_string(), timestamp());

        let id = self.handle.store().await?.add(&self.collection, data).await?;
        debug!(id = %id, collection = %self.collection, "created record");
        Ok(id)
    }

    /// Fetch a record by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or the stored document is malformed.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<Aircraft>> {
        let store = self.handle.store().await?;
        store
            .get(&self.collection, id)
            .await?
            .map(|doc| Aircraft::from_document(&doc.id, doc.data))
            .transpose()
    }

    /// Fetch every record in creation order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or a stored document is malformed.
    pub async fn list_all(&self) -> Result<Vec<Aircraft>> {
        let store = self.handle.store().await?;
        store
            .list(&self.collection)
            .await?
            .into_iter()
            .map(|doc| Aircraft::from_document(&doc.id, doc.data))
            .collect()
    }

    /// Replace a record's fields and image reference, stamping `updatedAt`.
    ///
    /// `createdAt` is left untouched. Returns `false` if the record does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the write.
    pub async fn update(&self, id: &str, fields: &AircraftFields, image_url: &str) -> Result<bool> {
        let mut data = fields.to_document(image_url)?;
        data.insert(UPDATED_AT_KEY.to_string(), timestamp());

        let store = self.handle.store().await?;
        let updated = store.update(&self.collection, id, data).await?;
        debug!(id = %id, updated, "updated record");
        Ok(updated)
    }

    /// Delete a record. Returns `false` if it did not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the delete.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let store = self.handle.store().await?;
        let deleted = store.delete(&self.collection, id).await?;
        debug!(id = %id, deleted, "deleted record");
        Ok(deleted)
    }
}

fn timestamp() -> Value {
    Value::from(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true))
}
