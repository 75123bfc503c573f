//! Aircraft operations spanning the record store and the uploads directory.
//!
//! An image write and the record mutation that references it form one
//! logical step. When the record write fails, a file written by the same
//! call is removed again. Images that a record stops referencing are kept.

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::model::{Aircraft, AircraftFields};
use crate::storage::RecordStoreClient;
use crate::upload::{ImageUpload, StoredImage, UploadDir};

/// A create or update submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AircraftForm {
    /// Submitted field values.
    pub fields: AircraftFields,
    /// Newly selected image, if any.
    pub image: Option<ImageUpload>,
    /// Reference the record should keep when no new image is supplied.
    pub existing_image: Option<String>,
}

impl AircraftForm {
    /// Create a form with the given fields and no image.
    #[must_use]
    pub fn new(fields: AircraftFields) -> Self {
        Self {
            fields,
            ..Self::default()
        }
    }

    /// Attach a newly selected image.
    #[must_use]
    pub fn with_image(mut self, image: ImageUpload) -> Self {
        self.image = Some(image);
        self
    }

    /// Keep an existing image reference when no new image is supplied.
    #[must_use]
    pub fn with_existing_image(mut self, reference: impl Into<String>) -> Self {
        self.existing_image = Some(reference.into());
        self
    }
}

/// Create, read, update, delete and list aircraft records.
#[derive(Debug, Clone)]
pub struct AircraftService {
    client: RecordStoreClient,
    uploads: UploadDir,
}

impl AircraftService {
    /// Create a service over a record client and an uploads directory.
    #[must_use]
    pub fn new(client: RecordStoreClient, uploads: UploadDir) -> Self {
        Self { client, uploads }
    }

    /// The uploads directory images are written to.
    #[must_use]
    pub fn uploads(&self) -> &UploadDir {
        &self.uploads
    }

    /// Create a record, storing its image first if one was supplied.
    ///
    /// # Errors
    ///
    /// Returns an error if the image cannot be written or the store rejects
    /// the record. In the latter case the image is removed again.
    pub async fn create(&self, form: AircraftForm) -> Result<String> {
        let image = self.uploads.resolve(form.image.as_ref(), "").await?;

        match self.client.create(&form.fields, &image.reference).await {
            Ok(id) => {
                info!(id = %id, name = %form.fields.aircraft_name, "Aircraft created");
                Ok(id)
            }
            Err(e) => {
                self.roll_back(&image).await;
                Err(e)
            }
        }
    }

    /// Fetch one record.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub async fn get(&self, id: &str) -> Result<Option<Aircraft>> {
        self.client.get_by_id(id).await
    }

    /// Fetch every record in creation order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub async fn list(&self) -> Result<Vec<Aircraft>> {
        self.client.list_all().await
    }

    /// Replace a record's fields and image reference.
    ///
    /// The record's image becomes the new upload if one was supplied,
    /// otherwise the form's existing reference (empty when none was sent).
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the record does not exist, in which case
    /// nothing is written. Other errors come from the image write or the store.
    pub async fn update(&self, id: &str, form: AircraftForm) -> Result<()> {
        if self.client.get_by_id(id).await?.is_none() {
            return Err(self.not_found(id));
        }

        let existing = form.existing_image.as_deref().unwrap_or_default();
        let image = self.uploads.resolve(form.image.as_ref(), existing).await?;

        match self.client.update(id, &form.fields, &image.reference).await {
            Ok(true) => {
                info!(id = %id, new_image = image.newly_written, "Aircraft updated");
                Ok(())
            }
            Ok(false) => {
                self.roll_back(&image).await;
                Err(self.not_found(id))
            }
            Err(e) => {
                self.roll_back(&image).await;
                Err(e)
            }
        }
    }

    /// Delete a record. Deleting an absent record succeeds.
    ///
    /// Returns whether a record was removed. The record's image file stays on disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let deleted = self.client.delete(id).await?;
        if deleted {
            info!(id = %id, "Aircraft deleted");
        } else {
            warn!(id = %id, "Delete requested for unknown aircraft");
        }
        Ok(deleted)
    }

    async fn roll_back(&self, image: &StoredImage) {
        if image.newly_written {
            self.uploads.discard(&image.reference).await;
        }
    }

    fn not_found(&self, id: &str) -> Error {
        Error::not_found(self.client.collection(), id)
    }
}
