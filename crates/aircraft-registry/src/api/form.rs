//! Multipart form decoding.

use axum::extract::multipart::{Field, MultipartError, MultipartRejection};
use axum::extract::Multipart;
use axum::http::StatusCode;
use tracing::debug;

use crate::error::{Error, Result};
use crate::service::AircraftForm;
use crate::upload::ImageUpload;

/// Name of the file part carrying a new image.
pub const IMAGE_FIELD: &str = "image";

/// Name of the text part carrying the image reference to keep.
pub const EXISTING_IMAGE_FIELD: &str = "existingImage";

/// Decode a create or update submission.
///
/// Absent text fields stay empty and unknown parts are ignored.
///
/// # Errors
///
/// Returns [`Error::PayloadTooLarge`] if the body exceeds the size limit and
/// [`Error::InvalidRequest`] if it is not a readable multipart form.
pub async fn read_form(
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<AircraftForm> {
    let mut multipart = multipart
        .map_err(|rejection| request_error(rejection.status(), rejection.body_text()))?;

    let mut form = AircraftForm::default();
    while let Some(field) = multipart.next_field().await.map_err(invalid_form)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        let fields = &mut form.fields;
        match name.as_str() {
            "aircraftName" => fields.aircraft_name = text(field).await?,
            "aircraftType" => fields.aircraft_type = text(field).await?,
            "registrationNumber" => fields.registration_number = text(field).await?,
            "manufacturer" => fields.manufacturer = text(field).await?,
            "year" => fields.year = text(field).await?,
            "description" => fields.description = text(field).await?,
            EXISTING_IMAGE_FIELD => form.existing_image = Some(text(field).await?),
            IMAGE_FIELD => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(invalid_form)?;
                form.image = Some(ImageUpload::new(file_name, bytes.to_vec()));
            }
            other => debug!("Ignoring form part {}", other),
        }
    }
    Ok(form)
}

async fn text(field: Field<'_>) -> Result<String> {
    field.text().await.map_err(invalid_form)
}

fn invalid_form(err: MultipartError) -> Error {
    request_error(err.status(), err.body_text())
}

fn request_error(status: StatusCode, text: String) -> Error {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        Error::PayloadTooLarge(text)
    } else {
        Error::invalid_request(text)
    }
}
