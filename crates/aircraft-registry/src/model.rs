//! Aircraft record types.
//!
//! This module defines the single entity managed by the registry, both as the
//! caller-supplied field set and as the stored record with its server-assigned
//! metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Stored document key holding the image reference.
pub const IMAGE_URL_KEY: &str = "imageUrl";

/// Stored document key holding the creation timestamp.
pub const CREATED_AT_KEY: &str = "createdAt";

/// Stored document key holding the last-update timestamp.
pub const UPDATED_AT_KEY: &str = "updatedAt";

/// The caller-supplied fields of an aircraft record.
///
/// Missing fields decode as empty strings. No other validation is applied;
/// coercing `year` into a number is left to whoever reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AircraftFields {
    /// Display name, e.g. "Cessna 172".
    pub aircraft_name: String,
    /// Category, e.g. "Fixed-wing".
    pub aircraft_type: String,
    /// Registration mark, e.g. "N12345".
    pub registration_number: String,
    /// Manufacturer name.
    pub manufacturer: String,
    /// Year of manufacture, kept as free-form text.
    #[serde(deserialize_with = "text_or_number")]
    pub year: String,
    /// Optional free-text description.
    pub description: String,
}

/// A stored aircraft record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aircraft {
    /// Store-assigned identifier.
    pub id: String,

    /// The record's editable fields.
    #[serde(flatten)]
    pub fields: AircraftFields,

    /// Server-relative path of the uploaded image, or empty.
    #[serde(default)]
    pub image_url: String,

    /// When the record was created.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    /// When the record was last updated.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl AircraftFields {
    /// Convert the fields into a stored document body.
    ///
    /// # Errors
    ///
    /// Returns an error if the fields cannot be serialized.
    pub fn to_document(&self, image_url: &str) -> Result<Map<String, Value>> {
        let mut data = match serde_json::to_value(self)? {
            Value::Object(map) => map,
            other => {
                return Err(Error::internal(format!(
                    "aircraft fields serialized to {other}, expected an object"
                )))
            }
        };
        data.insert(IMAGE_URL_KEY.to_string(), Value::from(image_url));
        Ok(data)
    }
}

impl Aircraft {
    /// Decode a stored document into a record.
    ///
    /// # Errors
    ///
    /// Returns an error if the document has values of the wrong type.
    pub fn from_document(id: &str, mut data: Map<String, Value>) -> Result<Self> {
        data.insert("id".to_string(), Value::from(id));
        Ok(serde_json::from_value(Value::Object(data))?)
    }

    /// Whether the record references an uploaded image.
    #[must_use]
    pub fn has_image(&self) -> bool {
        !self.image_url.is_empty()
    }
}

/// Accept `"1998"`, `1998` or `null` and keep the value as text.
fn text_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or number, got {other}"
        ))),
    }
}
