//! Display models for the UI pages.

use crate::model::{Aircraft, AircraftFields};

/// One row of the aircraft table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AircraftRow {
    /// 1-based position in the table.
    pub number: usize,
    /// Record id, used for the edit link and delete call.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Category.
    pub kind: String,
    /// Registration mark.
    pub registration_number: String,
    /// Manufacturer name.
    pub manufacturer: String,
    /// Year of manufacture as stored.
    pub year: String,
    /// Creation date as `YYYY-MM-DD`, empty when unknown.
    pub date_added: String,
}

impl AircraftRow {
    /// Map a stored record to its table row at zero-based `index`.
    #[must_use]
    pub fn from_record(index: usize, record: &Aircraft) -> Self {
        let fields = &record.fields;
        Self {
            number: index + 1,
            id: record.id.clone(),
            name: fields.aircraft_name.clone(),
            kind: fields.aircraft_type.clone(),
            registration_number: fields.registration_number.clone(),
            manufacturer: fields.manufacturer.clone(),
            year: fields.year.clone(),
            date_added: record
                .created_at
                .map(|t| t.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        }
    }
}

/// Map records to table rows in order.
#[must_use]
pub fn rows(records: &[Aircraft]) -> Vec<AircraftRow> {
    records
        .iter()
        .enumerate()
        .map(|(i, record)| AircraftRow::from_record(i, record))
        .collect()
}

/// Values shown by the create and edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormView {
    /// Record being edited, `None` when creating.
    pub id: Option<String>,
    /// Current field values.
    pub fields: AircraftFields,
    /// Current image reference, empty when none.
    pub image_url: String,
}

impl FormView {
    /// An empty create form.
    #[must_use]
    pub fn create() -> Self {
        Self::default()
    }

    /// An edit form populated from a record.
    #[must_use]
    pub fn edit(record: &Aircraft) -> Self {
        Self {
            id: Some(record.id.clone()),
            fields: record.fields.clone(),
            image_url: record.image_url.clone(),
        }
    }

    /// Whether this form edits an existing record.
    #[must_use]
    pub fn is_edit(&self) -> bool {
        self.id.is_some()
    }
}
