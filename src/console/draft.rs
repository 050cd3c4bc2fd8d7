//! Create/edit draft state

use serde_json::Value;

use model_console_api::Record;

use crate::table::cell_text;

/// Pending field values for a create or an edit
pub type Draft = Record;

/// Whether the form creates a new record or edits an existing one
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EditMode {
    #[default]
    Creating,
    /// Editing the record with this id value
    Editing(Value),
}

impl EditMode {
    pub fn is_editing(&self) -> bool {
        matches!(self, EditMode::Editing(_))
    }

    pub fn id(&self) -> Option<&Value> {
        match self {
            EditMode::Creating => None,
            EditMode::Editing(id) => Some(id),
        }
    }

    pub fn title(&self) -> String {
        match self {
            EditMode::Creating => "New record".to_string(),
            EditMode::Editing(id) => format!("Edit record #{}", cell_text(Some(id))),
        }
    }
}

/// Copy the editable fields of `record` into a fresh draft.
///
/// Only declared scalar fields are taken, and never the id field.
pub fn seed_draft(record: &Record, id_field_name: &str, scalar_fields: &[String]) -> Draft {
    record
        .iter()
        .filter(|(key, _)| key.as_str() != id_field_name && scalar_fields.iter().any(|f| f == *key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
