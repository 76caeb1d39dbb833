//! Named list definitions and their flattened rows.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry of a named list. Entries are arbitrary key/value maps in the
/// source; the id attribute and the value field are pulled out, everything
/// else passes through in `fields` under its original key.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ListEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

/// A named list definition with its ordered entries.
///
/// A definition with zero entries is a valid state, not an error; it still
/// flattens into one metadata-only row so the list stays discoverable.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ListDefinition {
    pub list_id: Option<String>,
    pub name: Option<String>,
    pub type_id: Option<String>,
    pub classifier: Option<String>,
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entries: Vec<ListEntry>,
}

impl ListDefinition {
    /// Flatten into one row per entry, metadata duplicated on each; a
    /// definition without entries yields exactly one metadata-only row.
    pub fn rows(&self) -> Vec<ListRow> {
        let metadata = ListRow {
            list_id: self.list_id.clone(),
            list_name: self.name.clone(),
            list_type_id: self.type_id.clone(),
            list_classifier: self.classifier.clone(),
            list_description: self.description.clone(),
            entry_id: None,
            value: None,
            entry_fields: BTreeMap::new(),
        };

        if self.entries.is_empty() {
            return vec![metadata];
        }

        self.entries
            .iter()
            .map(|entry| ListRow {
                entry_id: entry.id.clone(),
                value: entry.value.clone(),
                entry_fields: entry.fields.clone(),
                ..metadata.clone()
            })
            .collect()
    }
}

/// One flattened (list, entry) output row.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ListRow {
    pub list_id: Option<String>,
    pub list_name: Option<String>,
    pub list_type_id: Option<String>,
    pub list_classifier: Option<String>,
    pub list_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(flatten)]
    pub entry_fields: BTreeMap<String, Value>,
}
