//! Named-list extraction and the per-parse catalog.

use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, warn};

use crate::document::{NodeExt, as_text, ensure_sequence};
use crate::engine::ParseOptions;
use crate::types::{ListDefinition, ListEntry, ListRow};

/// Extract the named list definitions from a decoded document.
///
/// A document without a `libraryContent.lists` container yields an empty
/// sequence; an entry that does not wrap a list object is skipped with a
/// warning.
pub fn parse_list_definitions(doc: &Value, _options: &ParseOptions) -> Vec<ListDefinition> {
    let entries = ensure_sequence(
        doc.child("libraryContent")
            .and_then(|c| c.child("lists"))
            .and_then(|l| l.child("entry")),
    );

    let mut definitions = Vec::with_capacity(entries.len());
    for item in entries {
        let Some(list) = item.child("list").filter(|l| l.is_object()) else {
            warn!(
                event = "ListCatalog",
                phase = "Parse",
                "list entry without a list object, skipping"
            );
            continue;
        };

        let entries = ensure_sequence(
            list.child("content")
                .and_then(|content| content.child("listEntry")),
        )
        .into_iter()
        .filter_map(parse_entry)
        .collect();

        definitions.push(ListDefinition {
            list_id: list.attr("id"),
            name: list.attr("name"),
            type_id: list.attr("typeId"),
            classifier: list.attr("classifier"),
            description: list.child_text("description"),
            entries,
        });
    }

    debug!(
        event = "ListCatalog",
        phase = "Parse",
        definitions = definitions.len(),
        "extracted list definitions"
    );

    definitions
}

fn parse_entry(entry: &Value) -> Option<ListEntry> {
    let map = entry.as_object()?;
    let fields = map
        .iter()
        .filter(|(k, _)| *k != "@id" && *k != "value")
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    Some(ListEntry {
        id: entry.attr("id"),
        value: entry.child("value").and_then(as_text),
        fields,
    })
}

/// Flatten the document's list definitions into (list, entry) rows.
pub fn parse_lists(doc: &Value, options: &ParseOptions) -> Vec<ListRow> {
    parse_list_definitions(doc, options)
        .iter()
        .flat_map(ListDefinition::rows)
        .collect()
}

/// The `list_id → rows` lookup the resolver consults.
///
/// Owned by a single parse invocation; concurrent parses of different
/// documents each build their own catalog.
#[derive(Debug, Default, Clone)]
pub struct ListCatalog {
    lists: HashMap<String, Vec<ListRow>>,
}

impl ListCatalog {
    /// Build a catalog from flattened list rows. Rows without a list id
    /// are ignored.
    pub fn from_rows(rows: &[ListRow]) -> Self {
        let mut catalog = ListCatalog::default();
        catalog.load(rows);
        catalog
    }

    /// Add flattened rows to the catalog, grouping them by list id.
    pub fn load(&mut self, rows: &[ListRow]) {
        for row in rows {
            let Some(list_id) = &row.list_id else {
                continue;
            };
            self.lists
                .entry(list_id.clone())
                .or_default()
                .push(row.clone());
        }
    }

    pub fn get(&self, list_id: &str) -> Option<&[ListRow]> {
        self.lists.get(list_id).map(Vec::as_slice)
    }

    pub fn contains(&self, list_id: &str) -> bool {
        self.lists.contains_key(list_id)
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }
}
