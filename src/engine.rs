use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::configurations::parse_configurations;
use crate::document::NodeExt;
use crate::error::PolicyError;
use crate::lists::{ListCatalog, parse_list_definitions, parse_lists};
use crate::loader::{SourceFormat, decode_document};
use crate::resolver::resolve_lists;
use crate::types::{ConfigurationRecord, ItemKind, ListDefinition, ListRow, PolicyRow};
use crate::walker::walk_rule_tree;

/// Immutable knobs for one parse invocation.
///
/// Passed explicitly into the parsers instead of living in process-wide
/// mutable state, so concurrent parses of different documents cannot
/// observe each other.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOptions {
    /// Separator between breadcrumb path segments.
    pub path_separator: String,
    /// Bound on nested-property recursion inside condition values.
    /// Practical documents nest well below ten levels; past the bound the
    /// subtree is preserved opaquely instead of recursed into.
    pub max_value_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            path_separator: " > ".to_string(),
            max_value_depth: 64,
        }
    }
}

/// Everything one parse produces, ready for verbatim persistence or
/// re-encoding by an adapter layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyData {
    pub groups: Vec<PolicyRow>,
    pub rules: Vec<PolicyRow>,
    pub lists: Vec<ListRow>,
    pub configurations: Vec<ConfigurationRecord>,
}

/// One decoded policy export. The main library handle.
///
/// Construction decodes (or adopts) the document once; the accessor
/// methods are read-only passes over it, so the handle can be queried
/// repeatedly and shared freely across threads.
#[derive(Debug, Clone)]
pub struct PolicyExport {
    doc: Value,
    options: ParseOptions,
}

impl PolicyExport {
    /// Adopt an already-decoded generic document.
    pub fn from_value(doc: Value) -> Self {
        PolicyExport {
            doc,
            options: ParseOptions::default(),
        }
    }

    /// Decode raw text in the given format.
    pub fn from_source(text: &str, format: SourceFormat) -> Result<Self, PolicyError> {
        Ok(Self::from_value(decode_document(text, format)?))
    }

    /// Decode a JSON export.
    pub fn from_json_str(text: &str) -> Result<Self, PolicyError> {
        Self::from_source(text, SourceFormat::Json)
    }

    /// Decode an XML export.
    pub fn from_xml_str(text: &str) -> Result<Self, PolicyError> {
        Self::from_source(text, SourceFormat::Xml)
    }

    /// Replace the parse options for subsequent calls.
    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    /// The decoded document. Never mutated by any parser.
    pub fn document(&self) -> &Value {
        &self.doc
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    fn rule_root(&self) -> Option<&Value> {
        self.doc
            .child("libraryContent")
            .and_then(|content| content.child("ruleGroup"))
    }

    /// Named list definitions with their ordered entries.
    pub fn list_definitions(&self) -> Vec<ListDefinition> {
        parse_list_definitions(&self.doc, &self.options)
    }

    /// Flattened (list, entry) rows.
    pub fn lists(&self) -> Vec<ListRow> {
        parse_lists(&self.doc, &self.options)
    }

    /// A fresh catalog over this document's lists. Each call builds its
    /// own instance; nothing is cached between invocations.
    pub fn list_catalog(&self) -> ListCatalog {
        ListCatalog::from_rows(&self.lists())
    }

    /// Configuration blocks with their property entries.
    pub fn configurations(&self) -> Vec<ConfigurationRecord> {
        parse_configurations(&self.doc, &self.options)
    }

    /// Flattened policy rows without list resolution applied.
    pub fn policy_rows(&self) -> Vec<PolicyRow> {
        walk_rule_tree(self.rule_root(), &self.options)
    }

    /// Run the full pipeline: lists, configurations, rule-tree walk, and
    /// list resolution over the emitted rows.
    pub fn parse(&self) -> PolicyData {
        debug!(event = "PolicyExport", phase = "Parse", "starting full parse");

        let lists = self.lists();
        let catalog = ListCatalog::from_rows(&lists);
        let configurations = self.configurations();

        let mut rows = self.policy_rows();
        resolve_lists(&mut rows, &catalog);

        let (groups, rules) = rows
            .into_iter()
            .partition(|row| row.item.kind == ItemKind::Group);

        debug!(
            event = "PolicyExport",
            phase = "Done",
            lists = lists.len(),
            configurations = configurations.len(),
            "full parse complete"
        );

        PolicyData {
            groups,
            rules,
            lists,
            configurations,
        }
    }
}

#[cfg(test)]
mod tests;
