//! Core library for Gateview: parsing and condition-tree resolution for
//! hierarchical security-gateway policy exports. The crate consumes a
//! decoded generic document (or raw JSON/XML text) and produces flattened,
//! path-annotated policy rows, reconstructed condition trees, named-list
//! rows, and configuration records. It opens no sockets and writes no
//! files; adapters around it do.

pub use condition::{ExpressionSet, parse_condition};
pub use configurations::parse_configurations;
pub use document::ensure_sequence;
pub use engine::{ParseOptions, PolicyData, PolicyExport};
pub use error::PolicyError;
pub use lists::{ListCatalog, parse_list_definitions, parse_lists};
pub use loader::{SourceFormat, decode_document};
pub use resolver::resolve_lists;
pub use types::{
    ConditionRow, ConfigurationProperty, ConfigurationRecord, ExpressionMode, GroupFlags,
    ItemKind, ListDefinition, ListEntry, ListRow, NamedParameter, ParamValue, PolicyItem,
    PolicyRow, PropertyEval, PropertyValues, ResolvedElement, ResolvedValues, RulePayload,
};
pub use walker::walk_rule_tree;

mod condition;
mod configurations;
mod document;
mod engine;
mod error;
mod lists;
mod loader;
mod resolver;
mod types;
mod walker;
mod xml;
