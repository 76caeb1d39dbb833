//! Output record types for the policy inventory.
//!
//! Everything here is a plain serde-serializable record: the flattened
//! policy rows a spreadsheet writer or relational store consumes verbatim,
//! the condition rows carrying tree-position metadata, and the list and
//! configuration records. Records are created once per parse invocation
//! and never mutated afterwards (the list resolver attaches a new field,
//! it does not rewrite existing ones).

mod condition;
mod configuration;
mod item;
mod list;

pub use condition::{
    ConditionRow, ExpressionMode, NamedParameter, ParamValue, PropertyEval, PropertyValues,
    ResolvedElement, ResolvedValues,
};
pub(crate) use condition::{DEFAULT_OPERATOR, UNKNOWN_PROPERTY};
pub use configuration::{ConfigurationProperty, ConfigurationRecord};
pub use item::{GroupFlags, ItemKind, PolicyItem, PolicyRow, RulePayload};
pub use list::{ListDefinition, ListEntry, ListRow};
