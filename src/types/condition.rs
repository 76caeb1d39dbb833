//! Condition rows and the recursive value representation.

use std::collections::BTreeMap;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

use super::list::ListRow;

/// Property id recorded when an expression carries no usable identifier.
pub(crate) const UNKNOWN_PROPERTY: &str = "<unknown>";

/// Comparison operator assumed when the source omits one.
pub(crate) const DEFAULT_OPERATOR: &str = "equals";

/// One boolean expression within an item's guard condition.
///
/// `index` is 1-based and contiguous within the owning item; `parent_index`
/// points at the row whose bracket scope encloses this one, `None` at top
/// level. `prefix` is an annotation carried through from the source
/// unchanged; no operator semantics are inferred from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ConditionRow {
    pub index: u32,
    pub parent_index: Option<u32>,
    pub prefix: Option<String>,
    pub open_bracket: u32,
    pub close_bracket: u32,
    pub property: String,
    pub operator: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_values: Option<PropertyValues>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub expression_value: Option<ParamValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression_mode: Option<ExpressionMode>,
    /// Malformed-entry marker. A row carrying an error still occupies its
    /// index so the sequence stays contiguous.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Attached by the list resolver; absent until resolution runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub lists_resolved: Option<ResolvedValues>,
}

impl ConditionRow {
    /// A row for an expression entry whose shape could not be parsed.
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        ConditionRow {
            index: 0,
            parent_index: None,
            prefix: None,
            open_bracket: 0,
            close_bracket: 0,
            property: UNKNOWN_PROPERTY.to_string(),
            operator: DEFAULT_OPERATOR.to_string(),
            property_values: None,
            expression_value: None,
            expression_mode: None,
            error: Some(message.into()),
            lists_resolved: None,
        }
    }
}

/// How an expression's right-hand side was encoded in the source.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ExpressionMode {
    /// A literal or list-reference value wrapper.
    Value,
    /// A nested property evaluation.
    NestedProperty,
    /// No value wrapper; only parameter metadata attributes.
    Meta,
    /// Unrecognized shape, carried through opaquely.
    Unknown,
}

/// Extracted parameter values of one expression, collapsed the way
/// line-oriented consumers expect: a bare scalar when exactly one value
/// was found, an ordered tuple when several.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum PropertyValues {
    Single(String),
    Many(Vec<String>),
}

impl PropertyValues {
    /// Collapse a value list; `None` when it is empty.
    pub fn from_values(mut values: Vec<String>) -> Option<Self> {
        match values.len() {
            0 => None,
            1 => values.pop().map(PropertyValues::Single),
            _ => Some(PropertyValues::Many(values)),
        }
    }

    /// Iterate the values in order regardless of arity.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let slice: &[String] = match self {
            PropertyValues::Single(v) => std::slice::from_ref(v),
            PropertyValues::Many(vs) => vs,
        };
        slice.iter().map(String::as_str)
    }

    /// Comma-joined rendering for spreadsheet-style consumers.
    pub fn joined(&self) -> String {
        self.iter().join(", ")
    }
}

/// The three-way recursive value representation used by condition
/// parameters: a literal string, a reference to a named list, or a nested
/// property evaluation. `Meta` covers expression parameters that carry
/// only identifier attributes, `Opaque` preserves anything unrecognized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParamValue {
    Literal {
        value: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        modifier: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        type_id: Option<String>,
    },
    List {
        list_id: String,
    },
    Property(PropertyEval),
    Meta {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value_type: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        type_id: Option<String>,
    },
    Opaque {
        raw: Value,
    },
}

impl ParamValue {
    /// The expression mode this value shape corresponds to.
    pub fn mode(&self) -> ExpressionMode {
        match self {
            ParamValue::Literal { .. } | ParamValue::List { .. } => ExpressionMode::Value,
            ParamValue::Property(_) => ExpressionMode::NestedProperty,
            ParamValue::Meta { .. } => ExpressionMode::Meta,
            ParamValue::Opaque { .. } => ExpressionMode::Unknown,
        }
    }

    /// The scalar a value contributes to the collapsed `property_values`
    /// set: the literal text or the referenced list id. Nested and opaque
    /// values contribute nothing.
    pub fn scalar(&self) -> Option<&str> {
        match self {
            ParamValue::Literal { value, .. } => value.as_deref(),
            ParamValue::List { list_id } => Some(list_id),
            _ => None,
        }
    }
}

/// A nested property evaluation inside a parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyEval {
    pub property: String,
    /// Pass-through attributes of the nested instance, property id excluded.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<NamedParameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter: Option<Box<ParamValue>>,
}

/// One entry of a property's named-parameter map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedParameter {
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_type: Option<String>,
    pub value: ParamValue,
}

/// Resolution result attached to a condition row.
///
/// A single reference resolves to the referenced list's flattened rows; a
/// tuple resolves element-wise, non-matching elements passing through as
/// their original strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResolvedValues {
    Entries(Vec<ListRow>),
    Mixed(Vec<ResolvedElement>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResolvedElement {
    Entries(Vec<ListRow>),
    Value(String),
}
