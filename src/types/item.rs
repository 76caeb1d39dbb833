//! Policy items (rule groups and rules) and their flattened output rows.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

use super::condition::ConditionRow;

/// Whether a policy item is a rule group or an individual rule.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Group,
    Rule,
}

/// Structural flags only rule groups carry, mirrored from the source schema.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
pub struct GroupFlags {
    pub default_rights: Option<String>,
    pub cycle_request: Option<String>,
    pub cycle_response: Option<String>,
    pub cycle_embedded_object: Option<String>,
    pub cloud_synced: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub ac_elements: Option<Value>,
}

/// Action payloads only rules carry. Opaque; passed through unmodified so
/// a storage adapter can persist them verbatim.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
pub struct RulePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub action_container: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub immediate_actions: Option<Value>,
}

/// A rule group or rule, identified and placed on its breadcrumb path.
///
/// `path` joins ancestor group names from the document root; a group's
/// path includes its own name, a rule's does not. Identity fields are
/// `None` on continuation rows (every output row of an item after the
/// first), so line-oriented consumers see item metadata exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PolicyItem {
    pub item_id: Option<String>,
    pub kind: ItemKind,
    pub name: Option<String>,
    pub path: String,
    pub enabled: Option<bool>,
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<GroupFlags>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<RulePayload>,
}

impl PolicyItem {
    /// The metadata-blanked copy used for every row after an item's first.
    /// Kind and path stay; identity and payload fields clear.
    pub(crate) fn continuation(&self) -> Self {
        PolicyItem {
            item_id: None,
            kind: self.kind,
            name: None,
            path: self.path.clone(),
            enabled: None,
            description: None,
            group: None,
            rule: None,
        }
    }
}

/// One flattened output row: item metadata plus at most one condition row.
///
/// An item without conditions still emits exactly one row with
/// `condition: None`, so every item is discoverable in the flat output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PolicyRow {
    #[serde(flatten)]
    pub item: PolicyItem,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<ConditionRow>,
}
