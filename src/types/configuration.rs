//! Standalone configuration blocks and their property entries.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One key/value property of a configuration block.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
pub struct ConfigurationProperty {
    pub key: Option<String>,
    pub value: Option<String>,
    #[serde(rename = "type")]
    pub property_type: Option<String>,
    pub encrypted: Option<bool>,
    pub list_type: Option<String>,
}

/// A named configuration block, independent of the rule tree.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
pub struct ConfigurationRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    pub version: Option<String>,
    pub mwg_version: Option<String>,
    pub template_id: Option<String>,
    pub target_id: Option<String>,
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<ConfigurationProperty>,
}
