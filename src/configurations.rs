//! Standalone configuration-block extraction.
//!
//! Configurations are independent of the rule tree; this is a one-level
//! flatten that shares the same ambiguous-cardinality decoding as the
//! other parsers.

use serde_json::Value;
use tracing::debug;

use crate::document::{NodeExt, ensure_sequence};
use crate::engine::ParseOptions;
use crate::types::{ConfigurationProperty, ConfigurationRecord};

/// Extract the configuration blocks from a decoded document.
pub fn parse_configurations(doc: &Value, _options: &ParseOptions) -> Vec<ConfigurationRecord> {
    let configs = ensure_sequence(
        doc.child("libraryContent")
            .and_then(|c| c.child("configurations"))
            .and_then(|c| c.child("configuration")),
    );

    let records: Vec<ConfigurationRecord> = configs
        .into_iter()
        .filter(|conf| conf.is_object())
        .map(|conf| ConfigurationRecord {
            id: conf.attr("id"),
            name: conf.attr("name"),
            version: conf.attr("version"),
            mwg_version: conf.attr("mwg-version"),
            template_id: conf.attr("templateId"),
            target_id: conf.attr("targetId"),
            description: conf.child_text("description"),
            properties: parse_properties(conf),
        })
        .collect();

    debug!(
        event = "Configurations",
        phase = "Parse",
        records = records.len(),
        "extracted configuration blocks"
    );

    records
}

fn parse_properties(conf: &Value) -> Vec<ConfigurationProperty> {
    ensure_sequence(
        conf.child("configurationProperties")
            .and_then(|props| props.child("configurationProperty")),
    )
    .into_iter()
    .filter(|prop| prop.is_object())
    .map(|prop| ConfigurationProperty {
        key: prop.attr("key"),
        // The value is an element child in XML exports and may appear as
        // an attribute in older JSON ones.
        value: prop.child_text("value").or_else(|| prop.attr("value")),
        property_type: prop.attr("type"),
        encrypted: prop.attr_bool("encrypted"),
        list_type: prop.attr("listType"),
    })
    .collect()
}
