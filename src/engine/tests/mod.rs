use serde_json::{Value, json};

use super::*;
use crate::types::{PropertyValues, ResolvedValues};

mod formats;

pub(crate) fn rule_group() -> Value {
    json!({
        "@id": "g1",
        "@name": "Group1",
        "@enabled": "true",
        "@defaultRights": "2",
        "rules": {
            "rule": {
                "@id": "r1",
                "@name": "Rule1",
                "@enabled": "true",
                "condition": {
                    "expressions": {
                        "conditionExpression": {
                            "@prefix": "URL",
                            "@operatorId": "equals",
                            "propertyInstance": {
                                "@propertyId": "URL.Host",
                                "parameters": {
                                    "entry": {
                                        "string": "domain",
                                        "parameter": {
                                            "@valueType": "value",
                                            "value": {"listValue": {"@id": "list1"}}
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    })
}

pub(crate) fn lists_with_entries() -> Value {
    json!({
        "entry": [
            {
                "list": {
                    "@name": "Test List",
                    "@id": "list1",
                    "@typeId": "A",
                    "@classifier": "string",
                    "description": "desc",
                    "content": {
                        "listEntry": [
                            {"@id": "entry1", "value": "example.com"},
                            {"@id": "entry2", "value": "example.org"}
                        ]
                    }
                }
            }
        ]
    })
}

pub(crate) fn combined_document() -> Value {
    json!({
        "libraryContent": {
            "ruleGroup": rule_group(),
            "lists": lists_with_entries()
        }
    })
}

#[test]
fn test_parse_resolves_lists() {
    let export = PolicyExport::from_value(combined_document());
    let data = export.parse();

    assert_eq!(data.groups.len(), 1);
    assert_eq!(data.rules.len(), 1);

    let condition = data.rules[0].condition.as_ref().unwrap();
    let Some(ResolvedValues::Entries(entries)) = &condition.lists_resolved else {
        panic!("expected resolved entries");
    };
    let values: Vec<&str> = entries.iter().filter_map(|e| e.value.as_deref()).collect();
    assert_eq!(values, vec!["example.com", "example.org"]);

    // The raw reference survives next to the resolution.
    assert_eq!(
        condition.property_values,
        Some(PropertyValues::Single("list1".to_string()))
    );
}

#[test]
fn test_empty_list_is_recorded_and_resolvable() {
    let mut doc = combined_document();
    doc["libraryContent"]["lists"] = json!({
        "entry": [
            {
                "list": {
                    "@name": "Test List",
                    "@id": "list1",
                    "@typeId": "A",
                    "@classifier": "string",
                    "description": "desc",
                    "content": {"listEntry": []}
                }
            }
        ]
    });
    let export = PolicyExport::from_value(doc);
    let data = export.parse();

    assert_eq!(data.lists.len(), 1);
    assert_eq!(data.lists[0].list_id.as_deref(), Some("list1"));
    assert_eq!(data.lists[0].entry_id, None);

    let condition = data.rules[0].condition.as_ref().unwrap();
    let Some(ResolvedValues::Entries(entries)) = &condition.lists_resolved else {
        panic!("expected resolved entries");
    };
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].list_id.as_deref(), Some("list1"));
}

#[test]
fn test_unknown_reference_stays_raw() {
    let mut doc = combined_document();
    // Point the rule at a list that is not defined anywhere.
    doc["libraryContent"]["ruleGroup"]["rules"]["rule"]["condition"]["expressions"]
        ["conditionExpression"]["propertyInstance"]["parameters"]["entry"]["parameter"]["value"]
        ["listValue"]["@id"] = json!("ghost");
    let export = PolicyExport::from_value(doc);
    let data = export.parse();

    let condition = data.rules[0].condition.as_ref().unwrap();
    assert!(condition.lists_resolved.is_none());
    assert_eq!(
        condition.property_values,
        Some(PropertyValues::Single("ghost".to_string()))
    );
}

#[test]
fn test_empty_document_is_a_valid_degenerate_case() {
    let export = PolicyExport::from_value(json!({}));
    let data = export.parse();
    assert!(data.groups.is_empty());
    assert!(data.rules.is_empty());
    assert!(data.lists.is_empty());
    assert!(data.configurations.is_empty());

    let export = PolicyExport::from_value(json!({"libraryContent": {}}));
    assert!(export.parse().rules.is_empty());
}

#[test]
fn test_parse_is_idempotent() {
    let export = PolicyExport::from_value(combined_document());
    assert_eq!(export.parse(), export.parse());
}

#[test]
fn test_partition_by_kind() {
    let export = PolicyExport::from_value(combined_document());
    let data = export.parse();
    assert!(data.groups.iter().all(|r| r.item.kind == ItemKind::Group));
    assert!(data.rules.iter().all(|r| r.item.kind == ItemKind::Rule));
}

#[test]
fn test_group_without_rules_emits_single_row() {
    let export = PolicyExport::from_value(json!({
        "libraryContent": {
            "ruleGroup": {"@id": "g1", "@name": "Lonely", "rules": {}}
        }
    }));
    let data = export.parse();
    assert_eq!(data.groups.len(), 1);
    assert!(data.rules.is_empty());
    assert!(data.groups[0].condition.is_none());
}

#[test]
fn test_configurations_pipeline() {
    let mut doc = combined_document();
    doc["libraryContent"]["configurations"] = json!({
        "configuration": {
            "@id": "conf1",
            "@name": "Sample Config",
            "@templateId": "tmpl",
            "configurationProperties": {
                "configurationProperty": {"@key": "prop1", "value": "val1"}
            }
        }
    });
    let export = PolicyExport::from_value(doc);
    let data = export.parse();

    assert_eq!(data.configurations.len(), 1);
    let conf = &data.configurations[0];
    assert_eq!(conf.id.as_deref(), Some("conf1"));
    assert_eq!(conf.template_id.as_deref(), Some("tmpl"));
    assert_eq!(conf.properties.len(), 1);
    assert_eq!(conf.properties[0].key.as_deref(), Some("prop1"));
    assert_eq!(conf.properties[0].value.as_deref(), Some("val1"));
}

#[test]
fn test_list_catalog_accessor() {
    let export = PolicyExport::from_value(combined_document());
    let catalog = export.list_catalog();
    assert!(catalog.contains("list1"));
    assert_eq!(catalog.get("list1").unwrap().len(), 2);
    assert!(!catalog.contains("ghost"));
}

#[test]
fn test_condition_row_shape() {
    let export = PolicyExport::from_value(combined_document());
    let rows = export.policy_rows();
    let condition = rows[1].condition.as_ref().unwrap();
    insta::assert_json_snapshot!(condition, @r###"
    {
      "index": 1,
      "parent_index": null,
      "prefix": "URL",
      "open_bracket": 0,
      "close_bracket": 0,
      "property": "URL.Host",
      "operator": "equals",
      "property_values": "list1"
    }
    "###);
}
