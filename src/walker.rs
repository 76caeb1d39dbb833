//! Rule-tree traversal.
//!
//! The walker descends the nested group/rule structure depth-first in
//! pre-order, visiting every key of every node generically rather than
//! dispatching on a known schema. A node carrying a name attribute and a
//! nested `rules`/`ruleGroups` collection is a group; any other named node
//! is a rule. Each visited item emits one flattened row per condition
//! expression (or a single placeholder row when it has no condition), with
//! item metadata on the first row only.

use serde_json::Value;
use tracing::{debug, warn};

use crate::condition::parse_condition;
use crate::document::NodeExt;
use crate::engine::ParseOptions;
use crate::types::{GroupFlags, ItemKind, PolicyItem, PolicyRow, RulePayload};

/// Child-collection keys whose presence marks a named node as a group.
const GROUP_CHILD_KEYS: [&str; 2] = ["rules", "ruleGroups"];

/// Flatten the rule tree rooted at `root` into ordered policy rows.
///
/// A missing root is the valid degenerate case of a document without
/// policy data and yields an empty sequence.
pub fn walk_rule_tree(root: Option<&Value>, options: &ParseOptions) -> Vec<PolicyRow> {
    let Some(root) = root else {
        return Vec::new();
    };

    let mut walker = TreeWalker {
        options,
        path: Vec::new(),
        rows: Vec::new(),
    };
    walker.visit(root);

    debug!(
        event = "RuleTree",
        phase = "Walk",
        rows = walker.rows.len(),
        "flattened rule tree"
    );

    walker.rows
}

struct TreeWalker<'a> {
    options: &'a ParseOptions,
    path: Vec<String>,
    rows: Vec<PolicyRow>,
}

impl TreeWalker<'_> {
    fn visit(&mut self, node: &Value) {
        match node {
            Value::Object(map) => {
                let name = node.attr("name");
                let is_group = name.is_some()
                    && GROUP_CHILD_KEYS.iter().any(|key| map.contains_key(*key));

                if let Some(name) = &name {
                    self.emit_item(node, name, is_group);
                }

                if is_group && let Some(name) = &name {
                    self.path.push(name.clone());
                }

                for value in map.values() {
                    self.visit(value);
                }

                if is_group && name.is_some() {
                    self.path.pop();
                }
            }
            Value::Array(items) => {
                for item in items {
                    self.visit(item);
                }
            }
            _ => {}
        }
    }

    fn emit_item(&mut self, node: &Value, name: &str, is_group: bool) {
        let set = parse_condition(node.child("condition"), self.options);
        if !set.residual_scopes.is_empty() {
            warn!(
                event = "RuleTree",
                phase = "Condition",
                item = name,
                residual = set.residual_scopes.len(),
                "condition left bracket scopes open"
            );
        }

        // A group's path includes its own name; a rule's path is its
        // ancestor groups only.
        let path = if is_group {
            let mut segments = self.path.clone();
            segments.push(name.to_string());
            segments.join(&self.options.path_separator)
        } else {
            self.path.join(&self.options.path_separator)
        };

        let item = PolicyItem {
            item_id: node.attr("id"),
            kind: if is_group {
                ItemKind::Group
            } else {
                ItemKind::Rule
            },
            name: Some(name.to_string()),
            path,
            enabled: node.attr_bool("enabled"),
            description: node.child_text("description"),
            group: is_group.then(|| GroupFlags {
                default_rights: node.attr("defaultRights"),
                cycle_request: node.attr("cycleRequest"),
                cycle_response: node.attr("cycleResponse"),
                cycle_embedded_object: node.attr("cycleEmbeddedObject"),
                cloud_synced: node.attr("cloudSynced"),
                ac_elements: node.child("acElements").cloned(),
            }),
            rule: (!is_group).then(|| RulePayload {
                action_container: node.child("actionContainer").cloned(),
                immediate_actions: node.child("immediateActionContainers").cloned(),
            }),
        };

        if set.rows.is_empty() {
            self.rows.push(PolicyRow {
                item,
                condition: None,
            });
            return;
        }

        for (position, row) in set.rows.into_iter().enumerate() {
            let metadata = if position == 0 {
                item.clone()
            } else {
                item.continuation()
            };
            self.rows.push(PolicyRow {
                item: metadata,
                condition: Some(row),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn walk(root: Value) -> Vec<PolicyRow> {
        walk_rule_tree(Some(&root), &ParseOptions::default())
    }

    #[test]
    fn test_missing_root_yields_empty() {
        assert!(walk_rule_tree(None, &ParseOptions::default()).is_empty());
    }

    #[test]
    fn test_group_without_rules_or_conditions_emits_one_row() {
        let rows = walk(json!({
            "@id": "g1",
            "@name": "Empty Group",
            "@enabled": "true",
            "rules": null
        }));
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.item.kind, ItemKind::Group);
        assert_eq!(row.item.item_id.as_deref(), Some("g1"));
        assert_eq!(row.item.name.as_deref(), Some("Empty Group"));
        assert_eq!(row.item.path, "Empty Group");
        assert_eq!(row.item.enabled, Some(true));
        assert!(row.condition.is_none());
    }

    #[test]
    fn test_rule_path_excludes_own_name() {
        let rows = walk(json!({
            "@id": "g1",
            "@name": "Group1",
            "rules": {
                "rule": {
                    "@id": "r1",
                    "@name": "Rule1",
                    "@enabled": "false"
                }
            }
        }));
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].item.kind, ItemKind::Group);
        assert_eq!(rows[0].item.path, "Group1");

        assert_eq!(rows[1].item.kind, ItemKind::Rule);
        assert_eq!(rows[1].item.name.as_deref(), Some("Rule1"));
        assert_eq!(rows[1].item.path, "Group1");
        assert_eq!(rows[1].item.enabled, Some(false));
        assert!(rows[1].item.rule.is_some());
        assert!(rows[1].item.group.is_none());
    }

    #[test]
    fn test_nested_group_paths() {
        let rows = walk(json!({
            "@name": "Top",
            "ruleGroups": {
                "ruleGroup": {
                    "@name": "Sub",
                    "rules": {
                        "rule": [
                            {"@id": "r1", "@name": "First"},
                            {"@id": "r2", "@name": "Second"}
                        ]
                    }
                }
            }
        }));
        let paths: Vec<(&str, &str)> = rows
            .iter()
            .map(|r| {
                (
                    r.item.name.as_deref().unwrap(),
                    r.item.path.as_str(),
                )
            })
            .collect();
        assert_eq!(
            paths,
            vec![
                ("Top", "Top"),
                ("Sub", "Top > Sub"),
                ("First", "Top > Sub"),
                ("Second", "Top > Sub"),
            ]
        );
    }

    #[test]
    fn test_multi_expression_condition_emits_row_per_expression() {
        let rows = walk(json!({
            "@name": "Group1",
            "rules": {
                "rule": {
                    "@id": "r1",
                    "@name": "Rule1",
                    "@enabled": "true",
                    "description": "two expressions",
                    "condition": {
                        "expressions": {
                            "conditionExpression": [
                                {
                                    "@openingBracketCount": "1",
                                    "@operatorId": "equals",
                                    "propertyInstance": {"@propertyId": "A"}
                                },
                                {
                                    "@closingBracketCount": "1",
                                    "@operatorId": "equals",
                                    "propertyInstance": {"@propertyId": "B"}
                                }
                            ]
                        }
                    }
                }
            }
        }));
        // One group row plus two rule rows.
        assert_eq!(rows.len(), 3);

        let first = &rows[1];
        assert_eq!(first.item.item_id.as_deref(), Some("r1"));
        assert_eq!(first.item.name.as_deref(), Some("Rule1"));
        assert_eq!(first.item.description.as_deref(), Some("two expressions"));
        assert_eq!(first.condition.as_ref().unwrap().index, 1);

        // Metadata appears once per item; continuation rows keep only
        // kind and path.
        let second = &rows[2];
        assert_eq!(second.item.item_id, None);
        assert_eq!(second.item.name, None);
        assert_eq!(second.item.description, None);
        assert_eq!(second.item.kind, ItemKind::Rule);
        assert_eq!(second.item.path, "Group1");
        let cond = second.condition.as_ref().unwrap();
        assert_eq!(cond.index, 2);
        assert_eq!(cond.parent_index, Some(1));
    }

    #[test]
    fn test_group_flags_are_mirrored() {
        let rows = walk(json!({
            "@id": "g1",
            "@name": "Group1",
            "@defaultRights": "2",
            "@cycleRequest": "true",
            "@cycleResponse": "false",
            "@cloudSynced": "true",
            "acElements": {"@count": "3"},
            "rules": {}
        }));
        let flags = rows[0].item.group.as_ref().unwrap();
        assert_eq!(flags.default_rights.as_deref(), Some("2"));
        assert_eq!(flags.cycle_request.as_deref(), Some("true"));
        assert_eq!(flags.cycle_response.as_deref(), Some("false"));
        assert_eq!(flags.cloud_synced.as_deref(), Some("true"));
        assert!(flags.ac_elements.is_some());
    }

    #[test]
    fn test_rule_action_payloads_pass_through() {
        let action = json!({"@id": "a1", "action": {"@name": "Allow"}});
        let rows = walk(json!({
            "@name": "Group1",
            "rules": {
                "rule": {
                    "@name": "Rule1",
                    "actionContainer": action.clone()
                }
            }
        }));
        // The generic walk also discovers the named node inside the action
        // payload, so the payload itself still arrives unmodified on the
        // rule row.
        let rule_row = rows
            .iter()
            .find(|r| r.item.name.as_deref() == Some("Rule1"))
            .unwrap();
        assert_eq!(
            rule_row.item.rule.as_ref().unwrap().action_container,
            Some(action)
        );
    }

    #[test]
    fn test_generic_descent_finds_named_nodes_under_unknown_keys() {
        let rows = walk(json!({
            "@name": "Top",
            "rules": {},
            "customContainer": {
                "wrapped": {"@name": "Hidden Rule", "@id": "h1"}
            }
        }));
        let names: Vec<&str> = rows
            .iter()
            .map(|r| r.item.name.as_deref().unwrap())
            .collect();
        assert_eq!(names, vec!["Top", "Hidden Rule"]);
        assert_eq!(rows[1].item.kind, ItemKind::Rule);
        assert_eq!(rows[1].item.path, "Top");
    }

    #[test]
    fn test_custom_path_separator() {
        let options = ParseOptions {
            path_separator: " / ".to_string(),
            ..ParseOptions::default()
        };
        let root = json!({
            "@name": "Top",
            "ruleGroups": {
                "ruleGroup": {"@name": "Sub", "rules": {}}
            }
        });
        let rows = walk_rule_tree(Some(&root), &options);
        assert_eq!(rows[1].item.path, "Top / Sub");
    }
}
