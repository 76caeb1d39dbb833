//! Access helpers for the decoded generic document.
//!
//! Policy exports arrive as an untyped `serde_json::Value` tree, either
//! decoded from JSON directly or produced by the XML adapter in [`crate::xml`].
//! Attributes carry an `@` prefix and element text lives under `#text`,
//! so every parser goes through the accessors here instead of reading the
//! map keys by hand.

use serde_json::Value;

/// Normalize an ambiguous one-or-many subtree into an ordered sequence.
///
/// The export encodes singleton children as a bare object and repeated
/// children as an array. `None` and `Null` yield an empty sequence, an
/// array yields its items, and anything else yields a one-element sequence.
pub fn ensure_sequence(value: Option<&Value>) -> Vec<&Value> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().collect(),
        Some(other) => vec![other],
    }
}

/// Render a scalar document value as text.
///
/// Strings pass through, numbers and booleans render in their canonical
/// form. An object produced by the XML adapter for a text node with
/// attributes exposes its `#text` child. Everything else is `None`.
pub(crate) fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Object(map) => map.get("#text").and_then(as_text),
        _ => None,
    }
}

/// Attribute and child accessors over a generic document node.
pub(crate) trait NodeExt {
    /// Direct child lookup by key. `None` unless the node is an object.
    fn child(&self, key: &str) -> Option<&Value>;

    /// Whether the node is an object carrying the given key.
    fn has_key(&self, key: &str) -> bool;

    /// Source attribute (`@`-prefixed key) as text.
    fn attr(&self, name: &str) -> Option<String>;

    /// Source attribute coerced to a boolean; accepts real booleans and
    /// the string forms `"true"`/`"false"` the XML adapter produces.
    fn attr_bool(&self, name: &str) -> Option<bool>;

    /// Source attribute coerced to a non-negative count, defaulting to zero.
    fn attr_count(&self, name: &str) -> u32;

    /// Child rendered as text, unwrapping `#text` nodes.
    fn child_text(&self, key: &str) -> Option<String>;
}

impl NodeExt for Value {
    fn child(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|map| map.get(key))
    }

    fn has_key(&self, key: &str) -> bool {
        self.as_object().is_some_and(|map| map.contains_key(key))
    }

    fn attr(&self, name: &str) -> Option<String> {
        self.child(&format!("@{name}")).and_then(as_text)
    }

    fn attr_bool(&self, name: &str) -> Option<bool> {
        match self.child(&format!("@{name}"))? {
            Value::Bool(b) => Some(*b),
            Value::String(s) => match s.as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    fn attr_count(&self, name: &str) -> u32 {
        match self.child(&format!("@{name}")) {
            Some(Value::Number(n)) => n.as_u64().unwrap_or(0) as u32,
            Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
            _ => 0,
        }
    }

    fn child_text(&self, key: &str) -> Option<String> {
        self.child(key).and_then(as_text)
    }
}
