//! XML to generic-value decoding.
//!
//! Maps an XML policy export onto the same `serde_json::Value` shape the
//! JSON decoder produces: element attributes become `@`-prefixed keys,
//! text content becomes a bare string (or a `#text` key when the element
//! also carries attributes or children), and repeated sibling elements
//! collapse into an array while singletons stay bare objects. The parsers
//! downstream normalize that last ambiguity with
//! [`ensure_sequence`](crate::document::ensure_sequence).

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use serde_json::{Map, Value};

use crate::error::PolicyError;

struct Frame {
    name: String,
    map: Map<String, Value>,
    text: String,
}

fn open_frame(start: &BytesStart) -> Result<Frame, PolicyError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut map = Map::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| PolicyError::XmlDecode(e.to_string()))?;
        let key = format!("@{}", String::from_utf8_lossy(attr.key.as_ref()));
        let value = attr
            .unescape_value()
            .map_err(|e| PolicyError::XmlDecode(e.to_string()))?
            .into_owned();
        map.insert(key, Value::String(value));
    }
    Ok(Frame {
        name,
        map,
        text: String::new(),
    })
}

fn close_frame(mut map: Map<String, Value>, text: String) -> Value {
    let text = text.trim();
    if map.is_empty() {
        if text.is_empty() {
            Value::Null
        } else {
            Value::String(text.to_string())
        }
    } else {
        if !text.is_empty() {
            map.insert("#text".to_string(), Value::String(text.to_string()));
        }
        Value::Object(map)
    }
}

/// Insert a completed child, promoting repeated names into an array.
fn insert_child(map: &mut Map<String, Value>, name: String, value: Value) {
    match map.get_mut(&name) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            map.insert(name, value);
        }
    }
}

/// Decode XML text into the generic document value.
///
/// The result always has the root element's name as its single top-level
/// key, so `<libraryContent>...</libraryContent>` decodes to
/// `{"libraryContent": {...}}` and the parsers address both source formats
/// identically.
pub(crate) fn xml_to_value(text: &str) -> Result<Value, PolicyError> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut root = Map::new();
    let mut stack: Vec<Frame> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(start) => stack.push(open_frame(&start)?),
            Event::Empty(start) => {
                let frame = open_frame(&start)?;
                let value = close_frame(frame.map, frame.text);
                match stack.last_mut() {
                    Some(parent) => insert_child(&mut parent.map, frame.name, value),
                    None => insert_child(&mut root, frame.name, value),
                }
            }
            Event::End(_) => {
                let Some(frame) = stack.pop() else {
                    return Err(PolicyError::XmlDecode(
                        "closing tag without a matching opening tag".to_string(),
                    ));
                };
                let value = close_frame(frame.map, frame.text);
                match stack.last_mut() {
                    Some(parent) => insert_child(&mut parent.map, frame.name, value),
                    None => insert_child(&mut root, frame.name, value),
                }
            }
            Event::Text(t) => {
                if let Some(frame) = stack.last_mut() {
                    frame
                        .text
                        .push_str(&t.unescape().map_err(|e| PolicyError::XmlDecode(e.to_string()))?);
                }
            }
            Event::CData(t) => {
                if let Some(frame) = stack.last_mut() {
                    frame
                        .text
                        .push_str(&String::from_utf8_lossy(&t.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(PolicyError::XmlDecode(format!(
            "unclosed element '{}'",
            stack.last().map(|f| f.name.as_str()).unwrap_or_default()
        )));
    }

    Ok(Value::Object(root))
}
