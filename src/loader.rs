use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::{Display, EnumString};

use crate::error::PolicyError;
use crate::xml;

/// Text encodings a raw policy export can arrive in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Json,
    Xml,
}

/// Decode raw policy-export text into the generic document value.
///
/// Decoding errors are mapped into [`PolicyError::JsonDecode`] or
/// [`PolicyError::XmlDecode`]. The parsers never see raw text; they always
/// operate on the generic value this function (or the caller's own decoder)
/// produces.
///
/// Example:
/// ```rust
/// use gateview_core::{SourceFormat, decode_document};
/// let doc = decode_document(r#"{"libraryContent": {}}"#, SourceFormat::Json).unwrap();
/// assert!(doc.get("libraryContent").is_some());
///
/// let doc = decode_document("<libraryContent/>", SourceFormat::Xml).unwrap();
/// assert!(doc.get("libraryContent").is_some());
/// ```
pub fn decode_document(text: &str, format: SourceFormat) -> Result<Value, PolicyError> {
    match format {
        SourceFormat::Json => Ok(serde_json::from_str(text)?),
        SourceFormat::Xml => xml::xml_to_value(text),
    }
}
