use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Serialize, Deserialize)]
pub enum PolicyError {
    #[error("failed to decode JSON document: {0}")]
    JsonDecode(String),

    #[error("failed to decode XML document: {0}")]
    XmlDecode(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

impl From<serde_json::Error> for PolicyError {
    fn from(err: serde_json::Error) -> Self {
        PolicyError::JsonDecode(err.to_string())
    }
}

impl From<quick_xml::Error> for PolicyError {
    fn from(err: quick_xml::Error) -> Self {
        PolicyError::XmlDecode(err.to_string())
    }
}
