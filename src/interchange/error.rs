//! Export errors.

use std::string::FromUtf8Error;

use thiserror::Error;

/// Errors from writing USJ or USX
#[derive(Debug, Error)]
pub enum InterchangeError {
    #[error("XML error: {0}")]
    Xml(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The XML writer produced bytes that are not UTF-8
    #[error("USX output is not UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),

    /// A USJ value with the wrong shape; `kind` is `"element"` or `"attribute"`
    #[error("Invalid USJ {kind}: {message}")]
    Invalid { kind: &'static str, message: String },
}

impl InterchangeError {
    pub fn xml(message: impl Into<String>) -> Self {
        Self::Xml(message.into())
    }

    /// A content item that is not a known USJ object or string
    pub fn invalid_element(message: impl Into<String>) -> Self {
        Self::Invalid {
            kind: "element",
            message: message.into(),
        }
    }

    /// A marker or attribute value that is not a string
    pub fn invalid_attribute(message: impl Into<String>) -> Self {
        Self::Invalid {
            kind: "attribute",
            message: message.into(),
        }
    }
}
