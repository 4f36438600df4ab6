//! Diagnostics with editor coordinates

use crate::base::{LineIndex, Point};
use crate::parser::{ErrorCode, Severity, SyntaxError};

/// A [`SyntaxError`] resolved to rows and columns
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize))]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub severity: Severity,
    pub message: String,
    #[cfg_attr(feature = "interchange", serde(skip_serializing_if = "Option::is_none"))]
    pub hint: Option<String>,
    /// Byte offsets of the range
    pub start_offset: u32,
    pub end_offset: u32,
    pub start: Point,
    pub end: Point,
    #[cfg_attr(feature = "interchange", serde(skip_serializing_if = "Vec::is_empty"))]
    pub related: Vec<RelatedDiagnostic>,
}

/// A related location, e.g. where an unclosed marker was opened
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize))]
pub struct RelatedDiagnostic {
    pub message: String,
    pub start: Point,
    pub end: Point,
}

impl Diagnostic {
    pub fn from_error(error: &SyntaxError, index: &LineIndex) -> Self {
        Self {
            code: error.code,
            severity: error.severity,
            message: error.message.clone(),
            hint: error.hint.clone(),
            start_offset: error.range.start().into(),
            end_offset: error.range.end().into(),
            start: index.point(error.range.start()),
            end: index.point(error.range.end()),
            related: error
                .related
                .iter()
                .map(|info| RelatedDiagnostic {
                    message: info.message.clone(),
                    start: index.point(info.range.start()),
                    end: index.point(info.range.end()),
                })
                .collect(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity.is_error()
    }
}
