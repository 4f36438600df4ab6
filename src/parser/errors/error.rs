//! Syntax error values
//!
//! Recoverable problems in the input are data, collected next to the tree.
//! Each carries a code, a severity derived from it, an optional hint and
//! the locations it relates to ("opened here").

use std::fmt;

use rowan::{TextRange, TextSize};

use super::codes::{ErrorCode, ErrorKind};
use super::context::ParseContext;

/// Severity level for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize))]
#[cfg_attr(feature = "interchange", serde(rename_all = "lowercase"))]
pub enum Severity {
    #[default]
    Error,
    /// Implicit closes and crossed spans; the tree is still usable
    Warning,
}

impl Severity {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

/// A second location an error points at, e.g. the opener of a span that
/// was never closed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedInfo {
    pub message: String,
    pub range: TextRange,
}

impl RelatedInfo {
    pub fn new(message: impl Into<String>, range: TextRange) -> Self {
        Self {
            message: message.into(),
            range,
        }
    }
}

/// A syntax diagnostic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub range: TextRange,
    pub code: ErrorCode,
    pub severity: Severity,
    /// How to fix the input, when there is an obvious way
    pub hint: Option<String>,
    pub related: Vec<RelatedInfo>,
}

impl SyntaxError {
    /// Create an error at the code's default severity
    pub fn new(message: impl Into<String>, range: TextRange, code: ErrorCode) -> Self {
        Self::builder(code).message(message).range(range).build()
    }

    pub fn builder(code: ErrorCode) -> SyntaxErrorBuilder {
        SyntaxErrorBuilder {
            code,
            message: None,
            range: None,
            hint: None,
            related: Vec::new(),
        }
    }

    pub fn with_related(mut self, info: RelatedInfo) -> Self {
        self.related.push(info);
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.code.kind()
    }

    pub fn has_hint(&self) -> bool {
        self.hint.is_some()
    }

    pub fn has_related(&self) -> bool {
        !self.related.is_empty()
    }

    /// Move this error and its related spans by `delta` bytes
    ///
    /// Used when text before the error grew or shrank.
    pub fn shifted(mut self, delta: i64) -> Self {
        self.range = shift_range(self.range, delta);
        for info in &mut self.related {
            info.range = shift_range(info.range, delta);
        }
        self
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.severity.as_str(), self.code, self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, "\n  hint: {hint}")?;
        }
        Ok(())
    }
}

fn shift_range(range: TextRange, delta: i64) -> TextRange {
    let start = (i64::from(u32::from(range.start())) + delta).max(0) as u32;
    TextRange::at(TextSize::new(start), range.len())
}

pub struct SyntaxErrorBuilder {
    code: ErrorCode,
    message: Option<String>,
    range: Option<TextRange>,
    hint: Option<String>,
    related: Vec<RelatedInfo>,
}

impl SyntaxErrorBuilder {
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn range(mut self, range: TextRange) -> Self {
        self.range = Some(range);
        self
    }

    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn related(mut self, message: impl Into<String>, range: TextRange) -> Self {
        self.related.push(RelatedInfo::new(message, range));
        self
    }

    /// A missing message falls back to the code's default and a missing
    /// range to offset zero
    pub fn build(self) -> SyntaxError {
        SyntaxError {
            message: self
                .message
                .unwrap_or_else(|| self.code.default_message().to_string()),
            range: self.range.unwrap_or_default(),
            code: self.code,
            severity: self.code.default_severity(),
            hint: self.hint,
            related: self.related,
        }
    }
}

/// Error for a marker found where its context does not allow it
pub fn format_context_error(found: &str, context: ParseContext, code: ErrorCode) -> SyntaxErrorBuilder {
    let message = format!(
        "unexpected {found} {}, expected {}",
        context.description(),
        context.expected_description()
    );
    SyntaxError::builder(code).message(message)
}
