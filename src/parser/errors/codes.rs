//! Error code definitions for parser diagnostics
//!
//! Error codes follow a naming convention: U{category}{number}
//! - U01xx: Lexical errors
//! - U02xx: Marker balance errors (closers, unclosed spans, nesting)
//! - U03xx: Attribute errors
//! - U04xx: Structural errors (placement, missing arguments)
//! - U09xx: Internal errors

use std::fmt;

/// Error codes for parser diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize))]
pub enum ErrorCode {
    // =========================================================================
    // U01xx: Lexical errors
    // =========================================================================
    /// Backslash not followed by a marker name
    U0101,
    /// Quoted attribute value without a closing quote
    U0102,

    // =========================================================================
    // U02xx: Marker balance
    // =========================================================================
    /// Closer with no open marker of that name
    U0201,
    /// Marker closed implicitly where it needed its own closer
    U0202,
    /// Closer for a marker that is not the innermost open one
    U0203,
    /// `\*` or `\esbe` with nothing to terminate
    U0204,

    // =========================================================================
    // U03xx: Attributes
    // =========================================================================
    /// Attribute text that is neither `key="value"` pairs nor a default value
    U0301,

    // =========================================================================
    // U04xx: Structure
    // =========================================================================
    /// Marker not permitted in the current context
    U0401,
    /// Chapter number, verse number, book code or note caller missing
    U0402,

    // =========================================================================
    // U09xx: Internal
    // =========================================================================
    /// Internal parser error
    U0999,
}

/// Diagnostic taxonomy the codes belong to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    LexError,
    UnmatchedCloser,
    UnclosedMarker,
    AmbiguousNesting,
    AttributeMalformed,
    Structure,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 10] = [
        Self::U0101,
        Self::U0102,
        Self::U0201,
        Self::U0202,
        Self::U0203,
        Self::U0204,
        Self::U0301,
        Self::U0401,
        Self::U0402,
        Self::U0999,
    ];

    /// Get the string representation of the error code (e.g., "U0201")
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::U0101 => "U0101",
            Self::U0102 => "U0102",
            Self::U0201 => "U0201",
            Self::U0202 => "U0202",
            Self::U0203 => "U0203",
            Self::U0204 => "U0204",
            Self::U0301 => "U0301",
            Self::U0401 => "U0401",
            Self::U0402 => "U0402",
            Self::U0999 => "U0999",
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::U0101 | Self::U0102 => ErrorKind::LexError,
            Self::U0201 | Self::U0204 => ErrorKind::UnmatchedCloser,
            Self::U0202 => ErrorKind::UnclosedMarker,
            Self::U0203 => ErrorKind::AmbiguousNesting,
            Self::U0301 => ErrorKind::AttributeMalformed,
            Self::U0401 | Self::U0402 | Self::U0999 => ErrorKind::Structure,
        }
    }

    /// Get a short description of the error category
    pub fn category_description(&self) -> &'static str {
        match self {
            Self::U0101 | Self::U0102 => "lexical error",
            Self::U0201 | Self::U0202 | Self::U0203 | Self::U0204 => "marker balance error",
            Self::U0301 => "attribute error",
            Self::U0401 | Self::U0402 => "structural error",
            Self::U0999 => "syntax error",
        }
    }

    /// Get the default message template for this error code
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::U0101 => "backslash without a marker name",
            Self::U0102 => "unterminated attribute value",
            Self::U0201 => "closing marker without a matching opener",
            Self::U0202 => "unclosed marker",
            Self::U0203 => "closing marker crosses an inner span",
            Self::U0204 => "terminator without an open milestone or sidebar",
            Self::U0301 => "malformed attribute",
            Self::U0401 => "marker not permitted here",
            Self::U0402 => "missing marker argument",
            Self::U0999 => "internal parser error",
        }
    }

    /// Severity a diagnostic with this code is reported at
    pub fn default_severity(&self) -> super::Severity {
        match self {
            Self::U0202 | Self::U0203 => super::Severity::Warning,
            _ => super::Severity::Error,
        }
    }

    /// Check if this is a marker balance error
    pub fn is_balance(&self) -> bool {
        matches!(self, Self::U0201 | Self::U0202 | Self::U0203 | Self::U0204)
    }

    /// Check if this is a recoverable error (parsing can continue)
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::U0999)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
