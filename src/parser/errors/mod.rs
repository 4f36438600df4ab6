//! Parser error handling module
//!
//! Diagnostics for malformed USFM3:
//! - Categorized error codes for filtering and documentation
//! - Context-aware error messages ("in footnote", "in table row")
//! - Hints for common mistakes
//! - Related span tracking ("opened here" for unclosed markers)

mod codes;
mod context;
mod error;

pub use codes::{ErrorCode, ErrorKind};
pub use context::ParseContext;
pub use error::{RelatedInfo, Severity, SyntaxError, SyntaxErrorBuilder, format_context_error};
