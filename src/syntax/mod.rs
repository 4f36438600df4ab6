//! Document trees and their versions.
//!
//! [`Tree`] wraps a parsed document for consumers: typed access, offset
//! queries, diagnostics with rows and columns, and incremental updates
//! through [`parse_incremental`].

pub mod diagnostic;
pub mod edit;
pub mod tree;

pub use diagnostic::{Diagnostic, RelatedDiagnostic};
pub use edit::parse_incremental;
pub use tree::Tree;

pub use crate::parser::ParserConfig;

// Re-export Point and Span from base for convenience
pub use crate::base::{Point, Span};
