//! # usfm3-syntax
//!
//! Lossless, incremental parsing of USFM3 scripture markup.
//!
//! Every byte of the input lands in a rowan tree, malformed markup
//! included: problems become `ERROR` nodes and diagnostics, never panics.
//! After an edit only the smallest enclosing book, chapter, paragraph,
//! table or sidebar is reparsed and the rest of the previous tree is
//! shared.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! interchange → USJ / USX export (feature `interchange`)
//!   ↓
//! language    → Kind enumeration, marker table, scanner for external runtimes
//!   ↓
//! syntax      → Tree, incremental parsing, diagnostics
//!   ↓
//! parser      → Logos lexer, sub-scanner, recursive-descent parser, AST
//!   ↓
//! base        → Primitives (TextRange, LineIndex, Edit, SourceBuffer)
//! ```
//!
//! ## Usage
//!
//! ```
//! use usfm3::base::SourceBuffer;
//! use usfm3::{TextRange, TextSize};
//!
//! let mut buffer = SourceBuffer::new("\\id GEN\n\\c 1\n\\p \\v 1 In the beginning\n");
//! let tree = usfm3::parse(buffer.text());
//! assert!(tree.ok());
//!
//! let edit = buffer
//!     .edit(TextRange::new(TextSize::new(21), TextSize::new(23)), "At")
//!     .unwrap();
//! let next = usfm3::parse_incremental(buffer.text(), &tree, &[edit]).unwrap();
//! assert_eq!(next.generation(), 1);
//! assert!(next.structurally_eq(&usfm3::parse(buffer.text())));
//! ```

// ============================================================================
// MODULES (dependency order: base → parser → syntax → language → interchange)
// ============================================================================

/// Foundation types: TextRange, LineIndex, Edit, SourceBuffer
pub mod base;

/// Parser: Logos lexer, sub-scanner, recursive-descent parser, typed AST
pub mod parser;

/// Syntax: Tree, incremental parsing, diagnostics
pub mod syntax;

/// Grammar descriptor for external parsing runtimes
pub mod language;

/// Scripture interchange formats: USJ, USX
#[cfg(feature = "interchange")]
pub mod interchange;

use std::sync::Arc;

use rayon::prelude::*;

// Re-export foundation types
pub use base::{Edit, EditError, LineIndex, Point, SourceBuffer, Span, TextRange, TextSize};

// Re-export the tree surface
pub use parser::{ErrorCode, ParserConfig, Severity, SyntaxError, SyntaxKind, SyntaxNode};
pub use syntax::{Diagnostic, Tree, parse_incremental};

/// Parse a document with the standard USFM3 marker table
pub fn parse(text: &str) -> Tree {
    Tree::parse(text, Arc::new(ParserConfig::default()))
}

/// Parse a document with custom markers or limits
pub fn parse_with_config(text: &str, config: ParserConfig) -> Tree {
    Tree::parse(text, Arc::new(config))
}

/// Parse independent documents in parallel
///
/// Trees come back in input order and share one configuration.
pub fn parse_many(texts: &[&str], config: ParserConfig) -> Vec<Tree> {
    let config = Arc::new(config);
    texts
        .par_iter()
        .map(|text| Tree::parse(text, config.clone()))
        .collect()
}
