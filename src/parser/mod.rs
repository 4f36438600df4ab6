//! Rowan-based incremental parser for USFM3
//!
//! This module provides a lossless, incremental parser using:
//! - **logos** for fast lexing
//! - **rowan** for the CST (Concrete Syntax Tree)
//!
//! The CST keeps every byte of the input, including whitespace and
//! malformed markers, and a typed AST layer is extracted on top.
//!
//! ## Architecture
//!
//! ```text
//! Source Text
//!     ↓
//! Lexer (logos) → context-free Tokens with SyntaxKind
//!     ↓
//! Parser + SubScanner (marker stack) → GreenNode tree
//!     ↓
//! SyntaxNode (rowan) → CST with parent pointers
//!     ↓
//! AST layer → Typed wrappers over SyntaxNode
//! ```
//!
//! ## Incremental Reparsing
//!
//! When text changes, we:
//! 1. Merge the edits into one invalidated span
//! 2. Reparse the smallest book, chapter, paragraph, table or sidebar
//!    covering it, under the frames its ancestors keep open
//! 3. Splice the new nodes in and reuse every other green node

#[allow(clippy::module_inception)]
mod parser;

pub mod ast;
pub mod config;
pub mod errors;
pub mod lexer;
pub mod markers;
pub mod reparse;
pub mod rule_parser;
pub mod scanner;
mod syntax_kind;

pub use ast::*;
pub use config::ParserConfig;
pub use errors::{ErrorCode, ErrorKind, ParseContext, RelatedInfo, Severity, SyntaxError};
pub use lexer::{Lexer, Token, next_token};
pub use markers::{MarkerClass, MarkerInfo, MarkerTable};
pub use parser::{Parse, parse_document};
pub use syntax_kind::{
    SyntaxElement, SyntaxKind, SyntaxNode, SyntaxNodeChildren, SyntaxToken, UsfmLanguage,
};

/// Re-export rowan types for convenience
pub use rowan::{GreenNode, TextRange, TextSize};
