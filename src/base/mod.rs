//! Foundation types for the USFM3 toolchain.
//!
//! This module provides fundamental types used throughout the parser:
//! - [`TextRange`], [`TextSize`] - Source positions (byte offsets)
//! - [`Point`], [`Span`] - Row/column positions
//! - [`LineIndex`] - Byte offset to row/column conversion
//! - [`Edit`], [`EditError`] - Text mutation deltas handed to the reparser
//! - [`SourceBuffer`] - A text buffer that produces [`Edit`]s
//!
//! This module has NO dependencies on other usfm3 modules.

mod buffer;
mod edit;
mod line_index;
mod position;

pub use buffer::SourceBuffer;
pub use edit::{Edit, EditError};
pub use line_index::LineIndex;
pub use position::{Point, Span};

// Re-export text-size types for convenience
pub use text_size;
pub use text_size::{TextRange, TextSize};
