//! Text mutation deltas.

use text_size::{TextRange, TextSize};
use thiserror::Error;

use super::line_index::LineIndex;
use super::position::Point;

/// One text mutation, in both byte and row/column coordinates.
///
/// `start_byte..old_end_byte` is the replaced range in the text before the
/// edit; `start_byte..new_end_byte` is the inserted range in the text after
/// it. Several edits applied in sequence are each expressed in the
/// coordinates of the text produced by the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edit {
    pub start_byte: TextSize,
    pub old_end_byte: TextSize,
    pub new_end_byte: TextSize,
    pub start_point: Point,
    pub old_end_point: Point,
    pub new_end_point: Point,
}

/// Errors for edits that cannot describe a change to the given text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// An end offset lies before the start offset.
    #[error("inverted edit range: start {start} is after end {end}")]
    Inverted { start: u32, end: u32 },

    /// An offset lies past the end of the text it refers to.
    #[error("edit offset {offset} is out of bounds for text of length {len}")]
    OutOfBounds { offset: u32, len: u32 },

    /// The edits do not produce a text of the length that was supplied.
    #[error("edits produce a text of length {expected}, but the new text has length {actual}")]
    LengthMismatch { expected: u32, actual: u32 },

    /// An offset splits a UTF-8 character.
    #[error("edit offset {offset} is not on a character boundary")]
    NotCharBoundary { offset: u32 },
}

impl Edit {
    /// Describe replacing `range` of the text indexed by `old` with `new_text`.
    pub fn replace(old: &LineIndex, range: TextRange, new_text: &str) -> Self {
        let start_point = old.point(range.start());
        Self {
            start_byte: range.start(),
            old_end_byte: range.end(),
            new_end_byte: range.start() + TextSize::of(new_text),
            start_point,
            old_end_point: old.point(range.end()),
            new_end_point: start_point.advance(new_text),
        }
    }

    /// Describe inserting `text` at `offset`.
    pub fn insert(old: &LineIndex, offset: TextSize, text: &str) -> Self {
        Self::replace(old, TextRange::empty(offset), text)
    }

    /// Describe deleting `range`.
    pub fn delete(old: &LineIndex, range: TextRange) -> Self {
        Self::replace(old, range, "")
    }

    /// The replaced range in the text before the edit.
    pub fn old_range(&self) -> TextRange {
        TextRange::new(self.start_byte, self.old_end_byte)
    }

    /// The inserted range in the text after the edit.
    pub fn new_range(&self) -> TextRange {
        TextRange::new(self.start_byte, self.new_end_byte)
    }

    /// Check that both end offsets follow the start offset.
    pub fn validate(&self) -> Result<(), EditError> {
        for end in [self.old_end_byte, self.new_end_byte] {
            if end < self.start_byte {
                return Err(EditError::Inverted {
                    start: self.start_byte.into(),
                    end: end.into(),
                });
            }
        }
        Ok(())
    }
}
