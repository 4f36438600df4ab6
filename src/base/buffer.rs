//! Owned source text that records its own edits.

use text_size::{TextRange, TextSize};

use super::edit::{Edit, EditError};
use super::line_index::LineIndex;
use super::position::Point;

/// An editable text buffer.
///
/// Hosts that already own their text only need [`Edit`]; this buffer is a
/// convenience for callers that want the text and its edit deltas kept in
/// one place.
#[derive(Debug, Clone)]
pub struct SourceBuffer {
    text: String,
    line_index: LineIndex,
}

impl SourceBuffer {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let line_index = LineIndex::new(&text);
        Self { text, line_index }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> TextSize {
        TextSize::of(self.text.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    pub fn point(&self, offset: TextSize) -> Point {
        self.line_index.point(offset)
    }

    pub fn offset(&self, point: Point) -> Option<TextSize> {
        self.line_index.offset(point)
    }

    pub fn slice(&self, range: TextRange) -> Option<&str> {
        self.text.get(std::ops::Range::<usize>::from(range))
    }

    /// The character starting at `offset`, if any
    pub fn char_at(&self, offset: TextSize) -> Option<char> {
        self.text.get(usize::from(offset)..)?.chars().next()
    }

    /// Replace `range` with `new_text` and return the edit that describes it.
    pub fn edit(&mut self, range: TextRange, new_text: &str) -> Result<Edit, EditError> {
        for offset in [range.start(), range.end()] {
            if offset > self.len() {
                return Err(EditError::OutOfBounds {
                    offset: offset.into(),
                    len: self.len().into(),
                });
            }
            if !self.text.is_char_boundary(offset.into()) {
                return Err(EditError::NotCharBoundary {
                    offset: offset.into(),
                });
            }
        }
        let edit = Edit::replace(&self.line_index, range, new_text);
        self.text.replace_range(std::ops::Range::<usize>::from(range), new_text);
        self.line_index = LineIndex::new(&self.text);
        Ok(edit)
    }

    pub fn insert(&mut self, offset: TextSize, text: &str) -> Result<Edit, EditError> {
        self.edit(TextRange::empty(offset), text)
    }

    pub fn delete(&mut self, range: TextRange) -> Result<Edit, EditError> {
        self.edit(range, "")
    }
}
