//! Byte offset to row/column conversion

use text_size::TextSize;

use super::position::Point;

/// Line start table for one version of a text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    /// Byte offsets where each line starts
    line_starts: Vec<TextSize>,
    len: TextSize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![TextSize::new(0)];
        for (pos, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(TextSize::new(pos as u32 + 1));
            }
        }
        Self {
            line_starts,
            len: TextSize::of(text),
        }
    }

    /// Convert a byte offset to a point, clamping past-the-end offsets
    pub fn point(&self, offset: TextSize) -> Point {
        let offset = offset.min(self.len);
        let row = self
            .line_starts
            .binary_search(&offset)
            .unwrap_or_else(|i| i - 1);
        let column = offset - self.line_starts[row];
        Point::new(row, u32::from(column) as usize)
    }

    /// Convert a point back to a byte offset
    ///
    /// Returns `None` when the row does not exist or the column runs past
    /// the end of its line.
    pub fn offset(&self, point: Point) -> Option<TextSize> {
        let start = *self.line_starts.get(point.row)?;
        let line_end = self
            .line_starts
            .get(point.row + 1)
            .copied()
            .unwrap_or(self.len);
        let offset = start + TextSize::try_from(point.column).ok()?;
        (offset <= line_end).then_some(offset)
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    pub fn line_start(&self, row: usize) -> Option<TextSize> {
        self.line_starts.get(row).copied()
    }

    pub fn len(&self) -> TextSize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == TextSize::new(0)
    }
}
