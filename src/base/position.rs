//! Row/column tracking for nodes and edits
//!
//! Rows and columns are 0-indexed; columns count bytes, matching the
//! coordinates editors send alongside byte offsets.

/// A span between two points in source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: Point,
    pub end: Point,
}

/// A position in source text (0-indexed row, byte column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize))]
pub struct Point {
    pub row: usize,
    pub column: usize,
}

impl Span {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Create a span from row/column coordinates
    pub fn from_coords(start_row: usize, start_col: usize, end_row: usize, end_col: usize) -> Self {
        Self {
            start: Point::new(start_row, start_col),
            end: Point::new(end_row, end_col),
        }
    }

    /// Check if a point falls within this span
    pub fn contains(&self, point: Point) -> bool {
        self.start <= point && point <= self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl Point {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    /// The point reached after writing `text` starting at `self`
    pub fn advance(self, text: &str) -> Self {
        match text.rfind('\n') {
            Some(last) => Self {
                row: self.row + text.matches('\n').count(),
                column: text.len() - last - 1,
            },
            None => Self {
                row: self.row,
                column: self.column + text.len(),
            },
        }
    }
}
