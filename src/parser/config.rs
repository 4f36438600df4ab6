//! Parser configuration

use super::markers::MarkerTable;

/// Options that shape how markers are classified and nested
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// Marker name to class lookup
    pub markers: MarkerTable,
    /// Openers deeper than this many frames are treated as not permitted
    pub max_nesting_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            markers: MarkerTable::usfm3(),
            max_nesting_depth: 64,
        }
    }
}

impl ParserConfig {
    pub fn with_markers(mut self, markers: MarkerTable) -> Self {
        self.markers = markers;
        self
    }

    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }
}
