//! Immutable parse trees.
//!
//! A [`Tree`] is one version of a document: the green tree, its diagnostics,
//! a generation counter and the configuration it was parsed with. Trees
//! are `Send + Sync`; red nodes are created on demand and stay on the
//! thread that created them.

use std::sync::{Arc, OnceLock};

use rowan::{GreenNode, NodeOrToken, TextRange, TextSize};

use crate::base::{Edit, EditError, LineIndex};
use crate::parser::{
    AstNode, Document, ErrorNode, ParserConfig, SyntaxError, SyntaxNode, parse_document,
};

use super::diagnostic::Diagnostic;

/// One parsed version of a USFM3 document
#[derive(Debug, Clone)]
pub struct Tree {
    green: GreenNode,
    errors: Arc<[SyntaxError]>,
    generation: u64,
    config: Arc<ParserConfig>,
    line_index: OnceLock<Arc<LineIndex>>,
}

impl Tree {
    /// Parse `text` from scratch
    pub fn parse(text: &str, config: Arc<ParserConfig>) -> Self {
        let parse = parse_document(text, &config);
        Self::new(parse.green, parse.errors, 0, config)
    }

    pub(crate) fn new(
        green: GreenNode,
        errors: Vec<SyntaxError>,
        generation: u64,
        config: Arc<ParserConfig>,
    ) -> Self {
        Self {
            green,
            errors: errors.into(),
            generation,
            config,
            line_index: OnceLock::new(),
        }
    }

    /// The same tree published as the next generation
    pub(crate) fn next_generation(&self) -> Self {
        Self {
            generation: self.generation + 1,
            ..self.clone()
        }
    }

    /// Apply `edits` that turned this tree's text into `text`
    pub fn edit(&self, text: &str, edits: &[Edit]) -> Result<Tree, EditError> {
        super::edit::parse_incremental(text, self, edits)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Root `DOCUMENT` node
    pub fn root(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    /// Typed root; `None` only for trees not built by the document parser
    pub fn document(&self) -> Option<Document> {
        Document::cast(self.root())
    }

    pub fn green(&self) -> &GreenNode {
        &self.green
    }

    /// Incremented by every parse derived from this tree
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn config(&self) -> &Arc<ParserConfig> {
        &self.config
    }

    /// Diagnostics sorted by start offset
    pub fn errors(&self) -> &[SyntaxError] {
        &self.errors
    }

    /// No diagnostics at all, warnings included
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// The document text; equal to the parsed input
    pub fn text(&self) -> String {
        self.root().text().to_string()
    }

    pub fn len(&self) -> TextSize {
        self.green.text_len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == TextSize::new(0)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Innermost node whose range contains `offset`
    ///
    /// At a boundary between two tokens the token to the right wins.
    pub fn node_at_offset(&self, offset: TextSize) -> Option<SyntaxNode> {
        if offset > self.len() {
            return None;
        }
        let root = self.root();
        match root.token_at_offset(offset).right_biased() {
            Some(token) => token.parent(),
            None => Some(root),
        }
    }

    /// Smallest node that covers `range`
    pub fn covering_node(&self, range: TextRange) -> Option<SyntaxNode> {
        if range.end() > self.len() {
            return None;
        }
        match self.root().covering_element(range) {
            NodeOrToken::Node(node) => Some(node),
            NodeOrToken::Token(token) => token.parent(),
        }
    }

    /// Every `ERROR` node, in document order
    pub fn error_nodes(&self) -> Vec<ErrorNode> {
        self.root()
            .descendants()
            .filter_map(ErrorNode::cast)
            .collect()
    }

    pub fn line_index(&self) -> &LineIndex {
        self.line_index
            .get_or_init(|| Arc::new(LineIndex::new(&self.text())))
    }

    /// Diagnostics with row and column positions
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let index = self.line_index();
        self.errors
            .iter()
            .map(|error| Diagnostic::from_error(error, index))
            .collect()
    }

    /// Same green tree and same diagnostics; generations are ignored
    pub fn structurally_eq(&self, other: &Tree) -> bool {
        self.green == other.green && self.errors == other.errors
    }
}
