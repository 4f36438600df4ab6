//! Typed AST wrappers over the untyped rowan CST.
//!
//! This module provides strongly-typed accessors for USFM3 syntax nodes.
//! Each struct wraps a SyntaxNode and provides methods to access children.
//! Wrappers never fail on malformed input: missing parts come back as `None`.

use indexmap::IndexMap;
use smol_str::SmolStr;

use super::lexer::marker_name;
use super::markers::MarkerTable;
use super::syntax_kind::SyntaxKind;
use super::{SyntaxNode, SyntaxToken};

/// Trait for AST nodes that wrap a SyntaxNode
pub trait AstNode: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;
    fn cast(node: SyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &SyntaxNode;
}

/// Nodes opened by a marker token
pub trait HasMarker: AstNode {
    /// The opening marker token (`\p`, `\+bd`, `\zaln-s`)
    fn marker_token(&self) -> Option<SyntaxToken> {
        direct_token(self.syntax(), SyntaxKind::MARKER)
    }

    /// Marker name without backslash or `+`
    fn marker(&self) -> Option<SmolStr> {
        self.marker_token().map(|t| SmolStr::new(marker_name(t.text())))
    }

    /// Whether the marker carries the `+` prefix of nested spans
    fn is_nested(&self) -> bool {
        self.marker_token().is_some_and(|t| t.text().starts_with("\\+"))
    }

    /// The explicit closer (`\bd*`, `\f*`, `\*`), if one was written
    fn closer_token(&self) -> Option<SyntaxToken> {
        self.syntax()
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .filter(|t| matches!(t.kind(), SyntaxKind::MARKER_CLOSE | SyntaxKind::MILESTONE_END))
            .last()
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn direct_token(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| t.kind() == kind)
}

fn token_text(node: &SyntaxNode, kind: SyntaxKind) -> Option<SmolStr> {
    direct_token(node, kind).map(|t| SmolStr::new(t.text()))
}

fn unquote(text: &str) -> &str {
    text.strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(text)
}

// ============================================================================
// Helper macros
// ============================================================================

macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(SyntaxNode);

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                kind == SyntaxKind::$kind
            }

            fn cast(node: SyntaxNode) -> Option<Self> {
                if Self::can_cast(node.kind()) {
                    Some(Self(node))
                } else {
                    None
                }
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

macro_rules! has_marker {
    ($($name:ident),* $(,)?) => {
        $(impl HasMarker for $name {})*
    };
}

// ============================================================================
// Content
// ============================================================================

/// Any node that can appear as content of a document, book, chapter or
/// block
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Content {
    Book(Book),
    Chapter(Chapter),
    Paragraph(Paragraph),
    Table(Table),
    Sidebar(Sidebar),
    Verse(Verse),
    CharacterSpan(CharacterSpan),
    Footnote(Footnote),
    CrossReference(CrossReference),
    NoteChar(NoteChar),
    Milestone(Milestone),
    AttributeList(AttributeList),
    Text(TextRun),
    Error(ErrorNode),
}

impl AstNode for Content {
    fn can_cast(kind: SyntaxKind) -> bool {
        matches!(
            kind,
            SyntaxKind::BOOK
                | SyntaxKind::CHAPTER
                | SyntaxKind::PARAGRAPH
                | SyntaxKind::TABLE
                | SyntaxKind::SIDEBAR
                | SyntaxKind::VERSE
                | SyntaxKind::CHARACTER_SPAN
                | SyntaxKind::FOOTNOTE
                | SyntaxKind::CROSS_REFERENCE
                | SyntaxKind::NOTE_CHAR
                | SyntaxKind::MILESTONE
                | SyntaxKind::ATTRIBUTE_LIST
                | SyntaxKind::TEXT_RUN
                | SyntaxKind::ERROR
        )
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::BOOK => Some(Self::Book(Book(node))),
            SyntaxKind::CHAPTER => Some(Self::Chapter(Chapter(node))),
            SyntaxKind::PARAGRAPH => Some(Self::Paragraph(Paragraph(node))),
            SyntaxKind::TABLE => Some(Self::Table(Table(node))),
            SyntaxKind::SIDEBAR => Some(Self::Sidebar(Sidebar(node))),
            SyntaxKind::VERSE => Some(Self::Verse(Verse(node))),
            SyntaxKind::CHARACTER_SPAN => Some(Self::CharacterSpan(CharacterSpan(node))),
            SyntaxKind::FOOTNOTE => Some(Self::Footnote(Footnote(node))),
            SyntaxKind::CROSS_REFERENCE => Some(Self::CrossReference(CrossReference(node))),
            SyntaxKind::NOTE_CHAR => Some(Self::NoteChar(NoteChar(node))),
            SyntaxKind::MILESTONE => Some(Self::Milestone(Milestone(node))),
            SyntaxKind::ATTRIBUTE_LIST => Some(Self::AttributeList(AttributeList(node))),
            SyntaxKind::TEXT_RUN => Some(Self::Text(TextRun(node))),
            SyntaxKind::ERROR => Some(Self::Error(ErrorNode(node))),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::Book(n) => n.syntax(),
            Self::Chapter(n) => n.syntax(),
            Self::Paragraph(n) => n.syntax(),
            Self::Table(n) => n.syntax(),
            Self::Sidebar(n) => n.syntax(),
            Self::Verse(n) => n.syntax(),
            Self::CharacterSpan(n) => n.syntax(),
            Self::Footnote(n) => n.syntax(),
            Self::CrossReference(n) => n.syntax(),
            Self::NoteChar(n) => n.syntax(),
            Self::Milestone(n) => n.syntax(),
            Self::AttributeList(n) => n.syntax(),
            Self::Text(n) => n.syntax(),
            Self::Error(n) => n.syntax(),
        }
    }
}

fn contents(node: &SyntaxNode) -> impl Iterator<Item = Content> + '_ {
    node.children().filter_map(Content::cast)
}

// ============================================================================
// Document structure
// ============================================================================

ast_node!(Document, DOCUMENT);

impl Document {
    pub fn books(&self) -> impl Iterator<Item = Book> + '_ {
        self.0.children().filter_map(Book::cast)
    }

    /// Top-level content, including anything before the first `\id`
    pub fn contents(&self) -> impl Iterator<Item = Content> + '_ {
        contents(&self.0)
    }

    /// Every chapter, whether inside a book or not
    pub fn chapters(&self) -> impl Iterator<Item = Chapter> + '_ {
        self.0.descendants().filter_map(Chapter::cast)
    }
}

ast_node!(Book, BOOK);

impl Book {
    pub fn header(&self) -> Option<BookHeader> {
        self.0.children().find_map(BookHeader::cast)
    }

    /// Book code from the `\id` line (`GEN`)
    pub fn code(&self) -> Option<SmolStr> {
        self.header().and_then(|h| h.code())
    }

    pub fn chapters(&self) -> impl Iterator<Item = Chapter> + '_ {
        self.0.children().filter_map(Chapter::cast)
    }

    pub fn contents(&self) -> impl Iterator<Item = Content> + '_ {
        contents(&self.0)
    }
}

ast_node!(BookHeader, BOOK_HEADER);

impl BookHeader {
    pub fn code(&self) -> Option<SmolStr> {
        token_text(&self.0, SyntaxKind::BOOK_CODE)
    }

    /// Free text after the book code, trimmed
    pub fn description(&self) -> Option<String> {
        let run = self.0.children().find_map(TextRun::cast)?;
        let text = run.text();
        let trimmed = text.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

ast_node!(Chapter, CHAPTER);

impl Chapter {
    pub fn number(&self) -> Option<SmolStr> {
        token_text(&self.0, SyntaxKind::CHAPTER_NUMBER)
    }

    pub fn paragraphs(&self) -> impl Iterator<Item = Paragraph> + '_ {
        self.0.children().filter_map(Paragraph::cast)
    }

    /// Verses at any depth below this chapter
    pub fn verses(&self) -> impl Iterator<Item = Verse> + '_ {
        self.0.descendants().filter_map(Verse::cast)
    }

    pub fn contents(&self) -> impl Iterator<Item = Content> + '_ {
        contents(&self.0)
    }
}

ast_node!(Paragraph, PARAGRAPH);

impl Paragraph {
    pub fn verses(&self) -> impl Iterator<Item = Verse> + '_ {
        self.0.children().filter_map(Verse::cast)
    }

    pub fn contents(&self) -> impl Iterator<Item = Content> + '_ {
        contents(&self.0)
    }
}

ast_node!(Verse, VERSE);

impl Verse {
    /// Verse number as written (`1`, `1-2`, `3a`)
    pub fn number(&self) -> Option<SmolStr> {
        token_text(&self.0, SyntaxKind::VERSE_NUMBER)
    }

    pub fn contents(&self) -> impl Iterator<Item = Content> + '_ {
        contents(&self.0)
    }
}

// ============================================================================
// Tables and sidebars
// ============================================================================

ast_node!(Table, TABLE);

impl Table {
    pub fn rows(&self) -> impl Iterator<Item = TableRow> + '_ {
        self.0.children().filter_map(TableRow::cast)
    }
}

ast_node!(TableRow, TABLE_ROW);

impl TableRow {
    pub fn cells(&self) -> impl Iterator<Item = TableCell> + '_ {
        self.0.children().filter_map(TableCell::cast)
    }
}

ast_node!(TableCell, TABLE_CELL);

impl TableCell {
    /// Header cells are `\th#`
    pub fn is_header(&self) -> bool {
        self.marker().is_some_and(|m| m.starts_with("th"))
    }

    pub fn contents(&self) -> impl Iterator<Item = Content> + '_ {
        contents(&self.0)
    }
}

ast_node!(Sidebar, SIDEBAR);

impl Sidebar {
    pub fn contents(&self) -> impl Iterator<Item = Content> + '_ {
        contents(&self.0)
    }

    /// Whether the sidebar was ended by `\esbe`
    pub fn is_terminated(&self) -> bool {
        self.0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .any(|t| t.kind() == SyntaxKind::MARKER && marker_name(t.text()) == "esbe")
    }
}

// ============================================================================
// Notes
// ============================================================================

ast_node!(Footnote, FOOTNOTE);
ast_node!(CrossReference, CROSS_REFERENCE);

impl Footnote {
    pub fn caller(&self) -> Option<SmolStr> {
        token_text(&self.0, SyntaxKind::NOTE_CALLER)
    }

    pub fn note_chars(&self) -> impl Iterator<Item = NoteChar> + '_ {
        self.0.children().filter_map(NoteChar::cast)
    }
}

impl CrossReference {
    pub fn caller(&self) -> Option<SmolStr> {
        token_text(&self.0, SyntaxKind::NOTE_CALLER)
    }

    pub fn note_chars(&self) -> impl Iterator<Item = NoteChar> + '_ {
        self.0.children().filter_map(NoteChar::cast)
    }
}

ast_node!(NoteChar, NOTE_CHAR);

impl NoteChar {
    pub fn contents(&self) -> impl Iterator<Item = Content> + '_ {
        contents(&self.0)
    }

    /// Plain text of the note character, markers excluded
    pub fn text(&self) -> String {
        plain_text(&self.0)
    }
}

// ============================================================================
// Character spans and milestones
// ============================================================================

ast_node!(CharacterSpan, CHARACTER_SPAN);

impl CharacterSpan {
    pub fn attributes(&self) -> Option<AttributeList> {
        self.0.children().find_map(AttributeList::cast)
    }

    pub fn contents(&self) -> impl Iterator<Item = Content> + '_ {
        contents(&self.0)
    }

    /// Plain text of the span, markers and attributes excluded
    pub fn text(&self) -> String {
        plain_text(&self.0)
    }
}

ast_node!(Milestone, MILESTONE);

impl Milestone {
    pub fn attributes(&self) -> Option<AttributeList> {
        self.0.children().find_map(AttributeList::cast)
    }

    /// Start milestone of a pair (`\qt-s`)
    pub fn is_start(&self) -> bool {
        self.marker().is_some_and(|m| m.ends_with("-s"))
    }

    /// End milestone of a pair (`\qt-e`)
    pub fn is_end(&self) -> bool {
        self.marker().is_some_and(|m| m.ends_with("-e"))
    }
}

has_marker!(
    BookHeader,
    Chapter,
    Paragraph,
    Verse,
    TableRow,
    TableCell,
    Sidebar,
    Footnote,
    CrossReference,
    NoteChar,
    CharacterSpan,
    Milestone,
);

// ============================================================================
// Attributes
// ============================================================================

ast_node!(AttributeList, ATTRIBUTE_LIST);

impl AttributeList {
    pub fn attributes(&self) -> impl Iterator<Item = Attribute> + '_ {
        self.0.children().filter_map(Attribute::cast)
    }

    pub fn default_attribute(&self) -> Option<DefaultAttribute> {
        self.0.children().find_map(DefaultAttribute::cast)
    }

    /// Marker name of the span or milestone the list belongs to
    pub fn owner_marker(&self) -> Option<SmolStr> {
        let parent = self.0.parent()?;
        direct_token(&parent, SyntaxKind::MARKER).map(|t| SmolStr::new(marker_name(t.text())))
    }

    /// Attributes in source order
    ///
    /// A default attribute is stored under the owner marker's default
    /// attribute name (`lemma` for `\w`), or under `default` when the
    /// marker has none.
    pub fn to_map(&self, markers: &MarkerTable) -> IndexMap<SmolStr, String> {
        let mut map = IndexMap::new();
        if let Some(default) = self.default_attribute() {
            let name = self
                .owner_marker()
                .and_then(|m| markers.lookup(&m).default_attribute)
                .unwrap_or_else(|| SmolStr::new_static("default"));
            map.insert(name, default.value());
        }
        for attribute in self.attributes() {
            if let Some(name) = attribute.name() {
                map.insert(name, attribute.value().unwrap_or_default());
            }
        }
        map
    }
}

ast_node!(Attribute, ATTRIBUTE);

impl Attribute {
    pub fn name(&self) -> Option<SmolStr> {
        token_text(&self.0, SyntaxKind::ATTR_NAME)
    }

    /// Value without its quotes
    pub fn value(&self) -> Option<String> {
        direct_token(&self.0, SyntaxKind::ATTR_VALUE).map(|t| unquote(t.text()).to_string())
    }
}

ast_node!(DefaultAttribute, DEFAULT_ATTRIBUTE);

impl DefaultAttribute {
    pub fn value(&self) -> String {
        unquote(&self.0.text().to_string()).to_string()
    }
}

// ============================================================================
// Text and errors
// ============================================================================

ast_node!(TextRun, TEXT_RUN);

impl TextRun {
    pub fn text(&self) -> String {
        self.0.text().to_string()
    }
}

ast_node!(ErrorNode, ERROR);

impl ErrorNode {
    /// Zero-width errors mark implicit closes and missing arguments
    pub fn is_empty(&self) -> bool {
        self.0.text_range().is_empty()
    }
}

/// Concatenated text of every `TEXT_RUN` below `node`
fn plain_text(node: &SyntaxNode) -> String {
    node.descendants()
        .filter_map(TextRun::cast)
        .map(|run| run.text())
        .collect()
}
