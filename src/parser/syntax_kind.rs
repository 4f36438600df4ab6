//! Syntax kinds for the Rowan-based CST
//!
//! This enum defines all possible node and token kinds in the syntax tree.
//! It follows the USFM3 document hierarchy: book, chapter, block, verse,
//! note, character span.

/// All syntax kinds (tokens and nodes) in USFM3
///
/// Tokens are leaf nodes (markers, text, whitespace).
/// Nodes are composite (books, chapters, paragraphs, spans).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    WHITESPACE = 0, // spaces and tabs
    NEWLINE,        // \n, \r\n, \r

    // =========================================================================
    // TEXT
    // =========================================================================
    TEXT,       // any run without backslash, pipe, whitespace, ~ or /
    NBSP,       // ~
    SOFT_BREAK, // //

    // =========================================================================
    // MARKERS
    // =========================================================================
    MARKER,        // \p, \v, \+bd, \zaln-s
    MARKER_CLOSE,  // \bd*, \+bd*, \f*
    MILESTONE_END, // \*
    PIPE,          // |

    // =========================================================================
    // ATTRIBUTES (attribute sub-lexer)
    // =========================================================================
    ATTR_NAME,  // lemma, x-strong
    EQ,         // =
    ATTR_VALUE, // "value", or a default attribute word

    // =========================================================================
    // RELABELED TEXT (set by the parser, never by the lexer)
    // =========================================================================
    BOOK_CODE,      // GEN
    CHAPTER_NUMBER, // 1
    VERSE_NUMBER,   // 1, 1-2, 3a
    NOTE_CALLER,    // +, -, a

    // =========================================================================
    // NODES
    // =========================================================================
    DOCUMENT,
    BOOK,
    BOOK_HEADER,
    CHAPTER,
    PARAGRAPH,
    VERSE,
    CHARACTER_SPAN,
    FOOTNOTE,
    CROSS_REFERENCE,
    NOTE_CHAR,
    MILESTONE,
    ATTRIBUTE_LIST,
    ATTRIBUTE,
    DEFAULT_ATTRIBUTE,
    TABLE,
    TABLE_ROW,
    TABLE_CELL,
    SIDEBAR,
    TEXT_RUN,

    // =========================================================================
    // SPECIAL
    // =========================================================================
    ERROR,
    FRAGMENT, // root of a reparsed fragment, never part of a document

    // Sentinel for bounds checking
    #[doc(hidden)]
    __LAST,
}

use SyntaxKind::*;

impl SyntaxKind {
    /// Every kind, in discriminant order
    pub const ALL: &'static [SyntaxKind] = &[
        WHITESPACE,
        NEWLINE,
        TEXT,
        NBSP,
        SOFT_BREAK,
        MARKER,
        MARKER_CLOSE,
        MILESTONE_END,
        PIPE,
        ATTR_NAME,
        EQ,
        ATTR_VALUE,
        BOOK_CODE,
        CHAPTER_NUMBER,
        VERSE_NUMBER,
        NOTE_CALLER,
        DOCUMENT,
        BOOK,
        BOOK_HEADER,
        CHAPTER,
        PARAGRAPH,
        VERSE,
        CHARACTER_SPAN,
        FOOTNOTE,
        CROSS_REFERENCE,
        NOTE_CHAR,
        MILESTONE,
        ATTRIBUTE_LIST,
        ATTRIBUTE,
        DEFAULT_ATTRIBUTE,
        TABLE,
        TABLE_ROW,
        TABLE_CELL,
        SIDEBAR,
        TEXT_RUN,
        ERROR,
        FRAGMENT,
    ];

    /// Check if this is a trivia token (whitespace or newline)
    pub fn is_trivia(self) -> bool {
        matches!(self, WHITESPACE | NEWLINE)
    }

    /// Check if this token kind may appear inside a `TEXT_RUN`
    pub fn is_text_like(self) -> bool {
        matches!(self, WHITESPACE | NEWLINE | TEXT | NBSP | SOFT_BREAK)
    }

    /// Check if this is a node kind (as opposed to a token kind)
    ///
    /// `ERROR` is both: the lexer emits `ERROR` tokens and recovery wraps
    /// spans in `ERROR` nodes.
    pub fn is_node(self) -> bool {
        (self as u16) >= (DOCUMENT as u16) && (self as u16) < (__LAST as u16)
    }

    /// Nodes that reparsing may rebuild in isolation
    pub fn is_reparse_unit(self) -> bool {
        matches!(self, BOOK | CHAPTER | PARAGRAPH | TABLE | SIDEBAR)
    }

    pub fn is_note(self) -> bool {
        matches!(self, FOOTNOTE | CROSS_REFERENCE)
    }

    /// Human-readable name, as exposed to external runtimes
    pub fn name(self) -> &'static str {
        match self {
            WHITESPACE => "whitespace",
            NEWLINE => "newline",
            TEXT => "text",
            NBSP => "nbsp",
            SOFT_BREAK => "soft_break",
            MARKER => "marker",
            MARKER_CLOSE => "marker_close",
            MILESTONE_END => "milestone_end",
            PIPE => "pipe",
            ATTR_NAME => "attr_name",
            EQ => "eq",
            ATTR_VALUE => "attr_value",
            BOOK_CODE => "book_code",
            CHAPTER_NUMBER => "chapter_number",
            VERSE_NUMBER => "verse_number",
            NOTE_CALLER => "note_caller",
            DOCUMENT => "document",
            BOOK => "book",
            BOOK_HEADER => "book_header",
            CHAPTER => "chapter",
            PARAGRAPH => "paragraph",
            VERSE => "verse",
            CHARACTER_SPAN => "character_span",
            FOOTNOTE => "footnote",
            CROSS_REFERENCE => "cross_reference",
            NOTE_CHAR => "note_char",
            MILESTONE => "milestone",
            ATTRIBUTE_LIST => "attribute_list",
            ATTRIBUTE => "attribute",
            DEFAULT_ATTRIBUTE => "default_attribute",
            TABLE => "table",
            TABLE_ROW => "table_row",
            TABLE_CELL => "table_cell",
            SIDEBAR => "sidebar",
            TEXT_RUN => "text_run",
            ERROR => "error",
            FRAGMENT => "fragment",
            __LAST => "__last",
        }
    }

    pub fn from_name(name: &str) -> Option<SyntaxKind> {
        Self::ALL.iter().copied().find(|kind| kind.name() == name)
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

impl From<rowan::SyntaxKind> for SyntaxKind {
    fn from(raw: rowan::SyntaxKind) -> Self {
        assert!(raw.0 < SyntaxKind::__LAST as u16);
        // Safety: we control all syntax kinds and check bounds above
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }
}

/// Language definition for Rowan
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UsfmLanguage {}

impl rowan::Language for UsfmLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        raw.into()
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type aliases for convenience
pub type SyntaxNode = rowan::SyntaxNode<UsfmLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<UsfmLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<UsfmLanguage>;
pub type SyntaxNodeChildren = rowan::SyntaxNodeChildren<UsfmLanguage>;
