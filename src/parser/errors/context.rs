//! Parse context tracking for context-aware error messages
//!
//! The context is read off the innermost open marker frame, so messages can
//! say where a misplaced marker was found and what would have been valid.

use crate::parser::markers::MarkerClass;

/// Represents the current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParseContext {
    /// Outside any book
    #[default]
    TopLevel,
    Book,
    Chapter,
    Verse,
    Paragraph,
    TableRow,
    TableCell,
    Sidebar,
    CharacterSpan,
    Footnote,
    CrossReference,
    NoteCharacter,
    Milestone,
}

impl ParseContext {
    /// Context for the innermost open frame class (`None` at top level)
    pub fn from_class(class: Option<MarkerClass>) -> Self {
        match class {
            None => Self::TopLevel,
            Some(MarkerClass::Book) => Self::Book,
            Some(MarkerClass::Chapter) => Self::Chapter,
            Some(MarkerClass::Verse) => Self::Verse,
            Some(MarkerClass::Paragraph) => Self::Paragraph,
            Some(MarkerClass::TableRow) => Self::TableRow,
            Some(MarkerClass::TableCell) => Self::TableCell,
            Some(MarkerClass::Sidebar | MarkerClass::SidebarEnd) => Self::Sidebar,
            Some(MarkerClass::Character) => Self::CharacterSpan,
            Some(MarkerClass::Footnote) => Self::Footnote,
            Some(MarkerClass::CrossReference) => Self::CrossReference,
            Some(MarkerClass::NoteCharacter) => Self::NoteCharacter,
            Some(MarkerClass::Milestone) => Self::Milestone,
        }
    }

    /// Get a human-readable description of this context for error messages
    pub fn description(&self) -> &'static str {
        match self {
            Self::TopLevel => "at top level",
            Self::Book => "in book",
            Self::Chapter => "in chapter",
            Self::Verse => "in verse",
            Self::Paragraph => "in paragraph",
            Self::TableRow => "in table row",
            Self::TableCell => "in table cell",
            Self::Sidebar => "in sidebar",
            Self::CharacterSpan => "in character span",
            Self::Footnote => "in footnote",
            Self::CrossReference => "in cross reference",
            Self::NoteCharacter => "in note text",
            Self::Milestone => "in milestone",
        }
    }

    /// Get a description of what is expected in this context
    pub fn expected_description(&self) -> &'static str {
        match self {
            Self::TopLevel | Self::Book => "\\id, \\c or a paragraph marker",
            Self::Chapter | Self::Sidebar => "a paragraph, table row, verse or text",
            Self::Verse | Self::Paragraph | Self::TableCell => "text, a verse, a character span or a note",
            Self::TableRow => "a table cell marker",
            Self::CharacterSpan => "text, a nested character span or a note",
            Self::Footnote | Self::CrossReference => "a note character marker such as \\ft or \\xt",
            Self::NoteCharacter => "text or a nested character span",
            Self::Milestone => "attributes and \\*",
        }
    }

    /// Check if this context is inside a note
    pub fn is_in_note(&self) -> bool {
        matches!(self, Self::Footnote | Self::CrossReference | Self::NoteCharacter)
    }
}
