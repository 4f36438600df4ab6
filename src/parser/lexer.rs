//! Logos-based lexer for USFM3
//!
//! Tokenization is context free: the same bytes always produce the same
//! tokens, whatever markers are open. Deciding what a token means in context
//! (closer or dangling, attribute list or literal pipe) is the sub-scanner's
//! job.

use super::syntax_kind::SyntaxKind;
use logos::Logos;
use rowan::{TextRange, TextSize};

/// A token with its kind, text, and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
    pub offset: TextSize,
}

impl Token<'_> {
    pub fn range(&self) -> TextRange {
        TextRange::at(self.offset, TextSize::of(self.text))
    }

    /// Marker name without the backslash, `+` prefix or `*` suffix
    ///
    /// Empty for tokens that are not markers.
    pub fn marker_name(&self) -> &str {
        match self.kind {
            SyntaxKind::MARKER | SyntaxKind::MARKER_CLOSE => marker_name(self.text),
            _ => "",
        }
    }
}

/// Strip the backslash, the nesting `+` and the closing `*` from marker text
pub fn marker_name(text: &str) -> &str {
    let name = text.strip_prefix('\\').unwrap_or(text);
    let name = name.strip_prefix('+').unwrap_or(name);
    name.strip_suffix('*').unwrap_or(name)
}

/// Lexer wrapping the logos-generated tokenizer
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, LogosToken>,
    base: TextSize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self::with_offset(input, TextSize::new(0))
    }

    /// Lex `input` as if it started at `base` in a larger document
    pub fn with_offset(input: &'a str, base: TextSize) -> Self {
        Self {
            inner: LogosToken::lexer(input),
            base,
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let logos_token = self.inner.next()?;
        let text = self.inner.slice();
        let offset = self.base + TextSize::new(self.inner.span().start as u32);

        let kind = match logos_token {
            Ok(t) => t.into(),
            Err(()) => SyntaxKind::ERROR,
        };

        Some(Token { kind, text, offset })
    }
}

/// Tokenize an entire string into a Vec
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

/// Scan the single token that starts at byte `offset` of `text`
///
/// Pure function of content and position. Returns `None` at end of input
/// or when `offset` is not on a character boundary.
pub fn next_token(text: &str, offset: TextSize) -> Option<Token<'_>> {
    let rest = text.get(usize::from(offset)..)?;
    Lexer::with_offset(rest, offset).next()
}

/// Logos token enum - maps to SyntaxKind
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub enum LogosToken {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"[ \t]+")]
    Whitespace,

    #[regex(r"\r\n|\n|\r")]
    Newline,

    // =========================================================================
    // MARKERS
    // =========================================================================
    #[regex(r"\\\+?[A-Za-z0-9]+(-[A-Za-z0-9]+)*")]
    Marker,

    #[regex(r"\\\+?[A-Za-z0-9]+(-[A-Za-z0-9]+)*\*")]
    MarkerClose,

    #[token("\\*")]
    MilestoneEnd,

    /// A backslash that does not start a marker
    #[token("\\")]
    LoneBackslash,

    #[token("|")]
    Pipe,

    // =========================================================================
    // TEXT
    // =========================================================================
    #[token("~")]
    Nbsp,

    #[token("//")]
    SoftBreak,

    #[token("/")]
    Slash,

    #[regex(r"[^\\|~/ \t\r\n]+")]
    Text,
}

impl From<LogosToken> for SyntaxKind {
    fn from(token: LogosToken) -> Self {
        match token {
            LogosToken::Whitespace => SyntaxKind::WHITESPACE,
            LogosToken::Newline => SyntaxKind::NEWLINE,
            LogosToken::Marker => SyntaxKind::MARKER,
            LogosToken::MarkerClose => SyntaxKind::MARKER_CLOSE,
            LogosToken::MilestoneEnd => SyntaxKind::MILESTONE_END,
            LogosToken::LoneBackslash => SyntaxKind::ERROR,
            LogosToken::Pipe => SyntaxKind::PIPE,
            LogosToken::Nbsp => SyntaxKind::NBSP,
            LogosToken::SoftBreak => SyntaxKind::SOFT_BREAK,
            LogosToken::Slash | LogosToken::Text => SyntaxKind::TEXT,
        }
    }
}
