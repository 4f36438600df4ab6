//! Context-sensitive sub-scanner
//!
//! The lexer cannot tell whether `\bd*` closes anything or whether `|`
//! starts attributes: that depends on which markers are open. The parser
//! owns a [`MarkerStack`] and passes it to the [`SubScanner`] for every such
//! decision; the scanner itself holds nothing but the marker table.

use logos::Logos;
use rowan::{TextRange, TextSize};
use smol_str::SmolStr;

use super::markers::{self, MarkerClass, MarkerInfo, MarkerTable, VERSE_RANK};
use super::syntax_kind::SyntaxKind;

/// One open marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerFrame {
    /// Name closers are matched against, as written (`bd`, `f`, `liv1`)
    pub name: SmolStr,
    pub class: MarkerClass,
    /// Range of the opening marker token
    pub opened_at: TextRange,
    /// A closer for this frame was seen while inner frames were still open
    pub closed: bool,
    pub accepts_attributes: bool,
}

impl MarkerFrame {
    pub fn open(info: &MarkerInfo, opened_at: TextRange) -> Self {
        Self {
            name: info.name.clone(),
            class: info.class,
            opened_at,
            closed: false,
            accepts_attributes: info.accepts_attributes(),
        }
    }
}

/// Stack of open markers along the current parse path
///
/// Empty exactly at the document boundaries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkerStack {
    frames: Vec<MarkerFrame>,
}

impl MarkerStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// A stack preloaded with the frames enclosing a reparsed fragment
    pub fn with_frames(frames: Vec<MarkerFrame>) -> Self {
        Self { frames }
    }

    pub fn push(&mut self, frame: MarkerFrame) {
        self.frames.push(frame);
    }

    pub fn pop(&mut self) -> Option<MarkerFrame> {
        self.frames.pop()
    }

    pub fn top(&self) -> Option<&MarkerFrame> {
        self.frames.last()
    }

    pub fn top_class(&self) -> Option<MarkerClass> {
        self.top().map(|frame| frame.class)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[MarkerFrame] {
        &self.frames
    }

    /// Flag the frame `depth` levels below the top as closed
    pub fn mark_closed(&mut self, depth: usize) {
        let len = self.frames.len();
        if let Some(frame) = len.checked_sub(depth + 1).and_then(|i| self.frames.get_mut(i)) {
            frame.closed = true;
        }
    }

    pub fn has_open_note(&self) -> bool {
        self.frames.iter().any(|frame| frame.class.is_note())
    }
}

/// What a closer token does in the current context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloserResolution {
    /// Closes the innermost frame
    Top,
    /// Closes the frame `depth` levels down; the frames above end with it
    Enclosing { depth: usize },
    /// Matches the frame `depth` levels down, but the frames above cannot
    /// end silently: the closer stays in place and the frame ends with them
    CrossNested { depth: usize },
    /// No open frame carries this name
    Dangling,
}

impl CloserResolution {
    pub fn is_dangling(self) -> bool {
        matches!(self, CloserResolution::Dangling)
    }
}

/// Stateless classification of context-dependent tokens
#[derive(Debug, Clone, Copy)]
pub struct SubScanner<'t> {
    table: &'t MarkerTable,
}

impl<'t> SubScanner<'t> {
    pub fn new(table: &'t MarkerTable) -> Self {
        Self { table }
    }

    pub fn classify(&self, marker_text: &str) -> MarkerInfo {
        self.table.lookup(super::lexer::marker_name(marker_text))
    }

    /// Whether `opener` implicitly ends the innermost frame
    pub fn ends_top(&self, stack: &MarkerStack, opener: &MarkerInfo) -> bool {
        match stack.top() {
            Some(frame) => self.ends_frame(stack, opener, frame),
            None => false,
        }
    }

    fn ends_frame(&self, stack: &MarkerStack, opener: &MarkerInfo, frame: &MarkerFrame) -> bool {
        let class = opener.class;
        if class.reach() < frame.class.frame_rank() {
            return false;
        }
        !class.is_scoped_to_notes() || stack.has_open_note()
    }

    /// Whether `opener` may open inside the innermost frame
    pub fn permits(&self, stack: &MarkerStack, opener: &MarkerInfo, max_depth: usize) -> bool {
        if stack.len() >= max_depth {
            return false;
        }
        markers::permits(stack.top_class(), opener.class)
    }

    /// Match a closer name (`bd` for `\bd*`) against the open frames
    pub fn resolve_closer(&self, stack: &MarkerStack, name: &str) -> CloserResolution {
        let frames = stack.frames();
        let Some((depth, target)) = frames
            .iter()
            .rev()
            .enumerate()
            .find(|(_, frame)| !frame.closed && frame.class.takes_closer() && frame.name == name)
        else {
            return CloserResolution::Dangling;
        };
        self.classify_depth(frames, depth, target.class)
    }

    /// Resolve `\esbe` against the open sidebar, if any
    pub fn resolve_sidebar_end(&self, stack: &MarkerStack) -> CloserResolution {
        let frames = stack.frames();
        match frames
            .iter()
            .rev()
            .enumerate()
            .find(|(_, frame)| frame.class == MarkerClass::Sidebar)
        {
            Some((depth, target)) => self.classify_depth(frames, depth, target.class),
            None => CloserResolution::Dangling,
        }
    }

    fn classify_depth(&self, frames: &[MarkerFrame], depth: usize, target: MarkerClass) -> CloserResolution {
        if depth == 0 {
            return CloserResolution::Top;
        }
        let inner = &frames[frames.len() - depth..];
        if inner
            .iter()
            .all(|frame| markers::implicitly_closes(target, frame.class))
        {
            CloserResolution::Enclosing { depth }
        } else {
            CloserResolution::CrossNested { depth }
        }
    }

    /// Whether a pipe starts an attribute list or is literal text
    pub fn pipe_starts_attributes(&self, stack: &MarkerStack) -> bool {
        stack.top().is_some_and(|frame| frame.accepts_attributes)
    }

    /// Whether error recovery may stop in front of this token
    ///
    /// Recovery stops at end of input, at openers of verse rank or higher,
    /// at openers that end the innermost frame, and at closers that match
    /// an open frame.
    pub fn is_recovery_point(&self, stack: &MarkerStack, kind: SyntaxKind, text: &str) -> bool {
        match kind {
            SyntaxKind::MARKER => {
                let info = self.classify(text);
                if info.class == MarkerClass::SidebarEnd {
                    return !self.resolve_sidebar_end(stack).is_dangling();
                }
                info.class.reach() >= VERSE_RANK || self.ends_top(stack, &info)
            }
            SyntaxKind::MARKER_CLOSE => !self
                .resolve_closer(stack, super::lexer::marker_name(text))
                .is_dangling(),
            SyntaxKind::MILESTONE_END => stack.top_class() == Some(MarkerClass::Milestone),
            _ => false,
        }
    }
}

// =============================================================================
// ATTRIBUTE SUB-LEXER
// =============================================================================

/// Tokens of the text between a pipe and the next marker
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrToken {
    #[regex(r"[ \t\r\n]+")]
    Space,

    #[token("=")]
    Eq,

    #[regex(r#""[^"]*""#)]
    Quoted,

    /// Quoted value that runs to the end of the attribute text
    #[regex(r#""[^"]*"#)]
    Unterminated,

    #[regex(r"[A-Za-z_][A-Za-z0-9_:.\-]*", priority = 3)]
    Name,

    #[regex(r#"[^ \t\r\n="]+"#)]
    Bare,
}

/// One attribute sub-token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttrLexeme<'a> {
    pub token: AttrToken,
    pub text: &'a str,
    pub offset: TextSize,
}

impl AttrLexeme<'_> {
    pub fn range(&self) -> TextRange {
        TextRange::at(self.offset, TextSize::of(self.text))
    }
}

/// Split attribute text into sub-tokens
///
/// The pattern set covers every input character, so the text is tiled
/// exactly; a stray `"` can only appear as the start of a quoted value.
pub fn lex_attributes(text: &str, base: TextSize) -> Vec<AttrLexeme<'_>> {
    let mut lexer = AttrToken::lexer(text);
    let mut out = Vec::new();
    while let Some(token) = lexer.next() {
        let span = lexer.span();
        out.push(AttrLexeme {
            token: token.unwrap_or(AttrToken::Bare),
            text: &text[span.clone()],
            offset: base + TextSize::new(span.start as u32),
        });
    }
    out
}
