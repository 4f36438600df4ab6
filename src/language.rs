//! Grammar descriptor for external parsing runtimes.
//!
//! A generic incremental-parsing runtime drives its own parse tables but
//! needs three things from this crate: the node-kind enumeration, the
//! marker table, and a scanner that knows which markers are open. This
//! module exposes exactly those.
//!
//! The [`ExternalScanner`] keeps its open-marker stack as plain data that
//! can be saved with [`ExternalScanner::serialize`] and restored with
//! [`ExternalScanner::deserialize`] at any token boundary.

use std::sync::{Arc, OnceLock};

use rowan::{TextRange, TextSize};
use smol_str::SmolStr;
use tracing::trace;

use crate::parser::scanner::{CloserResolution, MarkerFrame, MarkerStack, SubScanner};
use crate::parser::{MarkerClass, MarkerTable, ParserConfig, SyntaxKind, Token, next_token};

/// Grammar name
pub const NAME: &str = "usfm3";

/// USFM version the grammar implements
pub const USFM_VERSION: &str = "3.0";

/// Version of the grammar tables; bumped with the crate
pub const GRAMMAR_VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Node kinds
// ============================================================================

/// One entry of the kind enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindInfo {
    pub id: u16,
    pub name: &'static str,
    /// Composite node rather than a token
    pub is_node: bool,
    pub is_trivia: bool,
}

/// Every kind that can appear in a document tree, in id order
pub fn kinds() -> impl Iterator<Item = KindInfo> {
    SyntaxKind::ALL
        .iter()
        .copied()
        .filter(|kind| *kind != SyntaxKind::FRAGMENT)
        .map(|kind| KindInfo {
            id: kind as u16,
            name: kind.name(),
            is_node: kind.is_node(),
            is_trivia: kind.is_trivia(),
        })
}

pub fn kind_from_id(id: u16) -> Option<SyntaxKind> {
    SyntaxKind::ALL
        .iter()
        .copied()
        .find(|kind| *kind as u16 == id && *kind != SyntaxKind::FRAGMENT)
}

pub fn kind_from_name(name: &str) -> Option<SyntaxKind> {
    SyntaxKind::from_name(name).filter(|kind| *kind != SyntaxKind::FRAGMENT)
}

// ============================================================================
// Markers
// ============================================================================

/// The standard USFM3 marker table, built once
pub fn marker_table() -> &'static MarkerTable {
    static TABLE: OnceLock<MarkerTable> = OnceLock::new();
    TABLE.get_or_init(MarkerTable::usfm3)
}

/// Class of a marker name in the standard table (`q2`, `+bd`, `zfoo`)
pub fn marker_class(name: &str) -> MarkerClass {
    marker_table().lookup(name).class
}

// ============================================================================
// Scanner
// ============================================================================

/// What a token means given the open markers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRole {
    /// A marker that opens a frame of this class
    Opener(MarkerClass),
    /// A marker that may not open here; the runtime should recover
    NotPermitted(MarkerClass),
    /// A milestone marker; it stays open only through its attributes
    /// and `\*`
    Milestone,
    /// `\*` ending a milestone
    MilestoneEnd,
    /// A closer or `\esbe` that ended at least one frame
    Closer,
    /// A closer whose frame ends once the frames inside it do
    CrossNestedCloser,
    /// A closer or `\esbe` with no matching open frame
    DanglingCloser,
    /// A pipe that starts an attribute list
    AttributeStart,
    /// A pipe that is plain text
    LiteralPipe,
    Text,
    Trivia,
    LexError,
}

/// A token with its role
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedToken<'a> {
    pub token: Token<'a>,
    pub role: TokenRole,
    /// Frames that ended at this token, before or by it
    pub closed: usize,
}

/// Scanner entry point for external runtimes
///
/// Unlike the lexer, the scanner is stateful: it tracks the open markers
/// the same way the document parser does, so closers and pipes can be
/// resolved token by token.
#[derive(Debug, Clone)]
pub struct ExternalScanner {
    config: Arc<ParserConfig>,
    stack: MarkerStack,
}

impl ExternalScanner {
    pub fn new(config: Arc<ParserConfig>) -> Self {
        Self {
            config,
            stack: MarkerStack::new(),
        }
    }

    /// Number of open frames
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Names of the open frames, outermost first
    pub fn open_markers(&self) -> Vec<SmolStr> {
        self.stack.frames().iter().map(|f| f.name.clone()).collect()
    }

    pub fn reset(&mut self) {
        self.stack = MarkerStack::new();
    }

    /// Scan the token at `offset` and update the open markers
    pub fn scan<'t>(&mut self, text: &'t str, offset: TextSize) -> Option<ScannedToken<'t>> {
        let token = next_token(text, offset)?;
        let scanner = SubScanner::new(&self.config.markers);

        let mut closed = 0;
        while self.stack.top().is_some_and(|frame| frame.closed) {
            self.stack.pop();
            closed += 1;
        }
        if self.stack.top_class() == Some(MarkerClass::Milestone) && !continues_milestone(token.kind) {
            self.stack.pop();
            closed += 1;
        }

        let role = match token.kind {
            SyntaxKind::MARKER => {
                let info = scanner.classify(token.text);
                match info.class {
                    MarkerClass::SidebarEnd => {
                        let resolution = scanner.resolve_sidebar_end(&self.stack);
                        self.resolve(resolution, &mut closed)
                    }
                    MarkerClass::Milestone => {
                        if !scanner.permits(&self.stack, &info, self.config.max_nesting_depth) {
                            TokenRole::NotPermitted(MarkerClass::Milestone)
                        } else {
                            if milestone_follows(text, token.range().end()) {
                                self.stack.push(MarkerFrame::open(&info, token.range()));
                            }
                            TokenRole::Milestone
                        }
                    }
                    class => {
                        while scanner.ends_top(&self.stack, &info) {
                            self.stack.pop();
                            closed += 1;
                        }
                        if scanner.permits(&self.stack, &info, self.config.max_nesting_depth) {
                            self.stack.push(MarkerFrame::open(&info, token.range()));
                            TokenRole::Opener(class)
                        } else {
                            TokenRole::NotPermitted(class)
                        }
                    }
                }
            }
            SyntaxKind::MARKER_CLOSE => {
                let resolution = scanner.resolve_closer(&self.stack, token.marker_name());
                self.resolve(resolution, &mut closed)
            }
            SyntaxKind::MILESTONE_END if self.stack.top_class() == Some(MarkerClass::Milestone) => {
                self.stack.pop();
                closed += 1;
                TokenRole::MilestoneEnd
            }
            SyntaxKind::MILESTONE_END => TokenRole::DanglingCloser,
            SyntaxKind::PIPE if scanner.pipe_starts_attributes(&self.stack) => {
                TokenRole::AttributeStart
            }
            SyntaxKind::PIPE => TokenRole::LiteralPipe,
            SyntaxKind::ERROR => TokenRole::LexError,
            kind if kind.is_trivia() => TokenRole::Trivia,
            _ => TokenRole::Text,
        };

        trace!(token = token.text, ?role, closed, depth = self.stack.len(), "scanned");
        Some(ScannedToken {
            token,
            role,
            closed,
        })
    }

    fn resolve(&mut self, resolution: CloserResolution, closed: &mut usize) -> TokenRole {
        match resolution {
            CloserResolution::Top => {
                self.stack.pop();
                *closed += 1;
                TokenRole::Closer
            }
            CloserResolution::Enclosing { depth } => {
                for _ in 0..=depth {
                    self.stack.pop();
                }
                *closed += depth + 1;
                TokenRole::Closer
            }
            CloserResolution::CrossNested { depth } => {
                self.stack.mark_closed(depth);
                TokenRole::CrossNestedCloser
            }
            CloserResolution::Dangling => TokenRole::DanglingCloser,
        }
    }

    /// Save the open markers
    ///
    /// Each frame is a flag byte (1 when already closed), a little-endian
    /// `u16` name length and the name bytes.
    pub fn serialize(&self) -> Vec<u8> {
        let mut state = Vec::new();
        for frame in self.stack.frames() {
            let name = frame.name.as_bytes();
            let len = name.len().min(u16::MAX as usize);
            state.push(u8::from(frame.closed));
            state.extend_from_slice(&(len as u16).to_le_bytes());
            state.extend_from_slice(&name[..len]);
        }
        state
    }

    /// Restore markers saved by [`serialize`](Self::serialize)
    ///
    /// Truncated or malformed state restores the frames read so far.
    pub fn deserialize(&mut self, state: &[u8]) {
        self.reset();
        let mut rest = state;
        while let [flag, lo, hi, tail @ ..] = rest {
            let len = u16::from_le_bytes([*lo, *hi]) as usize;
            let Some(name) = tail.get(..len).and_then(|b| std::str::from_utf8(b).ok()) else {
                break;
            };
            let info = self.config.markers.lookup(name);
            let mut frame = MarkerFrame::open(&info, TextRange::empty(TextSize::new(0)));
            frame.closed = *flag != 0;
            self.stack.push(frame);
            rest = &tail[len..];
        }
    }
}

/// Tokens that keep an open milestone open: its attribute text and `\*`
fn continues_milestone(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::TEXT
            | SyntaxKind::WHITESPACE
            | SyntaxKind::NBSP
            | SyntaxKind::SOFT_BREAK
            | SyntaxKind::PIPE
            | SyntaxKind::MILESTONE_END
    )
}

/// Whether attributes or `\*` follow a milestone marker ending at `end`
fn milestone_follows(text: &str, end: TextSize) -> bool {
    let Some(mut next) = next_token(text, end) else {
        return false;
    };
    if next.kind == SyntaxKind::WHITESPACE {
        match next_token(text, next.range().end()) {
            Some(token) => next = token,
            None => return false,
        }
    }
    matches!(next.kind, SyntaxKind::PIPE | SyntaxKind::MILESTONE_END)
}

impl Default for ExternalScanner {
    fn default() -> Self {
        Self::new(Arc::new(ParserConfig::default()))
    }
}
