//! Incremental reparsing
//!
//! An edit sequence is merged into one [`Invalidation`]. The innermost
//! reparse unit (book, chapter, paragraph, table or sidebar) that covers it
//! is parsed again on its own, under the frames its ancestors keep open,
//! and the resulting nodes are spliced into the old green tree. Everything
//! outside the unit keeps its green nodes. When no unit can be rebuilt in
//! isolation the whole document is parsed again.

use rowan::{GreenNode, NodeOrToken, TextRange, TextSize};
use tracing::debug;

use crate::base::{Edit, EditError};

use super::ast::{AstNode, Sidebar};
use super::config::ParserConfig;
use super::errors::SyntaxError;
use super::lexer::marker_name;
use super::parser::parse_document;
use super::rule_parser::{Rule, parse_fragment};
use super::scanner::{MarkerFrame, MarkerStack};
use super::syntax_kind::{SyntaxKind, SyntaxNode};

/// The span touched by a sequence of edits
///
/// `start..old_end` is in the coordinates of the text before the first edit,
/// `start..new_end` in the coordinates of the text after the last one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Invalidation {
    pub start: TextSize,
    pub old_end: TextSize,
    pub new_end: TextSize,
}

impl Invalidation {
    pub fn from_edit(edit: &Edit) -> Self {
        Self {
            start: edit.start_byte,
            old_end: edit.old_end_byte,
            new_end: edit.new_end_byte,
        }
    }

    /// Merge edits applied in sequence; `None` for an empty sequence
    pub fn merge(edits: &[Edit]) -> Option<Self> {
        let (first, rest) = edits.split_first()?;
        let mut merged = Self::from_edit(first);
        for edit in rest {
            merged.absorb(edit);
        }
        Some(merged)
    }

    /// Extend by one more edit, expressed in current coordinates
    fn absorb(&mut self, edit: &Edit) {
        self.start = self.start.min(edit.start_byte);
        if edit.old_end_byte >= self.new_end {
            // the edit reaches past the changed span: the extra bytes are
            // unchanged text whose old position is known
            self.old_end += edit.old_end_byte - self.new_end;
            self.new_end = edit.new_end_byte;
        } else {
            self.new_end = self.new_end + edit.new_end_byte - edit.old_end_byte;
        }
    }

    pub fn old_range(&self) -> TextRange {
        TextRange::new(self.start, self.old_end)
    }

    pub fn new_range(&self) -> TextRange {
        TextRange::new(self.start, self.new_end)
    }

    /// Length change of the text
    pub fn delta(&self) -> i64 {
        i64::from(u32::from(self.new_end)) - i64::from(u32::from(self.old_end))
    }
}

/// Check that `edits` turn a text of `old_len` bytes into `new_text`
pub fn validate_edits(old_len: TextSize, new_text: &str, edits: &[Edit]) -> Result<(), EditError> {
    let mut len = old_len;
    for edit in edits {
        edit.validate()?;
        if edit.old_end_byte > len {
            return Err(EditError::OutOfBounds {
                offset: edit.old_end_byte.into(),
                len: len.into(),
            });
        }
        len = len - edit.old_end_byte + edit.new_end_byte;
    }
    let actual = TextSize::of(new_text);
    if len != actual {
        return Err(EditError::LengthMismatch {
            expected: len.into(),
            actual: actual.into(),
        });
    }
    Ok(())
}

/// Result of an incremental reparse
#[derive(Debug, Clone)]
pub struct Reparsed {
    pub green: GreenNode,
    pub errors: Vec<SyntaxError>,
    /// Kind of the unit that was rebuilt; `None` after a full parse
    pub unit: Option<SyntaxKind>,
}

/// Bring `old_green` up to date with `new_text`
pub fn reparse(
    old_green: &GreenNode,
    old_errors: &[SyntaxError],
    new_text: &str,
    invalidation: Invalidation,
    config: &ParserConfig,
) -> Reparsed {
    let root = SyntaxNode::new_root(old_green.clone());
    for unit in reparse_candidates(&root, invalidation).into_iter().rev() {
        if let Some(reparsed) = reparse_unit(&unit, old_errors, new_text, invalidation, config) {
            debug!(kind = ?unit.kind(), range = ?unit.text_range(), "reparsed unit");
            return reparsed;
        }
        debug!(kind = ?unit.kind(), "unit not self-contained, trying enclosing unit");
    }

    debug!(len = new_text.len(), "full reparse");
    let parse = parse_document(new_text, config);
    Reparsed {
        green: parse.green,
        errors: parse.errors,
        unit: None,
    }
}

/// Reparse units covering the invalidated span, outermost first
///
/// A unit qualifies when it starts strictly before the span, so that its
/// opening marker survives, and ends at or after the span's old end.
pub fn reparse_candidates(root: &SyntaxNode, invalidation: Invalidation) -> Vec<SyntaxNode> {
    let mut chain = Vec::new();
    let mut node = root.clone();
    loop {
        let next = node.children().find(|child| {
            let range = child.text_range();
            range.start() < invalidation.start && invalidation.old_end <= range.end()
        });
        let Some(child) = next else {
            break;
        };
        if child.kind().is_reparse_unit() {
            chain.push(child.clone());
        }
        node = child;
    }
    chain
}

fn reparse_unit(
    unit: &SyntaxNode,
    old_errors: &[SyntaxError],
    new_text: &str,
    invalidation: Invalidation,
    config: &ParserConfig,
) -> Option<Reparsed> {
    let rule = Rule::for_unit(unit.kind())?;
    let parent = unit.parent()?;
    let old_range = unit.text_range();
    let delta = invalidation.delta();
    let new_end = TextSize::new(u32::try_from(i64::from(u32::from(old_range.end())) + delta).ok()?);
    let new_range = TextRange::new(old_range.start(), new_end);

    // the unit must end where the following text starts a new token
    let follows = new_text.get(usize::from(new_end)..)?;
    if !(follows.is_empty() || follows.starts_with('\\')) {
        return None;
    }

    let (before, inside, after) = partition_errors(old_errors, old_range)?;
    let text = new_text.get(std::ops::Range::<usize>::from(new_range))?;
    let frames = enclosing_frames(unit, config)?;
    let fragment = parse_fragment(rule, text, new_range.start(), MarkerStack::with_frames(frames), config)?;
    // without `\esbe` a sidebar runs on into the text after it
    if rule == Rule::Sidebar && !follows.is_empty() && !fragment.nodes.iter().all(is_terminated_sidebar) {
        return None;
    }

    let index = unit.index();
    let spliced = parent
        .green()
        .splice_children(index..index + 1, fragment.nodes.into_iter().map(NodeOrToken::Node));
    let green = parent.replace_with(spliced);

    let mut errors = Vec::with_capacity(before.len() + fragment.errors.len() + after.len());
    errors.extend(before.iter().cloned());
    errors.extend(fragment.errors);
    errors.extend(after.iter().cloned().map(|error| error.shifted(delta)));
    debug!(replaced = inside.len(), "merged diagnostics");

    Some(Reparsed {
        green,
        errors,
        unit: Some(unit.kind()),
    })
}

fn is_terminated_sidebar(node: &GreenNode) -> bool {
    Sidebar::cast(SyntaxNode::new_root(node.clone())).is_some_and(|sidebar| sidebar.is_terminated())
}

/// Split diagnostics into those before, inside and after `range`
///
/// Errors are sorted by start. `None` if one straddles a boundary of the
/// range, which would tie the unit to its surroundings.
fn partition_errors(
    errors: &[SyntaxError],
    range: TextRange,
) -> Option<(&[SyntaxError], &[SyntaxError], &[SyntaxError])> {
    let first_inside = errors.partition_point(|error| error.range.start() < range.start());
    let first_after = errors.partition_point(|error| error.range.start() < range.end());
    let (before, rest) = errors.split_at(first_inside);
    let (inside, after) = rest.split_at(first_after - first_inside);
    let contained = before.iter().all(|error| error.range.end() <= range.start())
        && inside.iter().all(|error| error.range.end() <= range.end());
    contained.then_some((before, inside, after))
}

/// Frames the ancestors of `unit` keep open at its start, outermost first
fn enclosing_frames(unit: &SyntaxNode, config: &ParserConfig) -> Option<Vec<MarkerFrame>> {
    let mut frames = Vec::new();
    for ancestor in unit.ancestors().skip(1) {
        if !matches!(
            ancestor.kind(),
            SyntaxKind::BOOK | SyntaxKind::CHAPTER | SyntaxKind::SIDEBAR
        ) {
            continue;
        }
        let marker = ancestor
            .descendants_with_tokens()
            .filter_map(NodeOrToken::into_token)
            .find(|token| token.kind() == SyntaxKind::MARKER)?;
        let info = config.markers.lookup(marker_name(marker.text()));
        frames.push(MarkerFrame::open(&info, marker.text_range()));
    }
    frames.reverse();
    Some(frames)
}
