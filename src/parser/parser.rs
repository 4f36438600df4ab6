//! Recursive descent parser for USFM3
//!
//! Builds a rowan GreenNode tree from tokens.
//! Supports error recovery and produces a lossless CST: every input byte
//! ends up in exactly one token of the tree.

use rowan::{GreenNode, GreenNodeBuilder, TextRange, TextSize};
use tracing::trace;

use super::config::ParserConfig;
use super::errors::{ErrorCode, ParseContext, SyntaxError, format_context_error};
use super::lexer::{Lexer, Token};
use super::markers::{MarkerClass, MarkerInfo};
use super::scanner::{
    AttrLexeme, AttrToken, CloserResolution, MarkerFrame, MarkerStack, SubScanner, lex_attributes,
};
use super::syntax_kind::SyntaxKind;

/// Parse result containing the green tree and any errors
#[derive(Debug, Clone)]
pub struct Parse {
    pub green: GreenNode,
    pub errors: Vec<SyntaxError>,
}

impl Parse {
    /// Get the root syntax node
    pub fn syntax(&self) -> super::SyntaxNode {
        super::SyntaxNode::new_root(self.green.clone())
    }

    /// Check if parsing succeeded without diagnostics
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Parse a whole USFM3 document into a CST
pub fn parse_document(input: &str, config: &ParserConfig) -> Parse {
    let tokens: Vec<_> = Lexer::new(input).collect();
    let mut parser = Parser::new(input, TextSize::new(0), &tokens, config, MarkerStack::new());
    parser.parse_document();
    parser.finish()
}

/// What the innermost frame does after one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Continue,
    /// The frame ended and was popped
    Exit,
}

/// The parser state
pub(crate) struct Parser<'a> {
    source: &'a str,
    /// Offset of `source` in the document
    base: TextSize,
    tokens: &'a [Token<'a>],
    pos: usize,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<SyntaxError>,
    stack: MarkerStack,
    scanner: SubScanner<'a>,
    config: &'a ParserConfig,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(
        source: &'a str,
        base: TextSize,
        tokens: &'a [Token<'a>],
        config: &'a ParserConfig,
        stack: MarkerStack,
    ) -> Self {
        Self {
            source,
            base,
            tokens,
            pos: 0,
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
            stack,
            scanner: SubScanner::new(&config.markers),
            config,
        }
    }

    pub(crate) fn finish(mut self) -> Parse {
        self.errors.sort_by_key(|error| error.range.start());
        Parse {
            green: self.builder.finish(),
            errors: self.errors,
        }
    }

    // =========================================================================
    // Token inspection
    // =========================================================================

    fn current(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    fn current_kind(&self) -> Option<SyntaxKind> {
        self.current().map(|t| t.kind)
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        self.current_kind() == Some(kind)
    }

    pub(crate) fn at_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn nth_kind(&self, n: usize) -> Option<SyntaxKind> {
        self.tokens.get(self.pos + n).map(|t| t.kind)
    }

    /// Offset of the current token, or the end of input
    fn current_offset(&self) -> TextSize {
        match self.current() {
            Some(token) => token.offset,
            None => self.base + TextSize::of(self.source),
        }
    }

    fn current_range(&self) -> TextRange {
        match self.current() {
            Some(token) => token.range(),
            None => TextRange::empty(self.current_offset()),
        }
    }

    /// Source text for a document range inside this parser's input
    fn slice(&self, range: TextRange) -> &'a str {
        let local = range - self.base;
        &self.source[local]
    }

    // =========================================================================
    // Token consumption
    // =========================================================================

    fn bump(&mut self) {
        if let Some(token) = self.current() {
            self.builder.token(token.kind.into(), token.text);
            self.pos += 1;
        }
    }

    /// Bump the current token under a different kind
    fn bump_as(&mut self, kind: SyntaxKind) {
        if let Some(token) = self.current() {
            self.builder.token(kind.into(), token.text);
            self.pos += 1;
        }
    }

    fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Eat the single whitespace or newline that separates a marker from
    /// its content
    fn eat_separator(&mut self) {
        if !self.eat(SyntaxKind::WHITESPACE) {
            self.eat(SyntaxKind::NEWLINE);
        }
    }

    /// Eat trailing horizontal whitespace and the line break after a header
    fn eat_line_end(&mut self) {
        if self.at(SyntaxKind::WHITESPACE) && matches!(self.nth_kind(1), None | Some(SyntaxKind::NEWLINE)) {
            self.bump();
        }
        self.eat(SyntaxKind::NEWLINE);
    }

    // =========================================================================
    // Node building
    // =========================================================================

    fn start_node(&mut self, kind: SyntaxKind) {
        self.builder.start_node(kind.into());
    }

    fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    fn error(&mut self, error: SyntaxError) {
        self.errors.push(error);
    }

    /// Bump the current token and push its frame
    fn open_frame(&mut self, info: &MarkerInfo) {
        let range = self.current_range();
        self.stack.push(MarkerFrame::open(info, range));
        self.bump();
    }

    /// End the innermost frame at the current position
    ///
    /// Frames that needed their own closer leave an `UnclosedMarker`
    /// diagnostic and a zero-width `ERROR` node.
    fn close_implicitly(&mut self) {
        let Some(frame) = self.stack.pop() else {
            return;
        };
        if frame.closed || !frame.class.requires_closer() {
            return;
        }
        trace!(marker = %frame.name, at = ?self.current_offset(), "implicit close");
        let closer = match frame.class {
            MarkerClass::Sidebar => "\\esbe".to_string(),
            MarkerClass::Milestone => "\\*".to_string(),
            _ => format!("\\{}*", frame.name),
        };
        self.error(
            SyntaxError::builder(ErrorCode::U0202)
                .message(format!("unclosed \\{}", frame.name))
                .range(frame.opened_at)
                .hint(format!("add {} where the {} ends", closer, frame.class.description()))
                .related(format!("\\{} opened here", frame.name), frame.opened_at)
                .build(),
        );
        self.start_node(SyntaxKind::ERROR);
        self.finish_node();
    }

    // =========================================================================
    // Entry points
    // =========================================================================

    /// Document = Item*
    pub(crate) fn parse_document(&mut self) {
        self.start_node(SyntaxKind::DOCUMENT);
        while !self.at_eof() {
            self.step();
        }
        self.finish_node();
    }

    /// Fragment = Item* under the preloaded frames
    ///
    /// Returns `false` as soon as an item would end one of the preloaded
    /// frames: the fragment then depends on text outside it. The builder is
    /// left unbalanced in that case and the parser must be dropped.
    pub(crate) fn parse_fragment(&mut self) -> bool {
        self.start_node(SyntaxKind::FRAGMENT);
        let depth = self.stack.len();
        while !self.at_eof() {
            if self.step() == Step::Exit || self.stack.len() != depth {
                return false;
            }
        }
        self.finish_node();
        true
    }

    /// Parse the content of the innermost frame until it ends
    fn parse_content(&mut self) {
        while self.step() == Step::Continue {}
    }

    /// Handle one item inside the innermost frame, or end the frame
    fn step(&mut self) -> Step {
        if self.stack.top().is_some_and(|frame| frame.closed) {
            self.stack.pop();
            return Step::Exit;
        }
        let Some(token) = self.current().cloned() else {
            self.close_implicitly();
            return Step::Exit;
        };
        let start = self.pos;

        match token.kind {
            SyntaxKind::MARKER => {
                let info = self.scanner.classify(token.text);
                if info.class == MarkerClass::SidebarEnd {
                    return self.sidebar_end();
                }
                if self.scanner.ends_top(&self.stack, &info) {
                    self.close_implicitly();
                    return Step::Exit;
                }
                self.parse_opener(info);
            }
            SyntaxKind::MARKER_CLOSE => {
                match self.scanner.resolve_closer(&self.stack, token.marker_name()) {
                    CloserResolution::Top => {
                        self.bump();
                        self.stack.pop();
                        return Step::Exit;
                    }
                    CloserResolution::Enclosing { .. } => {
                        self.close_implicitly();
                        return Step::Exit;
                    }
                    CloserResolution::CrossNested { depth } => self.cross_nested_closer(depth),
                    CloserResolution::Dangling => self.unmatched_closer(),
                }
            }
            // milestones consume their own terminator
            SyntaxKind::MILESTONE_END => self.stray_terminator(),
            SyntaxKind::PIPE if self.scanner.pipe_starts_attributes(&self.stack) => {
                self.parse_attribute_list()
            }
            SyntaxKind::ERROR => self.lex_error(),
            _ => self.parse_text_run(),
        }

        if self.pos == start {
            // Forced progress
            let range = self.current_range();
            self.error(SyntaxError::new(
                format!("stuck on token: {:?}", token.kind),
                range,
                ErrorCode::U0999,
            ));
            self.start_node(SyntaxKind::ERROR);
            self.bump();
            self.finish_node();
        }
        Step::Continue
    }

    fn sidebar_end(&mut self) -> Step {
        match self.scanner.resolve_sidebar_end(&self.stack) {
            CloserResolution::Top => {
                self.bump();
                self.stack.pop();
                self.eat_line_end();
                Step::Exit
            }
            CloserResolution::Enclosing { .. } | CloserResolution::CrossNested { .. } => {
                self.close_implicitly();
                Step::Exit
            }
            CloserResolution::Dangling => {
                self.stray_terminator();
                Step::Continue
            }
        }
    }

    fn parse_opener(&mut self, info: MarkerInfo) {
        if !self
            .scanner
            .permits(&self.stack, &info, self.config.max_nesting_depth)
        {
            self.marker_not_permitted(&info);
            return;
        }
        match info.class {
            MarkerClass::Book => self.parse_book(&info),
            MarkerClass::Chapter => self.parse_chapter(&info),
            MarkerClass::Verse => self.parse_verse(&info),
            MarkerClass::Paragraph => self.parse_block(SyntaxKind::PARAGRAPH, &info),
            MarkerClass::TableRow => self.parse_table(),
            MarkerClass::TableCell => self.parse_block(SyntaxKind::TABLE_CELL, &info),
            MarkerClass::Sidebar => self.parse_block(SyntaxKind::SIDEBAR, &info),
            MarkerClass::SidebarEnd => self.stray_terminator(),
            MarkerClass::Character => self.parse_block(SyntaxKind::CHARACTER_SPAN, &info),
            MarkerClass::Footnote | MarkerClass::CrossReference => self.parse_note(&info),
            MarkerClass::NoteCharacter => self.parse_block(SyntaxKind::NOTE_CHAR, &info),
            MarkerClass::Milestone => self.parse_milestone(&info),
        }
    }

    // =========================================================================
    // Grammar
    // =========================================================================

    /// Book = BOOK_HEADER Item*
    /// BOOK_HEADER = '\id' BOOK_CODE TEXT_RUN? NEWLINE?
    fn parse_book(&mut self, info: &MarkerInfo) {
        self.start_node(SyntaxKind::BOOK);
        self.start_node(SyntaxKind::BOOK_HEADER);
        let marker = self.current_range();
        self.open_frame(info);
        self.eat_separator();
        if self.at(SyntaxKind::TEXT) {
            self.bump_as(SyntaxKind::BOOK_CODE);
        } else {
            self.missing_argument("book code", marker);
        }
        self.parse_line_text();
        self.eat(SyntaxKind::NEWLINE);
        self.finish_node();
        self.parse_content();
        self.finish_node();
    }

    /// Chapter = '\c' CHAPTER_NUMBER Item*
    fn parse_chapter(&mut self, info: &MarkerInfo) {
        self.start_node(SyntaxKind::CHAPTER);
        let marker = self.current_range();
        self.open_frame(info);
        self.eat_separator();
        if self.at(SyntaxKind::TEXT) {
            self.bump_as(SyntaxKind::CHAPTER_NUMBER);
        } else {
            self.missing_argument("chapter number", marker);
        }
        self.eat_line_end();
        self.parse_content();
        self.finish_node();
    }

    /// Verse = '\v' VERSE_NUMBER Inline*
    fn parse_verse(&mut self, info: &MarkerInfo) {
        self.start_node(SyntaxKind::VERSE);
        let marker = self.current_range();
        self.open_frame(info);
        self.eat_separator();
        if self.at(SyntaxKind::TEXT) {
            self.bump_as(SyntaxKind::VERSE_NUMBER);
            self.eat_separator();
        } else {
            self.missing_argument("verse number", marker);
        }
        self.parse_content();
        self.finish_node();
    }

    /// Paragraph | TableCell | Sidebar | CharacterSpan | NoteChar
    ///   = MARKER Item* closer?
    fn parse_block(&mut self, kind: SyntaxKind, info: &MarkerInfo) {
        self.start_node(kind);
        self.open_frame(info);
        self.eat_separator();
        self.parse_content();
        self.finish_node();
    }

    /// Table = TableRow+
    /// TableRow = '\tr' TableCell*
    fn parse_table(&mut self) {
        self.start_node(SyntaxKind::TABLE);
        loop {
            let Some(token) = self.current().cloned() else {
                break;
            };
            let info = self.scanner.classify(token.text);
            self.parse_block(SyntaxKind::TABLE_ROW, &info);

            let next_row = self.current().is_some_and(|next| {
                next.kind == SyntaxKind::MARKER && {
                    let info = self.scanner.classify(next.text);
                    info.class == MarkerClass::TableRow
                        && self
                            .scanner
                            .permits(&self.stack, &info, self.config.max_nesting_depth)
                }
            });
            if !next_row {
                break;
            }
        }
        self.finish_node();
    }

    /// Note = NOTE_MARKER NOTE_CALLER Item* NOTE_CLOSE
    fn parse_note(&mut self, info: &MarkerInfo) {
        let kind = match info.class {
            MarkerClass::CrossReference => SyntaxKind::CROSS_REFERENCE,
            _ => SyntaxKind::FOOTNOTE,
        };
        self.start_node(kind);
        let marker = self.current_range();
        self.open_frame(info);
        self.eat_separator();
        if self.at(SyntaxKind::TEXT) {
            self.bump_as(SyntaxKind::NOTE_CALLER);
            self.eat_separator();
        } else {
            self.missing_argument("note caller", marker);
        }
        self.parse_content();
        self.finish_node();
    }

    /// Milestone = MILESTONE_MARKER AttributeList? '\*'
    fn parse_milestone(&mut self, info: &MarkerInfo) {
        self.start_node(SyntaxKind::MILESTONE);
        self.open_frame(info);
        if self.at(SyntaxKind::WHITESPACE)
            && matches!(
                self.nth_kind(1),
                Some(SyntaxKind::PIPE | SyntaxKind::MILESTONE_END)
            )
        {
            self.bump();
        }
        if self.at(SyntaxKind::PIPE) {
            self.parse_attribute_list();
        }
        if self.eat(SyntaxKind::MILESTONE_END) {
            self.stack.pop();
        } else {
            self.close_implicitly();
        }
        self.finish_node();
    }

    /// TEXT_RUN = (TEXT | WHITESPACE | NEWLINE | NBSP | SOFT_BREAK | literal '|')+
    fn parse_text_run(&mut self) {
        self.start_node(SyntaxKind::TEXT_RUN);
        while let Some(kind) = self.current_kind() {
            if kind.is_text_like() {
                self.bump();
            } else if kind == SyntaxKind::PIPE && !self.scanner.pipe_starts_attributes(&self.stack) {
                self.bump_as(SyntaxKind::TEXT);
            } else {
                break;
            }
        }
        self.finish_node();
    }

    /// Text up to the end of the current line
    fn parse_line_text(&mut self) {
        let on_line = |kind: Option<SyntaxKind>| {
            matches!(
                kind,
                Some(
                    SyntaxKind::TEXT
                        | SyntaxKind::WHITESPACE
                        | SyntaxKind::NBSP
                        | SyntaxKind::SOFT_BREAK
                        | SyntaxKind::PIPE
                )
            )
        };
        if !on_line(self.current_kind()) {
            return;
        }
        self.start_node(SyntaxKind::TEXT_RUN);
        while on_line(self.current_kind()) {
            self.bump_as(match self.current_kind() {
                Some(SyntaxKind::PIPE) | None => SyntaxKind::TEXT,
                Some(kind) => kind,
            });
        }
        self.finish_node();
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    /// AttributeList = '|' (ATTRIBUTE | WHITESPACE | ERROR)*
    ///               | '|' WHITESPACE* DEFAULT_ATTRIBUTE WHITESPACE*
    ///
    /// The text between the pipe and the next marker or line break is
    /// re-lexed by the attribute sub-lexer.
    fn parse_attribute_list(&mut self) {
        let pipe = self.current_range();
        self.start_node(SyntaxKind::ATTRIBUTE_LIST);
        self.bump();

        let mut end = pipe.end();
        while let Some(token) = self.current() {
            if !matches!(
                token.kind,
                SyntaxKind::TEXT
                    | SyntaxKind::WHITESPACE
                    | SyntaxKind::NBSP
                    | SyntaxKind::SOFT_BREAK
                    | SyntaxKind::PIPE
            ) {
                break;
            }
            end = token.range().end();
            self.pos += 1;
        }
        let text = self.slice(TextRange::new(pipe.end(), end));
        let lexemes = lex_attributes(text, pipe.end());
        if lexemes.iter().any(|lexeme| lexeme.token == AttrToken::Eq) {
            self.build_attribute_pairs(&lexemes);
        } else {
            self.build_default_attribute(&lexemes, pipe);
        }
        self.finish_node();
    }

    fn attr_token(&mut self, lexeme: &AttrLexeme<'_>) {
        let kind = match lexeme.token {
            AttrToken::Space => SyntaxKind::WHITESPACE,
            AttrToken::Eq => SyntaxKind::EQ,
            AttrToken::Quoted => SyntaxKind::ATTR_VALUE,
            AttrToken::Unterminated => SyntaxKind::ERROR,
            AttrToken::Name => SyntaxKind::ATTR_NAME,
            AttrToken::Bare => SyntaxKind::TEXT,
        };
        self.builder.token(kind.into(), lexeme.text);
    }

    fn build_attribute_pairs(&mut self, lexemes: &[AttrLexeme<'_>]) {
        let mut i = 0;
        while i < lexemes.len() {
            if lexemes[i].token == AttrToken::Space {
                self.attr_token(&lexemes[i]);
                i += 1;
                continue;
            }
            if let Some(end) = attribute_pair_end(lexemes, i) {
                self.start_node(SyntaxKind::ATTRIBUTE);
                for lexeme in &lexemes[i..end] {
                    self.attr_token(lexeme);
                }
                self.finish_node();
                i = end;
                continue;
            }
            let end = lexemes[i..]
                .iter()
                .position(|lexeme| lexeme.token == AttrToken::Space)
                .map_or(lexemes.len(), |p| i + p);
            self.malformed_attribute(&lexemes[i..end]);
            i = end;
        }
    }

    fn build_default_attribute(&mut self, lexemes: &[AttrLexeme<'_>], pipe: TextRange) {
        let (Some(first), Some(last)) = (
            lexemes.iter().position(|l| l.token != AttrToken::Space),
            lexemes.iter().rposition(|l| l.token != AttrToken::Space),
        ) else {
            for lexeme in lexemes {
                self.attr_token(lexeme);
            }
            self.error(
                SyntaxError::builder(ErrorCode::U0301)
                    .message("empty attribute list")
                    .range(pipe)
                    .hint("remove the '|' or add a value after it")
                    .build(),
            );
            self.start_node(SyntaxKind::ERROR);
            self.finish_node();
            return;
        };

        for lexeme in &lexemes[..first] {
            self.attr_token(lexeme);
        }
        let value = &lexemes[first..=last];
        if value.iter().any(|l| l.token == AttrToken::Unterminated) {
            self.malformed_attribute(value);
        } else {
            self.start_node(SyntaxKind::DEFAULT_ATTRIBUTE);
            for lexeme in value {
                let kind = match lexeme.token {
                    AttrToken::Space => SyntaxKind::WHITESPACE,
                    _ => SyntaxKind::ATTR_VALUE,
                };
                self.builder.token(kind.into(), lexeme.text);
            }
            self.finish_node();
        }
        for lexeme in &lexemes[last + 1..] {
            self.attr_token(lexeme);
        }
    }

    fn malformed_attribute(&mut self, lexemes: &[AttrLexeme<'_>]) {
        let (Some(first), Some(last)) = (lexemes.first(), lexemes.last()) else {
            return;
        };
        let range = TextRange::new(first.offset, last.range().end());
        let unterminated = lexemes.iter().any(|l| l.token == AttrToken::Unterminated);
        trace!(?range, unterminated, "malformed attribute");
        self.start_node(SyntaxKind::ERROR);
        for lexeme in lexemes {
            self.attr_token(lexeme);
        }
        self.finish_node();
        let error = if unterminated {
            SyntaxError::builder(ErrorCode::U0102)
                .range(range)
                .hint("close the value with '\"'")
        } else {
            SyntaxError::builder(ErrorCode::U0301)
                .message(format!("malformed attribute '{}'", self.slice(range)))
                .range(range)
                .hint("attributes are written name=\"value\"")
        };
        self.error(error.build());
    }

    // =========================================================================
    // Error recovery
    // =========================================================================

    /// Wrap a misplaced opener and everything up to the next recovery point
    fn marker_not_permitted(&mut self, info: &MarkerInfo) {
        let start = self.current_range();
        let context = ParseContext::from_class(self.stack.top_class());
        let too_deep = self.stack.len() >= self.config.max_nesting_depth;

        self.start_node(SyntaxKind::ERROR);
        self.bump();
        let mut end = start.end();
        while let Some(token) = self.current() {
            if self
                .scanner
                .is_recovery_point(&self.stack, token.kind, token.text)
            {
                break;
            }
            end = token.range().end();
            self.bump();
        }
        self.finish_node();

        let range = TextRange::new(start.start(), end);
        trace!(marker = %info.name, ?range, "recovered from misplaced marker");
        let found = format!("\\{}", info.name);
        let hint = if too_deep {
            format!("markers are nested deeper than {}", self.config.max_nesting_depth)
        } else if info.class == MarkerClass::NoteCharacter {
            format!("{} is only valid inside a footnote or cross reference", found)
        } else {
            format!("a {} cannot appear here", info.class.description())
        };
        self.error(
            format_context_error(&found, context, ErrorCode::U0401)
                .range(range)
                .hint(hint)
                .build(),
        );
    }

    fn missing_argument(&mut self, what: &str, marker: TextRange) {
        self.error(
            SyntaxError::builder(ErrorCode::U0402)
                .message(format!("missing {} after {}", what, self.slice(marker)))
                .range(marker)
                .build(),
        );
        self.start_node(SyntaxKind::ERROR);
        self.finish_node();
    }

    /// A closer matching a frame below the innermost one: keep it in place
    /// and end that frame together with the inner spans
    fn cross_nested_closer(&mut self, depth: usize) {
        let range = self.current_range();
        let frames = self.stack.frames();
        let target = &frames[frames.len() - 1 - depth];
        let inner = &frames[frames.len() - 1];
        trace!(closer = %target.name, depth, "cross-nested closer");
        let error = SyntaxError::builder(ErrorCode::U0203)
            .message(format!(
                "\\{}* closes \\{} while \\{} is still open",
                target.name, target.name, inner.name
            ))
            .range(range)
            .hint(format!("close \\{} first", inner.name))
            .related(format!("\\{} opened here", target.name), target.opened_at)
            .build();
        self.error(error);
        self.bump();
        self.stack.mark_closed(depth);
    }

    fn unmatched_closer(&mut self) {
        let Some(token) = self.current().cloned() else {
            return;
        };
        trace!(closer = token.text, "unmatched closer");
        self.error(
            SyntaxError::builder(ErrorCode::U0201)
                .message(format!("{} has no open \\{}", token.text, token.marker_name()))
                .range(token.range())
                .hint("remove the closer or add the opening marker")
                .build(),
        );
        self.start_node(SyntaxKind::ERROR);
        self.bump();
        self.finish_node();
    }

    fn stray_terminator(&mut self) {
        let Some(token) = self.current().cloned() else {
            return;
        };
        self.error(
            SyntaxError::builder(ErrorCode::U0204)
                .message(format!("{} without an open milestone or sidebar", token.text))
                .range(token.range())
                .build(),
        );
        self.start_node(SyntaxKind::ERROR);
        self.bump();
        self.finish_node();
    }

    fn lex_error(&mut self) {
        let range = self.current_range();
        self.error(
            SyntaxError::builder(ErrorCode::U0101)
                .range(range)
                .hint("remove the backslash or complete the marker name")
                .build(),
        );
        self.start_node(SyntaxKind::ERROR);
        self.bump();
        self.finish_node();
    }
}

/// End of a well-formed `name [ws] = [ws] "value"` starting at `i`
fn attribute_pair_end(lexemes: &[AttrLexeme<'_>], i: usize) -> Option<usize> {
    let kind = |j: usize| lexemes.get(j).map(|lexeme| lexeme.token);
    if kind(i) != Some(AttrToken::Name) {
        return None;
    }
    let mut j = i + 1;
    if kind(j) == Some(AttrToken::Space) {
        j += 1;
    }
    if kind(j) != Some(AttrToken::Eq) {
        return None;
    }
    j += 1;
    if kind(j) == Some(AttrToken::Space) {
        j += 1;
    }
    (kind(j) == Some(AttrToken::Quoted)).then_some(j + 1)
}
