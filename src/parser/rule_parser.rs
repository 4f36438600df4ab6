//! Rule-based parser for individual structural units
//!
//! Parses a single book, chapter, paragraph, table or sidebar without the
//! rest of the document. The incremental reparser uses this to rebuild one
//! unit in place; tests use it to check a construct in isolation.
//!
//! # Example
//!
//! ```
//! use usfm3::parser::ParserConfig;
//! use usfm3::parser::rule_parser::{Rule, parse_rule};
//!
//! let result = parse_rule(Rule::Paragraph, "\\p \\v 1 text", &ParserConfig::default()).unwrap();
//! assert!(result.is_ok());
//! ```

use rowan::{GreenNode, NodeOrToken, TextSize};

use super::config::ParserConfig;
use super::errors::SyntaxError;
use super::lexer::Lexer;
use super::markers::MarkerClass;
use super::parser::{Parse, Parser};
use super::scanner::{MarkerFrame, MarkerStack};
use super::syntax_kind::SyntaxKind;

/// Structural units that can be parsed on their own
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    /// book = { '\id' BOOK_CODE ... }
    Book,
    /// chapter = { '\c' CHAPTER_NUMBER ... }
    Chapter,
    /// paragraph = { PARAGRAPH_MARKER ... }, possibly split in several
    Paragraph,
    /// table = { ('\tr' cell*)+ }
    Table,
    /// sidebar = { '\esb' ... '\esbe' }
    Sidebar,
}

impl Rule {
    /// The rule that rebuilds a node of the given kind
    pub fn for_unit(kind: SyntaxKind) -> Option<Rule> {
        match kind {
            SyntaxKind::BOOK => Some(Rule::Book),
            SyntaxKind::CHAPTER => Some(Rule::Chapter),
            SyntaxKind::PARAGRAPH => Some(Rule::Paragraph),
            SyntaxKind::TABLE => Some(Rule::Table),
            SyntaxKind::SIDEBAR => Some(Rule::Sidebar),
            _ => None,
        }
    }

    pub fn kind(self) -> SyntaxKind {
        match self {
            Rule::Book => SyntaxKind::BOOK,
            Rule::Chapter => SyntaxKind::CHAPTER,
            Rule::Paragraph => SyntaxKind::PARAGRAPH,
            Rule::Table => SyntaxKind::TABLE,
            Rule::Sidebar => SyntaxKind::SIDEBAR,
        }
    }

    /// Whether a fragment made of `kinds` can replace one unit of this rule
    ///
    /// Containers may split (an inserted `\p` makes two paragraphs); tables
    /// and sidebars must stay a single node because their extent depends on
    /// what follows them.
    pub fn accepts(self, kinds: &[SyntaxKind]) -> bool {
        let all_own = !kinds.is_empty() && kinds.iter().all(|kind| *kind == self.kind());
        match self {
            Rule::Book | Rule::Chapter | Rule::Paragraph => all_own,
            Rule::Table | Rule::Sidebar => all_own && kinds.len() == 1,
        }
    }

    /// Classes of the frames a standalone unit of this rule is parsed under
    fn ancestors(self) -> &'static [(&'static str, MarkerClass)] {
        match self {
            Rule::Book => &[],
            Rule::Chapter => &[("id", MarkerClass::Book)],
            Rule::Paragraph | Rule::Table | Rule::Sidebar => {
                &[("id", MarkerClass::Book), ("c", MarkerClass::Chapter)]
            }
        }
    }
}

/// Nodes produced by reparsing one unit
#[derive(Debug, Clone)]
pub struct Fragment {
    /// Replacement nodes, in document order
    pub nodes: Vec<GreenNode>,
    /// Diagnostics with document offsets
    pub errors: Vec<SyntaxError>,
}

/// Parse `text` as the replacement for one unit at `offset` in a document
///
/// `enclosing` holds the frames open at the unit's start. Returns `None`
/// when the text does not stand on its own: it ends an enclosing frame, or
/// it does not produce nodes of the unit's kind.
pub fn parse_fragment(
    rule: Rule,
    text: &str,
    offset: TextSize,
    enclosing: MarkerStack,
    config: &ParserConfig,
) -> Option<Fragment> {
    let tokens: Vec<_> = Lexer::with_offset(text, offset).collect();
    let mut parser = Parser::new(text, offset, &tokens, config, enclosing);
    if !parser.parse_fragment() {
        return None;
    }
    let parse = parser.finish();

    let mut nodes = Vec::new();
    for child in parse.green.children() {
        match child {
            NodeOrToken::Node(node) => nodes.push(node.to_owned()),
            NodeOrToken::Token(_) => return None,
        }
    }
    let kinds: Vec<SyntaxKind> = nodes
        .iter()
        .map(|node| SyntaxKind::from(node.kind()))
        .collect();
    if !rule.accepts(&kinds) {
        return None;
    }
    Some(Fragment {
        nodes,
        errors: parse.errors,
    })
}

/// Parse result for a single rule
#[derive(Debug)]
pub struct RuleParseResult {
    /// Fragment tree: a `FRAGMENT` root over the unit nodes
    pub parse: Parse,
    /// The rule that was parsed
    pub rule: Rule,
    /// The original input
    pub input: String,
}

impl RuleParseResult {
    /// Check if parsing succeeded without errors
    pub fn is_ok(&self) -> bool {
        self.parse.ok()
    }

    pub fn errors(&self) -> &[SyntaxError] {
        &self.parse.errors
    }

    pub fn syntax(&self) -> super::SyntaxNode {
        self.parse.syntax()
    }

    /// The unit nodes under the fragment root
    pub fn nodes(&self) -> Vec<super::SyntaxNode> {
        self.syntax().children().collect()
    }

    /// Check that every input byte is in the tree
    pub fn fully_consumed(&self) -> bool {
        self.syntax().text() == self.input.as_str()
    }
}

/// Parse one unit in isolation, under synthesized enclosing frames
///
/// Returns `None` when the input is not a well-formed instance of the rule
/// (see [`parse_fragment`]).
pub fn parse_rule(rule: Rule, input: &str, config: &ParserConfig) -> Option<RuleParseResult> {
    let frames = rule
        .ancestors()
        .iter()
        .map(|(name, class)| {
            let mut info = config.markers.lookup(name);
            info.class = *class;
            MarkerFrame::open(&info, rowan::TextRange::empty(TextSize::new(0)))
        })
        .collect();
    let fragment = parse_fragment(rule, input, TextSize::new(0), MarkerStack::with_frames(frames), config)?;

    let root = GreenNode::new(
        SyntaxKind::FRAGMENT.into(),
        fragment.nodes.into_iter().map(NodeOrToken::Node),
    );
    Some(RuleParseResult {
        parse: Parse {
            green: root,
            errors: fragment.errors,
        },
        rule,
        input: input.to_string(),
    })
}
