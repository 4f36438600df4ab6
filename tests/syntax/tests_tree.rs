//! Tree surface tests: queries, diagnostics and typed access

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use rstest::rstest;
use usfm3::parser::{AstNode, CharacterSpan, HasMarker, Verse};
use usfm3::{ErrorCode, ParserConfig, Point, Severity, SyntaxKind, TextRange, TextSize, Tree, parse};

use crate::helpers::source_fixtures::*;
use crate::helpers::tree_assertions::assert_lossless;

#[rstest]
#[case(EMPTY)]
#[case(SIMPLE_PARAGRAPH)]
#[case(TWO_CHAPTERS)]
#[case(POETRY)]
#[case(TABLE)]
#[case(SIDEBAR)]
#[case(FULL_DOCUMENT)]
fn test_parse_is_deterministic(#[case] input: &str) {
    let a = parse(input);
    let b = parse(input);
    assert!(a.structurally_eq(&b));
    assert_eq!(a.text(), input);
    assert_eq!(a.generation(), 0);
}

#[test]
fn test_empty_tree() {
    let tree = parse(EMPTY);
    assert!(tree.is_empty());
    assert!(tree.ok());
    assert_eq!(tree.root().kind(), SyntaxKind::DOCUMENT);
    assert!(tree.document().unwrap().books().next().is_none());
}

#[test]
fn test_node_at_offset_in_note() {
    let tree = parse(FOOTNOTE);
    let offset = TextSize::new(FOOTNOTE.find("note.").unwrap() as u32);
    let node = tree.node_at_offset(offset).unwrap();
    let kinds: Vec<_> = node.ancestors().map(|n| n.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::TEXT_RUN,
            SyntaxKind::NOTE_CHAR,
            SyntaxKind::FOOTNOTE,
            SyntaxKind::VERSE,
            SyntaxKind::PARAGRAPH,
            SyntaxKind::DOCUMENT,
        ]
    );
}

#[test]
fn test_node_at_offset_at_end() {
    let tree = parse(SIMPLE_PARAGRAPH);
    // the last token ends at the end of input
    let node = tree.node_at_offset(tree.len()).unwrap();
    assert_eq!(node.kind(), SyntaxKind::TEXT_RUN);
    assert!(tree.node_at_offset(tree.len() + TextSize::new(1)).is_none());
}

#[test]
fn test_covering_node_spanning_verses() {
    let tree = parse(TWO_CHAPTERS);
    let start = TextSize::new(TWO_CHAPTERS.find("beginning").unwrap() as u32);
    let end = TextSize::new(TWO_CHAPTERS.find("formless").unwrap() as u32);
    let node = tree.covering_node(TextRange::new(start, end)).unwrap();
    assert_eq!(node.kind(), SyntaxKind::PARAGRAPH);
    assert!(tree
        .covering_node(TextRange::new(start, tree.len() + TextSize::new(1)))
        .is_none());
}

#[test]
fn test_diagnostic_positions() {
    let input = "\\id GEN\n\\c 1\n\\p \\v 1 text \\bd* more\n";
    let tree = parse(input);
    let diagnostics = tree.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    let diagnostic = &diagnostics[0];
    assert_eq!(diagnostic.code, ErrorCode::U0201);
    assert_eq!(diagnostic.start, Point::new(2, 13));
    assert_eq!(diagnostic.end, Point::new(2, 17));
    assert!(diagnostic.is_error());
}

#[test]
fn test_warning_diagnostic_has_related_opener() {
    let input = "\\p \\v 1 \\bd open\n\\p next";
    let tree = parse(input);
    let diagnostics = tree.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].severity, Severity::Warning);
    assert_eq!(diagnostics[0].related.len(), 1);
    assert_eq!(diagnostics[0].related[0].start, Point::new(0, 8));
}

#[test]
fn test_errors_sorted_by_start() {
    let tree = parse("\\p \\f + \\ft a \\f + b \\x* c");
    let starts: Vec<_> = tree.errors().iter().map(|e| e.range.start()).collect();
    let mut sorted = starts.clone();
    sorted.sort();
    assert_eq!(starts, sorted);
    assert!(starts.len() >= 2);
}

#[test]
fn test_trees_cross_threads() {
    let tree = Arc::new(parse(FULL_DOCUMENT));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let tree = Arc::clone(&tree);
            std::thread::spawn(move || tree.root().descendants().count())
        })
        .collect();
    let counts: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(counts.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn test_typed_access() {
    let tree = parse(WORD_ATTRIBUTES);
    let span = tree
        .root()
        .descendants()
        .find_map(CharacterSpan::cast)
        .unwrap();
    assert_eq!(span.marker().as_deref(), Some("w"));
    assert!(span.closer_token().is_some());
    let attributes = span.attributes().unwrap();
    let map = attributes.to_map(&tree.config().markers);
    assert_eq!(map.get("lemma").map(String::as_str), Some("grace"));
    assert_eq!(map.get("x-strong").map(String::as_str), Some("G5485"));

    let verse = tree.root().descendants().find_map(Verse::cast).unwrap();
    assert_eq!(verse.number().as_deref(), Some("1"));
}

#[test]
fn test_default_attribute_in_map() {
    let tree = parse("\\p \\w gracious|grace\\w*");
    let attributes = tree
        .root()
        .descendants()
        .find_map(CharacterSpan::cast)
        .and_then(|span| span.attributes())
        .unwrap();
    let map = attributes.to_map(&tree.config().markers);
    assert_eq!(map.get("lemma").map(String::as_str), Some("grace"));
}

#[test]
fn test_custom_default_attribute_in_map() {
    let markers = usfm3::parser::MarkerTable::usfm3()
        .with_marker("zx", usfm3::parser::MarkerClass::Character)
        .with_default_attribute("zx", "gloss");
    let config = Arc::new(ParserConfig::default().with_markers(markers));
    let tree = Tree::parse("\\p \\zx word|meaning\\zx*", config);
    let span = tree.root().descendants().find_map(CharacterSpan::cast).unwrap();
    assert_eq!(span.marker().as_deref(), Some("zx"));
    let map = span.attributes().unwrap().to_map(&tree.config().markers);
    assert_eq!(map.get("gloss").map(String::as_str), Some("meaning"));
}

#[test]
fn test_custom_config_survives_edits() {
    let config = ParserConfig::default().with_markers(
        usfm3::parser::MarkerTable::usfm3().with_marker("zq", usfm3::parser::MarkerClass::Paragraph),
    );
    let text = "\\zq one\n\\zq two\n";
    let tree = Tree::parse(text, Arc::new(config));
    let kinds: Vec<_> = tree.root().children().map(|n| n.kind()).collect();
    assert_eq!(kinds, vec![SyntaxKind::PARAGRAPH, SyntaxKind::PARAGRAPH]);

    let mut buffer = usfm3::SourceBuffer::new(text);
    let edit = buffer.insert(TextSize::new(6), " more").unwrap();
    let next = tree.edit(buffer.text(), &[edit]).unwrap();
    assert!(Arc::ptr_eq(next.config(), tree.config()));
    assert_lossless(&next, buffer.text());
    assert!(next.ok());
}
