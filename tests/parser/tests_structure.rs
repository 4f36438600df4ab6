//! Document structure tests
//!
//! Well-formed documents parse without diagnostics into the expected
//! node shapes, and every byte of the input stays in the tree.

#![allow(clippy::unwrap_used)]

use rstest::rstest;
use usfm3::parser::{AstNode, Content, Document, HasMarker};
use usfm3::{SyntaxKind, parse};

use crate::helpers::source_fixtures::*;
use crate::helpers::tree_assertions::{assert_clean, assert_lossless, node_texts, shape};

// =============================================================================
// Shapes of well-formed documents
// =============================================================================

#[rstest]
#[case(EMPTY, "DOCUMENT")]
#[case(SIMPLE_PARAGRAPH, "DOCUMENT{PARAGRAPH(p){TEXT_RUN}}")]
#[case(
    "\\id GEN Genesis\n\\c 1\n\\p \\v 1 text\n",
    "DOCUMENT{BOOK{BOOK_HEADER(id){TEXT_RUN} CHAPTER(c){PARAGRAPH(p){VERSE(v){TEXT_RUN}}}}}"
)]
#[case(
    BOOK_WITH_HEADERS,
    "DOCUMENT{BOOK{BOOK_HEADER(id){TEXT_RUN} PARAGRAPH(h){TEXT_RUN} PARAGRAPH(toc1){TEXT_RUN} PARAGRAPH(mt1){TEXT_RUN}}}"
)]
#[case(
    TWO_CHAPTERS,
    "DOCUMENT{BOOK{BOOK_HEADER(id) \
     CHAPTER(c){PARAGRAPH(p){VERSE(v){TEXT_RUN} VERSE(v){TEXT_RUN}}} \
     CHAPTER(c){PARAGRAPH(p){VERSE(v){TEXT_RUN}}}}}"
)]
#[case(
    POETRY,
    "DOCUMENT{BOOK{BOOK_HEADER(id) CHAPTER(c){\
     PARAGRAPH(q1){VERSE(v){TEXT_RUN}} PARAGRAPH(q2){TEXT_RUN} PARAGRAPH(q1){TEXT_RUN} \
     PARAGRAPH(b) PARAGRAPH(q1){VERSE(v){TEXT_RUN}}}}}"
)]
#[case(
    FOOTNOTE,
    "DOCUMENT{PARAGRAPH(p){VERSE(v){TEXT_RUN \
     FOOTNOTE(f){NOTE_CHAR(fr){TEXT_RUN} NOTE_CHAR(ft){TEXT_RUN}} TEXT_RUN}}}"
)]
#[case(
    CROSS_REFERENCE,
    "DOCUMENT{PARAGRAPH(p){VERSE(v){TEXT_RUN \
     CROSS_REFERENCE(x){NOTE_CHAR(xo){TEXT_RUN} NOTE_CHAR(xt){TEXT_RUN}} TEXT_RUN}}}"
)]
#[case(
    NESTED_SPANS,
    "DOCUMENT{PARAGRAPH(p){CHARACTER_SPAN(bd){TEXT_RUN CHARACTER_SPAN(it){TEXT_RUN}}}}"
)]
#[case(
    WORD_ATTRIBUTES,
    "DOCUMENT{PARAGRAPH(p){VERSE(v){CHARACTER_SPAN(w){TEXT_RUN ATTRIBUTE_LIST{ATTRIBUTE ATTRIBUTE}} TEXT_RUN}}}"
)]
#[case(
    MILESTONE_PAIR,
    "DOCUMENT{PARAGRAPH(p){MILESTONE(qt-s){ATTRIBUTE_LIST{ATTRIBUTE}} TEXT_RUN MILESTONE(qt-e)}}"
)]
#[case(
    TABLE,
    "DOCUMENT{CHAPTER(c){TABLE{\
     TABLE_ROW(tr){TABLE_CELL(th1){TEXT_RUN} TABLE_CELL(thr2){TEXT_RUN}} \
     TABLE_ROW(tr){TABLE_CELL(tc1){TEXT_RUN} TABLE_CELL(tcr2){TEXT_RUN}} \
     TABLE_ROW(tr){TABLE_CELL(tc1){TEXT_RUN} TABLE_CELL(tcr2){TEXT_RUN}}} \
     PARAGRAPH(p){TEXT_RUN}}}"
)]
#[case(
    SIDEBAR,
    "DOCUMENT{CHAPTER(c){SIDEBAR(esb){PARAGRAPH(ms){TEXT_RUN} PARAGRAPH(p){TEXT_RUN}} PARAGRAPH(p){TEXT_RUN}}}"
)]
fn test_document_shape(#[case] input: &str, #[case] expected: &str) {
    let tree = parse(input);
    assert_clean(&tree);
    assert_lossless(&tree, input);
    assert_eq!(shape(&tree.root()), expected);
}

#[test]
fn test_full_document_is_clean() {
    let tree = parse(FULL_DOCUMENT);
    assert_clean(&tree);
    assert_lossless(&tree, FULL_DOCUMENT);
}

// =============================================================================
// Markers outside the standard table
// =============================================================================

#[rstest]
#[case("\\p a \\zcustom b\\zcustom*", "DOCUMENT{PARAGRAPH(p){TEXT_RUN CHARACTER_SPAN(zcustom){TEXT_RUN}}}")]
#[case("\\p a \\unknown b", "DOCUMENT{PARAGRAPH(p){TEXT_RUN} PARAGRAPH(unknown){TEXT_RUN}}")]
#[case("\\p a \\zaln-s |x-occurrence=\"1\"\\*b\\zaln-e\\*", "DOCUMENT{PARAGRAPH(p){TEXT_RUN MILESTONE(zaln-s){ATTRIBUTE_LIST{ATTRIBUTE}} TEXT_RUN MILESTONE(zaln-e)}}")]
fn test_unknown_markers(#[case] input: &str, #[case] expected: &str) {
    let tree = parse(input);
    assert_clean(&tree);
    assert_eq!(shape(&tree.root()), expected);
}

// =============================================================================
// Text and trivia
// =============================================================================

#[test]
fn test_text_run_tokens() {
    let tree = parse("\\p a~b//c");
    let run = tree
        .root()
        .descendants()
        .find(|n| n.kind() == SyntaxKind::TEXT_RUN)
        .unwrap();
    let kinds: Vec<_> = run
        .children_with_tokens()
        .filter_map(|e| e.into_token())
        .map(|t| t.kind())
        .collect();
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::TEXT,
            SyntaxKind::NBSP,
            SyntaxKind::TEXT,
            SyntaxKind::SOFT_BREAK,
            SyntaxKind::TEXT,
        ]
    );
}

#[rstest]
#[case("\\p a\r\n\\p b\r\n")]
#[case("\\p a\r\\p b")]
#[case("  \n\\p leading whitespace")]
#[case("text before any marker\n\\p a")]
#[case("\\p trailing spaces   \n\n\n")]
#[case("\\p\t\\v\t1\ttabs")]
fn test_lossless_trivia(#[case] input: &str) {
    let tree = parse(input);
    assert_lossless(&tree, input);
}

#[test]
fn test_literal_pipe_in_paragraph() {
    let input = "\\p either | or";
    let tree = parse(input);
    assert_clean(&tree);
    assert!(node_texts(&tree, SyntaxKind::ATTRIBUTE_LIST).is_empty());
    assert_eq!(node_texts(&tree, SyntaxKind::TEXT_RUN), vec!["either | or"]);
}

// =============================================================================
// Typed AST over real documents
// =============================================================================

#[test]
fn test_ast_verse_numbers() {
    let tree = parse("\\c 1\n\\p \\v 1 a \\v 2-3 b \\v 4a c\n");
    let document = tree.document().unwrap();
    let numbers: Vec<_> = document
        .chapters()
        .flat_map(|c| c.verses().filter_map(|v| v.number()).collect::<Vec<_>>())
        .collect();
    assert_eq!(numbers, vec!["1", "2-3", "4a"]);
}

#[test]
fn test_ast_full_document_walk() {
    let tree = parse(FULL_DOCUMENT);
    let document = Document::cast(tree.root()).unwrap();
    let book = document.books().next().unwrap();
    assert_eq!(book.code().as_deref(), Some("MAT"));
    assert_eq!(
        book.header().and_then(|h| h.description()).as_deref(),
        Some("The Gospel of Matthew")
    );

    let chapters: Vec<_> = book.chapters().collect();
    assert_eq!(chapters.len(), 2);
    let markers: Vec<_> = chapters[0]
        .paragraphs()
        .filter_map(|p| p.marker())
        .collect();
    assert_eq!(markers, vec!["s1", "p", "q1", "q2"]);

    let kinds: Vec<_> = chapters[1]
        .contents()
        .map(|c| match c {
            Content::Table(_) => "table",
            Content::Sidebar(_) => "sidebar",
            Content::Paragraph(_) => "paragraph",
            _ => "other",
        })
        .collect();
    assert_eq!(kinds, vec!["table", "sidebar", "paragraph"]);
}
