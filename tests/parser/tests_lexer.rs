//! Lexer tests

use rstest::rstest;
use usfm3::SyntaxKind;
use usfm3::parser::lexer::{marker_name, next_token, tokenize};

use crate::helpers::source_fixtures::FULL_DOCUMENT;

fn kinds(input: &str) -> Vec<SyntaxKind> {
    tokenize(input).into_iter().map(|t| t.kind).collect()
}

#[rstest]
#[case("\\p", SyntaxKind::MARKER)]
#[case("\\q2", SyntaxKind::MARKER)]
#[case("\\+bd", SyntaxKind::MARKER)]
#[case("\\qt-s", SyntaxKind::MARKER)]
#[case("\\tc1-2", SyntaxKind::MARKER)]
#[case("\\bd*", SyntaxKind::MARKER_CLOSE)]
#[case("\\+it*", SyntaxKind::MARKER_CLOSE)]
#[case("\\*", SyntaxKind::MILESTONE_END)]
#[case("\\", SyntaxKind::ERROR)]
#[case("|", SyntaxKind::PIPE)]
#[case("~", SyntaxKind::NBSP)]
#[case("//", SyntaxKind::SOFT_BREAK)]
#[case("/", SyntaxKind::TEXT)]
#[case("word", SyntaxKind::TEXT)]
#[case("46,500", SyntaxKind::TEXT)]
#[case(" \t", SyntaxKind::WHITESPACE)]
#[case("\r\n", SyntaxKind::NEWLINE)]
#[case("\r", SyntaxKind::NEWLINE)]
fn test_single_token(#[case] input: &str, #[case] kind: SyntaxKind) {
    assert_eq!(kinds(input), vec![kind]);
}

#[rstest]
#[case("\\bd*", "bd")]
#[case("\\+it*", "it")]
#[case("\\+nd", "nd")]
#[case("\\zaln-s", "zaln-s")]
#[case("\\v", "v")]
fn test_marker_name(#[case] text: &str, #[case] name: &str) {
    assert_eq!(marker_name(text), name);
}

#[test]
fn test_milestone_marker_and_terminator() {
    assert_eq!(
        kinds("\\qt-e\\*"),
        vec![SyntaxKind::MARKER, SyntaxKind::MILESTONE_END]
    );
}

#[test]
fn test_attribute_text_is_plain_text() {
    assert_eq!(
        kinds("word|lemma=\"x\""),
        vec![SyntaxKind::TEXT, SyntaxKind::PIPE, SyntaxKind::TEXT]
    );
}

#[test]
fn test_triple_slash() {
    assert_eq!(kinds("a///b"), vec![
        SyntaxKind::TEXT,
        SyntaxKind::SOFT_BREAK,
        SyntaxKind::TEXT,
        SyntaxKind::TEXT,
    ]);
}

#[test]
fn test_tokens_tile_input() {
    let tokens = tokenize(FULL_DOCUMENT);
    let joined: String = tokens.iter().map(|t| t.text).collect();
    assert_eq!(joined, FULL_DOCUMENT);
    for pair in tokens.windows(2) {
        assert_eq!(pair[0].range().end(), pair[1].range().start());
    }
}

#[test]
fn test_next_token_matches_full_scan() {
    for token in tokenize(FULL_DOCUMENT) {
        let single = next_token(FULL_DOCUMENT, token.offset).unwrap();
        assert_eq!(single, token);
    }
}

#[test]
fn test_next_token_at_end_and_off_boundary() {
    let text = "\\p é";
    assert!(next_token(text, usfm3::TextSize::of(text)).is_none());
    // inside the two-byte é
    assert!(next_token(text, usfm3::TextSize::new(4)).is_none());
}
