//! Error recovery tests
//!
//! Misplaced markers, missing arguments and lexical errors. Each case
//! checks the diagnostic codes and the text the `ERROR` nodes cover.

#![allow(clippy::unwrap_used)]

use rstest::rstest;
use usfm3::{ErrorCode, ParserConfig, SyntaxKind, parse, parse_with_config};

use crate::helpers::tree_assertions::{assert_lossless, error_codes, node_texts};

// =============================================================================
// Misplaced markers and stray terminators
// =============================================================================

#[rstest]
#[case("\\p a \\ft stray \\v 1 b", &["\\ft stray "], &[ErrorCode::U0401])]
#[case("\\p a \\tc1 b", &["\\tc1 b"], &[ErrorCode::U0401])]
#[case(
    "\\p \\f + \\ft a \\f + b\\f* c\\f*",
    &["\\f + b", "\\f*"],
    &[ErrorCode::U0401, ErrorCode::U0201]
)]
#[case("\\p a \\esbe b", &["\\esbe"], &[ErrorCode::U0204])]
#[case("\\p a\\* b", &["\\*"], &[ErrorCode::U0204])]
#[case("\\p a \\ b", &["\\"], &[ErrorCode::U0101])]
#[case("\\p a\\it*\n\\p b", &["\\it*"], &[ErrorCode::U0201])]
fn test_recovery(#[case] input: &str, #[case] errors: &[&str], #[case] codes: &[ErrorCode]) {
    let tree = parse(input);
    assert_lossless(&tree, input);
    assert_eq!(node_texts(&tree, SyntaxKind::ERROR), errors);
    assert_eq!(error_codes(&tree), codes);
}

#[test]
fn test_recovery_resumes_at_verse() {
    let tree = parse("\\p a \\ft stray \\v 1 b");
    let verses = node_texts(&tree, SyntaxKind::VERSE);
    assert_eq!(verses, vec!["\\v 1 b"]);
}

#[test]
fn test_note_character_hint() {
    let tree = parse("\\p a \\ft stray");
    let error = &tree.errors()[0];
    assert_eq!(error.code, ErrorCode::U0401);
    assert!(error.hint.as_deref().unwrap().contains("footnote or cross reference"));
}

#[test]
fn test_depth_hint() {
    let config = ParserConfig::default().with_max_nesting_depth(2);
    let tree = parse_with_config("\\p \\bd a \\+it b", config);
    let error = tree
        .errors()
        .iter()
        .find(|e| e.code == ErrorCode::U0401)
        .unwrap();
    assert!(error.hint.as_deref().unwrap().contains("nested deeper than 2"));
}

// =============================================================================
// Missing arguments
// =============================================================================

#[rstest]
#[case("\\c\n\\p a", "chapter number")]
#[case("\\p \\v \\bd x\\bd*", "verse number")]
#[case("\\id\n\\c 1", "book code")]
#[case("\\p \\f \\ft a\\f*", "note caller")]
fn test_missing_argument(#[case] input: &str, #[case] what: &str) {
    let tree = parse(input);
    assert_lossless(&tree, input);
    assert_eq!(error_codes(&tree), vec![ErrorCode::U0402]);
    assert!(tree.errors()[0].message.contains(what));
    // a zero-width marker node stands in for the argument
    let errors = tree.error_nodes();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].is_empty());
}

// =============================================================================
// Attributes
// =============================================================================

#[rstest]
#[case("\\p \\w x|lemma=\"grace\\w*", ErrorCode::U0102)]
#[case("\\p \\w x|lemma=grace\\w*", ErrorCode::U0301)]
#[case("\\p \\w x|\\w*", ErrorCode::U0301)]
fn test_attribute_errors(#[case] input: &str, #[case] code: ErrorCode) {
    let tree = parse(input);
    assert_lossless(&tree, input);
    assert_eq!(error_codes(&tree), vec![code]);
    // the span itself still closes
    assert_eq!(node_texts(&tree, SyntaxKind::CHARACTER_SPAN).len(), 1);
}

#[test]
fn test_good_attribute_survives_bad_neighbour() {
    let tree = parse("\\p \\w x|lemma=\"a\" bad strong=\"H1\"\\w*");
    assert_eq!(error_codes(&tree), vec![ErrorCode::U0301]);
    let attributes = node_texts(&tree, SyntaxKind::ATTRIBUTE);
    assert_eq!(attributes, vec!["lemma=\"a\"", "strong=\"H1\""]);
    assert_eq!(node_texts(&tree, SyntaxKind::ERROR), vec!["bad"]);
}

// =============================================================================
// Garbage in, tree out
// =============================================================================

#[rstest]
#[case("\\")]
#[case("\\*\\*\\*")]
#[case("\\p |||")]
#[case("\\f*\\x*\\esbe")]
#[case("\\v\\c\\id")]
#[case("\\esb \\esb \\esbe")]
#[case("\\tr \\tr \\tc1 \\th1")]
#[case("\\w |\n\\w*")]
fn test_garbage_is_lossless(#[case] input: &str) {
    let tree = parse(input);
    assert_lossless(&tree, input);
}
