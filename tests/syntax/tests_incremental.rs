//! Incremental parsing tests
//!
//! An incrementally updated tree must equal a fresh parse of the same
//! text, and nodes outside the edited unit must be reused as-is.

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use rstest::rstest;
use usfm3::base::SourceBuffer;
use usfm3::{EditError, SyntaxKind, SyntaxNode, TextRange, TextSize, Tree, parse, parse_incremental};

use crate::helpers::source_fixtures::*;
use crate::helpers::tree_assertions::assert_lossless;

fn range(start: usize, end: usize) -> TextRange {
    TextRange::new(TextSize::new(start as u32), TextSize::new(end as u32))
}

fn same_green(a: &SyntaxNode, b: &SyntaxNode) -> bool {
    let (a, b) = (a.green(), b.green());
    std::ptr::eq(&*a, &*b)
}

/// Apply one replacement and check the result against a fresh parse
fn edit_and_compare(buffer: &mut SourceBuffer, tree: &Tree, range: TextRange, text: &str) -> Tree {
    let edit = buffer.edit(range, text).unwrap();
    let next = parse_incremental(buffer.text(), tree, &[edit]).unwrap();
    let fresh = parse(buffer.text());
    assert!(
        next.structurally_eq(&fresh),
        "incremental parse differs after replacing {range:?} with {text:?}\n\
         text: {:?}\nincremental: {:#?}\nfresh: {:#?}\n{:?}\n{:?}",
        buffer.text(),
        next.root(),
        fresh.root(),
        next.errors(),
        fresh.errors(),
    );
    assert_eq!(next.generation(), tree.generation() + 1);
    next
}

// =============================================================================
// Equivalence on targeted edits
// =============================================================================

#[rstest]
// text inside a verse
#[case("genealogy of", "family of")]
// split a paragraph
#[case("son of David.", "son\n\\p of David.")]
// a new chapter inside chapter one
#[case("\\q1 A line", "\\c 9\n\\q1 A line")]
// open a span and leave it
#[case("Christ,", "\\bd Christ,")]
// close the note early
#[case("\\ft Messiah", "\\f*\\ft Messiah")]
// delete the sidebar terminator
#[case("\\esbe\n", "")]
// a table row becomes a paragraph
#[case("\\tr \\tc1 Isaac", "\\p \\tc1 Isaac")]
// break an attribute value
#[case("lemma=\"Abraham\"", "lemma=\"Abraham")]
// drop the milestone terminator
#[case("\\qt-e\\*", "\\qt-e")]
// change the book code
#[case("MAT", "MRK")]
// a paragraph marker becomes a verse
#[case("\\q2 and", "\\v 3 and")]
// an unknown marker ends the table
#[case("Age", "A\\ge")]
// a lone backslash
#[case("Age", "Age \\")]
fn test_targeted_edit(#[case] find: &str, #[case] replace: &str) {
    let start = FULL_DOCUMENT.find(find).unwrap();
    let mut buffer = SourceBuffer::new(FULL_DOCUMENT);
    let tree = parse(buffer.text());
    let next = edit_and_compare(&mut buffer, &tree, range(start, start + find.len()), replace);
    assert_lossless(&next, buffer.text());
}

#[test]
fn test_edit_sequence() {
    let mut buffer = SourceBuffer::new(TWO_CHAPTERS);
    let mut tree = parse(buffer.text());
    let steps: [(&str, &str); 5] = [
        ("formless", "without form"),
        ("finished", "finished, \\bd all\\bd*"),
        ("\\v 2", "\\v 2 \\f + \\ft note\\f*"),
        ("\\c 2", "\\c 2\n\\s1 Rest"),
        ("empty.", "empty.\n\\q1 poetry"),
    ];
    for (find, replace) in steps {
        let start = buffer.text().find(find).unwrap();
        tree = edit_and_compare(&mut buffer, &tree, range(start, start + find.len()), replace);
    }
    assert_eq!(tree.generation(), 5);
    assert!(tree.ok(), "{:?}", tree.errors());
}

#[test]
fn test_batched_edits() {
    let mut buffer = SourceBuffer::new(FULL_DOCUMENT);
    let tree = parse(buffer.text());
    let mut edits = Vec::new();
    for (find, replace) in [("Messiah", "Anointed"), ("Isaac", "Jacob"), ("Magi", "wise men")] {
        let start = buffer.text().find(find).unwrap();
        edits.push(buffer.edit(range(start, start + find.len()), replace).unwrap());
    }
    let next = parse_incremental(buffer.text(), &tree, &edits).unwrap();
    assert!(next.structurally_eq(&parse(buffer.text())));
    assert_eq!(next.generation(), 1);
}

// =============================================================================
// Reuse
// =============================================================================

#[test]
fn test_untouched_nodes_are_shared() {
    let mut buffer = SourceBuffer::new(FULL_DOCUMENT);
    let tree = parse(buffer.text());
    let start = buffer.text().find("A line of poetry").unwrap();
    let edit = buffer.edit(range(start, start + 1), "One").unwrap();
    let next = tree.edit(buffer.text(), &[edit]).unwrap();

    let chapters = |tree: &Tree| {
        tree.root()
            .descendants()
            .filter(|n| n.kind() == SyntaxKind::CHAPTER)
            .collect::<Vec<_>>()
    };
    let (old, new) = (chapters(&tree), chapters(&next));
    // the edited chapter is rebuilt around the new paragraph
    assert!(!same_green(&old[0], &new[0]));
    assert!(same_green(&old[1], &new[1]));

    let paragraphs = |chapter: &SyntaxNode| {
        chapter
            .children()
            .filter(|n| n.kind() == SyntaxKind::PARAGRAPH)
            .collect::<Vec<_>>()
    };
    let (old, new) = (paragraphs(&old[0]), paragraphs(&new[0]));
    assert_eq!(old.len(), new.len());
    let shared: Vec<bool> = old.iter().zip(&new).map(|(a, b)| same_green(a, b)).collect();
    // s1, p and q2 are reused; only the edited q1 is new
    assert_eq!(shared, vec![true, true, false, true]);
}

#[test]
fn test_header_edit_shares_chapters() {
    let mut buffer = SourceBuffer::new(FULL_DOCUMENT);
    let tree = parse(buffer.text());
    let start = buffer.text().find("\\h Matthew").unwrap() + 3;
    let edit = buffer.edit(range(start, start + 7), "Mt").unwrap();
    let next = tree.edit(buffer.text(), &[edit]).unwrap();
    assert!(next.structurally_eq(&parse(buffer.text())));

    let chapters = |tree: &Tree| {
        tree.root()
            .descendants()
            .filter(|n| n.kind() == SyntaxKind::CHAPTER)
            .collect::<Vec<_>>()
    };
    for (a, b) in chapters(&tree).iter().zip(&chapters(&next)) {
        assert!(same_green(a, b));
    }
}

// =============================================================================
// Invalid edits
// =============================================================================

#[test]
fn test_invalid_edits_leave_tree_untouched() {
    let mut buffer = SourceBuffer::new(SIMPLE_PARAGRAPH);
    let tree = parse(buffer.text());
    let edit = buffer.insert(TextSize::new(3), "Once ").unwrap();

    let err = parse_incremental(SIMPLE_PARAGRAPH, &tree, &[edit]).unwrap_err();
    assert!(matches!(err, EditError::LengthMismatch { .. }));
    assert_eq!(tree.generation(), 0);
    assert_eq!(tree.text(), SIMPLE_PARAGRAPH);

    assert!(matches!(
        buffer.edit(range(0, 1000), ""),
        Err(EditError::OutOfBounds { .. })
    ));
}

// =============================================================================
// Random edits
// =============================================================================

const DOCUMENTS: &[&str] = &[
    FULL_DOCUMENT,
    TWO_CHAPTERS,
    POETRY,
    TABLE,
    SIDEBAR,
    FOOTNOTE,
    WORD_ATTRIBUTES,
    MILESTONE_PAIR,
];

const INSERTIONS: &[&str] = &[
    "",
    "a",
    " ",
    "\n",
    "word ",
    "\\p ",
    "\\q2 ",
    "\\v 7 ",
    "\\c 9\n",
    "\\id EXO\n",
    "\\bd ",
    "\\bd*",
    "\\+it ",
    "\\f + ",
    "\\ft ",
    "\\f*",
    "\\x - ",
    "\\x*",
    "|",
    "|lemma=\"x\"",
    "~",
    "//",
    "\\esb\n",
    "\\esbe\n",
    "\\tr \\tc1 ",
    "\\th2 ",
    "\\qt-s\\*",
    "\\*",
    "\\",
    "\"",
];

/// (position, deleted length, insertion) with the position scaled later
fn edit_strategy() -> impl Strategy<Value = (usize, usize, usize)> {
    (0usize..10_000, 0usize..12, 0..INSERTIONS.len())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn incremental_matches_fresh_parse(
        document in 0..DOCUMENTS.len(),
        edits in prop::collection::vec(edit_strategy(), 1..6),
    ) {
        let mut buffer = SourceBuffer::new(DOCUMENTS[document]);
        let mut tree = parse(buffer.text());
        for (position, deleted, insertion) in edits {
            let len = buffer.text().len();
            let start = position % (len + 1);
            let end = (start + deleted).min(len);
            let edit = buffer.edit(range(start, end), INSERTIONS[insertion]).unwrap();
            tree = parse_incremental(buffer.text(), &tree, &[edit]).unwrap();
            let fresh = parse(buffer.text());
            prop_assert!(
                tree.structurally_eq(&fresh),
                "text: {:?}\nincremental: {:#?}\nfresh: {:#?}",
                buffer.text(),
                tree.root(),
                fresh.root()
            );
        }
    }

    #[test]
    fn batched_edits_match_fresh_parse(
        document in 0..DOCUMENTS.len(),
        edits in prop::collection::vec(edit_strategy(), 1..4),
    ) {
        let mut buffer = SourceBuffer::new(DOCUMENTS[document]);
        let tree = parse(buffer.text());
        let mut applied = Vec::new();
        for (position, deleted, insertion) in edits {
            let len = buffer.text().len();
            let start = position % (len + 1);
            let end = (start + deleted).min(len);
            applied.push(buffer.edit(range(start, end), INSERTIONS[insertion]).unwrap());
        }
        let next = parse_incremental(buffer.text(), &tree, &applied).unwrap();
        prop_assert!(next.structurally_eq(&parse(buffer.text())));
        prop_assert_eq!(next.text(), buffer.text());
    }
}
