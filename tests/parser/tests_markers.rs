//! Marker table and nesting matrix tests

use rstest::rstest;
use usfm3::parser::MarkerClass::{self, *};
use usfm3::parser::MarkerTable;
use usfm3::parser::markers::{implicitly_closes, permits};

// =============================================================================
// Lookup
// =============================================================================

#[rstest]
#[case("p", Paragraph, "p")]
#[case("q2", Paragraph, "q")]
#[case("toc3", Paragraph, "toc")]
#[case("mt1", Paragraph, "mt")]
#[case("tc1-2", TableCell, "tc")]
#[case("thr2", TableCell, "thr")]
#[case("+bd", Character, "bd")]
#[case("esb", Sidebar, "esb")]
#[case("esbe", SidebarEnd, "esbe")]
#[case("fr", NoteCharacter, "fr")]
#[case("x", CrossReference, "x")]
#[case("ts", Milestone, "ts")]
// names outside the table
#[case("zcustom", Character, "zcustom")]
#[case("xyz-s", Milestone, "xyz-s")]
#[case("xyz-e", Milestone, "xyz-e")]
#[case("unknown", Paragraph, "unknown")]
fn test_lookup(#[case] name: &str, #[case] class: MarkerClass, #[case] base: &str) {
    let info = MarkerTable::usfm3().lookup(name);
    assert_eq!(info.class, class, "class of {name}");
    assert_eq!(info.base.as_str(), base);
    assert_eq!(info.name.as_str(), name.trim_start_matches('+'));
}

#[rstest]
#[case("w", Some("lemma"))]
#[case("rb", Some("gloss"))]
#[case("xt", Some("href"))]
#[case("bd", None)]
fn test_default_attribute(#[case] name: &str, #[case] attribute: Option<&str>) {
    let info = MarkerTable::usfm3().lookup(name);
    assert_eq!(info.default_attribute.as_deref(), attribute);
}

#[test]
fn test_contains_only_table_entries() {
    let table = MarkerTable::usfm3();
    assert!(table.contains("q2"));
    assert!(table.contains("+nd"));
    assert!(!table.contains("zcustom"));
    assert!(!table.contains("qt-s"));
}

#[test]
fn test_custom_marker_overrides_fallback() {
    let table = MarkerTable::usfm3().with_marker("zpara", Paragraph);
    assert_eq!(table.lookup("zpara").class, Paragraph);
    assert_eq!(table.lookup("zother").class, Character);
}

// =============================================================================
// Nesting and implicit close matrices
// =============================================================================

/// Classes that may open inside `outer` (`None` is the document level)
fn allowed_inside(outer: Option<MarkerClass>) -> &'static [MarkerClass] {
    match outer {
        None => &[Book, Chapter, Verse, Paragraph, TableRow, Sidebar, Character, Footnote, CrossReference, Milestone],
        Some(Book) => &[Chapter, Verse, Paragraph, TableRow, Sidebar, Character, Footnote, CrossReference, Milestone],
        Some(Chapter) => &[Verse, Paragraph, TableRow, Sidebar, Character, Footnote, CrossReference, Milestone],
        Some(Verse) => &[Character, Footnote, CrossReference, Milestone],
        Some(Paragraph) => &[Verse, Character, Footnote, CrossReference, Milestone],
        Some(TableRow) => &[TableCell],
        Some(TableCell) => &[Verse, Character, Footnote, CrossReference, Milestone],
        Some(Sidebar) => &[Verse, Paragraph, TableRow, Character, Footnote, CrossReference, Milestone],
        Some(SidebarEnd) => &[],
        Some(Character) => &[Character, Footnote, CrossReference, Milestone],
        Some(Footnote) | Some(CrossReference) => &[Character, NoteCharacter, Milestone],
        Some(NoteCharacter) => &[Character, Milestone],
        Some(Milestone) => &[],
    }
}

/// Inner classes a closer for `closer` ends silently
fn closed_with(closer: MarkerClass) -> &'static [MarkerClass] {
    match closer {
        Sidebar => &[Verse, Paragraph, TableRow, TableCell, Character, Footnote, CrossReference, NoteCharacter, Milestone],
        Footnote | CrossReference => &[Character, NoteCharacter, Milestone],
        NoteCharacter => &[Character, Milestone],
        _ => &[],
    }
}

#[test]
fn test_nesting_matrix() {
    let outers = std::iter::once(None).chain(MarkerClass::ALL.iter().copied().map(Some));
    for outer in outers {
        for inner in MarkerClass::ALL {
            assert_eq!(
                permits(outer, inner),
                allowed_inside(outer).contains(&inner),
                "{inner:?} inside {outer:?}"
            );
        }
    }
}

#[test]
fn test_implicit_close_matrix() {
    for closer in MarkerClass::ALL {
        for inner in MarkerClass::ALL {
            assert_eq!(
                implicitly_closes(closer, inner),
                closed_with(closer).contains(&inner),
                "{closer:?} closer over {inner:?}"
            );
        }
    }
}

#[test]
fn test_ranks() {
    // a repeated opener ends the previous one
    for class in [Book, Chapter, Verse, Paragraph, TableRow, TableCell] {
        assert!(class.reach() >= class.frame_rank(), "{class:?}");
    }
    // spans, notes and milestones nest
    for class in [Character, Footnote, CrossReference, Milestone] {
        assert_eq!(class.reach(), 0, "{class:?}");
    }
    assert!(Sidebar.reach() < Sidebar.frame_rank());
    assert!(Paragraph.reach() < Chapter.frame_rank());
    assert!(Verse.reach() >= Verse.frame_rank());
}

#[test]
fn test_closer_flags() {
    let requires: Vec<_> = MarkerClass::ALL
        .into_iter()
        .filter(|c| c.requires_closer())
        .collect();
    assert_eq!(requires, vec![Sidebar, Character, Footnote, CrossReference, Milestone]);
    let takes: Vec<_> = MarkerClass::ALL
        .into_iter()
        .filter(|c| c.takes_closer())
        .collect();
    assert_eq!(takes, vec![Character, Footnote, CrossReference, NoteCharacter]);
}
