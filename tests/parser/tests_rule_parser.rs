//! Rule parser tests
//!
//! Units parsed on their own must come out identical to the same unit
//! inside a whole document.

#![allow(clippy::unwrap_used)]

use rstest::rstest;
use usfm3::parser::rule_parser::{Rule, parse_rule};
use usfm3::{ParserConfig, SyntaxKind, parse};

use crate::helpers::source_fixtures::{FULL_DOCUMENT, SIDEBAR, TABLE, TWO_CHAPTERS};

fn rule(rule: Rule, input: &str) -> Option<usfm3::parser::rule_parser::RuleParseResult> {
    parse_rule(rule, input, &ParserConfig::default())
}

#[rstest]
#[case(Rule::Book, TWO_CHAPTERS, SyntaxKind::BOOK)]
#[case(Rule::Book, FULL_DOCUMENT, SyntaxKind::BOOK)]
#[case(Rule::Chapter, "\\c 1\n\\p \\v 1 a\n\\v 2 b\n", SyntaxKind::CHAPTER)]
#[case(Rule::Paragraph, "\\q1 \\v 3 poetry \\bd line\\bd*\n", SyntaxKind::PARAGRAPH)]
#[case(Rule::Table, "\\tr \\th1 A \\th2 B\n\\tr \\tc1 a \\tcr2 b\n", SyntaxKind::TABLE)]
#[case(Rule::Sidebar, "\\esb\n\\ms Title\n\\p text\n\\esbe\n", SyntaxKind::SIDEBAR)]
fn test_rule_accepts(#[case] rule_kind: Rule, #[case] input: &str, #[case] kind: SyntaxKind) {
    let result = rule(rule_kind, input).unwrap();
    assert!(result.is_ok(), "errors: {:?}", result.errors());
    assert!(result.fully_consumed());
    let nodes = result.nodes();
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].kind(), kind);
    assert_eq!(result.rule, rule_kind);
}

#[rstest]
#[case(Rule::Book, "\\c 1\n\\p text")]
#[case(Rule::Chapter, "\\p text")]
#[case(Rule::Paragraph, "\\v 1 loose verse")]
#[case(Rule::Paragraph, "\\p text\n\\esb \\p aside \\esbe")]
#[case(Rule::Table, "\\tr \\tc1 a\n\\tr \\tc1 b\n\\p after")]
#[case(Rule::Sidebar, "\\esb \\p aside \\esbe\n\\p after")]
fn test_rule_rejects(#[case] rule_kind: Rule, #[case] input: &str) {
    assert!(rule(rule_kind, input).is_none());
}

/// Same green node whether parsed alone or inside the document
#[rstest]
#[case("\\id GEN\n\\c 1\n", "\\p \\v 1 a \\f + \\ft note\\f* b\n", Rule::Paragraph)]
#[case("\\id GEN\n", "\\c 3\n\\p \\v 1 a\n", Rule::Chapter)]
#[case("\\id GEN\n\\c 1\n", "\\tr \\tc1 a \\tcr2 b\n", Rule::Table)]
#[case("\\id GEN\n\\c 1\n", "\\esb\n\\p aside\n\\esbe\n", Rule::Sidebar)]
fn test_rule_matches_document(#[case] prefix: &str, #[case] unit: &str, #[case] rule_kind: Rule) {
    let document = parse(&format!("{prefix}{unit}"));
    let in_document = document
        .root()
        .descendants()
        .find(|n| n.kind() == rule_kind.kind())
        .unwrap();
    let alone = rule(rule_kind, unit).unwrap();
    assert_eq!(
        alone.nodes()[0].green().into_owned(),
        in_document.green().into_owned()
    );
}

#[test]
fn test_table_fixture_rows() {
    let rows = TABLE
        .lines()
        .filter(|line| line.starts_with("\\tr"))
        .collect::<Vec<_>>()
        .join("\n");
    let result = rule(Rule::Table, &rows).unwrap();
    let table = &result.nodes()[0];
    assert_eq!(
        table
            .children()
            .filter(|n| n.kind() == SyntaxKind::TABLE_ROW)
            .count(),
        3
    );
}

#[test]
fn test_sidebar_fixture() {
    let start = SIDEBAR.find("\\esb").unwrap();
    let end = SIDEBAR.find("\\p After").unwrap();
    let result = rule(Rule::Sidebar, &SIDEBAR[start..end]).unwrap();
    assert!(result.is_ok());
}
