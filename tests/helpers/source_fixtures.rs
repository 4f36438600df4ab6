//! Common USFM fixtures for tests.

pub const EMPTY: &str = "";

pub const SIMPLE_PARAGRAPH: &str = "\\p In the beginning";

pub const BOOK_WITH_HEADERS: &str = "\\id GEN Genesis\n\\h Genesis\n\\toc1 The First Book of Moses\n\\mt1 Genesis\n";

pub const TWO_CHAPTERS: &str = r"\id GEN
\c 1
\p
\v 1 In the beginning God created the heavens and the earth.
\v 2 The earth was formless and empty.
\c 2
\p
\v 1 The heavens and the earth were finished.
";

pub const POETRY: &str = r"\id PSA
\c 1
\q1
\v 1 Blessed is the man
\q2 who doesn't walk in the counsel of the wicked,
\q1 nor stand on the path of sinners,
\b
\q1
\v 2 but his delight is in the LORD's law.
";

pub const FOOTNOTE: &str = "\\p \\v 1 Text\\f + \\fr 1:1 \\ft note.\\f*more text";

pub const CROSS_REFERENCE: &str = "\\p \\v 1 Jesus\\x - \\xo 1:1 \\xt Luke 3:23\\x* was born";

pub const WORD_ATTRIBUTES: &str = "\\p \\v 1 \\w gracious|lemma=\"grace\" x-strong=\"G5485\"\\w* words";

pub const MILESTONE_PAIR: &str = "\\p \\qt-s |who=\"Pilate\"\\*What is truth?\\qt-e\\*";

pub const TABLE: &str = r"\c 1
\tr \th1 Tribe \thr2 Count
\tr \tc1 Reuben \tcr2 46,500
\tr \tc1 Simeon \tcr2 59,300
\p After the table
";

pub const SIDEBAR: &str = r"\c 1
\esb
\ms Aside
\p Sidebar text
\esbe
\p After
";

pub const NESTED_SPANS: &str = "\\p \\bd bold \\+it bold italic\\+it*\\bd*";

/// A document mixing every construct, used by the incremental tests
pub const FULL_DOCUMENT: &str = r#"\id MAT The Gospel of Matthew
\h Matthew
\mt1 Matthew
\c 1
\s1 The genealogy
\p
\v 1 The book of the genealogy of \nd Jesus\nd* Christ,\f + \fr 1:1 \ft Messiah\f* son of David.
\v 2 \w Abraham|lemma="Abraham"\w* became the father of Isaac.
\q1 A line of poetry
\q2 and another\x - \xo 1:2 \xt Gen 21:3\x*
\c 2
\tr \th1 Name \thr2 Age
\tr \tc1 Isaac \tcr2 60
\esb
\p Inside the sidebar
\esbe
\p
\v 1 Now when Jesus was born \qt-s |who="Magi"\*Where is he?\qt-e\*
"#;
