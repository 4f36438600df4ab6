//! USFM3 marker table and the nesting data that drives the sub-scanner
//!
//! Everything the parser needs to know about a marker is looked up here:
//! its class, how far an opener of that class reaches when it implicitly
//! closes open markers, which classes may open inside which, and which
//! frames an enclosing closer ends silently. The matrices are plain data so
//! they can be checked pair by pair.

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

/// Structural class of a marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MarkerClass {
    Book,
    Chapter,
    Verse,
    Paragraph,
    TableRow,
    TableCell,
    Sidebar,
    SidebarEnd,
    Character,
    Footnote,
    CrossReference,
    NoteCharacter,
    Milestone,
}

/// Number of marker classes; the width of the matrices below
pub const CLASS_COUNT: usize = 13;

impl MarkerClass {
    pub const ALL: [MarkerClass; CLASS_COUNT] = [
        MarkerClass::Book,
        MarkerClass::Chapter,
        MarkerClass::Verse,
        MarkerClass::Paragraph,
        MarkerClass::TableRow,
        MarkerClass::TableCell,
        MarkerClass::Sidebar,
        MarkerClass::SidebarEnd,
        MarkerClass::Character,
        MarkerClass::Footnote,
        MarkerClass::CrossReference,
        MarkerClass::NoteCharacter,
        MarkerClass::Milestone,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_note(self) -> bool {
        matches!(self, MarkerClass::Footnote | MarkerClass::CrossReference)
    }

    /// Rank of an open frame of this class. An opener whose reach is at
    /// least this rank closes the frame.
    pub fn frame_rank(self) -> u8 {
        FRAME_RANK[self.index()]
    }

    /// How far an opener of this class reaches. Zero means it nests and
    /// never closes anything.
    pub fn reach(self) -> u8 {
        REACH[self.index()]
    }

    /// Whether an open frame of this class must be ended by its own closer
    pub fn requires_closer(self) -> bool {
        REQUIRES_CLOSER[self.index()]
    }

    /// Whether a `\name*` closer can end a frame of this class
    pub fn takes_closer(self) -> bool {
        TAKES_CLOSER[self.index()]
    }

    /// Whether a pipe inside a frame of this class starts an attribute list
    pub fn accepts_attributes(self) -> bool {
        matches!(self, MarkerClass::Character | MarkerClass::Milestone)
    }

    /// Whether a marker of this class only structures note content
    pub fn is_scoped_to_notes(self) -> bool {
        matches!(self, MarkerClass::NoteCharacter)
    }

    pub fn description(self) -> &'static str {
        match self {
            MarkerClass::Book => "book",
            MarkerClass::Chapter => "chapter",
            MarkerClass::Verse => "verse",
            MarkerClass::Paragraph => "paragraph",
            MarkerClass::TableRow => "table row",
            MarkerClass::TableCell => "table cell",
            MarkerClass::Sidebar => "sidebar",
            MarkerClass::SidebarEnd => "sidebar end",
            MarkerClass::Character => "character span",
            MarkerClass::Footnote => "footnote",
            MarkerClass::CrossReference => "cross reference",
            MarkerClass::NoteCharacter => "note character",
            MarkerClass::Milestone => "milestone",
        }
    }
}

// =============================================================================
// RANKS
// =============================================================================

/// Rank of the verse level; openers at or above it are recovery points
pub const VERSE_RANK: u8 = 30;

// Order: Book Chapter Verse Paragraph TableRow TableCell Sidebar SidebarEnd
//        Character Footnote CrossReference NoteCharacter Milestone
const FRAME_RANK: [u8; CLASS_COUNT] = [70, 60, 30, 50, 50, 40, 55, 0, 10, 20, 20, 15, 10];
const REACH: [u8; CLASS_COUNT] = [70, 60, 30, 50, 50, 40, 50, 55, 0, 0, 0, 15, 0];
const REQUIRES_CLOSER: [bool; CLASS_COUNT] = [
    false, false, false, false, false, false, true, false, true, true, true, false, true,
];
const TAKES_CLOSER: [bool; CLASS_COUNT] = [
    false, false, false, false, false, false, false, false, true, true, true, true, false,
];

// =============================================================================
// NESTING: which class may open inside which
// =============================================================================

const T: bool = true;
const F: bool = false;

/// `NESTING[outer][inner]`; row 0 is the document level (no open frame),
/// rows 1.. follow [`MarkerClass::ALL`].
///
/// Columns: Bk Ch Vs Pa TR TC Sb SE Chr Fn Xr NC Ms
#[rustfmt::skip]
pub const NESTING: [[bool; CLASS_COUNT]; CLASS_COUNT + 1] = [
    /* document  */ [T, T, T, T, T, F, T, F, T, T, T, F, T],
    /* book      */ [F, T, T, T, T, F, T, F, T, T, T, F, T],
    /* chapter   */ [F, F, T, T, T, F, T, F, T, T, T, F, T],
    /* verse     */ [F, F, F, F, F, F, F, F, T, T, T, F, T],
    /* paragraph */ [F, F, T, F, F, F, F, F, T, T, T, F, T],
    /* table row */ [F, F, F, F, F, T, F, F, F, F, F, F, F],
    /* cell      */ [F, F, T, F, F, F, F, F, T, T, T, F, T],
    /* sidebar   */ [F, F, T, T, T, F, F, F, T, T, T, F, T],
    /* side end  */ [F, F, F, F, F, F, F, F, F, F, F, F, F],
    /* character */ [F, F, F, F, F, F, F, F, T, T, T, F, T],
    /* footnote  */ [F, F, F, F, F, F, F, F, T, F, F, T, T],
    /* crossref  */ [F, F, F, F, F, F, F, F, T, F, F, T, T],
    /* note char */ [F, F, F, F, F, F, F, F, T, F, F, F, T],
    /* milestone */ [F, F, F, F, F, F, F, F, F, F, F, F, F],
];

/// `IMPLICIT_CLOSE[closer][inner]`: when a closer for a frame of class
/// `closer` arrives while frames of class `inner` are open above it, those
/// inner frames end with it.
///
/// Columns: Bk Ch Vs Pa TR TC Sb SE Chr Fn Xr NC Ms
#[rustfmt::skip]
pub const IMPLICIT_CLOSE: [[bool; CLASS_COUNT]; CLASS_COUNT] = [
    /* book      */ [F, F, F, F, F, F, F, F, F, F, F, F, F],
    /* chapter   */ [F, F, F, F, F, F, F, F, F, F, F, F, F],
    /* verse     */ [F, F, F, F, F, F, F, F, F, F, F, F, F],
    /* paragraph */ [F, F, F, F, F, F, F, F, F, F, F, F, F],
    /* table row */ [F, F, F, F, F, F, F, F, F, F, F, F, F],
    /* cell      */ [F, F, F, F, F, F, F, F, F, F, F, F, F],
    /* sidebar   */ [F, F, T, T, T, T, F, F, T, T, T, T, T],
    /* side end  */ [F, F, F, F, F, F, F, F, F, F, F, F, F],
    /* character */ [F, F, F, F, F, F, F, F, F, F, F, F, F],
    /* footnote  */ [F, F, F, F, F, F, F, F, T, F, F, T, T],
    /* crossref  */ [F, F, F, F, F, F, F, F, T, F, F, T, T],
    /* note char */ [F, F, F, F, F, F, F, F, T, F, F, F, T],
    /* milestone */ [F, F, F, F, F, F, F, F, F, F, F, F, F],
];

/// Whether `inner` may open inside `outer` (`None` is the document level)
pub fn permits(outer: Option<MarkerClass>, inner: MarkerClass) -> bool {
    let row = outer.map_or(0, |class| class.index() + 1);
    NESTING[row][inner.index()]
}

/// Whether a closer for `closer` silently ends an open `inner` frame
pub fn implicitly_closes(closer: MarkerClass, inner: MarkerClass) -> bool {
    IMPLICIT_CLOSE[closer.index()][inner.index()]
}

// =============================================================================
// MARKER TABLE
// =============================================================================

/// What the table knows about one marker name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerInfo {
    /// Name as written, without backslash, `+` or `*`
    pub name: SmolStr,
    /// Table entry the name resolved to (`q` for `q2`)
    pub base: SmolStr,
    pub class: MarkerClass,
    /// Attribute name a bare `|value` stands for
    pub default_attribute: Option<SmolStr>,
}

impl MarkerInfo {
    pub fn accepts_attributes(&self) -> bool {
        self.class.accepts_attributes() || self.default_attribute.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    class: MarkerClass,
    default_attribute: Option<SmolStr>,
}

/// Name to class lookup for USFM3 markers
///
/// Numbered variants (`q2`, `toc3`, `tc1-2`) resolve by their base name;
/// `-s`/`-e` names are milestones; unknown `z` names are custom character
/// markers and any other unknown name is a paragraph marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerTable {
    entries: FxHashMap<SmolStr, Entry>,
}

impl Default for MarkerTable {
    fn default() -> Self {
        Self::usfm3()
    }
}

#[rustfmt::skip]
const STANDARD_MARKERS: &[(MarkerClass, &[&str])] = &[
    (MarkerClass::Book, &["id"]),
    (MarkerClass::Chapter, &["c"]),
    (MarkerClass::Verse, &["v"]),
    (MarkerClass::Paragraph, &[
        // identification
        "usfm", "ide", "sts", "rem", "h", "toc", "toca",
        // introductions
        "imt", "is", "ip", "ipi", "im", "imi", "ipq", "imq", "ipr", "iq", "ib",
        "ili", "iot", "io", "iex", "imte", "ie",
        // titles and headings
        "mt", "mte", "ms", "mr", "s", "sr", "r", "d", "sp", "sd", "cl", "cd",
        // paragraphs
        "p", "m", "po", "pr", "cls", "pmo", "pm", "pmc", "pmr", "pi", "mi",
        "nb", "pc", "ph", "b", "cp",
        // poetry
        "q", "qr", "qc", "qa", "qm", "qd",
        // lists
        "lh", "li", "lf", "lim",
        // peripherals
        "periph",
    ]),
    (MarkerClass::TableRow, &["tr"]),
    (MarkerClass::TableCell, &["th", "thr", "thc", "tc", "tcr", "tcc"]),
    (MarkerClass::Sidebar, &["esb"]),
    (MarkerClass::SidebarEnd, &["esbe"]),
    (MarkerClass::Character, &[
        "ca", "va", "vp", "qs", "qac", "litl", "lik", "liv", "add", "bk", "dc",
        "k", "nd", "ord", "pn", "png", "addpn", "qt", "sig", "sls", "tl", "wj",
        "em", "bd", "it", "bdit", "no", "sc", "sup", "rb", "pro", "w", "wg",
        "wh", "wa", "fig", "jmp", "ndx", "rq", "ior", "iqt", "cat", "ref",
    ]),
    (MarkerClass::Footnote, &["f", "fe", "ef"]),
    (MarkerClass::CrossReference, &["x", "ex"]),
    (MarkerClass::NoteCharacter, &[
        "fr", "fq", "fqa", "fk", "ft", "fl", "fw", "fp", "fv", "fdc", "fm",
        "xo", "xk", "xq", "xt", "xta", "xop", "xot", "xnt", "xdc",
    ]),
    (MarkerClass::Milestone, &["ts"]),
];

const DEFAULT_ATTRIBUTES: &[(&str, &str)] = &[
    ("w", "lemma"),
    ("rb", "gloss"),
    ("xt", "href"),
    ("fig", "src"),
    ("jmp", "href"),
    ("ref", "loc"),
];

impl MarkerTable {
    /// The standard USFM3 marker set
    pub fn usfm3() -> Self {
        let mut entries = FxHashMap::default();
        for (class, names) in STANDARD_MARKERS {
            for name in *names {
                entries.insert(
                    SmolStr::new(name),
                    Entry {
                        class: *class,
                        default_attribute: None,
                    },
                );
            }
        }
        DEFAULT_ATTRIBUTES
            .iter()
            .fold(Self { entries }, |table, (name, attribute)| {
                table.with_default_attribute(name, attribute)
            })
    }

    /// Register a custom marker, replacing any entry with the same name
    pub fn with_marker(mut self, name: &str, class: MarkerClass) -> Self {
        self.entries.insert(
            SmolStr::new(name),
            Entry {
                class,
                default_attribute: None,
            },
        );
        self
    }

    /// Set the attribute a bare `|value` stands for on an existing marker
    pub fn with_default_attribute(mut self, name: &str, attribute: &str) -> Self {
        if let Some(entry) = self.entries.get_mut(name) {
            entry.default_attribute = Some(SmolStr::new(attribute));
        }
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `name` resolves to an explicit table entry
    pub fn contains(&self, name: &str) -> bool {
        self.resolve(strip_plus(name)).is_some()
    }

    /// Classify a marker name (with or without a leading `+`)
    pub fn lookup(&self, name: &str) -> MarkerInfo {
        let name = strip_plus(name);
        if let Some((base, entry)) = self.resolve(name) {
            return MarkerInfo {
                name: SmolStr::new(name),
                base: SmolStr::new(base),
                class: entry.class,
                default_attribute: entry.default_attribute.clone(),
            };
        }
        let class = if name.ends_with("-s") || name.ends_with("-e") {
            MarkerClass::Milestone
        } else if name.starts_with('z') {
            MarkerClass::Character
        } else {
            MarkerClass::Paragraph
        };
        MarkerInfo {
            name: SmolStr::new(name),
            base: SmolStr::new(name),
            class,
            default_attribute: None,
        }
    }

    fn resolve<'n>(&self, name: &'n str) -> Option<(&'n str, &Entry)> {
        if let Some(entry) = self.entries.get(name) {
            return Some((name, entry));
        }
        // tc1-2 spans columns; q2, toc3 are levels
        let base = strip_column_span(name).trim_end_matches(|c: char| c.is_ascii_digit());
        if base.is_empty() || base == name {
            return None;
        }
        self.entries.get(base).map(|entry| (base, entry))
    }

    /// Known entries, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&str, MarkerClass)> {
        self.entries
            .iter()
            .map(|(name, entry)| (name.as_str(), entry.class))
    }
}

fn strip_plus(name: &str) -> &str {
    name.strip_prefix('+').unwrap_or(name)
}

fn strip_column_span(name: &str) -> &str {
    match name.rsplit_once('-') {
        Some((head, tail)) if !tail.is_empty() && tail.bytes().all(|b| b.is_ascii_digit()) => head,
        _ => name,
    }
}
