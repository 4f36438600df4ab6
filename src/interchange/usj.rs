//! USJ (Unified Scripture JSON) export.
//!
//! USJ is the JSON rendition of USX. Chapters and verses are milestones:
//! the content of a chapter follows its `chapter` object as siblings, and
//! the content of a verse follows its `verse` object inside the paragraph.
//!
//! ```json
//! {
//!   "type": "USJ",
//!   "version": "3.0",
//!   "content": [
//!     { "type": "book", "marker": "id", "code": "GEN", "content": ["Genesis"] },
//!     { "type": "chapter", "marker": "c", "number": "1", "sid": "GEN 1" },
//!     { "type": "para", "marker": "p", "content": [
//!       { "type": "verse", "marker": "v", "number": "1", "sid": "GEN 1:1" },
//!       "In the beginning"
//!     ]}
//!   ]
//! }
//! ```
//!
//! `ERROR` nodes have no USJ counterpart. The markers inside them are
//! dropped and the text they wrapped is kept as plain strings.

use serde_json::{Map, Value};
use smol_str::SmolStr;

use crate::parser::{
    AstNode, AttributeList, Book, Chapter, Content, HasMarker, MarkerTable, SyntaxKind,
    SyntaxNode, TableCell, TextRun, Verse,
};
use crate::syntax::Tree;

use super::InterchangeError;

/// USJ version written by [`to_usj`]
pub const USJ_VERSION: &str = "3.0";

/// Convert a tree to a USJ document
pub fn to_usj(tree: &Tree) -> Value {
    let mut writer = UsjWriter {
        markers: &tree.config().markers,
        book: None,
        chapter: None,
    };
    let mut content = Vec::new();
    if let Some(document) = tree.document() {
        for item in document.contents() {
            writer.block(item, &mut content);
        }
    }

    let mut root = Map::new();
    root.insert("type".to_string(), Value::from("USJ"));
    root.insert("version".to_string(), Value::from(USJ_VERSION));
    root.insert("content".to_string(), Value::Array(content));
    Value::Object(root)
}

/// Convert a tree to pretty-printed USJ text
pub fn to_usj_string(tree: &Tree) -> Result<String, InterchangeError> {
    Ok(serde_json::to_string_pretty(&to_usj(tree))?)
}

/// Version and content of a USJ root object
pub(super) fn root(usj: &Value) -> Result<(&str, &[Value]), InterchangeError> {
    let root = usj
        .as_object()
        .ok_or_else(|| InterchangeError::invalid_element("USJ root is not an object"))?;
    match root.get("type").and_then(Value::as_str) {
        Some("USJ") => {}
        other => {
            return Err(InterchangeError::invalid_element(format!(
                "expected root type \"USJ\", found {other:?}"
            )));
        }
    }
    let version = root
        .get("version")
        .and_then(Value::as_str)
        .unwrap_or(USJ_VERSION);
    Ok((version, content(root, "USJ")?))
}

/// The `content` array of an object; missing content is empty
pub(super) fn content<'a>(
    object: &'a Map<String, Value>,
    kind: &str,
) -> Result<&'a [Value], InterchangeError> {
    match object.get("content") {
        None => Ok(&[]),
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(InterchangeError::invalid_element(format!(
            "content of {kind:?} is not an array"
        ))),
    }
}

pub(super) fn string_value<'a>(
    value: &'a Value,
    key: &str,
    kind: &str,
) -> Result<&'a str, InterchangeError> {
    value.as_str().ok_or_else(|| {
        InterchangeError::invalid_attribute(format!("{key} of {kind:?} is not a string"))
    })
}

/// The `type` of a content object
pub(super) fn object_type(object: &Map<String, Value>) -> Result<&str, InterchangeError> {
    object
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| InterchangeError::invalid_element("content object without a type"))
}

struct UsjWriter<'a> {
    markers: &'a MarkerTable,
    /// Code of the current book, for `sid`s
    book: Option<SmolStr>,
    /// Number of the current chapter, for `sid`s
    chapter: Option<SmolStr>,
}

impl UsjWriter<'_> {
    /// Content of the document, a book, a chapter or a sidebar
    fn block(&mut self, item: Content, out: &mut Vec<Value>) {
        match item {
            Content::Book(book) => self.book(&book, out),
            Content::Chapter(chapter) => self.chapter(&chapter, out),
            Content::Paragraph(paragraph) => {
                let mut inner = Vec::new();
                self.inlines(paragraph.syntax(), &mut inner);
                trim_end(&mut inner);
                out.push(element("para", paragraph.marker(), inner));
            }
            Content::Table(table) => {
                let mut rows = Vec::new();
                for row in table.rows() {
                    let cells = row.cells().map(|cell| self.cell(&cell)).collect();
                    rows.push(element("table:row", row.marker(), cells));
                }
                out.push(element("table", None, rows));
            }
            Content::Sidebar(sidebar) => {
                let mut inner = Vec::new();
                for item in sidebar.contents() {
                    self.block(item, &mut inner);
                }
                out.push(element("sidebar", sidebar.marker(), inner));
            }
            Content::Text(run) => {
                let mut inner = Vec::new();
                text(&run, &mut inner);
                out.extend(
                    inner
                        .into_iter()
                        .filter(|v| !matches!(v, Value::String(s) if s.trim().is_empty())),
                );
            }
            Content::Error(error) => recovered_text(error.syntax(), out),
            Content::AttributeList(_) => {}
            inline => self.inline(inline, out),
        }
    }

    fn book(&mut self, book: &Book, out: &mut Vec<Value>) {
        self.book = book.code();
        self.chapter = None;

        let header = book.header();
        let description: Vec<Value> = header
            .as_ref()
            .and_then(|h| h.description())
            .map(Value::from)
            .into_iter()
            .collect();
        let mut object = element("book", header.and_then(|h| h.marker()), description);
        if let Some(code) = &self.book {
            insert(&mut object, "code", code);
        }
        out.push(object);

        for item in book.contents() {
            self.block(item, out);
        }
    }

    fn chapter(&mut self, chapter: &Chapter, out: &mut Vec<Value>) {
        self.chapter = chapter.number();

        let mut object = element("chapter", chapter.marker(), Vec::new());
        if let Some(number) = &self.chapter {
            insert(&mut object, "number", number);
            if let Some(book) = &self.book {
                insert(&mut object, "sid", &format!("{book} {number}"));
            }
        }
        out.push(object);

        for item in chapter.contents() {
            self.block(item, out);
        }
    }

    fn cell(&mut self, cell: &TableCell) -> Value {
        let mut inner = Vec::new();
        self.inlines(cell.syntax(), &mut inner);
        trim_end(&mut inner);
        let marker = cell.marker();
        let align = marker.as_deref().map(cell_alignment).unwrap_or("start");
        let mut object = element("table:cell", marker, inner);
        insert(&mut object, "align", align);
        object
    }

    fn verse(&mut self, verse: &Verse, out: &mut Vec<Value>) {
        let mut object = element("verse", verse.marker(), Vec::new());
        if let Some(number) = verse.number() {
            insert(&mut object, "number", &number);
            if let (Some(book), Some(chapter)) = (&self.book, &self.chapter) {
                insert(&mut object, "sid", &format!("{book} {chapter}:{number}"));
            }
        }
        out.push(object);
        self.inlines(verse.syntax(), out);
    }

    fn inlines(&mut self, node: &SyntaxNode, out: &mut Vec<Value>) {
        for item in node.children().filter_map(Content::cast) {
            self.inline(item, out);
        }
    }

    /// Content of a paragraph, a verse, a span or a note
    fn inline(&mut self, item: Content, out: &mut Vec<Value>) {
        match item {
            Content::Verse(verse) => self.verse(&verse, out),
            Content::CharacterSpan(span) => {
                let mut inner = Vec::new();
                self.inlines(span.syntax(), &mut inner);
                let mut object = element("char", span.marker(), inner);
                self.attributes(span.attributes(), &mut object);
                out.push(object);
            }
            Content::NoteChar(note_char) => {
                let mut inner = Vec::new();
                self.inlines(note_char.syntax(), &mut inner);
                out.push(element("char", note_char.marker(), inner));
            }
            Content::Footnote(note) => {
                let object = self.note(note.syntax(), note.marker(), note.caller());
                out.push(object);
            }
            Content::CrossReference(note) => {
                let object = self.note(note.syntax(), note.marker(), note.caller());
                out.push(object);
            }
            Content::Milestone(milestone) => {
                let mut object = element("ms", milestone.marker(), Vec::new());
                self.attributes(milestone.attributes(), &mut object);
                out.push(object);
            }
            Content::Text(run) => text(&run, out),
            Content::Error(error) => recovered_text(error.syntax(), out),
            Content::AttributeList(_) => {}
            block => self.block(block, out),
        }
    }

    fn note(&mut self, node: &SyntaxNode, marker: Option<SmolStr>, caller: Option<SmolStr>) -> Value {
        let mut inner = Vec::new();
        self.inlines(node, &mut inner);
        trim_end(&mut inner);
        let mut object = element("note", marker, inner);
        if let Some(caller) = caller {
            insert(&mut object, "caller", &caller);
        }
        object
    }

    fn attributes(&self, list: Option<AttributeList>, object: &mut Value) {
        let Some(list) = list else {
            return;
        };
        for (name, value) in list.to_map(self.markers) {
            insert(object, &name, &value);
        }
    }
}

fn element(kind: &str, marker: Option<SmolStr>, content: Vec<Value>) -> Value {
    let mut object = Map::new();
    object.insert("type".to_string(), Value::from(kind));
    if let Some(marker) = marker {
        object.insert("marker".to_string(), Value::from(marker.as_str()));
    }
    if !content.is_empty() {
        object.insert("content".to_string(), Value::Array(content));
    }
    Value::Object(object)
}

fn insert(object: &mut Value, key: &str, value: &str) {
    if let Value::Object(map) = object {
        map.insert(key.to_string(), Value::from(value));
    }
}

/// Text of a run; line breaks become spaces, `~` a no-break space and `//`
/// an `optbreak`
fn text(run: &TextRun, out: &mut Vec<Value>) {
    let mut buffer = String::new();
    for token in run
        .syntax()
        .children_with_tokens()
        .filter_map(|e| e.into_token())
    {
        match token.kind() {
            SyntaxKind::WHITESPACE | SyntaxKind::NEWLINE => {
                if !buffer.ends_with(' ') {
                    buffer.push(' ');
                }
            }
            SyntaxKind::NBSP => buffer.push('\u{a0}'),
            SyntaxKind::SOFT_BREAK => {
                push_text(out, std::mem::take(&mut buffer));
                let mut object = Map::new();
                object.insert("type".to_string(), Value::from("optbreak"));
                out.push(Value::Object(object));
            }
            _ => buffer.push_str(token.text()),
        }
    }
    push_text(out, buffer);
}

/// Text wrapped by an `ERROR` node
///
/// Markers, closers and attribute text after a `|` are dropped along with
/// the separator after each marker.
fn recovered_text(node: &SyntaxNode, out: &mut Vec<Value>) {
    let mut buffer = String::new();
    let mut after_marker = false;
    let mut in_attributes = false;
    for token in node
        .descendants_with_tokens()
        .filter_map(|e| e.into_token())
    {
        let kind = token.kind();
        if matches!(kind, SyntaxKind::MARKER | SyntaxKind::MARKER_CLOSE | SyntaxKind::MILESTONE_END) {
            after_marker = kind == SyntaxKind::MARKER;
            in_attributes = false;
            continue;
        }
        if kind == SyntaxKind::PIPE {
            in_attributes = true;
        }
        if in_attributes {
            continue;
        }
        match kind {
            SyntaxKind::WHITESPACE | SyntaxKind::NEWLINE => {
                if !after_marker && !buffer.is_empty() && !buffer.ends_with(' ') {
                    buffer.push(' ');
                }
            }
            SyntaxKind::NBSP => buffer.push('\u{a0}'),
            SyntaxKind::TEXT => buffer.push_str(token.text()),
            _ => {}
        }
        after_marker = false;
    }
    push_text(out, buffer);
}

/// Append a string, joining it to a string just before it
fn push_text(out: &mut Vec<Value>, text: String) {
    if text.is_empty() {
        return;
    }
    match out.last_mut() {
        Some(Value::String(last)) => last.push_str(&text),
        _ => out.push(Value::from(text)),
    }
}

/// Drop trailing whitespace at the end of a paragraph, cell or note
fn trim_end(content: &mut Vec<Value>) {
    if let Some(Value::String(last)) = content.last_mut() {
        let len = last.trim_end_matches([' ', '\t']).len();
        last.truncate(len);
        if last.is_empty() {
            content.pop();
        }
    }
}

/// `\thr1` and `\tcr1` are right aligned, `\thc1` and `\tcc1` centered
fn cell_alignment(marker: &str) -> &'static str {
    let rest = marker
        .strip_prefix("th")
        .or_else(|| marker.strip_prefix("tc"))
        .unwrap_or(marker);
    match rest.chars().next() {
        Some('r') => "end",
        Some('c') => "center",
        _ => "start",
    }
}
