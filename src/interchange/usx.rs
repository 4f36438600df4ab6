//! USX (Unified Scripture XML) export and import.
//!
//! USX is written from the USJ value of a tree. Every USJ object becomes
//! an element named after its `type`; its `marker` becomes the leading
//! `style` attribute and its other string fields follow as attributes.
//! Reading reverses the mapping, so USX documents can be turned back into
//! USJ and from there into USFM.
//!
//! ```xml
//! <?xml version="1.0" encoding="utf-8"?>
//! <usx version="3.0">
//! <book style="id" code="GEN">Genesis</book>
//! <chapter style="c" number="1" sid="GEN 1"/>
//! <para style="p"><verse style="v" number="1" sid="GEN 1:1"/>In the beginning</para>
//! </usx>
//! ```

use std::io::{Cursor, Write};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use serde_json::{Map, Value};

use crate::syntax::Tree;

use super::InterchangeError;
use super::usj::{self, to_usj};

/// Convert a tree to a USX document
pub fn to_usx(tree: &Tree) -> Result<String, InterchangeError> {
    usj_to_usx(&to_usj(tree))
}

/// Convert a USJ value to a USX document
///
/// Fails when the value is not shaped like USJ: a non-object root, an
/// object without a known `type`, or non-string attribute values.
pub fn usj_to_usx(usj: &Value) -> Result<String, InterchangeError> {
    let (version, content) = usj::root(usj)?;

    let mut buffer = Cursor::new(Vec::new());
    let mut writer = Writer::new(&mut buffer);

    emit(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)),
    )?;
    emit(&mut writer, Event::Text(BytesText::new("\n")))?;

    let mut usx = BytesStart::new("usx");
    usx.push_attribute(("version", version));
    emit(&mut writer, Event::Start(usx))?;
    for item in content {
        // Block-level elements on their own lines; inline content is mixed
        // and keeps its whitespace.
        emit(&mut writer, Event::Text(BytesText::new("\n")))?;
        write_item(&mut writer, item)?;
    }
    emit(&mut writer, Event::Text(BytesText::new("\n")))?;
    emit(&mut writer, Event::End(BytesEnd::new("usx")))?;

    let mut output = buffer.into_inner();
    output.push(b'\n');
    Ok(String::from_utf8(output)?)
}

fn write_item<W: Write>(writer: &mut Writer<W>, item: &Value) -> Result<(), InterchangeError> {
    match item {
        Value::String(text) => emit(writer, Event::Text(BytesText::new(text))),
        Value::Object(object) => write_element(writer, object),
        other => Err(InterchangeError::invalid_element(format!(
            "unexpected content item {other}"
        ))),
    }
}

fn write_element<W: Write>(
    writer: &mut Writer<W>,
    object: &Map<String, Value>,
) -> Result<(), InterchangeError> {
    let kind = usj::object_type(object)?;
    let name = element_name(kind)
        .ok_or_else(|| InterchangeError::invalid_element(format!("unknown type {kind:?}")))?;

    let mut start = BytesStart::new(name);
    if let Some(marker) = object.get("marker") {
        start.push_attribute(("style", usj::string_value(marker, "marker", kind)?));
    }
    for (key, value) in object {
        if matches!(key.as_str(), "type" | "marker" | "content") {
            continue;
        }
        start.push_attribute((key.as_str(), usj::string_value(value, key, kind)?));
    }

    if !object.contains_key("content") {
        return emit(writer, Event::Empty(start));
    }
    emit(writer, Event::Start(start))?;
    for item in usj::content(object, kind)? {
        write_item(writer, item)?;
    }
    emit(writer, Event::End(BytesEnd::new(name)))
}

/// USX element for a USJ `type`
fn element_name(kind: &str) -> Option<&'static str> {
    Some(match kind {
        "book" => "book",
        "chapter" => "chapter",
        "verse" => "verse",
        "para" => "para",
        "char" => "char",
        "note" => "note",
        "ms" => "ms",
        "table" => "table",
        "table:row" => "row",
        "table:cell" => "cell",
        "sidebar" => "sidebar",
        "optbreak" => "optbreak",
        _ => return None,
    })
}

/// USJ `type` for a USX element
fn object_type(name: &str) -> Option<&'static str> {
    Some(match name {
        "book" => "book",
        "chapter" => "chapter",
        "verse" => "verse",
        "para" => "para",
        "char" => "char",
        "note" => "note",
        "ms" => "ms",
        "table" => "table",
        "row" => "table:row",
        "cell" => "table:cell",
        "sidebar" => "sidebar",
        "optbreak" => "optbreak",
        _ => return None,
    })
}

fn emit<W: Write>(writer: &mut Writer<W>, event: Event<'_>) -> Result<(), InterchangeError> {
    writer
        .write_event(event)
        .map_err(|e| InterchangeError::xml(format!("Write error: {e}")))
}

// ============================================================================
// Reading
// ============================================================================

/// An element being read, with the content collected so far
struct OpenElement {
    object: Map<String, Value>,
    content: Vec<Value>,
}

impl OpenElement {
    fn finish(mut self) -> Value {
        if !self.content.is_empty() {
            self.object
                .insert("content".to_string(), Value::Array(self.content));
        }
        Value::Object(self.object)
    }
}

/// Read a USX document into a USJ value
///
/// Whitespace between block elements is dropped; text inside elements is
/// kept as written. Unknown elements are rejected.
pub fn usx_to_usj(xml: &str) -> Result<Value, InterchangeError> {
    let mut reader = Reader::from_str(xml);
    let mut version: Option<String> = None;
    let mut blocks: Vec<Value> = Vec::new();
    let mut open: Vec<OpenElement> = Vec::new();
    let mut closed = false;

    loop {
        match reader.read_event().map_err(|e| InterchangeError::xml(e.to_string()))? {
            Event::Start(start) if version.is_none() => {
                version = Some(root_version(&start)?);
            }
            Event::Start(start) => {
                if closed {
                    return Err(InterchangeError::invalid_element("content after </usx>"));
                }
                open.push(read_element(&start)?);
            }
            Event::Empty(empty) => {
                if version.is_none() || closed {
                    return Err(InterchangeError::invalid_element("element outside <usx>"));
                }
                let element = read_element(&empty)?.finish();
                match open.last_mut() {
                    Some(parent) => parent.content.push(element),
                    None => blocks.push(element),
                }
            }
            Event::End(_) => match open.pop() {
                Some(element) => {
                    let value = element.finish();
                    match open.last_mut() {
                        Some(parent) => parent.content.push(value),
                        None => blocks.push(value),
                    }
                }
                None => closed = true,
            },
            Event::Text(text) => {
                let text = text
                    .unescape()
                    .map_err(|e| InterchangeError::xml(e.to_string()))?;
                match open.last_mut() {
                    Some(parent) => push_text(&mut parent.content, &text),
                    None if text.trim().is_empty() => {}
                    None => {
                        return Err(InterchangeError::invalid_element(format!(
                            "text outside a USX element: {:?}",
                            text.trim()
                        )));
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let version = version.ok_or_else(|| InterchangeError::invalid_element("no <usx> root"))?;
    if !closed {
        return Err(InterchangeError::xml("unclosed <usx> root"));
    }
    let mut root = Map::new();
    root.insert("type".to_string(), Value::from("USJ"));
    root.insert("version".to_string(), Value::from(version));
    root.insert("content".to_string(), Value::Array(blocks));
    Ok(Value::Object(root))
}

fn root_version(start: &BytesStart<'_>) -> Result<String, InterchangeError> {
    if start.name().as_ref() != b"usx" {
        return Err(InterchangeError::invalid_element(format!(
            "expected <usx> root, found <{}>",
            String::from_utf8_lossy(start.name().as_ref())
        )));
    }
    let attributes = read_attributes(start)?;
    Ok(attributes
        .into_iter()
        .find(|(key, _)| key == "version")
        .map(|(_, value)| value)
        .unwrap_or_else(|| usj::USJ_VERSION.to_string()))
}

fn read_element(start: &BytesStart<'_>) -> Result<OpenElement, InterchangeError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let kind = object_type(&name)
        .ok_or_else(|| InterchangeError::invalid_element(format!("unknown element <{name}>")))?;

    let mut object = Map::new();
    object.insert("type".to_string(), Value::from(kind));
    for (key, value) in read_attributes(start)? {
        let key = if key == "style" { "marker".to_string() } else { key };
        object.insert(key, Value::from(value));
    }
    Ok(OpenElement {
        object,
        content: Vec::new(),
    })
}

fn read_attributes(start: &BytesStart<'_>) -> Result<Vec<(String, String)>, InterchangeError> {
    start
        .attributes()
        .map(|attribute| {
            let attribute = attribute.map_err(|e| InterchangeError::xml(e.to_string()))?;
            let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
            let value = attribute
                .unescape_value()
                .map_err(|e| InterchangeError::xml(e.to_string()))?
                .into_owned();
            Ok((key, value))
        })
        .collect()
}

fn push_text(content: &mut Vec<Value>, text: &str) {
    match content.last_mut() {
        Some(Value::String(last)) => last.push_str(text),
        _ => content.push(Value::from(text)),
    }
}
