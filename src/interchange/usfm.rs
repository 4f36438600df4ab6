//! USFM output from USJ.
//!
//! The text of a parsed tree already is its USFM. This writer covers the
//! other direction: USJ built by hand or read from USX. Chapters, books and
//! paragraphs start new lines and verses follow the line they continue;
//! nested character spans get the `+` prefix. Parsing the output gives
//! back the same USJ up to whitespace at line ends.

use serde_json::{Map, Value};

use crate::parser::{MarkerClass, MarkerTable};

use super::InterchangeError;
use super::usj;
use super::usx::usx_to_usj;

/// Write a USJ value as USFM
///
/// Markers are classified with the standard USFM3 table: note characters
/// are written without closers.
pub fn usj_to_usfm(usj: &Value) -> Result<String, InterchangeError> {
    usj_to_usfm_with(usj, &MarkerTable::usfm3())
}

/// Write a USJ value as USFM, classifying markers with `markers`
pub fn usj_to_usfm_with(usj: &Value, markers: &MarkerTable) -> Result<String, InterchangeError> {
    let (_, content) = usj::root(usj)?;
    let mut writer = UsfmWriter {
        markers,
        out: String::new(),
    };
    for item in content {
        writer.block(item)?;
    }
    writer.line_break();
    Ok(writer.out)
}

/// Read a USX document and write it as USFM
pub fn usx_to_usfm(xml: &str) -> Result<String, InterchangeError> {
    usj_to_usfm(&usx_to_usj(xml)?)
}

struct UsfmWriter<'a> {
    markers: &'a MarkerTable,
    out: String,
}

impl UsfmWriter<'_> {
    fn block(&mut self, item: &Value) -> Result<(), InterchangeError> {
        let Value::Object(object) = item else {
            return self.inline(item, false);
        };
        let kind = usj::object_type(object)?;
        match kind {
            "book" => {
                self.line_break();
                self.marker(object, kind, "id")?;
                if let Some(code) = object.get("code") {
                    self.out.push(' ');
                    self.out.push_str(usj::string_value(code, "code", kind)?);
                }
                let content = usj::content(object, kind)?;
                if !content.is_empty() {
                    self.out.push(' ');
                    self.inlines(content, false)?;
                }
                self.out.push('\n');
            }
            "chapter" => {
                self.line_break();
                self.marker(object, kind, "c")?;
                self.number(object, kind)?;
                self.out.push('\n');
            }
            "para" => {
                self.line_break();
                self.marker(object, kind, "p")?;
                let content = usj::content(object, kind)?;
                match content.first() {
                    None => {}
                    Some(first) if is_verse(first) => self.out.push('\n'),
                    Some(_) => self.out.push(' '),
                }
                self.inlines(content, false)?;
            }
            "table" => {
                for row in usj::content(object, kind)? {
                    self.row(row)?;
                }
            }
            "sidebar" => {
                self.line_break();
                self.marker(object, kind, "esb")?;
                self.out.push('\n');
                for item in usj::content(object, kind)? {
                    self.block(item)?;
                }
                self.line_break();
                self.out.push_str("\\esbe\n");
            }
            _ => self.inline(item, false)?,
        }
        Ok(())
    }

    fn row(&mut self, row: &Value) -> Result<(), InterchangeError> {
        let object = as_object(row)?;
        let kind = usj::object_type(object)?;
        if kind != "table:row" {
            return Err(InterchangeError::invalid_element(format!(
                "expected a table row, found {kind:?}"
            )));
        }
        self.line_break();
        self.marker(object, kind, "tr")?;
        for cell in usj::content(object, kind)? {
            let cell = as_object(cell)?;
            let kind = usj::object_type(cell)?;
            if !self.out.ends_with(' ') {
                self.out.push(' ');
            }
            self.marker(cell, kind, "tc1")?;
            self.out.push(' ');
            self.inlines(usj::content(cell, kind)?, false)?;
        }
        Ok(())
    }

    fn inlines(&mut self, items: &[Value], in_span: bool) -> Result<(), InterchangeError> {
        for item in items {
            self.inline(item, in_span)?;
        }
        Ok(())
    }

    fn inline(&mut self, item: &Value, in_span: bool) -> Result<(), InterchangeError> {
        let object = match item {
            Value::String(text) => {
                self.text(text);
                return Ok(());
            }
            Value::Object(object) => object,
            other => {
                return Err(InterchangeError::invalid_element(format!(
                    "unexpected content item {other}"
                )));
            }
        };
        let kind = usj::object_type(object)?;
        match kind {
            "verse" => {
                // a verse after a space starts its own line
                if self.out.ends_with(' ') {
                    self.out.pop();
                    self.out.push('\n');
                }
                self.marker(object, kind, "v")?;
                self.number(object, kind)?;
                self.out.push(' ');
            }
            "char" => {
                let name = marker_name(object, kind)?;
                if self.markers.lookup(name).class == MarkerClass::NoteCharacter {
                    self.out.push_str(&format!("\\{name} "));
                    self.inlines(usj::content(object, kind)?, false)?;
                    return Ok(());
                }
                let prefix = if in_span { "+" } else { "" };
                self.out.push_str(&format!("\\{prefix}{name} "));
                self.inlines(usj::content(object, kind)?, true)?;
                self.attributes(object, kind, "|")?;
                self.out.push_str(&format!("\\{prefix}{name}*"));
            }
            "note" => {
                let name = marker_name(object, kind)?;
                let caller = match object.get("caller") {
                    Some(caller) => usj::string_value(caller, "caller", kind)?,
                    None => "+",
                };
                self.out.push_str(&format!("\\{name} {caller} "));
                self.inlines(usj::content(object, kind)?, false)?;
                self.out.push_str(&format!("\\{name}*"));
            }
            "ms" => {
                let name = marker_name(object, kind)?;
                self.out.push_str(&format!("\\{name}"));
                self.attributes(object, kind, " |")?;
                self.out.push_str("\\*");
            }
            "optbreak" => self.out.push_str("//"),
            "book" | "chapter" | "para" | "table" | "sidebar" => self.block(item)?,
            other => {
                return Err(InterchangeError::invalid_element(format!("unknown type {other:?}")));
            }
        }
        Ok(())
    }

    /// Write `\marker`, falling back to `default` when the object has none
    fn marker(
        &mut self,
        object: &Map<String, Value>,
        kind: &str,
        default: &str,
    ) -> Result<(), InterchangeError> {
        let name = match object.get("marker") {
            Some(marker) => usj::string_value(marker, "marker", kind)?,
            None => default,
        };
        self.out.push('\\');
        self.out.push_str(name);
        Ok(())
    }

    fn number(&mut self, object: &Map<String, Value>, kind: &str) -> Result<(), InterchangeError> {
        let number = object.get("number").ok_or_else(|| {
            InterchangeError::invalid_element(format!("{kind:?} without a number"))
        })?;
        self.out.push(' ');
        self.out.push_str(usj::string_value(number, "number", kind)?);
        Ok(())
    }

    /// Attributes of a span or milestone, `key="value"` after `lead`
    fn attributes(
        &mut self,
        object: &Map<String, Value>,
        kind: &str,
        lead: &str,
    ) -> Result<(), InterchangeError> {
        let mut pairs = Vec::new();
        for (key, value) in object {
            if matches!(key.as_str(), "type" | "marker" | "content") {
                continue;
            }
            pairs.push(format!("{key}=\"{}\"", usj::string_value(value, key, kind)?));
        }
        if !pairs.is_empty() {
            self.out.push_str(lead);
            self.out.push_str(&pairs.join(" "));
        }
        Ok(())
    }

    fn text(&mut self, text: &str) {
        for c in text.chars() {
            match c {
                '\u{a0}' => self.out.push('~'),
                c => self.out.push(c),
            }
        }
    }

    /// End the current line unless it is already ended
    fn line_break(&mut self) {
        if self.out.ends_with(' ') {
            self.out.pop();
        }
        if !self.out.is_empty() && !self.out.ends_with('\n') {
            self.out.push('\n');
        }
    }
}

fn as_object(value: &Value) -> Result<&Map<String, Value>, InterchangeError> {
    value
        .as_object()
        .ok_or_else(|| InterchangeError::invalid_element(format!("expected an object, found {value}")))
}

fn marker_name<'a>(object: &'a Map<String, Value>, kind: &str) -> Result<&'a str, InterchangeError> {
    let marker = object
        .get("marker")
        .ok_or_else(|| InterchangeError::invalid_element(format!("{kind:?} without a marker")))?;
    usj::string_value(marker, "marker", kind)
}

fn is_verse(item: &Value) -> bool {
    item.get("type").and_then(Value::as_str) == Some("verse")
}
