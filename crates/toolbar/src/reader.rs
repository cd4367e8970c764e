use gpui_docs_core::{Editor, EditorHandle, HEADING_LEVELS};
use serde_json::{Value, json};

use crate::dimension::{
    Dimension, FormatState, FormatValue, ListKind, NORMAL_TEXT, TextAlign,
};

/// Read one formatting dimension at the current selection.
///
/// A missing editor yields the dimension's default with `is_active == false`.
pub fn read(handle: Option<&EditorHandle>, dimension: Dimension) -> FormatState {
    match handle {
        Some(handle) => read_editor(&handle.read(), dimension),
        None => dimension.default_state(),
    }
}

pub fn is_active(handle: Option<&EditorHandle>, dimension: Dimension) -> bool {
    read(handle, dimension).is_active
}

pub fn can_undo(handle: Option<&EditorHandle>) -> bool {
    handle.is_some_and(|handle| handle.update(|editor| editor.can().undo()))
}

pub fn can_redo(handle: Option<&EditorHandle>) -> bool {
    handle.is_some_and(|handle| handle.update(|editor| editor.can().redo()))
}

pub fn read_editor(editor: &Editor, dimension: Dimension) -> FormatState {
    match dimension {
        Dimension::Bold => flag(editor.is_active("bold", None)),
        Dimension::Italic => flag(editor.is_active("italic", None)),
        Dimension::Underline => flag(editor.is_active("underline", None)),
        Dimension::TaskList => flag(editor.is_active("taskList", None)),
        Dimension::Spellcheck => flag(editor.spellcheck()),
        Dimension::Heading => HEADING_LEVELS
            .clone()
            .find(|level| editor.is_active("heading", Some(&json!({ "level": level }))))
            .map(|level| found(FormatValue::Label(format!("Heading {level}"))))
            .unwrap_or_else(|| FormatState {
                value: FormatValue::Label(NORMAL_TEXT.to_string()),
                is_active: false,
            }),
        Dimension::TextAlign => TextAlign::PRIORITY
            .into_iter()
            .find(|align| {
                editor.is_active("textAlign", Some(&json!({ "textAlign": align.as_str() })))
            })
            .map(|align| found(FormatValue::Label(align.as_str().to_string())))
            .unwrap_or_else(|| dimension.default_state()),
        // Nothing detected still reports the bullet kind, just not as active.
        Dimension::ListKind => ListKind::PRIORITY
            .into_iter()
            .find(|kind| editor.is_active(kind.engine_name(), None))
            .map(|kind| found(FormatValue::Label(kind.engine_name().to_string())))
            .unwrap_or_else(|| dimension.default_state()),
        Dimension::FontFamily => attribute(editor, "textStyle", "fontFamily")
            .map(|family| found(FormatValue::Text(family)))
            .unwrap_or_else(|| dimension.default_state()),
        Dimension::FontSize => attribute(editor, "textStyle", "fontSize")
            .and_then(|raw| parse_font_size(&raw))
            .map(|size| found(FormatValue::Size(size)))
            .unwrap_or_else(|| dimension.default_state()),
        Dimension::LineHeight => attribute(editor, "block", "line_height")
            .map(|line_height| found(FormatValue::Text(line_height)))
            .unwrap_or_else(|| dimension.default_state()),
        Dimension::TextColor => attribute(editor, "textStyle", "color")
            .map(|color| found(FormatValue::Color(color)))
            .unwrap_or_else(|| dimension.default_state()),
        Dimension::HighlightColor => attribute(editor, "highlight", "color")
            .map(|color| found(FormatValue::Color(color)))
            .unwrap_or_else(|| dimension.default_state()),
        Dimension::Link => FormatState {
            value: FormatValue::Text(attribute(editor, "link", "href").unwrap_or_default()),
            is_active: editor.is_active("link", None),
        },
    }
}

/// Parse a font size as typed or as stored (`"18"`, `"18px"`, `" 18 pt "`).
///
/// Only positive integers are accepted.
pub fn parse_font_size(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    let number = trimmed
        .trim_end_matches(|c: char| c.is_ascii_alphabetic())
        .trim_end();
    if number.is_empty() || number.starts_with('+') {
        return None;
    }
    number.parse::<u32>().ok().filter(|size| *size > 0)
}

fn flag(active: bool) -> FormatState {
    FormatState {
        value: FormatValue::Bool(active),
        is_active: active,
    }
}

fn found(value: FormatValue) -> FormatState {
    FormatState {
        value,
        is_active: true,
    }
}

fn attribute(editor: &Editor, name: &str, key: &str) -> Option<String> {
    match editor.get_attributes(name).remove(key)? {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
