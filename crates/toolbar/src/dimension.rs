use serde::{Deserialize, Serialize};

pub const NORMAL_TEXT: &str = "Normal text";
pub const DEFAULT_FONT_FAMILY: &str = "Arial";
pub const DEFAULT_FONT_SIZE: u32 = 16;
pub const DEFAULT_LINE_HEIGHT: &str = "normal";
pub const DEFAULT_TEXT_COLOR: &str = "#000000";
pub const DEFAULT_HIGHLIGHT_COLOR: &str = "#FFFFFF";

/// One independently readable and settable aspect of the text at the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    Bold,
    Italic,
    Underline,
    Heading,
    FontFamily,
    FontSize,
    LineHeight,
    TextAlign,
    TextColor,
    HighlightColor,
    Link,
    ListKind,
    TaskList,
    Spellcheck,
}

impl Dimension {
    pub const ALL: [Dimension; 14] = [
        Dimension::Bold,
        Dimension::Italic,
        Dimension::Underline,
        Dimension::Heading,
        Dimension::FontFamily,
        Dimension::FontSize,
        Dimension::LineHeight,
        Dimension::TextAlign,
        Dimension::TextColor,
        Dimension::HighlightColor,
        Dimension::Link,
        Dimension::ListKind,
        Dimension::TaskList,
        Dimension::Spellcheck,
    ];

    pub fn is_boolean(self) -> bool {
        matches!(
            self,
            Dimension::Bold
                | Dimension::Italic
                | Dimension::Underline
                | Dimension::TaskList
                | Dimension::Spellcheck
        )
    }

    /// What a control shows when nothing is set, or when there is no editor at all.
    pub fn default_state(self) -> FormatState {
        let value = match self {
            Dimension::Bold
            | Dimension::Italic
            | Dimension::Underline
            | Dimension::TaskList
            | Dimension::Spellcheck => FormatValue::Bool(false),
            Dimension::Heading => FormatValue::Label(NORMAL_TEXT.to_string()),
            Dimension::TextAlign => FormatValue::Label(TextAlign::Left.as_str().to_string()),
            Dimension::ListKind => FormatValue::Label(ListKind::Bullet.engine_name().to_string()),
            Dimension::FontFamily => FormatValue::Text(DEFAULT_FONT_FAMILY.to_string()),
            Dimension::LineHeight => FormatValue::Text(DEFAULT_LINE_HEIGHT.to_string()),
            Dimension::Link => FormatValue::Text(String::new()),
            Dimension::FontSize => FormatValue::Size(DEFAULT_FONT_SIZE),
            Dimension::TextColor => FormatValue::Color(DEFAULT_TEXT_COLOR.to_string()),
            Dimension::HighlightColor => FormatValue::Color(DEFAULT_HIGHLIGHT_COLOR.to_string()),
        };
        FormatState {
            value,
            is_active: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormatValue {
    Bool(bool),
    /// One of a fixed label set.
    Label(String),
    Text(String),
    /// Integer size with the unit stripped.
    Size(u32),
    Color(String),
}

impl FormatValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FormatValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_size(&self) -> Option<u32> {
        match self {
            FormatValue::Size(size) => Some(*size),
            _ => None,
        }
    }

    /// Display form of the value.
    pub fn as_text(&self) -> String {
        match self {
            FormatValue::Bool(b) => b.to_string(),
            FormatValue::Size(size) => size.to_string(),
            FormatValue::Label(s) | FormatValue::Text(s) | FormatValue::Color(s) => s.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatState {
    pub value: FormatValue,
    pub is_active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    Center,
    Right,
    Justify,
}

impl TextAlign {
    /// Probe order when reading the alignment of the selection.
    pub const PRIORITY: [TextAlign; 4] = [
        TextAlign::Left,
        TextAlign::Center,
        TextAlign::Right,
        TextAlign::Justify,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
            TextAlign::Justify => "justify",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TextAlign::Left => "Align Left",
            TextAlign::Center => "Align Center",
            TextAlign::Right => "Align Right",
            TextAlign::Justify => "Align Justify",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListKind {
    Bullet,
    Ordered,
}

impl ListKind {
    /// Probe order when reading the list kind of the selection.
    pub const PRIORITY: [ListKind; 2] = [ListKind::Bullet, ListKind::Ordered];

    pub fn engine_name(self) -> &'static str {
        match self {
            ListKind::Bullet => "bulletList",
            ListKind::Ordered => "orderedList",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ListKind::Bullet => "Bullet List",
            ListKind::Ordered => "Ordered List",
        }
    }
}
