use serde::{Deserialize, Serialize};

use crate::dimension::{Dimension, ListKind, TextAlign};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Step {
    Increment,
    Decrement,
}

/// A single formatting request, turned into one atomic engine chain by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", content = "value", rename_all = "snake_case")]
pub enum Command {
    Undo,
    Redo,
    ToggleBold,
    ToggleItalic,
    ToggleUnderline,
    ToggleTaskList,
    ToggleSpellcheck,
    ToggleList(ListKind),
    /// Level 0 is normal text.
    SetHeading(u8),
    SetTextAlign(TextAlign),
    SetFontFamily(String),
    /// Raw user input; anything but a positive integer is dropped.
    SetFontSize(String),
    StepFontSize(Step),
    SetLineHeight(String),
    SetTextColor(String),
    SetHighlightColor(String),
    /// An empty href removes the link.
    SetLink(String),
    SetImage(String),
    RemoveFormatting,
}

impl Command {
    /// The toggle that flips a boolean dimension.
    pub fn toggle_for(dimension: Dimension) -> Option<Command> {
        match dimension {
            Dimension::Bold => Some(Command::ToggleBold),
            Dimension::Italic => Some(Command::ToggleItalic),
            Dimension::Underline => Some(Command::ToggleUnderline),
            Dimension::TaskList => Some(Command::ToggleTaskList),
            Dimension::Spellcheck => Some(Command::ToggleSpellcheck),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Undo => "undo",
            Command::Redo => "redo",
            Command::ToggleBold => "toggle_bold",
            Command::ToggleItalic => "toggle_italic",
            Command::ToggleUnderline => "toggle_underline",
            Command::ToggleTaskList => "toggle_task_list",
            Command::ToggleSpellcheck => "toggle_spellcheck",
            Command::ToggleList(_) => "toggle_list",
            Command::SetHeading(_) => "set_heading",
            Command::SetTextAlign(_) => "set_text_align",
            Command::SetFontFamily(_) => "set_font_family",
            Command::SetFontSize(_) => "set_font_size",
            Command::StepFontSize(_) => "step_font_size",
            Command::SetLineHeight(_) => "set_line_height",
            Command::SetTextColor(_) => "set_text_color",
            Command::SetHighlightColor(_) => "set_highlight_color",
            Command::SetLink(_) => "set_link",
            Command::SetImage(_) => "set_image",
            Command::RemoveFormatting => "remove_formatting",
        }
    }
}
