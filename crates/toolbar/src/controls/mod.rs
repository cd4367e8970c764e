mod button;
mod color;
mod dropdown;
mod image;
mod stepper;
mod url_input;

pub use button::*;
pub use color::*;
pub use dropdown::*;
pub use image::*;
pub use stepper::*;
pub use url_input::*;

use crate::registry::EditorRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlId {
    Undo,
    Redo,
    Print,
    Spellcheck,
    FontFamily,
    Heading,
    FontSize,
    Bold,
    Italic,
    Underline,
    TextColor,
    HighlightColor,
    Link,
    ImageUpload,
    ImageUrl,
    TextAlign,
    LineHeight,
    ListKind,
    TaskList,
    RemoveFormatting,
}

/// Everything a renderer needs to draw one control, computed fresh from the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlView {
    pub id: ControlId,
    pub label: String,
    pub body: ControlBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlBody {
    Toggle {
        active: bool,
    },
    Action {
        disabled: bool,
    },
    Dropdown {
        current: String,
        selected: Option<usize>,
        options: Vec<String>,
    },
    Stepper {
        value: u32,
        draft: Option<String>,
    },
    Color {
        color: String,
        pending: Option<String>,
        palette: Vec<String>,
    },
    UrlInput {
        active: bool,
        open: bool,
        draft: String,
    },
    ImageUpload {
        picking: bool,
    },
}

/// Every control kind the toolbar can hold.
pub enum Control {
    Toggle(ToggleButton),
    Action(ActionButton),
    Dropdown(Dropdown),
    FontSize(FontSizeStepper),
    Color(ColorPicker),
    UrlInput(UrlInputDialog),
    ImageUpload(ImageUploadButton),
}

impl Control {
    pub fn id(&self) -> ControlId {
        match self {
            Control::Toggle(c) => c.id(),
            Control::Action(c) => c.id(),
            Control::Dropdown(c) => c.id(),
            Control::FontSize(_) => ControlId::FontSize,
            Control::Color(c) => c.id(),
            Control::UrlInput(c) => c.id(),
            Control::ImageUpload(_) => ControlId::ImageUpload,
        }
    }

    pub fn view(&self, registry: &EditorRegistry) -> ControlView {
        match self {
            Control::Toggle(c) => c.view(registry),
            Control::Action(c) => c.view(registry),
            Control::Dropdown(c) => c.view(registry),
            Control::FontSize(c) => c.view(registry),
            Control::Color(c) => c.view(registry),
            Control::UrlInput(c) => c.view(registry),
            Control::ImageUpload(c) => c.view(),
        }
    }
}
