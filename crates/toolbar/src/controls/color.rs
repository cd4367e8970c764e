use crate::command::Command;
use crate::config::ToolbarConfig;
use crate::controls::{ControlBody, ControlId, ControlView};
use crate::dimension::Dimension;
use crate::dispatcher::dispatch;
use crate::reader::read;
use crate::registry::EditorRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorTarget {
    Text,
    Highlight,
}

impl ColorTarget {
    fn dimension(self) -> Dimension {
        match self {
            ColorTarget::Text => Dimension::TextColor,
            ColorTarget::Highlight => Dimension::HighlightColor,
        }
    }

    fn command(self, color: String) -> Command {
        match self {
            ColorTarget::Text => Command::SetTextColor(color),
            ColorTarget::Highlight => Command::SetHighlightColor(color),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ColorPickerState {
    #[default]
    Closed,
    Open { pending: String },
}

pub struct ColorPicker {
    target: ColorTarget,
    palette: Vec<String>,
    state: ColorPickerState,
}

impl ColorPicker {
    pub fn new(target: ColorTarget, config: &ToolbarConfig) -> Self {
        Self {
            target,
            palette: config.color_palette.clone(),
            state: ColorPickerState::Closed,
        }
    }

    pub fn id(&self) -> ControlId {
        match self.target {
            ColorTarget::Text => ControlId::TextColor,
            ColorTarget::Highlight => ControlId::HighlightColor,
        }
    }

    pub fn target(&self) -> ColorTarget {
        self.target
    }

    pub fn state(&self) -> &ColorPickerState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, ColorPickerState::Open { .. })
    }

    pub fn current(&self, registry: &EditorRegistry) -> String {
        read(registry.handle().as_ref(), self.target.dimension())
            .value
            .as_text()
    }

    pub fn view(&self, registry: &EditorRegistry) -> ControlView {
        let pending = match &self.state {
            ColorPickerState::Closed => None,
            ColorPickerState::Open { pending } => Some(pending.clone()),
        };
        let label = match self.target {
            ColorTarget::Text => "Text Color",
            ColorTarget::Highlight => "Highlight Color",
        };
        ControlView {
            id: self.id(),
            label: label.to_string(),
            body: ControlBody::Color {
                color: self.current(registry),
                pending,
                palette: self.palette.clone(),
            },
        }
    }

    pub fn open(&mut self, registry: &EditorRegistry) {
        self.state = ColorPickerState::Open {
            pending: self.current(registry),
        };
    }

    /// Preview a color without applying it.
    pub fn set_pending(&mut self, color: impl Into<String>) {
        if let ColorPickerState::Open { pending } = &mut self.state {
            *pending = color.into();
        }
    }

    /// Apply a color and close.
    pub fn pick(&mut self, registry: &EditorRegistry, color: impl Into<String>) {
        self.state = ColorPickerState::Closed;
        dispatch(registry.handle().as_ref(), self.target.command(color.into()));
    }

    /// Apply the previewed color, if the picker is open.
    pub fn confirm(&mut self, registry: &EditorRegistry) {
        if let ColorPickerState::Open { pending } = std::mem::take(&mut self.state) {
            dispatch(registry.handle().as_ref(), self.target.command(pending));
        }
    }

    pub fn close(&mut self) {
        self.state = ColorPickerState::Closed;
    }
}
