use std::rc::Rc;

use crate::command::Command;
use crate::controls::{ControlBody, ControlId, ControlView};
use crate::dimension::Dimension;
use crate::dispatcher::dispatch;
use crate::external::PrintSurface;
use crate::reader::{can_redo, can_undo, read};
use crate::registry::EditorRegistry;

/// A button that shows whether a boolean dimension is on and flips it when pressed.
pub struct ToggleButton {
    id: ControlId,
    label: String,
    dimension: Dimension,
    command: Command,
}

impl ToggleButton {
    pub fn new(
        id: ControlId,
        label: impl Into<String>,
        dimension: Dimension,
        command: Command,
    ) -> Self {
        Self {
            id,
            label: label.into(),
            dimension,
            command,
        }
    }

    /// A toggle for a boolean dimension, or `None` when the dimension has no toggle.
    pub fn for_dimension(
        id: ControlId,
        label: impl Into<String>,
        dimension: Dimension,
    ) -> Option<Self> {
        let command = Command::toggle_for(dimension)?;
        Some(Self::new(id, label, dimension, command))
    }

    pub fn id(&self) -> ControlId {
        self.id
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn view(&self, registry: &EditorRegistry) -> ControlView {
        let state = read(registry.handle().as_ref(), self.dimension);
        ControlView {
            id: self.id,
            label: self.label.clone(),
            body: ControlBody::Toggle {
                active: state.is_active,
            },
        }
    }

    pub fn press(&self, registry: &EditorRegistry) {
        dispatch(registry.handle().as_ref(), self.command.clone());
    }
}

pub enum Action {
    Undo,
    Redo,
    Print(Rc<dyn PrintSurface>),
    RemoveFormatting,
}

/// A one-shot button: history, printing and clearing formatting.
pub struct ActionButton {
    id: ControlId,
    label: String,
    action: Action,
}

impl ActionButton {
    pub fn new(id: ControlId, label: impl Into<String>, action: Action) -> Self {
        Self {
            id,
            label: label.into(),
            action,
        }
    }

    pub fn id(&self) -> ControlId {
        self.id
    }

    pub fn is_disabled(&self, registry: &EditorRegistry) -> bool {
        let handle = registry.handle();
        match self.action {
            Action::Undo => !can_undo(handle.as_ref()),
            Action::Redo => !can_redo(handle.as_ref()),
            Action::Print(_) | Action::RemoveFormatting => false,
        }
    }

    pub fn view(&self, registry: &EditorRegistry) -> ControlView {
        ControlView {
            id: self.id,
            label: self.label.clone(),
            body: ControlBody::Action {
                disabled: self.is_disabled(registry),
            },
        }
    }

    pub fn press(&self, registry: &EditorRegistry) {
        let handle = registry.handle();
        match &self.action {
            Action::Undo => dispatch(handle.as_ref(), Command::Undo),
            Action::Redo => dispatch(handle.as_ref(), Command::Redo),
            Action::RemoveFormatting => dispatch(handle.as_ref(), Command::RemoveFormatting),
            Action::Print(surface) => {
                tracing::debug!("printing document");
                surface.print();
            }
        }
    }
}
