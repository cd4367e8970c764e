use crate::command::{Command, Step};
use crate::controls::{ControlBody, ControlId, ControlView};
use crate::dimension::{DEFAULT_FONT_SIZE, Dimension};
use crate::dispatcher::dispatch;
use crate::reader::{parse_font_size, read};
use crate::registry::EditorRegistry;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StepperState {
    /// Showing whatever size the editor reports.
    #[default]
    Display,
    /// The user is typing; the draft shadows the editor value until committed or cancelled.
    Editing { draft: String },
}

/// Font size with `-`/`+` buttons around an editable number.
#[derive(Debug, Default)]
pub struct FontSizeStepper {
    state: StepperState,
}

impl FontSizeStepper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &StepperState {
        &self.state
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, StepperState::Editing { .. })
    }

    pub fn current(&self, registry: &EditorRegistry) -> u32 {
        read(registry.handle().as_ref(), Dimension::FontSize)
            .value
            .as_size()
            .unwrap_or(DEFAULT_FONT_SIZE)
    }

    pub fn view(&self, registry: &EditorRegistry) -> ControlView {
        let draft = match &self.state {
            StepperState::Display => None,
            StepperState::Editing { draft } => Some(draft.clone()),
        };
        ControlView {
            id: ControlId::FontSize,
            label: "Font Size".to_string(),
            body: ControlBody::Stepper {
                value: self.current(registry),
                draft,
            },
        }
    }

    /// Start typing, seeded with the size currently shown.
    pub fn begin_edit(&mut self, registry: &EditorRegistry) {
        if self.is_editing() {
            return;
        }
        self.state = StepperState::Editing {
            draft: self.current(registry).to_string(),
        };
    }

    pub fn input(&mut self, text: impl Into<String>) {
        let text = text.into();
        match &mut self.state {
            StepperState::Editing { draft } => *draft = text,
            StepperState::Display => self.state = StepperState::Editing { draft: text },
        }
    }

    /// Apply the draft and go back to showing the editor value.
    ///
    /// Returns whether a size was sent; an unparsable draft is discarded.
    pub fn commit(&mut self, registry: &EditorRegistry) -> bool {
        let StepperState::Editing { draft } = std::mem::take(&mut self.state) else {
            return false;
        };
        if parse_font_size(&draft).is_none() {
            tracing::debug!(draft = draft.as_str(), "font size draft discarded");
            return false;
        }
        dispatch(registry.handle().as_ref(), Command::SetFontSize(draft));
        true
    }

    pub fn cancel(&mut self) {
        self.state = StepperState::Display;
    }

    pub fn increment(&mut self, registry: &EditorRegistry) {
        self.step(registry, Step::Increment);
    }

    pub fn decrement(&mut self, registry: &EditorRegistry) {
        self.step(registry, Step::Decrement);
    }

    fn step(&mut self, registry: &EditorRegistry, step: Step) {
        self.state = StepperState::Display;
        dispatch(registry.handle().as_ref(), Command::StepFontSize(step));
    }
}
