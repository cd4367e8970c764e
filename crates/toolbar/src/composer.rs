use std::rc::Rc;

use crate::command::Command;
use crate::config::ToolbarConfig;
use crate::controls::{
    Action, ActionButton, ColorPicker, ColorTarget, Control, ControlId, ControlView, Dropdown,
    FontSizeStepper, ImageUploadButton, ToggleButton, UrlInputDialog, UrlTarget,
};
use crate::dimension::Dimension;
use crate::external::{FilePicker, PrintSurface};
use crate::registry::EditorRegistry;

pub struct ControlGroup {
    pub name: &'static str,
    pub controls: Vec<Control>,
}

impl ControlGroup {
    pub fn new(name: &'static str, controls: Vec<Control>) -> Self {
        Self { name, controls }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolbarItem {
    Control(ControlView),
    Separator,
}

/// An ordered row of control groups.
pub struct Toolbar {
    pub groups: Vec<ControlGroup>,
}

impl Toolbar {
    pub fn new(groups: Vec<ControlGroup>) -> Self {
        Self { groups }
    }

    pub fn standard(
        config: &ToolbarConfig,
        printer: Rc<dyn PrintSurface>,
        picker: Rc<dyn FilePicker>,
    ) -> Self {
        let config = &config.clone().with_defaults();
        let toggle = |id, label: &str, dimension, command| {
            Control::Toggle(ToggleButton::new(id, label, dimension, command))
        };

        Self::new(vec![
            ControlGroup::new(
                "history",
                vec![
                    Control::Action(ActionButton::new(ControlId::Undo, "Undo", Action::Undo)),
                    Control::Action(ActionButton::new(ControlId::Redo, "Redo", Action::Redo)),
                    Control::Action(ActionButton::new(
                        ControlId::Print,
                        "Print",
                        Action::Print(printer),
                    )),
                    toggle(
                        ControlId::Spellcheck,
                        "Spellcheck",
                        Dimension::Spellcheck,
                        Command::ToggleSpellcheck,
                    ),
                ],
            ),
            ControlGroup::new(
                "block style",
                vec![
                    Control::Dropdown(Dropdown::font_family(config)),
                    Control::Dropdown(Dropdown::heading(config)),
                    Control::FontSize(FontSizeStepper::new()),
                ],
            ),
            ControlGroup::new(
                "marks",
                vec![
                    toggle(
                        ControlId::Bold,
                        "Bold",
                        Dimension::Bold,
                        Command::ToggleBold,
                    ),
                    toggle(
                        ControlId::Italic,
                        "Italic",
                        Dimension::Italic,
                        Command::ToggleItalic,
                    ),
                    toggle(
                        ControlId::Underline,
                        "Underline",
                        Dimension::Underline,
                        Command::ToggleUnderline,
                    ),
                    Control::Color(ColorPicker::new(ColorTarget::Text, config)),
                    Control::Color(ColorPicker::new(ColorTarget::Highlight, config)),
                ],
            ),
            ControlGroup::new(
                "insert",
                vec![
                    Control::UrlInput(UrlInputDialog::new(UrlTarget::Link)),
                    Control::ImageUpload(ImageUploadButton::new(picker)),
                    Control::UrlInput(UrlInputDialog::new(UrlTarget::Image)),
                ],
            ),
            ControlGroup::new(
                "layout",
                vec![
                    Control::Dropdown(Dropdown::text_align()),
                    Control::Dropdown(Dropdown::line_height(config)),
                    Control::Dropdown(Dropdown::list_kind()),
                    toggle(
                        ControlId::TaskList,
                        "Checklist",
                        Dimension::TaskList,
                        Command::ToggleTaskList,
                    ),
                ],
            ),
            ControlGroup::new(
                "cleanup",
                vec![Control::Action(ActionButton::new(
                    ControlId::RemoveFormatting,
                    "Clear Formatting",
                    Action::RemoveFormatting,
                ))],
            ),
        ])
    }

    /// Views for every control, with one separator between non-empty groups.
    pub fn render(&self, registry: &EditorRegistry) -> Vec<ToolbarItem> {
        let mut items = Vec::new();
        for group in self.groups.iter().filter(|g| !g.controls.is_empty()) {
            if !items.is_empty() {
                items.push(ToolbarItem::Separator);
            }
            items.extend(
                group
                    .controls
                    .iter()
                    .map(|control| ToolbarItem::Control(control.view(registry))),
            );
        }
        items
    }

    pub fn controls(&self) -> impl Iterator<Item = &Control> {
        self.groups.iter().flat_map(|g| g.controls.iter())
    }

    pub fn control(&self, id: ControlId) -> Option<&Control> {
        self.controls().find(|c| c.id() == id)
    }

    pub fn control_mut(&mut self, id: ControlId) -> Option<&mut Control> {
        self.groups
            .iter_mut()
            .flat_map(|g| g.controls.iter_mut())
            .find(|c| c.id() == id)
    }
}
