use gpui_docs_core::HEADING_LEVELS;

use crate::command::Command;
use crate::config::ToolbarConfig;
use crate::controls::{ControlBody, ControlId, ControlView};
use crate::dimension::{Dimension, ListKind, NORMAL_TEXT, TextAlign};
use crate::dispatcher::dispatch;
use crate::reader::read;
use crate::registry::EditorRegistry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownOption {
    /// Matched against the dimension's current value to find the selected row.
    pub value: String,
    pub label: String,
    pub command: Command,
}

impl DropdownOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>, command: Command) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            command,
        }
    }
}

/// A picker over a fixed option list for one dimension.
pub struct Dropdown {
    id: ControlId,
    label: String,
    dimension: Dimension,
    options: Vec<DropdownOption>,
}

impl Dropdown {
    pub fn new(
        id: ControlId,
        label: impl Into<String>,
        dimension: Dimension,
        options: Vec<DropdownOption>,
    ) -> Self {
        Self {
            id,
            label: label.into(),
            dimension,
            options,
        }
    }

    pub fn heading(config: &ToolbarConfig) -> Self {
        let mut options = vec![DropdownOption::new(
            NORMAL_TEXT,
            NORMAL_TEXT,
            Command::SetHeading(0),
        )];
        // Levels past what the engine knows are never offered.
        let levels = (1..=config.max_heading_level)
            .filter(|level| HEADING_LEVELS.contains(&u64::from(*level)));
        options.extend(levels.map(|level| {
            let label = format!("Heading {level}");
            DropdownOption::new(label.clone(), label, Command::SetHeading(level))
        }));
        Self::new(ControlId::Heading, "Heading", Dimension::Heading, options)
    }

    pub fn font_family(config: &ToolbarConfig) -> Self {
        let options = config
            .font_families
            .iter()
            .map(|family| {
                DropdownOption::new(family, family, Command::SetFontFamily(family.clone()))
            })
            .collect();
        Self::new(ControlId::FontFamily, "Font", Dimension::FontFamily, options)
    }

    pub fn text_align() -> Self {
        let options = TextAlign::PRIORITY
            .into_iter()
            .map(|align| {
                DropdownOption::new(align.as_str(), align.label(), Command::SetTextAlign(align))
            })
            .collect();
        Self::new(ControlId::TextAlign, "Align", Dimension::TextAlign, options)
    }

    pub fn line_height(config: &ToolbarConfig) -> Self {
        let options = config
            .line_heights
            .iter()
            .map(|option| {
                DropdownOption::new(
                    option.value.clone(),
                    option.label.clone(),
                    Command::SetLineHeight(option.value.clone()),
                )
            })
            .collect();
        Self::new(ControlId::LineHeight, "Line Height", Dimension::LineHeight, options)
    }

    pub fn list_kind() -> Self {
        let options = ListKind::PRIORITY
            .into_iter()
            .map(|kind| {
                DropdownOption::new(kind.engine_name(), kind.label(), Command::ToggleList(kind))
            })
            .collect();
        Self::new(ControlId::ListKind, "List", Dimension::ListKind, options)
    }

    pub fn id(&self) -> ControlId {
        self.id
    }

    pub fn options(&self) -> &[DropdownOption] {
        &self.options
    }

    pub fn view(&self, registry: &EditorRegistry) -> ControlView {
        let current = read(registry.handle().as_ref(), self.dimension).value.as_text();
        let selected = self.options.iter().position(|o| o.value == current);
        let current = selected
            .map(|ix| self.options[ix].label.clone())
            .unwrap_or(current);
        ControlView {
            id: self.id,
            label: self.label.clone(),
            body: ControlBody::Dropdown {
                current,
                selected,
                options: self.options.iter().map(|o| o.label.clone()).collect(),
            },
        }
    }

    pub fn select(&self, registry: &EditorRegistry, index: usize) {
        let Some(option) = self.options.get(index) else {
            tracing::debug!(index, "dropdown selection out of range");
            return;
        };
        dispatch(registry.handle().as_ref(), option.command.clone());
    }
}
