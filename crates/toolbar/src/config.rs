use serde::{Deserialize, Serialize};

use crate::error::ToolbarError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineHeightOption {
    pub value: String,
    pub label: String,
}

impl LineHeightOption {
    fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
        }
    }
}

/// Option lists the standard toolbar offers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolbarConfig {
    pub font_families: Vec<String>,
    pub line_heights: Vec<LineHeightOption>,
    /// Highest heading level offered in the heading picker, 1 to 6.
    pub max_heading_level: u8,
    pub color_palette: Vec<String>,
}

impl Default for ToolbarConfig {
    fn default() -> Self {
        Self {
            font_families: [
                "Arial",
                "Times New Roman",
                "Courier New",
                "Georgia",
                "Verdana",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            line_heights: vec![
                LineHeightOption::new("normal", "Default"),
                LineHeightOption::new("1", "Single"),
                LineHeightOption::new("1.15", "1.15"),
                LineHeightOption::new("1.5", "1.5"),
                LineHeightOption::new("2", "Double"),
            ],
            max_heading_level: 6,
            color_palette: [
                "#000000", "#434343", "#666666", "#999999", "#CCCCCC", "#FFFFFF", "#FF0000",
                "#FF9900", "#FFFF00", "#00FF00", "#00FFFF", "#4A86E8", "#0000FF", "#9900FF",
                "#FF00FF",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

impl ToolbarConfig {
    /// Fill emptied lists back in and clamp the heading level.
    pub fn with_defaults(mut self) -> Self {
        let defaults = Self::default();
        if self.font_families.is_empty() {
            self.font_families = defaults.font_families;
        }
        if self.line_heights.is_empty() {
            self.line_heights = defaults.line_heights;
        }
        if self.color_palette.is_empty() {
            self.color_palette = defaults.color_palette;
        }
        self.max_heading_level = match self.max_heading_level {
            0 => defaults.max_heading_level,
            level => level.min(6),
        };
        self
    }

    pub fn from_json_str(s: &str) -> Result<Self, ToolbarError> {
        let config: Self = serde_json::from_str(s)?;
        Ok(config.with_defaults())
    }
}
