use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::error::ToolbarError;

/// Which files a picker should offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFilter {
    pub media_types: Vec<String>,
}

impl MediaFilter {
    pub fn images() -> Self {
        Self {
            media_types: IMAGE_TYPES
                .iter()
                .map(|(_, media_type)| media_type.to_string())
                .collect(),
        }
    }

    pub fn accepts(&self, media_type: &str) -> bool {
        self.media_types.iter().any(|m| m == media_type)
    }

    pub fn extensions(&self) -> Vec<&'static str> {
        IMAGE_TYPES
            .iter()
            .filter(|(_, media_type)| self.accepts(media_type))
            .map(|(ext, _)| *ext)
            .collect()
    }
}

const IMAGE_TYPES: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("svg", "image/svg+xml"),
    ("bmp", "image/bmp"),
];

pub fn media_type_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    IMAGE_TYPES
        .iter()
        .find(|(candidate, _)| *candidate == ext)
        .map(|(_, media_type)| *media_type)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedFile {
    pub name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl PickedFile {
    pub fn read(path: &Path) -> Result<Self, ToolbarError> {
        let media_type = media_type_for_path(path)
            .ok_or_else(|| ToolbarError::UnsupportedMedia(path.display().to_string()))?;
        let bytes = std::fs::read(path).map_err(|source| ToolbarError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            name,
            media_type: media_type.to_string(),
            bytes,
        })
    }

    /// Inline `data:` URL the engine can store as an image source.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, STANDARD.encode(&self.bytes))
    }
}

/// Asks the user for a file. `done` runs once, later, with `None` on cancel.
pub trait FilePicker {
    fn pick(&self, filter: MediaFilter, done: Box<dyn FnOnce(Option<PickedFile>)>);
}

/// Sends the current document to the platform's print flow.
pub trait PrintSurface {
    fn print(&self);
}
