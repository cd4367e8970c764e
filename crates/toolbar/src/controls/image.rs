use std::cell::Cell;
use std::rc::Rc;

use crate::command::Command;
use crate::controls::{ControlBody, ControlId, ControlView};
use crate::dispatcher::dispatch;
use crate::external::{FilePicker, MediaFilter};
use crate::registry::EditorRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageUploadState {
    #[default]
    Idle,
    /// Waiting on the file picker.
    Picking,
}

/// Picks a local image and inlines it into the document.
pub struct ImageUploadButton {
    picker: Rc<dyn FilePicker>,
    state: Rc<Cell<ImageUploadState>>,
}

impl ImageUploadButton {
    pub fn new(picker: Rc<dyn FilePicker>) -> Self {
        Self {
            picker,
            state: Rc::new(Cell::new(ImageUploadState::Idle)),
        }
    }

    pub fn state(&self) -> ImageUploadState {
        self.state.get()
    }

    pub fn is_picking(&self) -> bool {
        self.state() == ImageUploadState::Picking
    }

    pub fn view(&self) -> ControlView {
        ControlView {
            id: ControlId::ImageUpload,
            label: "Upload Image".to_string(),
            body: ControlBody::ImageUpload {
                picking: self.is_picking(),
            },
        }
    }

    /// Ask for a file. The image goes to whichever editor is active when the pick completes.
    pub fn open(&self, registry: &EditorRegistry) {
        if self.state.replace(ImageUploadState::Picking) == ImageUploadState::Picking {
            return;
        }
        let filter = MediaFilter::images();
        let accepted = filter.clone();
        let state = self.state.clone();
        let registry = registry.clone();
        self.picker.pick(
            filter,
            Box::new(move |file| {
                state.set(ImageUploadState::Idle);
                let Some(file) = file else {
                    tracing::debug!("image pick cancelled");
                    return;
                };
                if !accepted.accepts(&file.media_type) {
                    tracing::warn!(
                        media_type = file.media_type.as_str(),
                        "picked file is not an image"
                    );
                    return;
                }
                dispatch(registry.handle().as_ref(), Command::SetImage(file.to_data_url()));
            }),
        );
    }
}
