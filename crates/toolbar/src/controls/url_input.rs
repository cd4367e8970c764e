use crate::command::Command;
use crate::controls::{ControlBody, ControlId, ControlView};
use crate::dimension::Dimension;
use crate::dispatcher::dispatch;
use crate::reader::read;
use crate::registry::EditorRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlTarget {
    Link,
    Image,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UrlInputState {
    #[default]
    Closed,
    OpenEmpty,
    OpenWithDraft(String),
}

impl UrlInputState {
    fn with_draft(draft: String) -> Self {
        if draft.trim().is_empty() {
            UrlInputState::OpenEmpty
        } else {
            UrlInputState::OpenWithDraft(draft)
        }
    }
}

/// A small popup that asks for a URL, for links or for images by address.
pub struct UrlInputDialog {
    target: UrlTarget,
    state: UrlInputState,
}

impl UrlInputDialog {
    pub fn new(target: UrlTarget) -> Self {
        Self {
            target,
            state: UrlInputState::Closed,
        }
    }

    pub fn id(&self) -> ControlId {
        match self.target {
            UrlTarget::Link => ControlId::Link,
            UrlTarget::Image => ControlId::ImageUrl,
        }
    }

    pub fn state(&self) -> &UrlInputState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != UrlInputState::Closed
    }

    pub fn draft(&self) -> &str {
        match &self.state {
            UrlInputState::OpenWithDraft(draft) => draft,
            UrlInputState::Closed | UrlInputState::OpenEmpty => "",
        }
    }

    pub fn view(&self, registry: &EditorRegistry) -> ControlView {
        let (label, active) = match self.target {
            UrlTarget::Link => (
                "Link",
                read(registry.handle().as_ref(), Dimension::Link).is_active,
            ),
            UrlTarget::Image => ("Insert Image by URL", false),
        };
        ControlView {
            id: self.id(),
            label: label.to_string(),
            body: ControlBody::UrlInput {
                active,
                open: self.is_open(),
                draft: self.draft().to_string(),
            },
        }
    }

    /// Open the popup. The link dialog starts from the href under the selection.
    pub fn open(&mut self, registry: &EditorRegistry) {
        let draft = match self.target {
            UrlTarget::Link => read(registry.handle().as_ref(), Dimension::Link)
                .value
                .as_text(),
            UrlTarget::Image => String::new(),
        };
        self.state = UrlInputState::with_draft(draft);
    }

    pub fn input(&mut self, text: impl Into<String>) {
        if self.is_open() {
            self.state = UrlInputState::with_draft(text.into());
        }
    }

    /// Send the draft and close. An empty draft keeps the popup open and sends nothing.
    pub fn submit(&mut self, registry: &EditorRegistry) -> bool {
        let UrlInputState::OpenWithDraft(draft) = &self.state else {
            return false;
        };
        let url = draft.trim().to_string();
        let command = match self.target {
            UrlTarget::Link => Command::SetLink(url),
            UrlTarget::Image => Command::SetImage(url),
        };
        self.state = UrlInputState::Closed;
        dispatch(registry.handle().as_ref(), command);
        true
    }

    pub fn close(&mut self) {
        self.state = UrlInputState::Closed;
    }
}
