use std::cell::RefCell;
use std::path::PathBuf;

use gpui::{App, PathPromptOptions, Window};
use gpui_docs_toolbar::{FilePicker, MediaFilter, PickedFile};

struct PickRequest {
    filter: MediaFilter,
    done: Box<dyn FnOnce(Option<PickedFile>)>,
}

/// File picker backed by the platform open dialog.
///
/// `pick` only records the request; the toolbar view calls [`GpuiFilePicker::run_pending`] right
/// after, when it has a window to prompt from. The completion callback runs back on the UI thread.
#[derive(Default)]
pub struct GpuiFilePicker {
    pending: RefCell<Option<PickRequest>>,
}

impl FilePicker for GpuiFilePicker {
    fn pick(&self, filter: MediaFilter, done: Box<dyn FnOnce(Option<PickedFile>)>) {
        let previous = self.pending.replace(Some(PickRequest { filter, done }));
        if let Some(previous) = previous {
            (previous.done)(None);
        }
    }
}

impl GpuiFilePicker {
    pub fn has_pending(&self) -> bool {
        self.pending.borrow().is_some()
    }

    /// Prompt for the recorded request, if any. `after` runs once the request has completed.
    pub fn run_pending(
        &self,
        window: &mut Window,
        cx: &mut App,
        after: impl FnOnce(&mut Window, &mut App) + 'static,
    ) {
        let Some(PickRequest { filter, done }) = self.pending.borrow_mut().take() else {
            return;
        };

        let picked = cx.prompt_for_paths(PathPromptOptions {
            files: true,
            directories: false,
            multiple: false,
            prompt: Some("Insert Image".into()),
        });

        window
            .spawn(cx, async move |cx| {
                let path: Option<PathBuf> = picked
                    .await
                    .ok()
                    .and_then(|result| result.ok())
                    .flatten()
                    .and_then(|paths| paths.into_iter().next());

                let file = path.and_then(|path| match PickedFile::read(&path) {
                    Ok(file) if filter.accepts(&file.media_type) => Some(file),
                    Ok(file) => {
                        tracing::warn!(media_type = file.media_type.as_str(), "not an image");
                        None
                    }
                    Err(err) => {
                        tracing::warn!(%err, "failed to read picked file");
                        None
                    }
                });

                cx.update(|window, cx| {
                    done(file);
                    after(window, cx);
                })
                .ok();
            })
            .detach();
    }
}
