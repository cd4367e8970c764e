use gpui_docs_core::{Chain, EditorHandle};

use crate::command::{Command, Step};
use crate::dimension::{Dimension, ListKind};
use crate::reader::{parse_font_size, read};

/// Apply a command to the editor as one atomic, focus-returning chain.
///
/// Without an editor this is a no-op. Invalid font sizes are dropped before the engine is
/// touched. Engine rejections are logged and swallowed; re-rendering is left to the editor's
/// change notification.
pub fn dispatch(handle: Option<&EditorHandle>, command: Command) {
    let Some(handle) = handle else {
        tracing::debug!(command = command.name(), "no editor mounted; command dropped");
        return;
    };

    let font_size = match &command {
        Command::SetFontSize(raw) => match parse_font_size(raw) {
            Some(size) => Some(size),
            None => {
                tracing::debug!(raw = raw.as_str(), "ignoring invalid font size");
                return;
            }
        },
        Command::StepFontSize(step) => {
            let current = read(Some(handle), Dimension::FontSize)
                .value
                .as_size()
                .unwrap_or(crate::dimension::DEFAULT_FONT_SIZE);
            Some(match step {
                Step::Increment => current.saturating_add(1),
                Step::Decrement => current.saturating_sub(1).max(1),
            })
        }
        _ => None,
    };

    let name = command.name();
    tracing::debug!(command = name, "dispatching");
    let result = handle.update(|editor| {
        let chain = editor.chain().focus();
        build(chain, &command, font_size).try_run()
    });
    if let Err(err) = result {
        tracing::warn!(command = name, %err, "editor rejected command");
    }
}

fn build<'a>(chain: Chain<'a>, command: &Command, font_size: Option<u32>) -> Chain<'a> {
    match command {
        Command::Undo => chain.undo(),
        Command::Redo => chain.redo(),
        Command::ToggleBold => chain.toggle_bold(),
        Command::ToggleItalic => chain.toggle_italic(),
        Command::ToggleUnderline => chain.toggle_underline(),
        Command::ToggleTaskList => chain.toggle_task_list(),
        Command::ToggleSpellcheck => chain.toggle_spellcheck(),
        Command::ToggleList(ListKind::Bullet) => chain.toggle_bullet_list(),
        Command::ToggleList(ListKind::Ordered) => chain.toggle_ordered_list(),
        Command::SetHeading(level) => chain.set_heading(u64::from(*level)),
        Command::SetTextAlign(align) => chain.set_text_align(align.as_str()),
        Command::SetFontFamily(family) => chain.set_font_family(family),
        Command::SetFontSize(_) | Command::StepFontSize(_) => match font_size {
            Some(size) => chain.set_font_size(&format!("{size}px")),
            None => chain,
        },
        Command::SetLineHeight(line_height) => chain.set_line_height(line_height),
        Command::SetTextColor(color) => chain.set_color(color),
        Command::SetHighlightColor(color) => chain.set_highlight(color),
        Command::SetLink(href) if href.trim().is_empty() => chain.unset_link(),
        Command::SetLink(href) => chain.set_link(href.trim()),
        Command::SetImage(src) => chain.set_image(src),
        Command::RemoveFormatting => chain.unset_all_marks(),
    }
}
