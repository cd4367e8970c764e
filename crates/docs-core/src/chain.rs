use serde_json::{Value, json};

use crate::core::Editor;
use crate::error::CommandError;

/// A batch of commands run as one unit: either every step lands and history records a single
/// entry, or the editor is rolled back to where the chain started.
///
/// ```ignore
/// editor.chain().focus().toggle_bold().run();
/// ```
#[must_use = "a chain does nothing until `run` is called"]
pub struct Chain<'a> {
    editor: &'a mut Editor,
    steps: Vec<(String, Option<Value>)>,
    focus: bool,
}

impl<'a> Chain<'a> {
    pub(crate) fn new(editor: &'a mut Editor) -> Self {
        Self {
            editor,
            steps: Vec::new(),
            focus: false,
        }
    }

    /// Return focus to the editing surface once the chain has run, whatever its outcome.
    pub fn focus(mut self) -> Self {
        self.focus = true;
        self
    }

    pub fn command(mut self, id: impl Into<String>, args: Option<Value>) -> Self {
        self.steps.push((id.into(), args));
        self
    }

    pub fn undo(self) -> Self {
        self.command("history.undo", None)
    }

    pub fn redo(self) -> Self {
        self.command("history.redo", None)
    }

    pub fn toggle_bold(self) -> Self {
        self.command("marks.toggle_bold", None)
    }

    pub fn toggle_italic(self) -> Self {
        self.command("marks.toggle_italic", None)
    }

    pub fn toggle_underline(self) -> Self {
        self.command("marks.toggle_underline", None)
    }

    pub fn set_color(self, color: &str) -> Self {
        self.command("marks.set_text_color", Some(json!({ "color": color })))
    }

    pub fn set_highlight(self, color: &str) -> Self {
        self.command("marks.set_highlight_color", Some(json!({ "color": color })))
    }

    pub fn set_font_family(self, family: &str) -> Self {
        self.command("marks.set_font_family", Some(json!({ "family": family })))
    }

    pub fn set_font_size(self, size: &str) -> Self {
        self.command("marks.set_font_size", Some(json!({ "size": size })))
    }

    pub fn set_link(self, href: &str) -> Self {
        self.command("marks.set_link", Some(json!({ "url": href })))
    }

    pub fn unset_link(self) -> Self {
        self.command("marks.unset_link", None)
    }

    pub fn unset_all_marks(self) -> Self {
        self.command("marks.unset_all", None)
    }

    /// Level 0 turns the blocks back into normal text.
    pub fn set_heading(self, level: u64) -> Self {
        self.command("block.set_heading", Some(json!({ "level": level })))
    }

    pub fn set_text_align(self, align: &str) -> Self {
        self.command("block.set_align", Some(json!({ "align": align })))
    }

    pub fn set_line_height(self, line_height: &str) -> Self {
        self.command(
            "block.set_line_height",
            Some(json!({ "line_height": line_height })),
        )
    }

    pub fn toggle_bullet_list(self) -> Self {
        self.command("list.toggle_bulleted", None)
    }

    pub fn toggle_ordered_list(self) -> Self {
        self.command("list.toggle_ordered", None)
    }

    pub fn toggle_task_list(self) -> Self {
        self.command("task.toggle", None)
    }

    pub fn set_image(self, src: &str) -> Self {
        self.command("image.insert", Some(json!({ "src": src })))
    }

    pub fn toggle_spellcheck(self) -> Self {
        self.command("view.toggle_spellcheck", None)
    }

    /// Run every queued step, returning whether all of them succeeded.
    pub fn run(self) -> bool {
        match self.try_run() {
            Ok(()) => true,
            Err(err) => {
                tracing::debug!(%err, "command chain rolled back");
                false
            }
        }
    }

    pub fn try_run(self) -> Result<(), CommandError> {
        let Chain {
            editor,
            steps,
            focus,
        } = self;

        let checkpoint = editor.checkpoint();
        let mut outcome = Ok(());
        for (id, args) in steps {
            if let Err(err) = editor.run_command(&id, args) {
                outcome = Err(err);
                break;
            }
        }

        match &outcome {
            Ok(()) => editor.squash_history_since(&checkpoint),
            Err(_) => editor.restore(checkpoint),
        }
        if focus {
            editor.focus();
        }
        outcome
    }
}

/// Dry-run probes: report whether a command would succeed without keeping its effects.
pub struct Can<'a> {
    editor: &'a mut Editor,
}

impl Can<'_> {
    pub fn undo(&self) -> bool {
        self.editor.can_undo()
    }

    pub fn redo(&self) -> bool {
        self.editor.can_redo()
    }

    pub fn command(&mut self, id: &str, args: Option<Value>) -> bool {
        self.editor
            .dry_run(|editor| editor.run_command(id, args).is_ok())
    }
}

impl Editor {
    pub fn chain(&mut self) -> Chain<'_> {
        Chain::new(self)
    }

    pub fn can(&mut self) -> Can<'_> {
        Can { editor: self }
    }
}
