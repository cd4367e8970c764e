use crate::core::{
    Document, Editor, Marks, Node, Point, Selection, apply_op_to, clamp_to_char_boundary,
};
use crate::ops::{Op, Transaction};
use crate::plugin::{CommandSpec, DocsPlugin, apply_built, string_arg};
use crate::tree::{covered_leaves, focus_leaf, node_ref, parent_path};

pub(crate) struct MarksPlugin;

impl DocsPlugin for MarksPlugin {
    fn id(&self) -> &'static str {
        "marks.commands"
    }

    fn commands(&self) -> Vec<CommandSpec> {
        vec![
            CommandSpec::new("marks.toggle_bold", |editor, _args| {
                let tx = toggle_bool_mark(
                    editor,
                    |m| m.bold,
                    |m, v| m.bold = v,
                    "command:marks.toggle_bold",
                );
                apply_built(editor, tx, "toggle bold")
            }),
            CommandSpec::new("marks.toggle_italic", |editor, _args| {
                let tx = toggle_bool_mark(
                    editor,
                    |m| m.italic,
                    |m, v| m.italic = v,
                    "command:marks.toggle_italic",
                );
                apply_built(editor, tx, "toggle italic")
            }),
            CommandSpec::new("marks.toggle_underline", |editor, _args| {
                let tx = toggle_bool_mark(
                    editor,
                    |m| m.underline,
                    |m, v| m.underline = v,
                    "command:marks.toggle_underline",
                );
                apply_built(editor, tx, "toggle underline")
            }),
            CommandSpec::new("marks.set_text_color", |editor, args| {
                let color = string_arg(args.as_ref(), "color")?;
                let tx = set_marks(editor, "command:marks.set_text_color", &|mut m| {
                    m.text_color = Some(color.clone());
                    m
                });
                apply_built(editor, tx, "set text color")
            }),
            CommandSpec::new("marks.unset_text_color", |editor, _args| {
                let tx = set_marks(editor, "command:marks.unset_text_color", &|mut m| {
                    m.text_color = None;
                    m
                });
                apply_built(editor, tx, "unset text color")
            }),
            CommandSpec::new("marks.set_highlight_color", |editor, args| {
                let color = string_arg(args.as_ref(), "color")?;
                let tx = set_marks(editor, "command:marks.set_highlight_color", &|mut m| {
                    m.highlight_color = Some(color.clone());
                    m
                });
                apply_built(editor, tx, "set highlight color")
            }),
            CommandSpec::new("marks.unset_highlight_color", |editor, _args| {
                let tx = set_marks(editor, "command:marks.unset_highlight_color", &|mut m| {
                    m.highlight_color = None;
                    m
                });
                apply_built(editor, tx, "unset highlight color")
            }),
            CommandSpec::new("marks.set_link", |editor, args| {
                let url = string_arg(args.as_ref(), "url")?;
                let tx = set_link(editor, Some(url), "command:marks.set_link");
                apply_built(editor, tx, "set link")
            }),
            CommandSpec::new("marks.unset_link", |editor, _args| {
                let tx = set_link(editor, None, "command:marks.unset_link");
                apply_built(editor, tx, "unset link")
            }),
            CommandSpec::new("marks.set_font_family", |editor, args| {
                let family = string_arg(args.as_ref(), "family")?;
                let tx = set_marks(editor, "command:marks.set_font_family", &|mut m| {
                    m.font_family = Some(family.clone());
                    m
                });
                apply_built(editor, tx, "set font family")
            }),
            CommandSpec::new("marks.unset_font_family", |editor, _args| {
                let tx = set_marks(editor, "command:marks.unset_font_family", &|mut m| {
                    m.font_family = None;
                    m
                });
                apply_built(editor, tx, "unset font family")
            }),
            CommandSpec::new("marks.set_font_size", |editor, args| {
                let size = string_arg(args.as_ref(), "size")?;
                let tx = set_marks(editor, "command:marks.set_font_size", &|mut m| {
                    m.font_size = Some(size.clone());
                    m
                });
                apply_built(editor, tx, "set font size")
            }),
            CommandSpec::new("marks.unset_font_size", |editor, _args| {
                let tx = set_marks(editor, "command:marks.unset_font_size", &|mut m| {
                    m.font_size = None;
                    m
                });
                apply_built(editor, tx, "unset font size")
            }),
            // Character marks only; block formatting is kept.
            CommandSpec::new("marks.unset_all", |editor, _args| {
                let tx = set_marks(editor, "command:marks.unset_all", &|_| Marks::default());
                apply_built(editor, tx, "clear formatting")
            }),
        ]
    }
}

fn toggle_bool_mark(
    editor: &Editor,
    get: fn(&Marks) -> bool,
    set: fn(&mut Marks, bool),
    source: &'static str,
) -> Result<Transaction, String> {
    let sel = editor.selection().clone();
    let enable = if sel.is_collapsed() {
        !focus_leaf(editor.doc(), &sel).is_some_and(|t| get(&t.marks))
    } else {
        let (start, end) = sel.ordered();
        let leaves = covered_leaves(editor.doc(), &start, &end);
        leaves.is_empty() || !leaves.iter().all(|(_, t)| get(&t.marks))
    };
    set_marks(editor, source, &|mut m| {
        set(&mut m, enable);
        m
    })
}

fn set_marks(
    editor: &Editor,
    source: &'static str,
    apply: &dyn Fn(Marks) -> Marks,
) -> Result<Transaction, String> {
    let sel = editor.selection().clone();
    let (ops, selection_after) = if sel.is_collapsed() {
        mark_at_caret(editor, apply)?
    } else {
        apply_mark_range(editor, &sel, apply)?
    };
    Ok(Transaction::new(ops)
        .selection_after(selection_after)
        .source(source))
}

/// A collapsed caret inside a link edits the whole linked leaf rather than storing a caret mark.
fn set_link(
    editor: &Editor,
    url: Option<String>,
    source: &'static str,
) -> Result<Transaction, String> {
    let sel = editor.selection().clone();
    let apply = |mut m: Marks| {
        m.link = url.clone();
        m
    };
    if sel.is_collapsed()
        && let Some(leaf) = focus_leaf(editor.doc(), &sel)
        && leaf.marks.link.is_some()
    {
        return Ok(Transaction::new(vec![Op::SetTextMarks {
            path: sel.focus.path.clone(),
            marks: apply(leaf.marks.clone()),
        }])
        .selection_after(sel)
        .source(source));
    }
    set_marks(editor, source, &apply)
}

/// Ops applied to a private copy of the document as they are queued, so later ops can be
/// computed against the tree the earlier ones produce.
struct Scratch {
    doc: Document,
    selection: Selection,
    ops: Vec<Op>,
}

impl Scratch {
    fn push(&mut self, op: Op) -> Result<(), String> {
        apply_op_to(&mut self.doc, &mut self.selection, op.clone()).map_err(|e| e.to_string())?;
        self.ops.push(op);
        Ok(())
    }

    fn text_len(&self, path: &[usize]) -> Option<usize> {
        match node_ref(&self.doc, path)? {
            Node::Text(t) => Some(t.text.len()),
            _ => None,
        }
    }
}

fn apply_mark_range(
    editor: &Editor,
    sel: &Selection,
    apply: &dyn Fn(Marks) -> Marks,
) -> Result<(Vec<Op>, Selection), String> {
    let (start, end) = sel.ordered();
    let backward = start != sel.anchor;
    let mut scratch = Scratch {
        doc: editor.doc().clone(),
        selection: Selection::new(start.clone(), end.clone()),
        ops: Vec::new(),
    };

    let end_len = scratch
        .text_len(&end.path)
        .ok_or_else(|| "Selection end is not in a text node".to_string())?;
    if end.offset > 0 && end.offset < end_len {
        scratch.push(Op::SplitText {
            path: end.path.clone(),
            offset: end.offset,
        })?;
    }

    let start_len = scratch
        .text_len(&start.path)
        .ok_or_else(|| "Selection start is not in a text node".to_string())?;
    if start.offset > 0 && start.offset < start_len {
        scratch.push(Op::SplitText {
            path: start.path.clone(),
            offset: start.offset,
        })?;
    }

    let Selection {
        anchor: range_start,
        focus: range_end,
    } = scratch.selection.clone();
    let targets: Vec<(Vec<usize>, Marks)> = covered_leaves(&scratch.doc, &range_start, &range_end)
        .into_iter()
        .map(|(path, leaf)| (path, leaf.marks.clone()))
        .collect();
    for (path, marks) in targets {
        let next = apply(marks.clone());
        if next != marks {
            scratch.push(Op::SetTextMarks { path, marks: next })?;
        }
    }

    let selection_after = if backward {
        Selection::new(range_end, range_start)
    } else {
        Selection::new(range_start, range_end)
    };
    Ok((scratch.ops, selection_after))
}

/// Give the caret its own empty leaf carrying the new marks.
fn mark_at_caret(
    editor: &Editor,
    apply: &dyn Fn(Marks) -> Marks,
) -> Result<(Vec<Op>, Selection), String> {
    let focus = editor.selection().focus.clone();
    let Some(Node::Text(text)) = node_ref(editor.doc(), &focus.path) else {
        return Err("Selection is not in a text node".into());
    };
    let marks_after = apply(text.marks.clone());
    if marks_after == text.marks {
        return Ok((Vec::new(), editor.selection().clone()));
    }
    if text.text.is_empty() {
        return Ok((
            vec![Op::SetTextMarks {
                path: focus.path.clone(),
                marks: marks_after,
            }],
            Selection::collapsed(focus),
        ));
    }

    let block_path = parent_path(&focus.path).to_vec();
    let child_ix = focus.path.last().copied().unwrap_or_default();
    let cursor = clamp_to_char_boundary(&text.text, focus.offset);

    let mut ops: Vec<Op> = Vec::new();
    let caret_ix = if cursor == 0 {
        child_ix
    } else if cursor == text.text.len() {
        child_ix + 1
    } else {
        ops.push(Op::SplitText {
            path: focus.path.clone(),
            offset: cursor,
        });
        child_ix + 1
    };

    let mut caret_path = block_path;
    caret_path.push(caret_ix);
    ops.push(Op::InsertNode {
        path: caret_path.clone(),
        node: Node::text("", marks_after),
    });
    Ok((ops, Selection::collapsed(Point::new(caret_path, 0))))
}
