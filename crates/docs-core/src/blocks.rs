use serde_json::Value;

use crate::core::{AttrPatch, Attrs, Editor, ElementNode, Node, Point, Selection};
use crate::error::CommandError;
use crate::ops::{Op, Path, Transaction};
use crate::plugin::{CommandSpec, DocsPlugin, NodeSpec, apply_built, string_arg};
use crate::tree::{node_ref, parent_path, selected_text_blocks};

pub const HEADING_LEVELS: std::ops::RangeInclusive<u64> = 1..=6;
pub const ALIGNMENTS: [&str; 4] = ["left", "center", "right", "justify"];

pub(crate) struct HeadingPlugin;

impl DocsPlugin for HeadingPlugin {
    fn id(&self) -> &'static str {
        "heading"
    }

    fn node_specs(&self) -> Vec<NodeSpec> {
        vec![NodeSpec::text_block("heading")]
    }

    fn commands(&self) -> Vec<CommandSpec> {
        vec![
            CommandSpec::new("block.set_heading", |editor, args| {
                let level = args
                    .as_ref()
                    .and_then(|v| v.get("level"))
                    .and_then(|v| v.as_u64())
                    .ok_or_else(|| CommandError::new("Missing args.level"))?;
                let tx = if level == 0 {
                    unset_heading(editor)
                } else if HEADING_LEVELS.contains(&level) {
                    set_heading(editor, level)
                } else {
                    return Err(CommandError::new(format!("Invalid heading level: {level}")));
                };
                apply_built(editor, tx, "set heading")
            }),
            CommandSpec::new("block.unset_heading", |editor, _args| {
                let tx = unset_heading(editor);
                apply_built(editor, tx, "unset heading")
            }),
        ]
    }
}

pub(crate) struct AlignPlugin;

impl DocsPlugin for AlignPlugin {
    fn id(&self) -> &'static str {
        "align"
    }

    fn commands(&self) -> Vec<CommandSpec> {
        vec![
            CommandSpec::new("block.set_align", |editor, args| {
                let align = string_arg(args.as_ref(), "align")?;
                if !ALIGNMENTS.contains(&align.as_str()) {
                    return Err(CommandError::new(format!("Invalid align value: {align}")));
                }
                let tx = patch_blocks(
                    editor,
                    None,
                    AttrPatch::set("align", Value::String(align)),
                    "command:block.set_align",
                );
                apply_built(editor, tx, "set alignment")
            }),
        ]
    }
}

pub(crate) struct LineHeightPlugin;

impl DocsPlugin for LineHeightPlugin {
    fn id(&self) -> &'static str {
        "line_height"
    }

    fn commands(&self) -> Vec<CommandSpec> {
        vec![
            CommandSpec::new("block.set_line_height", |editor, args| {
                let line_height = string_arg(args.as_ref(), "line_height")?;
                let patch = if line_height == "normal" {
                    AttrPatch::remove("line_height")
                } else {
                    line_height
                        .parse::<f64>()
                        .ok()
                        .filter(|v| *v > 0.0)
                        .ok_or_else(|| {
                            CommandError::new(format!("Invalid line height: {line_height}"))
                        })?;
                    AttrPatch::set("line_height", Value::String(line_height))
                };
                let tx = patch_blocks(editor, None, patch, "command:block.set_line_height");
                apply_built(editor, tx, "set line height")
            }),
        ]
    }
}

pub(crate) struct ListPlugin;

impl DocsPlugin for ListPlugin {
    fn id(&self) -> &'static str {
        "list"
    }

    fn node_specs(&self) -> Vec<NodeSpec> {
        vec![NodeSpec::text_block("list_item")]
    }

    fn commands(&self) -> Vec<CommandSpec> {
        vec![
            CommandSpec::new("list.toggle_bulleted", |editor, _args| {
                let tx = toggle_list(editor, "bulleted");
                apply_built(editor, tx, "toggle bulleted list")
            }),
            CommandSpec::new("list.toggle_ordered", |editor, _args| {
                let tx = toggle_list(editor, "ordered");
                apply_built(editor, tx, "toggle numbered list")
            }),
        ]
    }
}

pub(crate) struct TaskListPlugin;

impl DocsPlugin for TaskListPlugin {
    fn id(&self) -> &'static str {
        "task_list"
    }

    fn node_specs(&self) -> Vec<NodeSpec> {
        vec![NodeSpec::text_block("task_item")]
    }

    fn commands(&self) -> Vec<CommandSpec> {
        vec![
            CommandSpec::new("task.toggle", |editor, _args| {
                let tx = toggle_task_list(editor);
                apply_built(editor, tx, "toggle task list")
            }),
            CommandSpec::new("task.toggle_checked", |editor, _args| {
                let tx = toggle_task_checked(editor);
                apply_built(editor, tx, "toggle task checked")
            }),
        ]
    }
}

pub(crate) struct ImagePlugin;

impl DocsPlugin for ImagePlugin {
    fn id(&self) -> &'static str {
        "image"
    }

    fn node_specs(&self) -> Vec<NodeSpec> {
        vec![NodeSpec::void_block("image")]
    }

    fn commands(&self) -> Vec<CommandSpec> {
        vec![
            CommandSpec::new("image.insert", |editor, args| {
                let src = args
                    .as_ref()
                    .and_then(|v| v.get("src"))
                    .and_then(|v| v.as_str())
                    .map(|s| s.trim())
                    .filter(|s| !s.is_empty())
                    .ok_or_else(|| CommandError::new("Missing args.src"))?
                    .to_string();
                let alt = args
                    .as_ref()
                    .and_then(|v| v.get("alt"))
                    .and_then(|v| v.as_str())
                    .map(|s| s.to_string());
                let tx = insert_image(editor, src, alt);
                apply_built(editor, tx, "insert image")
            }),
        ]
    }
}

fn selected_elements(editor: &Editor) -> Result<Vec<(Path, ElementNode)>, String> {
    let blocks: Vec<(Path, ElementNode)> = selected_text_blocks(editor.doc(), editor.selection())
        .into_iter()
        .filter_map(|path| match node_ref(editor.doc(), &path) {
            Some(Node::Element(el)) => Some((path, el.clone())),
            _ => None,
        })
        .collect();
    if blocks.is_empty() {
        return Err("No active block".into());
    }
    Ok(blocks)
}

/// Retype every selected block and apply an attribute patch to it, skipping no-op changes.
fn patch_blocks(
    editor: &Editor,
    kind: Option<&str>,
    patch: AttrPatch,
    source: &'static str,
) -> Result<Transaction, String> {
    let mut ops: Vec<Op> = Vec::new();
    for (path, el) in selected_elements(editor)? {
        if let Some(kind) = kind
            && el.kind != kind
        {
            ops.push(Op::SetNodeKind {
                path: path.clone(),
                kind: kind.to_string(),
            });
        }
        let effective = effective_patch(&el.attrs, &patch);
        if !effective.set.is_empty() || !effective.remove.is_empty() {
            ops.push(Op::SetNodeAttrs {
                path,
                patch: effective,
            });
        }
    }
    Ok(Transaction::new(ops)
        .selection_after(editor.selection().clone())
        .source(source))
}

fn effective_patch(attrs: &Attrs, patch: &AttrPatch) -> AttrPatch {
    AttrPatch {
        set: patch
            .set
            .iter()
            .filter(|(k, v)| attrs.get(*k) != Some(*v))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
        remove: patch
            .remove
            .iter()
            .filter(|k| attrs.contains_key(*k))
            .cloned()
            .collect(),
    }
}

fn set_heading(editor: &Editor, level: u64) -> Result<Transaction, String> {
    let mut patch = AttrPatch::set("level", Value::from(level));
    patch.remove = vec!["list_type".to_string(), "checked".to_string()];
    patch_blocks(editor, Some("heading"), patch, "command:block.set_heading")
}

fn unset_heading(editor: &Editor) -> Result<Transaction, String> {
    let mut ops: Vec<Op> = Vec::new();
    for (path, el) in selected_elements(editor)? {
        if el.kind != "heading" {
            continue;
        }
        ops.push(Op::SetNodeKind {
            path: path.clone(),
            kind: "paragraph".to_string(),
        });
        ops.push(Op::SetNodeAttrs {
            path,
            patch: AttrPatch::remove("level"),
        });
    }
    Ok(Transaction::new(ops)
        .selection_after(editor.selection().clone())
        .source("command:block.unset_heading"))
}

fn list_type_of(el: &ElementNode) -> Option<&str> {
    (el.kind == "list_item")
        .then(|| el.attrs.get("list_type").and_then(|v| v.as_str()))
        .flatten()
}

fn toggle_list(editor: &Editor, list_type: &str) -> Result<Transaction, String> {
    let blocks = selected_elements(editor)?;
    let all_in_list = blocks
        .iter()
        .all(|(_, el)| list_type_of(el) == Some(list_type));
    let source = if list_type == "ordered" {
        "command:list.toggle_ordered"
    } else {
        "command:list.toggle_bulleted"
    };

    if all_in_list {
        return patch_blocks(
            editor,
            Some("paragraph"),
            AttrPatch::remove("list_type"),
            source,
        );
    }

    let mut patch = AttrPatch::set("list_type", Value::String(list_type.to_string()));
    patch.remove = vec!["level".to_string(), "checked".to_string()];
    patch_blocks(editor, Some("list_item"), patch, source)
}

fn toggle_task_list(editor: &Editor) -> Result<Transaction, String> {
    let blocks = selected_elements(editor)?;
    if blocks.iter().all(|(_, el)| el.kind == "task_item") {
        return patch_blocks(
            editor,
            Some("paragraph"),
            AttrPatch::remove("checked"),
            "command:task.toggle",
        );
    }

    let patch = AttrPatch {
        set: Attrs::default(),
        remove: vec!["level".to_string(), "list_type".to_string()],
    };
    let mut tx = patch_blocks(editor, Some("task_item"), patch, "command:task.toggle")?;
    for (path, el) in blocks {
        if !el.attrs.contains_key("checked") {
            tx.ops.push(Op::SetNodeAttrs {
                path,
                patch: AttrPatch::set("checked", Value::Bool(false)),
            });
        }
    }
    Ok(tx)
}

fn toggle_task_checked(editor: &Editor) -> Result<Transaction, String> {
    let mut ops: Vec<Op> = Vec::new();
    for (path, el) in selected_elements(editor)? {
        if el.kind != "task_item" {
            continue;
        }
        let checked = el
            .attrs
            .get("checked")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        ops.push(Op::SetNodeAttrs {
            path,
            patch: AttrPatch::set("checked", Value::Bool(!checked)),
        });
    }
    Ok(Transaction::new(ops)
        .selection_after(editor.selection().clone())
        .source("command:task.toggle_checked"))
}

fn insert_image(editor: &Editor, src: String, alt: Option<String>) -> Result<Transaction, String> {
    let focus = editor.selection().focus.clone();
    let block_path = parent_path(&focus.path);
    let Some((block_ix, parent)) = block_path.split_last() else {
        return Err("No active block".into());
    };

    let mut image_path = parent.to_vec();
    image_path.push(block_ix + 1);
    let mut paragraph_path = parent.to_vec();
    paragraph_path.push(block_ix + 2);
    let mut caret_path = paragraph_path.clone();
    caret_path.push(0);

    Ok(Transaction::new(vec![
        Op::InsertNode {
            path: image_path,
            node: Node::image(src, alt),
        },
        Op::InsertNode {
            path: paragraph_path,
            node: Node::paragraph(""),
        },
    ])
    .selection_after(Selection::collapsed(Point::new(caret_path, 0)))
    .source("command:image.insert"))
}
