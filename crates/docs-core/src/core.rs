use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ApplyError, CommandError, PathError, QueryError};
use crate::ops::{Op, Path, Transaction};
use crate::plugin::PluginRegistry;
use crate::tree::{insert_node, node_mut, node_ref, node_text_mut, remove_node, resolve_point};

pub type Attrs = BTreeMap<String, serde_json::Value>;
pub type ElementKind = String;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Document {
    #[serde(default)]
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum Node {
    Element(ElementNode),
    Text(TextNode),
    Void(VoidNode),
}

impl Node {
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::text_block("paragraph", Attrs::default(), text)
    }

    pub fn heading(level: u64, text: impl Into<String>) -> Self {
        let mut attrs = Attrs::default();
        attrs.insert("level".to_string(), Value::from(level.clamp(1, 6)));
        Self::text_block("heading", attrs, text)
    }

    pub fn text(text: impl Into<String>, marks: Marks) -> Self {
        Node::Text(TextNode {
            text: text.into(),
            marks,
        })
    }

    pub fn image(src: impl Into<String>, alt: Option<String>) -> Self {
        let mut attrs = Attrs::default();
        attrs.insert("src".to_string(), Value::String(src.into()));
        if let Some(alt) = alt {
            attrs.insert("alt".to_string(), Value::String(alt));
        }
        Node::Void(VoidNode {
            kind: "image".to_string(),
            attrs,
        })
    }

    fn text_block(kind: &str, attrs: Attrs, text: impl Into<String>) -> Self {
        Node::Element(ElementNode {
            kind: kind.to_string(),
            attrs,
            children: vec![Node::text(text, Marks::default())],
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementNode {
    pub kind: ElementKind,
    #[serde(default)]
    pub attrs: Attrs,
    #[serde(default)]
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoidNode {
    pub kind: ElementKind,
    #[serde(default)]
    pub attrs: Attrs,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextNode {
    pub text: String,
    #[serde(default)]
    pub marks: Marks,
}

/// Character-level formatting carried by a text leaf.
///
/// `font_size` keeps its unit suffix (`"18px"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Marks {
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub underline: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
}

impl Marks {
    pub fn is_plain(&self) -> bool {
        self == &Marks::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    #[serde(default)]
    pub path: Path,
    pub offset: usize,
}

impl Point {
    pub fn new(path: Path, offset: usize) -> Self {
        Self { path, offset }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub anchor: Point,
    pub focus: Point,
}

impl Selection {
    pub fn new(anchor: Point, focus: Point) -> Self {
        Self { anchor, focus }
    }

    pub fn collapsed(point: Point) -> Self {
        Self {
            anchor: point.clone(),
            focus: point,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    /// Anchor and focus in document order.
    pub fn ordered(&self) -> (Point, Point) {
        let (start, end) = (&self.anchor, &self.focus);
        let swap = if start.path == end.path {
            end.offset < start.offset
        } else {
            end.path < start.path
        };
        if swap {
            (end.clone(), start.clone())
        } else {
            (start.clone(), end.clone())
        }
    }
}

/// What kind of state an editor mutation touched. Listeners receive one merged change per
/// `EditorHandle::update`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Change {
    pub document: bool,
    pub selection: bool,
    pub view: bool,
}

impl Change {
    pub fn is_empty(&self) -> bool {
        !(self.document || self.selection || self.view)
    }

    pub fn merge(&mut self, other: Change) {
        self.document |= other.document;
        self.selection |= other.selection;
        self.view |= other.view;
    }
}

#[derive(Debug, Clone)]
pub struct UndoRecord {
    pub inverse_ops: Vec<Op>,
    pub selection_before: Selection,
    pub selection_after: Selection,
}

#[derive(Debug, Default)]
pub struct EditorConfig {
    pub max_undo: usize,
    pub max_normalize_iterations: usize,
}

impl EditorConfig {
    fn with_defaults(mut self) -> Self {
        if self.max_undo == 0 {
            self.max_undo = 200;
        }
        if self.max_normalize_iterations == 0 {
            self.max_normalize_iterations = 100;
        }
        self
    }
}

/// Saved editor state used to roll back a failed command chain.
pub(crate) struct Checkpoint {
    doc: Document,
    selection: Selection,
    undo_stack: Vec<UndoRecord>,
    redo_stack: Vec<UndoRecord>,
    spellcheck: bool,
}

pub struct Editor {
    doc: Document,
    selection: Selection,
    registry: PluginRegistry,
    config: EditorConfig,
    undo_stack: Vec<UndoRecord>,
    redo_stack: Vec<UndoRecord>,
    focused: bool,
    spellcheck: bool,
    pending: Change,
}

impl Editor {
    pub fn new(doc: Document, selection: Selection, registry: PluginRegistry) -> Self {
        Self::with_config(doc, selection, registry, EditorConfig::default())
    }

    pub fn with_config(
        doc: Document,
        selection: Selection,
        registry: PluginRegistry,
        config: EditorConfig,
    ) -> Self {
        let mut editor = Self {
            doc,
            selection,
            registry,
            config: config.with_defaults(),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            focused: false,
            spellcheck: true,
            pending: Change::default(),
        };
        editor.normalize_in_place();
        editor.pending = Change::default();
        editor
    }

    pub fn with_core_plugins() -> Self {
        Self::new(
            Document {
                children: vec![Node::paragraph("")],
            },
            Selection::collapsed(Point::new(vec![0, 0], 0)),
            PluginRegistry::core(),
        )
    }

    pub fn with_richtext_plugins() -> Self {
        Self::new(
            Document {
                children: vec![Node::paragraph("")],
            },
            Selection::collapsed(Point::new(vec![0, 0], 0)),
            PluginRegistry::richtext(),
        )
    }

    pub fn doc(&self) -> &Document {
        &self.doc
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn set_selection(&mut self, selection: Selection) {
        let before = self.selection.clone();
        self.selection = selection;
        self.normalize_selection_in_place();
        if self.selection != before {
            self.pending.selection = true;
        }
    }

    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn focus(&mut self) {
        if !self.focused {
            self.focused = true;
            self.pending.view = true;
        }
    }

    pub fn blur(&mut self) {
        if self.focused {
            self.focused = false;
            self.pending.view = true;
        }
    }

    pub fn spellcheck(&self) -> bool {
        self.spellcheck
    }

    pub fn set_spellcheck(&mut self, enabled: bool) {
        if self.spellcheck != enabled {
            self.spellcheck = enabled;
            self.pending.view = true;
        }
    }

    /// Drain the change accumulated since the last call.
    pub fn take_change(&mut self) -> Option<Change> {
        let change = std::mem::take(&mut self.pending);
        (!change.is_empty()).then_some(change)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo(&mut self) -> bool {
        let Some(record) = self.undo_stack.pop() else {
            return false;
        };
        let inverse = self.replay(record.inverse_ops);
        self.selection = record.selection_before.clone();
        self.normalize_in_place();
        self.redo_stack.push(UndoRecord {
            inverse_ops: inverse,
            selection_before: record.selection_before,
            selection_after: record.selection_after,
        });
        self.pending.document = true;
        self.pending.selection = true;
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(record) = self.redo_stack.pop() else {
            return false;
        };
        let inverse = self.replay(record.inverse_ops);
        self.selection = record.selection_after.clone();
        self.normalize_in_place();
        self.undo_stack.push(UndoRecord {
            inverse_ops: inverse,
            selection_before: record.selection_before,
            selection_after: record.selection_after,
        });
        self.pending.document = true;
        self.pending.selection = true;
        true
    }

    fn replay(&mut self, ops: Vec<Op>) -> Vec<Op> {
        let mut inverse: Vec<Op> = Vec::new();
        for op in ops {
            match self.apply_op(op) {
                Ok(inv) => inverse.push(inv),
                Err(err) => {
                    tracing::warn!(%err, "history replay stopped early");
                    break;
                }
            }
        }
        inverse.reverse();
        inverse
    }

    pub fn apply(&mut self, tx: Transaction) -> Result<(), ApplyError> {
        if tx.is_empty() {
            return Ok(());
        }

        let selection_before = self.selection.clone();
        let mut inverse_ops: Vec<Op> = Vec::new();
        for op in tx.ops.iter().cloned() {
            let inv = self.apply_op(op)?;
            inverse_ops.push(inv);
        }

        if let Some(sel) = tx.selection_after {
            self.selection = sel;
        }

        let mut inverse_normalize = self.normalize_with_inverse_ops()?;
        inverse_ops.append(&mut inverse_normalize);
        inverse_ops.reverse();

        self.normalize_selection_in_place();
        let selection_after = self.selection.clone();

        if !inverse_ops.is_empty() {
            self.pending.document = true;
            self.undo_stack.push(UndoRecord {
                inverse_ops,
                selection_before: selection_before.clone(),
                selection_after: selection_after.clone(),
            });
            self.redo_stack.clear();
            if self.undo_stack.len() > self.config.max_undo {
                self.undo_stack.remove(0);
            }
        }
        if selection_after != selection_before {
            self.pending.selection = true;
        }

        tracing::trace!(source = ?tx.meta.source, "transaction applied");
        Ok(())
    }

    pub fn run_command(&mut self, id: &str, args: Option<Value>) -> Result<(), CommandError> {
        let Some(command) = self.registry.command(id) else {
            return Err(CommandError::new(format!("Unknown command: {id}")));
        };
        (command.handler)(self, args)
    }

    pub fn run_query_json(&self, id: &str, args: Option<Value>) -> Result<Value, QueryError> {
        let Some(query) = self.registry.query(id) else {
            return Err(QueryError::new(format!("Unknown query: {id}")));
        };
        (query.handler)(self, args)
    }

    pub fn run_query<T>(&self, id: &str, args: Option<Value>) -> Result<T, QueryError>
    where
        T: DeserializeOwned,
    {
        let value = self.run_query_json(id, args)?;
        serde_json::from_value(value)
            .map_err(|err| QueryError::new(format!("Failed to decode query result: {err}")))
    }

    pub(crate) fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            doc: self.doc.clone(),
            selection: self.selection.clone(),
            undo_stack: self.undo_stack.clone(),
            redo_stack: self.redo_stack.clone(),
            spellcheck: self.spellcheck,
        }
    }

    pub(crate) fn restore(&mut self, checkpoint: Checkpoint) {
        let Checkpoint {
            doc,
            selection,
            undo_stack,
            redo_stack,
            spellcheck,
        } = checkpoint;
        self.pending.document |= self.doc != doc;
        self.pending.selection |= self.selection != selection;
        self.pending.view |= self.spellcheck != spellcheck;
        self.spellcheck = spellcheck;
        self.doc = doc;
        self.selection = selection;
        self.undo_stack = undo_stack;
        self.redo_stack = redo_stack;
    }

    /// Run `f` and throw away everything it did, reporting only whether it succeeded.
    pub(crate) fn dry_run(&mut self, f: impl FnOnce(&mut Editor) -> bool) -> bool {
        let checkpoint = self.checkpoint();
        let pending = self.pending;
        let focused = self.focused;
        let ok = f(self);
        self.restore(checkpoint);
        self.pending = pending;
        self.focused = focused;
        ok
    }

    /// Fold every history entry pushed since `checkpoint` into a single entry so a chain
    /// undoes in one step.
    pub(crate) fn squash_history_since(&mut self, checkpoint: &Checkpoint) {
        let base = checkpoint.undo_stack.len();
        if self.undo_stack.len() <= base + 1 {
            return;
        }
        let records = self.undo_stack.split_off(base);
        let selection_before = records[0].selection_before.clone();
        let selection_after = records[records.len() - 1].selection_after.clone();
        let inverse_ops = records
            .into_iter()
            .rev()
            .flat_map(|record| record.inverse_ops)
            .collect();
        self.undo_stack.push(UndoRecord {
            inverse_ops,
            selection_before,
            selection_after,
        });
    }

    fn normalize_in_place(&mut self) {
        if let Err(err) = self.normalize_with_inverse_ops() {
            tracing::warn!(%err, "document normalization failed");
        }
        self.normalize_selection_in_place();
    }

    fn normalize_selection_in_place(&mut self) {
        let fallback = Point::new(vec![0, 0], 0);
        let anchor = resolve_point(&self.doc, &self.selection.anchor)
            .or_else(|| resolve_point(&self.doc, &self.selection.focus))
            .unwrap_or(fallback);
        let focus =
            resolve_point(&self.doc, &self.selection.focus).unwrap_or_else(|| anchor.clone());
        self.selection = Selection { anchor, focus };
    }

    fn normalize_with_inverse_ops(&mut self) -> Result<Vec<Op>, ApplyError> {
        let mut inverse_ops: Vec<Op> = Vec::new();
        for _ in 0..self.config.max_normalize_iterations {
            let ops = self.registry.normalize(&self.doc);
            if ops.is_empty() {
                return Ok(inverse_ops);
            }
            for op in ops {
                let inv = self.apply_op(op)?;
                inverse_ops.push(inv);
            }
        }
        Err(ApplyError::NormalizeDidNotConverge)
    }

    fn apply_op(&mut self, op: Op) -> Result<Op, ApplyError> {
        apply_op_to(&mut self.doc, &mut self.selection, op)
    }
}

pub(crate) fn apply_op_to(
    doc: &mut Document,
    selection: &mut Selection,
    op: Op,
) -> Result<Op, ApplyError> {
    match op {
        Op::InsertText { path, offset, text } => {
            let text_node = node_text_mut(doc, &path)?;
            let offset = clamp_to_char_boundary(&text_node.text, offset);
            text_node.text.insert_str(offset, &text);
            transform_selection_insert_text(selection, &path, offset, text.len());
            Ok(Op::RemoveText {
                path,
                range: offset..offset + text.len(),
            })
        }
        Op::RemoveText { path, range } => {
            let text_node = node_text_mut(doc, &path)?;
            let start = clamp_to_char_boundary(&text_node.text, range.start);
            let end = clamp_to_char_boundary(&text_node.text, range.end);
            if start >= end {
                return Ok(Op::InsertText {
                    path,
                    offset: start,
                    text: String::new(),
                });
            }
            let removed = text_node.text[start..end].to_string();
            text_node.text.replace_range(start..end, "");
            transform_selection_remove_text(selection, &path, start..end);
            Ok(Op::InsertText {
                path,
                offset: start,
                text: removed,
            })
        }
        Op::InsertNode { path, node } => {
            insert_node(doc, &path, node)?;
            shift_siblings(selection, &path, 1);
            Ok(Op::RemoveNode { path })
        }
        Op::RemoveNode { path } => {
            let removed = remove_node(doc, &path)?;
            transform_selection_remove_node(selection, &path, doc);
            Ok(Op::InsertNode {
                path,
                node: removed,
            })
        }
        Op::SetNodeAttrs { path, patch } => {
            let old = match node_mut(doc, &path)? {
                Node::Element(el) => patch_apply(&mut el.attrs, &patch),
                Node::Void(v) => patch_apply(&mut v.attrs, &patch),
                Node::Text(_) => return Err(ApplyError::InvalidPath("Text has no attrs".into())),
            };
            Ok(Op::SetNodeAttrs { path, patch: old })
        }
        Op::SetNodeKind { path, kind } => {
            let old = match node_mut(doc, &path)? {
                Node::Element(el) => std::mem::replace(&mut el.kind, kind),
                Node::Void(v) => std::mem::replace(&mut v.kind, kind),
                Node::Text(_) => return Err(ApplyError::InvalidPath("Text has no kind".into())),
            };
            Ok(Op::SetNodeKind { path, kind: old })
        }
        Op::SetTextMarks { path, marks } => {
            let text_node = node_text_mut(doc, &path)?;
            let old = std::mem::replace(&mut text_node.marks, marks);
            Ok(Op::SetTextMarks { path, marks: old })
        }
        Op::SplitText { path, offset } => {
            let (parent, ix) = split_child_path(&path)?;
            let text_node = node_text_mut(doc, &path)?;
            let offset = clamp_to_char_boundary(&text_node.text, offset);
            let right = Node::Text(TextNode {
                text: text_node.text.split_off(offset),
                marks: text_node.marks.clone(),
            });
            let mut right_path = parent.to_vec();
            right_path.push(ix + 1);
            insert_node(doc, &right_path, right)?;
            transform_selection_split(selection, &path, offset);
            Ok(Op::MergeText { path: right_path })
        }
        Op::MergeText { path } => {
            let (parent, ix) = split_child_path(&path)?;
            if ix == 0 {
                return Err(ApplyError::InvalidOp("Cannot merge the first child".into()));
            }
            let mut left_path = parent.to_vec();
            left_path.push(ix - 1);
            match (node_ref(doc, &left_path), node_ref(doc, &path)) {
                (Some(Node::Text(left)), Some(Node::Text(right))) if left.marks == right.marks => {}
                _ => {
                    return Err(ApplyError::InvalidOp(
                        "Merge requires adjacent text leaves with equal marks".into(),
                    ));
                }
            }
            let Node::Text(right) = remove_node(doc, &path)? else {
                return Err(ApplyError::InvalidOp("Expected text leaf".into()));
            };
            let left = node_text_mut(doc, &left_path)?;
            let left_len = left.text.len();
            left.text.push_str(&right.text);
            transform_selection_merge(selection, &path, left_len);
            Ok(Op::SplitText {
                path: left_path,
                offset: left_len,
            })
        }
    }
}

fn split_child_path(path: &[usize]) -> Result<(&[usize], usize), PathError> {
    match path.split_last() {
        Some((ix, parent)) if !parent.is_empty() => Ok((parent, *ix)),
        _ => Err(PathError("Expected a path to an inline child".into())),
    }
}

pub(crate) fn clamp_to_char_boundary(s: &str, mut ix: usize) -> usize {
    ix = ix.min(s.len());
    while ix > 0 && !s.is_char_boundary(ix) {
        ix -= 1;
    }
    ix
}

fn points_mut(selection: &mut Selection) -> [&mut Point; 2] {
    [&mut selection.anchor, &mut selection.focus]
}

fn transform_selection_insert_text(
    selection: &mut Selection,
    path: &[usize],
    offset: usize,
    len: usize,
) {
    for point in points_mut(selection) {
        if point.path == path && point.offset >= offset {
            point.offset = point.offset.saturating_add(len);
        }
    }
}

fn transform_selection_remove_text(
    selection: &mut Selection,
    path: &[usize],
    range: std::ops::Range<usize>,
) {
    let removed_len = range.end.saturating_sub(range.start);
    for point in points_mut(selection) {
        if point.path != path || point.offset <= range.start {
            continue;
        }
        if point.offset >= range.end {
            point.offset -= removed_len;
        } else {
            point.offset = range.start;
        }
    }
}

/// Move every point that sits at or after `path` among its siblings by `delta`.
fn shift_siblings(selection: &mut Selection, path: &[usize], delta: isize) {
    let Some((&index, parent)) = path.split_last() else {
        return;
    };
    let depth = parent.len();
    for point in points_mut(selection) {
        if point.path.len() <= depth || !point.path.starts_with(parent) {
            continue;
        }
        if point.path[depth] >= index {
            point.path[depth] = point.path[depth].saturating_add_signed(delta);
        }
    }
}

fn transform_selection_remove_node(
    selection: &mut Selection,
    path: &[usize],
    doc_after_remove: &Document,
) {
    let Some((&index, parent)) = path.split_last() else {
        return;
    };
    let depth = parent.len();
    for point in points_mut(selection) {
        if point.path.len() <= depth || !point.path.starts_with(parent) {
            continue;
        }
        let ix = point.path[depth];
        if ix > index {
            point.path[depth] = ix - 1;
            continue;
        }
        if ix < index {
            continue;
        }

        // The point was inside the removed subtree: park it at the end of the previous
        // sibling, or at the start of whatever now occupies the slot.
        point.path.truncate(depth + 1);
        match index.checked_sub(1) {
            Some(left) => {
                point.path[depth] = left;
                point.offset = match node_ref(doc_after_remove, &point.path) {
                    Some(Node::Text(t)) => t.text.len(),
                    _ => 0,
                };
            }
            None => point.offset = 0,
        }
    }
}

fn transform_selection_split(selection: &mut Selection, path: &[usize], offset: usize) {
    let Some((&index, parent)) = path.split_last() else {
        return;
    };
    let depth = parent.len();
    for point in points_mut(selection) {
        if point.path.as_slice() == path {
            if point.offset > offset {
                point.path[depth] = index + 1;
                point.offset -= offset;
            }
            continue;
        }
        if point.path.len() > depth && point.path.starts_with(parent) && point.path[depth] > index
        {
            point.path[depth] += 1;
        }
    }
}

fn transform_selection_merge(selection: &mut Selection, path: &[usize], left_len: usize) {
    let Some((&index, parent)) = path.split_last() else {
        return;
    };
    let depth = parent.len();
    for point in points_mut(selection) {
        if point.path.as_slice() == path {
            point.path[depth] = index - 1;
            point.offset += left_len;
            continue;
        }
        if point.path.len() > depth && point.path.starts_with(parent) && point.path[depth] > index
        {
            point.path[depth] -= 1;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttrPatch {
    #[serde(default)]
    pub set: Attrs,
    #[serde(default)]
    pub remove: Vec<String>,
}

impl AttrPatch {
    pub fn set(key: impl Into<String>, value: Value) -> Self {
        let mut set = Attrs::default();
        set.insert(key.into(), value);
        Self {
            set,
            remove: Vec::new(),
        }
    }

    pub fn remove(key: impl Into<String>) -> Self {
        Self {
            set: Attrs::default(),
            remove: vec![key.into()],
        }
    }
}

fn patch_apply(attrs: &mut Attrs, patch: &AttrPatch) -> AttrPatch {
    let mut old_set: Attrs = Attrs::new();
    let mut old_remove: Vec<String> = Vec::new();

    for (k, v) in &patch.set {
        if let Some(prev) = attrs.insert(k.clone(), v.clone()) {
            old_set.insert(k.clone(), prev);
        } else {
            old_remove.push(k.clone());
        }
    }

    for key in &patch.remove {
        if let Some(prev) = attrs.remove(key) {
            old_set.insert(key.clone(), prev);
        }
    }

    AttrPatch {
        set: old_set,
        remove: old_remove,
    }
}
