use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::blocks::{
    AlignPlugin, HeadingPlugin, ImagePlugin, LineHeightPlugin, ListPlugin, TaskListPlugin,
};
use crate::core::{Document, Editor, Marks, Node, TextNode};
use crate::error::{CommandError, QueryError};
use crate::marks::MarksPlugin;
use crate::ops::{Op, Transaction};

type CommandHandler = dyn Fn(&mut Editor, Option<Value>) -> Result<(), CommandError> + Send + Sync;
type QueryHandler = dyn Fn(&Editor, Option<Value>) -> Result<Value, QueryError> + Send + Sync;

#[derive(Clone)]
pub struct CommandSpec {
    pub id: String,
    pub handler: Arc<CommandHandler>,
}

impl CommandSpec {
    pub fn new(
        id: impl Into<String>,
        handler: impl Fn(&mut Editor, Option<Value>) -> Result<(), CommandError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            handler: Arc::new(handler),
        }
    }
}

#[derive(Clone)]
pub struct QuerySpec {
    pub id: String,
    pub handler: Arc<QueryHandler>,
}

impl QuerySpec {
    pub fn new(
        id: impl Into<String>,
        handler: impl Fn(&Editor, Option<Value>) -> Result<Value, QueryError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            handler: Arc::new(handler),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeRole {
    Block,
    Inline,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChildConstraint {
    None,
    BlockOnly,
    InlineOnly,
    Any,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub kind: String,
    pub role: NodeRole,
    pub is_void: bool,
    pub children: ChildConstraint,
}

impl NodeSpec {
    pub fn text_block(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            role: NodeRole::Block,
            is_void: false,
            children: ChildConstraint::InlineOnly,
        }
    }

    pub fn void_block(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            role: NodeRole::Block,
            is_void: true,
            children: ChildConstraint::None,
        }
    }
}

pub trait NormalizePass: Send + Sync {
    fn id(&self) -> &'static str;
    fn run(&self, doc: &Document, registry: &PluginRegistry) -> Vec<Op>;
}

pub trait DocsPlugin: Send + Sync {
    fn id(&self) -> &'static str;
    fn node_specs(&self) -> Vec<NodeSpec> {
        Vec::new()
    }
    fn normalize_passes(&self) -> Vec<Box<dyn NormalizePass>> {
        Vec::new()
    }
    fn commands(&self) -> Vec<CommandSpec> {
        Vec::new()
    }
    fn queries(&self) -> Vec<QuerySpec> {
        Vec::new()
    }
}

#[derive(Default)]
pub struct PluginRegistry {
    node_specs: HashMap<String, NodeSpec>,
    normalize_passes: Vec<Box<dyn NormalizePass>>,
    commands: HashMap<String, CommandSpec>,
    queries: HashMap<String, QuerySpec>,
}

impl PluginRegistry {
    pub fn new(plugins: impl IntoIterator<Item = Box<dyn DocsPlugin>>) -> Result<Self, String> {
        let mut registry = Self::default();
        for plugin in plugins {
            registry.register_plugin(plugin)?;
        }
        Ok(registry)
    }

    pub fn core() -> Self {
        let plugins: Vec<Box<dyn DocsPlugin>> = vec![
            Box::new(CoreParagraphPlugin),
            Box::new(CoreNormalizePlugin),
            Box::new(HistoryPlugin),
            Box::new(ViewPlugin),
        ];
        Self::new(plugins).expect("core registry must be valid")
    }

    pub fn richtext() -> Self {
        let plugins: Vec<Box<dyn DocsPlugin>> = vec![
            Box::new(CoreParagraphPlugin),
            Box::new(CoreNormalizePlugin),
            Box::new(HistoryPlugin),
            Box::new(ViewPlugin),
            Box::new(MarksPlugin),
            Box::new(HeadingPlugin),
            Box::new(AlignPlugin),
            Box::new(LineHeightPlugin),
            Box::new(ListPlugin),
            Box::new(TaskListPlugin),
            Box::new(ImagePlugin),
        ];
        Self::new(plugins).expect("richtext registry must be valid")
    }

    pub fn register_plugin(&mut self, plugin: Box<dyn DocsPlugin>) -> Result<(), String> {
        for spec in plugin.node_specs() {
            if self.node_specs.contains_key(&spec.kind) {
                return Err(format!("Duplicate node spec kind: {}", spec.kind));
            }
            self.node_specs.insert(spec.kind.clone(), spec);
        }

        self.normalize_passes.extend(plugin.normalize_passes());

        for cmd in plugin.commands() {
            if self.commands.contains_key(&cmd.id) {
                return Err(format!("Duplicate command id: {}", cmd.id));
            }
            self.commands.insert(cmd.id.clone(), cmd);
        }

        for query in plugin.queries() {
            if self.queries.contains_key(&query.id) {
                return Err(format!("Duplicate query id: {}", query.id));
            }
            self.queries.insert(query.id.clone(), query);
        }

        tracing::debug!(plugin = plugin.id(), "plugin registered");
        Ok(())
    }

    pub fn command(&self, id: &str) -> Option<CommandSpec> {
        self.commands.get(id).cloned()
    }

    pub fn query(&self, id: &str) -> Option<QuerySpec> {
        self.queries.get(id).cloned()
    }

    pub fn normalize(&self, doc: &Document) -> Vec<Op> {
        let mut ops: Vec<Op> = Vec::new();
        for pass in &self.normalize_passes {
            ops.extend(pass.run(doc, self));
            if !ops.is_empty() {
                // Later passes see a stale tree once ops are queued.
                break;
            }
        }
        ops
    }

    fn holds_inline(&self, kind: &str) -> bool {
        self.node_specs
            .get(kind)
            .is_some_and(|spec| spec.children == ChildConstraint::InlineOnly)
    }
}

/// Read a required string argument out of a command's JSON args.
pub(crate) fn string_arg(args: Option<&Value>, key: &str) -> Result<String, CommandError> {
    args.and_then(|v| v.get(key))
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or_else(|| CommandError::new(format!("Missing args.{key}")))
}

/// Apply a transaction built by a command helper, folding both failure kinds into one error.
pub(crate) fn apply_built(
    editor: &mut Editor,
    built: Result<Transaction, String>,
    what: &str,
) -> Result<(), CommandError> {
    let tx = built.map_err(CommandError::new)?;
    editor
        .apply(tx)
        .map_err(|e| CommandError::new(format!("Failed to {what}: {e}")))
}

struct CoreParagraphPlugin;

impl DocsPlugin for CoreParagraphPlugin {
    fn id(&self) -> &'static str {
        "core.paragraph"
    }

    fn node_specs(&self) -> Vec<NodeSpec> {
        vec![NodeSpec::text_block("paragraph")]
    }
}

struct CoreNormalizePlugin;

impl DocsPlugin for CoreNormalizePlugin {
    fn id(&self) -> &'static str {
        "core.normalize"
    }

    fn normalize_passes(&self) -> Vec<Box<dyn NormalizePass>> {
        vec![
            Box::new(EnsureNonEmptyDocument),
            Box::new(EnsureTextBlockHasLeaf),
            Box::new(MergeAdjacentTextLeaves),
        ]
    }
}

struct EnsureNonEmptyDocument;

impl NormalizePass for EnsureNonEmptyDocument {
    fn id(&self) -> &'static str {
        "core.ensure_non_empty_document"
    }

    fn run(&self, doc: &Document, _registry: &PluginRegistry) -> Vec<Op> {
        if doc.children.is_empty() {
            return vec![Op::InsertNode {
                path: vec![0],
                node: Node::paragraph(""),
            }];
        }
        Vec::new()
    }
}

struct EnsureTextBlockHasLeaf;

impl NormalizePass for EnsureTextBlockHasLeaf {
    fn id(&self) -> &'static str {
        "core.ensure_text_block_has_leaf"
    }

    fn run(&self, doc: &Document, registry: &PluginRegistry) -> Vec<Op> {
        fn walk(
            children: &[Node],
            path: &mut Vec<usize>,
            registry: &PluginRegistry,
            ops: &mut Vec<Op>,
        ) {
            for (ix, node) in children.iter().enumerate() {
                let Node::Element(el) = node else {
                    continue;
                };
                path.push(ix);
                if registry.holds_inline(&el.kind) || el.children.is_empty() {
                    if !el.children.iter().any(|n| matches!(n, Node::Text(_))) {
                        let mut insert_path = path.clone();
                        insert_path.push(0);
                        ops.push(Op::InsertNode {
                            path: insert_path,
                            node: Node::Text(TextNode {
                                text: String::new(),
                                marks: Marks::default(),
                            }),
                        });
                    }
                } else {
                    walk(&el.children, path, registry, ops);
                }
                path.pop();
            }
        }

        let mut ops = Vec::new();
        walk(&doc.children, &mut Vec::new(), registry, &mut ops);
        ops
    }
}

struct MergeAdjacentTextLeaves;

impl NormalizePass for MergeAdjacentTextLeaves {
    fn id(&self) -> &'static str {
        "core.merge_adjacent_text_leaves"
    }

    fn run(&self, doc: &Document, _registry: &PluginRegistry) -> Vec<Op> {
        fn walk(children: &[Node], path: &mut Vec<usize>, ops: &mut Vec<Op>) {
            for (ix, node) in children.iter().enumerate() {
                let Node::Element(el) = node else {
                    continue;
                };
                path.push(ix);

                // Right to left so earlier indices stay valid while merging.
                for right in (1..el.children.len()).rev() {
                    let (Node::Text(left), Node::Text(right_leaf)) =
                        (&el.children[right - 1], &el.children[right])
                    else {
                        continue;
                    };
                    if left.marks == right_leaf.marks {
                        let mut merge_path = path.clone();
                        merge_path.push(right);
                        ops.push(Op::MergeText { path: merge_path });
                    }
                }

                walk(&el.children, path, ops);
                path.pop();
            }
        }

        let mut ops = Vec::new();
        walk(&doc.children, &mut Vec::new(), &mut ops);
        ops
    }
}

struct HistoryPlugin;

impl DocsPlugin for HistoryPlugin {
    fn id(&self) -> &'static str {
        "core.history"
    }

    fn commands(&self) -> Vec<CommandSpec> {
        vec![
            CommandSpec::new("history.undo", |editor, _args| {
                if editor.undo() {
                    Ok(())
                } else {
                    Err(CommandError::new("Nothing to undo"))
                }
            }),
            CommandSpec::new("history.redo", |editor, _args| {
                if editor.redo() {
                    Ok(())
                } else {
                    Err(CommandError::new("Nothing to redo"))
                }
            }),
        ]
    }
}

struct ViewPlugin;

impl DocsPlugin for ViewPlugin {
    fn id(&self) -> &'static str {
        "core.view"
    }

    fn commands(&self) -> Vec<CommandSpec> {
        vec![
            CommandSpec::new("view.toggle_spellcheck", |editor, _args| {
                let enabled = !editor.spellcheck();
                editor.set_spellcheck(enabled);
                Ok(())
            }),
            CommandSpec::new("view.set_spellcheck", |editor, args| {
                let enabled = args
                    .as_ref()
                    .and_then(|v| v.get("enabled"))
                    .and_then(|v| v.as_bool())
                    .ok_or_else(|| CommandError::new("Missing args.enabled"))?;
                editor.set_spellcheck(enabled);
                Ok(())
            }),
        ]
    }

    fn queries(&self) -> Vec<QuerySpec> {
        vec![QuerySpec::new("view.spellcheck", |editor, _args| {
            Ok(Value::Bool(editor.spellcheck()))
        })]
    }
}
