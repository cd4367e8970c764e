use serde_json::Value;

use crate::core::{Attrs, Editor, ElementNode, Marks, Node};
use crate::tree::{covered_leaves, focus_block, focus_leaf, node_ref, selected_text_blocks};

impl Editor {
    /// Whether a mark or block type is active at the current selection.
    ///
    /// Marks (`bold`, `italic`, `underline`, `link`) must cover every non-empty leaf of a range
    /// selection; a caret reads the leaf it sits in. Block names (`paragraph`, `heading`,
    /// `bulletList`, `orderedList`, `taskList`, `textAlign`) must hold for every selected block,
    /// and `attrs` narrows the match (`{"level": 2}`, `{"textAlign": "center"}`).
    pub fn is_active(&self, name: &str, attrs: Option<&Value>) -> bool {
        match name {
            "bold" => self.mark_active(|m| m.bold),
            "italic" => self.mark_active(|m| m.italic),
            "underline" => self.mark_active(|m| m.underline),
            "link" => self.mark_active(|m| m.link.is_some()),
            "paragraph" => self.blocks_active(|el| el.kind == "paragraph"),
            "heading" => {
                let level = attrs.and_then(|a| a.get("level")).and_then(|v| v.as_u64());
                self.blocks_active(|el| {
                    el.kind == "heading"
                        && level.is_none_or(|level| heading_level(el) == Some(level))
                })
            }
            "bulletList" => self.blocks_active(|el| list_type(el) == Some("bulleted")),
            "orderedList" => self.blocks_active(|el| list_type(el) == Some("ordered")),
            "taskList" => self.blocks_active(|el| el.kind == "task_item"),
            "textAlign" => {
                let Some(wanted) = attrs.and_then(|a| a.get("textAlign")).and_then(|v| v.as_str())
                else {
                    return false;
                };
                self.blocks_active(|el| block_align(el) == wanted)
            }
            _ => {
                tracing::debug!(name, "is_active probed with an unknown name");
                false
            }
        }
    }

    /// Attributes of a mark or of the focused block.
    ///
    /// `textStyle` yields `fontFamily`, `fontSize` and `color`; `highlight` yields `color`;
    /// `link` yields `href`; `paragraph`, `heading` and `block` yield the focused block's attrs.
    /// Unset attributes are simply missing from the map.
    pub fn get_attributes(&self, name: &str) -> Attrs {
        let marks = focus_leaf(self.doc(), self.selection())
            .map(|t| t.marks.clone())
            .unwrap_or_default();
        let mut out = Attrs::new();
        match name {
            "textStyle" => {
                put(&mut out, "fontFamily", &marks.font_family);
                put(&mut out, "fontSize", &marks.font_size);
                put(&mut out, "color", &marks.text_color);
            }
            "highlight" => put(&mut out, "color", &marks.highlight_color),
            "link" => put(&mut out, "href", &marks.link),
            "paragraph" | "heading" | "block" => {
                if let Some((_, el)) = focus_block(self.doc(), self.selection()) {
                    out = el.attrs.clone();
                }
            }
            _ => tracing::debug!(name, "get_attributes probed with an unknown name"),
        }
        out
    }

    fn mark_active(&self, get: impl Fn(&Marks) -> bool) -> bool {
        let selection = self.selection();
        if !selection.is_collapsed() {
            let (start, end) = selection.ordered();
            let leaves = covered_leaves(self.doc(), &start, &end);
            if !leaves.is_empty() {
                return leaves.iter().all(|(_, leaf)| get(&leaf.marks));
            }
        }
        focus_leaf(self.doc(), selection).is_some_and(|leaf| get(&leaf.marks))
    }

    fn blocks_active(&self, matches: impl Fn(&ElementNode) -> bool) -> bool {
        let blocks = selected_text_blocks(self.doc(), self.selection());
        !blocks.is_empty()
            && blocks.iter().all(|path| match node_ref(self.doc(), path) {
                Some(Node::Element(el)) => matches(el),
                _ => false,
            })
    }
}

fn put(out: &mut Attrs, key: &str, value: &Option<String>) {
    if let Some(value) = value {
        out.insert(key.to_string(), Value::String(value.clone()));
    }
}

fn heading_level(el: &ElementNode) -> Option<u64> {
    el.attrs.get("level").and_then(|v| v.as_u64())
}

fn list_type(el: &ElementNode) -> Option<&str> {
    if el.kind != "list_item" {
        return None;
    }
    el.attrs.get("list_type").and_then(|v| v.as_str())
}

fn block_align(el: &ElementNode) -> &str {
    el.attrs
        .get("align")
        .and_then(|v| v.as_str())
        .unwrap_or("left")
}
