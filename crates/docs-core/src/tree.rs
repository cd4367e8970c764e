use crate::core::{Document, ElementNode, Node, Point, Selection, TextNode};
use crate::error::PathError;
use crate::ops::Path;

pub fn node_ref<'a>(doc: &'a Document, path: &[usize]) -> Option<&'a Node> {
    let (first, rest) = path.split_first()?;
    let mut node = doc.children.get(*first)?;
    for &ix in rest {
        let Node::Element(el) = node else {
            return None;
        };
        node = el.children.get(ix)?;
    }
    Some(node)
}

pub fn node_mut<'a>(doc: &'a mut Document, path: &[usize]) -> Result<&'a mut Node, PathError> {
    fn descend<'a>(children: &'a mut [Node], path: &[usize]) -> Result<&'a mut Node, PathError> {
        let Some((first, rest)) = path.split_first() else {
            return Err(PathError("Empty path".into()));
        };
        let node = children
            .get_mut(*first)
            .ok_or_else(|| PathError(format!("No node at index {first}")))?;
        if rest.is_empty() {
            return Ok(node);
        }
        match node {
            Node::Element(el) => descend(&mut el.children, rest),
            _ => Err(PathError("Path descends into a leaf".into())),
        }
    }

    descend(&mut doc.children, path)
}

pub fn node_text_mut<'a>(
    doc: &'a mut Document,
    path: &[usize],
) -> Result<&'a mut TextNode, PathError> {
    match node_mut(doc, path)? {
        Node::Text(text) => Ok(text),
        _ => Err(PathError(format!("Expected text leaf at {path:?}"))),
    }
}

fn children_mut<'a>(
    doc: &'a mut Document,
    parent: &[usize],
) -> Result<&'a mut Vec<Node>, PathError> {
    if parent.is_empty() {
        return Ok(&mut doc.children);
    }
    match node_mut(doc, parent)? {
        Node::Element(ElementNode { children, .. }) => Ok(children),
        _ => Err(PathError(format!("Expected element at {parent:?}"))),
    }
}

pub fn insert_node(doc: &mut Document, path: &[usize], node: Node) -> Result<(), PathError> {
    let Some((&ix, parent)) = path.split_last() else {
        return Err(PathError("Empty path".into()));
    };
    let children = children_mut(doc, parent)?;
    if ix > children.len() {
        return Err(PathError(format!("Insert index {ix} out of bounds")));
    }
    children.insert(ix, node);
    Ok(())
}

pub fn remove_node(doc: &mut Document, path: &[usize]) -> Result<Node, PathError> {
    let Some((&ix, parent)) = path.split_last() else {
        return Err(PathError("Empty path".into()));
    };
    let children = children_mut(doc, parent)?;
    if ix >= children.len() {
        return Err(PathError(format!("Remove index {ix} out of bounds")));
    }
    Ok(children.remove(ix))
}

/// Paths of every element that holds text leaves, in document order.
pub fn text_blocks_in_order(doc: &Document) -> Vec<Path> {
    fn walk(children: &[Node], path: &mut Vec<usize>, out: &mut Vec<Path>) {
        for (ix, node) in children.iter().enumerate() {
            let Node::Element(el) = node else {
                continue;
            };
            path.push(ix);
            let holds_blocks = el.children.iter().any(|n| matches!(n, Node::Element(_)));
            if holds_blocks {
                walk(&el.children, path, out);
            } else {
                out.push(path.clone());
            }
            path.pop();
        }
    }

    let mut out = Vec::new();
    walk(&doc.children, &mut Vec::new(), &mut out);
    out
}

pub fn text_leaves_in_order(doc: &Document) -> Vec<(Path, &TextNode)> {
    fn walk<'a>(children: &'a [Node], path: &mut Vec<usize>, out: &mut Vec<(Path, &'a TextNode)>) {
        for (ix, node) in children.iter().enumerate() {
            path.push(ix);
            match node {
                Node::Text(t) => out.push((path.clone(), t)),
                Node::Element(el) => walk(&el.children, path, out),
                Node::Void(_) => {}
            }
            path.pop();
        }
    }

    let mut out = Vec::new();
    walk(&doc.children, &mut Vec::new(), &mut out);
    out
}

/// Text leaves that share at least one character with the range `start..end`.
pub fn covered_leaves<'a>(
    doc: &'a Document,
    start: &Point,
    end: &Point,
) -> Vec<(Path, &'a TextNode)> {
    text_leaves_in_order(doc)
        .into_iter()
        .filter(|(path, leaf)| {
            if *path < start.path || *path > end.path {
                return false;
            }
            let lo = if *path == start.path { start.offset } else { 0 };
            let hi = if *path == end.path {
                end.offset
            } else {
                leaf.text.len()
            };
            lo < hi
        })
        .collect()
}

/// Text blocks touched by the selection, in document order.
pub fn selected_text_blocks(doc: &Document, selection: &Selection) -> Vec<Path> {
    let (start, end) = selection.ordered();
    let start_block = parent_path(&start.path);
    let end_block = parent_path(&end.path);
    text_blocks_in_order(doc)
        .into_iter()
        .filter(|path| path.as_slice() >= start_block && path.as_slice() <= end_block)
        .collect()
}

pub fn parent_path(path: &[usize]) -> &[usize] {
    path.split_last().map(|(_, parent)| parent).unwrap_or(&[])
}

pub fn focus_block<'a>(
    doc: &'a Document,
    selection: &Selection,
) -> Option<(Path, &'a ElementNode)> {
    let path = parent_path(&selection.focus.path);
    match node_ref(doc, path)? {
        Node::Element(el) => Some((path.to_vec(), el)),
        _ => None,
    }
}

pub fn focus_leaf<'a>(doc: &'a Document, selection: &Selection) -> Option<&'a TextNode> {
    match node_ref(doc, &selection.focus.path)? {
        Node::Text(t) => Some(t),
        _ => None,
    }
}

/// Snap a point onto an existing text leaf, clamping its offset.
pub fn resolve_point(doc: &Document, point: &Point) -> Option<Point> {
    let leaves = text_leaves_in_order(doc);
    let (path, leaf) = leaves
        .iter()
        .find(|(path, _)| *path >= point.path)
        .or_else(|| leaves.last())?;
    let offset = if *path == point.path {
        crate::core::clamp_to_char_boundary(&leaf.text, point.offset)
    } else if *path < point.path {
        leaf.text.len()
    } else {
        0
    };
    Some(Point::new(path.clone(), offset))
}
