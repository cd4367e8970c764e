use gpui_docs_core::{
    Document, Editor, Marks, Node, Op, PluginRegistry, Point, Selection, Transaction,
};

fn bold() -> Marks {
    Marks {
        bold: true,
        ..Marks::default()
    }
}

#[test]
fn split_text_moves_points_past_the_split_into_the_new_leaf() {
    let doc = Document {
        children: vec![Node::paragraph("abcdef")],
    };
    let selection = Selection::new(Point::new(vec![0, 0], 2), Point::new(vec![0, 0], 5));
    let mut editor = Editor::new(doc, selection, PluginRegistry::core());

    let tx = Transaction::new(vec![
        Op::SplitText {
            path: vec![0, 0],
            offset: 2,
        },
        Op::SetTextMarks {
            path: vec![0, 1],
            marks: bold(),
        },
    ])
    .source("test:split");
    editor.apply(tx).unwrap();

    let Node::Element(el) = editor.doc().children[0].clone() else {
        panic!("expected paragraph");
    };
    assert_eq!(
        el.children,
        vec![Node::text("ab", Marks::default()), Node::text("cdef", bold())]
    );
    assert_eq!(editor.selection().anchor, Point::new(vec![0, 0], 2));
    assert_eq!(editor.selection().focus, Point::new(vec![0, 1], 3));

    assert!(editor.undo());
    assert_eq!(editor.doc().children, vec![Node::paragraph("abcdef")]);
    assert_eq!(editor.selection().focus, Point::new(vec![0, 0], 5));

    assert!(editor.redo());
    assert_eq!(editor.doc().children[0], Node::Element(el.clone()));
}

#[test]
fn normalization_merges_equal_leaves_and_maps_the_caret() {
    let doc = Document {
        children: vec![Node::paragraph("ab")],
    };
    let selection = Selection::collapsed(Point::new(vec![0, 0], 1));
    let mut editor = Editor::new(doc, selection, PluginRegistry::core());

    let tx = Transaction::new(vec![Op::InsertNode {
        path: vec![0, 1],
        node: Node::text("cd", Marks::default()),
    }])
    .selection_after(Selection::collapsed(Point::new(vec![0, 1], 1)));
    editor.apply(tx).unwrap();

    assert_eq!(editor.doc().children, vec![Node::paragraph("abcd")]);
    assert_eq!(editor.selection().focus, Point::new(vec![0, 0], 3));
}

#[test]
fn merge_rejects_leaves_with_different_marks() {
    let doc = Document {
        children: vec![Node::Element(gpui_docs_core::ElementNode {
            kind: "paragraph".to_string(),
            attrs: Default::default(),
            children: vec![Node::text("a", Marks::default()), Node::text("b", bold())],
        })],
    };
    let mut editor = Editor::new(
        doc,
        Selection::collapsed(Point::new(vec![0, 0], 0)),
        PluginRegistry::core(),
    );

    let err = editor
        .apply(Transaction::new(vec![Op::MergeText { path: vec![0, 1] }]))
        .unwrap_err();
    assert!(matches!(err, gpui_docs_core::ApplyError::InvalidOp(_)));
}

#[test]
fn empty_document_is_normalized_to_one_paragraph() {
    let editor = Editor::new(
        Document::default(),
        Selection::collapsed(Point::new(vec![0, 0], 0)),
        PluginRegistry::richtext(),
    );
    assert_eq!(editor.doc().children, vec![Node::paragraph("")]);
}

#[test]
fn document_reads_from_plain_tree_json() {
    let doc: Document = serde_json::from_value(serde_json::json!({
        "children": [{
            "node": "element",
            "kind": "paragraph",
            "children": [{ "node": "text", "text": "hi" }]
        }]
    }))
    .unwrap();
    assert_eq!(doc.children, vec![Node::paragraph("hi")]);
}
