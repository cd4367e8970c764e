use gpui_docs_core::{Document, Editor, Node, PluginRegistry, Point, Selection};

fn editor_with(children: Vec<Node>, selection: Selection) -> Editor {
    Editor::new(Document { children }, selection, PluginRegistry::richtext())
}

fn leaves(editor: &Editor, block: usize) -> Vec<(String, bool)> {
    let Node::Element(el) = &editor.doc().children[block] else {
        panic!("expected element block");
    };
    el.children
        .iter()
        .map(|n| match n {
            Node::Text(t) => (t.text.clone(), t.marks.bold),
            _ => (String::new(), false),
        })
        .collect()
}

#[test]
fn toggle_bold_splits_only_the_selected_range() {
    let mut editor = editor_with(
        vec![Node::paragraph("abcde")],
        Selection::new(Point::new(vec![0, 0], 1), Point::new(vec![0, 0], 3)),
    );

    editor.run_command("marks.toggle_bold", None).unwrap();
    assert_eq!(
        leaves(&editor, 0),
        vec![
            ("a".to_string(), false),
            ("bc".to_string(), true),
            ("de".to_string(), false),
        ]
    );
    assert!(editor.is_active("bold", None));

    editor.run_command("marks.toggle_bold", None).unwrap();
    assert_eq!(leaves(&editor, 0), vec![("abcde".to_string(), false)]);
    assert!(!editor.is_active("bold", None));
    assert_eq!(editor.selection().anchor, Point::new(vec![0, 0], 1));
    assert_eq!(editor.selection().focus, Point::new(vec![0, 0], 3));
}

#[test]
fn backward_selection_keeps_its_direction() {
    let mut editor = editor_with(
        vec![Node::paragraph("abcde")],
        Selection::new(Point::new(vec![0, 0], 4), Point::new(vec![0, 0], 2)),
    );

    editor.run_command("marks.toggle_italic", None).unwrap();
    let sel = editor.selection().clone();
    let (start, end) = sel.ordered();
    assert_eq!(sel.anchor, end);
    assert_eq!(sel.focus, start);
    assert!(editor.is_active("italic", None));
}

#[test]
fn toggle_across_blocks_marks_every_covered_leaf() {
    let mut editor = editor_with(
        vec![Node::paragraph("one"), Node::paragraph("two")],
        Selection::new(Point::new(vec![0, 0], 1), Point::new(vec![1, 0], 2)),
    );

    editor.run_command("marks.toggle_bold", None).unwrap();
    assert_eq!(
        leaves(&editor, 0),
        vec![("o".to_string(), false), ("ne".to_string(), true)]
    );
    assert_eq!(
        leaves(&editor, 1),
        vec![("tw".to_string(), true), ("o".to_string(), false)]
    );
}

#[test]
fn partially_bold_range_turns_fully_bold() {
    let mut editor = editor_with(
        vec![Node::paragraph("abcd")],
        Selection::new(Point::new(vec![0, 0], 0), Point::new(vec![0, 0], 2)),
    );
    editor.run_command("marks.toggle_bold", None).unwrap();

    editor.set_selection(Selection::new(
        Point::new(vec![0, 0], 0),
        Point::new(vec![0, 1], 2),
    ));
    assert!(!editor.is_active("bold", None));
    editor.run_command("marks.toggle_bold", None).unwrap();
    assert_eq!(leaves(&editor, 0), vec![("abcd".to_string(), true)]);
}

#[test]
fn caret_toggle_gives_the_caret_its_own_leaf() {
    let mut editor = editor_with(
        vec![Node::paragraph("abcd")],
        Selection::collapsed(Point::new(vec![0, 0], 2)),
    );

    editor.run_command("marks.toggle_bold", None).unwrap();
    assert!(editor.is_active("bold", None));
    assert_eq!(
        leaves(&editor, 0),
        vec![
            ("ab".to_string(), false),
            (String::new(), true),
            ("cd".to_string(), false),
        ]
    );
    assert_eq!(editor.selection().focus, Point::new(vec![0, 1], 0));

    editor.run_command("marks.toggle_bold", None).unwrap();
    assert!(!editor.is_active("bold", None));
    assert_eq!(leaves(&editor, 0), vec![("abcd".to_string(), false)]);
    assert_eq!(editor.selection().focus, Point::new(vec![0, 0], 2));
}

#[test]
fn string_marks_are_read_back_through_get_attributes() {
    let mut editor = editor_with(
        vec![Node::paragraph("hello")],
        Selection::new(Point::new(vec![0, 0], 0), Point::new(vec![0, 0], 5)),
    );

    editor
        .run_command(
            "marks.set_text_color",
            Some(serde_json::json!({ "color": "#FF0000" })),
        )
        .unwrap();
    editor
        .run_command(
            "marks.set_highlight_color",
            Some(serde_json::json!({ "color": "#FFFF00" })),
        )
        .unwrap();
    editor
        .run_command(
            "marks.set_font_family",
            Some(serde_json::json!({ "family": "Georgia" })),
        )
        .unwrap();
    editor
        .run_command(
            "marks.set_font_size",
            Some(serde_json::json!({ "size": "18px" })),
        )
        .unwrap();

    let style = editor.get_attributes("textStyle");
    assert_eq!(style.get("color"), Some(&serde_json::json!("#FF0000")));
    assert_eq!(style.get("fontFamily"), Some(&serde_json::json!("Georgia")));
    assert_eq!(style.get("fontSize"), Some(&serde_json::json!("18px")));
    assert_eq!(
        editor.get_attributes("highlight").get("color"),
        Some(&serde_json::json!("#FFFF00"))
    );

    editor.run_command("marks.unset_font_size", None).unwrap();
    assert!(editor.get_attributes("textStyle").get("fontSize").is_none());
}

#[test]
fn set_link_at_caret_inside_link_rewrites_the_whole_link() {
    let mut editor = editor_with(
        vec![Node::paragraph("docs")],
        Selection::new(Point::new(vec![0, 0], 0), Point::new(vec![0, 0], 4)),
    );
    editor
        .run_command(
            "marks.set_link",
            Some(serde_json::json!({ "url": "https://a.example" })),
        )
        .unwrap();

    editor.set_selection(Selection::collapsed(Point::new(vec![0, 0], 2)));
    editor
        .run_command(
            "marks.set_link",
            Some(serde_json::json!({ "url": "https://b.example" })),
        )
        .unwrap();

    let Node::Element(el) = &editor.doc().children[0] else {
        panic!("expected paragraph");
    };
    assert_eq!(el.children.len(), 1);
    assert_eq!(
        editor.get_attributes("link").get("href"),
        Some(&serde_json::json!("https://b.example"))
    );
}

#[test]
fn missing_args_are_rejected() {
    let mut editor = editor_with(
        vec![Node::paragraph("x")],
        Selection::collapsed(Point::new(vec![0, 0], 0)),
    );
    let err = editor.run_command("marks.set_text_color", None).unwrap_err();
    assert_eq!(err.message(), "Missing args.color");
}

#[test]
fn unset_all_clears_marks_but_keeps_block_formatting() {
    let mut editor = editor_with(
        vec![Node::heading(2, "title")],
        Selection::new(Point::new(vec![0, 0], 0), Point::new(vec![0, 0], 5)),
    );
    editor
        .run_command(
            "block.set_align",
            Some(serde_json::json!({ "align": "center" })),
        )
        .unwrap();
    editor.run_command("marks.toggle_bold", None).unwrap();
    editor
        .run_command(
            "marks.set_text_color",
            Some(serde_json::json!({ "color": "#00FF00" })),
        )
        .unwrap();

    editor.run_command("marks.unset_all", None).unwrap();

    assert!(!editor.is_active("bold", None));
    assert!(editor.get_attributes("textStyle").is_empty());
    assert!(editor.is_active("heading", Some(&serde_json::json!({ "level": 2 }))));
    assert!(editor.is_active(
        "textAlign",
        Some(&serde_json::json!({ "textAlign": "center" }))
    ));
}
