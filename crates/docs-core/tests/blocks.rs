use gpui_docs_core::{Document, Editor, Node, PluginRegistry, Point, Selection};
use serde_json::json;

fn editor_with(children: Vec<Node>, selection: Selection) -> Editor {
    Editor::new(Document { children }, selection, PluginRegistry::richtext())
}

fn kinds(editor: &Editor) -> Vec<String> {
    editor
        .doc()
        .children
        .iter()
        .map(|n| match n {
            Node::Element(el) => el.kind.clone(),
            Node::Void(v) => v.kind.clone(),
            Node::Text(_) => "text".to_string(),
        })
        .collect()
}

#[test]
fn heading_level_round_trips_through_paragraph() {
    let mut editor = editor_with(
        vec![Node::paragraph("title")],
        Selection::collapsed(Point::new(vec![0, 0], 2)),
    );
    assert!(editor.is_active("paragraph", None));

    editor
        .run_command("block.set_heading", Some(json!({ "level": 2 })))
        .unwrap();
    assert!(editor.is_active("heading", Some(&json!({ "level": 2 }))));
    assert!(!editor.is_active("heading", Some(&json!({ "level": 1 }))));

    editor
        .run_command("block.set_heading", Some(json!({ "level": 0 })))
        .unwrap();
    assert!(editor.is_active("paragraph", None));
    assert!(!editor.is_active("heading", None));
    assert!(editor.get_attributes("block").get("level").is_none());
}

#[test]
fn heading_level_out_of_range_is_rejected() {
    let mut editor = editor_with(
        vec![Node::paragraph("x")],
        Selection::collapsed(Point::new(vec![0, 0], 0)),
    );
    assert!(
        editor
            .run_command("block.set_heading", Some(json!({ "level": 7 })))
            .is_err()
    );
    assert!(editor.is_active("paragraph", None));
}

#[test]
fn align_applies_to_every_selected_block() {
    let mut editor = editor_with(
        vec![
            Node::paragraph("a"),
            Node::paragraph("b"),
            Node::paragraph("c"),
        ],
        Selection::new(Point::new(vec![0, 0], 0), Point::new(vec![1, 0], 1)),
    );
    assert!(editor.is_active("textAlign", Some(&json!({ "textAlign": "left" }))));

    editor
        .run_command("block.set_align", Some(json!({ "align": "justify" })))
        .unwrap();
    assert!(editor.is_active("textAlign", Some(&json!({ "textAlign": "justify" }))));

    editor.set_selection(Selection::collapsed(Point::new(vec![2, 0], 0)));
    assert!(editor.is_active("textAlign", Some(&json!({ "textAlign": "left" }))));

    assert!(
        editor
            .run_command("block.set_align", Some(json!({ "align": "middle" })))
            .is_err()
    );
}

#[test]
fn line_height_normal_removes_the_attribute() {
    let mut editor = editor_with(
        vec![Node::paragraph("a")],
        Selection::collapsed(Point::new(vec![0, 0], 0)),
    );
    editor
        .run_command("block.set_line_height", Some(json!({ "line_height": "1.5" })))
        .unwrap();
    assert_eq!(
        editor.get_attributes("paragraph").get("line_height"),
        Some(&json!("1.5"))
    );

    editor
        .run_command(
            "block.set_line_height",
            Some(json!({ "line_height": "normal" })),
        )
        .unwrap();
    assert!(editor.get_attributes("paragraph").get("line_height").is_none());

    assert!(
        editor
            .run_command("block.set_line_height", Some(json!({ "line_height": "tall" })))
            .is_err()
    );
}

#[test]
fn list_toggles_switch_between_kinds() {
    let mut editor = editor_with(
        vec![Node::paragraph("item")],
        Selection::collapsed(Point::new(vec![0, 0], 0)),
    );

    editor.run_command("list.toggle_bulleted", None).unwrap();
    assert!(editor.is_active("bulletList", None));
    assert!(!editor.is_active("orderedList", None));

    editor.run_command("list.toggle_ordered", None).unwrap();
    assert!(editor.is_active("orderedList", None));
    assert!(!editor.is_active("bulletList", None));

    editor.run_command("list.toggle_ordered", None).unwrap();
    assert!(editor.is_active("paragraph", None));
    assert_eq!(kinds(&editor), vec!["paragraph"]);
}

#[test]
fn task_list_toggle_round_trips() {
    let mut editor = editor_with(
        vec![Node::paragraph("todo")],
        Selection::collapsed(Point::new(vec![0, 0], 0)),
    );

    editor.run_command("task.toggle", None).unwrap();
    assert!(editor.is_active("taskList", None));
    assert_eq!(
        editor.get_attributes("block").get("checked"),
        Some(&json!(false))
    );

    editor.run_command("task.toggle_checked", None).unwrap();
    assert_eq!(
        editor.get_attributes("block").get("checked"),
        Some(&json!(true))
    );

    editor.run_command("task.toggle", None).unwrap();
    assert!(!editor.is_active("taskList", None));
    assert!(editor.get_attributes("block").is_empty());
}

#[test]
fn image_insert_adds_a_void_block_and_moves_the_caret_past_it() {
    let mut editor = editor_with(
        vec![Node::paragraph("before")],
        Selection::collapsed(Point::new(vec![0, 0], 6)),
    );

    editor
        .run_command(
            "image.insert",
            Some(json!({ "src": "data:image/png;base64,AAAA" })),
        )
        .unwrap();

    assert_eq!(kinds(&editor), vec!["paragraph", "image", "paragraph"]);
    let Node::Void(image) = &editor.doc().children[1] else {
        panic!("expected image void");
    };
    assert_eq!(
        image.attrs.get("src"),
        Some(&json!("data:image/png;base64,AAAA"))
    );
    assert_eq!(editor.selection().focus, Point::new(vec![2, 0], 0));

    assert!(editor.run_command("image.insert", Some(json!({ "src": "  " }))).is_err());
}
