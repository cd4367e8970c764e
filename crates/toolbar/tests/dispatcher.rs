use std::cell::Cell;
use std::rc::Rc;

use gpui_docs_core::{Document, Editor, EditorHandle, Node, PluginRegistry, Point, Selection};
use gpui_docs_toolbar::{Command, Dimension, FormatValue, ListKind, Step, TextAlign, dispatch, read};

fn handle_with_text(text: &str) -> EditorHandle {
    let len = text.len();
    EditorHandle::new(Editor::new(
        Document {
            children: vec![Node::paragraph(text)],
        },
        Selection::new(Point::new(vec![0, 0], 0), Point::new(vec![0, 0], len)),
        PluginRegistry::richtext(),
    ))
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("gpui_docs_toolbar=debug")
        .with_test_writer()
        .try_init();
}

fn value(handle: &EditorHandle, dimension: Dimension) -> FormatValue {
    read(Some(handle), dimension).value
}

#[test]
fn toggles_flip_and_restore() {
    let cases = [
        (Dimension::Bold, Command::ToggleBold),
        (Dimension::Italic, Command::ToggleItalic),
        (Dimension::Underline, Command::ToggleUnderline),
        (Dimension::TaskList, Command::ToggleTaskList),
        (Dimension::Spellcheck, Command::ToggleSpellcheck),
    ];
    for (dimension, command) in cases {
        let handle = handle_with_text("hello");
        let before = read(Some(&handle), dimension);

        dispatch(Some(&handle), command.clone());
        let flipped = read(Some(&handle), dimension);
        assert_ne!(flipped.is_active, before.is_active, "{dimension:?} did not flip");

        dispatch(Some(&handle), command);
        assert_eq!(read(Some(&handle), dimension), before, "{dimension:?} did not restore");
    }
}

#[test]
fn full_selection_over_multibyte_text_marks_the_whole_leaf() {
    let handle = handle_with_text("héllo wörld");

    dispatch(Some(&handle), Command::ToggleBold);
    assert!(read(Some(&handle), Dimension::Bold).is_active);

    let editor = handle.read();
    let Some(Node::Element(block)) = editor.doc().children.first() else {
        panic!("expected a paragraph");
    };
    let leaves: Vec<(&str, bool)> = block
        .children
        .iter()
        .filter_map(|node| match node {
            Node::Text(leaf) => Some((leaf.text.as_str(), leaf.marks.bold)),
            _ => None,
        })
        .collect();
    assert_eq!(leaves, [("héllo wörld", true)]);
}

#[test]
fn list_kind_toggles_on_and_off() {
    let handle = handle_with_text("item");

    dispatch(Some(&handle), Command::ToggleList(ListKind::Ordered));
    let state = read(Some(&handle), Dimension::ListKind);
    assert_eq!(state.value, FormatValue::Label("orderedList".to_string()));
    assert!(state.is_active);

    dispatch(Some(&handle), Command::ToggleList(ListKind::Ordered));
    assert!(!read(Some(&handle), Dimension::ListKind).is_active);
}

#[test]
fn set_commands_are_idempotent() {
    let handle = handle_with_text("hello");
    let commands = [
        Command::SetTextAlign(TextAlign::Center),
        Command::SetFontFamily("Georgia".to_string()),
        Command::SetLineHeight("1.5".to_string()),
        Command::SetTextColor("#FF0000".to_string()),
        Command::SetHighlightColor("#FFFF00".to_string()),
        Command::SetHeading(2),
    ];
    for command in commands {
        dispatch(Some(&handle), command.clone());
        let once = Dimension::ALL.map(|d| read(Some(&handle), d));
        dispatch(Some(&handle), command);
        let twice = Dimension::ALL.map(|d| read(Some(&handle), d));
        assert_eq!(once, twice);
    }

    assert_eq!(value(&handle, Dimension::TextAlign), FormatValue::Label("center".to_string()));
    assert_eq!(value(&handle, Dimension::FontFamily), FormatValue::Text("Georgia".to_string()));
    assert_eq!(value(&handle, Dimension::LineHeight), FormatValue::Text("1.5".to_string()));
    assert_eq!(value(&handle, Dimension::TextColor), FormatValue::Color("#FF0000".to_string()));
    assert_eq!(
        value(&handle, Dimension::HighlightColor),
        FormatValue::Color("#FFFF00".to_string())
    );
    assert_eq!(value(&handle, Dimension::Heading), FormatValue::Label("Heading 2".to_string()));
}

#[test]
fn heading_round_trips_through_normal_text() {
    let handle = handle_with_text("title");
    assert_eq!(value(&handle, Dimension::Heading), FormatValue::Label("Normal text".to_string()));

    dispatch(Some(&handle), Command::SetHeading(2));
    assert_eq!(value(&handle, Dimension::Heading), FormatValue::Label("Heading 2".to_string()));

    dispatch(Some(&handle), Command::SetHeading(0));
    assert_eq!(value(&handle, Dimension::Heading), FormatValue::Label("Normal text".to_string()));
}

#[test]
fn invalid_font_sizes_never_reach_the_editor() {
    let handle = handle_with_text("hello");
    let changes = Rc::new(Cell::new(0));
    let sink = changes.clone();
    let _subscription = handle.subscribe(move |_| sink.set(sink.get() + 1));

    for raw in ["-5", "0", "abc"] {
        dispatch(Some(&handle), Command::SetFontSize(raw.to_string()));
    }
    assert_eq!(changes.get(), 0);
    assert_eq!(value(&handle, Dimension::FontSize), FormatValue::Size(16));

    dispatch(Some(&handle), Command::SetFontSize("20".to_string()));
    assert_eq!(value(&handle, Dimension::FontSize), FormatValue::Size(20));
}

#[test]
fn stepping_font_size() {
    let handle = handle_with_text("hello");

    dispatch(Some(&handle), Command::StepFontSize(Step::Increment));
    assert_eq!(value(&handle, Dimension::FontSize), FormatValue::Size(17));

    dispatch(Some(&handle), Command::SetFontSize("1".to_string()));
    dispatch(Some(&handle), Command::StepFontSize(Step::Decrement));
    assert_eq!(value(&handle, Dimension::FontSize), FormatValue::Size(1));
}

#[test]
fn remove_formatting_keeps_block_formatting() {
    let handle = handle_with_text("hello");
    dispatch(Some(&handle), Command::SetHeading(2));
    dispatch(Some(&handle), Command::SetTextAlign(TextAlign::Center));
    dispatch(Some(&handle), Command::ToggleBold);
    dispatch(Some(&handle), Command::SetTextColor("#FF0000".to_string()));
    assert!(read(Some(&handle), Dimension::Bold).is_active);

    dispatch(Some(&handle), Command::RemoveFormatting);

    assert!(!read(Some(&handle), Dimension::Bold).is_active);
    assert_eq!(value(&handle, Dimension::TextColor), FormatValue::Color("#000000".to_string()));
    assert_eq!(value(&handle, Dimension::Heading), FormatValue::Label("Heading 2".to_string()));
    assert_eq!(value(&handle, Dimension::TextAlign), FormatValue::Label("center".to_string()));
}

#[test]
fn empty_link_unsets_the_link() {
    let handle = handle_with_text("docs");

    dispatch(Some(&handle), Command::SetLink("https://example.com".to_string()));
    let link = read(Some(&handle), Dimension::Link);
    assert!(link.is_active);
    assert_eq!(link.value, FormatValue::Text("https://example.com".to_string()));

    dispatch(Some(&handle), Command::SetLink("  ".to_string()));
    assert!(!read(Some(&handle), Dimension::Link).is_active);
}

#[test]
fn undo_and_redo_go_through_engine_history() {
    let handle = handle_with_text("hello");
    dispatch(Some(&handle), Command::ToggleBold);
    assert!(read(Some(&handle), Dimension::Bold).is_active);

    dispatch(Some(&handle), Command::Undo);
    assert!(!read(Some(&handle), Dimension::Bold).is_active);

    dispatch(Some(&handle), Command::Redo);
    assert!(read(Some(&handle), Dimension::Bold).is_active);
}

#[test]
fn dispatch_returns_focus_even_when_rejected() {
    init_tracing();
    let handle = handle_with_text("hello");
    handle.update(|editor| editor.blur());

    // Nothing to redo: the engine refuses, the dispatcher swallows it.
    dispatch(Some(&handle), Command::Redo);
    assert!(handle.read().is_focused());
}

#[test]
fn dispatch_without_an_editor_is_a_no_op() {
    init_tracing();
    dispatch(None, Command::ToggleBold);
    dispatch(None, Command::SetFontSize("12".to_string()));
    dispatch(None, Command::StepFontSize(Step::Decrement));
}

#[test]
fn commands_serialize_with_tag_and_value() {
    let json = serde_json::to_value(Command::SetHeading(2)).unwrap();
    assert_eq!(json, serde_json::json!({ "command": "set_heading", "value": 2 }));

    let back: Command =
        serde_json::from_value(serde_json::json!({ "command": "toggle_bold" })).unwrap();
    assert_eq!(back, Command::ToggleBold);
}
