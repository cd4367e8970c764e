use gpui_docs_core::{Editor, EditorHandle};
use gpui_docs_toolbar::{
    Dimension, FormatValue, ListKind, NORMAL_TEXT, parse_font_size, read, read_editor,
};
use serde_json::json;

#[test]
fn absent_handle_reads_static_defaults() {
    for dimension in Dimension::ALL {
        let state = read(None, dimension);
        assert_eq!(state, dimension.default_state());
        assert!(!state.is_active);
    }
    assert_eq!(
        read(None, Dimension::Heading).value,
        FormatValue::Label(NORMAL_TEXT.to_string())
    );
    assert_eq!(read(None, Dimension::FontSize).value, FormatValue::Size(16));
    assert_eq!(
        read(None, Dimension::HighlightColor).value,
        FormatValue::Color("#FFFFFF".to_string())
    );
}

#[test]
fn fresh_editor_reads_plain_text() {
    let editor = Editor::with_richtext_plugins();

    assert_eq!(read_editor(&editor, Dimension::Bold).value, FormatValue::Bool(false));
    assert_eq!(
        read_editor(&editor, Dimension::FontFamily).value,
        FormatValue::Text("Arial".to_string())
    );
    assert_eq!(
        read_editor(&editor, Dimension::LineHeight).value,
        FormatValue::Text("normal".to_string())
    );
    assert_eq!(
        read_editor(&editor, Dimension::Link).value,
        FormatValue::Text(String::new())
    );
    assert_eq!(
        read_editor(&editor, Dimension::TextColor).value,
        FormatValue::Color("#000000".to_string())
    );
    // Paragraphs are left aligned unless told otherwise.
    let align = read_editor(&editor, Dimension::TextAlign);
    assert_eq!(align.value, FormatValue::Label("left".to_string()));
    assert!(align.is_active);
    // Spellcheck starts on.
    assert!(read_editor(&editor, Dimension::Spellcheck).is_active);
}

#[test]
fn list_kind_falls_back_to_bullet_without_being_active() {
    let editor = Editor::with_richtext_plugins();
    let state = read_editor(&editor, Dimension::ListKind);
    assert_eq!(
        state.value,
        FormatValue::Label(ListKind::Bullet.engine_name().to_string())
    );
    assert!(!state.is_active);
}

#[test]
fn heading_reads_the_first_matching_level() {
    let handle = EditorHandle::new(Editor::with_richtext_plugins());
    handle
        .update(|editor| editor.run_command("block.set_heading", Some(json!({ "level": 3 }))))
        .unwrap();

    let state = read(Some(&handle), Dimension::Heading);
    assert_eq!(state.value, FormatValue::Label("Heading 3".to_string()));
    assert!(state.is_active);
}

#[test]
fn font_size_strips_units() {
    let handle = EditorHandle::new(Editor::with_richtext_plugins());
    handle
        .update(|editor| editor.run_command("marks.set_font_size", Some(json!({ "size": "18px" }))))
        .unwrap();

    assert_eq!(read(Some(&handle), Dimension::FontSize).value, FormatValue::Size(18));
}

#[test]
fn parse_font_size_accepts_only_positive_integers() {
    assert_eq!(parse_font_size("18"), Some(18));
    assert_eq!(parse_font_size("18px"), Some(18));
    assert_eq!(parse_font_size(" 12 pt "), Some(12));

    assert_eq!(parse_font_size("-5"), None);
    assert_eq!(parse_font_size("0"), None);
    assert_eq!(parse_font_size("abc"), None);
    assert_eq!(parse_font_size(""), None);
    assert_eq!(parse_font_size("+3"), None);
    assert_eq!(parse_font_size("1.5"), None);
}
