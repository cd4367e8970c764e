use gpui_docs_toolbar::{ToolbarConfig, ToolbarError};

#[test]
fn missing_fields_take_defaults() {
    let config =
        ToolbarConfig::from_json_str(r#"{ "font_families": ["Inter", "Roboto"] }"#).unwrap();
    assert_eq!(config.font_families, ["Inter", "Roboto"]);
    assert_eq!(config.line_heights, ToolbarConfig::default().line_heights);
    assert_eq!(config.max_heading_level, 6);
    assert_eq!(config.color_palette.len(), 15);
}

#[test]
fn empty_lists_and_bad_levels_are_normalized() {
    let config = ToolbarConfig::from_json_str(
        r#"{ "font_families": [], "color_palette": [], "max_heading_level": 9 }"#,
    )
    .unwrap();
    let defaults = ToolbarConfig::default();
    assert_eq!(config.font_families, defaults.font_families);
    assert_eq!(config.color_palette, defaults.color_palette);
    assert_eq!(config.max_heading_level, 6);

    let zero = ToolbarConfig::from_json_str(r#"{ "max_heading_level": 0 }"#).unwrap();
    assert_eq!(zero.max_heading_level, 6);
}

#[test]
fn malformed_json_is_a_config_error() {
    let err = ToolbarConfig::from_json_str("{ not json").unwrap_err();
    assert!(matches!(err, ToolbarError::Config(_)), "expected a config error, got {err:?}");
}
