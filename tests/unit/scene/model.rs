use super::*;

#[test]
fn dims_parse_percent_and_pixels() {
    assert_eq!(Dim::parse("12.5%"), Dim::Percent(12.5));
    assert_eq!(Dim::parse(" 40 "), Dim::Px(40.0));
    assert_eq!(Dim::parse("18px"), Dim::Px(18.0));
    assert_eq!(Dim::parse("abc"), Dim::Px(0.0));
    assert_eq!(Dim::parse(""), Dim::Px(0.0));
    assert_eq!(Dim::parse("abc%"), Dim::Percent(0.0));
    assert_eq!(Dim::parse("-5%").resolve(200.0), -10.0);
    assert_eq!(Dim::parse("50%").resolve(600.0), 300.0);
}

#[test]
fn dims_serialize_with_two_decimals() {
    let json = serde_json::to_string(&Dim::percent_of(100.0, 800.0)).unwrap();
    assert_eq!(json, "\"12.50%\"");
    assert_eq!(Dim::percent_of(5.0, 0.0), Dim::Percent(0.0));
    assert_eq!(serde_json::to_string(&Dim::Px(3.0)).unwrap(), "3.0");
}

#[test]
fn float_prefix_matches_leading_number() {
    assert_eq!(parse_float_prefix("1e2x"), Some(100.0));
    assert_eq!(parse_float_prefix(".5"), Some(0.5));
    assert_eq!(parse_float_prefix("3."), Some(3.0));
    assert_eq!(parse_float_prefix("-"), None);
    assert_eq!(parse_float_prefix("e5"), None);
}

#[test]
fn document_parses_editor_output() {
    let doc = OverlayDocument::from_json_str(
        r##"{
          "base_image": "base.png",
          "elements": [
            {"type": "text", "x": "10.00%", "y": "20.00%", "content": "Hi",
             "font_size": "5.00%", "font_family": "Arial", "color": "#ff0000",
             "padding": 4, "border_radius": "6",
             "background": {"type": "linear_gradient", "colors": ["red", "blue"]},
             "shadow": {"blur": 3, "color": "black"}},
            {"type": "image", "x": "0%", "y": 12, "src": "logo.png",
             "width": "25%", "height": "10%", "background": "#00000080", "shadow": null}
          ]
        }"##,
    )
    .unwrap();

    assert_eq!(doc.base_image.as_deref(), Some("base.png"));
    let text = &doc.elements[0];
    assert_eq!(text.kind, "text");
    assert_eq!(text.border_radius, 6.0);
    assert_eq!(text.font_size, Some(Dim::Percent(5.0)));
    assert!(matches!(
        &text.background,
        Some(BackgroundDef::Gradient { kind, colors }) if kind == "linear_gradient" && colors.len() == 2
    ));
    let shadow = text.shadow.as_ref().unwrap();
    assert_eq!(shadow.blur, 3.0);
    assert_eq!(shadow.offset, None);

    let image = &doc.elements[1];
    assert_eq!(image.y, Dim::Px(12.0));
    assert_eq!(image.padding, 0.0);
    assert_eq!(
        image.background,
        Some(BackgroundDef::Solid("#00000080".to_owned()))
    );
    assert!(image.shadow.is_none());
}

#[test]
fn text_fields_are_omitted_for_images() {
    let el = ElementDef {
        kind: "image".to_owned(),
        src: Some("a.png".to_owned()),
        width: Some(Dim::Percent(10.0)),
        height: Some(Dim::Percent(20.0)),
        ..ElementDef::default()
    };
    let v = serde_json::to_value(&el).unwrap();
    assert!(v.get("content").is_none());
    assert!(v.get("font_size").is_none());
    assert_eq!(v["width"], "10.00%");
    assert_eq!(v["type"], "image");
}

#[test]
fn malformed_json_is_a_serde_error() {
    assert!(matches!(
        OverlayDocument::from_json_str("{"),
        Err(crate::PictexError::Serde(_))
    ));
}
