use super::*;
use serde_json::json;

#[test]
fn parses_hex_forms() {
    assert_eq!("#ff0000".parse::<Color>().unwrap(), Color::rgb(255, 0, 0));
    assert_eq!("#0F0".parse::<Color>().unwrap(), Color::rgb(0, 255, 0));
    assert_eq!(
        "#0000ff80".parse::<Color>().unwrap(),
        Color::rgba(0, 0, 255, 128)
    );
    assert_eq!("#0008".parse::<Color>().unwrap(), Color::rgba(0, 0, 0, 0x88));
    assert!("#12345".parse::<Color>().is_err());
    assert!("#gg0000".parse::<Color>().is_err());
}

#[test]
fn parses_named_and_functional_forms() {
    assert_eq!("White".parse::<Color>().unwrap(), Color::WHITE);
    assert_eq!("rebeccapurple".parse::<Color>().unwrap(), Color::rgb(0x66, 0x33, 0x99));
    assert_eq!("transparent".parse::<Color>().unwrap(), Color::TRANSPARENT);
    assert_eq!(
        "rgba(10, 20, 30, 0.5)".parse::<Color>().unwrap(),
        Color::rgba(10, 20, 30, 128)
    );
    assert_eq!(
        "rgb(100%, 0%, 50%)".parse::<Color>().unwrap(),
        Color::rgb(255, 0, 128)
    );
    assert!("notacolor".parse::<Color>().is_err());
}

#[test]
fn parses_hsl_and_hwb_functions() {
    assert_eq!("hsl(120, 100%, 50%)".parse::<Color>().unwrap(), Color::rgb(0, 255, 0));
    assert_eq!(
        "hsla(0, 100%, 50%, 0.5)".parse::<Color>().unwrap(),
        Color::rgba(255, 0, 0, 128)
    );
    assert_eq!("hwb(240 0% 0%)".parse::<Color>().unwrap(), Color::rgb(0, 0, 255));
    assert_eq!(Color::from("hsl(120, 100%, 50%)"), Color::rgb(0, 255, 0));
}

#[test]
fn hex_output_omits_opaque_alpha() {
    assert_eq!(Color::rgb(255, 0, 16).to_hex(), "#ff0010");
    assert_eq!(Color::rgba(0, 0, 0, 160).to_hex(), "#000000a0");
}

#[test]
fn serde_accepts_strings_objects_and_arrays() {
    let c: Color = serde_json::from_value(json!("#336699")).unwrap();
    assert_eq!(c, Color::rgb(0x33, 0x66, 0x99));

    let c: Color = serde_json::from_value(json!({"r": 1.0, "g": 0.0, "b": 0.0})).unwrap();
    assert_eq!(c, Color::rgb(255, 0, 0));

    let c: Color = serde_json::from_value(json!([0.0, 0.0, 1.0, 0.5])).unwrap();
    assert_eq!(c, Color::rgba(0, 0, 255, 128));

    let c: Color = serde_json::from_value(json!({"h": 120.0, "s": 1.0, "l": 0.5})).unwrap();
    assert_eq!(c, Color::rgb(0, 255, 0));

    assert_eq!(serde_json::to_value(Color::WHITE).unwrap(), json!("#ffffff"));
}
