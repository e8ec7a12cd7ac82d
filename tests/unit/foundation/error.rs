use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        PictexError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(PictexError::decode("x").to_string().contains("decode error:"));
    assert!(PictexError::render("x").to_string().contains("render error:"));
    assert!(
        PictexError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = PictexError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn json_errors_map_to_serde() {
    let e = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err = PictexError::from(e);
    assert!(matches!(err, PictexError::Serde(_)));
}
