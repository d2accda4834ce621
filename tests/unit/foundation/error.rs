use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        FoldError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        FoldError::animation("x")
            .to_string()
            .contains("animation error:")
    );
    assert!(FoldError::layout("x").to_string().contains("layout error:"));
    assert!(FoldError::render("x").to_string().contains("render error:"));
    assert!(
        FoldError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = FoldError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn json_errors_map_to_serde_variant() {
    let err: FoldError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, FoldError::Serde(_)));
}
