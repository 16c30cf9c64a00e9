use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        PackshotError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        PackshotError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert!(
        PackshotError::decode("x")
            .to_string()
            .contains("decode error:")
    );
    assert!(
        PackshotError::encode("x")
            .to_string()
            .contains("encode error:")
    );
    assert!(
        PackshotError::delivery("x")
            .to_string()
            .contains("delivery error:")
    );
    assert!(
        PackshotError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = PackshotError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn serde_json_errors_map_to_serde_variant() {
    let err: PackshotError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, PackshotError::Serde(_)));
}
