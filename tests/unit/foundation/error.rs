use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ExportError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(ExportError::busy("x").to_string().contains("export busy:"));
    assert!(
        ExportError::capture("x")
            .to_string()
            .contains("capture failed:")
    );
    assert!(
        ExportError::encoder_unsupported("x")
            .to_string()
            .contains("encoder unsupported:")
    );
    assert!(ExportError::encode("x").to_string().contains("encode error:"));
    assert!(
        ExportError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ExportError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn user_notice_is_generic_for_capture_failures() {
    let a = ExportError::capture("image 3 failed to decode").user_notice();
    let b = ExportError::encode("ffmpeg exited with status 1").user_notice();
    assert_eq!(a, b);
    assert!(!a.contains("decode"));
}

#[test]
fn serde_json_errors_map_to_serde_variant() {
    let e: ExportError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(e, ExportError::Serde(_)));
}
