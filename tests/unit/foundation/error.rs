use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        StaxError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(StaxError::render("x").to_string().contains("render error:"));
    assert_eq!(
        StaxError::not_found("stack", "tower").to_string(),
        "stack 'tower' not found"
    );
}

#[test]
fn decode_errors_convert_and_keep_kind() {
    let err: StaxError = DecodeError::UnsupportedVersion(3).into();
    assert!(matches!(
        err,
        StaxError::Decode(DecodeError::UnsupportedVersion(3))
    ));
    assert!(err.to_string().contains("unsupported staxie version 3"));
}

#[test]
fn not_found_predicate() {
    assert!(StaxError::not_found("frame", "9").is_not_found());
    assert!(!StaxError::validation("x").is_not_found());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = StaxError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
