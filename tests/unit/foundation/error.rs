use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        DrawError::invalid_path("x")
            .to_string()
            .contains("invalid path:")
    );
    assert!(DrawError::io("x").to_string().contains("io error:"));
    assert!(DrawError::decode("x").to_string().contains("decode error:"));
    assert!(
        DrawError::invalid_handle("x")
            .to_string()
            .contains("invalid image handle:")
    );
    assert!(DrawError::draw("x").to_string().contains("draw error:"));
    assert!(
        DrawError::config("x")
            .to_string()
            .contains("configuration error:")
    );
}

#[test]
fn kind_maps_each_variant() {
    assert_eq!(DrawError::invalid_path("x").kind(), FailureKind::InvalidPath);
    assert_eq!(DrawError::io("x").kind(), FailureKind::IoFailure);
    assert_eq!(DrawError::decode("x").kind(), FailureKind::DecodeFailure);
    assert_eq!(
        DrawError::invalid_handle("x").kind(),
        FailureKind::InvalidHandle
    );
    assert_eq!(DrawError::draw("x").kind(), FailureKind::DrawFailure);
    assert_eq!(DrawError::config("x").kind(), FailureKind::Config);
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = DrawError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
    assert_eq!(err.kind(), FailureKind::Other);
}
