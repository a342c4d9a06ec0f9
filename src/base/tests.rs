use crate::base::neterror::{ErrorKind, NetError};

#[test]
fn test_net_error_codes() {
    assert_eq!(NetError::ConnectionRefused.as_i32(), -102);
    assert_eq!(NetError::InvalidUrl.as_i32(), -300);
    assert_eq!(NetError::MissingPathParameter("id".into()).as_i32(), -10001);
}

#[test]
fn test_error_kinds() {
    assert_eq!(NetError::ConnectionTimedOut.kind(), ErrorKind::Transport);
    assert_eq!(NetError::Failed("boom".into()).kind(), ErrorKind::Transport);
    assert_eq!(NetError::InvalidUtf8.kind(), ErrorKind::Decoding);
    assert_eq!(
        NetError::JsonParseError("eof".into()).kind(),
        ErrorKind::Decoding
    );
    assert_eq!(
        NetError::InvalidHeader("X Bad".into()).kind(),
        ErrorKind::Configuration
    );
    assert!(NetError::ConnectionReset.is_transport());
    assert!(!NetError::InvalidUrl.is_transport());
}

#[test]
fn test_custom_codes_avoid_chromium_range() {
    // Chromium's list ends well above -1000.
    let custom = [
        NetError::HttpBodyError,
        NetError::EmptyBody,
        NetError::InvalidUtf8,
        NetError::JsonParseError(String::new()),
    ];
    for err in custom {
        assert!(err.as_i32() <= -10000, "{err:?}");
    }
}

#[test]
fn test_missing_path_parameter_message() {
    let err = NetError::MissingPathParameter("id".into());
    assert_eq!(err.to_string(), "Missing value for path parameter {id}");
}
