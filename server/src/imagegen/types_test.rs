use super::*;

#[test]
fn data_uri_joins_mime_and_data() {
    let image = GeneratedImage { mime_type: "image/jpeg".into(), data: "QUJD".into() };
    assert_eq!(image.to_data_uri(), "data:image/jpeg;base64,QUJD");
}

#[test]
fn error_codes_are_stable() {
    assert_eq!(ImageGenError::NoImage.error_code(), "E_NO_IMAGE");
    assert_eq!(ImageGenError::ApiParse("x".into()).error_code(), "E_API_PARSE");
    assert_eq!(ImageGenError::ApiResponse { status: 400, body: String::new() }.error_code(), "E_API_RESPONSE");
}

#[test]
fn server_side_failures_are_retryable() {
    assert!(ImageGenError::ApiRequest("timeout".into()).retryable());
    assert!(ImageGenError::ApiResponse { status: 503, body: String::new() }.retryable());
    assert!(ImageGenError::ApiResponse { status: 429, body: String::new() }.retryable());
    assert!(!ImageGenError::ApiResponse { status: 400, body: String::new() }.retryable());
    assert!(!ImageGenError::NoImage.retryable());
}
