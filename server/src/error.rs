//! Error classification shared by every server error type.

/// Stable machine-readable code for an error, carried in JSON error bodies
/// and log fields.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}
