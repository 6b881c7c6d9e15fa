use thiserror::Error;

/// A convenience `Result` alias using [`SitelogError`].
pub type SitelogResult<T> = Result<T, SitelogError>;

/// Top-level error type for the sitelog crates.
///
/// Validation rejections are never errors; they are reported through
/// [`crate::ValidationResult`] or a plain `bool`. Only genuine faults land here.
#[derive(Error, Debug)]
pub enum SitelogError {
    /// A security primitive failed (e.g. the OS random source is unavailable).
    #[error("Security error: {0}")]
    Security(String),

    /// A configuration value is missing or out of range.
    #[error("Config error: {0}")]
    Config(String),

    /// A JSON serialization or deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
