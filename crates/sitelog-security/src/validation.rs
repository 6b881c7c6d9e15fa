use crate::sanitizer::sanitize;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sitelog_core::ValidationResult;
use std::sync::LazyLock;
use tracing::debug;

/// Longest accepted e-mail address, in characters.
pub const MAX_EMAIL_LENGTH: usize = 254;
/// Shortest accepted password, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 8;
/// Largest accepted upload, in bytes.
pub const MAX_UPLOAD_SIZE: u64 = 10 * 1024 * 1024;

/// Extensions accepted for uploads, lower-case with the leading dot.
pub const ALLOWED_EXTENSIONS: &[&str] = &[
    ".jpg", ".jpeg", ".png", ".webp", ".gif", ".pdf", ".xlsx", ".xls", ".csv",
];

/// Spreadsheet extensions whose declared MIME type is not checked;
/// browsers report them inconsistently.
const SPREADSHEET_EXTENSIONS: &[&str] = &[".xlsx", ".xls", ".csv"];

/// Declared MIME types accepted for non-spreadsheet uploads.
pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/webp",
    "image/gif",
    "application/pdf",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.ms-excel",
    "text/csv",
    "application/octet-stream",
    "application/zip",
];

#[allow(clippy::expect_used)]
static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("invalid email pattern"));

/// Metadata of an uploaded file as declared by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    /// Original file name.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// Declared MIME type.
    #[serde(rename = "type")]
    pub mime_type: String,
}

impl FileMetadata {
    /// Convenience constructor.
    pub fn new(name: impl Into<String>, size: u64, mime_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size,
            mime_type: mime_type.into(),
        }
    }
}

/// Syntactic e-mail check on the sanitized address. No DNS lookups.
pub fn is_valid_email(email: &str) -> bool {
    let sanitized = sanitize(email);
    EMAIL_SHAPE.is_match(&sanitized) && sanitized.chars().count() <= MAX_EMAIL_LENGTH
}

/// Password strength policy. The first failing rule is reported.
pub fn validate_password(password: &str) -> ValidationResult {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return ValidationResult::invalid(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
        ));
    }

    let mut missing = Vec::new();
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        missing.push("a lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        missing.push("an uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        missing.push("a number");
    }
    if !missing.is_empty() {
        return ValidationResult::invalid(format!(
            "Password must contain {}",
            join_with_and(&missing)
        ));
    }

    if has_triple_run(password) {
        return ValidationResult::invalid(
            "Password cannot repeat the same character three or more times in a row",
        );
    }

    ValidationResult::valid()
}

/// Accept or reject an upload from its declared metadata.
///
/// Checks, in order: size, extension, declared MIME type (skipped for
/// spreadsheets), path separators and double extensions. Nothing here looks
/// at file content.
pub fn validate_file_upload(file: &FileMetadata) -> ValidationResult {
    if file.size > MAX_UPLOAD_SIZE {
        debug!(name = %file.name, size = file.size, "Upload rejected: too large");
        return ValidationResult::invalid("File too large. Maximum 10MB allowed.");
    }

    let filename = file.name.to_lowercase();
    let extension = filename
        .rfind('.')
        .map_or(filename.as_str(), |idx| &filename[idx..]);

    if !ALLOWED_EXTENSIONS.contains(&extension) {
        debug!(name = %file.name, extension, "Upload rejected: extension");
        return ValidationResult::invalid(format!(
            "File type not allowed: {extension}. Use only: {}",
            ALLOWED_EXTENSIONS.join(", ")
        ));
    }

    if !SPREADSHEET_EXTENSIONS.contains(&extension)
        && !ALLOWED_MIME_TYPES.contains(&file.mime_type.as_str())
    {
        debug!(name = %file.name, mime = %file.mime_type, "Upload rejected: MIME type");
        return ValidationResult::invalid(
            "File type not allowed. Use only images, PDFs or spreadsheets.",
        );
    }

    if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
        debug!(name = %file.name, "Upload rejected: path characters");
        return ValidationResult::invalid("File name contains characters that are not allowed.");
    }

    if filename.split('.').count() > 2 {
        debug!(name = %file.name, "Upload rejected: multiple extensions");
        return ValidationResult::invalid("Files with multiple extensions are not allowed.");
    }

    ValidationResult::valid()
}

/// True only for parseable absolute `http`/`https` URLs.
pub fn is_valid_url(input: &str) -> bool {
    match url::Url::parse(input) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

fn has_triple_run(s: &str) -> bool {
    let chars: Vec<char> = s.chars().collect();
    chars.windows(3).any(|w| w[0] == w[1] && w[1] == w[2])
}

fn join_with_and(items: &[&str]) -> String {
    match items {
        [] => String::new(),
        [only] => (*only).to_string(),
        [init @ .., last] => format!("{} and {last}", init.join(", ")),
    }
}
