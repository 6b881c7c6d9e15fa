//! Input-hardening primitives for the sitelog dashboard.
//!
//! Everything that touches untrusted input at the edges (forms, uploads,
//! login, free-text fields) goes through this crate before it reaches storage.
//!
//! # Main items
//!
//! - [`sanitize`], [`sanitize_content`], [`sanitize_file_name`] — strip dangerous text.
//! - [`is_valid_email`], [`validate_password`], [`validate_file_upload`], [`is_valid_url`] — accept/reject checks.
//! - [`AuthRateLimiter`] — per-identifier login attempt limiter with injectable store and clock.
//! - [`generate_secure_token`] — CSPRNG-backed hex token.

/// Time sources for the rate limiter.
pub mod clock;
/// Rate limiter configuration.
pub mod policy;
/// Authentication attempt rate limiting.
pub mod rate_limit;
/// Text, content and file name sanitizers.
pub mod sanitizer;
/// Secure random tokens.
pub mod token;
/// E-mail, password, upload and URL validators.
pub mod validation;

pub use clock::{Clock, ManualClock, SystemClock};
pub use policy::RateLimitPolicy;
pub use rate_limit::{
    check_auth_rate_limit, reset_auth_rate_limit, AuthRateLimiter, InMemoryRateLimitStore,
    RateLimitDecision, RateLimitEntry, RateLimitStore,
};
pub use sanitizer::{
    sanitize, sanitize_content, sanitize_file_name, sanitize_json, sanitize_value,
};
pub use sitelog_core::ValidationResult;
pub use token::generate_secure_token;
pub use validation::{
    is_valid_email, is_valid_url, validate_file_upload, validate_password, FileMetadata,
};
