//! Core types and error definitions for the sitelog workspace.
//!
//! This crate holds the pieces shared by every sitelog crate: the unified
//! error type and the accept/reject result returned by validators.
//!
//! # Main types
//!
//! - [`SitelogError`] — Unified error enum for all sitelog subsystems.
//! - [`SitelogResult`] — Convenience alias for `Result<T, SitelogError>`.
//! - [`ValidationResult`] — Accept/reject decision with a human-facing reason.

/// Error types.
pub mod error;
/// Validation outcome type.
pub mod validation;

pub use error::{SitelogError, SitelogResult};
pub use validation::ValidationResult;
