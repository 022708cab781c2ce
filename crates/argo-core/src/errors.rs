//! Cross-cutting error types for Argo.
//!
//! Domain-specific errors (`QueryError`, `SearchError`, `ApiError`) live in
//! their respective crates.

use thiserror::Error;

/// Errors that can be raised by any Argo crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A resource name did not match any known resource kind.
    #[error("Unknown resource type: {0}")]
    UnknownResource(String),

    /// Data failed validation (configuration, field maps, constraints).
    #[error("Validation error: {0}")]
    Validation(String),
}
