//! Error types for Trellis operations.
//!
//! Problems found in a document are [`Diagnostic`]s collected during
//! compilation. [`TrellisError`] covers the cases where a call produces no
//! usable result at all.
//!
//! [`Diagnostic`]: trellis_core::error::Diagnostic

use thiserror::Error;

use trellis_core::error::DiagnosticError;

/// The main error type for Trellis operations.
#[derive(Debug, Error)]
pub enum TrellisError {
    /// The host cancelled the compilation; partial results were discarded.
    #[error("compilation was cancelled")]
    Cancelled,

    /// The document produced at least one error diagnostic.
    #[error(transparent)]
    Invalid(#[from] DiagnosticError),

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}
