//! Diagnostics shared by every compilation stage.
//!
//! The [`Diagnostic`] type describes a single error or warning with an
//! optional [`ErrorCode`], labeled source spans and help text. Stages report
//! into a caller-owned [`DiagnosticCollector`] so that one bad declaration
//! never hides the problems in its siblings.
//!
//! # Example
//!
//! ```
//! # use trellis_core::error::{Diagnostic, DiagnosticCollector, ErrorCode};
//! # use trellis_core::span::Span;
//! let mut collector = DiagnosticCollector::new();
//! collector.emit(
//!     Diagnostic::error("cannot find `db` in this scope")
//!         .with_code(ErrorCode::E100)
//!         .with_label(Span::new(12..14), "not found")
//!         .with_help("named nodes hide the names declared inside them"),
//! );
//! assert!(!collector.is_valid());
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod severity;

pub use collector::{DiagnosticCollector, DiagnosticError};
pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use severity::Severity;
