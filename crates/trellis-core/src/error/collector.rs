//! Collector for accumulating diagnostics across compilation stages.

use thiserror::Error;

use crate::error::Diagnostic;

/// A caller-owned sink for diagnostics.
///
/// Stages receive the collector by `&mut` and keep going after reporting a
/// problem. There is no global collector; concurrent compilations each own
/// one.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
    error_count: usize,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a diagnostic to this collector.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        if diagnostic.severity().is_error() {
            self.error_count += 1;
        }
        self.diagnostics.push(diagnostic);
    }

    /// Number of error-severity diagnostics emitted so far.
    ///
    /// Stages compare the count before and after their run to tell whether
    /// their own output is fully valid.
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Returns true if no error has been emitted.
    pub fn is_valid(&self) -> bool {
        self.error_count == 0
    }

    /// All diagnostics in emission order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Finish collection.
    ///
    /// Returns the warnings when no error was emitted, otherwise a
    /// [`DiagnosticError`] carrying every diagnostic.
    pub fn finish(self) -> Result<Vec<Diagnostic>, DiagnosticError> {
        if self.error_count > 0 {
            Err(DiagnosticError::new(self.diagnostics))
        } else {
            Ok(self.diagnostics)
        }
    }
}

/// One or more diagnostics, at least one of which is an error.
#[derive(Debug, Clone, Error)]
#[error("{}", summary(&self.diagnostics))]
pub struct DiagnosticError {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticError {
    pub fn new(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Iterates over the error-severity diagnostics only.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity().is_error())
    }
}

/// The first error, followed by how many more there are.
fn summary(diagnostics: &[Diagnostic]) -> String {
    let mut errors = diagnostics.iter().filter(|diag| diag.severity().is_error());
    match errors.next() {
        Some(first) => {
            let rest = errors.count();
            if rest > 0 {
                format!("{first} (+{rest} more)")
            } else {
                first.to_string()
            }
        }
        None => "compilation failed".to_string(),
    }
}
