//! Evaluation of Trellis declaration trees.
//!
//! The [`Evaluator`] turns a typed [`decl::Document`] into the IR defined in
//! [`trellis_core::ir`]:
//!
//! - classes are applied in mixin order, parents depth-first, with inline
//!   attributes taking precedence;
//! - class default bodies are instantiated into every instance;
//! - line endpoints are resolved through lexical scopes, looking through
//!   anonymous nodes but never into named ones.
//!
//! Problems are reported into a caller-owned
//! [`DiagnosticCollector`]; evaluation always returns a best-effort tree.
//!
//! ```
//! use trellis_core::{error::DiagnosticCollector, ir::ArrowDirection, span::{Name, Span}};
//! use trellis_eval::{Evaluator, decl::{Document, EndpointRef, LineDecl, ObjectDecl}};
//!
//! let name = |s: &str| Name::new(s, Span::default());
//! let document = Document::new()
//!     .with(ObjectDecl::new(Span::default()).named(name("a")))
//!     .with(ObjectDecl::new(Span::default()).named(name("b")))
//!     .with(
//!         LineDecl::new(EndpointRef::new(name("a")), Span::default())
//!             .to(ArrowDirection::Forward, EndpointRef::new(name("b"))),
//!     );
//!
//! let mut diagnostics = DiagnosticCollector::new();
//! let evaluation = Evaluator::default().evaluate(&document, &mut diagnostics);
//! assert!(evaluation.is_valid());
//! assert_eq!(evaluation.root().edges().count(), 1);
//! ```

mod attributes;
mod classes;
mod config;
pub mod decl;
mod expand;
mod lower;
mod scope;

use log::info;
use trellis_core::{error::DiagnosticCollector, ir::Region};

pub use config::{EvaluateConfig, LineDefaults};

use crate::{expand::Expander, lower::Lowerer};

/// Result of evaluating a document.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    root: Region,
    valid: bool,
}

impl Evaluation {
    /// The root region of the IR tree.
    pub fn root(&self) -> &Region {
        &self.root
    }

    /// True if evaluation reported no error. Otherwise the tree is a
    /// best-effort approximation that omits the failing parts.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn into_root(self) -> Region {
        self.root
    }
}

/// Resolves classes and scopes of a declaration tree into IR.
///
/// An evaluator holds no state between calls; the same instance can
/// evaluate any number of documents.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    config: EvaluateConfig,
}

impl Evaluator {
    pub fn new(config: EvaluateConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EvaluateConfig {
        &self.config
    }

    pub fn evaluate(
        &self,
        document: &decl::Document,
        diagnostics: &mut DiagnosticCollector,
    ) -> Evaluation {
        info!(declarations = document.declarations().len(); "Evaluating document");
        let errors_before = diagnostics.error_count();

        let mut expander = Expander::new(&self.config, diagnostics);
        let (root_config, expanded) = expander.expand_document(document);
        let (scopes, reports) = expander.finish();

        let mut lowerer = Lowerer::new(&scopes, self.config.line(), reports, diagnostics);
        let root = lowerer.lower_region(root_config, expanded);
        let edges = lowerer.edge_count();

        let valid = diagnostics.error_count() == errors_before;
        info!(edges, valid; "Evaluation finished");
        Evaluation { root, valid }
    }
}
