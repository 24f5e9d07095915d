//! Trellis - compiles class-based diagram declarations into drawable geometry.
//!
//! A [`Compiler`] runs two stages over a typed declaration tree:
//!
//! 1. the evaluator ([`trellis_eval`]) resolves classes and scopes into an
//!    IR of regions, nodes and edges;
//! 2. the [`compose::Composer`] places every node on its region's grid,
//!    resolves edge anchors and emits a [`draw::Diagram`].
//!
//! Parsing source text is left to the host; see [`decl`] for the input.
//!
//! ```
//! use trellis::{
//!     Compiler,
//!     config::AppConfig,
//!     decl::{Attribute, AttributeValue, Document, EndpointRef, LineDecl, ObjectDecl},
//!     draw::MonospaceMeasure,
//!     geometry::Size,
//!     ir::ArrowDirection,
//!     span::{Name, Span},
//! };
//!
//! let name = |s: &str| Name::new(s, Span::default());
//! let square = Attribute::new(AttributeValue::MinSize(Size::new(10.0, 10.0)), Span::default());
//! let document = Document::new()
//!     .with(ObjectDecl::new(Span::default()).named(name("a")).with_attribute(square.clone()))
//!     .with(ObjectDecl::new(Span::default()).named(name("b")).with_attribute(square))
//!     .with(
//!         LineDecl::new(EndpointRef::new(name("a")), Span::default())
//!             .to(ArrowDirection::Forward, EndpointRef::new(name("b"))),
//!     );
//!
//! let compiler = Compiler::with_text_measure(AppConfig::default(), MonospaceMeasure::default());
//! let compilation = compiler.compile(&document).unwrap();
//! assert!(compilation.is_valid());
//! assert_eq!(compilation.diagram().size(), Size::new(20.0, 10.0));
//! ```

pub mod compose;
pub mod config;
pub mod lookup;
pub mod report;

mod cancel;
mod error;

pub use trellis_core::{color, draw, geometry, ir, span};
pub use trellis_eval::{Evaluation, decl};

pub use cancel::CancellationToken;
pub use error::TrellisError;

use log::{debug, info};

use trellis_core::{
    draw::{CosmicTextMeasure, Diagram, TextMeasure},
    error::{Diagnostic, DiagnosticCollector},
    ir::Region,
};
use trellis_eval::Evaluator;

use compose::Composer;
use config::AppConfig;

/// The outcome of a best-effort compilation.
#[derive(Debug, Clone, PartialEq)]
pub struct Compilation {
    diagram: Diagram,
    diagnostics: Vec<Diagnostic>,
    valid: bool,
}

impl Compilation {
    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    /// Every diagnostic of both stages, in the order they were reported.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// True if no error was reported. Otherwise the diagram omits or
    /// defaults the parts that failed.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn into_parts(self) -> (Diagram, Vec<Diagnostic>, bool) {
        (self.diagram, self.diagnostics, self.valid)
    }
}

/// Compiles declaration trees into diagrams.
///
/// A compiler owns its configuration and text measurement; it keeps no
/// state between compilations.
pub struct Compiler {
    config: AppConfig,
    measure: Box<dyn TextMeasure>,
    cancel: CancellationToken,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl Compiler {
    /// Creates a compiler measuring labels with system fonts.
    pub fn new(config: AppConfig) -> Self {
        Self::with_text_measure(config, CosmicTextMeasure::new())
    }

    /// Creates a compiler with a custom text measurement, e.g. a
    /// deterministic one for headless hosts.
    pub fn with_text_measure(config: AppConfig, measure: impl TextMeasure + 'static) -> Self {
        Self {
            config,
            measure: Box::new(measure),
            cancel: CancellationToken::new(),
        }
    }

    /// Lets a host stop compilations through `token`.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Runs the evaluator alone.
    pub fn evaluate(
        &self,
        document: &decl::Document,
        diagnostics: &mut DiagnosticCollector,
    ) -> Evaluation {
        Evaluator::new(self.config.evaluate_config()).evaluate(document, diagnostics)
    }

    /// Runs the composer alone, on any IR tree.
    ///
    /// # Errors
    ///
    /// Returns [`TrellisError::Cancelled`] if the compilation was cancelled.
    pub fn compose(
        &self,
        root: &Region,
        diagnostics: &mut DiagnosticCollector,
    ) -> Result<Diagram, TrellisError> {
        Composer::new(self.config.compose_config(), self.measure.as_ref())
            .with_cancellation(self.cancel.clone())
            .compose(root, diagnostics)
    }

    /// Evaluates and composes `document`, keeping going past errors.
    ///
    /// # Errors
    ///
    /// Returns [`TrellisError::Cancelled`] if the compilation was cancelled;
    /// problems in the document are reported in the [`Compilation`].
    pub fn compile(&self, document: &decl::Document) -> Result<Compilation, TrellisError> {
        info!("Compiling document");
        let mut diagnostics = DiagnosticCollector::new();

        let evaluation = self.evaluate(document, &mut diagnostics);
        debug!(valid = evaluation.is_valid(); "Document evaluated");
        self.cancel.check()?;

        let diagram = self.compose(evaluation.root(), &mut diagnostics)?;
        let valid = diagnostics.is_valid();
        info!(valid, diagnostics = diagnostics.diagnostics().len(); "Document compiled");

        Ok(Compilation {
            diagram,
            diagnostics: diagnostics.into_diagnostics(),
            valid,
        })
    }

    /// Like [`compile`](Self::compile), but fails on any error diagnostic.
    ///
    /// On success, returns the diagram and the warnings.
    ///
    /// # Errors
    ///
    /// Returns [`TrellisError::Invalid`] carrying every diagnostic if one of
    /// them is an error, or [`TrellisError::Cancelled`].
    pub fn compile_strict(
        &self,
        document: &decl::Document,
    ) -> Result<(Diagram, Vec<Diagnostic>), TrellisError> {
        let mut diagnostics = DiagnosticCollector::new();
        let evaluation = self.evaluate(document, &mut diagnostics);
        self.cancel.check()?;
        let diagram = self.compose(evaluation.root(), &mut diagnostics)?;
        let warnings = diagnostics.finish()?;
        Ok((diagram, warnings))
    }
}

impl std::fmt::Debug for Compiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compiler")
            .field("config", &self.config)
            .field("cancel", &self.cancel)
            .finish_non_exhaustive()
    }
}
