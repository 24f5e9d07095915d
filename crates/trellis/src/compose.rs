//! Composition of an IR tree into positioned drawing commands.
//!
//! Composition runs in three passes:
//!
//! 1. sizing, bottom-up: every container is sized from its label and its
//!    child grid, and children are positioned in local units;
//! 2. placement, top-down: local positions become global bounds, with
//!    scales multiplied down the ancestor chain;
//! 3. emission: shapes and labels of each container, then its children and
//!    edges in declaration order.
//!
//! Problems are reported as diagnostics and the affected part falls back to
//! safe defaults; only cancellation aborts a composition.

mod anchor;
mod emit;
mod grid;
mod measure;
mod place;

use log::{info, trace};
use trellis_core::{
    draw::{Diagram, TextMeasure},
    error::DiagnosticCollector,
    ir::Region,
};

use crate::{CancellationToken, TrellisError};

use emit::Emitter;
use measure::Measurer;
use place::Placement;

/// Tunables of the [`Composer`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ComposeConfig {
    label_spacing: f32,
}

impl ComposeConfig {
    pub fn new(label_spacing: f32) -> Self {
        Self { label_spacing }
    }

    /// Vertical space between a node's label and the grid of its children.
    pub fn label_spacing(&self) -> f32 {
        self.label_spacing
    }
}

/// Turns IR trees into [`Diagram`]s.
///
/// The composer is stateless between calls; composing the same tree twice
/// yields the same commands.
pub struct Composer<'m> {
    config: ComposeConfig,
    measure: &'m dyn TextMeasure,
    cancel: CancellationToken,
}

impl<'m> Composer<'m> {
    pub fn new(config: ComposeConfig, measure: &'m dyn TextMeasure) -> Self {
        Self {
            config,
            measure,
            cancel: CancellationToken::new(),
        }
    }

    /// Polls `token` between sibling nodes.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Composes the tree rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`TrellisError::Cancelled`] if the cancellation token fires;
    /// every other problem is reported into `diagnostics`.
    pub fn compose(
        &self,
        root: &Region,
        diagnostics: &mut DiagnosticCollector,
    ) -> Result<Diagram, TrellisError> {
        info!(entities = root.entities().len(); "Composing diagram");
        self.cancel.check()?;

        let frame = Measurer::new(
            self.measure,
            self.config.label_spacing(),
            &self.cancel,
            diagnostics,
        )
        .frame(root.config(), root, None)?;
        let placement = Placement::new(root, &frame);
        let size = placement.root().bounds.to_size();

        let commands =
            Emitter::new(&placement, self.measure, &self.cancel, diagnostics).emit(root)?;
        trace!(commands:? = commands; "Emitted commands");
        info!(
            commands = commands.len(),
            width = size.width(),
            height = size.height();
            "Diagram composed"
        );
        Ok(Diagram::new(commands, size))
    }
}

impl std::fmt::Debug for Composer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Composer")
            .field("config", &self.config)
            .field("cancel", &self.cancel)
            .finish_non_exhaustive()
    }
}
