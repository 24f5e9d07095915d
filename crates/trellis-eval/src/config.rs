//! Defaults the evaluator starts from before applying classes and inline
//! attributes.

use trellis_core::{
    draw::{StrokeDefinition, TextDefinition},
    ir::{Anchor, ClosestKind, Config},
};

/// Default style of lines.
#[derive(Debug, Clone, PartialEq)]
pub struct LineDefaults {
    stroke: StrokeDefinition,
    text: TextDefinition,
    anchor: Anchor,
}

impl LineDefaults {
    pub fn new(stroke: StrokeDefinition, text: TextDefinition, anchor: Anchor) -> Self {
        Self {
            stroke,
            text,
            anchor,
        }
    }

    pub fn stroke(&self) -> &StrokeDefinition {
        &self.stroke
    }

    pub fn text(&self) -> &TextDefinition {
        &self.text
    }

    /// Anchor used by endpoints that specify none.
    pub fn anchor(&self) -> Anchor {
        self.anchor
    }
}

impl Default for LineDefaults {
    /// Lines attach to the closest anchor of each node unless told otherwise.
    fn default() -> Self {
        Self::new(
            StrokeDefinition::default(),
            TextDefinition::default(),
            Anchor::Closest(ClosestKind::Any),
        )
    }
}

/// Configuration of an [`Evaluator`](crate::Evaluator).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvaluateConfig {
    node: Config,
    root: Config,
    line: LineDefaults,
}

impl EvaluateConfig {
    pub fn new(node: Config, root: Config, line: LineDefaults) -> Self {
        Self { node, root, line }
    }

    /// Starting configuration of every object.
    pub fn node(&self) -> &Config {
        &self.node
    }

    /// Starting configuration of the document root.
    pub fn root(&self) -> &Config {
        &self.root
    }

    pub fn line(&self) -> &LineDefaults {
        &self.line
    }
}
