//! The composed output: ordered drawing commands in one coordinate space.

use crate::{
    color::Color,
    draw::{ShapeKind, StrokeDefinition, StyledText},
    geometry::{Bounds, Point, Size},
    ir::{ArrowDirection, EdgeId, NodeId},
    span::Span,
};

/// What a drawing command was produced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Owner {
    /// The document root region.
    Root,
    Node(NodeId),
    Edge(EdgeId),
}

/// Link from a drawing command back to the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Origin {
    owner: Owner,
    span: Span,
}

impl Origin {
    pub fn new(owner: Owner, span: Span) -> Self {
        Self { owner, span }
    }

    pub fn owner(&self) -> Owner {
        self.owner
    }

    pub fn span(&self) -> Span {
        self.span
    }
}

/// A filled and stroked shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeCommand {
    pub kind: ShapeKind,
    pub bounds: Bounds,
    /// Corner radius in global units; zero unless `kind` is a rounded rectangle.
    pub rounding: f32,
    pub fill: Option<Color>,
    pub stroke: StrokeDefinition,
    /// Accumulated scale of the node; renderers may use it for stroke widths.
    pub scale: f32,
    pub origin: Origin,
}

/// Text positioned inside its bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelCommand {
    pub bounds: Bounds,
    pub text: StyledText,
    /// Accumulated scale; the font is drawn at `font_size * scale`.
    pub scale: f32,
    pub origin: Origin,
}

/// A straight connector between two resolved points.
#[derive(Debug, Clone, PartialEq)]
pub struct LineCommand {
    pub start: Point,
    pub end: Point,
    pub stroke: StrokeDefinition,
    pub arrow: ArrowDirection,
    pub origin: Origin,
}

/// A single drawing instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Shape(ShapeCommand),
    Label(LabelCommand),
    Line(LineCommand),
}

impl DrawCommand {
    pub fn origin(&self) -> Origin {
        match self {
            DrawCommand::Shape(shape) => shape.origin,
            DrawCommand::Label(label) => label.origin,
            DrawCommand::Line(line) => line.origin,
        }
    }
}

/// The final artifact of a compilation.
///
/// Commands are ordered so that every container is drawn before its
/// children; painting them in order yields the correct stacking.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Diagram {
    commands: Vec<DrawCommand>,
    size: Size,
}

impl Diagram {
    pub fn new(commands: Vec<DrawCommand>, size: Size) -> Self {
        Self { commands, size }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn width(&self) -> f32 {
        self.size.width()
    }

    pub fn height(&self) -> f32 {
        self.size.height()
    }

    pub fn shapes(&self) -> impl Iterator<Item = &ShapeCommand> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Shape(shape) => Some(shape),
            _ => None,
        })
    }

    pub fn labels(&self) -> impl Iterator<Item = &LabelCommand> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Label(label) => Some(label),
            _ => None,
        })
    }

    pub fn lines(&self) -> impl Iterator<Item = &LineCommand> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Line(line) => Some(line),
            _ => None,
        })
    }

    /// Commands produced from one node or edge.
    pub fn commands_for(&self, owner: Owner) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(move |command| command.origin().owner() == owner)
    }
}
