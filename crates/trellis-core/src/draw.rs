//! Drawing definitions and the composed [`Diagram`].

mod diagram;
mod shape;
mod stroke;
mod text;

pub use diagram::{Diagram, DrawCommand, LabelCommand, LineCommand, Origin, Owner, ShapeCommand};
pub use shape::{ShapeKind, rectangle_table};
pub use stroke::{StrokeDefinition, StrokeStyle};
pub use text::{CosmicTextMeasure, MonospaceMeasure, StyledText, TextDefinition, TextMeasure};
