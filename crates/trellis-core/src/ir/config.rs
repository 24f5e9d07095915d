//! Resolved style and layout attributes.

use serde::Deserialize;

use crate::{
    color::Color,
    draw::{ShapeKind, StrokeDefinition, TextDefinition},
    geometry::{Border, Size},
};

/// How the tracks along one axis of a region are sized.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackSize {
    /// Each track is as large as its largest node.
    #[default]
    Packed,
    /// Every track is as large as the largest track on the axis.
    Equal,
    /// Every track has exactly this size.
    Fixed(f32),
}

impl TrackSize {
    /// Returns false for a `Fixed` size that is negative or not finite.
    pub fn is_valid(self) -> bool {
        match self {
            TrackSize::Fixed(value) => value.is_finite() && value >= 0.0,
            TrackSize::Packed | TrackSize::Equal => true,
        }
    }
}

/// Spacing between adjacent rows and between adjacent columns.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Gutter {
    row: f32,
    column: f32,
}

impl Gutter {
    pub fn new(row: f32, column: f32) -> Self {
        Self { row, column }
    }

    /// Same spacing in both directions.
    pub fn uniform(value: f32) -> Self {
        Self::new(value, value)
    }

    /// Vertical space between rows.
    pub fn row(self) -> f32 {
        self.row
    }

    /// Horizontal space between columns.
    pub fn column(self) -> f32 {
        self.column
    }

    pub fn is_valid(self) -> bool {
        self.row.is_finite() && self.column.is_finite() && self.row >= 0.0 && self.column >= 0.0
    }
}

/// Placement of a node along one axis of a cell larger than the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisAlign {
    Start,
    #[default]
    Center,
    End,
}

impl AxisAlign {
    /// Offset of the node inside `free` units of leftover space.
    pub fn offset(self, free: f32) -> f32 {
        let free = free.max(0.0);
        match self {
            AxisAlign::Start => 0.0,
            AxisAlign::Center => free / 2.0,
            AxisAlign::End => free,
        }
    }
}

/// Placement of a node inside its grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct Alignment {
    horizontal: AxisAlign,
    vertical: AxisAlign,
}

impl Alignment {
    pub fn new(horizontal: AxisAlign, vertical: AxisAlign) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    pub fn horizontal(self) -> AxisAlign {
        self.horizontal
    }

    pub fn vertical(self) -> AxisAlign {
        self.vertical
    }
}

/// The merged attributes of a region or node.
///
/// All values are already resolved: class inheritance and inline overrides
/// have been applied, and every field holds its final value.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    fill: Option<Color>,
    stroke: StrokeDefinition,
    label: Option<String>,
    text: TextDefinition,
    shape: Option<ShapeKind>,
    rounding: f32,
    padding: Border,
    gutter: Gutter,
    rows: TrackSize,
    columns: TrackSize,
    scale: f32,
    alignment: Alignment,
    min_size: Size,
    row: Option<i32>,
    column: Option<i32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fill: None,
            stroke: StrokeDefinition::default(),
            label: None,
            text: TextDefinition::default(),
            shape: None,
            rounding: 0.0,
            padding: Border::default(),
            gutter: Gutter::default(),
            rows: TrackSize::Packed,
            columns: TrackSize::Packed,
            scale: 1.0,
            alignment: Alignment::default(),
            min_size: Size::default(),
            row: None,
            column: None,
        }
    }
}

impl Config {
    pub fn fill(&self) -> Option<Color> {
        self.fill
    }

    pub fn stroke(&self) -> &StrokeDefinition {
        &self.stroke
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn text(&self) -> &TextDefinition {
        &self.text
    }

    /// The drawn shape, or `None` for a node that only groups its children.
    pub fn shape(&self) -> Option<ShapeKind> {
        self.shape
    }

    /// Corner radius used by rounded rectangles.
    pub fn rounding(&self) -> f32 {
        self.rounding
    }

    pub fn padding(&self) -> Border {
        self.padding
    }

    pub fn gutter(&self) -> Gutter {
        self.gutter
    }

    /// Track sizing along the vertical axis.
    pub fn rows(&self) -> TrackSize {
        self.rows
    }

    /// Track sizing along the horizontal axis.
    pub fn columns(&self) -> TrackSize {
        self.columns
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    pub fn min_size(&self) -> Size {
        self.min_size
    }

    /// Explicit grid row, if one was declared.
    pub fn row(&self) -> Option<i32> {
        self.row
    }

    /// Explicit grid column, if one was declared.
    pub fn column(&self) -> Option<i32> {
        self.column
    }

    pub fn stroke_mut(&mut self) -> &mut StrokeDefinition {
        &mut self.stroke
    }

    pub fn text_mut(&mut self) -> &mut TextDefinition {
        &mut self.text
    }

    pub fn set_fill(&mut self, fill: Option<Color>) {
        self.fill = fill;
    }

    pub fn set_label(&mut self, label: Option<String>) {
        self.label = label;
    }

    pub fn set_shape(&mut self, shape: Option<ShapeKind>) {
        self.shape = shape;
    }

    pub fn set_rounding(&mut self, rounding: f32) {
        self.rounding = rounding;
    }

    pub fn set_padding(&mut self, padding: Border) {
        self.padding = padding;
    }

    pub fn set_gutter(&mut self, gutter: Gutter) {
        self.gutter = gutter;
    }

    pub fn set_rows(&mut self, rows: TrackSize) {
        self.rows = rows;
    }

    pub fn set_columns(&mut self, columns: TrackSize) {
        self.columns = columns;
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
    }

    pub fn set_alignment(&mut self, alignment: Alignment) {
        self.alignment = alignment;
    }

    pub fn set_min_size(&mut self, min_size: Size) {
        self.min_size = min_size;
    }

    pub fn set_row(&mut self, row: Option<i32>) {
        self.row = row;
    }

    pub fn set_column(&mut self, column: Option<i32>) {
        self.column = column;
    }

    /// Builder form of [`Config::set_padding`].
    pub fn with_padding(mut self, padding: Border) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_gutter(mut self, gutter: Gutter) -> Self {
        self.gutter = gutter;
        self
    }

    pub fn with_min_size(mut self, min_size: Size) -> Self {
        self.min_size = min_size;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_cell(mut self, row: Option<i32>, column: Option<i32>) -> Self {
        self.row = row;
        self.column = column;
        self
    }

    pub fn with_shape(mut self, shape: ShapeKind) -> Self {
        self.shape = Some(shape);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_tracks(mut self, rows: TrackSize, columns: TrackSize) -> Self {
        self.rows = rows;
        self.columns = columns;
        self
    }
}
