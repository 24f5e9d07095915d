//! Configuration types for Trellis compilation.
//!
//! All types implement [`serde::Deserialize`]; [`AppConfig::from_toml_str`]
//! loads them from TOML text. Every section and field is optional.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining layout and style settings.
//! - [`LayoutConfig`] - Track sizing, the default edge anchor and label spacing.
//! - [`StyleConfig`] - Default padding, gutter, sizes, fonts, strokes and shapes.
//!
//! # Example
//!
//! ```
//! # use trellis::config::AppConfig;
//! let config = AppConfig::from_toml_str(
//!     r#"
//!     [style]
//!     padding = { left = 4.0, right = 4.0 }
//!     font_size = 12.0
//!
//!     [layout]
//!     columns = "equal"
//!     "#,
//! )
//! .unwrap();
//! assert_eq!(config.style().font_size(), 12.0);
//! ```

use serde::Deserialize;

use trellis_core::{
    color::Color,
    draw::{ShapeKind, StrokeDefinition, TextDefinition},
    geometry::{Border, Size},
    ir::{Anchor, ClosestKind, Config, Gutter, TrackSize},
};
use trellis_eval::{EvaluateConfig, LineDefaults};

use crate::{TrellisError, compose::ComposeConfig};

/// Top-level configuration combining layout and style settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified layout and style configurations.
    pub fn new(layout: LayoutConfig, style: StyleConfig) -> Self {
        Self { layout, style }
    }

    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`TrellisError::Config`] for malformed TOML or values of the
    /// wrong type, including color strings that cannot be parsed.
    pub fn from_toml_str(source: &str) -> Result<Self, TrellisError> {
        Ok(toml::from_str(source)?)
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Defaults the evaluator starts every object, line and the root from.
    ///
    /// Objects receive the whole style section. The root region shares the
    /// gutter and track sizing but has no padding, minimum size, fill or
    /// shape of its own.
    pub fn evaluate_config(&self) -> EvaluateConfig {
        let style = &self.style;

        let mut root = Config::default();
        root.set_gutter(style.gutter);
        root.set_rows(self.layout.rows);
        root.set_columns(self.layout.columns);
        *root.text_mut() = style.text();

        let mut node = root.clone();
        node.set_padding(style.padding);
        node.set_min_size(style.min_size);
        node.set_fill(style.fill);
        node.set_shape(style.shape);
        *node.stroke_mut() = style.stroke();

        let line = LineDefaults::new(style.stroke(), style.text(), self.layout.edge_anchor);
        EvaluateConfig::new(node, root, line)
    }

    /// Knobs of the composer.
    pub fn compose_config(&self) -> ComposeConfig {
        ComposeConfig::new(self.layout.label_spacing)
    }
}

/// Grid and connector configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Track sizing of rows, e.g. `"packed"`, `"equal"` or `{ fixed = 40.0 }`.
    rows: TrackSize,

    /// Track sizing of columns.
    columns: TrackSize,

    /// Anchor of line endpoints that specify none.
    edge_anchor: Anchor,

    /// Vertical space between a node's label and its children.
    label_spacing: f32,
}

impl LayoutConfig {
    pub fn new(rows: TrackSize, columns: TrackSize, edge_anchor: Anchor, label_spacing: f32) -> Self {
        Self {
            rows,
            columns,
            edge_anchor,
            label_spacing,
        }
    }

    pub fn rows(&self) -> TrackSize {
        self.rows
    }

    pub fn columns(&self) -> TrackSize {
        self.columns
    }

    pub fn edge_anchor(&self) -> Anchor {
        self.edge_anchor
    }

    pub fn label_spacing(&self) -> f32 {
        self.label_spacing
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::new(
            TrackSize::Packed,
            TrackSize::Packed,
            Anchor::Closest(ClosestKind::Any),
            0.0,
        )
    }
}

/// Default visual style of objects and lines.
///
/// Dimensions default to zero so that composed geometry equals the declared
/// sizes unless configured otherwise.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    padding: Border,
    gutter: Gutter,
    min_size: Size,
    font_family: String,
    font_size: f32,
    stroke_color: Color,
    stroke_width: f32,
    fill: Option<Color>,
    shape: Option<ShapeKind>,
}

impl StyleConfig {
    pub fn padding(&self) -> Border {
        self.padding
    }

    pub fn gutter(&self) -> Gutter {
        self.gutter
    }

    pub fn min_size(&self) -> Size {
        self.min_size
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn fill(&self) -> Option<Color> {
        self.fill
    }

    pub fn shape(&self) -> Option<ShapeKind> {
        self.shape
    }

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

    pub fn with_shape(mut self, shape: ShapeKind) -> Self {
        self.shape = Some(shape);
        self
    }

    /// The default stroke of objects and lines.
    pub fn stroke(&self) -> StrokeDefinition {
        StrokeDefinition::new(self.stroke_color, self.stroke_width)
    }

    /// The default text style of labels.
    pub fn text(&self) -> TextDefinition {
        TextDefinition::new(self.font_family.clone(), self.font_size)
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        let text = TextDefinition::default();
        let stroke = StrokeDefinition::default();
        Self {
            padding: Border::default(),
            gutter: Gutter::default(),
            min_size: Size::default(),
            font_family: text.font_family().to_string(),
            font_size: text.font_size(),
            stroke_color: stroke.color(),
            stroke_width: stroke.width(),
            fill: None,
            shape: None,
        }
    }
}
