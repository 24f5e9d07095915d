//! Attribute validation, precedence merging and application.
//!
//! Merging builds an ordered map keyed by [`AttributeKey`]: classes are
//! applied first in mixin order, inline attributes last. A later value for
//! the same key replaces the earlier one.

use indexmap::IndexMap;
use log::trace;
use trellis_core::{
    draw::{StrokeDefinition, StyledText, TextDefinition},
    error::{Diagnostic, DiagnosticCollector, ErrorCode},
    geometry::Point,
    ir::{Anchor, Config},
    span::Name,
};

use crate::{
    config::LineDefaults,
    decl::{Attribute, AttributeKey, AttributeValue},
};

/// The kind of declaration attributes are applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Target {
    Object,
    Line,
}

impl Target {
    fn accepts(self, key: AttributeKey) -> bool {
        match self {
            Target::Object => key.applies_to_objects(),
            Target::Line => key.applies_to_lines(),
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Target::Object => "objects",
            Target::Line => "lines",
        }
    }
}

/// Checks a value against the constraints of its attribute.
pub(crate) fn validate(value: &AttributeValue) -> Result<(), String> {
    let non_negative = |what: &str, v: f32| {
        if v.is_finite() && v >= 0.0 {
            Ok(())
        } else {
            Err(format!("{what} must be a finite, non-negative number, found {v}"))
        }
    };

    match value {
        AttributeValue::StrokeWidth(v) => non_negative("stroke width", *v),
        AttributeValue::Rounding(v) => non_negative("rounding", *v),
        AttributeValue::FontSize(v) | AttributeValue::Scale(v) => {
            if v.is_finite() && *v > 0.0 {
                Ok(())
            } else {
                Err(format!("{} must be a positive number, found {v}", value.key()))
            }
        }
        AttributeValue::Padding(border) if !border.is_valid() => {
            Err("padding must be finite and non-negative on every side".to_string())
        }
        AttributeValue::Gutter(gutter) if !gutter.is_valid() => {
            Err("gutter must be finite and non-negative".to_string())
        }
        AttributeValue::Rows(track) | AttributeValue::Columns(track) if !track.is_valid() => {
            Err(format!("{} track size must be finite and non-negative", value.key()))
        }
        AttributeValue::MinSize(size) if !size.is_valid() => {
            Err("minimum size must be finite and non-negative".to_string())
        }
        AttributeValue::StartOffset(point) | AttributeValue::EndOffset(point)
            if !point.is_finite() =>
        {
            Err(format!("{} must be finite", value.key()))
        }
        _ => Ok(()),
    }
}

/// Returns the attributes that pass validation, reporting the others.
pub(crate) fn validated<'a>(
    attributes: &'a [Attribute],
    diagnostics: &mut DiagnosticCollector,
) -> Vec<&'a Attribute> {
    attributes
        .iter()
        .filter(|attribute| match validate(attribute.value()) {
            Ok(()) => true,
            Err(message) => {
                diagnostics.emit(
                    Diagnostic::error(format!("invalid value for `{}`", attribute.key()))
                        .with_code(ErrorCode::E400)
                        .with_label(attribute.span(), message),
                );
                false
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy)]
struct Provided<'a> {
    attribute: &'a Attribute,
    class: Option<&'a Name>,
}

/// Effective attributes of one declaration.
#[derive(Debug, Default)]
pub(crate) struct AttributeMap<'a> {
    values: IndexMap<AttributeKey, Provided<'a>>,
}

impl<'a> AttributeMap<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one class's own (already validated) attributes.
    pub fn apply_class(&mut self, class: &'a Name, attributes: &[&'a Attribute]) {
        for &attribute in attributes {
            self.values.insert(
                attribute.key(),
                Provided {
                    attribute,
                    class: Some(class),
                },
            );
        }
    }

    /// Applies inline attributes, which take precedence over every class.
    pub fn apply_inline(
        &mut self,
        attributes: &'a [Attribute],
        target: Target,
        diagnostics: &mut DiagnosticCollector,
    ) {
        for attribute in validated(attributes, diagnostics) {
            let key = attribute.key();
            if !target.accepts(key) {
                diagnostics.emit(
                    Diagnostic::warning(format!(
                        "attribute `{key}` has no effect on {}",
                        target.describe()
                    ))
                    .with_code(ErrorCode::W401)
                    .with_label(attribute.span(), "ignored"),
                );
                continue;
            }

            let previous = self.values.insert(
                key,
                Provided {
                    attribute,
                    class: None,
                },
            );
            if let Some(Provided {
                attribute: overridden,
                class: Some(class),
            }) = previous
            {
                diagnostics.emit(
                    Diagnostic::warning(format!(
                        "`{key}` overrides the value inherited from class `{class}`"
                    ))
                    .with_code(ErrorCode::W400)
                    .with_label(attribute.span(), "inline value wins")
                    .with_secondary_label(overridden.span(), "class value"),
                );
            }
        }
        trace!(attributes = self.values.len(); "Merged attributes");
    }

    fn values(&self, target: Target) -> impl Iterator<Item = &'a AttributeValue> + '_ {
        self.values
            .iter()
            .filter(move |(key, _)| target.accepts(**key))
            .map(|(_, provided)| provided.attribute.value())
    }

    /// Applies the merged attributes on top of `base`.
    pub fn node_config(&self, base: &Config) -> Config {
        let mut config = base.clone();
        for value in self.values(Target::Object) {
            match value {
                AttributeValue::Fill(color) => config.set_fill(Some(*color)),
                AttributeValue::Stroke(color) => config.stroke_mut().set_color(*color),
                AttributeValue::StrokeWidth(width) => config.stroke_mut().set_width(*width),
                AttributeValue::StrokeStyle(style) => config.stroke_mut().set_style(style.clone()),
                AttributeValue::Label(label) => config.set_label(Some(label.clone())),
                AttributeValue::FontFamily(family) => config.text_mut().set_font_family(family),
                AttributeValue::FontSize(size) => config.text_mut().set_font_size(*size),
                AttributeValue::TextColor(color) => config.text_mut().set_color(Some(*color)),
                AttributeValue::Shape(shape) => config.set_shape(*shape),
                AttributeValue::Rounding(rounding) => config.set_rounding(*rounding),
                AttributeValue::Padding(padding) => config.set_padding(*padding),
                AttributeValue::Gutter(gutter) => config.set_gutter(*gutter),
                AttributeValue::Rows(rows) => config.set_rows(*rows),
                AttributeValue::Columns(columns) => config.set_columns(*columns),
                AttributeValue::Scale(scale) => config.set_scale(*scale),
                AttributeValue::Align(alignment) => config.set_alignment(*alignment),
                AttributeValue::MinSize(size) => config.set_min_size(*size),
                AttributeValue::Row(row) => config.set_row(Some(*row)),
                AttributeValue::Column(column) => config.set_column(Some(*column)),
                AttributeValue::Anchor(_)
                | AttributeValue::StartAnchor(_)
                | AttributeValue::EndAnchor(_)
                | AttributeValue::StartOffset(_)
                | AttributeValue::EndOffset(_) => {}
            }
        }
        config
    }

    /// Applies the merged attributes on top of the line defaults.
    pub fn line_style(&self, defaults: &LineDefaults) -> LineStyle {
        let mut style = LineStyle {
            stroke: defaults.stroke().clone(),
            text: defaults.text().clone(),
            label: None,
            anchor: None,
            start_anchor: None,
            end_anchor: None,
            start_offset: None,
            end_offset: None,
        };
        for value in self.values(Target::Line) {
            match value {
                AttributeValue::Stroke(color) => style.stroke.set_color(*color),
                AttributeValue::StrokeWidth(width) => style.stroke.set_width(*width),
                AttributeValue::StrokeStyle(s) => style.stroke.set_style(s.clone()),
                AttributeValue::Label(label) => style.label = Some(label.clone()),
                AttributeValue::FontFamily(family) => style.text.set_font_family(family),
                AttributeValue::FontSize(size) => style.text.set_font_size(*size),
                AttributeValue::TextColor(color) => style.text.set_color(Some(*color)),
                AttributeValue::Anchor(anchor) => style.anchor = Some(*anchor),
                AttributeValue::StartAnchor(anchor) => style.start_anchor = Some(*anchor),
                AttributeValue::EndAnchor(anchor) => style.end_anchor = Some(*anchor),
                AttributeValue::StartOffset(offset) => style.start_offset = Some(*offset),
                AttributeValue::EndOffset(offset) => style.end_offset = Some(*offset),
                _ => {}
            }
        }
        style
    }
}

/// Resolved style of a line declaration, shared by every edge of its chain.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LineStyle {
    pub stroke: StrokeDefinition,
    pub text: TextDefinition,
    pub label: Option<String>,
    anchor: Option<Anchor>,
    start_anchor: Option<Anchor>,
    end_anchor: Option<Anchor>,
    start_offset: Option<Point>,
    end_offset: Option<Point>,
}

impl LineStyle {
    /// Anchor of the source end of an edge; `start_anchor` beats `anchor`.
    pub fn start_anchor(&self) -> Option<Anchor> {
        self.start_anchor.or(self.anchor)
    }

    pub fn end_anchor(&self) -> Option<Anchor> {
        self.end_anchor.or(self.anchor)
    }

    pub fn start_offset(&self) -> Option<Point> {
        self.start_offset
    }

    pub fn end_offset(&self) -> Option<Point> {
        self.end_offset
    }

    pub fn styled_label(&self) -> Option<StyledText> {
        self.label
            .as_ref()
            .map(|label| StyledText::new(label.clone(), self.text.clone()))
    }
}

#[cfg(test)]
mod tests {
    use trellis_core::{
        color::Color,
        draw::ShapeKind,
        geometry::Border,
        ir::{ClosestKind, Compass},
        span::Span,
    };

    use super::*;

    fn attr(value: AttributeValue, at: usize) -> Attribute {
        Attribute::new(value, Span::new(at..at + 1))
    }

    fn red() -> Color {
        Color::new("red").unwrap()
    }

    fn blue() -> Color {
        Color::new("blue").unwrap()
    }

    #[test]
    fn test_later_class_overrides_earlier() {
        let first_name = Name::new("first", Span::default());
        let second_name = Name::new("second", Span::default());
        let first = [attr(AttributeValue::Fill(red()), 0)];
        let second = [attr(AttributeValue::Fill(blue()), 5)];

        let mut map = AttributeMap::new();
        map.apply_class(&first_name, &first.iter().collect::<Vec<_>>());
        map.apply_class(&second_name, &second.iter().collect::<Vec<_>>());

        let config = map.node_config(&Config::default());
        assert_eq!(config.fill(), Some(blue()));
    }

    #[test]
    fn test_inline_wins_and_warns() {
        let class_name = Name::new("styled", Span::default());
        let class_attrs = [attr(AttributeValue::Fill(red()), 0)];
        let inline = [attr(AttributeValue::Fill(blue()), 10)];

        let mut diagnostics = DiagnosticCollector::new();
        let mut map = AttributeMap::new();
        map.apply_class(&class_name, &class_attrs.iter().collect::<Vec<_>>());
        map.apply_inline(&inline, Target::Object, &mut diagnostics);

        assert_eq!(map.node_config(&Config::default()).fill(), Some(blue()));
        assert!(diagnostics.is_valid());
        let diags = diagnostics.into_diagnostics();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code(), Some(ErrorCode::W400));
    }

    #[test]
    fn test_invalid_inline_value_is_rejected() {
        let inline = [
            attr(AttributeValue::Padding(Border::new(-1.0, 0.0, 0.0, 0.0)), 0),
            attr(AttributeValue::Scale(0.0), 2),
            attr(AttributeValue::Shape(Some(ShapeKind::Diamond)), 4),
        ];
        let mut diagnostics = DiagnosticCollector::new();
        let mut map = AttributeMap::new();
        map.apply_inline(&inline, Target::Object, &mut diagnostics);

        assert_eq!(diagnostics.error_count(), 2);
        let config = map.node_config(&Config::default());
        assert_eq!(config.padding(), Border::default());
        assert_eq!(config.scale(), 1.0);
        assert_eq!(config.shape(), Some(ShapeKind::Diamond));
    }

    #[test]
    fn test_line_attribute_on_object_warns() {
        let inline = [attr(AttributeValue::Anchor(Anchor::NoAnchor), 0)];
        let mut diagnostics = DiagnosticCollector::new();
        let mut map = AttributeMap::new();
        map.apply_inline(&inline, Target::Object, &mut diagnostics);

        assert!(diagnostics.is_valid());
        assert_eq!(diagnostics.diagnostics()[0].code(), Some(ErrorCode::W401));
    }

    #[test]
    fn test_line_style_anchor_precedence() {
        let inline = [
            attr(AttributeValue::StartAnchor(Anchor::Specific(Compass::E)), 0),
            attr(AttributeValue::Anchor(Anchor::Closest(ClosestKind::Corners)), 2),
            attr(AttributeValue::Label("calls".to_string()), 4),
        ];
        let mut diagnostics = DiagnosticCollector::new();
        let mut map = AttributeMap::new();
        map.apply_inline(&inline, Target::Line, &mut diagnostics);

        let style = map.line_style(&LineDefaults::default());
        assert_eq!(style.start_anchor(), Some(Anchor::Specific(Compass::E)));
        assert_eq!(style.end_anchor(), Some(Anchor::Closest(ClosestKind::Corners)));
        assert_eq!(style.styled_label().unwrap().content(), "calls");
    }

    #[test]
    fn test_row_and_column_attributes() {
        let inline = [
            attr(AttributeValue::Row(2), 0),
            attr(AttributeValue::Column(3), 2),
        ];
        let mut diagnostics = DiagnosticCollector::new();
        let mut map = AttributeMap::new();
        map.apply_inline(&inline, Target::Object, &mut diagnostics);

        let config = map.node_config(&Config::default());
        assert_eq!(config.row(), Some(2));
        assert_eq!(config.column(), Some(3));
    }
}
