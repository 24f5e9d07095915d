//! The typed declaration tree consumed by the evaluator.
//!
//! A front end (parser plus macro expansion) produces these values; the
//! evaluator only reads them. Attribute values arrive already type-checked
//! as [`AttributeValue`] variants.

use trellis_core::{
    color::Color,
    draw::{ShapeKind, StrokeStyle},
    geometry::{Border, Point, Size},
    ir::{Alignment, Anchor, ArrowDirection, Gutter, TrackSize},
    span::{Name, Span},
};

/// A whole source document: root attributes plus top-level declarations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    attributes: Vec<Attribute>,
    declarations: Vec<Declaration>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attributes of the root region.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn with(mut self, declaration: impl Into<Declaration>) -> Self {
        self.declarations.push(declaration.into());
        self
    }
}

/// One declaration in a body.
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Class(ClassDecl),
    Object(ObjectDecl),
    Line(LineDecl),
}

impl Declaration {
    pub fn span(&self) -> Span {
        match self {
            Declaration::Class(class) => class.span(),
            Declaration::Object(object) => object.span(),
            Declaration::Line(line) => line.span(),
        }
    }
}

impl From<ClassDecl> for Declaration {
    fn from(value: ClassDecl) -> Self {
        Declaration::Class(value)
    }
}

impl From<ObjectDecl> for Declaration {
    fn from(value: ObjectDecl) -> Self {
        Declaration::Object(value)
    }
}

impl From<LineDecl> for Declaration {
    fn from(value: LineDecl) -> Self {
        Declaration::Line(value)
    }
}

/// A reusable bundle of attributes and default children.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    name: Name,
    parents: Vec<Name>,
    attributes: Vec<Attribute>,
    body: Vec<Declaration>,
    span: Span,
}

impl ClassDecl {
    pub fn new(name: Name, span: Span) -> Self {
        Self {
            name,
            parents: Vec::new(),
            attributes: Vec::new(),
            body: Vec::new(),
            span,
        }
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    /// Mixin list, applied in order before the class's own attributes.
    pub fn parents(&self) -> &[Name] {
        &self.parents
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Default nested declarations given to every instance.
    pub fn body(&self) -> &[Declaration] {
        &self.body
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn with_parent(mut self, parent: Name) -> Self {
        self.parents.push(parent);
        self
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn with(mut self, declaration: impl Into<Declaration>) -> Self {
        self.body.push(declaration.into());
        self
    }
}

/// An object instance; becomes a node.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectDecl {
    classes: Vec<Name>,
    name: Option<Name>,
    attributes: Vec<Attribute>,
    body: Vec<Declaration>,
    span: Span,
}

impl ObjectDecl {
    pub fn new(span: Span) -> Self {
        Self {
            classes: Vec::new(),
            name: None,
            attributes: Vec::new(),
            body: Vec::new(),
            span,
        }
    }

    pub fn classes(&self) -> &[Name] {
        &self.classes
    }

    pub fn name(&self) -> Option<&Name> {
        self.name.as_ref()
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn body(&self) -> &[Declaration] {
        &self.body
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn named(mut self, name: Name) -> Self {
        self.name = Some(name);
        self
    }

    pub fn with_class(mut self, class: Name) -> Self {
        self.classes.push(class);
        self
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn with(mut self, declaration: impl Into<Declaration>) -> Self {
        self.body.push(declaration.into());
        self
    }
}

/// A reference to a node from a line, with optional per-endpoint placement.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointRef {
    name: Name,
    anchor: Option<Anchor>,
    offset: Option<Point>,
}

impl EndpointRef {
    pub fn new(name: Name) -> Self {
        Self {
            name,
            anchor: None,
            offset: None,
        }
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn anchor(&self) -> Option<Anchor> {
        self.anchor
    }

    pub fn offset(&self) -> Option<Point> {
        self.offset
    }

    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = Some(anchor);
        self
    }

    pub fn with_offset(mut self, offset: Point) -> Self {
        self.offset = Some(offset);
        self
    }
}

/// One hop of a line chain: an arrow and the endpoint it leads to.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    arrow: ArrowDirection,
    target: EndpointRef,
}

impl Segment {
    pub fn new(arrow: ArrowDirection, target: EndpointRef) -> Self {
        Self { arrow, target }
    }

    pub fn arrow(&self) -> ArrowDirection {
        self.arrow
    }

    pub fn target(&self) -> &EndpointRef {
        &self.target
    }
}

/// A chain `a -> b <- c`; every hop becomes one edge.
#[derive(Debug, Clone, PartialEq)]
pub struct LineDecl {
    classes: Vec<Name>,
    start: EndpointRef,
    segments: Vec<Segment>,
    attributes: Vec<Attribute>,
    span: Span,
}

impl LineDecl {
    pub fn new(start: EndpointRef, span: Span) -> Self {
        Self {
            classes: Vec::new(),
            start,
            segments: Vec::new(),
            attributes: Vec::new(),
            span,
        }
    }

    pub fn classes(&self) -> &[Name] {
        &self.classes
    }

    pub fn start(&self) -> &EndpointRef {
        &self.start
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn with_class(mut self, class: Name) -> Self {
        self.classes.push(class);
        self
    }

    pub fn to(mut self, arrow: ArrowDirection, target: EndpointRef) -> Self {
        self.segments.push(Segment::new(arrow, target));
        self
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }
}

/// Attribute identity used for merging: a later value with the same key
/// replaces an earlier one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKey {
    Fill,
    Stroke,
    StrokeWidth,
    StrokeStyle,
    Label,
    FontFamily,
    FontSize,
    TextColor,
    Shape,
    Rounding,
    Padding,
    Gutter,
    Rows,
    Columns,
    Scale,
    Align,
    MinSize,
    Row,
    Column,
    Anchor,
    StartAnchor,
    EndAnchor,
    StartOffset,
    EndOffset,
}

impl AttributeKey {
    pub fn as_str(self) -> &'static str {
        match self {
            AttributeKey::Fill => "fill",
            AttributeKey::Stroke => "stroke",
            AttributeKey::StrokeWidth => "stroke_width",
            AttributeKey::StrokeStyle => "stroke_style",
            AttributeKey::Label => "label",
            AttributeKey::FontFamily => "font_family",
            AttributeKey::FontSize => "font_size",
            AttributeKey::TextColor => "text_color",
            AttributeKey::Shape => "shape",
            AttributeKey::Rounding => "rounding",
            AttributeKey::Padding => "padding",
            AttributeKey::Gutter => "gutter",
            AttributeKey::Rows => "rows",
            AttributeKey::Columns => "columns",
            AttributeKey::Scale => "scale",
            AttributeKey::Align => "align",
            AttributeKey::MinSize => "min_size",
            AttributeKey::Row => "row",
            AttributeKey::Column => "column",
            AttributeKey::Anchor => "anchor",
            AttributeKey::StartAnchor => "start_anchor",
            AttributeKey::EndAnchor => "end_anchor",
            AttributeKey::StartOffset => "start_offset",
            AttributeKey::EndOffset => "end_offset",
        }
    }

    /// Returns true if the attribute affects objects (nodes and the root).
    pub fn applies_to_objects(self) -> bool {
        !matches!(
            self,
            AttributeKey::Anchor
                | AttributeKey::StartAnchor
                | AttributeKey::EndAnchor
                | AttributeKey::StartOffset
                | AttributeKey::EndOffset
        )
    }

    /// Returns true if the attribute affects lines.
    pub fn applies_to_lines(self) -> bool {
        matches!(
            self,
            AttributeKey::Stroke
                | AttributeKey::StrokeWidth
                | AttributeKey::StrokeStyle
                | AttributeKey::Label
                | AttributeKey::FontFamily
                | AttributeKey::FontSize
                | AttributeKey::TextColor
                | AttributeKey::Anchor
                | AttributeKey::StartAnchor
                | AttributeKey::EndAnchor
                | AttributeKey::StartOffset
                | AttributeKey::EndOffset
        )
    }
}

impl std::fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A type-checked attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Fill(Color),
    Stroke(Color),
    StrokeWidth(f32),
    StrokeStyle(StrokeStyle),
    Label(String),
    FontFamily(String),
    FontSize(f32),
    TextColor(Color),
    /// `None` removes a shape provided by a class.
    Shape(Option<ShapeKind>),
    Rounding(f32),
    Padding(Border),
    Gutter(Gutter),
    Rows(TrackSize),
    Columns(TrackSize),
    Scale(f32),
    Align(Alignment),
    MinSize(Size),
    Row(i32),
    Column(i32),
    /// Anchor for both ends of every edge of a line.
    Anchor(Anchor),
    StartAnchor(Anchor),
    EndAnchor(Anchor),
    StartOffset(Point),
    EndOffset(Point),
}

impl AttributeValue {
    pub fn key(&self) -> AttributeKey {
        match self {
            AttributeValue::Fill(_) => AttributeKey::Fill,
            AttributeValue::Stroke(_) => AttributeKey::Stroke,
            AttributeValue::StrokeWidth(_) => AttributeKey::StrokeWidth,
            AttributeValue::StrokeStyle(_) => AttributeKey::StrokeStyle,
            AttributeValue::Label(_) => AttributeKey::Label,
            AttributeValue::FontFamily(_) => AttributeKey::FontFamily,
            AttributeValue::FontSize(_) => AttributeKey::FontSize,
            AttributeValue::TextColor(_) => AttributeKey::TextColor,
            AttributeValue::Shape(_) => AttributeKey::Shape,
            AttributeValue::Rounding(_) => AttributeKey::Rounding,
            AttributeValue::Padding(_) => AttributeKey::Padding,
            AttributeValue::Gutter(_) => AttributeKey::Gutter,
            AttributeValue::Rows(_) => AttributeKey::Rows,
            AttributeValue::Columns(_) => AttributeKey::Columns,
            AttributeValue::Scale(_) => AttributeKey::Scale,
            AttributeValue::Align(_) => AttributeKey::Align,
            AttributeValue::MinSize(_) => AttributeKey::MinSize,
            AttributeValue::Row(_) => AttributeKey::Row,
            AttributeValue::Column(_) => AttributeKey::Column,
            AttributeValue::Anchor(_) => AttributeKey::Anchor,
            AttributeValue::StartAnchor(_) => AttributeKey::StartAnchor,
            AttributeValue::EndAnchor(_) => AttributeKey::EndAnchor,
            AttributeValue::StartOffset(_) => AttributeKey::StartOffset,
            AttributeValue::EndOffset(_) => AttributeKey::EndOffset,
        }
    }
}

/// An attribute value and where it was written.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    value: AttributeValue,
    span: Span,
}

impl Attribute {
    pub fn new(value: AttributeValue, span: Span) -> Self {
        Self { value, span }
    }

    pub fn value(&self) -> &AttributeValue {
        &self.value
    }

    pub fn key(&self) -> AttributeKey {
        self.value.key()
    }

    pub fn span(&self) -> Span {
        self.span
    }
}
