use float_cmp::assert_approx_eq;
use trellis_core::{
    color::Color,
    draw::ShapeKind,
    error::{DiagnosticCollector, ErrorCode, Severity},
    geometry::{Border, Point},
    ir::{Anchor, ArrowDirection, ClosestKind, Compass, Edge, Node, NodeId, Region},
    span::{Name, Span},
};
use trellis_eval::{
    Evaluation, Evaluator,
    decl::{Attribute, AttributeValue, ClassDecl, Document, EndpointRef, LineDecl, ObjectDecl},
};

/// Hands out distinct spans so diagnostics can be matched to declarations.
struct Source {
    offset: usize,
}

impl Source {
    fn new() -> Self {
        Self { offset: 0 }
    }

    fn span(&mut self, len: usize) -> Span {
        let span = Span::new(self.offset..self.offset + len);
        self.offset += len + 1;
        span
    }

    fn name(&mut self, text: &str) -> Name {
        let span = self.span(text.len());
        Name::new(text, span)
    }

    fn object(&mut self, name: Option<&str>) -> ObjectDecl {
        let span = self.span(1);
        let object = ObjectDecl::new(span);
        match name {
            Some(name) => object.named(self.name(name)),
            None => object,
        }
    }

    fn line(&mut self, from: &str, to: &str) -> LineDecl {
        let span = self.span(1);
        let from = EndpointRef::new(self.name(from));
        let to = EndpointRef::new(self.name(to));
        LineDecl::new(from, span).to(ArrowDirection::Forward, to)
    }

    fn attr(&mut self, value: AttributeValue) -> Attribute {
        Attribute::new(value, self.span(1))
    }
}

fn evaluate(document: &Document) -> (Evaluation, DiagnosticCollector) {
    let mut diagnostics = DiagnosticCollector::new();
    let evaluation = Evaluator::default().evaluate(document, &mut diagnostics);
    (evaluation, diagnostics)
}

fn node<'a>(region: &'a Region, name: &str) -> &'a Node {
    region
        .nodes()
        .find(|node| node.name().map(Name::as_str) == Some(name))
        .unwrap_or_else(|| panic!("no node named {name}"))
}

fn all_edges(region: &Region) -> Vec<&Edge> {
    let mut edges: Vec<&Edge> = region.edges().collect();
    for child in region.nodes() {
        edges.extend(all_edges(child.region()));
    }
    edges
}

fn codes(diagnostics: &DiagnosticCollector) -> Vec<ErrorCode> {
    diagnostics
        .diagnostics()
        .iter()
        .filter_map(|diag| diag.code())
        .collect()
}

fn color(name: &str) -> Color {
    Color::new(name).unwrap()
}

#[test]
fn test_class_order_and_inline_precedence() {
    let mut src = Source::new();
    let red = src.attr(AttributeValue::Fill(color("red")));
    let blue = src.attr(AttributeValue::Fill(color("blue")));
    let diamond = src.attr(AttributeValue::Shape(Some(ShapeKind::Diamond)));
    let green = src.attr(AttributeValue::Fill(color("green")));

    let document = Document::new()
        .with(ClassDecl::new(src.name("warm"), src.span(1)).with_attribute(red))
        .with(
            ClassDecl::new(src.name("cool"), src.span(1))
                .with_attribute(blue)
                .with_attribute(diamond),
        )
        .with({
            let object = src.object(Some("a"));
            object.with_class(src.name("warm")).with_class(src.name("cool"))
        })
        .with({
            let object = src.object(Some("b"));
            object
                .with_class(src.name("cool"))
                .with_class(src.name("warm"))
                .with_attribute(green)
        });

    let (evaluation, diagnostics) = evaluate(&document);
    assert!(evaluation.is_valid());

    let a = node(evaluation.root(), "a");
    assert_eq!(a.config().fill(), Some(color("blue")));
    assert_eq!(a.config().shape(), Some(ShapeKind::Diamond));

    let b = node(evaluation.root(), "b");
    assert_eq!(b.config().fill(), Some(color("green")));
    assert_eq!(b.config().shape(), Some(ShapeKind::Diamond));

    // Overriding a class value is informational only.
    assert_eq!(codes(&diagnostics), vec![ErrorCode::W400]);
    assert_eq!(diagnostics.diagnostics()[0].severity(), Severity::Warning);
}

#[test]
fn test_parents_apply_before_class() {
    let mut src = Source::new();
    let base_fill = src.attr(AttributeValue::Fill(color("red")));
    let base_width = src.attr(AttributeValue::StrokeWidth(3.0));
    let child_fill = src.attr(AttributeValue::Fill(color("blue")));

    let document = Document::new()
        .with(
            ClassDecl::new(src.name("child"), src.span(1))
                .with_parent(src.name("base"))
                .with_attribute(child_fill),
        )
        .with(
            ClassDecl::new(src.name("base"), src.span(1))
                .with_attribute(base_fill)
                .with_attribute(base_width),
        )
        .with({
            let object = src.object(Some("n"));
            object.with_class(src.name("child"))
        });

    let (evaluation, diagnostics) = evaluate(&document);
    assert!(diagnostics.is_valid());
    let n = node(evaluation.root(), "n");
    assert_eq!(n.config().fill(), Some(color("blue")));
    assert_approx_eq!(f32, n.config().stroke().width(), 3.0);
}

#[test]
fn test_class_body_instantiated_and_overridden() {
    let mut src = Source::new();
    let port_label = src.attr(AttributeValue::Label("default".to_string()));
    let own_label = src.attr(AttributeValue::Label("custom".to_string()));

    let class = ClassDecl::new(src.name("server"), src.span(1))
        .with(src.object(Some("port")).with_attribute(port_label))
        .with(src.object(Some("disk")));
    let instance = src
        .object(Some("web"))
        .with_class(src.name("server"))
        .with(src.object(Some("port")).with_attribute(own_label))
        .with(src.object(Some("cache")));

    let document = Document::new().with(class).with(instance);
    let (evaluation, diagnostics) = evaluate(&document);
    assert!(diagnostics.is_valid(), "{:?}", diagnostics.diagnostics());

    let web = node(evaluation.root(), "web");
    let names: Vec<&str> = web
        .region()
        .nodes()
        .filter_map(|n| n.name().map(Name::as_str))
        .collect();
    assert_eq!(names, vec!["port", "disk", "cache"]);
    assert_eq!(node(web.region(), "port").config().label(), Some("custom"));
}

#[test]
fn test_each_instance_gets_its_own_class_children() {
    let mut src = Source::new();
    let class = ClassDecl::new(src.name("pair"), src.span(1))
        .with(src.object(Some("left")))
        .with(src.object(Some("right")))
        .with(src.line("left", "right"));
    let first = src.object(Some("one")).with_class(src.name("pair"));
    let second = src.object(Some("two")).with_class(src.name("pair"));

    let document = Document::new().with(class).with(first).with(second);
    let (evaluation, diagnostics) = evaluate(&document);
    assert!(diagnostics.is_valid(), "{:?}", diagnostics.diagnostics());

    let one = node(evaluation.root(), "one");
    let two = node(evaluation.root(), "two");
    let one_edge = one.region().edges().next().unwrap();
    let two_edge = two.region().edges().next().unwrap();

    assert_eq!(one_edge.from().node(), node(one.region(), "left").id());
    assert_eq!(two_edge.from().node(), node(two.region(), "left").id());
    assert_ne!(one_edge.from().node(), two_edge.from().node());
}

#[test]
fn test_recursive_class_body_is_rejected() {
    let mut src = Source::new();
    let class = ClassDecl::new(src.name("loop"), src.span(1))
        .with(src.object(Some("inner")).with_class(src.name("loop")));
    let instance = src.object(Some("top")).with_class(src.name("loop"));

    let document = Document::new().with(class).with(instance);
    let (evaluation, diagnostics) = evaluate(&document);

    assert!(!evaluation.is_valid());
    assert_eq!(codes(&diagnostics), vec![ErrorCode::E201]);
    assert!(node(evaluation.root(), "top").region().is_empty());
}

#[test]
fn test_recursion_through_anonymous_wrapper_is_rejected() {
    let mut src = Source::new();
    let wrapper = src
        .object(None)
        .with(src.object(None).with_class(src.name("loop")));
    let class = ClassDecl::new(src.name("loop"), src.span(1)).with(wrapper);
    let instance = src.object(Some("top")).with_class(src.name("loop"));
    let sibling = src.object(Some("after"));

    let document = Document::new().with(class).with(instance).with(sibling);
    let (evaluation, diagnostics) = evaluate(&document);

    assert!(!evaluation.is_valid());
    assert_eq!(codes(&diagnostics), vec![ErrorCode::E201]);

    let top = node(evaluation.root(), "top");
    let wrapper = top.region().nodes().next().unwrap();
    assert!(wrapper.region().is_empty());
    assert_eq!(evaluation.root().nodes().count(), 2);
}

#[test]
fn test_class_body_problems_are_reported_once() {
    let mut src = Source::new();
    let padding = src.attr(AttributeValue::Padding(Border::uniform(-1.0)));
    let part = src.object(Some("part")).with_attribute(padding);
    let line = src.line("part", "missing");
    let class = ClassDecl::new(src.name("broken"), src.span(1))
        .with(part)
        .with(line);

    let mut document = Document::new().with(class);
    for name in ["one", "two", "three"] {
        document = document.with(src.object(Some(name)).with_class(src.name("broken")));
    }
    let (evaluation, diagnostics) = evaluate(&document);

    assert!(!evaluation.is_valid());
    assert_eq!(codes(&diagnostics), vec![ErrorCode::E400, ErrorCode::E100]);
    for name in ["one", "two", "three"] {
        let instance = node(evaluation.root(), name);
        assert_eq!(instance.region().nodes().count(), 1);
        assert_eq!(instance.region().edges().count(), 0);
    }
}

#[test]
fn test_same_class_nested_in_instance_body_is_allowed() {
    let mut src = Source::new();
    let class = ClassDecl::new(src.name("group"), src.span(1));
    let outer = src
        .object(Some("outer"))
        .with_class(src.name("group"))
        .with(src.object(Some("inner")).with_class(src.name("group")));

    let (evaluation, diagnostics) = evaluate(&Document::new().with(class).with(outer));
    assert!(evaluation.is_valid(), "{:?}", diagnostics.diagnostics());
}

#[test]
fn test_cyclic_classes_report_and_continue() {
    let mut src = Source::new();
    let document = Document::new()
        .with(ClassDecl::new(src.name("a"), src.span(1)).with_parent(src.name("b")))
        .with(ClassDecl::new(src.name("b"), src.span(1)).with_parent(src.name("a")))
        .with(src.object(Some("x")).with_class(src.name("a")))
        .with(src.object(Some("y")));

    let (evaluation, diagnostics) = evaluate(&document);
    assert!(!evaluation.is_valid());
    assert_eq!(codes(&diagnostics), vec![ErrorCode::E200]);
    assert_eq!(evaluation.root().nodes().count(), 2);
}

#[test]
fn test_unknown_class_keeps_node() {
    let mut src = Source::new();
    let object = src.object(Some("x")).with_class(src.name("missing"));
    let (evaluation, diagnostics) = evaluate(&Document::new().with(object));

    assert!(!evaluation.is_valid());
    assert_eq!(codes(&diagnostics), vec![ErrorCode::E101]);
    assert_eq!(evaluation.root().nodes().count(), 1);
}

#[test]
fn test_shadowing_in_named_inner_scope() {
    let mut src = Source::new();
    let inner = src
        .object(Some("inner"))
        .with(src.object(Some("foo")))
        .with(src.object(Some("bar")))
        .with(src.line("bar", "foo"));
    let document = Document::new()
        .with(src.object(Some("foo")))
        .with(src.object(Some("baz")))
        .with(inner)
        .with(src.line("baz", "foo"));

    let (evaluation, diagnostics) = evaluate(&document);
    assert!(diagnostics.is_valid(), "{:?}", diagnostics.diagnostics());

    let root = evaluation.root();
    let outer_foo = node(root, "foo").id();
    let inner_region = node(root, "inner").region();
    let inner_foo = node(inner_region, "foo").id();

    let inner_edge = inner_region.edges().next().unwrap();
    assert_eq!(inner_edge.to().node(), inner_foo);

    let outer_edge = root.edges().next().unwrap();
    assert_eq!(outer_edge.to().node(), outer_foo);
}

#[test]
fn test_bubbling_through_anonymous_nodes() {
    let mut src = Source::new();
    let wrapper = src
        .object(None)
        .with(src.object(None).with(src.object(Some("deep"))));
    let document = Document::new()
        .with(wrapper)
        .with(src.object(Some("top")))
        .with(src.line("top", "deep"));

    let (evaluation, diagnostics) = evaluate(&document);
    assert!(diagnostics.is_valid(), "{:?}", diagnostics.diagnostics());
    let edge = evaluation.root().edges().next().unwrap();
    let deep_id = evaluation
        .root()
        .nodes()
        .next()
        .and_then(|wrapper| wrapper.region().nodes().next())
        .and_then(|inner| inner.region().nodes().next())
        .map(Node::id)
        .unwrap();
    assert_eq!(edge.to().node(), deep_id);
}

#[test]
fn test_named_node_blocks_outside_references() {
    let mut src = Source::new();
    let named = src.object(Some("box")).with(src.object(Some("hidden")));
    let document = Document::new()
        .with(named)
        .with(src.object(Some("top")))
        .with(src.line("top", "hidden"));

    let (evaluation, diagnostics) = evaluate(&document);
    assert!(!evaluation.is_valid());
    assert_eq!(codes(&diagnostics), vec![ErrorCode::E100]);
    assert_eq!(evaluation.root().edges().count(), 0);
    assert_eq!(evaluation.root().nodes().count(), 2);
}

#[test]
fn test_line_inside_node_reaches_outer_scope() {
    let mut src = Source::new();
    let inner = src
        .object(Some("svc"))
        .with(src.object(Some("handler")))
        .with(src.line("handler", "db"));
    let document = Document::new().with(inner).with(src.object(Some("db")));

    let (evaluation, diagnostics) = evaluate(&document);
    assert!(diagnostics.is_valid(), "{:?}", diagnostics.diagnostics());
    let edges = all_edges(evaluation.root());
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].to().node(), node(evaluation.root(), "db").id());
}

#[test]
fn test_ambiguous_anonymous_siblings() {
    let mut src = Source::new();
    let document = Document::new()
        .with(src.object(None).with(src.object(Some("x"))))
        .with(src.object(None).with(src.object(Some("x"))))
        .with(src.object(Some("y")))
        .with(src.line("y", "x"));

    let (evaluation, diagnostics) = evaluate(&document);
    assert!(!evaluation.is_valid());
    assert_eq!(codes(&diagnostics), vec![ErrorCode::E102]);
}

#[test]
fn test_duplicate_name_keeps_first() {
    let mut src = Source::new();
    let document = Document::new()
        .with(src.object(Some("a")))
        .with(src.object(Some("a")))
        .with(src.object(Some("b")))
        .with(src.line("b", "a"));

    let (evaluation, diagnostics) = evaluate(&document);
    assert_eq!(codes(&diagnostics), vec![ErrorCode::E203]);
    let first = evaluation.root().nodes().next().unwrap().id();
    assert_eq!(evaluation.root().edges().next().unwrap().to().node(), first);
}

#[test]
fn test_chain_drops_only_unresolved_hops() {
    let mut src = Source::new();
    let span = src.span(1);
    let line = LineDecl::new(EndpointRef::new(src.name("a")), span)
        .to(ArrowDirection::Forward, EndpointRef::new(src.name("b")))
        .to(ArrowDirection::Backward, EndpointRef::new(src.name("ghost")))
        .to(ArrowDirection::Both, EndpointRef::new(src.name("c")));
    let document = Document::new()
        .with(src.object(Some("a")))
        .with(src.object(Some("b")))
        .with(src.object(Some("c")))
        .with(line);

    let (evaluation, diagnostics) = evaluate(&document);
    assert_eq!(codes(&diagnostics), vec![ErrorCode::E100]);
    let edges: Vec<&Edge> = evaluation.root().edges().collect();
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].arrow(), ArrowDirection::Forward);
}

#[test]
fn test_line_anchor_defaults_and_overrides() {
    let mut src = Source::new();
    let start_anchor = src.attr(AttributeValue::StartAnchor(Anchor::Specific(Compass::S)));
    let end_offset = src.attr(AttributeValue::EndOffset(Point::new(2.0, 3.0)));
    let span = src.span(1);
    let explicit = LineDecl::new(EndpointRef::new(src.name("a")), span)
        .to(
            ArrowDirection::None,
            EndpointRef::new(src.name("b")).with_anchor(Anchor::NoAnchor),
        )
        .with_class(src.name("styled"));

    let document = Document::new()
        .with(
            ClassDecl::new(src.name("styled"), src.span(1))
                .with_attribute(start_anchor)
                .with_attribute(end_offset),
        )
        .with(src.object(Some("a")))
        .with(src.object(Some("b")))
        .with(src.line("a", "b"))
        .with(explicit);

    let (evaluation, diagnostics) = evaluate(&document);
    assert!(diagnostics.is_valid(), "{:?}", diagnostics.diagnostics());
    let edges: Vec<&Edge> = evaluation.root().edges().collect();

    assert_eq!(edges[0].from().anchor(), Anchor::Closest(ClosestKind::Any));
    assert_eq!(edges[0].to().anchor(), Anchor::Closest(ClosestKind::Any));

    assert_eq!(edges[1].from().anchor(), Anchor::Specific(Compass::S));
    assert_eq!(edges[1].to().anchor(), Anchor::NoAnchor);
    assert_eq!(edges[1].to().offset(), Point::new(2.0, 3.0));
}

#[test]
fn test_ids_are_unique_and_deterministic() {
    let build = || {
        let mut src = Source::new();
        Document::new()
            .with(src.object(Some("a")).with(src.object(Some("a1"))))
            .with(src.object(Some("b")))
            .with(src.line("a", "b"))
    };

    let (first, _) = evaluate(&build());
    let (second, _) = evaluate(&build());
    assert_eq!(first, second);

    let a = node(first.root(), "a");
    let ids = [a.id(), node(a.region(), "a1").id(), node(first.root(), "b").id()];
    assert_eq!(ids, [NodeId::new(0), NodeId::new(1), NodeId::new(2)]);
}

#[test]
fn test_root_attributes_apply_to_root_region() {
    let mut src = Source::new();
    let scale = src.attr(AttributeValue::Scale(2.0));
    let document = Document::new().with_attribute(scale);
    let (evaluation, _) = evaluate(&document);
    assert_approx_eq!(f32, evaluation.root().config().scale(), 2.0);
}

#[test]
fn test_line_without_target_warns() {
    let mut src = Source::new();
    let a = src.object(Some("a"));
    let start = EndpointRef::new(src.name("a"));
    let line = LineDecl::new(start, src.span(1));

    let document = Document::new().with(a).with(line);
    let (evaluation, diagnostics) = evaluate(&document);

    assert!(evaluation.is_valid());
    assert_eq!(codes(&diagnostics), vec![ErrorCode::W401]);
    assert_eq!(diagnostics.diagnostics()[0].severity(), Severity::Warning);
    assert!(all_edges(evaluation.root()).is_empty());
}
