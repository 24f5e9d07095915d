//! Emission of drawing commands, container before children, in
//! declaration order.

use trellis_core::{
    draw::{
        DrawCommand, LabelCommand, LineCommand, Origin, Owner, ShapeCommand, ShapeKind, StyledText,
        TextMeasure,
    },
    error::{Diagnostic, DiagnosticCollector, ErrorCode},
    geometry::Bounds,
    ir::{Config, Edge, Endpoint, Entity, Region},
    span::Span,
};

use crate::{
    CancellationToken, TrellisError,
    compose::{
        anchor::{Attachment, Resolved, resolve_pair},
        place::{Placed, Placement},
    },
};

pub(crate) struct Emitter<'a, 'd> {
    placement: &'a Placement,
    measure: &'a dyn TextMeasure,
    cancel: &'a CancellationToken,
    diagnostics: &'d mut DiagnosticCollector,
    commands: Vec<DrawCommand>,
}

impl<'a, 'd> Emitter<'a, 'd> {
    pub fn new(
        placement: &'a Placement,
        measure: &'a dyn TextMeasure,
        cancel: &'a CancellationToken,
        diagnostics: &'d mut DiagnosticCollector,
    ) -> Self {
        Self {
            placement,
            measure,
            cancel,
            diagnostics,
            commands: Vec::new(),
        }
    }

    pub fn emit(mut self, root: &Region) -> Result<Vec<DrawCommand>, TrellisError> {
        let placed = *self.placement.root();
        self.container(Owner::Root, Span::default(), root.config(), &placed);
        self.region(root, placed.scale)?;
        Ok(self.commands)
    }

    /// Emits the entities of a region whose interior scale is `scale`.
    fn region(&mut self, region: &Region, scale: f32) -> Result<(), TrellisError> {
        let placement = self.placement;
        for entity in region.entities() {
            match entity {
                Entity::Node(node) => {
                    self.cancel.check()?;
                    let Some(placed) = placement.node(node.id()) else {
                        continue;
                    };
                    self.container(Owner::Node(node.id()), node.span(), node.config(), placed);
                    self.region(node.region(), placed.scale)?;
                }
                Entity::Edge(edge) => self.edge(edge, scale),
            }
        }
        Ok(())
    }

    fn container(&mut self, owner: Owner, span: Span, config: &Config, placed: &Placed) {
        let origin = Origin::new(owner, span);
        if let Some(kind) = placed.shape {
            let rounding = if kind == ShapeKind::RoundedRectangle {
                placed.rounding
            } else {
                0.0
            };
            self.commands.push(DrawCommand::Shape(ShapeCommand {
                kind,
                bounds: placed.bounds,
                rounding,
                fill: config.fill(),
                stroke: config.stroke().clone(),
                scale: placed.scale,
                origin,
            }));
        }
        if let (Some(text), Some(bounds)) = (config.label(), placed.label) {
            self.commands.push(DrawCommand::Label(LabelCommand {
                bounds,
                text: StyledText::new(text, config.text().clone()),
                scale: placed.scale,
                origin,
            }));
        }
    }

    /// Emits the connector of an edge and its label, centered on the
    /// connector's midpoint.
    fn edge(&mut self, edge: &Edge, scale: f32) {
        let placement = self.placement;
        let from = self.endpoint_node(edge.from(), placement);
        let to = self.endpoint_node(edge.to(), placement);
        let (Some(from_placed), Some(to_placed)) = (from, to) else {
            return;
        };

        let (start, end) = resolve_pair(
            &attachment(from_placed, edge.from()),
            &attachment(to_placed, edge.to()),
        );
        self.report_unavailable(edge.from(), from_placed, start);
        self.report_unavailable(edge.to(), to_placed, end);

        let origin = Origin::new(Owner::Edge(edge.id()), edge.span());
        self.commands.push(DrawCommand::Line(LineCommand {
            start: start.point,
            end: end.point,
            stroke: edge.stroke().clone(),
            arrow: edge.arrow(),
            origin,
        }));

        if let Some(label) = edge.label() {
            let size = self.measure.measure(label).scale(scale);
            self.commands.push(DrawCommand::Label(LabelCommand {
                bounds: Bounds::new_from_center(start.point.midpoint(end.point), size),
                text: label.clone(),
                scale,
                origin,
            }));
        }
    }

    fn endpoint_node(&mut self, endpoint: &Endpoint, placement: &'a Placement) -> Option<&'a Placed> {
        let placed = placement.node(endpoint.node());
        if placed.is_none() {
            let reference = endpoint.reference();
            self.diagnostics.emit(
                Diagnostic::error(format!(
                    "`{reference}` refers to node {} which is not part of the diagram",
                    endpoint.node()
                ))
                .with_code(ErrorCode::E202)
                .with_label(reference.span(), "unknown node")
                .with_help("the edge is left out"),
            );
        }
        placed
    }

    fn report_unavailable(&mut self, endpoint: &Endpoint, placed: &Placed, resolved: Resolved) {
        if resolved.available {
            return;
        }
        let shape = placed.shape.map_or("rectangle", ShapeKind::as_str);
        self.diagnostics.emit(
            Diagnostic::error(format!(
                "anchor `{}` is not available on a {shape}",
                endpoint.anchor()
            ))
            .with_code(ErrorCode::E301)
            .with_label(endpoint.reference().span(), "attached here")
            .with_help("the center of the node is used instead"),
        );
    }
}

fn attachment<'p>(placed: &'p Placed, endpoint: &Endpoint) -> Attachment<'p> {
    Attachment {
        placed,
        anchor: endpoint.anchor(),
        offset: endpoint.offset(),
    }
}
