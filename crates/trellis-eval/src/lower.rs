//! Second pass: endpoint resolution and IR construction.

use trellis_core::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode},
    ir::{Anchor, Config, Edge, EdgeId, Endpoint, Node, NodeId, Region},
};

use crate::{
    config::LineDefaults,
    decl::EndpointRef,
    expand::{ClassReports, ExpandedItem, ExpandedLine, ExpandedRegion},
    scope::{ResolveError, ScopeId, ScopeTree},
};

pub(crate) struct Lowerer<'s, 'd> {
    scopes: &'s ScopeTree,
    defaults: &'s LineDefaults,
    next_edge: u32,
    reports: ClassReports,
    diagnostics: &'d mut DiagnosticCollector,
}

impl<'s, 'd> Lowerer<'s, 'd> {
    pub fn new(
        scopes: &'s ScopeTree,
        defaults: &'s LineDefaults,
        reports: ClassReports,
        diagnostics: &'d mut DiagnosticCollector,
    ) -> Self {
        Self {
            scopes,
            defaults,
            next_edge: 0,
            reports,
            diagnostics,
        }
    }

    pub fn edge_count(&self) -> u32 {
        self.next_edge
    }

    /// Builds the IR region for an expanded region, in declaration order.
    pub fn lower_region(&mut self, config: Config, expanded: ExpandedRegion<'_>) -> Region {
        let mut region = Region::new(config);
        let scope = expanded.scope;
        for item in expanded.items {
            match item {
                ExpandedItem::Node(node) => {
                    let child = self.lower_region(node.config.clone(), node.region);
                    region.push(Node::new(node.id, node.name, node.span, node.config, child));
                }
                ExpandedItem::Line(line) => {
                    let edges = if line.from_class {
                        let outer = std::mem::take(&mut *self.diagnostics);
                        let edges = self.lower_line(&line, scope);
                        let produced = std::mem::replace(&mut *self.diagnostics, outer);
                        self.reports.forward(produced, self.diagnostics);
                        edges
                    } else {
                        self.lower_line(&line, scope)
                    };
                    for edge in edges {
                        region.push(edge);
                    }
                }
            }
        }
        region
    }

    /// One edge per hop of the chain. A hop whose endpoints cannot both be
    /// resolved is dropped; the rest of the chain is kept.
    fn lower_line(&mut self, line: &ExpandedLine<'_>, scope: ScopeId) -> Vec<Edge> {
        let decl = line.decl;
        if decl.segments().is_empty() {
            self.diagnostics.emit(
                Diagnostic::warning("line has no target and draws nothing")
                    .with_code(ErrorCode::W401)
                    .with_label(decl.span(), "no connection"),
            );
            return Vec::new();
        }

        let refs: Vec<&EndpointRef> = std::iter::once(decl.start())
            .chain(decl.segments().iter().map(|segment| segment.target()))
            .collect();
        let resolved: Vec<Option<NodeId>> = refs
            .iter()
            .map(|endpoint| self.resolve(endpoint, scope))
            .collect();

        let mut edges = Vec::with_capacity(decl.segments().len());
        for (index, segment) in decl.segments().iter().enumerate() {
            let (Some(from_node), Some(to_node)) = (resolved[index], resolved[index + 1]) else {
                continue;
            };
            let from_ref = refs[index];
            let to_ref = refs[index + 1];

            let from = Endpoint::new(
                from_node,
                from_ref.name().clone(),
                self.pick_anchor(from_ref.anchor(), line.style.start_anchor()),
                from_ref
                    .offset()
                    .or(line.style.start_offset())
                    .unwrap_or_default(),
            );
            let to = Endpoint::new(
                to_node,
                to_ref.name().clone(),
                self.pick_anchor(to_ref.anchor(), line.style.end_anchor()),
                to_ref.offset().or(line.style.end_offset()).unwrap_or_default(),
            );

            let id = EdgeId::new(self.next_edge);
            self.next_edge += 1;

            // The label belongs to the line, so only its first edge shows it.
            let label = if edges.is_empty() {
                line.style.styled_label()
            } else {
                None
            };
            edges.push(
                Edge::new(id, from, to, decl.span())
                    .with_stroke(line.style.stroke.clone())
                    .with_arrow(segment.arrow())
                    .with_label(label),
            );
        }
        edges
    }

    fn pick_anchor(&self, own: Option<Anchor>, from_style: Option<Anchor>) -> Anchor {
        own.or(from_style).unwrap_or(self.defaults.anchor())
    }

    fn resolve(&mut self, endpoint: &EndpointRef, scope: ScopeId) -> Option<NodeId> {
        let name = endpoint.name();
        match self.scopes.resolve(scope, name.as_str()) {
            Ok(binding) => Some(binding.node),
            Err(ResolveError::NotFound) => {
                self.diagnostics.emit(
                    Diagnostic::error(format!("cannot find `{name}` in this scope"))
                        .with_code(ErrorCode::E100)
                        .with_label(name.span(), "not found")
                        .with_help("names declared inside a named node are only visible within it"),
                );
                None
            }
            Err(ResolveError::Ambiguous(candidates)) => {
                let mut diag = Diagnostic::error(format!("`{name}` is ambiguous"))
                    .with_code(ErrorCode::E102)
                    .with_label(name.span(), "could refer to several nodes")
                    .with_help("name the enclosing node and reference it from inside");
                for candidate in candidates {
                    diag = diag.with_secondary_label(candidate.name.span(), "candidate");
                }
                self.diagnostics.emit(diag);
                None
            }
        }
    }
}
