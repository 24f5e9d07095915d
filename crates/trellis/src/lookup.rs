//! Mapping between source offsets and IR entities.
//!
//! Editor hosts use a [`SourceIndex`] for hover and go-to-definition: it
//! finds the innermost node or edge declared at a byte offset, and links
//! every endpoint reference back to the declaration of its node.

use std::collections::HashMap;

use trellis_core::{
    draw::Owner,
    ir::{NodeId, Region},
    span::Span,
};

#[derive(Debug, Clone, Copy)]
struct Entry {
    owner: Owner,
    span: Span,
    depth: usize,
}

/// Index over the spans of one IR tree.
#[derive(Debug, Clone, Default)]
pub struct SourceIndex {
    entries: Vec<Entry>,
    spans: HashMap<Owner, Span>,
    names: HashMap<NodeId, Span>,
    /// Endpoint reference spans and the node each resolves to.
    references: Vec<(Span, NodeId)>,
}

impl SourceIndex {
    pub fn new(root: &Region) -> Self {
        let mut index = Self::default();
        index.add_region(root, 0);
        index
    }

    fn add_region(&mut self, region: &Region, depth: usize) {
        for node in region.nodes() {
            let owner = Owner::Node(node.id());
            self.add(owner, node.span(), depth);
            if let Some(name) = node.name() {
                self.names.insert(node.id(), name.span());
            }
            self.add_region(node.region(), depth + 1);
        }
        for edge in region.edges() {
            self.add(Owner::Edge(edge.id()), edge.span(), depth);
            for endpoint in [edge.from(), edge.to()] {
                self.references
                    .push((endpoint.reference().span(), endpoint.node()));
            }
        }
    }

    fn add(&mut self, owner: Owner, span: Span, depth: usize) {
        self.entries.push(Entry { owner, span, depth });
        self.spans.insert(owner, span);
    }

    /// The innermost node or edge whose declaration contains `offset`.
    ///
    /// Among overlapping declarations the shortest span wins, then the
    /// deepest one.
    pub fn at(&self, offset: usize) -> Option<Owner> {
        self.entries
            .iter()
            .filter(|entry| entry.span.contains(offset))
            .min_by(|a, b| {
                a.span
                    .len()
                    .cmp(&b.span.len())
                    .then(b.depth.cmp(&a.depth))
            })
            .map(|entry| entry.owner)
    }

    /// Declaration span of a node or edge.
    pub fn span(&self, owner: Owner) -> Option<Span> {
        self.spans.get(&owner).copied()
    }

    /// Span of the name a node was declared with.
    pub fn name_span(&self, node: NodeId) -> Option<Span> {
        self.names.get(&node).copied()
    }

    /// Spans of every endpoint referring to `node`, in declaration order.
    pub fn references(&self, node: NodeId) -> Vec<Span> {
        self.references
            .iter()
            .filter(|(_, target)| *target == node)
            .map(|(span, _)| *span)
            .collect()
    }

    /// If `offset` lies on an endpoint reference, the name span of the node
    /// it refers to.
    pub fn definition_at(&self, offset: usize) -> Option<Span> {
        self.references
            .iter()
            .find(|(span, _)| span.contains(offset))
            .and_then(|(_, node)| self.name_span(*node))
    }
}

#[cfg(test)]
mod tests {
    use trellis_core::{
        geometry::Point,
        ir::{Anchor, Config, Edge, EdgeId, Endpoint, Node},
        span::Name,
    };

    use super::*;

    fn named(id: u32, name: &str, name_span: Span, span: Span, region: Region) -> Node {
        Node::new(
            NodeId::new(id),
            Some(Name::new(name, name_span)),
            span,
            Config::default(),
            region,
        )
    }

    fn endpoint(node: u32, name: &str, span: Span) -> Endpoint {
        Endpoint::new(
            NodeId::new(node),
            Name::new(name, span),
            Anchor::NoAnchor,
            Point::default(),
        )
    }

    // `a { b }  c  c -> a`
    fn tree() -> Region {
        let inner = named(1, "b", Span::new(4..5), Span::new(4..6), Region::default());
        let outer = named(0, "a", Span::new(0..1), Span::new(0..9), Region::default().with(inner));
        let other = named(2, "c", Span::new(10..11), Span::new(10..12), Region::default());
        let edge = Edge::new(
            EdgeId::new(0),
            endpoint(2, "c", Span::new(13..14)),
            endpoint(0, "a", Span::new(18..19)),
            Span::new(13..20),
        );
        Region::default().with(outer).with(other).with(edge)
    }

    #[test]
    fn test_innermost_entity_at_offset() {
        let index = SourceIndex::new(&tree());

        assert_eq!(index.at(0), Some(Owner::Node(NodeId::new(0))));
        assert_eq!(index.at(4), Some(Owner::Node(NodeId::new(1))));
        assert_eq!(index.at(15), Some(Owner::Edge(EdgeId::new(0))));
        assert_eq!(index.at(30), None);
    }

    #[test]
    fn test_spans_by_owner() {
        let index = SourceIndex::new(&tree());

        assert_eq!(index.span(Owner::Node(NodeId::new(2))), Some(Span::new(10..12)));
        assert_eq!(index.span(Owner::Root), None);
        assert_eq!(index.name_span(NodeId::new(1)), Some(Span::new(4..5)));
    }

    #[test]
    fn test_references_and_definitions() {
        let index = SourceIndex::new(&tree());

        assert_eq!(index.references(NodeId::new(0)), vec![Span::new(18..19)]);
        assert_eq!(index.definition_at(18), Some(Span::new(0..1)));
        assert_eq!(index.definition_at(13), Some(Span::new(10..11)));
        assert_eq!(index.definition_at(16), None);
    }
}
