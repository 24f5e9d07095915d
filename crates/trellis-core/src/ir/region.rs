//! The IR tree: regions, nodes and edges.

use std::fmt;

use crate::{
    draw::{StrokeDefinition, StyledText},
    geometry::Point,
    ir::{Anchor, Config},
    span::{Name, Span},
};

/// Identity of a node within one compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Identity of an edge within one compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(u32);

impl EdgeId {
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// A lexical scope and a grid: a configuration plus ordered children.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Region {
    config: Config,
    entities: Vec<Entity>,
}

impl Region {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            entities: Vec::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Children in declaration order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn push(&mut self, entity: impl Into<Entity>) {
        self.entities.push(entity.into());
    }

    /// Builder form of [`Region::push`].
    pub fn with(mut self, entity: impl Into<Entity>) -> Self {
        self.push(entity);
        self
    }

    /// Direct child nodes in declaration order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.entities.iter().filter_map(|entity| match entity {
            Entity::Node(node) => Some(node),
            Entity::Edge(_) => None,
        })
    }

    /// Direct child edges in declaration order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.entities.iter().filter_map(|entity| match entity {
            Entity::Edge(edge) => Some(edge),
            Entity::Node(_) => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Finds a node anywhere below this region.
    pub fn find_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes().find_map(|node| {
            if node.id() == id {
                Some(node)
            } else {
                node.region().find_node(id)
            }
        })
    }

    /// Finds an edge anywhere below this region.
    pub fn find_edge(&self, id: EdgeId) -> Option<&Edge> {
        self.entities.iter().find_map(|entity| match entity {
            Entity::Edge(edge) if edge.id() == id => Some(edge),
            Entity::Edge(_) => None,
            Entity::Node(node) => node.region().find_edge(id),
        })
    }
}

/// A child of a region.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Node(Node),
    Edge(Edge),
}

impl From<Node> for Entity {
    fn from(node: Node) -> Self {
        Entity::Node(node)
    }
}

impl From<Edge> for Entity {
    fn from(edge: Edge) -> Self {
        Entity::Edge(edge)
    }
}

/// A box in the grid, optionally named, owning a nested region.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: NodeId,
    name: Option<Name>,
    span: Span,
    config: Config,
    region: Region,
}

impl Node {
    pub fn new(id: NodeId, name: Option<Name>, span: Span, config: Config, region: Region) -> Self {
        Self {
            id,
            name,
            span,
            config,
            region,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The declared name, or `None` for an anonymous node.
    pub fn name(&self) -> Option<&Name> {
        self.name.as_ref()
    }

    /// Span of the whole declaration.
    pub fn span(&self) -> Span {
        self.span
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    /// Display name used in diagnostics and logs.
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) => name.as_str().to_string(),
            None => format!("<anonymous {}>", self.id),
        }
    }
}

/// Direction of the arrowheads drawn on an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ArrowDirection {
    #[default]
    None,
    /// Arrowhead at the target end.
    Forward,
    /// Arrowhead at the source end.
    Backward,
    Both,
}

impl ArrowDirection {
    pub fn has_start(self) -> bool {
        matches!(self, ArrowDirection::Backward | ArrowDirection::Both)
    }

    pub fn has_end(self) -> bool {
        matches!(self, ArrowDirection::Forward | ArrowDirection::Both)
    }
}

/// One end of an edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    node: NodeId,
    reference: Name,
    anchor: Anchor,
    offset: Point,
}

impl Endpoint {
    pub fn new(node: NodeId, reference: Name, anchor: Anchor, offset: Point) -> Self {
        Self {
            node,
            reference,
            anchor,
            offset,
        }
    }

    /// The resolved target node.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The name as written at the reference site.
    pub fn reference(&self) -> &Name {
        &self.reference
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    /// Offset applied after anchor resolution, in the node's local units.
    pub fn offset(&self) -> Point {
        self.offset
    }
}

/// A straight connector between two nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    id: EdgeId,
    from: Endpoint,
    to: Endpoint,
    stroke: StrokeDefinition,
    arrow: ArrowDirection,
    label: Option<StyledText>,
    span: Span,
}

impl Edge {
    pub fn new(id: EdgeId, from: Endpoint, to: Endpoint, span: Span) -> Self {
        Self {
            id,
            from,
            to,
            stroke: StrokeDefinition::default(),
            arrow: ArrowDirection::None,
            label: None,
            span,
        }
    }

    pub fn id(&self) -> EdgeId {
        self.id
    }

    pub fn from(&self) -> &Endpoint {
        &self.from
    }

    pub fn to(&self) -> &Endpoint {
        &self.to
    }

    pub fn stroke(&self) -> &StrokeDefinition {
        &self.stroke
    }

    pub fn arrow(&self) -> ArrowDirection {
        self.arrow
    }

    pub fn label(&self) -> Option<&StyledText> {
        self.label.as_ref()
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn with_stroke(mut self, stroke: StrokeDefinition) -> Self {
        self.stroke = stroke;
        self
    }

    pub fn with_arrow(mut self, arrow: ArrowDirection) -> Self {
        self.arrow = arrow;
        self
    }

    pub fn with_label(mut self, label: Option<StyledText>) -> Self {
        self.label = label;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: u32, name: Option<&str>, region: Region) -> Node {
        Node::new(
            NodeId::new(id),
            name.map(|n| Name::new(n, Span::default())),
            Span::default(),
            Config::default(),
            region,
        )
    }

    fn endpoint(id: u32) -> Endpoint {
        Endpoint::new(
            NodeId::new(id),
            Name::new("x", Span::default()),
            Anchor::NoAnchor,
            Point::default(),
        )
    }

    #[test]
    fn test_region_nodes_and_edges_keep_order() {
        let region = Region::default()
            .with(node(0, Some("a"), Region::default()))
            .with(Edge::new(EdgeId::new(0), endpoint(0), endpoint(1), Span::default()))
            .with(node(1, Some("b"), Region::default()));

        let ids: Vec<_> = region.nodes().map(Node::id).collect();
        assert_eq!(ids, vec![NodeId::new(0), NodeId::new(1)]);
        assert_eq!(region.edges().count(), 1);
        assert!(matches!(region.entities()[1], Entity::Edge(_)));
    }

    #[test]
    fn test_region_find_node_and_edge_nested() {
        let inner = Region::default()
            .with(node(2, Some("deep"), Region::default()))
            .with(Edge::new(EdgeId::new(7), endpoint(2), endpoint(2), Span::default()));
        let region = Region::default().with(node(1, None, inner));

        assert_eq!(
            region.find_node(NodeId::new(2)).and_then(Node::name).map(Name::as_str),
            Some("deep")
        );
        assert!(region.find_node(NodeId::new(9)).is_none());
        assert!(region.find_edge(EdgeId::new(7)).is_some());
    }

    #[test]
    fn test_node_display_name() {
        assert_eq!(node(3, Some("web"), Region::default()).display_name(), "web");
        assert_eq!(node(3, None, Region::default()).display_name(), "<anonymous n3>");
    }

    #[test]
    fn test_arrow_direction_ends() {
        assert!(ArrowDirection::Forward.has_end());
        assert!(!ArrowDirection::Forward.has_start());
        assert!(ArrowDirection::Both.has_start() && ArrowDirection::Both.has_end());
        assert!(!ArrowDirection::None.has_end());
    }
}
