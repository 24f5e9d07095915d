//! Top-down placement of sized frames into global coordinates.

use std::collections::HashMap;

use trellis_core::{
    draw::ShapeKind,
    geometry::{Bounds, Point},
    ir::{NodeId, Region},
};

use crate::compose::measure::Frame;

/// A container in global coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Placed {
    pub bounds: Bounds,
    /// Product of the scales of the container and all its ancestors.
    pub scale: f32,
    pub shape: Option<ShapeKind>,
    /// Corner radius in global units.
    pub rounding: f32,
    pub label: Option<Bounds>,
}

/// Global geometry of the root and of every node of the tree.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Placement {
    root: Placed,
    nodes: HashMap<NodeId, Placed>,
}

impl Placement {
    pub fn new(root: &Region, frame: &Frame) -> Self {
        let placed = placed(root.config().shape(), root.config().rounding(), frame, Point::default(), frame.scale);
        let mut placement = Self {
            root: placed,
            nodes: HashMap::new(),
        };
        placement.place_region(root, frame, Point::default(), frame.scale);
        placement
    }

    pub fn root(&self) -> &Placed {
        &self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&Placed> {
        self.nodes.get(&id)
    }

    /// Places the children of a container whose local origin maps to
    /// `origin` and whose local units are multiplied by `scale`.
    fn place_region(&mut self, region: &Region, frame: &Frame, origin: Point, scale: f32) {
        for (node, child) in region.nodes().zip(&frame.children) {
            let top_left = origin.add_point(child.top_left.scale(scale));
            let interior = scale * child.frame.scale;
            let config = node.config();
            let placed = placed(config.shape(), config.rounding(), &child.frame, top_left, interior);
            self.nodes.insert(node.id(), placed);
            self.place_region(node.region(), &child.frame, top_left, interior);
        }
    }
}

fn placed(
    shape: Option<ShapeKind>,
    rounding: f32,
    frame: &Frame,
    top_left: Point,
    scale: f32,
) -> Placed {
    let to_global = |bounds: Bounds| {
        Bounds::new_from_top_left(
            top_left.add_point(bounds.min_point().scale(scale)),
            bounds.to_size().scale(scale),
        )
    };
    let rounding = if rounding.is_finite() {
        rounding.max(0.0) * scale
    } else {
        0.0
    };
    Placed {
        bounds: Bounds::new_from_top_left(top_left, frame.local.scale(scale)),
        scale,
        shape,
        rounding,
        label: frame.label.map(to_global),
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use trellis_core::{
        geometry::Size,
        ir::{Config, Node},
        span::Span,
    };

    use super::*;
    use crate::compose::measure::ChildFrame;

    fn leaf(local: Size, scale: f32) -> Frame {
        Frame {
            local,
            scale,
            label: None,
            children: Vec::new(),
        }
    }

    #[test]
    fn test_scales_compose_down_the_tree() {
        let inner = Node::new(
            NodeId::new(1),
            None,
            Span::default(),
            Config::default(),
            Region::default(),
        );
        let outer_config = Config::default().with_scale(2.0);
        let outer = Node::new(
            NodeId::new(0),
            None,
            Span::default(),
            outer_config.clone(),
            Region::new(outer_config).with(inner),
        );
        let root = Region::default().with(outer);

        let inner_frame = Frame {
            label: Some(Bounds::new_from_top_left(Point::new(1.0, 1.0), Size::new(2.0, 2.0))),
            ..leaf(Size::new(4.0, 4.0), 3.0)
        };
        let outer_frame = Frame {
            children: vec![ChildFrame {
                top_left: Point::new(5.0, 0.0),
                frame: inner_frame,
            }],
            ..leaf(Size::new(20.0, 12.0), 2.0)
        };
        let root_frame = Frame {
            children: vec![ChildFrame {
                top_left: Point::new(0.0, 10.0),
                frame: outer_frame,
            }],
            ..leaf(Size::new(40.0, 34.0), 1.0)
        };

        let placement = Placement::new(&root, &root_frame);
        let outer = placement.node(NodeId::new(0)).unwrap();
        assert_eq!(outer.bounds, Bounds::new_from_top_left(Point::new(0.0, 10.0), Size::new(40.0, 24.0)));
        assert_approx_eq!(f32, outer.scale, 2.0);

        let inner = placement.node(NodeId::new(1)).unwrap();
        assert_approx_eq!(f32, inner.scale, 6.0);
        assert_eq!(inner.bounds.min_point(), Point::new(10.0, 10.0));
        assert_eq!(inner.bounds.to_size(), Size::new(24.0, 24.0));
        assert_eq!(
            inner.label,
            Some(Bounds::new_from_top_left(Point::new(16.0, 16.0), Size::new(12.0, 12.0)))
        );

        assert_eq!(placement.root().bounds.to_size(), Size::new(40.0, 34.0));
    }
}
