//! Resolution of edge endpoints to global points.
//!
//! A closest anchor measures distances to the other endpoint's reference
//! point: its center when it is closest-anchored as well, otherwise the point
//! it resolved to. Two closest anchors therefore never depend on each other.

use trellis_core::{
    draw::rectangle_table,
    geometry::Point,
    ir::{Anchor, ClosestKind, Compass},
};

use crate::compose::place::Placed;

/// One end of an edge: the placed node, how to attach and the local offset.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Attachment<'p> {
    pub placed: &'p Placed,
    pub anchor: Anchor,
    pub offset: Point,
}

/// A resolved endpoint. `available` is false when the anchor does not exist
/// on the node's shape and the center was used instead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Resolved {
    pub point: Point,
    pub available: bool,
}

impl Attachment<'_> {
    fn table(&self) -> Vec<(Compass, Point)> {
        let bounds = self.placed.bounds;
        match self.placed.shape {
            Some(kind) => kind.anchor_table(bounds, self.placed.rounding),
            None => rectangle_table(bounds),
        }
    }

    fn center(&self) -> Point {
        self.placed.bounds.center()
    }

    /// Applies the offset, given in the node's local units.
    fn offset(&self, resolved: Resolved) -> Resolved {
        Resolved {
            point: resolved
                .point
                .add_point(self.offset.scale(self.placed.scale)),
            ..resolved
        }
    }

    /// Resolves an anchor that does not depend on the other endpoint.
    fn fixed(&self) -> Resolved {
        let resolved = match self.anchor {
            Anchor::NoAnchor | Anchor::Closest(_) => Resolved {
                point: self.center(),
                available: true,
            },
            Anchor::Specific(compass) => match lookup(&self.table(), compass) {
                Some(point) => Resolved {
                    point,
                    available: true,
                },
                None => Resolved {
                    point: self.center(),
                    available: false,
                },
            },
        };
        self.offset(resolved)
    }

    /// The table entry nearest to `target`; the first one wins ties.
    fn closest(&self, kind: ClosestKind, target: Point) -> Resolved {
        let mut best: Option<(f32, Point)> = None;
        for (compass, point) in self.table() {
            if kind == ClosestKind::Corners && !compass.is_corner() {
                continue;
            }
            let distance = point.distance(target);
            if best.is_none_or(|(nearest, _)| distance < nearest) {
                best = Some((distance, point));
            }
        }
        let resolved = match best {
            Some((_, point)) => Resolved {
                point,
                available: true,
            },
            None => Resolved {
                point: self.center(),
                available: false,
            },
        };
        self.offset(resolved)
    }

    /// Point the other endpoint measures its distance to.
    fn reference(&self, fixed: Resolved) -> Point {
        if self.anchor.is_closest() {
            self.center()
        } else {
            fixed.point
        }
    }
}

fn lookup(table: &[(Compass, Point)], compass: Compass) -> Option<Point> {
    table
        .iter()
        .find_map(|&(c, point)| (c == compass).then_some(point))
}

/// Resolves both endpoints of an edge.
pub(crate) fn resolve_pair(from: &Attachment<'_>, to: &Attachment<'_>) -> (Resolved, Resolved) {
    let from_fixed = from.fixed();
    let to_fixed = to.fixed();
    let from_reference = from.reference(from_fixed);
    let to_reference = to.reference(to_fixed);

    let start = match from.anchor {
        Anchor::Closest(kind) => from.closest(kind, to_reference),
        Anchor::NoAnchor | Anchor::Specific(_) => from_fixed,
    };
    let end = match to.anchor {
        Anchor::Closest(kind) => to.closest(kind, from_reference),
        Anchor::NoAnchor | Anchor::Specific(_) => to_fixed,
    };
    (start, end)
}
