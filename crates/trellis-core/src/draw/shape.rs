//! Shape kinds and their anchor tables.
//!
//! Each shape exposes a table of compass anchors computed from its bounding
//! box. Only points that are geometrically meaningful for the shape are
//! present: an ellipse has no corners, a triangle has no east or west.

use std::{f32::consts::FRAC_1_SQRT_2, fmt, str::FromStr};

use serde::Deserialize;

use crate::{
    geometry::{Bounds, Point},
    ir::Compass,
};

/// Fraction of the width by which each top corner of a trapezoid is inset.
const TRAPEZOID_INSET: f32 = 0.25;

/// Fraction of the shorter side cut from each corner of an octagon.
const OCTAGON_CUT: f32 = 1.0 - FRAC_1_SQRT_2;

/// The outline drawn for a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Rectangle,
    RoundedRectangle,
    Ellipse,
    Diamond,
    /// Narrow side on top.
    Trapezoid,
    /// Apex on top.
    Triangle,
    Octagon,
}

impl ShapeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::RoundedRectangle => "rounded_rectangle",
            ShapeKind::Ellipse => "ellipse",
            ShapeKind::Diamond => "diamond",
            ShapeKind::Trapezoid => "trapezoid",
            ShapeKind::Triangle => "triangle",
            ShapeKind::Octagon => "octagon",
        }
    }

    /// Anchor table for a shape occupying `bounds`, in enumeration order.
    ///
    /// `rounding` is the corner radius and only affects rounded rectangles.
    pub fn anchor_table(self, bounds: Bounds, rounding: f32) -> Vec<(Compass, Point)> {
        let (x0, y0, x1, y1) = (bounds.min_x(), bounds.min_y(), bounds.max_x(), bounds.max_y());
        let center = bounds.center();
        let (cx, cy) = (center.x(), center.y());
        let (w, h) = (bounds.width(), bounds.height());
        let p = Point::new;

        match self {
            ShapeKind::Rectangle => rectangle_table(bounds),
            ShapeKind::RoundedRectangle => {
                let radius = rounding.clamp(0.0, w.min(h) / 2.0);
                // Midpoint of a quarter arc, measured from the box corner.
                let k = radius * (1.0 - FRAC_1_SQRT_2);
                vec![
                    (Compass::N, p(cx, y0)),
                    (Compass::NE, p(x1 - k, y0 + k)),
                    (Compass::E, p(x1, cy)),
                    (Compass::SE, p(x1 - k, y1 - k)),
                    (Compass::S, p(cx, y1)),
                    (Compass::SW, p(x0 + k, y1 - k)),
                    (Compass::W, p(x0, cy)),
                    (Compass::NW, p(x0 + k, y0 + k)),
                ]
            }
            ShapeKind::Ellipse => vec![
                (Compass::N, p(cx, y0)),
                (Compass::E, p(x1, cy)),
                (Compass::S, p(cx, y1)),
                (Compass::W, p(x0, cy)),
            ],
            ShapeKind::Diamond => vec![
                (Compass::N, p(cx, y0)),
                (Compass::NE, p(x0 + w * 0.75, y0 + h * 0.25)),
                (Compass::E, p(x1, cy)),
                (Compass::SE, p(x0 + w * 0.75, y0 + h * 0.75)),
                (Compass::S, p(cx, y1)),
                (Compass::SW, p(x0 + w * 0.25, y0 + h * 0.75)),
                (Compass::W, p(x0, cy)),
                (Compass::NW, p(x0 + w * 0.25, y0 + h * 0.25)),
            ],
            ShapeKind::Trapezoid => {
                let inset = w * TRAPEZOID_INSET;
                vec![
                    (Compass::N, p(cx, y0)),
                    (Compass::NE, p(x1 - inset, y0)),
                    (Compass::E, p(x1 - inset / 2.0, cy)),
                    (Compass::SE, p(x1, y1)),
                    (Compass::S, p(cx, y1)),
                    (Compass::SW, p(x0, y1)),
                    (Compass::W, p(x0 + inset / 2.0, cy)),
                    (Compass::NW, p(x0 + inset, y0)),
                ]
            }
            ShapeKind::Triangle => vec![
                (Compass::N, p(cx, y0)),
                (Compass::NE, p((cx + x1) / 2.0, cy)),
                (Compass::SE, p(x1, y1)),
                (Compass::S, p(cx, y1)),
                (Compass::SW, p(x0, y1)),
                (Compass::NW, p((x0 + cx) / 2.0, cy)),
            ],
            ShapeKind::Octagon => {
                let cut = w.min(h) * OCTAGON_CUT;
                vec![
                    (Compass::N, p(cx, y0)),
                    (Compass::NE, p(x1 - cut / 2.0, y0 + cut / 2.0)),
                    (Compass::E, p(x1, cy)),
                    (Compass::SE, p(x1 - cut / 2.0, y1 - cut / 2.0)),
                    (Compass::S, p(cx, y1)),
                    (Compass::SW, p(x0 + cut / 2.0, y1 - cut / 2.0)),
                    (Compass::W, p(x0, cy)),
                    (Compass::NW, p(x0 + cut / 2.0, y0 + cut / 2.0)),
                ]
            }
        }
    }

    /// Looks up a single anchor, `None` if the shape has no such entry.
    pub fn anchor(self, compass: Compass, bounds: Bounds, rounding: f32) -> Option<Point> {
        self.anchor_table(bounds, rounding)
            .into_iter()
            .find_map(|(c, point)| (c == compass).then_some(point))
    }

    /// Polygon vertices in clockwise order starting at the top-left-most
    /// vertex, or `None` for shapes with curved outlines.
    pub fn outline(self, bounds: Bounds) -> Option<Vec<Point>> {
        let (x0, y0, x1, y1) = (bounds.min_x(), bounds.min_y(), bounds.max_x(), bounds.max_y());
        let center = bounds.center();
        let p = Point::new;

        match self {
            ShapeKind::Rectangle => Some(vec![p(x0, y0), p(x1, y0), p(x1, y1), p(x0, y1)]),
            ShapeKind::RoundedRectangle | ShapeKind::Ellipse => None,
            ShapeKind::Diamond => Some(vec![
                p(center.x(), y0),
                p(x1, center.y()),
                p(center.x(), y1),
                p(x0, center.y()),
            ]),
            ShapeKind::Trapezoid => {
                let inset = bounds.width() * TRAPEZOID_INSET;
                Some(vec![p(x0 + inset, y0), p(x1 - inset, y0), p(x1, y1), p(x0, y1)])
            }
            ShapeKind::Triangle => Some(vec![p(center.x(), y0), p(x1, y1), p(x0, y1)]),
            ShapeKind::Octagon => {
                let cut = bounds.width().min(bounds.height()) * OCTAGON_CUT;
                Some(vec![
                    p(x0 + cut, y0),
                    p(x1 - cut, y0),
                    p(x1, y0 + cut),
                    p(x1, y1 - cut),
                    p(x1 - cut, y1),
                    p(x0 + cut, y1),
                    p(x0, y1 - cut),
                    p(x0, y0 + cut),
                ])
            }
        }
    }
}

/// Anchor table of a plain rectangle; also used for nodes without a shape.
pub fn rectangle_table(bounds: Bounds) -> Vec<(Compass, Point)> {
    let (x0, y0, x1, y1) = (bounds.min_x(), bounds.min_y(), bounds.max_x(), bounds.max_y());
    let center = bounds.center();
    let (cx, cy) = (center.x(), center.y());
    let p = Point::new;
    vec![
        (Compass::N, p(cx, y0)),
        (Compass::NE, p(x1, y0)),
        (Compass::E, p(x1, cy)),
        (Compass::SE, p(x1, y1)),
        (Compass::S, p(cx, y1)),
        (Compass::SW, p(x0, y1)),
        (Compass::W, p(x0, cy)),
        (Compass::NW, p(x0, y0)),
    ]
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShapeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rectangle" | "rect" | "box" => Ok(ShapeKind::Rectangle),
            "rounded_rectangle" | "rounded-rectangle" | "rounded" => {
                Ok(ShapeKind::RoundedRectangle)
            }
            "ellipse" | "oval" | "circle" => Ok(ShapeKind::Ellipse),
            "diamond" => Ok(ShapeKind::Diamond),
            "trapezoid" => Ok(ShapeKind::Trapezoid),
            "triangle" => Ok(ShapeKind::Triangle),
            "octagon" => Ok(ShapeKind::Octagon),
            _ => Err(format!("unknown shape `{s}`")),
        }
    }
}
