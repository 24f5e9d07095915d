//! Geometric primitives for composition and drawing.
//!
//! - [`Point`] - A 2D coordinate
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - An axis-aligned box defined by minimum and maximum coordinates
//! - [`Border`] - Independent spacing for each of the four sides
//!
//! # Coordinate System
//!
//! Trellis uses a coordinate system consistent with SVG:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! The origin is the top-left corner, X grows to the right and Y grows
//! downward.

use serde::Deserialize;

/// A 2D point in diagram coordinate space.
///
/// # Examples
///
/// ```
/// # use trellis_core::geometry::Point;
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::new(5.0, 5.0);
///
/// let sum = p1.add_point(p2);
/// assert_eq!(sum.x(), 15.0);
/// assert_eq!(sum.y(), 25.0);
///
/// let mid = p1.midpoint(p2);
/// assert_eq!(mid.x(), 7.5);
/// assert_eq!(mid.y(), 12.5);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct Point {
    #[serde(default)]
    x: f32,
    #[serde(default)]
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Returns true if both coordinates are zero
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Returns true if both coordinates are finite numbers
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Component-wise addition.
    pub fn add_point(self, other: Point) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }

    /// Component-wise subtraction.
    pub fn sub_point(self, other: Point) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }

    /// Returns the point halfway between `self` and `other`.
    pub fn midpoint(self, other: Point) -> Self {
        Self::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Euclidean length of the vector from the origin to this point.
    pub fn hypot(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Euclidean distance between two points.
    pub fn distance(self, other: Point) -> f32 {
        self.sub_point(other).hypot()
    }

    /// Multiplies both coordinates by `factor`.
    pub fn scale(self, factor: f32) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }
}

/// Width and height of an element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct Size {
    #[serde(default)]
    width: f32,
    #[serde(default)]
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn width(self) -> f32 {
        self.width
    }

    pub fn height(self) -> f32 {
        self.height
    }

    /// Component-wise maximum of two sizes.
    pub fn max(self, other: Size) -> Self {
        Self::new(self.width.max(other.width), self.height.max(other.height))
    }

    /// Grows the size by the border on every side.
    pub fn add_border(self, border: Border) -> Self {
        Self::new(
            self.width + border.horizontal_sum(),
            self.height + border.vertical_sum(),
        )
    }

    pub fn scale(self, factor: f32) -> Self {
        Self::new(self.width * factor, self.height * factor)
    }

    pub fn is_zero(self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }

    /// Returns true if both dimensions are finite and non-negative.
    pub fn is_valid(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width >= 0.0 && self.height >= 0.0
    }

    /// Stacks `other` below `self`, separated by `gap`.
    ///
    /// The width is the larger of the two and the heights add up.
    pub fn stack_vertical(self, other: Size, gap: f32) -> Self {
        Self::new(
            self.width.max(other.width),
            self.height + gap + other.height,
        )
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates bounds centered on `center`.
    pub fn new_from_center(center: Point, size: Size) -> Self {
        let half_width = size.width() / 2.0;
        let half_height = size.height() / 2.0;
        Self {
            min_x: center.x() - half_width,
            min_y: center.y() - half_height,
            max_x: center.x() + half_width,
            max_y: center.y() + half_height,
        }
    }

    /// Creates bounds whose top-left corner is `top_left`.
    pub fn new_from_top_left(top_left: Point, size: Size) -> Self {
        Self {
            min_x: top_left.x(),
            min_y: top_left.y(),
            max_x: top_left.x() + size.width(),
            max_y: top_left.y() + size.height(),
        }
    }

    pub fn min_x(self) -> f32 {
        self.min_x
    }

    pub fn min_y(self) -> f32 {
        self.min_y
    }

    pub fn max_x(self) -> f32 {
        self.max_x
    }

    pub fn max_y(self) -> f32 {
        self.max_y
    }

    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    pub fn center(self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Returns the top-left corner.
    pub fn min_point(self) -> Point {
        Point::new(self.min_x, self.min_y)
    }

    pub fn to_size(self) -> Size {
        Size::new(self.width(), self.height())
    }

    /// Returns true if `point` lies inside or on the edge of the bounds,
    /// allowing `tolerance` of slack on each side.
    pub fn contains(self, point: Point, tolerance: f32) -> bool {
        point.x() >= self.min_x - tolerance
            && point.x() <= self.max_x + tolerance
            && point.y() >= self.min_y - tolerance
            && point.y() <= self.max_y + tolerance
    }

    /// Smallest bounds containing both `self` and `other`.
    pub fn merge(self, other: Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Moves the bounds by `offset`.
    pub fn translate(self, offset: Point) -> Self {
        Self {
            min_x: self.min_x + offset.x(),
            min_y: self.min_y + offset.y(),
            max_x: self.max_x + offset.x(),
            max_y: self.max_y + offset.y(),
        }
    }

    /// Shrinks the bounds by the border on every side.
    pub fn shrink(self, border: Border) -> Self {
        Self {
            min_x: self.min_x + border.left(),
            min_y: self.min_y + border.top(),
            max_x: self.max_x - border.right(),
            max_y: self.max_y - border.bottom(),
        }
    }
}

/// Spacing on each side of a box, used for padding.
///
/// Components are stored independently for left, top, right and bottom, in
/// that constructor order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Border {
    left: f32,
    top: f32,
    right: f32,
    bottom: f32,
}

impl Border {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Creates a border with the same value on every side.
    pub fn uniform(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn left(self) -> f32 {
        self.left
    }

    pub fn top(self) -> f32 {
        self.top
    }

    pub fn right(self) -> f32 {
        self.right
    }

    pub fn bottom(self) -> f32 {
        self.bottom
    }

    /// Sum of the left and right components.
    pub fn horizontal_sum(self) -> f32 {
        self.left + self.right
    }

    /// Sum of the top and bottom components.
    pub fn vertical_sum(self) -> f32 {
        self.top + self.bottom
    }

    /// Offset from a box's top-left corner to the top-left of its content.
    pub fn offset(self) -> Point {
        Point::new(self.left, self.top)
    }

    /// Returns true if every component is finite and non-negative.
    pub fn is_valid(self) -> bool {
        [self.left, self.top, self.right, self.bottom]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
    }

    /// Replaces negative or non-finite components with zero.
    pub fn clamped(self) -> Self {
        let fix = |v: f32| if v.is_finite() && v > 0.0 { v } else { 0.0 };
        Self::new(fix(self.left), fix(self.top), fix(self.right), fix(self.bottom))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(b.distance(a), 5.0);
    }

    #[test]
    fn test_size_add_border() {
        let size = Size::new(10.0, 20.0).add_border(Border::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(size, Size::new(14.0, 26.0));
    }

    #[test]
    fn test_size_stack_vertical() {
        let stacked = Size::new(10.0, 5.0).stack_vertical(Size::new(30.0, 20.0), 2.0);
        assert_eq!(stacked, Size::new(30.0, 27.0));
    }

    #[test]
    fn test_size_is_valid() {
        assert!(Size::new(0.0, 1.0).is_valid());
        assert!(!Size::new(-1.0, 1.0).is_valid());
        assert!(!Size::new(f32::NAN, 1.0).is_valid());
    }

    #[test]
    fn test_bounds_from_center_and_top_left_agree() {
        let a = Bounds::new_from_center(Point::new(5.0, 5.0), Size::new(10.0, 10.0));
        let b = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(10.0, 10.0));
        assert_eq!(a, b);
        assert_eq!(a.center(), Point::new(5.0, 5.0));
    }

    #[test]
    fn test_bounds_merge_and_translate() {
        let a = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(10.0, 10.0));
        let b = Bounds::new_from_top_left(Point::new(20.0, 5.0), Size::new(5.0, 20.0));
        let merged = a.merge(b);
        assert_eq!(merged.min_point(), Point::new(0.0, 0.0));
        assert_eq!(merged.to_size(), Size::new(25.0, 25.0));

        let moved = a.translate(Point::new(3.0, -2.0));
        assert_eq!(moved.min_point(), Point::new(3.0, -2.0));
        assert_eq!(moved.to_size(), a.to_size());
    }

    #[test]
    fn test_bounds_contains() {
        let bounds = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(10.0, 10.0));
        assert!(bounds.contains(Point::new(10.0, 0.0), 0.0));
        assert!(!bounds.contains(Point::new(10.5, 0.0), 0.0));
        assert!(bounds.contains(Point::new(10.5, 0.0), 1.0));
    }

    #[test]
    fn test_bounds_shrink() {
        let bounds = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(10.0, 10.0));
        let inner = bounds.shrink(Border::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(inner.min_point(), Point::new(1.0, 2.0));
        assert_eq!(inner.to_size(), Size::new(6.0, 4.0));
    }

    #[test]
    fn test_border_order_is_left_top_right_bottom() {
        let border = Border::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(border.left(), 1.0);
        assert_eq!(border.top(), 2.0);
        assert_eq!(border.right(), 3.0);
        assert_eq!(border.bottom(), 4.0);
        assert_eq!(border.horizontal_sum(), 4.0);
        assert_eq!(border.vertical_sum(), 6.0);
        assert_eq!(border.offset(), Point::new(1.0, 2.0));
    }

    #[test]
    fn test_border_validity_and_clamp() {
        assert!(Border::uniform(0.0).is_valid());
        let bad = Border::new(-1.0, f32::INFINITY, 2.0, 0.0);
        assert!(!bad.is_valid());
        assert_eq!(bad.clamped(), Border::new(0.0, 0.0, 2.0, 0.0));
    }
}
