#![forbid(unsafe_code)]

//! Geometric primitives.

use serde::{Deserialize, Serialize};

/// A point in device independent units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A width/height pair.
///
/// Either component may be infinite when used as a measure constraint.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// The empty size.
    pub const ZERO: Size = Size::new(0.0, 0.0);

    /// Create a new size.
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Extent along `axis`.
    #[inline]
    pub const fn along(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// True when both components are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.width.is_finite() && self.height.is_finite()
    }

    /// Component-wise minimum.
    #[inline]
    pub fn min(&self, other: Size) -> Size {
        Size::new(self.width.min(other.width), self.height.min(other.height))
    }

    /// Component-wise maximum.
    #[inline]
    pub fn max(&self, other: Size) -> Size {
        Size::new(self.width.max(other.width), self.height.max(other.height))
    }

    /// Equal within `tolerance` on both axes.
    #[inline]
    pub fn approx_eq(&self, other: Size, tolerance: f64) -> bool {
        (self.width - other.width).abs() <= tolerance
            && (self.height - other.height).abs() <= tolerance
    }
}

/// An axis-aligned rectangle with a top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle at the origin with the given size.
    #[inline]
    pub const fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    #[inline]
    pub const fn left(&self) -> f64 {
        self.x
    }

    #[inline]
    pub const fn top(&self) -> f64 {
        self.y
    }

    /// Right edge (exclusive).
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[inline]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Centre of the rectangle.
    #[inline]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Coordinate of the given side.
    #[inline]
    pub fn edge(&self, side: Side) -> f64 {
        match side {
            Side::Left => self.left(),
            Side::Top => self.top(),
            Side::Right => self.right(),
            Side::Bottom => self.bottom(),
        }
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Half-open containment test.
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// The smallest rectangle containing both.
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(x, y, right - x, bottom - y)
    }
}

/// Layout axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Left to right; sizes are widths.
    Horizontal,
    /// Top to bottom; sizes are heights.
    Vertical,
}

impl Axis {
    /// The side positioning walks toward along this axis.
    #[inline]
    pub const fn seek(self) -> Side {
        match self {
            Axis::Horizontal => Side::Right,
            Axis::Vertical => Side::Bottom,
        }
    }

    #[inline]
    pub const fn cross(self) -> Axis {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }
}

/// One of the four sides of a pane.
///
/// Neighbor lists on the Left and Right sides are ordered top to bottom;
/// lists on the Top and Bottom sides are ordered left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Side {
    Left,
    Top,
    Right,
    #[default]
    Bottom,
}

impl Side {
    /// All sides in declaration order.
    pub const ALL: [Side; 4] = [Side::Left, Side::Top, Side::Right, Side::Bottom];

    /// Dense index for per-side arrays.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub const fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Top => Side::Bottom,
            Side::Right => Side::Left,
            Side::Bottom => Side::Top,
        }
    }

    /// The side a quarter turn clockwise when looking at this side from inside the pane.
    #[inline]
    pub const fn clockwise(self) -> Side {
        match self {
            Side::Bottom => Side::Left,
            Side::Left => Side::Top,
            Side::Right => Side::Bottom,
            Side::Top => Side::Right,
        }
    }

    #[inline]
    pub const fn counter_clockwise(self) -> Side {
        match self {
            Side::Bottom => Side::Right,
            Side::Left => Side::Bottom,
            Side::Right => Side::Top,
            Side::Top => Side::Left,
        }
    }

    /// The orthogonal side with the larger coordinate.
    #[inline]
    pub const fn max_orthogonal(self) -> Side {
        match self {
            Side::Left | Side::Right => Side::Bottom,
            Side::Top | Side::Bottom => Side::Right,
        }
    }

    /// The orthogonal side with the smaller coordinate.
    #[inline]
    pub const fn min_orthogonal(self) -> Side {
        match self {
            Side::Left | Side::Right => Side::Top,
            Side::Top | Side::Bottom => Side::Left,
        }
    }

    /// The axis a splitter on this side moves along.
    #[inline]
    pub const fn axis(self) -> Axis {
        match self {
            Side::Left | Side::Right => Axis::Horizontal,
            Side::Top | Side::Bottom => Axis::Vertical,
        }
    }

    /// True for Right and Bottom.
    #[inline]
    pub const fn is_far(self) -> bool {
        matches!(self, Side::Right | Side::Bottom)
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Side::Left => "left",
            Side::Top => "top",
            Side::Right => "right",
            Side::Bottom => "bottom",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn rect_edges_and_center() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(r.right(), 40.0);
        assert_eq!(r.bottom(), 60.0);
        assert_eq!(r.edge(Side::Left), 10.0);
        assert_eq!(r.edge(Side::Bottom), 60.0);
        assert_eq!(r.center(), Point::new(25.0, 40.0));
        assert!(r.contains(Point::new(10.0, 20.0)));
        assert!(!r.contains(Point::new(40.0, 20.0)));
    }

    #[test]
    fn rect_union_spans_both() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(20.0, 5.0, 10.0, 10.0);
        assert_eq!(a.union(&b), Rect::new(0.0, 0.0, 30.0, 15.0));
    }

    #[test]
    fn side_tables_match_orientation() {
        assert_eq!(Side::Bottom.clockwise(), Side::Left);
        assert_eq!(Side::Bottom.counter_clockwise(), Side::Right);
        assert_eq!(Side::Left.clockwise(), Side::Top);
        assert_eq!(Side::Top.counter_clockwise(), Side::Left);
        assert_eq!(Side::Right.max_orthogonal(), Side::Bottom);
        assert_eq!(Side::Top.min_orthogonal(), Side::Left);
        assert_eq!(Side::Left.axis(), Axis::Horizontal);
        assert_eq!(Axis::Vertical.seek(), Side::Bottom);
    }

    #[test]
    fn size_helpers() {
        let s = Size::new(3.0, 4.0);
        assert_eq!(s.along(Axis::Vertical), 4.0);
        assert!(s.approx_eq(Size::new(3.05, 3.95), 0.1));
        assert!(!Size::new(f64::INFINITY, 1.0).is_finite());
    }

    fn any_side() -> impl Strategy<Value = Side> {
        prop_oneof![
            Just(Side::Left),
            Just(Side::Top),
            Just(Side::Right),
            Just(Side::Bottom)
        ]
    }

    proptest! {
        #[test]
        fn rotations_are_consistent(side in any_side()) {
            prop_assert_eq!(side.opposite().opposite(), side);
            prop_assert_eq!(side.clockwise().counter_clockwise(), side);
            prop_assert_eq!(side.clockwise().clockwise(), side.opposite());
            prop_assert_eq!(side.axis(), side.opposite().axis());
            prop_assert_ne!(side.max_orthogonal().axis(), side.axis());
            prop_assert_eq!(Side::ALL[side.index()], side);
        }
    }
}
