//=========================================================================
// Geometry
//=========================================================================
//
// Page-space primitives shared by the element tree, the pointer layer and
// the drag session.
//
// Coordinates are CSS pixels with a top-left origin. "Client" coordinates
// are relative to the viewport, "page" coordinates include the viewport
// scroll offset.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::ops::{Add, Sub};

//=== Point ===============================================================

/// A position or offset in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// The origin (0, 0).
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

//=== Size ================================================================

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Self = Self { width: 0.0, height: 0.0 };

    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

//=== Rect ================================================================

/// Axis-aligned box: top-left corner plus size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn left(&self) -> f64 {
        self.origin.x
    }

    pub fn top(&self) -> f64 {
        self.origin.y
    }

    pub fn right(&self) -> f64 {
        self.origin.x + self.size.width
    }

    pub fn bottom(&self) -> f64 {
        self.origin.y + self.size.height
    }

    /// Returns `true` if `point` lies inside the box (edges inclusive).
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left()
            && point.x <= self.right()
            && point.y >= self.top()
            && point.y <= self.bottom()
    }

    /// Clamps the top-left corner of a box of `size` so the whole box stays
    /// inside `self`.
    ///
    /// When the box is larger than `self` on an axis it is pinned to the
    /// leading edge (left/top) on that axis.
    pub fn clamp_box(&self, position: Point, size: Size) -> Point {
        let clamp_axis = |value: f64, start: f64, extent: f64, length: f64| {
            let max = start + extent - length;
            value.min(max).max(start)
        };

        Point::new(
            clamp_axis(position.x, self.left(), self.size.width, size.width),
            clamp_axis(position.y, self.top(), self.size.height, size.height),
        )
    }
}

//=== Edges ===============================================================

/// Per-side widths (borders).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Edges {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Edges {
    pub const fn uniform(width: f64) -> Self {
        Self {
            left: width,
            top: width,
            right: width,
            bottom: width,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
