//! Geometric primitives: Point, Size, Rect and the layout `Axis`.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// One of the two layout axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Axis {
    /// Left to right
    #[default]
    Horizontal,
    /// Top to bottom
    Vertical,
}

impl Axis {
    /// True for [`Axis::Vertical`].
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Vertical)
    }

    /// The other axis.
    #[must_use]
    pub const fn cross(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }
}

/// A 2D point with x and y coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
}

impl Point {
    /// Origin point (0, 0)
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Coordinate along `axis`.
    #[must_use]
    pub const fn along(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A 2D size with width and height.
///
/// Layout sizes may be negative: a container margin is stored as a rect whose
/// size is the negated total inset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Size {
    /// Zero size
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    /// Create a new size.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Same value on both axes.
    #[must_use]
    pub const fn both(v: f32) -> Self {
        Self::new(v, v)
    }

    /// Extent along `axis`.
    #[must_use]
    pub const fn along(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// Build a size from a primary extent and a cross extent.
    #[must_use]
    pub const fn from_axis(axis: Axis, primary: f32, cross: f32) -> Self {
        match axis {
            Axis::Horizontal => Self::new(primary, cross),
            Axis::Vertical => Self::new(cross, primary),
        }
    }

    /// Scale size by a factor.
    #[must_use]
    pub fn scale(&self, factor: f32) -> Self {
        Self::new(self.width * factor, self.height * factor)
    }

    /// Raise each extent to the matching extent of `other` when that one is non-zero.
    pub fn maximize_non_zero(&mut self, other: Self) {
        if other.width != 0.0 {
            self.width = self.width.max(other.width);
        }
        if other.height != 0.0 {
            self.height = self.height.max(other.height);
        }
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Add for Size {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.width + rhs.width, self.height + rhs.height)
    }
}

impl Sub for Size {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.width - rhs.width, self.height - rhs.height)
    }
}

/// A rectangle defined by position and size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// X position of top-left corner
    pub x: f32,
    /// Y position of top-left corner
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create from two corner points.
    #[must_use]
    pub fn from_points(top_left: Point, bottom_right: Point) -> Self {
        Self::new(
            top_left.x,
            top_left.y,
            bottom_right.x - top_left.x,
            bottom_right.y - top_left.y,
        )
    }

    /// Create from size at origin.
    #[must_use]
    pub fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    /// Build a rect from primary/cross spans on `axis`.
    #[must_use]
    pub const fn from_axis(axis: Axis, pos: f32, len: f32, cross_pos: f32, cross_len: f32) -> Self {
        match axis {
            Axis::Horizontal => Self::new(pos, cross_pos, len, cross_len),
            Axis::Vertical => Self::new(cross_pos, pos, cross_len, len),
        }
    }

    /// Get the origin (top-left) point.
    #[must_use]
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Get the size.
    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Get bottom-right corner.
    #[must_use]
    pub fn bottom_right(&self) -> Point {
        Point::new(self.x + self.width, self.y + self.height)
    }

    /// Right edge.
    #[must_use]
    pub fn max_x(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn max_y(&self) -> f32 {
        self.y + self.height
    }

    /// Leading edge along `axis`.
    #[must_use]
    pub const fn start(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }

    /// Trailing edge along `axis`.
    #[must_use]
    pub fn end(&self, axis: Axis) -> f32 {
        self.start(axis) + self.size().along(axis)
    }

    /// Clamp this rect to `bounds`. A disjoint or empty result keeps a
    /// zero-sized rect at the clamped origin.
    #[must_use]
    pub fn clipped(&self, bounds: &Self) -> Self {
        let x = self.x.clamp(bounds.x, bounds.max_x().max(bounds.x));
        let y = self.y.clamp(bounds.y, bounds.max_y().max(bounds.y));
        let right = self.max_x().min(bounds.max_x());
        let bottom = self.max_y().min(bounds.max_y());
        Self::new(x, y, (right - x).max(0.0), (bottom - y).max(0.0))
    }

    /// Add `other`'s origin to this origin and `other`'s far corner to this far corner.
    ///
    /// With a margin rect of `(l, t, -(l + r), -(t + b))` this yields the inset content rect.
    #[must_use]
    pub fn plus(&self, other: &Self) -> Self {
        let br = self.bottom_right() + other.bottom_right();
        Self::from_points(self.origin() + other.origin(), br)
    }

    /// Grow by `e` on every side (shrinks for negative values).
    #[must_use]
    pub fn expanded(&self, e: Size) -> Self {
        Self::new(
            self.x - e.width,
            self.y - e.height,
            self.width + 2.0 * e.width,
            self.height + 2.0 * e.height,
        )
    }
}

impl Default for Rect {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }
}
