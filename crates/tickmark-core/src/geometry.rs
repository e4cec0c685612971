//! Geometric primitives for diagram layout.
//!
//! [`Point`] is a 2D coordinate in diagram space.
//!
//! # Coordinate System
//!
//! Tickmark uses a coordinate system consistent with SVG:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! The layout engine works in integer cell units and converts to [`Point`]
//! only when it hands coordinates to a graphics context, so every backend
//! receives exactly the same values.

/// A 2D point representing a position in diagram coordinate space.
///
/// # Examples
///
/// ```
/// # use tickmark_core::geometry::Point;
/// let p = Point::from_ints(10, 20);
/// assert_eq!(p, Point::new(10.0, 20.0));
/// assert_eq!(p.y(), 20.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Creates a point from integer layout coordinates
    pub fn from_ints(x: i32, y: i32) -> Self {
        Self {
            x: x as f32,
            y: y as f32,
        }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Mirrors the point vertically around the line `y = axis / 2`.
    ///
    /// Used by page-description backends whose y-axis grows upward.
    ///
    /// ```
    /// # use tickmark_core::geometry::Point;
    /// let p = Point::new(3.0, 10.0).flip_y(100.0);
    /// assert_eq!(p.y(), 90.0);
    /// ```
    pub fn flip_y(self, axis: f32) -> Self {
        Self {
            x: self.x,
            y: axis - self.y,
        }
    }
}
