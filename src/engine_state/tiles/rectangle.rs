//! Axis-aligned world-space rectangles.

use cgmath::Point2;
use serde::{Deserialize, Serialize};

/// An axis-aligned box anchored at its lower-left corner `(x, y)`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    /// Left edge
    pub x: f32,
    /// Bottom edge
    pub y: f32,
    /// Width
    pub w: f32,
    /// Height
    pub h: f32,
}

impl Rectangle {
    /// Creates a rectangle from its lower-left corner and size.
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Separating-axis overlap test. Rectangles that only share an edge or a corner intersect.
    ///
    /// ```
    /// use tile_streamer::engine_state::tiles::Rectangle;
    ///
    /// let a = Rectangle::new(0.0, 0.0, 10.0, 10.0);
    /// assert!(a.intersects(&Rectangle::new(10.0, 0.0, 5.0, 5.0)));
    /// assert!(!a.intersects(&Rectangle::new(10.5, 0.0, 5.0, 5.0)));
    /// ```
    pub fn intersects(&self, other: &Rectangle) -> bool {
        !(other.x > self.x + self.w
            || other.x + other.w < self.x
            || other.y > self.y + self.h
            || other.y + other.h < self.y)
    }

    /// Grows the rectangle by `sx` on the left and right and by `sy` on the top and bottom.
    /// Negative values shrink it.
    pub fn scale(&self, sx: f32, sy: f32) -> Rectangle {
        Rectangle {
            x: self.x - sx,
            y: self.y - sy,
            w: self.w + 2.0 * sx,
            h: self.h + 2.0 * sy,
        }
    }

    /// Midpoint of the rectangle.
    pub fn center(&self) -> Point2<f32> {
        Point2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Whether `point` lies inside or on the boundary.
    pub fn contains_point(&self, point: Point2<f32>) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.w
            && point.y >= self.y
            && point.y <= self.y + self.h
    }
}
