//! # Camera State
//!
//! A 2D orthographic camera: a viewport-sized window anchored at a world position.
//!
//! The camera never rotates or zooms. Panning moves the anchor; the rectangle it covers is what
//! the chunk grid tests for visibility (after the engine widens it by the load margin).

use cgmath::{Point2, Vector2};

use crate::engine_state::tiles::Rectangle;

/// Position and extent of the view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// World-space lower-left corner of the view
    pub position: Point2<f32>,
    /// Width and height of the view in world units
    pub viewport: Vector2<f32>,
    /// World units moved per unit of pan input
    pub speed: f32,
}

impl Camera {
    /// Creates a camera whose view starts at `position`.
    pub fn new(position: Point2<f32>, viewport: Vector2<f32>, speed: f32) -> Self {
        Self {
            position,
            viewport,
            speed,
        }
    }

    /// The world-space rectangle covered by the view.
    pub fn rectangle(&self) -> Rectangle {
        Rectangle::new(
            self.position.x,
            self.position.y,
            self.viewport.x,
            self.viewport.y,
        )
    }

    /// Midpoint of the view.
    pub fn center(&self) -> Point2<f32> {
        self.position + self.viewport / 2.0
    }

    /// Pans by `(dx, dy)` units of input, each worth `speed` world units.
    pub fn move_by(&mut self, dx: f32, dy: f32) {
        self.position += Vector2::new(dx, dy) * self.speed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        Camera::new(Point2::new(0.0, 0.0), Vector2::new(800.0, 640.0), 10.0)
    }

    #[test]
    fn rectangle_is_anchored_at_the_position() {
        assert_eq!(camera().rectangle(), Rectangle::new(0.0, 0.0, 800.0, 640.0));
        assert_eq!(camera().center(), Point2::new(400.0, 320.0));
    }

    #[test]
    fn panning_is_scaled_by_speed() {
        let mut camera = camera();
        camera.move_by(1.0, -0.5);

        assert_eq!(camera.position, Point2::new(10.0, -5.0));
        assert_eq!(camera.rectangle(), Rectangle::new(10.0, -5.0, 800.0, 640.0));
    }
}
