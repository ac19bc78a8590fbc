//! Camera collaborator
//!
//! The ball only needs to know where it is relative to the visible frame.

use glam::Vec2;

use crate::consts::{MAP_HEIGHT, MAP_WIDTH};

pub trait Viewport {
    /// World position to screen fraction. `y < 0` is below the frame, `y > 1` above it.
    fn world_to_viewport(&self, pos: Vec2) -> Vec2;
}

/// Camera framing one whole course: the full map width, `MAP_HEIGHT` tall,
/// starting at the course bottom
#[derive(Debug, Clone, Copy)]
pub struct CourseCamera {
    pub bottom: f32,
    pub width: f32,
    pub height: f32,
}

impl CourseCamera {
    pub fn new(bottom: f32) -> Self {
        Self {
            bottom,
            width: MAP_WIDTH,
            height: MAP_HEIGHT,
        }
    }
}

impl Viewport for CourseCamera {
    fn world_to_viewport(&self, pos: Vec2) -> Vec2 {
        Vec2::new(
            (pos.x + self.width / 2.0) / self.width,
            (pos.y - self.bottom) / self.height,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection() {
        let camera = CourseCamera::new(60.0);
        let v = camera.world_to_viewport(Vec2::new(0.0, 90.0));
        assert!((v.x - 0.5).abs() < 1e-6);
        assert!((v.y - 0.5).abs() < 1e-6);
        assert!(camera.world_to_viewport(Vec2::new(0.0, 59.0)).y < 0.0);
    }
}
