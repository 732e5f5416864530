//! Look-at camera.
//!
//! The camera is described by an eye position, a target point and an up
//! vector. The view matrix moves the target to the origin and rotates the
//! eye onto the +z axis; the eye's distance is carried by the projection
//! ([`Camera::projection`]) rather than by the view.

use crate::math::mat4::Mat4;
use crate::math::vec3::Vec3;
use crate::projection::Projection;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
}

impl Default for Camera {
    /// Eye at (1, 1, 3) looking at the origin, +y up.
    fn default() -> Self {
        Self::new(Vec3::new(1.0, 1.0, 3.0), Vec3::ZERO, Vec3::UP)
    }
}

impl Camera {
    pub fn new(eye: Vec3, target: Vec3, up: Vec3) -> Self {
        Self { eye, target, up }
    }

    /// Distance from the eye to the target.
    pub fn distance(&self) -> f32 {
        (self.eye - self.target).magnitude()
    }

    /// The model-view matrix.
    pub fn view(&self) -> Mat4 {
        Mat4::look_at(self.eye, self.target, self.up)
    }

    /// Perspective matching this camera's distance.
    pub fn projection(&self) -> Projection {
        Projection::from_distance(self.distance())
    }
}
