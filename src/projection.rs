//! Projection and viewport parameters.
//!
//! [`Projection`] is the single-coefficient perspective used throughout the
//! renderer: identity except for `m[3][2] = -1 / c`, where `c` is the camera
//! distance. [`Viewport`] maps normalized device coordinates onto a pixel
//! rectangle and depth onto `[0, 1]`.

use crate::math::mat4::Mat4;

/// Perspective projection parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// `-1 / c`; zero means orthographic.
    coefficient: f32,
}

impl Projection {
    pub fn new(coefficient: f32) -> Self {
        Self { coefficient }
    }

    /// Perspective for a camera `distance` units from its target.
    ///
    /// A non-positive or non-finite distance yields an orthographic
    /// projection.
    pub fn from_distance(distance: f32) -> Self {
        if distance > 0.0 && distance.is_finite() {
            Self::new(-1.0 / distance)
        } else {
            Self::orthographic()
        }
    }

    /// Identity projection, used for the light's view in shadow mapping.
    pub fn orthographic() -> Self {
        Self::new(0.0)
    }

    pub fn coefficient(&self) -> f32 {
        self.coefficient
    }

    /// Generates the projection matrix.
    pub fn matrix(&self) -> Mat4 {
        Mat4::projection(self.coefficient)
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::orthographic()
    }
}

/// Screen rectangle the normalized device square is mapped onto.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The whole `width` x `height` image.
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0.0, 0.0, width as f32, height as f32)
    }

    /// The centered rectangle covering 3/4 of the image, leaving 1/8 on
    /// every side. Offsets and sizes are whole pixels.
    pub fn inset(width: u32, height: u32) -> Self {
        Self::new(
            (width / 8) as f32,
            (height / 8) as f32,
            (width * 3 / 4) as f32,
            (height * 3 / 4) as f32,
        )
    }

    /// Generates the viewport matrix.
    pub fn matrix(&self) -> Mat4 {
        Mat4::viewport(self.x, self.y, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::vec3::Vec3;
    use approx::assert_relative_eq;

    #[test]
    fn projection_from_distance() {
        assert_relative_eq!(Projection::from_distance(4.0).coefficient(), -0.25);
        assert_eq!(Projection::from_distance(0.0), Projection::orthographic());
        assert_eq!(Projection::orthographic().matrix(), Mat4::identity());
    }

    #[test]
    fn inset_viewport_of_800() {
        let viewport = Viewport::inset(800, 800);
        assert_eq!(viewport, Viewport::new(100.0, 100.0, 600.0, 600.0));

        // NDC corners land on the inset rectangle.
        let m = viewport.matrix();
        assert_eq!(m * Vec3::new(-1.0, -1.0, -1.0), Vec3::new(100.0, 100.0, 0.0));
        assert_eq!(m * Vec3::new(1.0, 1.0, 1.0), Vec3::new(700.0, 700.0, 1.0));
    }

    #[test]
    fn inset_truncates_odd_sizes() {
        assert_eq!(Viewport::inset(10, 10), Viewport::new(1.0, 1.0, 7.0, 7.0));
    }
}
