//! Lighting types for the renderer.

use crate::math::mat4::Mat4;
use crate::math::vec3::Vec3;

/// A directional light, stored as the unit vector pointing *toward* the
/// light.
///
/// Shaders compute `dot(normal, direction)` directly, so surfaces facing the
/// light get a positive intensity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    direction: Vec3,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self::new(Vec3::ONE)
    }
}

impl DirectionalLight {
    /// The direction will be normalized automatically.
    pub fn new(direction: Vec3) -> Self {
        Self {
            direction: direction.normalize(),
        }
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Unclamped Lambert term; negative when the surface faces away.
    pub fn intensity(&self, normal: Vec3) -> f32 {
        normal.normalize().dot(self.direction)
    }

    /// The direction carried into the space of `transform` (typically
    /// projection × model-view) as a point, then re-normalized.
    pub fn transformed(&self, transform: &Mat4) -> Vec3 {
        (*transform * self.direction).normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_direct_illumination() {
        let light = DirectionalLight::new(Vec3::new(0.0, 0.0, 2.0));
        assert_relative_eq!(light.intensity(Vec3::FORWARD), 1.0);
    }

    #[test]
    fn test_facing_away_is_negative() {
        let light = DirectionalLight::new(Vec3::FORWARD);
        assert_relative_eq!(light.intensity(-Vec3::FORWARD), -1.0);
    }

    #[test]
    fn test_angled_illumination() {
        let light = DirectionalLight::new(Vec3::UP);
        let normal = Vec3::new(0.0, 1.0, 1.0);
        assert_relative_eq!(light.intensity(normal), std::f32::consts::FRAC_1_SQRT_2, epsilon = 1e-6);
    }

    #[test]
    fn transformed_keeps_lambert_term_under_rotation() {
        let light = DirectionalLight::new(Vec3::new(1.0, 1.0, 1.0));
        let view = Mat4::look_at(Vec3::new(1.0, 1.0, 3.0), Vec3::ZERO, Vec3::UP);
        let normal = Vec3::new(0.2, 0.9, -0.1).normalize();

        let eye_light = light.transformed(&view);
        let eye_normal = view.transform_direction(normal);
        assert_relative_eq!(eye_normal.dot(eye_light), light.intensity(normal), epsilon = 1e-5);
    }

    #[test]
    fn transformed_applies_translation() {
        let light = DirectionalLight::new(Vec3::UP);
        let moved = light.transformed(&Mat4::translation(1.0, 0.0, 0.0));
        let expected = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert_relative_eq!(moved.x, expected.x, epsilon = 1e-6);
        assert_relative_eq!(moved.y, expected.y, epsilon = 1e-6);
        assert_relative_eq!(moved.z, expected.z, epsilon = 1e-6);
    }
}
