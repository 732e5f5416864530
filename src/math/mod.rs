//! Small fixed-size linear algebra used by the rasterizer.

pub mod mat4;
pub mod vec2;
pub mod vec3;
pub mod vec4;

use std::ops::{Add, Mul};

/// Interpolates three per-vertex values with barycentric weights.
///
/// `weights.x` belongs to `values[0]`, `weights.y` to `values[1]` and
/// `weights.z` to `values[2]`.
#[inline]
pub fn interpolate<T>(values: &[T; 3], weights: vec3::Vec3) -> T
where
    T: Copy + Add<Output = T> + Mul<f32, Output = T>,
{
    values[0] * weights.x + values[1] * weights.y + values[2] * weights.z
}
