//! Flat (per-face) lighting.
//!
//! One intensity per triangle, `dot(face_normal, light)`. Faces turned away
//! from the light (intensity <= 0) are discarded and keep the background.

use super::{Fragment, Shader};
use crate::colors;
use crate::math::interpolate;
use crate::math::mat4::Mat4;
use crate::math::vec2::Vec2;
use crate::math::vec3::Vec3;
use crate::math::vec4::Vec4;
use crate::model::Triangle;
use crate::texture::Texture;

/// Flat shader - white modulated by the face intensity.
#[derive(Clone, Debug)]
pub struct FlatShader {
    transform: Mat4,
    light: Vec3,
}

impl FlatShader {
    /// `light` is the direction toward the light in object space.
    pub fn new(transform: Mat4, light: Vec3) -> Self {
        Self {
            transform,
            light: light.normalize(),
        }
    }
}

impl Shader for FlatShader {
    type Varying = f32;

    #[inline]
    fn vertex(&self, triangle: &Triangle, index: usize) -> (Vec4, f32) {
        let intensity = triangle.face_normal().dot(self.light);
        let clip = self.transform * Vec4::from(triangle[index].position);
        (clip, intensity)
    }

    #[inline]
    fn fragment(&mut self, _: Fragment, _: Vec3, varyings: &[f32; 3]) -> Option<u32> {
        let intensity = varyings[0];
        if !(intensity > 0.0) {
            return None;
        }
        Some(colors::modulate(colors::WHITE, intensity))
    }
}

/// Per-vertex data of [`FlatTexturedShader`].
#[derive(Clone, Copy, Debug, Default)]
pub struct FlatTexturedVarying {
    uv: Vec2,
    intensity: f32,
}

/// Flat-textured shader - texture color modulated by the face intensity.
#[derive(Clone, Debug)]
pub struct FlatTexturedShader<'a> {
    transform: Mat4,
    light: Vec3,
    texture: &'a Texture,
}

impl<'a> FlatTexturedShader<'a> {
    pub fn new(transform: Mat4, light: Vec3, texture: &'a Texture) -> Self {
        Self {
            transform,
            light: light.normalize(),
            texture,
        }
    }
}

impl Shader for FlatTexturedShader<'_> {
    type Varying = FlatTexturedVarying;

    #[inline]
    fn vertex(&self, triangle: &Triangle, index: usize) -> (Vec4, Self::Varying) {
        let vertex = triangle[index];
        let varying = FlatTexturedVarying {
            uv: vertex.uv,
            intensity: triangle.face_normal().dot(self.light),
        };
        (self.transform * Vec4::from(vertex.position), varying)
    }

    #[inline]
    fn fragment(
        &mut self,
        _: Fragment,
        barycentric: Vec3,
        varyings: &[Self::Varying; 3],
    ) -> Option<u32> {
        let intensity = varyings[0].intensity;
        if !(intensity > 0.0) {
            return None;
        }
        let uv = interpolate(&varyings.map(|v| v.uv), barycentric);
        Some(colors::modulate(self.texture.sample(uv), intensity))
    }
}
