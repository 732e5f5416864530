//! Gouraud (per-vertex) lighting and its toon and textured variants.
//!
//! The vertex stage computes `dot(normal, light)` per corner; the fragment
//! stage interpolates it with the barycentric weights. None of these shaders
//! discard: negative intensities simply clamp to black.

use super::{Fragment, Shader};
use crate::colors;
use crate::math::interpolate;
use crate::math::mat4::Mat4;
use crate::math::vec2::Vec2;
use crate::math::vec3::Vec3;
use crate::math::vec4::Vec4;
use crate::model::Triangle;
use crate::texture::Texture;

#[derive(Clone, Debug)]
pub struct GouraudShader {
    transform: Mat4,
    light: Vec3,
}

impl GouraudShader {
    pub fn new(transform: Mat4, light: Vec3) -> Self {
        Self {
            transform,
            light: light.normalize(),
        }
    }

    #[inline]
    fn lit_vertex(&self, triangle: &Triangle, index: usize) -> (Vec4, f32) {
        let vertex = triangle[index];
        let clip = self.transform * Vec4::from(vertex.position);
        (clip, vertex.normal.dot(self.light))
    }
}

impl Shader for GouraudShader {
    type Varying = f32;

    #[inline]
    fn vertex(&self, triangle: &Triangle, index: usize) -> (Vec4, f32) {
        self.lit_vertex(triangle, index)
    }

    #[inline]
    fn fragment(&mut self, _: Fragment, barycentric: Vec3, varyings: &[f32; 3]) -> Option<u32> {
        let intensity = interpolate(varyings, barycentric);
        Some(colors::modulate(colors::WHITE, intensity))
    }
}

/// Upper-exclusive thresholds and the band each one maps to, brightest first.
const TOON_BANDS: [(f32, f32); 5] = [
    (0.85, 1.0),
    (0.60, 0.80),
    (0.45, 0.60),
    (0.30, 0.45),
    (0.15, 0.30),
];

/// Quantize an intensity into one of six flat bands.
#[inline]
pub fn toon_band(intensity: f32) -> f32 {
    TOON_BANDS
        .iter()
        .find(|&&(threshold, _)| intensity > threshold)
        .map_or(0.0, |&(_, band)| band)
}

/// Gouraud lighting quantized into bands over a fixed orange base.
#[derive(Clone, Debug)]
pub struct ToonShader {
    gouraud: GouraudShader,
    base: u32,
}

impl ToonShader {
    pub fn new(transform: Mat4, light: Vec3) -> Self {
        Self {
            gouraud: GouraudShader::new(transform, light),
            base: colors::ORANGE,
        }
    }
}

impl Shader for ToonShader {
    type Varying = f32;

    #[inline]
    fn vertex(&self, triangle: &Triangle, index: usize) -> (Vec4, f32) {
        self.gouraud.lit_vertex(triangle, index)
    }

    #[inline]
    fn fragment(&mut self, _: Fragment, barycentric: Vec3, varyings: &[f32; 3]) -> Option<u32> {
        let intensity = toon_band(interpolate(varyings, barycentric));
        Some(colors::modulate(self.base, intensity))
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct GouraudTexturedVarying {
    uv: Vec2,
    intensity: f32,
}

/// Interpolated intensity times the texture color.
#[derive(Clone, Debug)]
pub struct GouraudTexturedShader<'a> {
    gouraud: GouraudShader,
    texture: &'a Texture,
}

impl<'a> GouraudTexturedShader<'a> {
    pub fn new(transform: Mat4, light: Vec3, texture: &'a Texture) -> Self {
        Self {
            gouraud: GouraudShader::new(transform, light),
            texture,
        }
    }
}

impl Shader for GouraudTexturedShader<'_> {
    type Varying = GouraudTexturedVarying;

    #[inline]
    fn vertex(&self, triangle: &Triangle, index: usize) -> (Vec4, Self::Varying) {
        let (clip, intensity) = self.gouraud.lit_vertex(triangle, index);
        let varying = GouraudTexturedVarying {
            uv: triangle[index].uv,
            intensity,
        };
        (clip, varying)
    }

    #[inline]
    fn fragment(
        &mut self,
        _: Fragment,
        barycentric: Vec3,
        varyings: &[Self::Varying; 3],
    ) -> Option<u32> {
        let uv = interpolate(&varyings.map(|v| v.uv), barycentric);
        let intensity = interpolate(&varyings.map(|v| v.intensity), barycentric);
        Some(colors::modulate(self.texture.sample(uv), intensity))
    }
}
