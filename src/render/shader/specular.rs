//! Phong-style lighting with per-texel specular exponents.

use super::{transform_normal, Fragment, Shader};
use crate::colors;
use crate::math::interpolate;
use crate::math::mat4::Mat4;
use crate::math::vec2::Vec2;
use crate::math::vec3::Vec3;
use crate::math::vec4::Vec4;
use crate::model::Triangle;
use crate::texture::Texture;

/// Base added to every specular-map exponent.
const SPECULAR_EXPONENT_BASE: f32 = 15.0;

/// Weights of the Phong terms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhongMaterial {
    /// Added to the final color, unaffected by lighting.
    pub ambient: u32,
    /// Per-channel weight of the diffuse term.
    pub diffuse: Vec3,
    /// Per-channel weight of the specular term.
    pub specular: Vec3,
}

impl Default for PhongMaterial {
    fn default() -> Self {
        Self {
            ambient: colors::rgb(5, 5, 5),
            diffuse: Vec3::ONE,
            specular: Vec3::splat(1.6),
        }
    }
}

/// Texture maps read by the Phong shaders.
#[derive(Clone, Copy, Debug)]
pub struct PhongMaps<'a> {
    pub diffuse: &'a Texture,
    pub normal: &'a Texture,
    pub specular: &'a Texture,
}

impl PhongMaterial {
    /// Light one texel.
    ///
    /// `shadow` scales the diffuse term only; pass `1.0` for unshadowed
    /// surfaces.
    pub(crate) fn shade(
        &self,
        maps: &PhongMaps<'_>,
        mit: &Mat4,
        light: Vec3,
        uv: Vec2,
        shadow: f32,
    ) -> u32 {
        let normal = transform_normal(mit, maps.normal.sample_normal(uv));
        let diffuse = normal.dot(light);
        let reflection = (normal * (2.0 * diffuse) - light).normalize();
        let exponent = maps.specular.sample_specular(uv) + SPECULAR_EXPONENT_BASE;
        let specular = reflection.z.max(0.0).powf(exponent);

        let factors = self.diffuse * (shadow * diffuse) + self.specular * specular;
        colors::saturating_add(
            colors::modulate_rgb(maps.diffuse.sample(uv), factors),
            self.ambient,
        )
    }
}

/// Normal-mapped diffuse plus a specular highlight whose exponent comes from
/// a specular map.
#[derive(Clone, Debug)]
pub struct SpecularMapShader<'a> {
    transform: Mat4,
    mit: Mat4,
    light: Vec3,
    maps: PhongMaps<'a>,
    material: PhongMaterial,
}

impl<'a> SpecularMapShader<'a> {
    pub fn new(transform: Mat4, mit: Mat4, light: Vec3, maps: PhongMaps<'a>) -> Self {
        Self {
            transform,
            mit,
            light: light.normalize(),
            maps,
            material: PhongMaterial::default(),
        }
    }

    pub fn with_material(mut self, material: PhongMaterial) -> Self {
        self.material = material;
        self
    }
}

impl Shader for SpecularMapShader<'_> {
    type Varying = Vec2;

    #[inline]
    fn vertex(&self, triangle: &Triangle, index: usize) -> (Vec4, Vec2) {
        let vertex = triangle[index];
        (self.transform * Vec4::from(vertex.position), vertex.uv)
    }

    #[inline]
    fn fragment(&mut self, _: Fragment, barycentric: Vec3, varyings: &[Vec2; 3]) -> Option<u32> {
        let uv = interpolate(varyings, barycentric);
        Some(
            self.material
                .shade(&self.maps, &self.mit, self.light, uv, 1.0),
        )
    }
}
