//! Specular-map lighting attenuated by a shadow map.

use super::specular::{PhongMaps, PhongMaterial};
use super::{Fragment, Shader};
use crate::math::interpolate;
use crate::math::mat4::Mat4;
use crate::math::vec2::Vec2;
use crate::math::vec3::Vec3;
use crate::math::vec4::Vec4;
use crate::model::Triangle;
use crate::render::framebuffer::DepthBuffer;

/// Depth slack added to the fragment before comparing with the shadow map.
pub const SHADOW_BIAS: f32 = 3.5 / 225.0;

/// Diffuse factor of a fully shadowed fragment.
const SHADOW_AMBIENT: f32 = 0.3;

/// Diffuse scale for a fragment at `current` light depth when the shadow
/// map holds `closest`.
#[inline]
pub fn shadow_factor(closest: f32, current: f32) -> f32 {
    let lit = if closest < current + SHADOW_BIAS { 1.0 } else { 0.0 };
    SHADOW_AMBIENT + (1.0 - SHADOW_AMBIENT) * lit
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ShadowVarying {
    uv: Vec2,
    /// Perspective-divided screen position.
    position: Vec3,
}

#[derive(Clone, Debug)]
pub struct ShadowShader<'a> {
    transform: Mat4,
    mit: Mat4,
    /// Camera screen space to shadow map screen space.
    shadow_transform: Mat4,
    light: Vec3,
    maps: PhongMaps<'a>,
    shadow_map: &'a DepthBuffer,
    material: PhongMaterial,
}

impl<'a> ShadowShader<'a> {
    pub fn new(
        transform: Mat4,
        mit: Mat4,
        shadow_transform: Mat4,
        light: Vec3,
        maps: PhongMaps<'a>,
        shadow_map: &'a DepthBuffer,
    ) -> Self {
        Self {
            transform,
            mit,
            shadow_transform,
            light: light.normalize(),
            maps,
            shadow_map,
            material: PhongMaterial::default(),
        }
    }

    pub fn with_material(mut self, material: PhongMaterial) -> Self {
        self.material = material;
        self
    }

    /// Shadow factor at a camera screen point, or `None` when it maps
    /// outside the shadow map.
    fn shadow_at(&self, point: Vec3) -> Option<f32> {
        let light_point = self.shadow_transform * point;
        if !light_point.x.is_finite() || !light_point.y.is_finite() {
            return None;
        }
        let closest = self
            .shadow_map
            .get(light_point.x as i64, light_point.y as i64)?;
        Some(shadow_factor(closest, light_point.z))
    }
}

impl Shader for ShadowShader<'_> {
    type Varying = ShadowVarying;

    #[inline]
    fn vertex(&self, triangle: &Triangle, index: usize) -> (Vec4, Self::Varying) {
        let vertex = triangle[index];
        let clip = self.transform * Vec4::from(vertex.position);
        let varying = ShadowVarying {
            uv: vertex.uv,
            position: clip.to_vec3_perspective(),
        };
        (clip, varying)
    }

    fn fragment(
        &mut self,
        _: Fragment,
        barycentric: Vec3,
        varyings: &[Self::Varying; 3],
    ) -> Option<u32> {
        let point = interpolate(&varyings.map(|v| v.position), barycentric);
        let shadow = self.shadow_at(point)?;
        let uv = interpolate(&varyings.map(|v| v.uv), barycentric);
        Some(
            self.material
                .shade(&self.maps, &self.mit, self.light, uv, shadow),
        )
    }
}
