//! Per-pixel lighting from normal maps.
//!
//! [`NormalMapShader`] reads object-space normals straight from the map and
//! carries them into the lighting space with the normal matrix (inverse
//! transpose of projection × model-view). [`TangentNormalMapShader`] reads
//! tangent-space normals and builds a TBN frame per fragment from the
//! triangle's edges and UV deltas.

use super::{Fragment, Shader};
use crate::colors;
use crate::math::interpolate;
use crate::math::mat4::Mat4;
use crate::math::vec2::Vec2;
use crate::math::vec3::Vec3;
use crate::math::vec4::Vec4;
use crate::model::Triangle;
use crate::texture::Texture;

/// Inverse transpose of `transform`, or `None` when it is singular.
pub fn normal_matrix(transform: &Mat4) -> Option<Mat4> {
    transform.inverse().map(|inverse| inverse.transpose())
}

/// Carry `normal` through the normal matrix `mit` and re-normalize.
///
/// The normal goes through as a point (`w = 1`, divided by the resulting
/// `w`), so the translation column of `mit` applies.
#[inline]
pub fn transform_normal(mit: &Mat4, normal: Vec3) -> Vec3 {
    (*mit * normal).normalize()
}

#[derive(Clone, Debug)]
pub struct NormalMapShader<'a> {
    transform: Mat4,
    mit: Mat4,
    light: Vec3,
    diffuse: &'a Texture,
    normal_map: &'a Texture,
}

impl<'a> NormalMapShader<'a> {
    /// `mit` is the normal matrix and `light` the light direction, both in
    /// the same space.
    pub fn new(
        transform: Mat4,
        mit: Mat4,
        light: Vec3,
        diffuse: &'a Texture,
        normal_map: &'a Texture,
    ) -> Self {
        Self {
            transform,
            mit,
            light: light.normalize(),
            diffuse,
            normal_map,
        }
    }
}

impl Shader for NormalMapShader<'_> {
    type Varying = Vec2;

    #[inline]
    fn vertex(&self, triangle: &Triangle, index: usize) -> (Vec4, Vec2) {
        let vertex = triangle[index];
        (self.transform * Vec4::from(vertex.position), vertex.uv)
    }

    #[inline]
    fn fragment(&mut self, _: Fragment, barycentric: Vec3, varyings: &[Vec2; 3]) -> Option<u32> {
        let uv = interpolate(varyings, barycentric);
        let normal = transform_normal(&self.mit, self.normal_map.sample_normal(uv));
        let intensity = normal.dot(self.light);
        Some(colors::modulate(self.diffuse.sample(uv), intensity))
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct TangentVarying {
    uv: Vec2,
    /// Vertex normal carried by the normal matrix.
    normal: Vec3,
    /// Perspective-divided screen position.
    position: Vec3,
}

#[derive(Clone, Debug)]
pub struct TangentNormalMapShader<'a> {
    transform: Mat4,
    mit: Mat4,
    light: Vec3,
    diffuse: &'a Texture,
    normal_map: &'a Texture,
}

impl<'a> TangentNormalMapShader<'a> {
    pub fn new(
        transform: Mat4,
        mit: Mat4,
        light: Vec3,
        diffuse: &'a Texture,
        normal_map: &'a Texture,
    ) -> Self {
        Self {
            transform,
            mit,
            light: light.normalize(),
            diffuse,
            normal_map,
        }
    }
}

/// Build the tangent-to-lighting-space frame for one fragment.
///
/// Solves the 2x2 system relating the two triangle edges to their UV deltas.
/// Returns `None` when the UV mapping of the triangle is degenerate.
pub fn tangent_frame(positions: [Vec3; 3], uvs: [Vec2; 3], normal: Vec3) -> Option<Mat4> {
    let edge1 = positions[1] - positions[0];
    let edge2 = positions[2] - positions[0];
    let delta1 = uvs[1] - uvs[0];
    let delta2 = uvs[2] - uvs[0];

    let det = delta1.x * delta2.y - delta1.y * delta2.x;
    if det.abs() < f32::EPSILON {
        return None;
    }
    let f = 1.0 / det;

    let tangent = ((edge1 * delta2.y - edge2 * delta1.y) * f).normalize();
    let bitangent = ((edge2 * delta1.x - edge1 * delta2.x) * f).normalize();
    Some(Mat4::from_columns(tangent, bitangent, normal))
}

impl Shader for TangentNormalMapShader<'_> {
    type Varying = TangentVarying;

    #[inline]
    fn vertex(&self, triangle: &Triangle, index: usize) -> (Vec4, Self::Varying) {
        let vertex = triangle[index];
        let clip = self.transform * Vec4::from(vertex.position);
        let varying = TangentVarying {
            uv: vertex.uv,
            normal: self.mit * vertex.normal,
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
        let uvs = varyings.map(|v| v.uv);
        let uv = interpolate(&uvs, barycentric);
        let normal = interpolate(&varyings.map(|v| v.normal), barycentric).normalize();

        // Without a usable UV frame the interpolated normal is all we have.
        let normal = match tangent_frame(varyings.map(|v| v.position), uvs, normal) {
            Some(tbn) => tbn
                .transform_direction(self.normal_map.sample_normal(uv))
                .normalize(),
            None => normal,
        };

        let intensity = normal.dot(self.light);
        Some(colors::modulate(self.diffuse.sample(uv), intensity))
    }
}
