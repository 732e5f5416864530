//! Vertex/fragment shaders driven by the rasterizer.
//!
//! This mirrors the programmable stages of a GPU pipeline:
//!
//! - The **vertex stage** runs once per triangle corner (indices 0, 1, 2 in
//!   that order) and returns the clip-space position together with that
//!   corner's *varying* value.
//! - The **fragment stage** runs for every covered pixel that passes the depth
//!   test and receives the three varyings of its triangle plus
//!   perspective-correct barycentric weights.
//!
//! Varyings are plain values handed from one stage to the next, so a shader
//! holds only per-pass uniforms. Two triangles can be shaded independently by
//! two clones of the same shader.
//!
//! # Barycentric Coordinates
//!
//! The `barycentric` parameter contains three weights [λ₀, λ₁, λ₂] that sum
//! to 1.0 and interpolate any per-vertex attribute:
//! `attr_at_pixel = λ₀*attr₀ + λ₁*attr₁ + λ₂*attr₂`
//! (see [`crate::math::interpolate`]).
//!
//! The variants form a closed set: every lighting model the engine offers
//! has one implementation here, selected through
//! [`crate::engine::ShadingMode`].

mod depth;
mod flat;
mod gouraud;
mod normal_map;
mod occlusion;
mod shadow;
mod specular;

pub use depth::DepthShader;
pub use flat::{FlatShader, FlatTexturedShader};
pub use gouraud::{toon_band, GouraudShader, GouraudTexturedShader, ToonShader};
pub use normal_map::{
    normal_matrix, tangent_frame, transform_normal, NormalMapShader, TangentNormalMapShader,
};
pub use occlusion::{OcclusionShader, OCCLUSION_TOLERANCE};
pub use shadow::{shadow_factor, ShadowShader, SHADOW_BIAS};
pub use specular::{PhongMaps, PhongMaterial, SpecularMapShader};

use crate::math::vec3::Vec3;
use crate::math::vec4::Vec4;
use crate::model::Triangle;

/// A pixel that survived coverage and depth testing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fragment {
    pub x: u32,
    pub y: u32,
    /// Perspective-correct interpolated depth, already stored in the
    /// z-buffer.
    pub depth: f32,
}

/// A shading program run by [`crate::render::render`].
pub trait Shader {
    /// Per-vertex data passed from the vertex stage to the fragment stage.
    type Varying: Copy;

    /// Transform vertex `index` of `triangle` into clip space.
    fn vertex(&self, triangle: &Triangle, index: usize) -> (Vec4, Self::Varying);

    /// Compute the color of one fragment, or `None` to discard it.
    ///
    /// A discarded fragment leaves the color buffer untouched, but its depth
    /// has already been written.
    fn fragment(
        &mut self,
        fragment: Fragment,
        barycentric: Vec3,
        varyings: &[Self::Varying; 3],
    ) -> Option<u32>;
}
