//! Two-pass shadow mapping.
//!
//! 1. Render depth from the light's point of view (viewport × look-at from
//!    the light direction, no perspective) into a shadow map.
//! 2. Render the camera view with [`ShadowShader`], which maps each fragment
//!    back to object space and into the shadow map to decide whether the
//!    light reaches it.

use log::debug;

use super::framebuffer::{ColorBuffer, DepthBuffer};
use super::rasterizer::render;
use super::shader::{normal_matrix, DepthShader, PhongMaps, PhongMaterial, ShadowShader};
use crate::error::{RenderError, Result};
use crate::math::mat4::Mat4;
use crate::math::vec3::Vec3;
use crate::model::Model;

/// Matrices and light parameters of one shadowed render.
#[derive(Clone, Debug)]
pub struct ShadowPipeline {
    pub viewport: Mat4,
    pub projection: Mat4,
    pub model_view: Mat4,
    /// Look-at from the light position toward the scene.
    pub light_view: Mat4,
    /// Light direction in the space of `projection * model_view`.
    pub light: Vec3,
    pub material: PhongMaterial,
}

impl ShadowPipeline {
    /// Object space to shadow map screen space.
    pub fn light_transform(&self) -> Mat4 {
        self.viewport * self.light_view
    }

    /// Object space to camera screen space.
    pub fn camera_transform(&self) -> Mat4 {
        self.viewport * self.projection * self.model_view
    }

    /// Camera screen space to shadow map screen space.
    ///
    /// # Errors
    /// [`RenderError::SingularMatrix`] when the camera transform cannot be
    /// inverted.
    pub fn shadow_transform(&self) -> Result<Mat4> {
        let inverse = self
            .camera_transform()
            .inverse()
            .ok_or(RenderError::SingularMatrix("camera transform"))?;
        Ok(self.light_transform() * inverse)
    }

    /// Depth of `model` as seen from the light.
    pub fn render_shadow_map(&self, model: &Model, width: u32, height: u32) -> Result<DepthBuffer> {
        debug!("shadow map pass {}x{}", width, height);
        let mut shadow_map = DepthBuffer::new(width, height);
        render(model, &mut DepthShader::new(self.light_transform()), None, &mut shadow_map)?;
        Ok(shadow_map)
    }

    /// Run both passes into `color` and `depth`. Returns the shadow map.
    ///
    /// The shadow map has the size of `depth`. Every matrix is checked before
    /// the first pass, so a singular transform leaves the buffers untouched.
    pub fn render(
        &self,
        model: &Model,
        maps: PhongMaps<'_>,
        color: &mut ColorBuffer,
        depth: &mut DepthBuffer,
    ) -> Result<DepthBuffer> {
        color.ensure_matches(depth)?;
        let shadow_transform = self.shadow_transform()?;
        let mit = normal_matrix(&(self.projection * self.model_view))
            .ok_or(RenderError::SingularMatrix("projection * model-view"))?;

        let shadow_map = self.render_shadow_map(model, depth.width(), depth.height())?;

        debug!("shadowed camera pass");
        let mut shader = ShadowShader::new(
            self.camera_transform(),
            mit,
            shadow_transform,
            self.light,
            maps,
            &shadow_map,
        )
        .with_material(self.material);
        render(model, &mut shader, Some(color), depth)?;

        Ok(shadow_map)
    }
}
