//! Core rendering engine.
//!
//! The [`Engine`] wires one [`EngineConfig`] (image size, viewport, camera,
//! light) into every shading mode the crate offers. Each call to
//! [`Engine::render`] builds the matrices for the chosen [`ShadingMode`],
//! runs the passes it needs into fresh buffers and returns the color image.

use log::{debug, info, warn};
use rand::Rng;

use crate::camera::Camera;
use crate::colors;
use crate::error::{RenderError, Result};
use crate::light::DirectionalLight;
use crate::math::mat4::Mat4;
use crate::math::vec3::Vec3;
use crate::model::Model;
use crate::projection::Viewport;
use crate::render::occlusion::{bake_occlusion_map, horizon_occlusion};
use crate::render::shader::{
    normal_matrix, DepthShader, FlatShader, FlatTexturedShader, GouraudShader,
    GouraudTexturedShader, NormalMapShader, PhongMaps, PhongMaterial, Shader,
    SpecularMapShader, TangentNormalMapShader, ToonShader,
};
use crate::render::{render, ColorBuffer, DepthBuffer, ShadowPipeline};
use crate::texture::Texture;

/// Light used by the flat modes: head-on, toward the viewer at -z.
const FLAT_LIGHT: Vec3 = Vec3::new(0.0, 0.0, -1.0);

/// Shading mode presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ShadingMode {
    /// Per-face lighting, viewport only
    Flat,
    /// Per-face lighting over the diffuse texture, viewport only
    FlatTextured,
    /// Per-face lighting with perspective, no camera rotation
    FlatPerspective,
    /// Per-vertex lighting, interpolated
    #[default]
    Gouraud,
    /// Per-vertex lighting quantized into bands
    Toon,
    /// Per-vertex lighting over the diffuse texture
    GouraudTextured,
    /// Object-space normal map
    NormalMap,
    /// Tangent-space normal map
    TangentNormalMap,
    /// Normal map plus specular highlights
    SpecularMap,
    /// Specular map lighting with shadow mapping
    Shadow,
    /// Z-buffer visualization through the depth shader
    Depth,
    /// Depth-only pass, then the z-buffer rendered as grey levels
    DepthDump,
    /// Screen-space horizon occlusion of the depth buffer
    HorizonOcclusion,
}

impl ShadingMode {
    pub const ALL: [ShadingMode; 13] = [
        ShadingMode::Flat,
        ShadingMode::FlatTextured,
        ShadingMode::FlatPerspective,
        ShadingMode::Gouraud,
        ShadingMode::Toon,
        ShadingMode::GouraudTextured,
        ShadingMode::NormalMap,
        ShadingMode::TangentNormalMap,
        ShadingMode::SpecularMap,
        ShadingMode::Shadow,
        ShadingMode::Depth,
        ShadingMode::DepthDump,
        ShadingMode::HorizonOcclusion,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ShadingMode::Flat => "flat",
            ShadingMode::FlatTextured => "flat-textured",
            ShadingMode::FlatPerspective => "flat-perspective",
            ShadingMode::Gouraud => "gouraud",
            ShadingMode::Toon => "toon",
            ShadingMode::GouraudTextured => "gouraud-textured",
            ShadingMode::NormalMap => "normal-map",
            ShadingMode::TangentNormalMap => "tangent-normal-map",
            ShadingMode::SpecularMap => "specular-map",
            ShadingMode::Shadow => "shadow",
            ShadingMode::Depth => "depth",
            ShadingMode::DepthDump => "depth-dump",
            ShadingMode::HorizonOcclusion => "horizon-occlusion",
        }
    }

    /// Which of the [`Materials`] slots this mode reads.
    pub fn textures(&self) -> &'static [TextureSlot] {
        use TextureSlot::*;
        match self {
            ShadingMode::FlatTextured | ShadingMode::GouraudTextured => &[Diffuse],
            ShadingMode::NormalMap => &[Diffuse, Normal],
            ShadingMode::TangentNormalMap => &[Diffuse, TangentNormal],
            ShadingMode::SpecularMap | ShadingMode::Shadow => &[Diffuse, Normal, Specular],
            _ => &[],
        }
    }
}

/// One of the texture inputs in [`Materials`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureSlot {
    Diffuse,
    Normal,
    TangentNormal,
    Specular,
}

impl TextureSlot {
    pub const ALL: [TextureSlot; 4] = [
        TextureSlot::Diffuse,
        TextureSlot::Normal,
        TextureSlot::TangentNormal,
        TextureSlot::Specular,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TextureSlot::Diffuse => "diffuse",
            TextureSlot::Normal => "normal",
            TextureSlot::TangentNormal => "tangent-space normal",
            TextureSlot::Specular => "specular",
        }
    }
}

/// Optional texture inputs of a render.
#[derive(Debug, Clone, Default)]
pub struct Materials {
    pub diffuse: Option<Texture>,
    pub normal: Option<Texture>,
    pub tangent_normal: Option<Texture>,
    pub specular: Option<Texture>,
}

impl Materials {
    pub fn get(&self, slot: TextureSlot) -> Option<&Texture> {
        match slot {
            TextureSlot::Diffuse => self.diffuse.as_ref(),
            TextureSlot::Normal => self.normal.as_ref(),
            TextureSlot::TangentNormal => self.tangent_normal.as_ref(),
            TextureSlot::Specular => self.specular.as_ref(),
        }
    }

    /// The texture in `slot`, or [`RenderError::MissingTexture`].
    fn require(&self, mode: ShadingMode, slot: TextureSlot) -> Result<&Texture> {
        self.get(slot).ok_or(RenderError::MissingTexture {
            mode: mode.name(),
            texture: slot.name(),
        })
    }
}

/// Everything a render needs besides the model and its textures.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub width: u32,
    pub height: u32,
    pub viewport: Viewport,
    pub camera: Camera,
    pub light: DirectionalLight,
    pub background: u32,
    pub material: PhongMaterial,
    /// Random directions sampled by [`Engine::bake_occlusion`].
    pub occlusion_passes: u32,
    pub seed: u64,
}

impl EngineConfig {
    /// Defaults for a `width` x `height` image with the inset viewport.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            viewport: Viewport::inset(width, height),
            camera: Camera::default(),
            light: DirectionalLight::default(),
            background: colors::BACKGROUND,
            material: PhongMaterial::default(),
            occlusion_passes: 1000,
            seed: 0,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new(800, 800)
    }
}

pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Projection × model-view of the configured camera.
    fn projection_view(&self) -> Mat4 {
        let camera = &self.config.camera;
        camera.projection().matrix() * camera.view()
    }

    /// Object space to screen space through the configured camera.
    pub fn camera_transform(&self) -> Mat4 {
        self.config.viewport.matrix() * self.projection_view()
    }

    fn normal_matrix(&self) -> Result<Mat4> {
        normal_matrix(&self.projection_view())
            .ok_or(RenderError::SingularMatrix("projection * model-view"))
    }

    fn eye_light(&self) -> Vec3 {
        self.config.light.transformed(&self.projection_view())
    }

    fn buffers(&self) -> (ColorBuffer, DepthBuffer) {
        let mut color = ColorBuffer::new(self.config.width, self.config.height);
        color.clear(self.config.background);
        (color, DepthBuffer::new(self.config.width, self.config.height))
    }

    fn draw<S: Shader>(&self, model: &Model, shader: &mut S) -> Result<ColorBuffer> {
        let (mut color, mut depth) = self.buffers();
        render(model, shader, Some(&mut color), &mut depth)?;
        Ok(color)
    }

    fn depth_pass(&self, model: &Model) -> Result<DepthBuffer> {
        let (_, mut depth) = self.buffers();
        render(model, &mut DepthShader::new(self.camera_transform()), None, &mut depth)?;
        Ok(depth)
    }

    /// Render `model` with `mode` into a new color buffer.
    ///
    /// # Errors
    /// [`RenderError::MissingTexture`] when `materials` lacks a texture the
    /// mode reads, [`RenderError::SingularMatrix`] when the camera cannot be
    /// inverted for the modes that need it.
    pub fn render(
        &self,
        mode: ShadingMode,
        model: &Model,
        materials: &Materials,
    ) -> Result<ColorBuffer> {
        let needed = mode.textures();
        for slot in TextureSlot::ALL {
            if !needed.contains(&slot) && materials.get(slot).is_some() {
                warn!("{} texture is ignored by {} shading", slot.name(), mode.name());
            }
        }
        info!(
            "rendering `{}` with {} shading at {}x{}",
            model.name(),
            mode.name(),
            self.config.width,
            self.config.height
        );

        let full = Viewport::full(self.config.width, self.config.height).matrix();
        let world_light = self.config.light.direction();

        match mode {
            ShadingMode::Flat => self.draw(model, &mut FlatShader::new(full, FLAT_LIGHT)),
            ShadingMode::FlatTextured => {
                let diffuse = materials.require(mode, TextureSlot::Diffuse)?;
                self.draw(model, &mut FlatTexturedShader::new(full, FLAT_LIGHT, diffuse))
            }
            ShadingMode::FlatPerspective => {
                let transform = full * self.config.camera.projection().matrix();
                self.draw(model, &mut FlatShader::new(transform, FLAT_LIGHT))
            }
            ShadingMode::Gouraud => {
                let mut shader = GouraudShader::new(self.camera_transform(), world_light);
                self.draw(model, &mut shader)
            }
            ShadingMode::Toon => {
                let mut shader = ToonShader::new(self.camera_transform(), world_light);
                self.draw(model, &mut shader)
            }
            ShadingMode::GouraudTextured => {
                let diffuse = materials.require(mode, TextureSlot::Diffuse)?;
                let mut shader =
                    GouraudTexturedShader::new(self.camera_transform(), world_light, diffuse);
                self.draw(model, &mut shader)
            }
            ShadingMode::NormalMap => {
                let diffuse = materials.require(mode, TextureSlot::Diffuse)?;
                let normal = materials.require(mode, TextureSlot::Normal)?;
                let mut shader = NormalMapShader::new(
                    self.camera_transform(),
                    self.normal_matrix()?,
                    self.eye_light(),
                    diffuse,
                    normal,
                );
                self.draw(model, &mut shader)
            }
            ShadingMode::TangentNormalMap => {
                let diffuse = materials.require(mode, TextureSlot::Diffuse)?;
                let normal = materials.require(mode, TextureSlot::TangentNormal)?;
                let mut shader = TangentNormalMapShader::new(
                    self.camera_transform(),
                    self.normal_matrix()?,
                    self.eye_light(),
                    diffuse,
                    normal,
                );
                self.draw(model, &mut shader)
            }
            ShadingMode::SpecularMap => {
                let maps = phong_maps(mode, materials)?;
                let mut shader = SpecularMapShader::new(
                    self.camera_transform(),
                    self.normal_matrix()?,
                    self.eye_light(),
                    maps,
                )
                .with_material(self.config.material);
                self.draw(model, &mut shader)
            }
            ShadingMode::Shadow => {
                let maps = phong_maps(mode, materials)?;
                let camera = &self.config.camera;
                let pipeline = ShadowPipeline {
                    viewport: self.config.viewport.matrix(),
                    projection: camera.projection().matrix(),
                    model_view: camera.view(),
                    light_view: Mat4::look_at(world_light, camera.target, camera.up),
                    light: self.eye_light(),
                    material: self.config.material,
                };
                let (mut color, mut depth) = self.buffers();
                pipeline.render(model, maps, &mut color, &mut depth)?;
                Ok(color)
            }
            ShadingMode::Depth => {
                self.draw(model, &mut DepthShader::new(self.camera_transform()))
            }
            ShadingMode::DepthDump => Ok(ColorBuffer::from_depth(&self.depth_pass(model)?)),
            ShadingMode::HorizonOcclusion => Ok(horizon_occlusion(&self.depth_pass(model)?)),
        }
    }

    /// Bake an occlusion map of `model` in texture space, sized like the
    /// output image.
    pub fn bake_occlusion<R: Rng + ?Sized>(&self, model: &Model, rng: &mut R) -> Result<Texture> {
        debug!(
            "baking occlusion for `{}` over {} passes",
            model.name(),
            self.config.occlusion_passes
        );
        bake_occlusion_map(
            model,
            self.config.viewport.matrix(),
            self.config.width,
            self.config.height,
            self.config.occlusion_passes,
            rng,
        )
    }
}

fn phong_maps(mode: ShadingMode, materials: &Materials) -> Result<PhongMaps<'_>> {
    Ok(PhongMaps {
        diffuse: materials.require(mode, TextureSlot::Diffuse)?,
        normal: materials.require(mode, TextureSlot::Normal)?,
        specular: materials.require(mode, TextureSlot::Specular)?,
    })
}
