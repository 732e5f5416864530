//! A CPU-only software rasterizer.
//!
//! Triangle meshes are drawn through a programmable vertex/fragment
//! [`Shader`](render::Shader) into color and depth buffers, with
//! perspective-correct interpolation, a z-buffer, shadow mapping and two
//! ambient occlusion techniques. No GPU API is involved.
//!
//! # Quick Start
//!
//! ```ignore
//! use tinyraster::prelude::*;
//!
//! let model = Model::from_obj("head.obj")?;
//! let engine = Engine::new(EngineConfig::default());
//! let image = engine.render(ShadingMode::Gouraud, &model, &Materials::default())?;
//! image.save("render.png")?;
//! ```

// Public API - exposed to library consumers
pub mod camera;
pub mod colors;
pub mod engine;
pub mod error;
pub mod light;
pub mod math;
pub mod model;
pub mod projection;
pub mod render;
pub mod texture;

// Re-export commonly needed types at crate root for convenience
pub use engine::{Engine, EngineConfig, Materials, ShadingMode, TextureSlot};
pub use error::{RenderError, Result};
pub use model::Model;
pub use projection::{Projection, Viewport};
pub use texture::Texture;

/// Prelude module for convenient imports.
///
/// # Example
/// ```ignore
/// use tinyraster::prelude::*;
/// ```
pub mod prelude {
    // Camera & lighting
    pub use crate::camera::Camera;
    pub use crate::light::DirectionalLight;

    // Engine
    pub use crate::engine::{Engine, EngineConfig, Materials, ShadingMode};
    pub use crate::error::{RenderError, Result};

    // Model & textures
    pub use crate::model::{Model, Triangle, Vertex};
    pub use crate::texture::Texture;

    // Projection
    pub use crate::projection::{Projection, Viewport};

    // Math
    pub use crate::math::mat4::Mat4;
    pub use crate::math::vec2::Vec2;
    pub use crate::math::vec3::Vec3;
    pub use crate::math::vec4::Vec4;

    // Rendering
    pub use crate::render::{render, ColorBuffer, DepthBuffer, Fragment, Shader};
}

/// Module exposing internals for benchmarking. Not part of the stable API.
pub mod bench {
    pub use crate::render::rasterizer::rasterize_triangle;
    pub use crate::render::shader::{DepthShader, FlatShader, GouraudShader};
}
