//! Error type shared by the whole crate.

use thiserror::Error;

/// Errors surfaced by model/texture construction and rendering passes.
///
/// Per-pixel conditions (degenerate triangles, shadow lookups that land
/// outside the shadow map) are coverage decisions, not errors, and never
/// show up here.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("model `{0}` contains no triangles")]
    EmptyModel(String),

    #[error("texture has no texels ({width}x{height})")]
    EmptyTexture { width: u32, height: u32 },

    #[error("texel count {len} doesn't match {width}x{height}")]
    TextureSize { width: u32, height: u32, len: usize },

    #[error("buffer is {actual_width}x{actual_height}, expected {width}x{height}")]
    DimensionMismatch {
        width: u32,
        height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    #[error("{0} matrix is singular and cannot be inverted")]
    SingularMatrix(&'static str),

    #[error("shading mode `{mode}` requires a {texture} texture")]
    MissingTexture {
        mode: &'static str,
        texture: &'static str,
    },

    #[error("failed to load OBJ model: {0}")]
    Obj(#[from] tobj::LoadError),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, RenderError>;
