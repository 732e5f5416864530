//! The rendering core: buffers, the rasterizer loop, shaders and the
//! multi-pass pipelines built on top of them.

pub mod framebuffer;
pub mod occlusion;
pub mod rasterizer;
pub mod shader;
pub mod shadow;

pub use framebuffer::{ColorBuffer, DepthBuffer, DEPTH_CLEAR};
pub use occlusion::{bake_occlusion_map, horizon_occlusion, OcclusionAccumulator};
pub use rasterizer::{rasterize_triangle, render};
pub use shader::{Fragment, Shader};
pub use shadow::ShadowPipeline;
