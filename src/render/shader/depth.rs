use super::{Fragment, Shader};
use crate::colors;
use crate::math::mat4::Mat4;
use crate::math::vec3::Vec3;
use crate::math::vec4::Vec4;
use crate::model::Triangle;

/// Depth visualization: white scaled by the raw depth, no lighting.
///
/// Also the depth-only pass of the shadow and occlusion pipelines, where it
/// runs without a color buffer.
#[derive(Clone, Debug)]
pub struct DepthShader {
    transform: Mat4,
}

impl DepthShader {
    pub fn new(transform: Mat4) -> Self {
        Self { transform }
    }
}

impl Shader for DepthShader {
    type Varying = ();

    #[inline]
    fn vertex(&self, triangle: &Triangle, index: usize) -> (Vec4, ()) {
        (self.transform * Vec4::from(triangle[index].position), ())
    }

    #[inline]
    fn fragment(&mut self, fragment: Fragment, _: Vec3, _: &[(); 3]) -> Option<u32> {
        Some(colors::modulate(colors::WHITE, fragment.depth))
    }
}
