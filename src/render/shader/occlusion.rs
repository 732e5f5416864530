use super::{Fragment, Shader};
use crate::colors;
use crate::math::interpolate;
use crate::math::mat4::Mat4;
use crate::math::vec2::Vec2;
use crate::math::vec3::Vec3;
use crate::math::vec4::Vec4;
use crate::model::Triangle;
use crate::render::framebuffer::DepthBuffer;
use crate::texture::Texture;

/// Largest depth difference at which a fragment counts as the visible one.
pub const OCCLUSION_TOLERANCE: f32 = 0.01;

/// Marks the texels visible from one sample direction.
///
/// Runs after a depth-only pass from the same direction filled `visible`.
/// Every fragment whose depth matches that buffer paints its texel of `mask`
/// white. Nothing is ever written to a color buffer.
#[derive(Debug)]
pub struct OcclusionShader<'a> {
    transform: Mat4,
    visible: &'a DepthBuffer,
    mask: &'a mut Texture,
}

impl<'a> OcclusionShader<'a> {
    pub fn new(transform: Mat4, visible: &'a DepthBuffer, mask: &'a mut Texture) -> Self {
        Self {
            transform,
            visible,
            mask,
        }
    }
}

impl Shader for OcclusionShader<'_> {
    type Varying = Vec2;

    #[inline]
    fn vertex(&self, triangle: &Triangle, index: usize) -> (Vec4, Vec2) {
        let vertex = triangle[index];
        (self.transform * Vec4::from(vertex.position), vertex.uv)
    }

    #[inline]
    fn fragment(&mut self, fragment: Fragment, barycentric: Vec3, varyings: &[Vec2; 3]) -> Option<u32> {
        let visible = self
            .visible
            .get(fragment.x as i64, fragment.y as i64)
            .is_some_and(|depth| (depth - fragment.depth).abs() <= OCCLUSION_TOLERANCE);
        if visible {
            let uv = interpolate(varyings, barycentric);
            self.mask.set_uv(uv, colors::WHITE);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::BLACK;

    #[test]
    fn marks_visible_texels_and_discards() {
        let mut visible = DepthBuffer::new(2, 1);
        visible.set(0, 0, 0.5);
        visible.set(1, 0, 0.9);
        let mut mask = Texture::filled(2, 1, BLACK).unwrap();
        let varyings = [Vec2::ZERO, Vec2::new(1.0, 0.0), Vec2::ZERO];

        let mut shader = OcclusionShader::new(Mat4::identity(), &visible, &mut mask);
        let near = Fragment { x: 0, y: 0, depth: 0.505 };
        let hidden = Fragment { x: 1, y: 0, depth: 0.5 };
        assert_eq!(shader.fragment(near, Vec3::new(1.0, 0.0, 0.0), &varyings), None);
        assert_eq!(shader.fragment(hidden, Vec3::new(0.0, 1.0, 0.0), &varyings), None);

        assert_eq!(mask.texels(), &[colors::WHITE, BLACK]);
    }

    #[test]
    fn out_of_range_fragment_is_ignored() {
        let visible = DepthBuffer::new(1, 1);
        let mut mask = Texture::filled(1, 1, BLACK).unwrap();
        let mut shader = OcclusionShader::new(Mat4::identity(), &visible, &mut mask);
        let fragment = Fragment { x: 4, y: 4, depth: 0.0 };
        assert_eq!(shader.fragment(fragment, Vec3::ONE / 3.0, &[Vec2::ZERO; 3]), None);
        assert_eq!(mask.texels(), &[BLACK]);
    }
}
