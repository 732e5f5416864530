//! The rasterizer core loop.
//!
//! [`render`] drives a [`Shader`] over every triangle of a [`Model`]:
//!
//! 1. Run the vertex stage for corners 0, 1, 2 to get clip-space positions.
//! 2. Perspective-divide x and y (z and w are kept for later).
//! 3. Visit every pixel of the clamped bounding box and compute barycentric
//!    coordinates; skip pixels with a negative weight.
//! 4. Turn screen-space weights into perspective-correct weights.
//! 5. Interpolate clip-space z and run the depth test (larger wins).
//! 6. Store the new depth, then run the fragment stage and write its color.
//!
//! The depth write in step 6 happens before the fragment stage runs, so a
//! fragment that discards still occludes later fragments at the same depth.
//! Shadow and occlusion passes rely on this to fill depth-only buffers.

mod barycentric;

pub use barycentric::{
    barycentric, is_inside, perspective_correct, BoundingBox, DEGENERATE, DEGENERATE_AREA,
};

use log::debug;

use super::framebuffer::{ColorBuffer, DepthBuffer};
use super::shader::{Fragment, Shader};
use crate::error::Result;
use crate::math::vec2::Vec2;
use crate::math::vec4::Vec4;
use crate::model::Model;

/// Render `model` with `shader` into the given buffers.
///
/// `color` is optional: depth-only passes (shadow maps, occlusion baking)
/// pass `None`. The depth buffer must already hold the "no surface" value
/// wherever nothing has been drawn yet.
///
/// # Errors
/// [`crate::RenderError::DimensionMismatch`] when the color buffer and the
/// depth buffer differ in size. Nothing is drawn in that case.
pub fn render<S: Shader>(
    model: &Model,
    shader: &mut S,
    mut color: Option<&mut ColorBuffer>,
    depth: &mut DepthBuffer,
) -> Result<()> {
    if let Some(color) = color.as_deref() {
        color.ensure_matches(depth)?;
    }

    debug!(
        "rasterizing {} triangles of `{}` into {}x{}",
        model.len(),
        model.name(),
        depth.width(),
        depth.height()
    );

    for triangle in model.triangles() {
        let (a, va) = shader.vertex(triangle, 0);
        let (b, vb) = shader.vertex(triangle, 1);
        let (c, vc) = shader.vertex(triangle, 2);

        rasterize_triangle(
            [a, b, c],
            &[va, vb, vc],
            shader,
            color.as_deref_mut(),
            depth,
        );
    }

    Ok(())
}

/// Fill one triangle given its clip-space corners and varyings.
pub fn rasterize_triangle<S: Shader>(
    clip: [Vec4; 3],
    varyings: &[S::Varying; 3],
    shader: &mut S,
    mut color: Option<&mut ColorBuffer>,
    depth: &mut DepthBuffer,
) {
    let screen = clip.map(|v| Vec2::new(v.x / v.w, v.y / v.w));
    let w = clip.map(|v| v.w);

    let Some(bbox) = BoundingBox::new(&screen, depth.width(), depth.height()) else {
        return;
    };

    for x in bbox.min_x..=bbox.max_x {
        for y in bbox.min_y..=bbox.max_y {
            let weights = barycentric(
                Vec2::new(x as f32, y as f32),
                screen[0],
                screen[1],
                screen[2],
            );
            if !is_inside(weights) {
                continue;
            }

            let weights = perspective_correct(weights, w);
            let z = clip[0].z * weights.x + clip[1].z * weights.y + clip[2].z * weights.z;

            // Same as `stored >= z`, but also rejects a NaN depth.
            if !(z > depth.at(x, y)) {
                continue;
            }
            depth.set(x, y, z);

            let fragment = Fragment { x, y, depth: z };
            if let Some(pixel) = shader.fragment(fragment, weights, varyings) {
                if let Some(color) = color.as_deref_mut() {
                    color.set(x, y, pixel);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{self, WHITE};
    use crate::math::mat4::Mat4;
    use crate::math::vec3::Vec3;
    use crate::model::{Triangle, Vertex};
    use crate::render::shader::DepthShader;
    use approx::assert_relative_eq;

    /// Emits pre-transformed positions and a fixed color, recording fragments.
    struct ScreenShader {
        color: Option<u32>,
        fragments: Vec<(Fragment, Vec3)>,
    }

    impl ScreenShader {
        fn new(color: Option<u32>) -> Self {
            Self {
                color,
                fragments: Vec::new(),
            }
        }
    }

    impl Shader for ScreenShader {
        type Varying = f32;

        fn vertex(&self, triangle: &Triangle, index: usize) -> (Vec4, f32) {
            let v = triangle[index];
            (Vec4::from(v.position), v.uv.x)
        }

        fn fragment(&mut self, fragment: Fragment, bc: Vec3, _: &[f32; 3]) -> Option<u32> {
            self.fragments.push((fragment, bc));
            self.color
        }
    }

    fn vertex(x: f32, y: f32, z: f32) -> Vertex {
        Vertex::new(Vec3::new(x, y, z), Default::default(), Vec3::FORWARD)
    }

    fn flat_triangle(z: f32) -> Triangle {
        Triangle::new(vertex(1.0, 1.0, z), vertex(14.0, 1.0, z), vertex(1.0, 14.0, z))
    }

    fn model(triangles: Vec<Triangle>) -> Model {
        Model::new("test", triangles).unwrap()
    }

    #[test]
    fn covers_pixels_inside_triangle_only() {
        let mut color = ColorBuffer::new(16, 16);
        let mut depth = DepthBuffer::new(16, 16);
        let mut shader = ScreenShader::new(Some(WHITE));
        render(&model(vec![flat_triangle(0.5)]), &mut shader, Some(&mut color), &mut depth)
            .unwrap();

        assert_eq!(color.get(2, 2), Some(WHITE));
        assert_eq!(color.get(13, 13), Some(colors::BACKGROUND));
        assert_eq!(color.get(0, 0), Some(colors::BACKGROUND));
        assert_relative_eq!(depth.at(2, 2), 0.5);
    }

    #[test]
    fn nearer_triangle_wins_regardless_of_order() {
        let red = colors::rgb(255, 0, 0);
        let blue = colors::rgb(0, 0, 255);

        let mut results = Vec::new();
        for order in [[0.2_f32, 0.8], [0.8, 0.2]] {
            let mut color = ColorBuffer::new(16, 16);
            let mut depth = DepthBuffer::new(16, 16);
            for z in order {
                let tint = if z > 0.5 { red } else { blue };
                let mut shader = ScreenShader::new(Some(tint));
                render(&model(vec![flat_triangle(z)]), &mut shader, Some(&mut color), &mut depth)
                    .unwrap();
            }
            results.push(color);
        }

        assert_eq!(results[0].get(3, 3), Some(red));
        assert_eq!(results[0], results[1]);
    }

    #[test]
    fn equal_depth_does_not_overwrite() {
        let mut color = ColorBuffer::new(16, 16);
        let mut depth = DepthBuffer::new(16, 16);
        let first = colors::rgb(1, 2, 3);
        render(
            &model(vec![flat_triangle(0.5)]),
            &mut ScreenShader::new(Some(first)),
            Some(&mut color),
            &mut depth,
        )
        .unwrap();

        for z in [0.5, 0.25] {
            let mut shader = ScreenShader::new(Some(WHITE));
            render(&model(vec![flat_triangle(z)]), &mut shader, Some(&mut color), &mut depth)
                .unwrap();
            assert!(shader.fragments.is_empty());
        }
        assert_eq!(color.get(3, 3), Some(first));
    }

    #[test]
    fn discarded_fragment_still_writes_depth() {
        let mut color = ColorBuffer::new(16, 16);
        let mut depth = DepthBuffer::new(16, 16);
        let mut shader = ScreenShader::new(None);
        render(&model(vec![flat_triangle(0.5)]), &mut shader, Some(&mut color), &mut depth)
            .unwrap();

        assert!(!shader.fragments.is_empty());
        assert_eq!(color.get(2, 2), Some(colors::BACKGROUND));
        assert_relative_eq!(depth.at(2, 2), 0.5);
    }

    #[test]
    fn degenerate_triangle_draws_nothing() {
        let mut depth = DepthBuffer::new(16, 16);
        let sliver = Triangle::new(vertex(1.0, 1.0, 0.5), vertex(8.0, 8.0, 0.5), vertex(15.0, 15.0, 0.5));
        let mut shader = ScreenShader::new(Some(WHITE));
        render(&model(vec![sliver]), &mut shader, None, &mut depth).unwrap();
        assert!(shader.fragments.is_empty());
    }

    #[test]
    fn weights_at_vertex_pixel_select_that_vertex() {
        let mut depth = DepthBuffer::new(16, 16);
        let mut shader = ScreenShader::new(None);
        render(&model(vec![flat_triangle(0.5)]), &mut shader, None, &mut depth).unwrap();

        let (_, bc) = shader
            .fragments
            .iter()
            .find(|(f, _)| f.x == 14 && f.y == 1)
            .copied()
            .unwrap();
        assert_relative_eq!(bc.y, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn perspective_correct_depth_interpolation() {
        // Corner 1 has w = 2, so its screen position is halved.
        let clip = [
            Vec4::new(0.0, 0.0, 0.2, 1.0),
            Vec4::new(20.0, 0.0, 0.6, 2.0),
            Vec4::new(0.0, 10.0, 0.2, 1.0),
        ];
        let mut depth = DepthBuffer::new(16, 16);
        let mut shader = ScreenShader::new(None);
        rasterize_triangle(clip, &[0.0; 3], &mut shader, None, &mut depth);

        // Screen point (5, 0) is the screen midpoint of corners 0 and 1; the
        // perspective-correct weight of corner 1 there is 1/3.
        let expected = 0.2 * (2.0 / 3.0) + 0.6 * (1.0 / 3.0);
        assert_relative_eq!(depth.at(5, 0), expected, epsilon = 1e-5);
    }

    #[test]
    fn rejects_mismatched_color_buffer() {
        let mut color = ColorBuffer::new(8, 8);
        let mut depth = DepthBuffer::new(16, 16);
        let mut shader = ScreenShader::new(Some(WHITE));
        assert!(render(&model(vec![flat_triangle(0.5)]), &mut shader, Some(&mut color), &mut depth)
            .is_err());
        assert!(shader.fragments.is_empty());
    }

    #[test]
    fn rendering_twice_is_identical() {
        let tri = Triangle::new(
            vertex(-0.5, -0.5, 0.2),
            vertex(0.6, -0.4, -0.3),
            vertex(0.0, 0.7, 0.4),
        );
        let model = model(vec![tri]);
        let transform = Mat4::viewport(0.0, 0.0, 32.0, 32.0) * Mat4::projection(-1.0 / 3.0);

        let run = || {
            let mut color = ColorBuffer::new(32, 32);
            let mut depth = DepthBuffer::new(32, 32);
            render(&model, &mut DepthShader::new(transform), Some(&mut color), &mut depth)
                .unwrap();
            (color, depth)
        };
        assert_eq!(run(), run());
    }
}
