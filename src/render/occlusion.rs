//! Ambient occlusion.
//!
//! Two independent techniques:
//!
//! - **Hemisphere baking** ([`bake_occlusion_map`]) renders the model from
//!   many random directions in the upper hemisphere and counts, per texel,
//!   how often the surface was visible. The result is a greyscale texture
//!   in the model's UV space.
//! - **Horizon occlusion** ([`horizon_occlusion`]) works in screen space on a
//!   finished depth buffer: for every pixel it marches a few rays and
//!   measures how high the surrounding depth rises above it.

use std::f32::consts::{FRAC_PI_2, PI};

use log::debug;
use rand::Rng;

use super::framebuffer::{ColorBuffer, DepthBuffer};
use super::rasterizer::render;
use super::shader::{DepthShader, OcclusionShader};
use crate::colors;
use crate::error::{RenderError, Result};
use crate::math::mat4::Mat4;
use crate::math::vec2::Vec2;
use crate::math::vec3::Vec3;
use crate::model::Model;
use crate::texture::Texture;

/// Rays cast per pixel by [`horizon_occlusion`].
pub const HORIZON_RAYS: u32 = 8;

/// Longest march along one horizon ray, in pixels.
pub const HORIZON_MAX_STEPS: u32 = 1000;

/// Scale from depth units to pixel units when measuring elevation.
pub const HORIZON_DEPTH_SCALE: f32 = 225.0;

/// Uniformly distributed point on the unit sphere.
pub fn random_on_unit_sphere<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let u: f32 = rng.gen();
    let v: f32 = rng.gen();
    let theta = 2.0 * PI * u;
    let phi = (2.0 * v - 1.0).acos();
    Vec3::new(phi.sin() * theta.cos(), phi.sin() * theta.sin(), phi.cos())
}

/// A random up vector with every component uniform in `[0, 1)`.
pub fn random_up<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    Vec3::new(rng.gen(), rng.gen(), rng.gen())
}

/// Running per-texel mean of binary visibility masks.
#[derive(Clone, Debug)]
pub struct OcclusionAccumulator {
    width: u32,
    height: u32,
    passes: u32,
    mean: Vec<f32>,
}

impl OcclusionAccumulator {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            passes: 0,
            mean: vec![0.0; (width * height) as usize],
        }
    }

    pub fn passes(&self) -> u32 {
        self.passes
    }

    /// Fold one pass into the mean: `(previous * (n - 1) + current) / n`.
    /// The red channel of each texel is the sample value.
    pub fn accumulate(&mut self, mask: &Texture) -> Result<()> {
        if mask.width() != self.width || mask.height() != self.height {
            return Err(RenderError::DimensionMismatch {
                width: self.width,
                height: self.height,
                actual_width: mask.width(),
                actual_height: mask.height(),
            });
        }

        self.passes += 1;
        let n = self.passes as f32;
        for (mean, &texel) in self.mean.iter_mut().zip(mask.texels()) {
            let current = colors::red(texel) as f32;
            *mean = (*mean * (n - 1.0) + current) / n;
        }
        Ok(())
    }

    /// The mean rounded to the nearest grey level.
    pub fn to_texture(&self) -> Result<Texture> {
        let data = self
            .mean
            .iter()
            .map(|&m| colors::gray(m.round().clamp(0.0, 255.0) as u8))
            .collect();
        Texture::new(self.width, self.height, data)
    }
}

/// Bake a `width` x `height` occlusion map over `passes` random directions.
///
/// Each pass places the eye on a random point of the upper unit hemisphere
/// looking at the origin, renders depth through `viewport` (no perspective),
/// then re-renders with [`OcclusionShader`] to mark the texels whose surface
/// was the visible one.
pub fn bake_occlusion_map<R: Rng + ?Sized>(
    model: &Model,
    viewport: Mat4,
    width: u32,
    height: u32,
    passes: u32,
    rng: &mut R,
) -> Result<Texture> {
    let mut accumulator = OcclusionAccumulator::new(width, height);
    let mut mask = Texture::filled(width, height, colors::BLACK)?;
    let mut visible = DepthBuffer::new(width, height);
    let mut depth = DepthBuffer::new(width, height);

    for pass in 1..=passes {
        let mut eye = random_on_unit_sphere(rng);
        eye.y = eye.y.abs();
        let up = random_up(rng);
        let transform = viewport * Mat4::look_at(eye, Vec3::ZERO, up);

        visible.clear();
        depth.clear();
        mask.fill(colors::BLACK);

        render(model, &mut DepthShader::new(transform), None, &mut visible)?;
        render(
            model,
            &mut OcclusionShader::new(transform, &visible, &mut mask),
            None,
            &mut depth,
        )?;
        accumulator.accumulate(&mask)?;

        if pass % 100 == 0 {
            debug!("occlusion bake: pass {}/{}", pass, passes);
        }
    }

    accumulator.to_texture()
}

/// Steepest elevation angle seen from `origin` along `direction`.
///
/// Marches one pixel at a time until the ray leaves the buffer. Samples
/// closer than one pixel are skipped; the result is never negative.
pub fn max_elevation_angle(depth: &DepthBuffer, origin: Vec2, direction: Vec2) -> f32 {
    let width = depth.width() as f32;
    let height = depth.height() as f32;
    let Some(base) = depth.get(origin.x as i64, origin.y as i64) else {
        return 0.0;
    };

    let mut max_angle = 0.0_f32;
    for t in 0..HORIZON_MAX_STEPS {
        let current = origin + direction * t as f32;
        if current.x >= width || current.y >= height || current.x < 0.0 || current.y < 0.0 {
            break;
        }

        let distance = (origin - current).length();
        if distance < 1.0 {
            continue;
        }

        let Some(sample) = depth.get(current.x as i64, current.y as i64) else {
            break;
        };
        let elevation = (sample - base) * HORIZON_DEPTH_SCALE;
        max_angle = max_angle.max((elevation / distance).atan());
    }
    max_angle
}

/// Screen-space horizon occlusion of a rendered depth buffer.
///
/// Pixels without depth stay black. Every other pixel gets
/// `255 * mean(1 - max_elevation / (pi / 2))` over [`HORIZON_RAYS`] evenly
/// spaced directions, so unobstructed pixels are white.
pub fn horizon_occlusion(depth: &DepthBuffer) -> ColorBuffer {
    let mut image = ColorBuffer::new(depth.width(), depth.height());
    let directions: Vec<Vec2> = (0..HORIZON_RAYS)
        .map(|i| {
            let angle = i as f32 * 2.0 * PI / HORIZON_RAYS as f32;
            Vec2::new(angle.cos(), angle.sin())
        })
        .collect();

    for x in 0..depth.width() {
        for y in 0..depth.height() {
            if depth.at(x, y) <= 0.0 {
                continue;
            }
            let origin = Vec2::new(x as f32, y as f32);
            let total: f32 = directions
                .iter()
                .map(|&direction| 1.0 - max_elevation_angle(depth, origin, direction) / FRAC_PI_2)
                .sum();
            let visibility = total / HORIZON_RAYS as f32;
            image.set(x, y, colors::gray((visibility * 255.0) as u8));
        }
    }

    debug!("horizon occlusion over {}x{}", depth.width(), depth.height());
    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{gray, BLACK, WHITE};
    use crate::model::{Triangle, Vertex};
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn filled_depth(width: u32, height: u32, value: f32) -> DepthBuffer {
        let mut depth = DepthBuffer::new(width, height);
        for x in 0..width {
            for y in 0..height {
                depth.set(x, y, value);
            }
        }
        depth
    }

    #[test]
    fn sphere_samples_are_unit_length() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            assert_relative_eq!(random_on_unit_sphere(&mut rng).magnitude(), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn up_components_are_in_unit_interval() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let up = random_up(&mut rng);
            for c in [up.x, up.y, up.z] {
                assert!((0.0..1.0).contains(&c));
            }
        }
    }

    #[test]
    fn accumulator_reports_mean_of_masks() {
        let masks = [
            [WHITE, BLACK, WHITE],
            [BLACK, BLACK, WHITE],
            [WHITE, BLACK, WHITE],
        ];
        let mut accumulator = OcclusionAccumulator::new(3, 1);
        for mask in masks {
            accumulator.accumulate(&Texture::new(3, 1, mask.to_vec()).unwrap()).unwrap();
        }

        assert_eq!(accumulator.passes(), 3);
        let result = accumulator.to_texture().unwrap();
        assert_eq!(result.texels(), &[gray(170), BLACK, WHITE]);
    }

    #[test]
    fn accumulator_rejects_wrong_size() {
        let mut accumulator = OcclusionAccumulator::new(2, 2);
        let mask = Texture::filled(3, 1, WHITE).unwrap();
        assert!(accumulator.accumulate(&mask).is_err());
        assert_eq!(accumulator.passes(), 0);
    }

    #[test]
    fn flat_plane_is_fully_lit() {
        let depth = filled_depth(24, 16, 0.5);
        let image = horizon_occlusion(&depth);
        assert!(image.pixels().iter().all(|&p| p == WHITE));
    }

    #[test]
    fn empty_pixels_stay_black() {
        let image = horizon_occlusion(&DepthBuffer::new(4, 4));
        assert!(image.pixels().iter().all(|&p| p == BLACK));
    }

    #[test]
    fn pit_is_darker_than_plateau() {
        let mut depth = filled_depth(21, 21, 0.8);
        depth.set(10, 10, 0.7);
        let image = horizon_occlusion(&depth);

        let pit = colors::red(image.get(10, 10).unwrap());
        assert!(pit < 128, "pit = {pit}");
        // The plateau never looks up at anything.
        assert_eq!(image.get(0, 0), Some(WHITE));
    }

    #[test]
    fn elevation_ignores_origin_sample() {
        let mut depth = filled_depth(8, 1, 0.1);
        depth.set(0, 0, 0.0);
        let angle = max_elevation_angle(&depth, Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0));
        assert!(angle > 0.0);
        // Lower surroundings never produce a negative angle.
        let flat = max_elevation_angle(&depth, Vec2::new(3.0, 0.0), Vec2::new(1.0, 0.0));
        assert_eq!(flat, 0.0);
    }

    fn facing_quad() -> Model {
        // A plane facing +y, mapped to the full UV square.
        let v = |x: f32, z: f32| {
            Vertex::new(
                Vec3::new(x * 0.8, 0.0, z * 0.8),
                Vec2::new((x + 1.0) / 2.0, (z + 1.0) / 2.0),
                Vec3::UP,
            )
        };
        Model::new(
            "plane",
            vec![
                Triangle::new(v(-1.0, -1.0), v(1.0, -1.0), v(1.0, 1.0)),
                Triangle::new(v(-1.0, -1.0), v(1.0, 1.0), v(-1.0, 1.0)),
            ],
        )
        .unwrap()
    }

    #[test]
    fn baking_is_deterministic_for_a_seed() {
        let model = facing_quad();
        let viewport = Mat4::viewport(4.0, 4.0, 24.0, 24.0);
        let bake = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            bake_occlusion_map(&model, viewport, 32, 32, 8, &mut rng).unwrap()
        };
        assert_eq!(bake(3), bake(3));
    }

    #[test]
    fn plane_seen_from_above_is_marked() {
        let model = facing_quad();
        let viewport = Mat4::viewport(4.0, 4.0, 24.0, 24.0);
        let mut rng = StdRng::seed_from_u64(11);
        let map = bake_occlusion_map(&model, viewport, 32, 32, 20, &mut rng).unwrap();

        assert!(map.texels().iter().any(|&t| colors::red(t) > 0));
        assert!(map.texels().iter().all(|&t| t == gray(colors::red(t))));
    }

    #[test]
    fn zero_passes_yield_black_map() {
        let mut rng = StdRng::seed_from_u64(0);
        let map = bake_occlusion_map(&facing_quad(), Mat4::identity(), 4, 4, 0, &mut rng).unwrap();
        assert!(map.texels().iter().all(|&t| t == BLACK));
    }
}
