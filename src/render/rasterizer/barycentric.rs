//! Coverage math for bounding-box rasterization.
//!
//! The rasterizer visits every pixel of the triangle's screen-space bounding
//! box and computes barycentric coordinates for it. A pixel is covered when
//! all three coordinates are non-negative.
//!
//! # Barycentric Coordinates
//!
//! For a point P and triangle ABC, with `AB = B - A`, `AC = C - A` and
//! `PA = A - P`, the weights (u, v) solving `P = A + u*AB + v*AC` come from
//! one 3D cross product:
//!
//! ```text
//! r = (AB.x, AC.x, PA.x) × (AB.y, AC.y, PA.y)
//! (1 - (r.x + r.y) / r.z,  r.x / r.z,  r.y / r.z)
//! ```
//!
//! `r.z` is twice the signed triangle area. Tiny areas are rejected with a
//! sentinel that always fails the coverage test, so degenerate triangles
//! simply produce no pixels. Both windings yield the same weights.

use crate::math::vec2::Vec2;
use crate::math::vec3::Vec3;

/// Twice-area threshold below which a triangle is treated as degenerate.
pub const DEGENERATE_AREA: f32 = 1e-2;

/// Returned for degenerate triangles; the negative weight fails coverage.
pub const DEGENERATE: Vec3 = Vec3::new(-1.0, 1.0, 1.0);

/// Barycentric coordinates of `p` with respect to triangle `abc`.
#[inline]
pub fn barycentric(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> Vec3 {
    let ab = b - a;
    let ac = c - a;
    let pa = a - p;

    let r = Vec3::new(ab.x, ac.x, pa.x).cross(Vec3::new(ab.y, ac.y, pa.y));
    if r.z.abs() < DEGENERATE_AREA {
        return DEGENERATE;
    }

    let r = r / r.z;
    Vec3::new(1.0 - r.x - r.y, r.x, r.y)
}

/// True when every weight is non-negative. NaN weights count as outside.
#[inline]
pub fn is_inside(weights: Vec3) -> bool {
    weights.x >= 0.0 && weights.y >= 0.0 && weights.z >= 0.0
}

/// Convert screen-space weights into perspective-correct ones.
///
/// Each weight is divided by its vertex's clip-space `w`, then the triple is
/// renormalized so it sums to one again.
#[inline]
pub fn perspective_correct(screen: Vec3, w: [f32; 3]) -> Vec3 {
    let corrected = Vec3::new(screen.x / w[0], screen.y / w[1], screen.z / w[2]);
    corrected / (corrected.x + corrected.y + corrected.z)
}

/// Inclusive pixel bounds of a triangle, clipped to the target buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundingBox {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl BoundingBox {
    /// Bounds of `points` truncated to integers and clamped to
    /// `[0, width - 1] x [0, height - 1]`. `None` when nothing is left.
    pub fn new(points: &[Vec2; 3], width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }

        let [a, b, c] = points;
        let min3 = |p: f32, q: f32, r: f32| p.min(q).min(r);
        let max3 = |p: f32, q: f32, r: f32| p.max(q).max(r);

        // Float-to-int casts truncate toward zero and saturate.
        let min_x = (min3(a.x, b.x, c.x) as i64).max(0);
        let min_y = (min3(a.y, b.y, c.y) as i64).max(0);
        let max_x = (max3(a.x, b.x, c.x) as i64).min(width as i64 - 1);
        let max_y = (max3(a.y, b.y, c.y) as i64).min(height as i64 - 1);

        if min_x > max_x || min_y > max_y {
            return None;
        }

        Some(Self {
            min_x: min_x as u32,
            min_y: min_y as u32,
            max_x: max_x as u32,
            max_y: max_y as u32,
        })
    }
}
