//! Color and depth buffers.
//!
//! Both buffers are row-major grids with row 0 at the bottom of the image
//! (the viewport maps NDC `y = -1` to row 0). They are separate types so a
//! pass can render depth only, as the shadow and occlusion passes do.

use std::path::Path;

use crate::colors;
use crate::error::{RenderError, Result};

/// Depth value of a pixel no surface has been drawn to yet.
pub const DEPTH_CLEAR: f32 = 0.0;

/// Per-pixel depth (z-buffer).
///
/// Larger values are closer to the viewer; a fragment only wins a pixel when
/// its depth is strictly greater than the stored one.
#[derive(Clone, Debug, PartialEq)]
pub struct DepthBuffer {
    data: Vec<f32>,
    width: u32,
    height: u32,
}

impl DepthBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![DEPTH_CLEAR; (width * height) as usize],
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Reset every pixel to [`DEPTH_CLEAR`].
    #[inline]
    pub fn clear(&mut self) {
        self.data.fill(DEPTH_CLEAR);
    }

    /// Get the depth at (x, y), or None if out of bounds.
    #[inline]
    pub fn get(&self, x: i64, y: i64) -> Option<f32> {
        if x >= 0 && x < self.width as i64 && y >= 0 && y < self.height as i64 {
            Some(self.data[(y as u32 * self.width + x as u32) as usize])
        } else {
            None
        }
    }

    /// Depth at in-bounds coordinates. Panics when out of range.
    #[inline]
    pub(crate) fn at(&self, x: u32, y: u32) -> f32 {
        self.data[(y * self.width + x) as usize]
    }

    #[inline]
    pub(crate) fn set(&mut self, x: u32, y: u32, depth: f32) {
        self.data[(y * self.width + x) as usize] = depth;
    }

    pub fn values(&self) -> &[f32] {
        &self.data
    }
}

/// A grid of packed ARGB pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorBuffer {
    data: Vec<u32>,
    width: u32,
    height: u32,
}

impl ColorBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![colors::BACKGROUND; (width * height) as usize],
            width,
            height,
        }
    }

    /// Visualize a depth buffer: every pixel is white scaled by its depth.
    pub fn from_depth(depth: &DepthBuffer) -> Self {
        Self {
            data: depth
                .values()
                .iter()
                .map(|&d| colors::modulate(colors::WHITE, d))
                .collect(),
            width: depth.width(),
            height: depth.height(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn clear(&mut self, color: u32) {
        self.data.fill(color);
    }

    /// Get the color at (x, y), or None if out of bounds.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<u32> {
        if x < self.width && y < self.height {
            Some(self.data[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    /// Set a pixel without depth testing. Silently ignores out-of-bounds
    /// coordinates.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, color: u32) {
        if x < self.width && y < self.height {
            self.data[(y * self.width + x) as usize] = color;
        }
    }

    pub fn pixels(&self) -> &[u32] {
        &self.data
    }

    /// Fail with [`RenderError::DimensionMismatch`] unless this buffer has
    /// the same size as `depth`.
    pub(crate) fn ensure_matches(&self, depth: &DepthBuffer) -> Result<()> {
        if self.width != depth.width() || self.height != depth.height() {
            return Err(RenderError::DimensionMismatch {
                width: depth.width(),
                height: depth.height(),
                actual_width: self.width,
                actual_height: self.height,
            });
        }
        Ok(())
    }

    /// Convert to an RGBA image with the top row first.
    pub fn to_image(&self) -> image::RgbaImage {
        let img = image::RgbaImage::from_fn(self.width, self.height, |x, y| {
            let [a, r, g, b] = colors::channels(self.data[(y * self.width + x) as usize]);
            image::Rgba([r, g, b, a])
        });
        image::imageops::flip_vertical(&img)
    }

    /// Encode the buffer to an image file (format from extension).
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.to_image().save(path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{gray, WHITE};

    #[test]
    fn depth_starts_cleared() {
        let depth = DepthBuffer::new(3, 2);
        assert!(depth.values().iter().all(|&d| d == DEPTH_CLEAR));
    }

    #[test]
    fn depth_clear_resets_written_pixels() {
        let mut depth = DepthBuffer::new(3, 2);
        depth.set(1, 1, 0.75);
        depth.clear();
        assert_eq!(depth, DepthBuffer::new(3, 2));
    }

    #[test]
    fn depth_get_is_bounds_checked() {
        let mut depth = DepthBuffer::new(3, 2);
        depth.set(2, 1, 0.5);
        assert_eq!(depth.get(2, 1), Some(0.5));
        assert_eq!(depth.get(3, 1), None);
        assert_eq!(depth.get(-1, 0), None);
    }

    #[test]
    fn color_set_ignores_out_of_bounds() {
        let mut color = ColorBuffer::new(2, 2);
        color.set(5, 0, WHITE);
        assert!(color.pixels().iter().all(|&c| c == colors::BACKGROUND));
    }

    #[test]
    fn mismatched_sizes_are_rejected() {
        let color = ColorBuffer::new(4, 4);
        assert!(color.ensure_matches(&DepthBuffer::new(4, 4)).is_ok());
        assert!(matches!(
            color.ensure_matches(&DepthBuffer::new(4, 5)),
            Err(RenderError::DimensionMismatch { height: 5, .. })
        ));
    }

    #[test]
    fn depth_visualization_scales_white() {
        let mut depth = DepthBuffer::new(1, 1);
        depth.set(0, 0, 0.5);
        assert_eq!(ColorBuffer::from_depth(&depth).get(0, 0), Some(gray(127)));
    }

    #[test]
    fn image_is_flipped_to_top_row_first() {
        let mut color = ColorBuffer::new(1, 2);
        color.set(0, 0, WHITE);
        let img = color.to_image();
        assert_eq!(img.get_pixel(0, 1).0, [255, 255, 255, 255]);
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0, 255]);
    }
}
