use std::path::Path;

use log::info;

use crate::colors;
use crate::error::{RenderError, Result};
use crate::math::vec2::Vec2;
use crate::math::vec3::Vec3;

/// Represents a 2D texture for texture mapping.
///
/// Texel row 0 is the bottom row, so `v = 0` addresses the first row. Files
/// are flipped on load to match, and flipped back when saved.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    data: Vec<u32>, // The pixel data of the texture in ARGB format.
    width: u32,     // The width of the texture in pixels.
    height: u32,    // The height of the texture in pixels.
}

impl Texture {
    /// Build a texture from packed ARGB texels stored bottom row first.
    pub fn new(width: u32, height: u32, data: Vec<u32>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(RenderError::EmptyTexture { width, height });
        }
        if data.len() != (width * height) as usize {
            return Err(RenderError::TextureSize {
                width,
                height,
                len: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Texture of the given size with every texel set to `color`.
    pub fn filled(width: u32, height: u32, color: u32) -> Result<Self> {
        Self::new(width, height, vec![color; (width * height) as usize])
    }

    // Load a texture from an image file (PNG, JPG, TGA, etc.)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let img = image::open(path)?.to_rgba8();
        let img = image::imageops::flip_vertical(&img);
        let (width, height) = img.dimensions();
        info!("loaded texture {} ({}x{})", path.display(), width, height);

        // Convert RGBA bytes to ARGB u32
        let data: Vec<u32> = img
            .pixels()
            .map(|p| {
                let [r, g, b, a] = p.0;
                ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
            })
            .collect();

        Self::new(width, height, data)
    }

    /// Map a UV coordinate to a texel index using nearest-neighbor lookup.
    ///
    /// The coordinate is scaled by the texture size and truncated. Values
    /// outside `[0, 1]` clamp to the border texel, so lookups never fault.
    #[inline]
    fn texel_index(&self, uv: Vec2) -> usize {
        // `as u32` saturates negatives and NaN to zero.
        let x = ((uv.x * self.width as f32) as u32).min(self.width - 1);
        let y = ((uv.y * self.height as f32) as u32).min(self.height - 1);
        (y * self.width + x) as usize
    }

    /// Sample the texture color at a UV coordinate.
    #[inline]
    pub fn sample(&self, uv: Vec2) -> u32 {
        self.data[self.texel_index(uv)]
    }

    /// Sample a normal map: RGB bytes decode from `[0, 255]` to `[-1, 1]`
    /// and the result is re-normalized.
    #[inline]
    pub fn sample_normal(&self, uv: Vec2) -> Vec3 {
        let [_, r, g, b] = colors::channels(self.sample(uv));
        let decode = |c: u8| c as f32 / 255.0 * 2.0 - 1.0;
        Vec3::new(decode(r), decode(g), decode(b)).normalize()
    }

    /// Sample a specular map: the red channel is the exponent modifier.
    #[inline]
    pub fn sample_specular(&self, uv: Vec2) -> f32 {
        colors::red(self.sample(uv)) as f32
    }

    /// Write `color` into the texel addressed by `uv`.
    #[inline]
    pub fn set_uv(&mut self, uv: Vec2, color: u32) {
        let index = self.texel_index(uv);
        self.data[index] = color;
    }

    /// Read the texel at integer coordinates.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<u32> {
        if x < self.width && y < self.height {
            Some(self.data[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    /// Set every texel to `color`.
    pub fn fill(&mut self, color: u32) {
        self.data.fill(color);
    }

    pub fn texels(&self) -> &[u32] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Convert the red channel into a top-row-first greyscale image.
    pub fn to_gray_image(&self) -> image::GrayImage {
        let img = image::GrayImage::from_fn(self.width, self.height, |x, y| {
            image::Luma([colors::red(self.data[(y * self.width + x) as usize])])
        });
        image::imageops::flip_vertical(&img)
    }

    /// Encode the texture as a greyscale image file (format from extension).
    pub fn save_gray<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.to_gray_image().save(path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{gray, rgb, BLACK, WHITE};
    use approx::assert_relative_eq;

    fn checker() -> Texture {
        // bottom row: black, white; top row: white, black
        Texture::new(2, 2, vec![BLACK, WHITE, WHITE, BLACK]).unwrap()
    }

    #[test]
    fn rejects_empty_texture() {
        assert!(matches!(
            Texture::new(0, 4, vec![]),
            Err(RenderError::EmptyTexture { .. })
        ));
    }

    #[test]
    fn rejects_wrong_texel_count() {
        assert!(matches!(
            Texture::new(2, 2, vec![BLACK; 3]),
            Err(RenderError::TextureSize { len: 3, .. })
        ));
    }

    #[test]
    fn sample_truncates_uv() {
        let tex = checker();
        assert_eq!(tex.sample(Vec2::new(0.0, 0.0)), BLACK);
        assert_eq!(tex.sample(Vec2::new(0.49, 0.2)), BLACK);
        assert_eq!(tex.sample(Vec2::new(0.5, 0.0)), WHITE);
        assert_eq!(tex.sample(Vec2::new(0.1, 0.75)), WHITE);
    }

    #[test]
    fn sample_clamps_out_of_range_uv() {
        let tex = checker();
        assert_eq!(tex.sample(Vec2::new(1.0, 1.0)), BLACK);
        assert_eq!(tex.sample(Vec2::new(-3.0, 7.0)), WHITE);
        assert_eq!(tex.sample(Vec2::new(f32::NAN, 0.0)), BLACK);
    }

    #[test]
    fn normal_map_decodes_to_unit_vector() {
        let tex = Texture::filled(1, 1, rgb(255, 128, 128)).unwrap();
        let n = tex.sample_normal(Vec2::ZERO);
        assert_relative_eq!(n.magnitude(), 1.0, epsilon = 1e-5);
        assert!(n.x > 0.99);
    }

    #[test]
    fn specular_reads_red_channel() {
        let tex = Texture::filled(1, 1, rgb(42, 7, 9)).unwrap();
        assert_eq!(tex.sample_specular(Vec2::new(0.3, 0.3)), 42.0);
    }

    #[test]
    fn set_uv_writes_addressed_texel() {
        let mut tex = Texture::filled(4, 4, BLACK).unwrap();
        tex.set_uv(Vec2::new(0.6, 0.3), WHITE);
        assert_eq!(tex.get(2, 1), Some(WHITE));
        assert_eq!(tex.texels().iter().filter(|&&t| t == WHITE).count(), 1);
    }

    #[test]
    fn gray_image_is_flipped_to_top_row_first() {
        let tex = Texture::new(1, 2, vec![gray(10), gray(200)]).unwrap();
        let img = tex.to_gray_image();
        assert_eq!(img.get_pixel(0, 0).0, [200]);
        assert_eq!(img.get_pixel(0, 1).0, [10]);
    }
}
