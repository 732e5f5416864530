//! Packed ARGB8888 color helpers.
//!
//! Colors are stored as `0xAARRGGBB` in a `u32`, the same layout used by the
//! color buffer and by textures. All arithmetic clamps each channel to
//! `[0, 255]` and truncates toward zero, leaving alpha untouched.

use crate::math::vec3::Vec3;

pub const BLACK: u32 = 0xFF000000;
pub const WHITE: u32 = 0xFFFFFFFF;
pub const ORANGE: u32 = 0xFFFFA500;

/// Background color the color buffer is cleared to.
pub const BACKGROUND: u32 = BLACK;

/// Pack opaque RGB channels.
#[inline]
pub const fn rgb(r: u8, g: u8, b: u8) -> u32 {
    0xFF000000 | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}

/// Opaque grey with all three channels set to `value`.
#[inline]
pub const fn gray(value: u8) -> u32 {
    rgb(value, value, value)
}

/// Unpack into `[a, r, g, b]` bytes.
#[inline]
pub const fn channels(color: u32) -> [u8; 4] {
    [
        (color >> 24) as u8,
        (color >> 16) as u8,
        (color >> 8) as u8,
        color as u8,
    ]
}

#[inline]
pub const fn red(color: u32) -> u8 {
    (color >> 16) as u8
}

#[inline]
fn scale_channel(channel: u8, factor: f32) -> u8 {
    // NaN clamps to 0 through the saturating cast.
    (channel as f32 * factor).clamp(0.0, 255.0) as u8
}

#[inline]
fn with_channels(alpha: u8, r: u8, g: u8, b: u8) -> u32 {
    ((alpha as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}

/// Multiply every color channel by `factor`.
#[inline]
pub fn modulate(color: u32, factor: f32) -> u32 {
    let [a, r, g, b] = channels(color);
    with_channels(
        a,
        scale_channel(r, factor),
        scale_channel(g, factor),
        scale_channel(b, factor),
    )
}

/// Multiply red, green and blue by the x, y and z of `factors`.
#[inline]
pub fn modulate_rgb(color: u32, factors: Vec3) -> u32 {
    let [a, r, g, b] = channels(color);
    with_channels(
        a,
        scale_channel(r, factors.x),
        scale_channel(g, factors.y),
        scale_channel(b, factors.z),
    )
}

/// Channel-wise saturating addition; alpha comes from `color`.
#[inline]
pub fn saturating_add(color: u32, other: u32) -> u32 {
    let [a, r, g, b] = channels(color);
    let [_, r2, g2, b2] = channels(other);
    with_channels(
        a,
        r.saturating_add(r2),
        g.saturating_add(g2),
        b.saturating_add(b2),
    )
}
