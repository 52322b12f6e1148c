//! RGBA colour type shared by every stage of the pipeline
//!
//! Pixels are stored as 8-bit channels. Lighting works in floating point and
//! converts back through [`Color::from_rgb_f32`], which is the single place
//! where channel clamping to `[0, 255]` happens.

use serde::{Deserialize, Serialize};

/// 8-bit RGBA colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
    /// Alpha channel (255 = opaque)
    #[serde(default = "opaque_alpha")]
    pub a: u8,
}

fn opaque_alpha() -> u8 {
    255
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl Color {
    /// Fully transparent black
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);
    /// Opaque black
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Opaque colour from 8-bit channels
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Colour from 8-bit channels including alpha
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque colour from floating point channels in the 0-255 range
    ///
    /// Values are clamped to `[0, 255]` and rounded; NaN becomes 0.
    pub fn from_rgb_f32(r: f32, g: f32, b: f32) -> Self {
        Self::rgb(channel(r), channel(g), channel(b))
    }

    /// Channels as floats in the 0-255 range
    pub fn to_rgb_f32(self) -> [f32; 3] {
        [f32::from(self.r), f32::from(self.g), f32::from(self.b)]
    }

    /// Packed `[r, g, b, a]` representation used by the frame buffer
    pub const fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Inverse of [`Color::to_rgba`]
    pub const fn from_rgba(rgba: [u8; 4]) -> Self {
        Self::rgba(rgba[0], rgba[1], rgba[2], rgba[3])
    }

    /// Linear blend toward `other` by `t` in `[0, 1]`, keeping this colour's alpha
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let [r0, g0, b0] = self.to_rgb_f32();
        let [r1, g1, b1] = other.to_rgb_f32();
        Self {
            a: self.a,
            ..Self::from_rgb_f32(r0 + (r1 - r0) * t, g0 + (g1 - g0) * t, b0 + (b1 - b0) * t)
        }
    }

    /// Multiply every channel by `factor`, saturating
    pub fn scaled(self, factor: f32) -> Self {
        let [r, g, b] = self.to_rgb_f32();
        Self { a: self.a, ..Self::from_rgb_f32(r * factor, g * factor, b * factor) }
    }
}

/// Clamp and round a float channel into a byte
pub fn channel(value: f32) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.clamp(0.0, 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rgb_f32_clamps_every_channel() {
        let color = Color::from_rgb_f32(-40.0, 300.0, f32::NAN);
        assert_eq!(color, Color::rgb(0, 255, 0));
        assert_eq!(Color::from_rgb_f32(f32::INFINITY, 127.6, 0.4), Color::rgb(255, 128, 0));
    }

    #[test]
    fn test_lerp_keeps_alpha_and_hits_endpoints() {
        let a = Color::rgba(0, 0, 0, 10);
        let b = Color::rgb(200, 100, 50);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), Color::rgba(200, 100, 50, 10));
        assert_eq!(a.lerp(b, 0.5), Color::rgba(100, 50, 25, 10));
    }

    #[test]
    fn test_packed_round_trip() {
        let color = Color::rgba(1, 2, 3, 4);
        assert_eq!(Color::from_rgba(color.to_rgba()), color);
    }
}
