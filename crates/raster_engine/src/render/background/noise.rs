//! Hash-based value noise and fractal Brownian motion
//!
//! Lattice coordinates wrap at a caller-supplied period so baked textures tile
//! seamlessly.

use crate::foundation::math::utils;

/// Deterministic hash of a lattice point into `[0, 1)`
pub fn hash(x: i32, y: i32, seed: u32) -> f32 {
    let mut h = (x as u32).wrapping_mul(0x27d4_eb2d)
        ^ (y as u32).wrapping_mul(0x1656_67b1)
        ^ seed.wrapping_mul(0x9e37_79b9);
    h ^= h >> 15;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^= h >> 16;
    (h & 0x00ff_ffff) as f32 / 16_777_216.0
}

/// Smoothly interpolated value noise with lattice period `period`
pub fn value_noise(x: f32, y: f32, period: i32, seed: u32) -> f32 {
    let period = period.max(1);
    let (fx, fy) = (x.floor(), y.floor());
    let (tx, ty) = (utils::smoothstep(x - fx), utils::smoothstep(y - fy));
    let x0 = (fx as i32).rem_euclid(period);
    let y0 = (fy as i32).rem_euclid(period);
    let x1 = (x0 + 1) % period;
    let y1 = (y0 + 1) % period;

    let top = utils::lerp(hash(x0, y0, seed), hash(x1, y0, seed), tx);
    let bottom = utils::lerp(hash(x0, y1, seed), hash(x1, y1, seed), tx);
    utils::lerp(top, bottom, ty)
}

/// Fractal Brownian motion: `octaves` layers of value noise, each at twice the
/// frequency and half the amplitude of the last, normalised to `[0, 1)`
pub fn fbm(x: f32, y: f32, octaves: u32, period: i32, seed: u32) -> f32 {
    let mut sum = 0.0;
    let mut amplitude = 1.0;
    let mut total = 0.0;
    let mut frequency = 1;
    for octave in 0..octaves.max(1) {
        let f = frequency as f32;
        sum += value_noise(x * f, y * f, period * frequency, seed.wrapping_add(octave)) * amplitude;
        total += amplitude;
        amplitude *= 0.5;
        frequency *= 2;
    }
    sum / total
}

/// Square single-channel texture with wrapping bilinear sampling
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseTexture {
    size: usize,
    values: Vec<f32>,
}

impl NoiseTexture {
    /// Bake a tileable FBM texture, passing every value through `shape`
    ///
    /// `period` is the number of base lattice cells across the texture.
    pub fn fbm(size: usize, octaves: u32, period: i32, seed: u32, shape: impl Fn(f32) -> f32) -> Self {
        let size = size.max(1);
        let scale = period as f32 / size as f32;
        let values = (0..size * size)
            .map(|i| {
                let (x, y) = ((i % size) as f32, (i / size) as f32);
                shape(fbm(x * scale, y * scale, octaves, period, seed))
            })
            .collect();
        Self { size, values }
    }

    /// Edge length in texels
    pub fn size(&self) -> usize {
        self.size
    }

    /// Raw values, row major
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Bilinear sample with wrapping; one unit of `u`/`v` spans the texture
    pub fn sample(&self, u: f32, v: f32) -> f32 {
        let n = self.size as f32;
        let x = (u - u.floor()) * n;
        let y = (v - v.floor()) * n;
        let (x0, y0) = (x.floor() as usize % self.size, y.floor() as usize % self.size);
        let (x1, y1) = ((x0 + 1) % self.size, (y0 + 1) % self.size);
        let (tx, ty) = (x - x.floor(), y - y.floor());
        let at = |x: usize, y: usize| self.values[y * self.size + x];
        let top = utils::lerp(at(x0, y0), at(x1, y0), tx);
        let bottom = utils::lerp(at(x0, y1), at(x1, y1), tx);
        utils::lerp(top, bottom, ty)
    }
}
