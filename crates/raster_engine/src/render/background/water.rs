//! Animated water: wave displacement, sky reflection and shimmer
//!
//! The reflection reads back rows that were already drawn above the horizon
//! (sky, sun and hills), so it must run after those and before anything is
//! drawn over the sky.

use std::hash::{Hash, Hasher};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::render::cache::ParamHasher;
use crate::render::config::WaterConfig;
use crate::render::framebuffer::FrameBuffer;

/// Sum of three sines, in pixels, for a floor pixel
///
/// `depth` is the row's position between the horizon (0) and the bottom of
/// the screen (1); waves grow toward the viewer.
pub fn wave_offset(x: f32, y: f32, depth: f32, time: f32, config: &WaterConfig) -> f32 {
    let t = time * config.speed;
    let waves = (x * 0.05 + t * 1.3).sin() * 0.5
        + (x * 0.11 - t * 0.9 + y * 0.07).sin() * 0.3
        + (x * 0.023 + y * 0.19 + t * 2.1).sin() * 0.2;
    waves * config.wave_height * (0.25 + 0.75 * depth.clamp(0.0, 1.0))
}

/// Blend a mirrored, wave-distorted copy of the sky into the floor
pub fn draw_reflection(frame: &mut FrameBuffer, horizon: f32, time: f32, config: &WaterConfig) {
    let (width, height) = (frame.width() as i32, frame.height() as f32);
    let span = (height - horizon).max(1.0);
    let first = horizon.ceil().max(0.0) as i32;

    for y in first..height as i32 {
        let row = y as f32 + 0.5;
        let depth = (row - horizon) / span;
        let mirrored = horizon - (row - horizon);
        if mirrored < 0.0 {
            continue;
        }
        // Grazing angles near the horizon reflect the most
        let alpha = config.reflection_opacity * (1.0 - depth * 0.7);
        for x in 0..width {
            let distortion = wave_offset(x as f32, row, depth, time, config) / config.wave_height.max(1e-3)
                * config.reflection_distortion;
            let source_x = (x as f32 + distortion).round() as i32;
            let source_y = (mirrored + distortion * 0.25).floor().min(horizon - 1.0) as i32;
            if let Some(reflected) = frame.get(source_x.clamp(0, width - 1), source_y) {
                frame.blend(x, y, reflected, alpha);
            }
        }
    }
}

/// Sparkle rectangle on the water surface, positioned in viewport fractions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShimmerChunk {
    /// Horizontal position in `[0, 1)`
    pub x: f32,
    /// Position between horizon (0) and screen bottom (1)
    pub depth: f32,
    /// Width in pixels
    pub width: f32,
    /// Height in pixels
    pub height: f32,
    /// Animation phase offset
    pub phase: f32,
    /// Animation rate
    pub rate: f32,
}

/// Cache key for a shimmer layout
pub fn shimmer_key(width: usize, height: usize, config: &WaterConfig) -> u64 {
    let mut hasher = ParamHasher::default();
    width.hash(&mut hasher);
    height.hash(&mut hasher);
    config.shimmer_key().hash(&mut hasher);
    hasher.finish()
}

/// Generate the seeded shimmer layout for a viewport
pub fn generate_shimmer(width: usize, height: usize, config: &WaterConfig) -> Vec<ShimmerChunk> {
    let mut rng = StdRng::seed_from_u64(shimmer_key(width, height, config));
    let count = (width * height / 2500).clamp(8, 256);
    (0..count)
        .map(|_| {
            let depth = rng.gen::<f32>().powf(1.5);
            ShimmerChunk {
                x: rng.gen(),
                depth,
                width: 2.0 + depth * rng.gen_range(2.0..8.0),
                height: 1.0 + depth * 2.0,
                phase: rng.gen_range(0.0..std::f32::consts::TAU),
                rate: rng.gen_range(1.0..3.0),
            }
        })
        .collect()
}

/// Draw animated sparkles below the horizon
pub fn draw_shimmer(frame: &mut FrameBuffer, horizon: f32, time: f32, chunks: &[ShimmerChunk], config: &WaterConfig) {
    let (width, height) = (frame.width() as f32, frame.height() as f32);
    let span = height - horizon;
    if span <= 1.0 {
        return;
    }
    for chunk in chunks {
        let pulse = (time * config.speed * chunk.rate + chunk.phase).sin().max(0.0).powi(4);
        if pulse < 0.01 {
            continue;
        }
        let brightness = pulse * 70.0;
        let left = (chunk.x * width) as i32;
        let top = (horizon + chunk.depth * span).max(horizon.ceil()) as i32;
        for y in top..top + chunk.height.ceil() as i32 {
            for x in left..left + chunk.width.ceil() as i32 {
                frame.add(x, y, [brightness; 3]);
            }
        }
    }
}
