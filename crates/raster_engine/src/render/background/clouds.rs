//! Procedural cloud layer
//!
//! Coverage comes from a baked, tileable FBM texture. Each pixel block casts a
//! view ray onto a horizontal plane `height` units above the camera and
//! samples the texture at the hit point, so clouds follow yaw and shrink
//! toward the horizon with perspective.

use crate::foundation::math::{constants, Vec2, Vec3};
use crate::render::color::Color;
use crate::render::config::CloudConfig;
use crate::render::framebuffer::FrameBuffer;
use crate::render::projection::View;

use super::noise::NoiseTexture;

/// Edge length of the baked coverage texture
pub const TEXTURE_SIZE: usize = 128;

/// Largest accepted block size in pixels
pub const MAX_RESOLUTION: u32 = 64;

const OCTAVES: u32 = 4;
const PERIOD: i32 = 8;
const SEED: u32 = 0x00c1_0dd5;

/// Plane hits farther than this many cloud heights fade out completely
const FADE_DISTANCE: f32 = 40.0;

/// Bake the coverage texture for `config`
///
/// Noise below `1 - density` is clear sky; the rest is remapped to `[0, 1]`
/// and sharpened by the softness exponent.
pub fn bake_coverage(config: &CloudConfig) -> NoiseTexture {
    let density = config.density.clamp(0.0, 1.0);
    let threshold = 1.0 - density;
    let softness = config.softness;
    NoiseTexture::fbm(TEXTURE_SIZE, OCTAVES, PERIOD, SEED, move |n| {
        if density <= 0.0 || n <= threshold {
            0.0
        } else {
            ((n - threshold) / density).clamp(0.0, 1.0).powf(softness)
        }
    })
}

/// Vertical fade within the cloud band
///
/// `above` is the row's distance above the horizon as a fraction of the sky
/// height. The band spans `[0, thickness]` and fades in and out with a sine.
pub fn band_fade(above: f32, thickness: f32) -> f32 {
    if above <= 0.0 || above >= thickness {
        return 0.0;
    }
    (constants::PI * above / thickness).sin()
}

/// Composite clouds into the rows above the horizon
pub fn draw(
    frame: &mut FrameBuffer,
    view: &View,
    horizon: f32,
    coverage: &NoiseTexture,
    config: &CloudConfig,
    time: f32,
    tint: Color,
) {
    let block = i32::try_from(config.resolution.max(1)).unwrap_or(i32::MAX);
    let (width, height) = (frame.width() as i32, frame.height() as i32);
    let last_row = horizon.min(height as f32);
    if last_row <= 0.0 {
        return;
    }
    let camera = view.position();
    let drift = time * config.speed;
    let color = tint.scaled(config.brightness);

    let mut by = 0;
    while (by as f32) < last_row {
        let row = by as f32 + block as f32 * 0.5;
        let fade = band_fade((horizon - row) / horizon.max(1.0), config.thickness);
        if fade > 0.0 {
            let mut bx = 0;
            while bx < width {
                let column = bx as f32 + block as f32 * 0.5;
                if let Some(alpha) = sample_block(view, &camera, column, row, coverage, config, drift) {
                    let alpha = alpha * fade;
                    if alpha > 0.004 {
                        fill_block(frame, bx, by, block, color, alpha, last_row);
                    }
                }
                bx = bx.saturating_add(block);
            }
        }
        by = by.saturating_add(block);
    }
}

fn sample_block(
    view: &View,
    camera: &Vec3,
    column: f32,
    row: f32,
    coverage: &NoiseTexture,
    config: &CloudConfig,
    drift: f32,
) -> Option<f32> {
    let ray_camera = view.unproject(&Vec2::new(column, row), 1.0);
    let ray = view.rotate_to_world(&ray_camera);
    if ray.z <= 1e-3 {
        return None;
    }
    let distance = config.height / ray.z;
    let hit_x = camera.x + ray.x * distance;
    let hit_y = camera.y + ray.y * distance;
    let falloff = (1.0 - distance * ray.norm() / (config.height * FADE_DISTANCE)).max(0.0);
    if falloff <= 0.0 {
        return None;
    }
    let value = coverage.sample(hit_x * config.scale + drift, hit_y * config.scale);
    Some(value * falloff)
}

fn fill_block(frame: &mut FrameBuffer, bx: i32, by: i32, block: i32, color: Color, alpha: f32, last_row: f32) {
    let bottom = by.saturating_add(block).min(last_row.ceil() as i32);
    let right = bx.saturating_add(block).min(frame.width() as i32);
    for y in by..bottom {
        for x in bx..right {
            frame.blend(x, y, color, alpha);
        }
    }
}
