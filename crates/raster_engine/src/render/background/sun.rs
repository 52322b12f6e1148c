//! Sun disc and lens flare

use crate::foundation::math::{Vec2, Vec3};
use crate::render::color::Color;
use crate::render::config::{LensFlareConfig, SunConfig};
use crate::render::framebuffer::{DepthBuffer, FrameBuffer};
use crate::render::projection::View;
use crate::render::rasterizer::{horizontal_streak, radial_gradient};

/// Tints cycled along the flare chain when colour shift is on
const CHROMATIC_TINTS: [[f32; 3]; 3] = [[1.0, 0.7, 0.45], [0.7, 1.0, 0.6], [0.55, 0.7, 1.0]];

/// Screen position of the sun, if it is above the horizon and in front of the camera
///
/// `to_sun` is the world direction toward the sun, the reverse of the
/// directional light's travel direction.
pub fn screen_position(view: &View, to_sun: &Vec3) -> Option<Vec2> {
    if to_sun.z <= 0.0 {
        return None;
    }
    let camera = view.rotate_to_camera(to_sun);
    view.project_clipped(&camera)
}

/// Additive glow disc with a brighter core
pub fn draw_sun(frame: &mut FrameBuffer, center: &Vec2, config: &SunConfig) {
    let rgb = config.color.to_rgb_f32();
    radial_gradient(frame, center, config.glow_size, rgb.map(|c| c * 0.55), 2.0, None);
    radial_gradient(frame, center, config.size, rgb.map(|c| c * 1.6), 0.5, None);
}

/// Flare intensity for a sun at `sun`: full at the screen centre, zero at the corners
pub fn flare_strength(view: &View, sun: &Vec2, config: &LensFlareConfig) -> f32 {
    let center = Vec2::new(view.width() * 0.5, view.height() * 0.5);
    let reach = center.norm().max(1.0);
    let falloff = (1.0 - (center - sun).norm() / reach).clamp(0.0, 1.0);
    config.intensity * falloff
}

/// Draw the flare chain when the sun pixel is visible
///
/// Returns `false` without drawing when the sun is off screen or covered by
/// geometry.
pub fn draw_lens_flare(
    frame: &mut FrameBuffer,
    depth: &DepthBuffer,
    view: &View,
    sun: &Vec2,
    config: &LensFlareConfig,
    tint: Color,
) -> bool {
    let (x, y) = (sun.x.floor() as i32, sun.y.floor() as i32);
    match depth.get(x, y) {
        Some(d) if d.is_infinite() => {}
        _ => return false,
    }

    let strength = flare_strength(view, sun, config);
    if strength <= 0.0 {
        return false;
    }

    let center = Vec2::new(view.width() * 0.5, view.height() * 0.5);
    let axis = center - sun;
    let base = tint.to_rgb_f32();

    for i in 0..config.count {
        let position = sun + axis * (config.spacing * (i + 1) as f32);
        let radius = config.size * 0.8f32.powi(i as i32);
        let tint = if config.color_shift {
            CHROMATIC_TINTS[i as usize % CHROMATIC_TINTS.len()]
        } else {
            [1.0; 3]
        };
        let rgb = [
            base[0] * tint[0] * strength * 0.35,
            base[1] * tint[1] * strength * 0.35,
            base[2] * tint[2] * strength * 0.35,
        ];
        radial_gradient(frame, &position, radius, rgb, 1.5, None);
    }

    horizontal_streak(frame, sun, view.width() * 0.35, 2.0, base.map(|c| c * strength * 0.25));
    true
}
