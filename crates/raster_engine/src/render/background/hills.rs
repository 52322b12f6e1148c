//! Seeded 360° hill silhouette

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::foundation::math::utils;
use crate::render::color::Color;
use crate::render::config::HillConfig;
use crate::render::framebuffer::FrameBuffer;
use crate::render::projection::View;

/// One height sample per degree of azimuth
pub const PROFILE_SAMPLES: usize = 360;

const OCTAVES: u32 = 3;

/// Largest accepted base control point count; the finest octave then has one
/// point per sample
pub const MAX_FREQUENCY: u32 = (PROFILE_SAMPLES >> (OCTAVES - 1)) as u32;

/// Height above the horizon, in pixels, for every integer degree of azimuth
#[derive(Debug, Clone, PartialEq)]
pub struct HillProfile {
    heights: Vec<f32>,
}

impl HillProfile {
    /// Generate the profile for `config`
    ///
    /// Each octave places `frequency * 2^octave` random control points evenly
    /// around the circle and interpolates them with smoothstep. Octaves are
    /// summed with halving amplitude, then per-sample jitter scaled by
    /// `roughness` is added. Identical parameters always give identical
    /// profiles.
    pub fn generate(config: &HillConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);

        let base = config.frequency.clamp(1, MAX_FREQUENCY) as usize;
        let octaves: Vec<(Vec<f32>, f32)> = (0..OCTAVES)
            .map(|octave| {
                let count = base.checked_shl(octave).map_or(PROFILE_SAMPLES, |c| c.min(PROFILE_SAMPLES));
                let points = (0..count).map(|_| rng.gen::<f32>()).collect();
                (points, 0.5f32.powi(octave as i32))
            })
            .collect();
        let total_amplitude: f32 = octaves.iter().map(|(_, amplitude)| amplitude).sum();

        let span = config.max_height - config.min_height;
        let heights = (0..PROFILE_SAMPLES)
            .map(|sample| {
                let around = sample as f32 / PROFILE_SAMPLES as f32;
                let smooth: f32 = octaves
                    .iter()
                    .map(|(points, amplitude)| {
                        let position = around * points.len() as f32;
                        let index = position.floor() as usize % points.len();
                        let next = (index + 1) % points.len();
                        let t = utils::smoothstep(position - position.floor());
                        utils::lerp(points[index], points[next], t) * amplitude
                    })
                    .sum::<f32>()
                    / total_amplitude;
                let jitter = (rng.gen::<f32>() - 0.5) * config.roughness * 0.5;
                config.min_height + span * (smooth + jitter).clamp(0.0, 1.0)
            })
            .collect();

        log::trace!("Generated hill profile for seed {}", config.seed);
        Self { heights }
    }

    /// Raw samples, index = degree
    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    /// Height at an arbitrary azimuth in degrees, wrapping and interpolating
    pub fn height_at(&self, degrees: f32) -> f32 {
        let angle = utils::wrap_degrees(degrees);
        let index = angle.floor() as usize % PROFILE_SAMPLES;
        let next = (index + 1) % PROFILE_SAMPLES;
        utils::lerp(self.heights[index], self.heights[next], angle - angle.floor())
    }
}

/// Azimuth in degrees seen through column `x`
pub fn column_azimuth(view: &View, yaw_degrees: f32, x: f32) -> f32 {
    let ndc_x = (x + 0.5) / view.width() * 2.0 - 1.0;
    yaw_degrees + utils::rad_to_deg((ndc_x * view.aspect() / view.focal_length()).atan())
}

/// Draw the silhouette as per-column gradients ending at `horizon`
///
/// With `haze`, columns blend toward the haze colour the farther they are from
/// the screen centre.
pub fn draw(
    frame: &mut FrameBuffer,
    view: &View,
    yaw_degrees: f32,
    horizon: f32,
    profile: &HillProfile,
    config: &HillConfig,
    haze: Option<Color>,
) {
    let width = frame.width();
    let half = width as f32 * 0.5;
    let bottom = horizon.round() as i32;

    for x in 0..width {
        let height = profile.height_at(column_azimuth(view, yaw_degrees, x as f32));
        if height < 0.5 {
            continue;
        }
        let top = horizon - height;
        let haze_amount = haze.map_or(0.0, |_| ((x as f32 + 0.5 - half).abs() / half * 0.6).min(0.6));

        for y in top.floor().max(0.0) as i32..bottom {
            let t = ((y as f32 + 0.5 - top) / height).clamp(0.0, 1.0);
            let mut color = config.peak_color.lerp(config.base_color, t);
            if let Some(haze) = haze {
                color = color.lerp(haze, haze_amount);
            }
            frame.set(x as i32, y, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use crate::render::Camera;
    use approx::assert_relative_eq;

    #[test]
    fn test_same_seed_gives_identical_profile() {
        let config = HillConfig::default();
        let a = HillProfile::generate(&config);
        let b = HillProfile::generate(&config);
        assert_eq!(a.heights().len(), PROFILE_SAMPLES);
        let bits = |p: &HillProfile| p.heights().iter().map(|h| h.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&a), bits(&b));

        let other = HillProfile::generate(&HillConfig { seed: config.seed + 1, ..config.clone() });
        assert_ne!(bits(&a), bits(&other));
    }

    #[test]
    fn test_heights_stay_within_range() {
        let config = HillConfig { roughness: 1.0, ..HillConfig::default() };
        let profile = HillProfile::generate(&config);
        for &h in profile.heights() {
            assert!(h >= config.min_height && h <= config.max_height);
        }
    }

    #[test]
    fn test_frequency_is_bounded() {
        let at_limit = HillConfig { frequency: MAX_FREQUENCY, ..HillConfig::default() };
        assert!(at_limit.validate().is_ok());
        let huge = HillConfig { frequency: u32::MAX, ..HillConfig::default() };
        match huge.validate() {
            Err(ConfigError::InvalidValue { field, .. }) => assert_eq!(field, "hills.frequency"),
            other => panic!("expected hills.frequency to be rejected, got {other:?}"),
        }

        let profile = HillProfile::generate(&huge);
        assert_eq!(profile.heights().len(), PROFILE_SAMPLES);
        assert_eq!(profile, HillProfile::generate(&at_limit));
    }

    #[test]
    fn test_height_at_wraps_and_interpolates() {
        let profile = HillProfile::generate(&HillConfig::default());
        let h = profile.heights();
        assert_relative_eq!(profile.height_at(10.0), h[10], epsilon = 1e-5);
        assert_relative_eq!(profile.height_at(370.0), h[10], epsilon = 1e-4);
        assert_relative_eq!(profile.height_at(-350.0), h[10], epsilon = 1e-4);
        assert_relative_eq!(profile.height_at(10.5), (h[10] + h[11]) * 0.5, epsilon = 1e-4);
        assert_relative_eq!(profile.height_at(359.5), (h[359] + h[0]) * 0.5, epsilon = 1e-4);
    }

    #[test]
    fn test_silhouette_ends_at_horizon() {
        let camera = Camera::new(32, 32, 60.0, 0.1, 100.0).unwrap();
        let view = View::new(&camera);
        let config = HillConfig { min_height: 4.0, max_height: 4.0, ..HillConfig::default() };
        let profile = HillProfile::generate(&config);
        let mut frame = FrameBuffer::new(32, 32);
        frame.clear(Color::BLACK);
        draw(&mut frame, &view, 0.0, 16.0, &profile, &config, None);
        assert_eq!(frame.get(16, 15), Some(config.peak_color.lerp(config.base_color, 0.875)));
        assert_eq!(frame.get(16, 16), Some(Color::BLACK));
        assert_eq!(frame.get(16, 11), Some(Color::BLACK));
    }
}
