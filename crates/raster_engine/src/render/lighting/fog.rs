//! Linear distance fog

use crate::render::color::Color;
use crate::render::config::FogConfig;

/// Fog factor for a camera-space depth
///
/// Returns `0` at or before `start`, `density` at or after `end` and a linear
/// ramp in between. A zero-width range behaves as a step at `end`.
pub fn calculate_fog_factor(depth: f32, start: f32, end: f32, density: f32) -> f32 {
    if depth.is_nan() || depth <= start {
        return 0.0;
    }
    if depth >= end {
        return density;
    }
    let span = end - start;
    if span <= f32::EPSILON {
        return density;
    }
    (((depth - start) / span) * density).clamp(0.0, density)
}

/// Fog parameters resolved from configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fog {
    /// Whether fog is applied at all
    pub enabled: bool,
    /// Colour surfaces blend toward
    pub color: Color,
    /// Depth where fog begins
    pub start: f32,
    /// Depth where fog reaches `density`
    pub end: f32,
    /// Maximum blend factor
    pub density: f32,
}

impl Fog {
    /// Build from the fog configuration group
    pub fn from_config(config: &FogConfig) -> Self {
        Self {
            enabled: config.enabled,
            color: config.color,
            start: config.start,
            end: config.end,
            density: config.density.clamp(0.0, 1.0),
        }
    }

    /// Fog factor at `depth`, always `0` when fog is disabled
    pub fn factor(&self, depth: f32) -> f32 {
        if self.enabled {
            calculate_fog_factor(depth, self.start, self.end, self.density)
        } else {
            0.0
        }
    }

    /// Blend `color` toward the fog colour by the factor at `depth`
    pub fn apply(&self, color: Color, depth: f32) -> Color {
        color.lerp(self.color, self.factor(depth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_fog_factor_bounds() {
        let (start, end, density) = (100.0, 500.0, 0.8);
        for i in 0..=80 {
            let depth = i as f32 * 10.0;
            let f = calculate_fog_factor(depth, start, end, density);
            assert!((0.0..=density).contains(&f), "factor {f} at depth {depth}");
        }
        assert_eq!(calculate_fog_factor(100.0, start, end, density), 0.0);
        assert_eq!(calculate_fog_factor(-5.0, start, end, density), 0.0);
        assert_eq!(calculate_fog_factor(500.0, start, end, density), density);
        assert_eq!(calculate_fog_factor(9000.0, start, end, density), density);
    }

    #[test]
    fn test_fog_factor_is_linear_between_start_and_end() {
        assert_relative_eq!(calculate_fog_factor(300.0, 100.0, 500.0, 1.0), 0.5, epsilon = 1e-6);
        assert_relative_eq!(calculate_fog_factor(200.0, 100.0, 500.0, 0.8), 0.2, epsilon = 1e-6);
    }

    #[test]
    fn test_zero_width_range_is_a_step() {
        assert_eq!(calculate_fog_factor(99.0, 100.0, 100.0, 1.0), 0.0);
        assert_eq!(calculate_fog_factor(100.5, 100.0, 100.0, 1.0), 1.0);
    }

    #[test]
    fn test_saturated_fog_replaces_colour() {
        let fog = Fog {
            enabled: true,
            color: Color::rgb(120, 130, 140),
            start: 100.0,
            end: 500.0,
            density: 1.0,
        };
        assert_eq!(fog.apply(Color::rgb(255, 0, 0), 600.0), Color::rgb(120, 130, 140));
        let disabled = Fog { enabled: false, ..fog };
        assert_eq!(disabled.apply(Color::rgb(255, 0, 0), 600.0), Color::rgb(255, 0, 0));
    }
}
