//! Directional (sun) light with an ambient floor

use crate::foundation::math::Vec3;
use crate::render::color::Color;
use crate::render::config::LightingConfig;

/// Infinitely distant light shining along a fixed direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    direction: Vec3,
    /// Light tint
    pub color: Color,
    /// Diffuse strength
    pub intensity: f32,
    /// Minimum light level in `[0, 1]`
    pub ambient: f32,
}

impl DirectionalLight {
    /// Create a light travelling along `direction`
    ///
    /// A zero direction falls back to straight down.
    pub fn new(direction: Vec3, color: Color, intensity: f32, ambient: f32) -> Self {
        Self {
            direction: direction.try_normalize(1e-9).unwrap_or_else(|| -Vec3::z()),
            color,
            intensity,
            ambient: ambient.clamp(0.0, 1.0),
        }
    }

    /// Build from the lighting configuration group
    pub fn from_config(config: &LightingConfig) -> Self {
        let [x, y, z] = config.direction;
        Self::new(Vec3::new(x, y, z), config.color, config.intensity, config.ambient)
    }

    /// Unit direction the light travels
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Unit direction from a surface toward the light
    pub fn to_light(&self) -> Vec3 {
        -self.direction
    }

    /// Lambertian term `max(0, -n·L) * intensity`
    pub fn diffuse(&self, normal: &Vec3) -> f32 {
        (-normal.dot(&self.direction)).max(0.0) * self.intensity
    }

    /// Combined light level `ambient + diffuse * (1 - ambient)`
    pub fn level(&self, normal: &Vec3) -> f32 {
        self.ambient + self.diffuse(normal) * (1.0 - self.ambient)
    }

    /// Per-channel multiplier for a base colour, tinted by the light colour
    pub fn multiplier(&self, normal: &Vec3) -> [f32; 3] {
        let level = self.level(normal);
        let [r, g, b] = self.color.to_rgb_f32();
        [level * r / 255.0, level * g / 255.0, level * b / 255.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_head_on_light_saturates() {
        let light = DirectionalLight::new(Vec3::new(1.0, 0.0, 0.0), Color::WHITE, 1.0, 0.3);
        let normal = Vec3::new(-1.0, 0.0, 0.0);
        assert_relative_eq!(light.level(&normal), 1.0, epsilon = 1e-6);
        let [r, g, b] = light.multiplier(&normal);
        let lit = Color::from_rgb_f32(255.0 * r, 255.0 * g, 255.0 * b);
        assert_eq!(lit, Color::WHITE);
    }

    #[test]
    fn test_faces_turned_away_get_ambient_only() {
        let light = DirectionalLight::new(Vec3::new(0.0, 0.0, -1.0), Color::WHITE, 1.0, 0.25);
        assert_relative_eq!(light.level(&Vec3::new(0.0, 0.0, -1.0)), 0.25, epsilon = 1e-6);
        assert_relative_eq!(light.level(&Vec3::new(1.0, 0.0, 0.0)), 0.25, epsilon = 1e-6);
    }

    #[test]
    fn test_zero_direction_falls_back_to_down() {
        let light = DirectionalLight::new(Vec3::zeros(), Color::WHITE, 1.0, 0.0);
        assert_relative_eq!(light.direction(), -Vec3::z());
    }
}
