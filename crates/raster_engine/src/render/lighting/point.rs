//! Point light capability
//!
//! Scene objects expose light through [`LightSource`]. The renderer resolves
//! each light's world position once per frame and passes it in, so a light
//! implementation never needs to know about the transform hierarchy.

use std::fmt::Debug;

use crate::foundation::math::Vec3;
use crate::render::color::Color;
use crate::render::triangle::{segment_blocked, Triangle};

/// Surfaces are nudged this far along their normal before casting shadow rays
const SHADOW_BIAS: f32 = 1e-3;

/// Additive light reaching a surface point
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LightContribution {
    /// Red on a 0-255 scale
    pub r: f32,
    /// Green on a 0-255 scale
    pub g: f32,
    /// Blue on a 0-255 scale
    pub b: f32,
    /// Strength after falloff and the Lambert term
    pub intensity: f32,
}

impl LightContribution {
    /// Per-channel multiplier to add to a base colour's lighting
    pub fn multiplier(&self) -> [f32; 3] {
        [
            self.r / 255.0 * self.intensity,
            self.g / 255.0 * self.intensity,
            self.b / 255.0 * self.intensity,
        ]
    }
}

/// Light capability exposed by scene objects
pub trait LightSource: Debug + Send + Sync {
    /// Emitted colour
    fn color(&self) -> Color;

    /// Peak intensity
    fn intensity(&self) -> f32;

    /// Distance beyond which the light has no effect
    fn range(&self) -> f32;

    /// Whether the light at `position` reaches a surface point
    ///
    /// Implementations decide visibility themselves, using `triangles` (every
    /// triangle of the current frame) for occlusion.
    fn is_triangle_lit(&self, position: &Vec3, centroid: &Vec3, normal: &Vec3, triangles: &[Triangle]) -> bool;

    /// Light arriving at a surface point from `position`
    fn light_contribution(&self, position: &Vec3, centroid: &Vec3, normal: &Vec3) -> LightContribution;
}

/// Built-in omnidirectional light with smooth range falloff
#[derive(Debug, Clone, PartialEq)]
pub struct PointLight {
    /// Emitted colour
    pub color: Color,
    /// Peak intensity at zero distance
    pub intensity: f32,
    /// Falloff radius
    pub range: f32,
    /// Test occlusion against scene triangles
    pub cast_shadows: bool,
}

impl PointLight {
    /// Shadow-casting light
    pub fn new(color: Color, intensity: f32, range: f32) -> Self {
        Self { color, intensity, range: range.max(f32::EPSILON), cast_shadows: true }
    }

    /// Disable occlusion tests for this light
    pub fn without_shadows(mut self) -> Self {
        self.cast_shadows = false;
        self
    }

    /// Falloff at `distance`: `(1 - d / range)^2`, zero beyond the range
    pub fn attenuation(&self, distance: f32) -> f32 {
        let t = (1.0 - distance / self.range).clamp(0.0, 1.0);
        t * t
    }
}

impl LightSource for PointLight {
    fn color(&self) -> Color {
        self.color
    }

    fn intensity(&self) -> f32 {
        self.intensity
    }

    fn range(&self) -> f32 {
        self.range
    }

    fn is_triangle_lit(&self, position: &Vec3, centroid: &Vec3, normal: &Vec3, triangles: &[Triangle]) -> bool {
        let to_light = position - centroid;
        let distance = to_light.norm();
        if distance >= self.range || distance < f32::EPSILON || normal.dot(&to_light) <= 0.0 {
            return false;
        }
        if !self.cast_shadows {
            return true;
        }
        let origin = centroid + normal * SHADOW_BIAS;
        !segment_blocked(&origin, position, triangles, None, SHADOW_BIAS / distance)
    }

    fn light_contribution(&self, position: &Vec3, centroid: &Vec3, normal: &Vec3) -> LightContribution {
        let to_light = position - centroid;
        let distance = to_light.norm();
        if distance < f32::EPSILON {
            return LightContribution::default();
        }
        let lambert = normal.dot(&(to_light / distance)).max(0.0);
        let [r, g, b] = self.color.to_rgb_f32();
        LightContribution { r, g, b, intensity: self.intensity * self.attenuation(distance) * lambert }
    }
}
