//! # Lighting Engine
//!
//! Per-triangle shading for the software rasterizer. Lighting is evaluated
//! once per triangle at its centroid and packed into a [`Shading`] value that
//! the rasterizer applies to the flat material colour or to every sampled
//! texel.
//!
//! ## Model
//! 1. Directional: `level = ambient + max(0, -n·L) * intensity * (1 - ambient)`,
//!    tinted by the light colour.
//! 2. Point lights: every light that reports the triangle as lit adds
//!    `rgb / 255 * intensity` to the multiplier.
//! 3. Emissive: `emissive * emissive_intensity * multiplier`, added after
//!    lighting.
//! 4. Fog: the clamped result blends toward the fog colour by the fog factor
//!    of the triangle's average depth.
//!
//! Phong highlights are queued separately, see [`specular`].

pub mod directional;
pub mod fog;
pub mod point;
pub mod specular;

pub use directional::DirectionalLight;
pub use fog::{calculate_fog_factor, Fog};
pub use point::{LightContribution, LightSource, PointLight};
pub use specular::{HighlightLight, SpecularHighlight, SpecularPass};

use crate::render::color::Color;
use crate::render::config::RenderConfig;
use crate::render::scene::LightHandle;
use crate::render::triangle::Triangle;

/// Resolved lighting for one triangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shading {
    /// Per-channel multiplier applied to the base colour
    pub multiplier: [f32; 3],
    /// Additive emissive term on a 0-255 scale
    pub emissive: [f32; 3],
    /// Fog blend factor
    pub fog_factor: f32,
    /// Colour the result is blended toward
    pub fog_color: Color,
}

impl Shading {
    /// Shading that leaves colours untouched
    pub const UNLIT: Self = Self {
        multiplier: [1.0, 1.0, 1.0],
        emissive: [0.0, 0.0, 0.0],
        fog_factor: 0.0,
        fog_color: Color::BLACK,
    };

    /// Light, clamp and fog a base colour
    ///
    /// Geometry is opaque: the result always has full alpha, whatever the
    /// texel or material alpha was.
    pub fn apply(&self, base: Color) -> Color {
        let [r, g, b] = base.to_rgb_f32();
        let [mr, mg, mb] = self.multiplier;
        let [er, eg, eb] = self.emissive;
        let lit = Color::from_rgb_f32(r * mr + er, g * mg + eg, b * mb + eb);
        if self.fog_factor > 0.0 {
            lit.lerp(self.fog_color, self.fog_factor)
        } else {
            lit
        }
    }
}

/// Shading state derived from the render configuration
#[derive(Debug, Clone)]
pub struct LightingEngine {
    directional: DirectionalLight,
    fog: Fog,
    emissive_multiplier: f32,
    dynamic_lighting: bool,
}

impl LightingEngine {
    /// Build from the full configuration
    pub fn from_config(config: &RenderConfig) -> Self {
        Self {
            directional: DirectionalLight::from_config(&config.lighting),
            fog: Fog::from_config(&config.fog),
            emissive_multiplier: config.lighting.emissive_multiplier,
            dynamic_lighting: config.dynamic_lighting.enabled,
        }
    }

    /// Directional light
    pub fn directional(&self) -> &DirectionalLight {
        &self.directional
    }

    /// Fog parameters
    pub fn fog(&self) -> &Fog {
        &self.fog
    }

    /// Shade `triangle`
    ///
    /// `lights` are the frame's nearest point lights and `triangles` the full
    /// frame triangle list used for occlusion. Lights that contribute to the
    /// triangle are written to `highlights` (cleared first) for the specular
    /// pass.
    pub fn shade(
        &self,
        triangle: &Triangle,
        lights: &[LightHandle],
        triangles: &[Triangle],
        highlights: &mut Vec<HighlightLight>,
    ) -> Shading {
        highlights.clear();
        let normal = &triangle.normal;
        let centroid = &triangle.centroid;

        let mut multiplier = self.directional.multiplier(normal);
        if self.directional.diffuse(normal) > 0.0 {
            highlights.push(HighlightLight {
                to_light: self.directional.to_light(),
                color: self.directional.color,
                intensity: self.directional.intensity,
                position: None,
            });
        }

        if self.dynamic_lighting {
            for light in lights {
                if !light.is_triangle_lit(centroid, normal, triangles) {
                    continue;
                }
                let contribution = light.light_contribution(centroid, normal);
                for (m, add) in multiplier.iter_mut().zip(contribution.multiplier()) {
                    *m += add;
                }
                if let Some(to_light) = (light.position() - centroid).try_normalize(1e-9) {
                    highlights.push(HighlightLight {
                        to_light,
                        color: light.color(),
                        intensity: contribution.intensity,
                        position: Some(light.position()),
                    });
                }
            }
        }

        let material = &triangle.material;
        let emissive = if material.is_emissive() {
            let scale = material.emissive_intensity * self.emissive_multiplier;
            material.emissive.to_rgb_f32().map(|c| c * scale)
        } else {
            [0.0; 3]
        };

        Shading {
            multiplier,
            emissive,
            fog_factor: self.fog.factor(triangle.average_depth),
            fog_color: self.fog.color,
        }
    }
}
