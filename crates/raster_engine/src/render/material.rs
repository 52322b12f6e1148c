//! Surface materials consumed by the lighting engine and rasterizer
//!
//! Materials are owned by meshes and shared with per-frame triangles through
//! `Arc`; the renderer never mutates them.

use std::sync::Arc;

use super::color::Color;
use super::texture::Texture;

/// State of a material's texture
#[derive(Debug, Clone)]
pub enum TextureSlot {
    /// Texture is resident and can be sampled
    Ready(Arc<Texture>),
    /// Texture is still streaming in; faces using it are skipped this frame
    Pending,
}

/// Surface description for a face
#[derive(Debug, Clone)]
pub struct Material {
    /// Optional name for debugging
    pub name: Option<String>,
    /// Base colour, also the fallback when no texture is resident
    pub diffuse: Color,
    /// Optional diffuse texture
    pub texture: Option<TextureSlot>,
    /// Highlight tint
    pub specular: Color,
    /// Phong exponent; larger values give tighter highlights
    pub shininess: f32,
    /// Self-illumination colour
    pub emissive: Color,
    /// Self-illumination strength, 0 disables the emissive term
    pub emissive_intensity: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: None,
            diffuse: Color::rgb(200, 200, 200),
            texture: None,
            specular: Color::WHITE,
            shininess: 32.0,
            emissive: Color::BLACK,
            emissive_intensity: 0.0,
        }
    }
}

impl Material {
    /// Flat-coloured material with default specular response
    pub fn new(diffuse: Color) -> Self {
        Self { diffuse, ..Default::default() }
    }

    /// Set the material name for debugging
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Attach a resident texture
    pub fn with_texture(mut self, texture: Arc<Texture>) -> Self {
        self.texture = Some(TextureSlot::Ready(texture));
        self
    }

    /// Mark the texture as still loading
    pub fn with_pending_texture(mut self) -> Self {
        self.texture = Some(TextureSlot::Pending);
        self
    }

    /// Configure the specular response
    pub fn with_specular(mut self, specular: Color, shininess: f32) -> Self {
        self.specular = specular;
        self.shininess = shininess.max(1.0);
        self
    }

    /// Configure self-illumination
    pub fn with_emissive(mut self, emissive: Color, intensity: f32) -> Self {
        self.emissive = emissive;
        self.emissive_intensity = intensity.max(0.0);
        self
    }

    /// Whether any part of this material emits light
    pub fn is_emissive(&self) -> bool {
        self.emissive_intensity > 0.0 && self.emissive != Color::BLACK
    }

    /// Resident texture, if any
    pub fn ready_texture(&self) -> Option<&Arc<Texture>> {
        match &self.texture {
            Some(TextureSlot::Ready(texture)) => Some(texture),
            _ => None,
        }
    }

    /// Whether the texture exists but is not yet resident
    pub fn is_texture_pending(&self) -> bool {
        matches!(self.texture, Some(TextureSlot::Pending))
    }
}
