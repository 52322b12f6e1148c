//! CPU-resident textures sampled by the textured fill path

use std::path::Path;

use crate::foundation::math::Vec2;

use super::color::Color;
use super::error::{RenderError, RenderResult};

/// RGBA texture kept in system memory
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    width: usize,
    height: usize,
    texels: Vec<Color>,
}

impl Texture {
    /// Build a texture from tightly packed `RGBA8` bytes
    pub fn from_rgba8(width: usize, height: usize, bytes: &[u8]) -> RenderResult<Self> {
        let expected = width * height * 4;
        if width == 0 || height == 0 || bytes.len() != expected {
            return Err(RenderError::TextureSize { expected, actual: bytes.len() });
        }
        let texels = bytes
            .chunks_exact(4)
            .map(|px| Color::rgba(px[0], px[1], px[2], px[3]))
            .collect();
        Ok(Self { width, height, texels })
    }

    /// Decode an image file (any format enabled in the `image` crate)
    pub fn load(path: impl AsRef<Path>) -> RenderResult<Self> {
        let path = path.as_ref();
        let image = image::open(path)?.to_rgba8();
        let (width, height) = image.dimensions();
        log::info!("Loaded texture {} ({}x{})", path.display(), width, height);
        Self::from_rgba8(width as usize, height as usize, image.as_raw())
    }

    /// Procedural checkerboard, handy for demos and tests
    pub fn checkerboard(size: usize, cells: usize, a: Color, b: Color) -> Self {
        let size = size.max(1);
        let cell = (size / cells.max(1)).max(1);
        let texels = (0..size * size)
            .map(|i| {
                let (x, y) = (i % size, i / size);
                if (x / cell + y / cell) % 2 == 0 { a } else { b }
            })
            .collect();
        Self { width: size, height: size, texels }
    }

    /// Width in texels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in texels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Nearest-neighbour sample with repeat wrapping
    pub fn sample(&self, uv: &Vec2) -> Color {
        let u = uv.x - uv.x.floor();
        let v = uv.y - uv.y.floor();
        let x = ((u * self.width as f32) as usize).min(self.width - 1);
        let y = ((v * self.height as f32) as usize).min(self.height - 1);
        self.texels[y * self.width + x]
    }
}
