//! # Software Rendering Pipeline
//!
//! CPU-only rendering of triangulated meshes into an owned pixel buffer.
//!
//! ## Pipeline
//! 1. [`projection`]: world → camera space, perspective projection
//! 2. [`culler`] and [`clipper`]: backface rejection and near-plane clipping
//! 3. [`rasterizer`]: edge-function fill with a per-pixel depth test
//! 4. [`lighting`]: directional, point, emissive, fog and specular terms
//! 5. [`background`]: sky, hills, clouds, water, sun and lens flare
//! 6. [`renderer`]: the per-frame stage machine tying it together
//!
//! ## Usage
//! ```rust
//! use std::sync::Arc;
//! use raster_engine::render::{Camera, Material, Mesh, RenderConfig, Renderer, Scene, SceneObject};
//! use raster_engine::foundation::math::{Transform, Vec3};
//!
//! let mut camera = Camera::new(64, 48, 60.0, 0.1, 500.0).unwrap();
//! let mut renderer = Renderer::new(RenderConfig::default()).unwrap();
//!
//! let mut scene = Scene::new();
//! let cube = Mesh::cube(2.0, Arc::new(Material::default()));
//! scene.insert(
//!     SceneObject::new("cube")
//!         .with_transform(Transform::from_position(Vec3::new(6.0, 0.0, 0.0)))
//!         .with_mesh(Arc::new(cube)),
//! );
//!
//! let stats = renderer.render_frame(&mut camera, &scene, 0.0);
//! assert_eq!(stats.objects, 1);
//! assert_eq!(camera.frame().as_bytes().len(), 64 * 48 * 4);
//! ```

pub mod background;
pub mod cache;
pub mod camera;
pub mod clipper;
pub mod color;
pub mod config;
pub mod culler;
pub mod error;
pub mod framebuffer;
pub mod lighting;
pub mod material;
pub mod mesh;
pub mod overlay;
pub mod projection;
pub mod rasterizer;
pub mod renderer;
pub mod scene;
pub mod stats;
pub mod texture;
pub mod triangle;

#[cfg(test)]
mod tests;

pub use camera::Camera;
pub use color::Color;
pub use config::{BackgroundMode, RenderConfig};
pub use error::{RenderError, RenderResult};
pub use framebuffer::{DepthBuffer, FrameBuffer};
pub use lighting::{LightContribution, LightSource, PointLight};
pub use material::{Material, TextureSlot};
pub use mesh::{Face, Mesh, MeshSource};
pub use projection::View;
pub use renderer::{FrameStage, Renderer};
pub use scene::{Scene, SceneObject};
pub use stats::FrameStats;
pub use texture::Texture;
pub use triangle::Triangle;
