//! # Raster Engine
//!
//! A software 3D rasterizer that renders triangulated meshes into an owned
//! RGBA pixel buffer without any GPU API.
//!
//! ## Features
//!
//! - **Projection & Clipping**: Z-up world, near-plane Sutherland–Hodgman clipping
//! - **Rasterization**: Edge-function fill with a per-pixel depth buffer
//! - **Lighting**: Directional, point (with occlusion), emissive, fog, Phong highlights
//! - **Atmosphere**: Sky gradient, seeded hills, FBM clouds, animated water, sun and lens flare
//! - **Configuration**: Serde-backed settings loadable from TOML or RON
//!
//! ## Quick Start
//!
//! ```rust
//! use raster_engine::prelude::*;
//!
//! let mut camera = Camera::new(160, 120, 60.0, 0.1, 500.0).unwrap();
//! let mut renderer = Renderer::new(RenderConfig::default()).unwrap();
//! let scene = Scene::new();
//!
//! let stats = renderer.render_frame(&mut camera, &scene, 0.0);
//! assert_eq!(stats.triangles, 0);
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod foundation;
pub mod render;

/// Common imports for renderer users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError},
        foundation::{
            math::{Transform, Vec2, Vec3},
            time::Stopwatch,
        },
        render::{
            BackgroundMode, Camera, Color, FrameStats, Material, Mesh, MeshSource, PointLight, RenderConfig,
            RenderError, Renderer, Scene, SceneObject, Texture,
        },
    };
}
