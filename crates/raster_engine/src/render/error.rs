//! Errors raised while configuring the renderer
//!
//! The per-frame path never fails; these errors only surface from
//! constructors, setters and configuration/texture loading.

use thiserror::Error;

use crate::config::ConfigError;

/// Renderer-level errors
#[derive(Error, Debug)]
pub enum RenderError {
    /// Viewport width or height of zero
    #[error("Invalid viewport {width}x{height}: both dimensions must be non-zero")]
    InvalidViewport {
        /// Requested width in pixels
        width: usize,
        /// Requested height in pixels
        height: usize,
    },

    /// Near/far planes violate `0 < near < far`
    #[error("Invalid clip planes: near {near} must be positive and smaller than far {far}")]
    InvalidClipPlanes {
        /// Requested near plane distance
        near: f32,
        /// Requested far plane distance
        far: f32,
    },

    /// Field of view outside of `[1, 179]` degrees
    #[error("Invalid field of view {0} degrees: expected 1 to 179")]
    InvalidFieldOfView(f32),

    /// Texture decoding or IO failure
    #[error("Texture error: {0}")]
    Texture(#[from] image::ImageError),

    /// Texture data does not match its declared dimensions
    #[error("Texture data has {actual} bytes, expected {expected}")]
    TextureSize {
        /// Byte count implied by the dimensions
        expected: usize,
        /// Byte count actually supplied
        actual: usize,
    },

    /// Mesh references vertices or materials it does not have
    #[error("Invalid mesh: {0}")]
    InvalidMesh(String),

    /// Configuration rejected or unreadable
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Convenience alias for renderer results
pub type RenderResult<T> = Result<T, RenderError>;
