//! # Camera State
//!
//! Pure camera data for the software rasterizer plus the render targets the
//! camera owns.
//!
//! ## Coordinate System
//! World space is Z-up. The camera looks along its local +X axis:
//! - X+ = Forward (depth)
//! - Y+ = Screen right
//! - Z+ = Screen up
//!
//! Rotation is stored in degrees as `(roll, pitch, yaw)` in the `x`, `y` and
//! `z` components. Positive yaw turns toward +Y, positive pitch looks up.
//!
//! The camera does no math of its own; [`super::projection::View`] derives the
//! per-frame transform from it.

use crate::foundation::math::Vec3;

use super::error::{RenderError, RenderResult};
use super::framebuffer::{DepthBuffer, FrameBuffer};

/// Smallest accepted field of view in degrees
pub const MIN_FIELD_OF_VIEW: f32 = 1.0;
/// Largest accepted field of view in degrees
pub const MAX_FIELD_OF_VIEW: f32 = 179.0;

/// Perspective camera owning its colour and depth targets
///
/// Position and rotation are free to change between frames. Projection
/// parameters go through validating setters so that `0 < near < far`, a
/// field of view in `[1, 179]` and a non-empty viewport always hold.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,

    /// Rotation in degrees: `x` = roll, `y` = pitch, `z` = yaw
    pub rotation: Vec3,

    /// Whether faces pointing away from the camera are discarded
    pub backface_culling: bool,

    field_of_view: f32,
    near_plane: f32,
    far_plane: f32,
    frame: FrameBuffer,
    depth: DepthBuffer,
}

impl Camera {
    /// Create a new perspective camera with validated projection parameters
    ///
    /// # Arguments
    /// * `width`, `height` - Viewport size in pixels (both non-zero)
    /// * `fov_degrees` - Vertical field of view in degrees
    /// * `near`, `far` - Clip distances, `0 < near < far`
    ///
    /// # Example
    /// ```rust
    /// use raster_engine::render::Camera;
    ///
    /// let camera = Camera::new(320, 240, 60.0, 0.1, 500.0).unwrap();
    /// assert_eq!(camera.frame().width(), 320);
    /// ```
    pub fn new(width: usize, height: usize, fov_degrees: f32, near: f32, far: f32) -> RenderResult<Self> {
        validate_viewport(width, height)?;
        validate_field_of_view(fov_degrees)?;
        validate_clip_planes(near, far)?;

        Ok(Self {
            position: Vec3::zeros(),
            rotation: Vec3::zeros(),
            backface_culling: true,
            field_of_view: fov_degrees,
            near_plane: near,
            far_plane: far,
            frame: FrameBuffer::new(width, height),
            depth: DepthBuffer::new(width, height),
        })
    }

    /// Builder-style position setter
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Builder-style rotation setter (degrees: roll, pitch, yaw)
    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    /// Field of view in degrees
    pub fn field_of_view(&self) -> f32 {
        self.field_of_view
    }

    /// Near clip distance
    pub fn near_plane(&self) -> f32 {
        self.near_plane
    }

    /// Far clip distance
    pub fn far_plane(&self) -> f32 {
        self.far_plane
    }

    /// Viewport width in pixels
    pub fn width(&self) -> usize {
        self.frame.width()
    }

    /// Viewport height in pixels
    pub fn height(&self) -> usize {
        self.frame.height()
    }

    /// Viewport aspect ratio (width / height)
    pub fn aspect(&self) -> f32 {
        self.width() as f32 / self.height() as f32
    }

    /// Yaw in degrees
    pub fn yaw(&self) -> f32 {
        self.rotation.z
    }

    /// Pitch in degrees
    pub fn pitch(&self) -> f32 {
        self.rotation.y
    }

    /// Roll in degrees
    pub fn roll(&self) -> f32 {
        self.rotation.x
    }

    /// Update the field of view
    pub fn set_field_of_view(&mut self, fov_degrees: f32) -> RenderResult<()> {
        validate_field_of_view(fov_degrees)?;
        self.field_of_view = fov_degrees;
        log::trace!("Camera field of view updated to {fov_degrees}");
        Ok(())
    }

    /// Update both clip planes at once
    pub fn set_clip_planes(&mut self, near: f32, far: f32) -> RenderResult<()> {
        validate_clip_planes(near, far)?;
        self.near_plane = near;
        self.far_plane = far;
        log::trace!("Camera clip planes updated to {near}..{far}");
        Ok(())
    }

    /// Resize the viewport; both render targets lose their contents
    pub fn set_viewport(&mut self, width: usize, height: usize) -> RenderResult<()> {
        validate_viewport(width, height)?;
        if width != self.width() || height != self.height() {
            log::info!(
                "Camera viewport resized: {}x{} -> {}x{}",
                self.width(),
                self.height(),
                width,
                height
            );
            self.frame.resize(width, height);
            self.depth.resize(width, height);
        }
        Ok(())
    }

    /// Last rendered colour buffer
    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    /// Last rendered depth buffer
    pub fn depth(&self) -> &DepthBuffer {
        &self.depth
    }

    /// Mutable access to both targets for the frame orchestrator
    pub(crate) fn targets_mut(&mut self) -> (&mut FrameBuffer, &mut DepthBuffer) {
        (&mut self.frame, &mut self.depth)
    }
}

fn validate_viewport(width: usize, height: usize) -> RenderResult<()> {
    if width == 0 || height == 0 {
        return Err(RenderError::InvalidViewport { width, height });
    }
    Ok(())
}

fn validate_field_of_view(fov_degrees: f32) -> RenderResult<()> {
    if !(MIN_FIELD_OF_VIEW..=MAX_FIELD_OF_VIEW).contains(&fov_degrees) {
        return Err(RenderError::InvalidFieldOfView(fov_degrees));
    }
    Ok(())
}

fn validate_clip_planes(near: f32, far: f32) -> RenderResult<()> {
    // Written so that NaN fails the check
    if !(near > 0.0 && far > near && far.is_finite()) {
        return Err(RenderError::InvalidClipPlanes { near, far });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructor_rejects_invalid_parameters() {
        assert!(matches!(Camera::new(0, 10, 60.0, 0.1, 10.0), Err(RenderError::InvalidViewport { .. })));
        assert!(matches!(Camera::new(10, 10, 0.5, 0.1, 10.0), Err(RenderError::InvalidFieldOfView(_))));
        assert!(matches!(Camera::new(10, 10, 180.0, 0.1, 10.0), Err(RenderError::InvalidFieldOfView(_))));
        assert!(matches!(Camera::new(10, 10, 60.0, 10.0, 10.0), Err(RenderError::InvalidClipPlanes { .. })));
        assert!(matches!(Camera::new(10, 10, 60.0, -1.0, 10.0), Err(RenderError::InvalidClipPlanes { .. })));
        assert!(matches!(Camera::new(10, 10, 60.0, f32::NAN, 10.0), Err(RenderError::InvalidClipPlanes { .. })));
    }

    #[test]
    fn test_setters_keep_previous_state_on_error() {
        let mut camera = Camera::new(16, 9, 70.0, 0.5, 100.0).unwrap();
        assert!(camera.set_clip_planes(50.0, 20.0).is_err());
        assert_eq!(camera.near_plane(), 0.5);
        assert_eq!(camera.far_plane(), 100.0);
        assert!(camera.set_viewport(0, 9).is_err());
        assert_eq!(camera.width(), 16);
    }

    #[test]
    fn test_viewport_resize_reallocates_targets() {
        let mut camera = Camera::new(4, 4, 60.0, 0.1, 10.0).unwrap();
        camera.set_viewport(8, 2).unwrap();
        assert_eq!(camera.frame().pixels().len(), 16);
        assert_eq!(camera.depth().values().len(), 16);
        assert!((camera.aspect() - 4.0).abs() < f32::EPSILON);
    }
}
