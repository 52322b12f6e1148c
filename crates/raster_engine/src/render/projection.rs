//! # Transform & Projection
//!
//! World to camera space conversion and perspective projection.
//!
//! A [`View`] is derived from the [`Camera`] once per frame so that the
//! trigonometry for yaw/pitch/roll and the focal length are computed once and
//! reused for every vertex.
//!
//! ## Conventions
//! - World → camera: subtract the camera position, then apply inverse yaw
//!   (about Z), inverse pitch (about Y) and inverse roll (about X), in that order.
//! - Camera-space X is forward depth; the camera sits at the origin.
//! - `f = 1 / tan(fov / 2)`, `ndc_x = (y / d) * (f / aspect)`, `ndc_y = (z / d) * f`.
//! - Screen origin is top-left, so NDC Y is flipped during viewport mapping.

use crate::foundation::math::{utils, Vec2, Vec3};

use super::camera::Camera;

/// Depths at or below this are treated as behind the camera
pub const DEPTH_EPSILON: f32 = 1e-4;

/// Per-frame snapshot of the camera transform and projection
#[derive(Debug, Clone, Copy)]
pub struct View {
    position: Vec3,
    yaw: (f32, f32),
    pitch: (f32, f32),
    roll: (f32, f32),
    focal_length: f32,
    aspect: f32,
    near: f32,
    far: f32,
    width: f32,
    height: f32,
    fov_degrees: f32,
    backface_culling: bool,
}

impl View {
    /// Snapshot the camera's current state
    pub fn new(camera: &Camera) -> Self {
        let fov = utils::deg_to_rad(camera.field_of_view());
        Self {
            position: camera.position,
            yaw: utils::deg_to_rad(camera.yaw()).sin_cos(),
            pitch: utils::deg_to_rad(camera.pitch()).sin_cos(),
            roll: utils::deg_to_rad(camera.roll()).sin_cos(),
            focal_length: 1.0 / (fov * 0.5).tan(),
            aspect: camera.aspect(),
            near: camera.near_plane(),
            far: camera.far_plane(),
            width: camera.width() as f32,
            height: camera.height() as f32,
            fov_degrees: camera.field_of_view(),
            backface_culling: camera.backface_culling,
        }
    }

    /// Camera position in world space
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// `1 / tan(fov / 2)`
    pub fn focal_length(&self) -> f32 {
        self.focal_length
    }

    /// Viewport aspect ratio
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Near clip distance
    pub fn near(&self) -> f32 {
        self.near
    }

    /// Far clip distance
    pub fn far(&self) -> f32 {
        self.far
    }

    /// Viewport width in pixels
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Viewport height in pixels
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Field of view in degrees
    pub fn fov_degrees(&self) -> f32 {
        self.fov_degrees
    }

    /// Whether backface culling is enabled for this frame
    pub fn backface_culling(&self) -> bool {
        self.backface_culling
    }

    /// Pitch as `(sin, cos)`
    pub fn pitch_sin_cos(&self) -> (f32, f32) {
        self.pitch
    }

    /// Yaw in degrees, wrapped to `(-180, 180]`
    pub fn yaw_degrees(&self) -> f32 {
        utils::rad_to_deg(self.yaw.0.atan2(self.yaw.1))
    }

    /// Copy of this view with roll removed
    ///
    /// The background is laid out from pitch and yaw only, so sky, sun, hills
    /// and clouds all use this view.
    pub fn without_roll(&self) -> Self {
        Self { roll: (0.0, 1.0), ..*self }
    }

    /// Transform a world-space point into camera space
    pub fn to_camera(&self, world: &Vec3) -> Vec3 {
        self.rotate_to_camera(&(world - self.position))
    }

    /// Rotate a world-space direction into camera space (no translation)
    pub fn rotate_to_camera(&self, v: &Vec3) -> Vec3 {
        let (sy, cy) = self.yaw;
        let (sp, cp) = self.pitch;
        let (sr, cr) = self.roll;

        // Inverse yaw about Z
        let x1 = v.x * cy + v.y * sy;
        let y1 = -v.x * sy + v.y * cy;
        let z1 = v.z;

        // Inverse pitch about Y
        let x2 = x1 * cp + z1 * sp;
        let z2 = -x1 * sp + z1 * cp;

        // Inverse roll about X
        let y3 = y1 * cr + z2 * sr;
        let z3 = -y1 * sr + z2 * cr;

        Vec3::new(x2, y3, z3)
    }

    /// Rotate a camera-space direction back into world space
    pub fn rotate_to_world(&self, v: &Vec3) -> Vec3 {
        let (sy, cy) = self.yaw;
        let (sp, cp) = self.pitch;
        let (sr, cr) = self.roll;

        let y2 = v.y * cr - v.z * sr;
        let z2 = v.y * sr + v.z * cr;

        let x1 = v.x * cp - z2 * sp;
        let z1 = v.x * sp + z2 * cp;

        Vec3::new(x1 * cy - y2 * sy, x1 * sy + y2 * cy, z1)
    }

    /// Project a single camera-space point, rejecting anything outside `[near, far]`
    pub fn project(&self, camera_space: &Vec3) -> Option<Vec2> {
        let depth = camera_space.x;
        if depth <= DEPTH_EPSILON || depth < self.near || depth > self.far {
            return None;
        }
        Some(self.map_to_screen(camera_space))
    }

    /// Project a vertex that has already been near-clipped
    ///
    /// Only points behind the camera are rejected; the far plane is handled by
    /// per-object culling instead of per-vertex rejection.
    pub fn project_clipped(&self, camera_space: &Vec3) -> Option<Vec2> {
        if camera_space.x <= DEPTH_EPSILON {
            return None;
        }
        Some(self.map_to_screen(camera_space))
    }

    fn map_to_screen(&self, p: &Vec3) -> Vec2 {
        let ndc_x = (p.y / p.x) * (self.focal_length / self.aspect);
        let ndc_y = (p.z / p.x) * self.focal_length;
        Vec2::new(
            (ndc_x + 1.0) * 0.5 * self.width,
            (1.0 - ndc_y) * 0.5 * self.height,
        )
    }

    /// Recover the camera-space point at `depth` under a screen position
    pub fn unproject(&self, screen: &Vec2, depth: f32) -> Vec3 {
        let ndc_x = screen.x / self.width * 2.0 - 1.0;
        let ndc_y = 1.0 - screen.y / self.height * 2.0;
        Vec3::new(
            depth,
            ndc_x * depth * self.aspect / self.focal_length,
            ndc_y * depth / self.focal_length,
        )
    }

    /// Conservative bounding-sphere test against all six frustum planes
    pub fn sphere_in_frustum(&self, center: &Vec3, radius: f32) -> bool {
        if center.x + radius < self.near || center.x - radius > self.far {
            return false;
        }

        let tan_h = self.aspect / self.focal_length;
        let tan_v = 1.0 / self.focal_length;
        let norm_h = (1.0 + tan_h * tan_h).sqrt();
        let norm_v = (1.0 + tan_v * tan_v).sqrt();

        let right = (-tan_h * center.x + center.y) / norm_h;
        let left = (-tan_h * center.x - center.y) / norm_h;
        let top = (-tan_v * center.x + center.z) / norm_v;
        let bottom = (-tan_v * center.x - center.z) / norm_v;

        right <= radius && left <= radius && top <= radius && bottom <= radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn view_with(rotation: Vec3) -> View {
        let camera = Camera::new(320, 200, 60.0, 0.5, 200.0)
            .unwrap()
            .with_position(Vec3::new(1.0, -2.0, 3.0))
            .with_rotation(rotation);
        View::new(&camera)
    }

    #[test]
    fn test_point_straight_ahead_projects_to_center() {
        let view = view_with(Vec3::zeros());
        let cam = view.to_camera(&Vec3::new(11.0, -2.0, 3.0));
        assert_relative_eq!(cam, Vec3::new(10.0, 0.0, 0.0), epsilon = 1e-5);
        let screen = view.project(&cam).unwrap();
        assert_relative_eq!(screen, Vec2::new(160.0, 100.0), epsilon = 1e-4);
    }

    #[test]
    fn test_axis_orientation() {
        let view = view_with(Vec3::zeros());
        // +Y is screen right, +Z is screen up (smaller y pixel)
        let right = view.project(&Vec3::new(10.0, 1.0, 0.0)).unwrap();
        let up = view.project(&Vec3::new(10.0, 0.0, 1.0)).unwrap();
        assert!(right.x > 160.0);
        assert!(up.y < 100.0);
    }

    #[test]
    fn test_yaw_and_pitch_conventions() {
        let yawed = view_with(Vec3::new(0.0, 0.0, 90.0));
        // Yaw 90 looks along world +Y
        let ahead = yawed.to_camera(&Vec3::new(1.0, 8.0, 3.0));
        assert_relative_eq!(ahead, Vec3::new(10.0, 0.0, 0.0), epsilon = 1e-4);

        let pitched = view_with(Vec3::new(0.0, 90.0, 0.0));
        // Pitch 90 looks straight up
        let above = pitched.to_camera(&Vec3::new(1.0, -2.0, 13.0));
        assert_relative_eq!(above, Vec3::new(10.0, 0.0, 0.0), epsilon = 1e-4);
    }

    #[test]
    fn test_rotate_round_trip() {
        let view = view_with(Vec3::new(15.0, -30.0, 123.0));
        let dir = Vec3::new(0.3, -0.7, 0.2);
        let back = view.rotate_to_world(&view.rotate_to_camera(&dir));
        assert_relative_eq!(back, dir, epsilon = 1e-5);
    }

    #[test]
    fn test_projection_rejects_out_of_range_depths() {
        let view = view_with(Vec3::zeros());
        assert!(view.project(&Vec3::new(-1.0, 0.0, 0.0)).is_none());
        assert!(view.project(&Vec3::new(0.0, 0.0, 0.0)).is_none());
        assert!(view.project(&Vec3::new(0.25, 0.0, 0.0)).is_none());
        assert!(view.project(&Vec3::new(250.0, 0.0, 0.0)).is_none());
        assert!(view.project_clipped(&Vec3::new(0.25, 0.0, 0.0)).is_some());
    }

    #[test]
    fn test_in_frustum_points_land_inside_viewport() {
        let view = view_with(Vec3::new(5.0, 10.0, -40.0));
        let f = view.focal_length();
        let aspect = view.aspect();
        for i in 0..200 {
            let t = i as f32 / 200.0;
            let depth = 0.6 + t * 199.0;
            // Sweep across the whole cone, staying strictly inside it
            let sx = ((t * 37.0).sin()) * 0.99;
            let sy = ((t * 53.0).cos()) * 0.99;
            let cam = Vec3::new(depth, sx * depth * aspect / f, sy * depth / f);
            let screen = view.project(&cam).expect("inside frustum");
            assert!(screen.x >= 0.0 && screen.x <= view.width());
            assert!(screen.y >= 0.0 && screen.y <= view.height());
            assert_relative_eq!(view.unproject(&screen, depth), cam, epsilon = 1e-2);
        }
    }

    #[test]
    fn test_sphere_frustum_culling() {
        let view = view_with(Vec3::zeros());
        assert!(view.sphere_in_frustum(&Vec3::new(20.0, 0.0, 0.0), 1.0));
        assert!(!view.sphere_in_frustum(&Vec3::new(-5.0, 0.0, 0.0), 1.0));
        assert!(!view.sphere_in_frustum(&Vec3::new(300.0, 0.0, 0.0), 1.0));
        assert!(!view.sphere_in_frustum(&Vec3::new(10.0, 100.0, 0.0), 1.0));
        // Straddling the side plane stays visible
        let edge = 10.0 * view.aspect() / view.focal_length();
        assert!(view.sphere_in_frustum(&Vec3::new(10.0, edge + 0.5, 0.0), 1.0));
    }
}
