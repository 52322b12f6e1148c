//! # Culler
//!
//! Camera-space backface determination. The camera always sits at the
//! camera-space origin, so the view direction is simply the negated centroid.

use crate::foundation::math::Vec3;

/// Faces are culled when `normal · view` drops below this value
///
/// Slightly negative so that faces seen almost edge-on do not flicker in and
/// out between frames.
pub const BACKFACE_THRESHOLD: f32 = -0.05;

/// Normals shorter than this are treated as degenerate
const MIN_NORMAL_LENGTH: f32 = 1e-8;

/// Outcome of a backface test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CullResult {
    /// The face points toward the camera
    Visible,
    /// The face points away from the camera
    BackFacing,
    /// The face has (near) zero area
    Degenerate,
}

impl CullResult {
    /// Whether the face should be skipped
    pub fn is_culled(self) -> bool {
        self != Self::Visible
    }
}

/// Classify a camera-space triangle
///
/// Front faces are wound so that `(v1 - v0) × (v2 - v0)` points toward the
/// viewer. Degenerate faces are reported as such even when culling is off.
pub fn classify(v0: &Vec3, v1: &Vec3, v2: &Vec3, culling_enabled: bool) -> CullResult {
    let normal = (v1 - v0).cross(&(v2 - v0));
    let length = normal.norm();
    if length < MIN_NORMAL_LENGTH || !length.is_finite() {
        return CullResult::Degenerate;
    }
    if !culling_enabled {
        return CullResult::Visible;
    }

    let centroid = (v0 + v1 + v2) / 3.0;
    let to_camera = -centroid;
    let distance = to_camera.norm();
    if distance < MIN_NORMAL_LENGTH {
        // The camera sits on the face; keep it rather than guessing
        return CullResult::Visible;
    }

    if (normal / length).dot(&(to_camera / distance)) < BACKFACE_THRESHOLD {
        CullResult::BackFacing
    } else {
        CullResult::Visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Triangle in the plane depth = 5, wound toward the camera
    fn facing() -> [Vec3; 3] {
        [Vec3::new(5.0, 0.0, 0.0), Vec3::new(5.0, 0.0, 1.0), Vec3::new(5.0, 1.0, 0.0)]
    }

    #[test]
    fn test_front_face_is_visible() {
        let [a, b, c] = facing();
        assert_eq!(classify(&a, &b, &c, true), CullResult::Visible);
    }

    #[test]
    fn test_reversed_winding_is_culled_only_when_enabled() {
        let [a, b, c] = facing();
        assert_eq!(classify(&a, &c, &b, true), CullResult::BackFacing);
        assert_eq!(classify(&a, &c, &b, false), CullResult::Visible);
    }

    #[test]
    fn test_edge_on_faces_survive_threshold() {
        // Normal is perpendicular to the view direction
        let a = Vec3::new(4.0, -1.0, 0.0);
        let b = Vec3::new(6.0, -1.0, 0.0);
        let c = Vec3::new(5.0, 1.0, 0.0);
        assert!(!classify(&a, &b, &c, true).is_culled());
        assert!(!classify(&a, &c, &b, true).is_culled());
    }

    #[test]
    fn test_degenerate_face() {
        let a = Vec3::new(5.0, 0.0, 0.0);
        let b = Vec3::new(6.0, 0.0, 0.0);
        assert_eq!(classify(&a, &b, &b, false), CullResult::Degenerate);
    }
}
