//! # Clipper
//!
//! Sutherland–Hodgman clipping of a camera-space polygon against the near
//! plane only. Side, top/bottom and far planes are left to object culling and
//! the bounds-checked rasterizer.

use crate::foundation::math::{Vec2, Vec3};

/// Tolerance applied to the near plane inside test
pub const CLIP_EPSILON: f32 = 1e-5;

/// Polygon vertex carried through clipping
///
/// World position and UV are interpolated with the same parameter as the
/// camera-space position so that lighting and texturing stay consistent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipVertex {
    /// Camera-space position (x = depth)
    pub camera: Vec3,
    /// World-space position
    pub world: Vec3,
    /// Texture coordinate
    pub uv: Vec2,
}

impl ClipVertex {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            camera: self.camera.lerp(&other.camera, t),
            world: self.world.lerp(&other.world, t),
            uv: self.uv.lerp(&other.uv, t),
        }
    }
}

/// Clip a convex vertex loop against the plane `depth = near`
///
/// Returns the clipped loop in the original winding. The result may be empty
/// (fully behind the plane) or contain one extra vertex per crossing edge.
pub fn clip_near(polygon: &[ClipVertex], near: f32) -> Vec<ClipVertex> {
    let mut output = Vec::with_capacity(polygon.len() + 2);
    if polygon.is_empty() {
        return output;
    }

    let inside = |v: &ClipVertex| v.camera.x >= near - CLIP_EPSILON;

    for (i, b) in polygon.iter().enumerate() {
        let a = &polygon[(i + polygon.len() - 1) % polygon.len()];
        match (inside(a), inside(b)) {
            (true, true) => output.push(*b),
            (false, true) => {
                output.push(intersect(a, b, near));
                output.push(*b);
            }
            (true, false) => output.push(intersect(a, b, near)),
            (false, false) => {}
        }
    }

    output
}

fn intersect(a: &ClipVertex, b: &ClipVertex, near: f32) -> ClipVertex {
    let denom = b.camera.x - a.camera.x;
    let t = if denom.abs() > f32::EPSILON {
        ((near - a.camera.x) / denom).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let mut v = a.lerp(b, t);
    // Pin exactly onto the plane to absorb interpolation error
    v.camera.x = v.camera.x.max(near);
    v
}

/// Fan-triangulate a clipped loop from vertex 0
///
/// Loops with fewer than three vertices yield nothing.
pub fn fan_triangulate(polygon: &[ClipVertex]) -> impl Iterator<Item = [ClipVertex; 3]> + '_ {
    (1..polygon.len().saturating_sub(1)).map(move |i| [polygon[0], polygon[i], polygon[i + 1]])
}
