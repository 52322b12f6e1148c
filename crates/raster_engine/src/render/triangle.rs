//! Per-frame triangle value
//!
//! A [`Triangle`] is only constructed once clipping, projection and normal
//! computation have all succeeded, so every field is always populated.

use std::sync::Arc;

use crate::foundation::math::{Vec2, Vec3};

use super::clipper::ClipVertex;
use super::material::Material;
use super::projection::View;

/// Fully transformed triangle corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleVertex {
    /// World-space position
    pub world: Vec3,
    /// Camera-space position
    pub camera: Vec3,
    /// Screen-space position in pixels
    pub screen: Vec2,
    /// Camera-space forward distance
    pub depth: f32,
    /// Texture coordinate
    pub uv: Vec2,
}

/// Transient triangle built from mesh data each frame
#[derive(Debug, Clone)]
pub struct Triangle {
    /// Corners in the face's winding order
    pub vertices: [TriangleVertex; 3],
    /// Unit world-space face normal
    pub normal: Vec3,
    /// World-space centroid
    pub centroid: Vec3,
    /// Mean camera-space depth of the corners, used for painter's sorting
    pub average_depth: f32,
    /// Surface material
    pub material: Arc<Material>,
    /// Index of the owning object in the frame's object list
    pub object: usize,
}

impl Triangle {
    /// Build a triangle from three clipped corners
    ///
    /// Returns `None` when any corner cannot be projected or the world-space
    /// normal is degenerate.
    pub fn from_clipped(
        corners: &[ClipVertex; 3],
        view: &View,
        material: Arc<Material>,
        object: usize,
    ) -> Option<Self> {
        let mut vertices = [TriangleVertex {
            world: Vec3::zeros(),
            camera: Vec3::zeros(),
            screen: Vec2::zeros(),
            depth: 0.0,
            uv: Vec2::zeros(),
        }; 3];

        for (out, corner) in vertices.iter_mut().zip(corners) {
            let screen = view.project_clipped(&corner.camera)?;
            *out = TriangleVertex {
                world: corner.world,
                camera: corner.camera,
                screen,
                depth: corner.camera.x,
                uv: corner.uv,
            };
        }

        let [a, b, c] = &vertices;
        let normal = (b.world - a.world).cross(&(c.world - a.world)).try_normalize(1e-12)?;
        let centroid = (a.world + b.world + c.world) / 3.0;
        let average_depth = (a.depth + b.depth + c.depth) / 3.0;

        Some(Self { vertices, normal, centroid, average_depth, material, object })
    }

    /// Screen-space centroid
    pub fn screen_centroid(&self) -> Vec2 {
        let [a, b, c] = &self.vertices;
        (a.screen + b.screen + c.screen) / 3.0
    }

    /// Longest screen-space extent of the bounding box
    pub fn screen_extent(&self) -> f32 {
        let xs = self.vertices.iter().map(|v| v.screen.x);
        let ys = self.vertices.iter().map(|v| v.screen.y);
        let (min_x, max_x) = xs.fold((f32::MAX, f32::MIN), |(lo, hi), x| (lo.min(x), hi.max(x)));
        let (min_y, max_y) = ys.fold((f32::MAX, f32::MIN), |(lo, hi), y| (lo.min(y), hi.max(y)));
        (max_x - min_x).max(max_y - min_y)
    }

    /// Corner world positions
    pub fn world_positions(&self) -> [Vec3; 3] {
        [self.vertices[0].world, self.vertices[1].world, self.vertices[2].world]
    }
}

/// Möller–Trumbore ray/triangle intersection
///
/// Returns the ray parameter `t` of the hit, if any. `direction` need not be
/// normalised; `t` is expressed in multiples of it.
pub fn ray_intersects(origin: &Vec3, direction: &Vec3, corners: &[Vec3; 3]) -> Option<f32> {
    const EPSILON: f32 = 1e-7;
    let [v0, v1, v2] = corners;
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let p = direction.cross(&edge2);
    let det = edge1.dot(&p);
    if det.abs() < EPSILON {
        return None;
    }
    let inv_det = 1.0 / det;
    let s = origin - v0;
    let u = s.dot(&p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(&edge1);
    let v = direction.dot(&q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = edge2.dot(&q) * inv_det;
    (t > EPSILON).then_some(t)
}

/// Whether the segment `from → to` is blocked by any triangle in `triangles`
///
/// Hits within `margin` (as a fraction of the segment) of either end are
/// ignored so surfaces do not shadow themselves. `skip` excludes one triangle.
pub fn segment_blocked(from: &Vec3, to: &Vec3, triangles: &[Triangle], skip: Option<usize>, margin: f32) -> bool {
    let direction = to - from;
    triangles.iter().enumerate().any(|(i, tri)| {
        if Some(i) == skip {
            return false;
        }
        ray_intersects(from, &direction, &tri.world_positions())
            .is_some_and(|t| t > margin && t < 1.0 - margin)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Camera;

    fn corner(world: Vec3, camera: Vec3) -> ClipVertex {
        ClipVertex { camera, world, uv: Vec2::zeros() }
    }

    #[test]
    fn test_from_clipped_populates_every_field() {
        let camera = Camera::new(100, 100, 90.0, 0.1, 100.0).unwrap();
        let view = View::new(&camera);
        let corners = [
            corner(Vec3::new(5.0, 0.0, 0.0), Vec3::new(5.0, 0.0, 0.0)),
            corner(Vec3::new(5.0, 0.0, 1.0), Vec3::new(5.0, 0.0, 1.0)),
            corner(Vec3::new(6.0, 1.0, 0.0), Vec3::new(6.0, 1.0, 0.0)),
        ];
        let tri = Triangle::from_clipped(&corners, &view, Arc::new(Material::default()), 7).unwrap();
        assert!((tri.average_depth - 16.0 / 3.0).abs() < 1e-5);
        assert!((tri.normal.norm() - 1.0).abs() < 1e-5);
        assert_eq!(tri.object, 7);
        assert!(tri.screen_extent() > 0.0);
    }

    #[test]
    fn test_ray_hits_and_misses() {
        let tri = [Vec3::new(0.0, -1.0, -1.0), Vec3::new(0.0, 1.0, -1.0), Vec3::new(0.0, 0.0, 1.0)];
        let origin = Vec3::new(-2.0, 0.0, 0.0);
        let t = ray_intersects(&origin, &Vec3::new(4.0, 0.0, 0.0), &tri).unwrap();
        assert!((t - 0.5).abs() < 1e-6);
        assert!(ray_intersects(&origin, &Vec3::new(-1.0, 0.0, 0.0), &tri).is_none());
        assert!(ray_intersects(&origin, &Vec3::new(1.0, 5.0, 0.0), &tri).is_none());
    }
}
