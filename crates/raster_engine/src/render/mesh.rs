//! Mesh representation for 3D models
//!
//! The renderer reads geometry through the [`MeshSource`] capability so that
//! any scene framework can hand over its own mesh storage. [`Mesh`] is the
//! built-in implementation, with a few primitives used by the demo and tests.
//!
//! Faces are convex index loops (triangles or quads) wound so that
//! `(v1 - v0) × (v2 - v0)` points out of the surface.

use std::fmt::Debug;
use std::sync::Arc;

use crate::foundation::math::{Vec2, Vec3};

use super::error::{RenderError, RenderResult};
use super::material::Material;

/// Polygonal face referencing mesh vertices
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    /// Vertex indices forming a convex loop
    pub indices: Vec<usize>,
    /// Optional per-corner texture coordinates (same length as `indices`)
    pub uvs: Option<Vec<Vec2>>,
    /// Index into the mesh material list
    pub material: usize,
}

impl Face {
    /// Untextured face
    pub fn new(indices: Vec<usize>, material: usize) -> Self {
        Self { indices, uvs: None, material }
    }

    /// Attach per-corner texture coordinates
    pub fn with_uvs(mut self, uvs: Vec<Vec2>) -> Self {
        self.uvs = Some(uvs);
        self
    }

    /// Texture coordinate of corner `i`, zero when the face has none
    pub fn uv(&self, i: usize) -> Vec2 {
        self.uvs
            .as_ref()
            .and_then(|uvs| uvs.get(i).copied())
            .unwrap_or_else(Vec2::zeros)
    }
}

/// Geometry capability exposed by scene objects
pub trait MeshSource: Debug + Send + Sync {
    /// Object-space vertex positions
    fn vertices(&self) -> &[Vec3];

    /// Faces referencing [`MeshSource::vertices`]
    fn faces(&self) -> &[Face];

    /// Materials referenced by [`Face::material`]
    fn materials(&self) -> &[Arc<Material>];

    /// Object-space bounding radius around the origin
    fn bounding_radius(&self) -> f32 {
        self.vertices().iter().map(|v| v.norm()).fold(0.0, f32::max)
    }
}

/// Built-in indexed mesh
#[derive(Debug, Clone)]
pub struct Mesh {
    vertices: Vec<Vec3>,
    faces: Vec<Face>,
    materials: Vec<Arc<Material>>,
    radius: f32,
}

impl Mesh {
    /// Build and validate a mesh
    pub fn new(vertices: Vec<Vec3>, faces: Vec<Face>, materials: Vec<Arc<Material>>) -> RenderResult<Self> {
        validate(&vertices, &faces, &materials)?;
        let radius = vertices.iter().map(|v| v.norm()).fold(0.0, f32::max);
        Ok(Self { vertices, faces, materials, radius })
    }

    /// Build a mesh from a raw triangle soup sharing one material
    pub fn from_triangles(triangles: &[[Vec3; 3]], material: Arc<Material>) -> RenderResult<Self> {
        let vertices: Vec<Vec3> = triangles.iter().flatten().copied().collect();
        let faces = (0..triangles.len())
            .map(|t| Face::new(vec![t * 3, t * 3 + 1, t * 3 + 2], 0))
            .collect();
        Self::new(vertices, faces, vec![material])
    }

    /// Axis-aligned cube centred on the origin
    pub fn cube(size: f32, material: Arc<Material>) -> Self {
        let h = size * 0.5;
        let vertices = vec![
            Vec3::new(-h, -h, -h),
            Vec3::new(h, -h, -h),
            Vec3::new(h, h, -h),
            Vec3::new(-h, h, -h),
            Vec3::new(-h, -h, h),
            Vec3::new(h, -h, h),
            Vec3::new(h, h, h),
            Vec3::new(-h, h, h),
        ];
        let quad_uvs = || vec![Vec2::new(0.0, 1.0), Vec2::new(1.0, 1.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 0.0)];
        let faces = [
            [1, 2, 6, 5], // +X
            [0, 4, 7, 3], // -X
            [3, 7, 6, 2], // +Y
            [0, 1, 5, 4], // -Y
            [4, 5, 6, 7], // +Z
            [0, 3, 2, 1], // -Z
        ]
        .iter()
        .map(|quad| Face::new(quad.to_vec(), 0).with_uvs(quad_uvs()))
        .collect();
        Self::from_parts(vertices, faces, vec![material])
    }

    /// Square in the `z = 0` plane facing +Z, with tiled texture coordinates
    pub fn ground(size: f32, uv_repeat: f32, material: Arc<Material>) -> Self {
        let h = size * 0.5;
        let vertices = vec![
            Vec3::new(-h, -h, 0.0),
            Vec3::new(h, -h, 0.0),
            Vec3::new(h, h, 0.0),
            Vec3::new(-h, h, 0.0),
        ];
        let uvs = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(uv_repeat, 0.0),
            Vec2::new(uv_repeat, uv_repeat),
            Vec2::new(0.0, uv_repeat),
        ];
        Self::from_parts(vertices, vec![Face::new(vec![0, 1, 2, 3], 0).with_uvs(uvs)], vec![material])
    }

    /// Square pyramid standing on the `z = 0` plane
    pub fn pyramid(base: f32, height: f32, material: Arc<Material>) -> Self {
        let b = base * 0.5;
        let vertices = vec![
            Vec3::new(-b, -b, 0.0),
            Vec3::new(b, -b, 0.0),
            Vec3::new(b, b, 0.0),
            Vec3::new(-b, b, 0.0),
            Vec3::new(0.0, 0.0, height),
        ];
        let faces = vec![
            Face::new(vec![0, 1, 4], 0),
            Face::new(vec![1, 2, 4], 0),
            Face::new(vec![2, 3, 4], 0),
            Face::new(vec![3, 0, 4], 0),
            Face::new(vec![0, 3, 2, 1], 0),
        ];
        Self::from_parts(vertices, faces, vec![material])
    }

    fn from_parts(vertices: Vec<Vec3>, faces: Vec<Face>, materials: Vec<Arc<Material>>) -> Self {
        let radius = vertices.iter().map(|v| v.norm()).fold(0.0, f32::max);
        Self { vertices, faces, materials, radius }
    }
}

impl MeshSource for Mesh {
    fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    fn faces(&self) -> &[Face] {
        &self.faces
    }

    fn materials(&self) -> &[Arc<Material>] {
        &self.materials
    }

    fn bounding_radius(&self) -> f32 {
        self.radius
    }
}

fn validate(vertices: &[Vec3], faces: &[Face], materials: &[Arc<Material>]) -> RenderResult<()> {
    for (i, face) in faces.iter().enumerate() {
        if face.indices.len() < 3 {
            return Err(RenderError::InvalidMesh(format!("face {i} has fewer than 3 vertices")));
        }
        if let Some(bad) = face.indices.iter().find(|&&idx| idx >= vertices.len()) {
            return Err(RenderError::InvalidMesh(format!(
                "face {i} references vertex {bad} of {}",
                vertices.len()
            )));
        }
        if face.material >= materials.len() {
            return Err(RenderError::InvalidMesh(format!(
                "face {i} references material {} of {}",
                face.material,
                materials.len()
            )));
        }
        if face.uvs.as_ref().is_some_and(|uvs| uvs.len() != face.indices.len()) {
            return Err(RenderError::InvalidMesh(format!("face {i} has mismatched uv count")));
        }
    }
    Ok(())
}
