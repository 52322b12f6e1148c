//! Scene registry consumed by the renderer
//!
//! Objects live in a slot map with a separate insertion-order list, so keys
//! stay valid across removals and iteration order is stable. Capabilities are
//! plain trait objects; once per frame [`Scene::resolve`] walks the active
//! objects and hands the renderer strongly typed [`MeshHandle`] and
//! [`LightHandle`] lists.

use std::sync::Arc;

use crate::foundation::collections::{HandleMap, ObjectKey};
use crate::foundation::math::{Transform, Vec3};

use super::config::DynamicLightingConfig;
use super::lighting::{LightContribution, LightSource};
use super::mesh::MeshSource;
use super::triangle::Triangle;
use super::color::Color;

/// Entry in the scene
#[derive(Debug, Clone)]
pub struct SceneObject {
    /// Display name
    pub name: String,
    /// World transform
    pub transform: Transform,
    /// World-space bounding sphere radius around `transform.position`
    pub bounding_radius: f32,
    /// Inactive objects are skipped entirely
    pub active: bool,
    /// Optional geometry
    pub mesh: Option<Arc<dyn MeshSource>>,
    /// Optional light emitted from the object's origin
    pub light: Option<Arc<dyn LightSource>>,
}

impl SceneObject {
    /// Empty active object at the origin
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::identity(),
            bounding_radius: 0.0,
            active: true,
            mesh: None,
            light: None,
        }
    }

    /// Set the transform, rescaling the bounding radius of any attached mesh
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self.refresh_bounds();
        self
    }

    /// Attach geometry; the bounding radius follows the mesh
    pub fn with_mesh(mut self, mesh: Arc<dyn MeshSource>) -> Self {
        self.mesh = Some(mesh);
        self.refresh_bounds();
        self
    }

    /// Attach a light
    pub fn with_light(mut self, light: Arc<dyn LightSource>) -> Self {
        self.light = Some(light);
        self
    }

    /// Override the bounding radius
    pub fn with_bounding_radius(mut self, radius: f32) -> Self {
        self.bounding_radius = radius.max(0.0);
        self
    }

    /// Set whether the object takes part in rendering
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    fn refresh_bounds(&mut self) {
        if let Some(mesh) = &self.mesh {
            self.bounding_radius = mesh.bounding_radius() * self.transform.max_scale();
        }
    }
}

/// Mesh capability of an active object, resolved for one frame
#[derive(Debug, Clone)]
pub struct MeshHandle {
    /// Registry key of the owning object
    pub key: ObjectKey,
    /// World transform
    pub transform: Transform,
    /// World-space bounding radius
    pub bounding_radius: f32,
    /// Geometry
    pub mesh: Arc<dyn MeshSource>,
}

/// Light capability of an active object, resolved for one frame
#[derive(Debug, Clone)]
pub struct LightHandle {
    key: ObjectKey,
    position: Vec3,
    distance: f32,
    light: Arc<dyn LightSource>,
}

impl LightHandle {
    /// Bind a light to its world position and camera distance
    pub fn new(key: ObjectKey, position: Vec3, distance: f32, light: Arc<dyn LightSource>) -> Self {
        Self { key, position, distance, light }
    }

    /// Registry key of the owning object
    pub fn key(&self) -> ObjectKey {
        self.key
    }

    /// World position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Distance from the camera when resolved
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Emitted colour
    pub fn color(&self) -> Color {
        self.light.color()
    }

    /// Peak intensity
    pub fn intensity(&self) -> f32 {
        self.light.intensity()
    }

    /// Whether the light reaches a surface point, with occlusion
    pub fn is_triangle_lit(&self, centroid: &Vec3, normal: &Vec3, triangles: &[Triangle]) -> bool {
        self.light.is_triangle_lit(&self.position, centroid, normal, triangles)
    }

    /// Light arriving at a surface point
    pub fn light_contribution(&self, centroid: &Vec3, normal: &Vec3) -> LightContribution {
        self.light.light_contribution(&self.position, centroid, normal)
    }
}

/// Output of the per-frame registry pass
#[derive(Debug, Clone, Default)]
pub struct ResolvedScene {
    /// Active meshes in scene order
    pub meshes: Vec<MeshHandle>,
    /// Nearest active lights, closest first
    pub lights: Vec<LightHandle>,
    /// Number of active objects visited
    pub active_objects: usize,
}

/// Ordered object registry
#[derive(Debug, Default)]
pub struct Scene {
    objects: HandleMap<SceneObject>,
    order: Vec<ObjectKey>,
}

impl Scene {
    /// Empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object, returning its stable key
    pub fn insert(&mut self, object: SceneObject) -> ObjectKey {
        let key = self.objects.insert(object);
        self.order.push(key);
        key
    }

    /// Remove an object
    pub fn remove(&mut self, key: ObjectKey) -> Option<SceneObject> {
        let object = self.objects.remove(key)?;
        self.order.retain(|&k| k != key);
        Some(object)
    }

    /// Look up an object
    pub fn get(&self, key: ObjectKey) -> Option<&SceneObject> {
        self.objects.get(key)
    }

    /// Look up an object for modification
    pub fn get_mut(&mut self, key: ObjectKey) -> Option<&mut SceneObject> {
        self.objects.get_mut(key)
    }

    /// Number of registered objects
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the scene has no objects
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Objects in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (ObjectKey, &SceneObject)> {
        self.order.iter().filter_map(|&key| self.objects.get(key).map(|object| (key, object)))
    }

    /// Resolve the capabilities of active objects for one frame
    ///
    /// Lights beyond `lighting.search_radius` of `camera_position` are
    /// dropped, the rest are sorted by distance and capped at
    /// `lighting.max_lights`. No lights are returned when dynamic lighting is
    /// disabled.
    pub fn resolve(&self, camera_position: &Vec3, lighting: &DynamicLightingConfig) -> ResolvedScene {
        let mut resolved = ResolvedScene::default();

        for (key, object) in self.iter().filter(|(_, object)| object.active) {
            resolved.active_objects += 1;

            if let Some(mesh) = &object.mesh {
                resolved.meshes.push(MeshHandle {
                    key,
                    transform: object.transform,
                    bounding_radius: object.bounding_radius,
                    mesh: Arc::clone(mesh),
                });
            }

            if let Some(light) = object.light.as_ref().filter(|_| lighting.enabled) {
                let position = object.transform.position;
                let distance = (position - camera_position).norm();
                if distance <= lighting.search_radius {
                    resolved.lights.push(LightHandle::new(key, position, distance, Arc::clone(light)));
                }
            }
        }

        resolved.lights.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        resolved.lights.truncate(lighting.max_lights);
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::lighting::PointLight;
    use crate::render::material::Material;
    use crate::render::mesh::Mesh;

    fn light_at(name: &str, x: f32) -> SceneObject {
        SceneObject::new(name)
            .with_transform(Transform::from_position(Vec3::new(x, 0.0, 0.0)))
            .with_light(Arc::new(PointLight::new(Color::WHITE, 1.0, 10.0)))
    }

    #[test]
    fn test_iteration_keeps_insertion_order_after_removal() {
        let mut scene = Scene::new();
        let a = scene.insert(SceneObject::new("a"));
        scene.insert(SceneObject::new("b"));
        scene.insert(SceneObject::new("c"));
        assert!(scene.remove(a).is_some());
        let names: Vec<&str> = scene.iter().map(|(_, o)| o.name.as_str()).collect();
        assert_eq!(names, ["b", "c"]);
        assert!(scene.get(a).is_none());
    }

    #[test]
    fn test_lights_sorted_filtered_and_capped() {
        let mut scene = Scene::new();
        scene.insert(light_at("far", 50.0));
        scene.insert(light_at("mid", 8.0));
        scene.insert(light_at("near", 2.0));
        scene.insert(light_at("close", 4.0));
        scene.insert(light_at("off", 1.0).with_active(false));

        let config = DynamicLightingConfig { max_lights: 2, search_radius: 20.0, ..Default::default() };
        let resolved = scene.resolve(&Vec3::zeros(), &config);
        let distances: Vec<f32> = resolved.lights.iter().map(LightHandle::distance).collect();
        assert_eq!(distances, [2.0, 4.0]);
        assert_eq!(resolved.active_objects, 4);

        let disabled = DynamicLightingConfig { enabled: false, ..config };
        assert!(scene.resolve(&Vec3::zeros(), &disabled).lights.is_empty());
    }

    #[test]
    fn test_mesh_bounds_follow_scale() {
        let cube = Arc::new(Mesh::cube(2.0, Arc::new(Material::default())));
        let object = SceneObject::new("cube")
            .with_mesh(cube)
            .with_transform(Transform::from_position(Vec3::zeros()).with_uniform_scale(2.0));
        assert!((object.bounding_radius - 2.0 * 3f32.sqrt()).abs() < 1e-5);

        let mut scene = Scene::new();
        scene.insert(object);
        scene.insert(SceneObject::new("empty"));
        assert_eq!(scene.resolve(&Vec3::zeros(), &DynamicLightingConfig::default()).meshes.len(), 1);
    }
}
