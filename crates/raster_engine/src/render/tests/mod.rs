//! Cross-module scenarios driving the whole frame pipeline

mod atmosphere;

use std::sync::Arc;

use crate::foundation::logging;
use crate::foundation::math::{Transform, Vec3};
use crate::render::{BackgroundMode, Camera, Color, Material, Mesh, RenderConfig, SceneObject};

pub(crate) fn camera() -> Camera {
    logging::try_init_for_tests();
    Camera::new(64, 64, 90.0, 0.1, 100.0).unwrap()
}

/// Black solid background, no highlights, no billboards, flat white light
pub(crate) fn plain_config() -> RenderConfig {
    let mut config = RenderConfig::default();
    config.background.mode = BackgroundMode::Solid;
    config.background.solid_color = Color::BLACK;
    config.specular.enabled = false;
    config.dynamic_lighting.billboards = false;
    config.lighting.color = Color::WHITE;
    config.lighting.ambient = 1.0;
    config
}

pub(crate) fn cube_at(name: &str, position: Vec3, size: f32, material: Material) -> SceneObject {
    SceneObject::new(name)
        .with_transform(Transform::from_position(position))
        .with_mesh(Arc::new(Mesh::cube(size, Arc::new(material))))
}
