//! Background modes, caches, overlay and post effects through the renderer

use super::{camera, cube_at, plain_config};
use crate::foundation::math::Vec3;
use crate::render::{BackgroundMode, Color, Material, RenderConfig, Renderer, Scene};

fn skybox_with_flare() -> RenderConfig {
    let mut config = RenderConfig::default();
    config.background.mode = BackgroundMode::Skybox;
    config.hills.enabled = false;
    config.clouds.enabled = false;
    config.water.enabled = false;
    config.sun.enabled = true;
    config.lens_flare.enabled = true;
    // Sun projects to pixel (12, 12), so the flare chain crosses the centre
    config.lighting.direction = [-1.0, 0.625, -0.625];
    config
}

fn render(config: RenderConfig, scene: &Scene) -> Vec<[u8; 4]> {
    let mut camera = camera();
    let mut renderer = Renderer::new(config).unwrap();
    renderer.render_frame(&mut camera, scene, 0.0);
    camera.frame().pixels().to_vec()
}

#[test]
fn test_transparent_background_leaves_alpha_zero() {
    let mut config = plain_config();
    config.background.mode = BackgroundMode::Transparent;
    let pixels = render(config, &Scene::new());
    assert!(pixels.iter().all(|&p| p == [0, 0, 0, 0]));
}

#[test]
fn test_debug_overlay_draws_in_corner_only() {
    let mut config = plain_config();
    config.background.solid_color = Color::WHITE;
    config.debug_overlay = true;

    let mut camera = camera();
    let mut renderer = Renderer::new(config).unwrap();
    renderer.render_frame(&mut camera, &Scene::new(), 0.0);
    assert_ne!(camera.frame().get(0, 0), Some(Color::WHITE));
    assert_eq!(camera.frame().get(63, 63), Some(Color::WHITE));
}

#[test]
fn test_background_caches_survive_frames_until_config_change() {
    let mut config = RenderConfig::default();
    config.hills.enabled = true;
    config.clouds.enabled = true;

    let mut camera = camera();
    let mut renderer = Renderer::new(config.clone()).unwrap();
    let scene = Scene::new();
    for frame in 0..3 {
        renderer.render_frame(&mut camera, &scene, frame as f32 * 0.1);
    }
    let (hills, clouds, _) = renderer.background().rebuilds();
    assert_eq!((hills, clouds), (1, 1));

    renderer.apply_config(config).unwrap();
    renderer.render_frame(&mut camera, &scene, 1.0);
    let (hills, clouds, _) = renderer.background().rebuilds();
    assert_eq!((hills, clouds), (2, 2));
}

#[test]
fn test_lens_flare_only_when_sun_is_uncovered() {
    let mut no_flare = skybox_with_flare();
    no_flare.lens_flare.enabled = false;

    let open_sky = Scene::new();
    assert_ne!(render(skybox_with_flare(), &open_sky), render(no_flare.clone(), &open_sky));

    let mut wall = Scene::new();
    wall.insert(cube_at("wall", Vec3::new(5.0, 0.0, 0.0), 6.0, Material::new(Color::rgb(40, 40, 40))));
    assert_eq!(render(skybox_with_flare(), &wall), render(no_flare, &wall));
}

#[test]
fn test_sky_above_and_floor_below_horizon() {
    let mut config = skybox_with_flare();
    config.sun.enabled = false;
    let pixels = render(config.clone(), &Scene::new());
    let at = |x: usize, y: usize| Color::from_rgba(pixels[y * 64 + x]);
    assert_eq!(at(5, 0), crate::render::background::sky::sky_color(&config.background, 0.5, 32.0));
    assert_eq!(
        at(5, 63),
        crate::render::background::sky::floor_color(&config.background, 63.5, 32.0, 64.0, 0.0)
    );
}
