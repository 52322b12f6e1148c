use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, Command};
use image::{GrayImage, Luma, RgbaImage};

use raster_engine::foundation::collections::ObjectKey;
use raster_engine::foundation::logging;
use raster_engine::prelude::*;

const DEFAULT_WIDTH: usize = 640;
const DEFAULT_HEIGHT: usize = 360;
const DEFAULT_FRAMES: u32 = 1;
const DEFAULT_TIME_STEP: f32 = 1.0 / 30.0;
const DEFAULT_OUTPUT: &str = "frame.png";

/// Radius of the orbiting lamp around the scene centre
const ORBIT_RADIUS: f32 = 4.0;

#[derive(Debug)]
struct DemoOptions {
    config: Option<PathBuf>,
    output: PathBuf,
    depth: Option<PathBuf>,
    write_config: Option<PathBuf>,
    width: usize,
    height: usize,
    frames: u32,
    time_step: f32,
    print_stats: bool,
}

fn main() -> Result<()> {
    logging::init();

    let options = parse_args();
    log::debug!("{options:?}");

    let config = match &options.config {
        Some(path) => RenderConfig::load_from_file(path)
            .with_context(|| format!("Failed to load render config from {}", path.display()))?,
        None => demo_config(),
    };

    if let Some(path) = &options.write_config {
        config
            .save_to_file(path)
            .with_context(|| format!("Failed to write render config to {}", path.display()))?;
    }

    let mut camera = config
        .build_camera(options.width, options.height)
        .context("Invalid camera configuration")?
        .with_position(Vec3::new(-14.0, -3.0, 4.5))
        .with_rotation(Vec3::new(0.0, -12.0, 10.0));

    let mut renderer = Renderer::new(config).context("Invalid render configuration")?;
    let (mut scene, lamp) = build_scene();

    let frames = options.frames.max(1);
    for frame in 0..frames {
        let time = frame as f32 * options.time_step;
        orbit_lamp(&mut scene, lamp, time);
        let stats = renderer.render_frame(&mut camera, &scene, time);
        if options.print_stats {
            println!("frame {frame}: {stats}");
        }
    }

    write_color(&camera, &options.output)?;
    log::info!("Wrote {}", options.output.display());

    if let Some(path) = &options.depth {
        write_depth(&camera, path)?;
        log::info!("Wrote depth visualisation {}", path.display());
    }

    Ok(())
}

fn parse_args() -> DemoOptions {
    let matches = Command::new("frame_demo")
        .about("Renders a demo scene with the software rasterizer and writes the frame as PNG")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("Render configuration (.toml or .ron)"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("PNG")
                .value_parser(value_parser!(PathBuf))
                .default_value(DEFAULT_OUTPUT)
                .help("Where to write the final frame"),
        )
        .arg(
            Arg::new("width")
                .long("width")
                .value_name("PIXELS")
                .value_parser(value_parser!(usize))
                .help("Viewport width"),
        )
        .arg(
            Arg::new("height")
                .long("height")
                .value_name("PIXELS")
                .value_parser(value_parser!(usize))
                .help("Viewport height"),
        )
        .arg(
            Arg::new("frames")
                .short('n')
                .long("frames")
                .value_name("COUNT")
                .value_parser(value_parser!(u32))
                .help("Number of frames to render; only the last is written"),
        )
        .arg(
            Arg::new("time-step")
                .long("time-step")
                .value_name("SECONDS")
                .value_parser(value_parser!(f32))
                .help("Animation time between frames"),
        )
        .arg(
            Arg::new("write-config")
                .long("write-config")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("Save the effective configuration (.toml or .ron)"),
        )
        .arg(
            Arg::new("depth")
                .long("depth")
                .value_name("PNG")
                .value_parser(value_parser!(PathBuf))
                .help("Also write a normalised depth buffer image"),
        )
        .arg(
            Arg::new("stats")
                .long("stats")
                .help("Print per-frame statistics")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    DemoOptions {
        config: matches.get_one::<PathBuf>("config").cloned(),
        output: matches
            .get_one::<PathBuf>("output")
            .cloned()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
        depth: matches.get_one::<PathBuf>("depth").cloned(),
        write_config: matches.get_one::<PathBuf>("write-config").cloned(),
        width: matches.get_one::<usize>("width").copied().unwrap_or(DEFAULT_WIDTH),
        height: matches.get_one::<usize>("height").copied().unwrap_or(DEFAULT_HEIGHT),
        frames: matches.get_one::<u32>("frames").copied().unwrap_or(DEFAULT_FRAMES),
        time_step: matches.get_one::<f32>("time-step").copied().unwrap_or(DEFAULT_TIME_STEP),
        print_stats: matches.get_flag("stats"),
    }
}

/// Defaults with every atmosphere layer switched on
fn demo_config() -> RenderConfig {
    let mut config = RenderConfig::default();
    config.hills.enabled = true;
    config.clouds.enabled = true;
    config.water.enabled = true;
    config.water.reflection_enabled = true;
    config.water.shimmer = true;
    config.fog.enabled = true;
    config.fog.start = 40.0;
    config.fog.end = 160.0;
    config.fog.density = 0.8;
    config.lighting.direction = [-0.85, -0.2, -0.18];
    config
}

/// Ground, a handful of primitives and two point lights
///
/// Returns the scene and the key of the lamp that orbits over time.
fn build_scene() -> (Scene, ObjectKey) {
    let mut scene = Scene::new();

    let grass = Texture::checkerboard(64, 8, Color::rgb(70, 120, 60), Color::rgb(60, 105, 52));
    let ground = Material::new(Color::rgb(70, 120, 60)).with_name("ground").with_texture(Arc::new(grass));
    scene.insert(
        SceneObject::new("ground").with_mesh(Arc::new(Mesh::ground(30.0, 6.0, Arc::new(ground)))),
    );

    let painted = Material::new(Color::rgb(200, 60, 50)).with_specular(Color::WHITE, 48.0);
    scene.insert(
        SceneObject::new("red cube")
            .with_transform(Transform::from_position_euler_degrees(Vec3::new(0.0, -3.0, 1.0), Vec3::new(0.0, 0.0, 25.0)))
            .with_mesh(Arc::new(Mesh::cube(2.0, Arc::new(painted)))),
    );

    let checker = Texture::checkerboard(32, 4, Color::WHITE, Color::rgb(30, 30, 30));
    let checker = Material::new(Color::WHITE).with_name("checker").with_texture(Arc::new(checker));
    scene.insert(
        SceneObject::new("checker cube")
            .with_transform(Transform::from_position(Vec3::new(3.0, 2.5, 1.5)).with_uniform_scale(1.5))
            .with_mesh(Arc::new(Mesh::cube(2.0, Arc::new(checker)))),
    );

    let stone = Material::new(Color::rgb(190, 170, 120)).with_specular(Color::rgb(120, 120, 120), 12.0);
    scene.insert(
        SceneObject::new("pyramid")
            .with_transform(Transform::from_position(Vec3::new(6.0, -4.0, 0.0)))
            .with_mesh(Arc::new(Mesh::pyramid(3.0, 3.5, Arc::new(stone)))),
    );

    let glow = Material::new(Color::rgb(20, 20, 40)).with_emissive(Color::rgb(80, 160, 255), 0.8);
    scene.insert(
        SceneObject::new("beacon")
            .with_transform(Transform::from_position(Vec3::new(-2.0, 4.0, 0.75)))
            .with_mesh(Arc::new(Mesh::cube(1.5, Arc::new(glow))))
            .with_light(Arc::new(PointLight::new(Color::rgb(80, 160, 255), 0.6, 8.0).without_shadows())),
    );

    let lamp = scene.insert(
        SceneObject::new("lamp")
            .with_transform(Transform::from_position(Vec3::new(ORBIT_RADIUS, 0.0, 3.0)))
            .with_light(Arc::new(PointLight::new(Color::rgb(255, 200, 120), 1.2, 12.0))),
    );

    log::info!("Demo scene built with {} objects", scene.len());
    (scene, lamp)
}

fn orbit_lamp(scene: &mut Scene, lamp: ObjectKey, time: f32) {
    if let Some(object) = scene.get_mut(lamp) {
        let angle = time * 0.8;
        object.transform.position = Vec3::new(ORBIT_RADIUS * angle.cos(), ORBIT_RADIUS * angle.sin(), 3.0);
    }
}

fn write_color(camera: &Camera, path: &Path) -> Result<()> {
    let frame = camera.frame();
    let image = RgbaImage::from_raw(frame.width() as u32, frame.height() as u32, frame.as_bytes().to_vec())
        .context("Frame buffer size does not match its dimensions")?;
    image.save(path).with_context(|| format!("Failed to save {}", path.display()))
}

/// Near surfaces bright, far surfaces dark, empty pixels black
fn write_depth(camera: &Camera, path: &Path) -> Result<()> {
    let depth = camera.depth();
    let (min, max) = depth
        .values()
        .iter()
        .filter(|d| d.is_finite())
        .fold((f32::MAX, f32::MIN), |(lo, hi), &d| (lo.min(d), hi.max(d)));
    let span = (max - min).max(f32::EPSILON);

    let mut image = GrayImage::new(depth.width() as u32, depth.height() as u32);
    for (i, value) in depth.values().iter().enumerate() {
        let shade = if value.is_finite() { 255.0 * (1.0 - (value - min) / span) * 0.9 + 25.0 } else { 0.0 };
        let (x, y) = ((i % depth.width()) as u32, (i / depth.width()) as u32);
        image.put_pixel(x, y, Luma([shade.clamp(0.0, 255.0) as u8]));
    }
    image.save(path).with_context(|| format!("Failed to save {}", path.display()))
}
