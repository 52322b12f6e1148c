//! # Background Renderer
//!
//! Fills the frame before geometry is drawn and adds the sun's lens flare
//! afterwards.
//!
//! In [`BackgroundMode::Skybox`] the layers are composited in this order:
//! sky gradient, sun, hills, floor (with water waves), water reflection,
//! shimmer, clouds. The reflection samples rows that are already on screen,
//! so it has to follow the sky, sun and hills.
//!
//! Hill profiles, cloud coverage and shimmer layouts are cached in
//! [`CacheEntry`] slots and only rebuilt when their parameters change or
//! [`BackgroundRenderer::invalidate`] is called.

pub mod clouds;
pub mod hills;
pub mod noise;
pub mod sky;
pub mod sun;
pub mod water;

pub use hills::HillProfile;
pub use noise::NoiseTexture;
pub use water::ShimmerChunk;

use crate::foundation::math::{Vec2, Vec3};
use crate::render::cache::CacheEntry;
use crate::render::color::Color;
use crate::render::config::{BackgroundMode, RenderConfig};
use crate::render::framebuffer::{DepthBuffer, FrameBuffer};
use crate::render::lighting::DirectionalLight;
use crate::render::projection::View;

/// Procedural background with parameter-keyed caches
#[derive(Debug, Default)]
pub struct BackgroundRenderer {
    generation: u64,
    hills: CacheEntry<HillProfile>,
    clouds: CacheEntry<NoiseTexture>,
    shimmer: CacheEntry<Vec<ShimmerChunk>>,
}

impl BackgroundRenderer {
    /// Empty renderer; caches fill on first use
    pub fn new() -> Self {
        Self::default()
    }

    /// Force every cache to rebuild on next use
    pub fn invalidate(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        log::trace!("Background caches invalidated (generation {})", self.generation);
    }

    /// Current cache generation
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Cached hill profile for `config`
    pub fn hill_profile(&mut self, config: &RenderConfig) -> &HillProfile {
        let hills = &config.hills;
        self.hills
            .get_or_insert_with(self.generation, hills.profile_key(), || HillProfile::generate(hills))
    }

    /// Cached cloud coverage texture for `config`
    pub fn cloud_coverage(&mut self, config: &RenderConfig) -> &NoiseTexture {
        let clouds = &config.clouds;
        self.clouds
            .get_or_insert_with(self.generation, clouds.texture_key(), || clouds::bake_coverage(clouds))
    }

    /// Times each cache has been rebuilt: `(hills, clouds, shimmer)`
    pub fn rebuilds(&self) -> (u64, u64, u64) {
        (self.hills.rebuilds(), self.clouds.rebuilds(), self.shimmer.rebuilds())
    }

    /// Fill the whole frame according to the configured background mode
    ///
    /// Camera roll is ignored.
    pub fn draw(&mut self, frame: &mut FrameBuffer, view: &View, config: &RenderConfig, time: f32) {
        let background = &config.background;
        match background.mode {
            BackgroundMode::Solid => frame.clear(background.solid_color),
            BackgroundMode::Transparent => frame.clear(Color::TRANSPARENT),
            BackgroundMode::Skybox => self.draw_skybox(frame, &view.without_roll(), config, time),
        }
    }

    fn draw_skybox(&mut self, frame: &mut FrameBuffer, view: &View, config: &RenderConfig, time: f32) {
        let generation = self.generation;
        let horizon = sky::horizon_y(view);
        let yaw = view.yaw_degrees();

        sky::draw_sky(frame, &config.background, horizon);

        if config.sun.enabled {
            if let Some(position) = sun_position(view, config) {
                sun::draw_sun(frame, &position, &config.sun);
            }
        }

        if config.hills.enabled {
            let haze = config.hills.fog_blend.then(|| {
                if config.fog.enabled {
                    config.fog.color
                } else {
                    config.background.sky_horizon
                }
            });
            let profile = self.hill_profile(config);
            hills::draw(frame, view, yaw, horizon, profile, &config.hills, haze);
        }

        let water = &config.water;
        let height = frame.height() as f32;
        if water.enabled {
            let span = (height - horizon).max(1.0);
            sky::draw_floor(frame, &config.background, horizon, |x, row| {
                water::wave_offset(x, row, (row - horizon) / span, time, water)
            });
            if water.reflection_enabled {
                water::draw_reflection(frame, horizon, time, water);
            }
            if water.shimmer {
                let (w, h) = (frame.width(), frame.height());
                let chunks = self
                    .shimmer
                    .get_or_insert_with(generation, water::shimmer_key(w, h, water), || {
                        water::generate_shimmer(w, h, water)
                    });
                water::draw_shimmer(frame, horizon, time, chunks, water);
            }
        } else {
            sky::draw_floor(frame, &config.background, horizon, |_, _| 0.0);
        }

        if config.clouds.enabled {
            let tint = Color::WHITE.lerp(config.sun.color, 0.15);
            let coverage = self.cloud_coverage(config);
            clouds::draw(frame, view, horizon, coverage, &config.clouds, time, tint);
        }
    }

    /// Draw the lens flare once geometry is in place
    ///
    /// Only applies to the skybox with both sun and flare enabled. Returns
    /// whether anything was drawn.
    pub fn draw_lens_flare(
        &self,
        frame: &mut FrameBuffer,
        depth: &DepthBuffer,
        view: &View,
        config: &RenderConfig,
    ) -> bool {
        if config.background.mode != BackgroundMode::Skybox || !config.sun.enabled || !config.lens_flare.enabled {
            return false;
        }
        match sun_position(view, config) {
            Some(position) => sun::draw_lens_flare(frame, depth, view, &position, &config.lens_flare, config.sun.color),
            None => false,
        }
    }
}

/// Screen position of the sun implied by the directional light, ignoring roll
pub fn sun_position(view: &View, config: &RenderConfig) -> Option<Vec2> {
    let to_sun: Vec3 = DirectionalLight::from_config(&config.lighting).to_light();
    sun::screen_position(&view.without_roll(), &to_sun)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Camera;

    fn view() -> View {
        View::new(&Camera::new(48, 32, 70.0, 0.1, 200.0).unwrap())
    }

    fn quiet_skybox() -> RenderConfig {
        let mut config = RenderConfig::default();
        config.sun.enabled = false;
        config.hills.enabled = false;
        config.clouds.enabled = false;
        config.water.enabled = false;
        config
    }

    #[test]
    fn test_solid_and_transparent_modes_fill_frame() {
        let mut renderer = BackgroundRenderer::new();
        let mut frame = FrameBuffer::new(48, 32);
        let mut config = RenderConfig::default();

        config.background.mode = BackgroundMode::Solid;
        config.background.solid_color = Color::rgb(12, 34, 56);
        renderer.draw(&mut frame, &view(), &config, 0.0);
        assert!(frame.pixels().iter().all(|&p| p == [12, 34, 56, 255]));

        config.background.mode = BackgroundMode::Transparent;
        renderer.draw(&mut frame, &view(), &config, 0.0);
        assert!(frame.pixels().iter().all(|&p| p == [0, 0, 0, 0]));
    }

    #[test]
    fn test_plain_skybox_is_two_gradients() {
        let config = quiet_skybox();
        let mut renderer = BackgroundRenderer::new();
        let mut frame = FrameBuffer::new(48, 32);
        renderer.draw(&mut frame, &view(), &config, 0.0);
        let sky = &config.background;
        assert_eq!(frame.get(10, 0), Some(sky::sky_color(sky, 0.5, 16.0)));
        assert_eq!(frame.get(10, 31), Some(sky::floor_color(sky, 31.5, 16.0, 32.0, 0.0)));
    }

    #[test]
    fn test_caches_rebuild_only_on_change() {
        let mut config = RenderConfig::default();
        config.hills.enabled = true;
        config.clouds.enabled = true;
        config.water.enabled = true;
        config.water.shimmer = true;
        let mut renderer = BackgroundRenderer::new();
        let mut frame = FrameBuffer::new(48, 32);

        renderer.draw(&mut frame, &view(), &config, 0.0);
        renderer.draw(&mut frame, &view(), &config, 0.5);
        assert_eq!(renderer.rebuilds(), (1, 1, 1));

        config.hills.seed += 1;
        renderer.draw(&mut frame, &view(), &config, 1.0);
        assert_eq!(renderer.rebuilds(), (2, 1, 1));

        renderer.invalidate();
        renderer.draw(&mut frame, &view(), &config, 1.5);
        assert_eq!(renderer.rebuilds(), (3, 2, 2));
    }

    #[test]
    fn test_roll_does_not_move_the_background() {
        let mut config = RenderConfig::default();
        config.background.mode = BackgroundMode::Skybox;
        config.sun.enabled = true;
        config.lighting.direction = [-1.0, -0.3, -0.4];
        let camera = |roll: f32| {
            let camera = Camera::new(48, 32, 70.0, 0.1, 200.0).unwrap();
            View::new(&camera.with_rotation(Vec3::new(roll, 10.0, 20.0)))
        };
        let (level, rolled) = (camera(0.0), camera(30.0));

        assert!(sun_position(&level, &config).is_some());
        assert_eq!(sun_position(&level, &config), sun_position(&rolled, &config));

        let draw = |view: &View| {
            let mut renderer = BackgroundRenderer::new();
            let mut frame = FrameBuffer::new(48, 32);
            renderer.draw(&mut frame, view, &config, 0.5);
            frame.pixels().to_vec()
        };
        assert_eq!(draw(&level), draw(&rolled));
    }

    #[test]
    fn test_water_reflects_hill_silhouette() {
        let render = |hills: bool| {
            let mut config = quiet_skybox();
            config.background.mode = BackgroundMode::Skybox;
            config.hills.enabled = hills;
            config.hills.min_height = 6.0;
            config.hills.max_height = 6.0;
            config.hills.fog_blend = false;
            config.water.enabled = true;
            config.water.reflection_enabled = true;
            config.water.shimmer = false;
            config.water.wave_height = 0.0;
            config.water.reflection_distortion = 0.0;
            config.water.reflection_opacity = 1.0;
            let mut renderer = BackgroundRenderer::new();
            let mut frame = FrameBuffer::new(48, 32);
            renderer.draw(&mut frame, &view(), &config, 0.0);
            frame
        };
        let (with_hills, bare) = (render(true), render(false));
        let row = |frame: &FrameBuffer, y: i32| (0..48).map(|x| frame.get(x, y)).collect::<Vec<_>>();

        // Horizon at row 16, silhouette on rows 10..16
        for y in 10..16 {
            assert_ne!(row(&with_hills, y), row(&bare, y), "row {y}");
        }
        // Mirror image on rows 16..22, open sky reflected below that
        for y in 16..22 {
            assert_ne!(row(&with_hills, y), row(&bare, y), "row {y}");
        }
        for y in 22..32 {
            assert_eq!(row(&with_hills, y), row(&bare, y), "row {y}");
        }
    }

    #[test]
    fn test_flare_needs_skybox_and_visible_sun() {
        let mut config = quiet_skybox();
        config.sun.enabled = true;
        config.lens_flare.enabled = true;
        config.lighting.direction = [-1.0, 0.0, -0.4];
        let view = view();
        let renderer = BackgroundRenderer::new();
        let mut frame = FrameBuffer::new(48, 32);
        let depth = DepthBuffer::new(48, 32);

        assert!(sun_position(&view, &config).is_some());
        assert!(renderer.draw_lens_flare(&mut frame, &depth, &view, &config));

        config.background.mode = BackgroundMode::Solid;
        assert!(!renderer.draw_lens_flare(&mut frame, &depth, &view, &config));

        config.background.mode = BackgroundMode::Skybox;
        config.lighting.direction = [1.0, 0.0, -0.4];
        assert!(!renderer.draw_lens_flare(&mut frame, &depth, &view, &config));
    }
}
