//! # Render Configuration
//!
//! Every recognised renderer option lives in one plain [`RenderConfig`] value.
//! Options are grouped per subsystem, each group is independently toggleable
//! and validated, and the whole tree loads from TOML or RON through the
//! [`Config`] trait.
//!
//! Changes take effect through a single step:
//! [`super::renderer::Renderer::apply_config`] validates the new value and
//! invalidates every parameter-keyed cache at once, and
//! [`RenderConfig::build_camera`] and [`RenderConfig::apply_to_camera`] push
//! the camera-related options.
//!
//! ## Example
//! ```toml
//! debug_overlay = true
//!
//! [camera]
//! field_of_view = 70.0
//!
//! [fog]
//! enabled = true
//! start = 100.0
//! end = 500.0
//! ```

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::config::{Config, ConfigError};

use super::background::{clouds, hills};
use super::cache::ParamHasher;
use super::camera::{Camera, MAX_FIELD_OF_VIEW, MIN_FIELD_OF_VIEW};
use super::color::Color;
use super::error::RenderResult;

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue { field, reason: reason.into() }
}

fn ensure(condition: bool, field: &'static str, reason: &str) -> Result<(), ConfigError> {
    if condition {
        Ok(())
    } else {
        Err(invalid(field, reason))
    }
}

/// Hash a list of floats by bit pattern
fn hash_floats(hasher: &mut impl Hasher, values: &[f32]) {
    for value in values {
        value.to_bits().hash(hasher);
    }
}

/// Projection and culling options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub field_of_view: f32,
    /// Near clip distance
    pub near_plane: f32,
    /// Far clip distance
    pub far_plane: f32,
    /// Discard faces pointing away from the camera
    pub backface_culling: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self { field_of_view: 60.0, near_plane: 0.1, far_plane: 1000.0, backface_culling: true }
    }
}

impl CameraConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure(
            (MIN_FIELD_OF_VIEW..=MAX_FIELD_OF_VIEW).contains(&self.field_of_view),
            "camera.field_of_view",
            "must be between 1 and 179 degrees",
        )?;
        ensure(self.near_plane > 0.0, "camera.near_plane", "must be positive")?;
        ensure(self.far_plane > self.near_plane, "camera.far_plane", "must be greater than near_plane")
    }
}

/// How the area behind geometry is filled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundMode {
    /// Procedural sky, hills, clouds, water and sun
    #[default]
    Skybox,
    /// Single configurable colour
    Solid,
    /// Fully transparent for external compositing
    Transparent,
}

/// Sky and floor gradient colours
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundConfig {
    /// Fill strategy
    pub mode: BackgroundMode,
    /// Colour used in [`BackgroundMode::Solid`]
    pub solid_color: Color,
    /// Sky colour straight up
    pub sky_zenith: Color,
    /// Sky colour at the horizon
    pub sky_horizon: Color,
    /// Floor colour at the horizon
    pub floor_horizon: Color,
    /// Floor colour straight down
    pub floor_nadir: Color,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            mode: BackgroundMode::Skybox,
            solid_color: Color::rgb(32, 32, 40),
            sky_zenith: Color::rgb(40, 90, 170),
            sky_horizon: Color::rgb(175, 205, 235),
            floor_horizon: Color::rgb(70, 110, 140),
            floor_nadir: Color::rgb(20, 45, 70),
        }
    }
}

/// Sun-like directional light plus global lighting terms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    /// Direction the light travels in world space (need not be normalised)
    pub direction: [f32; 3],
    /// Light tint
    pub color: Color,
    /// Diffuse strength
    pub intensity: f32,
    /// Ambient floor in `[0, 1]`
    pub ambient: f32,
    /// Global scale applied to every emissive material
    pub emissive_multiplier: f32,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            direction: [-0.8, -0.25, -0.3],
            color: Color::rgb(255, 244, 225),
            intensity: 1.0,
            ambient: 0.3,
            emissive_multiplier: 1.0,
        }
    }
}

impl LightingConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let [x, y, z] = self.direction;
        ensure((x * x + y * y + z * z).sqrt() > 1e-6, "lighting.direction", "must not be zero")?;
        ensure(self.intensity >= 0.0, "lighting.intensity", "must not be negative")?;
        ensure((0.0..=1.0).contains(&self.ambient), "lighting.ambient", "must be within [0, 1]")?;
        ensure(self.emissive_multiplier >= 0.0, "lighting.emissive_multiplier", "must not be negative")
    }
}

/// Linear distance fog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FogConfig {
    /// Enable fog blending
    pub enabled: bool,
    /// Colour surfaces blend toward
    pub color: Color,
    /// Depth where fog begins
    pub start: f32,
    /// Depth where fog reaches full density
    pub end: f32,
    /// Maximum blend factor in `[0, 1]`
    pub density: f32,
}

impl Default for FogConfig {
    fn default() -> Self {
        Self { enabled: false, color: Color::rgb(175, 205, 235), start: 100.0, end: 500.0, density: 1.0 }
    }
}

impl FogConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure(self.start >= 0.0, "fog.start", "must not be negative")?;
        ensure(self.end >= self.start, "fog.end", "must not be smaller than start")?;
        ensure((0.0..=1.0).contains(&self.density), "fog.density", "must be within [0, 1]")
    }
}

/// Procedural cloud layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudConfig {
    /// Draw clouds
    pub enabled: bool,
    /// Drift speed in noise units per second
    pub speed: f32,
    /// Coverage in `[0, 1]`; higher means more cloud
    pub density: f32,
    /// Noise frequency in the cloud plane
    pub scale: f32,
    /// Edge sharpening exponent
    pub softness: f32,
    /// Altitude of the cloud plane above the camera
    pub height: f32,
    /// Vertical extent of the fade band as a fraction of the sky height
    pub thickness: f32,
    /// Brightness multiplier applied to the cloud colour
    pub brightness: f32,
    /// Pixel block size used when drawing
    pub resolution: u32,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            speed: 0.02,
            density: 0.5,
            scale: 0.004,
            softness: 1.5,
            height: 200.0,
            thickness: 0.8,
            brightness: 1.0,
            resolution: 4,
        }
    }
}

impl CloudConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure((0.0..=1.0).contains(&self.density), "clouds.density", "must be within [0, 1]")?;
        ensure(self.scale > 0.0, "clouds.scale", "must be positive")?;
        ensure(self.softness > 0.0, "clouds.softness", "must be positive")?;
        ensure(self.height > 0.0, "clouds.height", "must be positive")?;
        ensure(self.thickness > 0.0, "clouds.thickness", "must be positive")?;
        ensure(self.brightness >= 0.0, "clouds.brightness", "must not be negative")?;
        ensure(
            (1..=clouds::MAX_RESOLUTION).contains(&self.resolution),
            "clouds.resolution",
            "must be between 1 and 64",
        )
    }

    /// Key of the parameters baked into the cloud noise texture
    pub fn texture_key(&self) -> u64 {
        let mut hasher = ParamHasher::default();
        hash_floats(&mut hasher, &[self.density, self.softness]);
        hasher.finish()
    }
}

/// Animated water floor with sky reflections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterConfig {
    /// Render the floor as water
    pub enabled: bool,
    /// Wave animation speed
    pub speed: f32,
    /// Wave displacement in pixels
    pub wave_height: f32,
    /// Mirror the sky into the water
    pub reflection_enabled: bool,
    /// Reflection strength in `[0, 1]`
    pub reflection_opacity: f32,
    /// Horizontal sampling distortion in pixels
    pub reflection_distortion: f32,
    /// Draw animated sparkles on the surface
    pub shimmer: bool,
}

impl Default for WaterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            speed: 1.0,
            wave_height: 2.0,
            reflection_enabled: true,
            reflection_opacity: 0.45,
            reflection_distortion: 3.0,
            shimmer: true,
        }
    }
}

impl WaterConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure(self.wave_height >= 0.0, "water.wave_height", "must not be negative")?;
        ensure(
            (0.0..=1.0).contains(&self.reflection_opacity),
            "water.reflection_opacity",
            "must be within [0, 1]",
        )?;
        ensure(self.reflection_distortion >= 0.0, "water.reflection_distortion", "must not be negative")
    }

    /// Key of the parameters that shape the shimmer layout
    pub fn shimmer_key(&self) -> u64 {
        let mut hasher = ParamHasher::default();
        hash_floats(&mut hasher, &[self.wave_height, self.reflection_distortion]);
        hasher.finish()
    }
}

/// Seeded hill silhouette on the horizon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HillConfig {
    /// Draw hills
    pub enabled: bool,
    /// Profile seed
    pub seed: u64,
    /// Lowest silhouette height in pixels above the horizon
    pub min_height: f32,
    /// Highest silhouette height in pixels above the horizon
    pub max_height: f32,
    /// Number of base control points around the full circle
    pub frequency: u32,
    /// Fine jitter amount in `[0, 1]`
    pub roughness: f32,
    /// Colour at the foot of the hills
    pub base_color: Color,
    /// Colour at the crest
    pub peak_color: Color,
    /// Blend toward the fog colour with distance from screen centre
    pub fog_blend: bool,
}

impl Default for HillConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            seed: 1337,
            min_height: 8.0,
            max_height: 48.0,
            frequency: 6,
            roughness: 0.2,
            base_color: Color::rgb(60, 85, 70),
            peak_color: Color::rgb(110, 135, 120),
            fog_blend: true,
        }
    }
}

impl HillConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure(self.min_height >= 0.0, "hills.min_height", "must not be negative")?;
        ensure(self.max_height >= self.min_height, "hills.max_height", "must not be smaller than min_height")?;
        ensure(
            (1..=hills::MAX_FREQUENCY).contains(&self.frequency),
            "hills.frequency",
            "must be between 1 and 90",
        )?;
        ensure((0.0..=1.0).contains(&self.roughness), "hills.roughness", "must be within [0, 1]")
    }

    /// Key of the parameters that shape the height profile
    pub fn profile_key(&self) -> u64 {
        let mut hasher = ParamHasher::default();
        self.seed.hash(&mut hasher);
        self.frequency.hash(&mut hasher);
        hash_floats(&mut hasher, &[self.min_height, self.max_height, self.roughness]);
        hasher.finish()
    }
}

/// Sun disc drawn opposite the directional light
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SunConfig {
    /// Draw the sun
    pub enabled: bool,
    /// Core radius in pixels
    pub size: f32,
    /// Glow radius in pixels
    pub glow_size: f32,
    /// Sun tint
    pub color: Color,
}

impl Default for SunConfig {
    fn default() -> Self {
        Self { enabled: true, size: 10.0, glow_size: 48.0, color: Color::rgb(255, 240, 200) }
    }
}

impl SunConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure(self.size > 0.0, "sun.size", "must be positive")?;
        ensure(self.glow_size >= self.size, "sun.glow_size", "must not be smaller than size")
    }
}

/// Lens flare chain post effect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LensFlareConfig {
    /// Draw the flare
    pub enabled: bool,
    /// Overall brightness in `[0, 1]`
    pub intensity: f32,
    /// Number of flare elements
    pub count: u32,
    /// Distance between elements along the sun to centre vector, as a fraction of it
    pub spacing: f32,
    /// Radius of the first element in pixels
    pub size: f32,
    /// Tint elements along the chain like chromatic aberration
    pub color_shift: bool,
}

impl Default for LensFlareConfig {
    fn default() -> Self {
        Self { enabled: true, intensity: 0.6, count: 5, spacing: 0.35, size: 18.0, color_shift: true }
    }
}

impl LensFlareConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure((0.0..=1.0).contains(&self.intensity), "lens_flare.intensity", "must be within [0, 1]")?;
        ensure(self.spacing > 0.0, "lens_flare.spacing", "must be positive")?;
        ensure(self.size > 0.0, "lens_flare.size", "must be positive")
    }
}

/// Phong highlight options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecularConfig {
    /// Draw highlights
    pub enabled: bool,
    /// Keep only the strongest highlight per object
    pub per_mesh: bool,
    /// Fill the whole triangle instead of a disc
    pub full_face: bool,
    /// Draw a soft bloom around strong highlights
    pub bloom_enabled: bool,
    /// Bloom brightness multiplier
    pub bloom_intensity: f32,
    /// Bloom radius as a multiple of the highlight radius
    pub bloom_radius: f32,
    /// Highlights above this intensity bloom
    pub bloom_threshold: f32,
}

impl Default for SpecularConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            per_mesh: false,
            full_face: false,
            bloom_enabled: true,
            bloom_intensity: 0.5,
            bloom_radius: 2.5,
            bloom_threshold: 0.6,
        }
    }
}

impl SpecularConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure(self.bloom_intensity >= 0.0, "specular.bloom_intensity", "must not be negative")?;
        ensure(self.bloom_radius >= 1.0, "specular.bloom_radius", "must be at least 1")?;
        ensure(self.bloom_threshold >= 0.0, "specular.bloom_threshold", "must not be negative")
    }
}

/// Point light gathering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DynamicLightingConfig {
    /// Evaluate scene point lights
    pub enabled: bool,
    /// Upper bound on lights considered per frame
    pub max_lights: usize,
    /// Lights farther than this from the camera are ignored
    pub search_radius: f32,
    /// Draw lights as glowing billboards
    pub billboards: bool,
}

impl Default for DynamicLightingConfig {
    fn default() -> Self {
        Self { enabled: true, max_lights: 4, search_radius: 100.0, billboards: true }
    }
}

impl DynamicLightingConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure(self.search_radius > 0.0, "dynamic_lighting.search_radius", "must be positive")
    }
}

/// Complete renderer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RenderConfig {
    /// Projection and culling
    pub camera: CameraConfig,
    /// Background fill
    pub background: BackgroundConfig,
    /// Directional light and global terms
    pub lighting: LightingConfig,
    /// Distance fog
    pub fog: FogConfig,
    /// Cloud layer
    pub clouds: CloudConfig,
    /// Water floor
    pub water: WaterConfig,
    /// Hill silhouette
    pub hills: HillConfig,
    /// Sun disc
    pub sun: SunConfig,
    /// Lens flare
    pub lens_flare: LensFlareConfig,
    /// Specular highlights
    pub specular: SpecularConfig,
    /// Point lights
    pub dynamic_lighting: DynamicLightingConfig,
    /// Draw frame statistics into the corner of the frame
    pub debug_overlay: bool,
}

impl Config for RenderConfig {}

impl RenderConfig {
    /// Validate every group, reporting the first offending field
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.camera.validate()?;
        self.lighting.validate()?;
        self.fog.validate()?;
        self.clouds.validate()?;
        self.water.validate()?;
        self.hills.validate()?;
        self.sun.validate()?;
        self.lens_flare.validate()?;
        self.specular.validate()?;
        self.dynamic_lighting.validate()
    }

    /// Create a camera for a `width` x `height` viewport from the camera options
    pub fn build_camera(&self, width: usize, height: usize) -> RenderResult<Camera> {
        let options = &self.camera;
        let mut camera = Camera::new(width, height, options.field_of_view, options.near_plane, options.far_plane)?;
        camera.backface_culling = options.backface_culling;
        Ok(camera)
    }

    /// Push projection and culling options into a camera
    pub fn apply_to_camera(&self, camera: &mut Camera) -> RenderResult<()> {
        camera.set_field_of_view(self.camera.field_of_view)?;
        camera.set_clip_planes(self.camera.near_plane, self.camera.far_plane)?;
        camera.backface_culling = self.camera.backface_culling;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(RenderConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validation_names_offending_field() {
        let mut config = RenderConfig::default();
        config.fog.end = 10.0;
        config.fog.start = 20.0;
        match config.validate() {
            Err(ConfigError::InvalidValue { field, .. }) => assert_eq!(field, "fog.end"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: RenderConfig = toml::from_str(
            r#"
            debug_overlay = true
            [fog]
            enabled = true
            start = 50.0
            [background]
            mode = "solid"
            "#,
        )
        .unwrap();
        assert!(config.debug_overlay);
        assert!(config.fog.enabled);
        assert_eq!(config.fog.start, 50.0);
        assert_eq!(config.fog.end, FogConfig::default().end);
        assert_eq!(config.background.mode, BackgroundMode::Solid);
        assert_eq!(config.hills, HillConfig::default());
    }

    #[test]
    fn test_ron_round_trip() {
        let mut config = RenderConfig::default();
        config.hills.seed = 99;
        config.clouds.enabled = false;
        let text = ron::ser::to_string(&config).unwrap();
        let back: RenderConfig = ron::from_str(&text).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_profile_key_tracks_shape_parameters() {
        let a = HillConfig::default();
        let mut b = a.clone();
        assert_eq!(a.profile_key(), b.profile_key());
        b.base_color = Color::BLACK;
        assert_eq!(a.profile_key(), b.profile_key());
        b.seed += 1;
        assert_ne!(a.profile_key(), b.profile_key());
    }

    #[test]
    fn test_apply_to_camera() {
        let mut camera = Camera::new(64, 48, 60.0, 0.1, 100.0).unwrap();
        let mut config = RenderConfig::default();
        config.camera.field_of_view = 75.0;
        config.camera.backface_culling = false;
        config.apply_to_camera(&mut camera).unwrap();
        assert_eq!(camera.field_of_view(), 75.0);
        assert_eq!(camera.far_plane(), 1000.0);
        assert!(!camera.backface_culling);
    }

    #[test]
    fn test_build_camera_uses_configured_planes() {
        let mut config = RenderConfig::default();
        config.camera.near_plane = 0.5;
        config.camera.far_plane = 250.0;
        config.camera.backface_culling = false;
        let camera = config.build_camera(80, 60).unwrap();
        assert_eq!(camera.near_plane(), 0.5);
        assert_eq!(camera.far_plane(), 250.0);
        assert_eq!(camera.field_of_view(), config.camera.field_of_view);
        assert!(!camera.backface_culling);

        config.camera.far_plane = 0.2;
        assert!(config.build_camera(80, 60).is_err());
    }
}
