//! # Frame Orchestrator
//!
//! [`Renderer::render_frame`] walks a fixed [`FrameStage`] sequence once per
//! call:
//!
//! ```text
//! Idle → ClearBuffers → BuildTriangleList → SortByDepth → ShadeAndRasterize
//!      → FlushSpecular → CompositeBackgroundEffects → [DebugOverlay] → Done
//! ```
//!
//! Every frame starts from cleared buffers and an empty triangle list. The
//! only state carried between frames is the background's parameter-keyed
//! caches, which [`Renderer::apply_config`] invalidates.

use std::sync::Arc;

use crate::foundation::math::Vec3;
use crate::foundation::time::Stopwatch;

use super::background::BackgroundRenderer;
use super::camera::Camera;
use super::clipper::{clip_near, fan_triangulate, ClipVertex};
use super::config::RenderConfig;
use super::culler::{classify, CullResult};
use super::error::RenderResult;
use super::framebuffer::{DepthBuffer, FrameBuffer};
use super::lighting::{HighlightLight, LightingEngine, SpecularPass};
use super::overlay;
use super::projection::View;
use super::rasterizer::{fill_flat, fill_textured, radial_gradient, sort_back_to_front, DepthGate, RasterOutcome};
use super::scene::{LightHandle, MeshHandle, ResolvedScene, Scene};
use super::stats::FrameStats;
use super::triangle::Triangle;

/// Billboard radius in pixels at unit depth
const BILLBOARD_SCALE: f32 = 40.0;
const BILLBOARD_MIN_RADIUS: f32 = 2.0;
const BILLBOARD_MAX_RADIUS: f32 = 24.0;

/// Steps of a single frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameStage {
    /// Between frames
    Idle,
    /// Reset depth and draw the background
    ClearBuffers,
    /// Resolve the scene, cull, clip and project faces
    BuildTriangleList,
    /// Painter's sort by average depth
    SortByDepth,
    /// Light each triangle and fill it
    ShadeAndRasterize,
    /// Draw the queued specular highlights
    FlushSpecular,
    /// Light billboards and the lens flare
    CompositeBackgroundEffects,
    /// Statistics text
    DebugOverlay,
    /// Frame complete
    Done,
}

impl FrameStage {
    /// Stage that follows this one
    ///
    /// [`FrameStage::DebugOverlay`] is only entered when `overlay` is set.
    /// `Done` wraps back to `Idle`.
    pub fn next(self, overlay: bool) -> Self {
        match self {
            Self::Idle => Self::ClearBuffers,
            Self::ClearBuffers => Self::BuildTriangleList,
            Self::BuildTriangleList => Self::SortByDepth,
            Self::SortByDepth => Self::ShadeAndRasterize,
            Self::ShadeAndRasterize => Self::FlushSpecular,
            Self::FlushSpecular => Self::CompositeBackgroundEffects,
            Self::CompositeBackgroundEffects if overlay => Self::DebugOverlay,
            Self::CompositeBackgroundEffects | Self::DebugOverlay => Self::Done,
            Self::Done => Self::Idle,
        }
    }
}

/// Software renderer driving the per-frame pipeline
#[derive(Debug)]
pub struct Renderer {
    config: RenderConfig,
    lighting: LightingEngine,
    background: BackgroundRenderer,
    specular: SpecularPass,
    triangles: Vec<Triangle>,
    highlights: Vec<HighlightLight>,
    stage: FrameStage,
    stats: FrameStats,
}

impl Renderer {
    /// Create a renderer from a validated configuration
    pub fn new(config: RenderConfig) -> RenderResult<Self> {
        config.validate()?;
        log::info!("Software renderer created (background {:?})", config.background.mode);
        Ok(Self {
            lighting: LightingEngine::from_config(&config),
            background: BackgroundRenderer::new(),
            specular: SpecularPass::new(config.specular.clone()),
            config,
            triangles: Vec::new(),
            highlights: Vec::new(),
            stage: FrameStage::Idle,
            stats: FrameStats::default(),
        })
    }

    /// Active configuration
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Replace the configuration
    ///
    /// The new configuration is validated first; on failure the previous one
    /// stays active. On success lighting is rebuilt and every background cache
    /// is invalidated.
    pub fn apply_config(&mut self, config: RenderConfig) -> RenderResult<()> {
        if let Err(err) = config.validate() {
            log::warn!("Rejected render configuration: {err}");
            return Err(err.into());
        }
        self.lighting = LightingEngine::from_config(&config);
        self.specular.set_config(config.specular.clone());
        self.background.invalidate();
        self.config = config;
        log::info!("Render configuration applied");
        Ok(())
    }

    /// Statistics of the last frame
    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    /// Stage the renderer is in; `Done` after a frame, `Idle` before the first
    pub fn stage(&self) -> FrameStage {
        self.stage
    }

    /// Background renderer and its caches
    pub fn background(&self) -> &BackgroundRenderer {
        &self.background
    }

    /// Triangles of the last frame in draw order
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Render one frame of `scene` into the camera's buffers
    ///
    /// `time` drives water, shimmer and cloud animation. The frame path never
    /// fails: bad geometry is skipped and counted in the returned statistics.
    pub fn render_frame(&mut self, camera: &mut Camera, scene: &Scene, time: f32) -> &FrameStats {
        let stopwatch = Stopwatch::start_new();
        let view = View::new(camera);
        let (frame, depth) = camera.targets_mut();
        let overlay = self.config.debug_overlay;

        self.stats = FrameStats::default();
        self.triangles.clear();
        self.specular.clear();
        let mut resolved = ResolvedScene::default();

        let mut stage = FrameStage::Idle;
        loop {
            stage = stage.next(overlay);
            self.stage = stage;
            log::trace!("Frame stage {stage:?}");

            match stage {
                FrameStage::ClearBuffers => {
                    depth.clear();
                    self.background.draw(frame, &view, &self.config, time);
                }
                FrameStage::BuildTriangleList => {
                    resolved = scene.resolve(&view.position(), &self.config.dynamic_lighting);
                    self.stats.objects = resolved.active_objects;
                    self.stats.lights = resolved.lights.len();
                    for (index, mesh) in resolved.meshes.iter().enumerate() {
                        self.build_object(&view, mesh, index);
                    }
                    self.stats.triangles = self.triangles.len();
                }
                FrameStage::SortByDepth => sort_back_to_front(&mut self.triangles),
                FrameStage::ShadeAndRasterize => self.shade_and_rasterize(frame, depth, &view, &resolved.lights),
                FrameStage::FlushSpecular => {
                    self.stats.specular_highlights = self.specular.flush(frame, depth, &self.triangles, &view);
                }
                FrameStage::CompositeBackgroundEffects => {
                    if self.config.dynamic_lighting.billboards {
                        for light in &resolved.lights {
                            draw_light_billboard(frame, depth, &view, light);
                        }
                    }
                    self.background.draw_lens_flare(frame, depth, &view, &self.config);
                }
                FrameStage::DebugOverlay => {
                    self.stats.render_duration = stopwatch.elapsed();
                    overlay::draw_stats(frame, &self.stats);
                }
                FrameStage::Done => break,
                FrameStage::Idle => {}
            }
        }

        self.stats.render_duration = stopwatch.elapsed();
        log::debug!("Frame rendered: {}", self.stats);
        &self.stats
    }

    /// Transform, cull and clip one object's faces into the triangle list
    fn build_object(&mut self, view: &View, handle: &MeshHandle, object: usize) {
        let center = view.to_camera(&handle.transform.position);
        if !view.sphere_in_frustum(&center, handle.bounding_radius) {
            self.stats.frustum_culled += 1;
            return;
        }

        let mesh = &handle.mesh;
        let world: Vec<Vec3> = mesh.vertices().iter().map(|v| handle.transform.transform_point(v)).collect();
        let camera: Vec<Vec3> = world.iter().map(|w| view.to_camera(w)).collect();
        let culling = view.backface_culling();

        for face in mesh.faces() {
            self.stats.faces += 1;

            let corners: Option<Vec<ClipVertex>> = face
                .indices
                .iter()
                .enumerate()
                .map(|(i, &v)| {
                    Some(ClipVertex { camera: *camera.get(v)?, world: *world.get(v)?, uv: face.uv(i) })
                })
                .collect();
            let (Some(corners), Some(material)) = (corners, mesh.materials().get(face.material)) else {
                self.stats.degenerate += 1;
                continue;
            };
            if corners.len() < 3 {
                self.stats.degenerate += 1;
                continue;
            }

            match classify(&corners[0].camera, &corners[1].camera, &corners[2].camera, culling) {
                CullResult::Visible => {}
                CullResult::BackFacing => {
                    self.stats.culled += 1;
                    continue;
                }
                CullResult::Degenerate => {
                    self.stats.degenerate += 1;
                    continue;
                }
            }

            let clipped = clip_near(&corners, view.near());
            if clipped.len() < 3 {
                self.stats.clipped += 1;
                continue;
            }
            for corner_set in fan_triangulate(&clipped) {
                match Triangle::from_clipped(&corner_set, view, Arc::clone(material), object) {
                    Some(triangle) => self.triangles.push(triangle),
                    None => self.stats.degenerate += 1,
                }
            }
        }
    }

    fn shade_and_rasterize(&mut self, frame: &mut FrameBuffer, depth: &mut DepthBuffer, view: &View, lights: &[LightHandle]) {
        let mut highlights = std::mem::take(&mut self.highlights);

        for (index, triangle) in self.triangles.iter().enumerate() {
            let material = &triangle.material;
            if material.is_texture_pending() {
                continue;
            }

            let shading = self.lighting.shade(triangle, lights, &self.triangles, &mut highlights);
            let outcome = match material.ready_texture() {
                Some(texture) => fill_textured(frame, depth, triangle, texture, |texel| shading.apply(texel)),
                None => fill_flat(frame, depth, triangle, shading.apply(material.diffuse)),
            };

            match outcome {
                RasterOutcome::Drawn(pixels) => {
                    self.stats.pixels += pixels;
                    if pixels > 0 {
                        for light in &highlights {
                            self.specular.queue(view, triangle, index, light, shading.fog_factor);
                        }
                    }
                }
                RasterOutcome::Degenerate => self.stats.degenerate += 1,
                RasterOutcome::Offscreen => {}
            }
        }

        self.highlights = highlights;
    }
}

/// Glowing disc at a point light's screen position, hidden behind geometry
fn draw_light_billboard(frame: &mut FrameBuffer, depth: &DepthBuffer, view: &View, light: &LightHandle) -> usize {
    let camera = view.to_camera(&light.position());
    let Some(center) = view.project(&camera) else {
        return 0;
    };
    let radius = (BILLBOARD_SCALE / camera.x).clamp(BILLBOARD_MIN_RADIUS, BILLBOARD_MAX_RADIUS);
    let strength = light.intensity().clamp(0.0, 2.0);
    let rgb = light.color().to_rgb_f32().map(|c| c * strength);
    let gate = DepthGate { buffer: depth, depth: camera.x, tolerance: 0.5 };
    radial_gradient(frame, &center, radius, rgb, 2.0, Some(gate))
}
