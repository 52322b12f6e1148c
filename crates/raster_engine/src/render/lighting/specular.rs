//! # Specular Highlights
//!
//! Phong highlights are not evaluated per pixel. Each lit triangle queues a
//! screen-space highlight during shading, and the queue is flushed after all
//! geometry has been rasterized so highlights blend over finished surfaces.
//!
//! ## Highlight footprint
//! The highlight sits at the projected triangle centroid, pushed along the
//! camera-space reflection vector. Its radius grows with the triangle's screen
//! size, shrinks with shininess and shrinks with distance. This is a stylised
//! footprint, not an analytic one.
//!
//! ## Flush
//! - With `per_mesh`, only the strongest highlight of each object survives.
//! - Every highlight is occlusion tested against the frame's triangle list
//!   (camera to surface, and surface to light for positioned lights).
//! - Highlights draw as additive radial gradients, or as an additive fill of
//!   the whole triangle with `full_face`.
//! - Strong highlights get a second, larger and softer bloom pass.

use std::collections::BTreeMap;

use crate::foundation::math::{Vec2, Vec3};
use crate::render::color::Color;
use crate::render::config::SpecularConfig;
use crate::render::framebuffer::{DepthBuffer, FrameBuffer};
use crate::render::projection::View;
use crate::render::rasterizer::{fill_additive, radial_gradient, DepthGate};
use crate::render::triangle::{segment_blocked, Triangle};

/// Highlights are dropped once fog covers more than this fraction
pub const FOG_SUPPRESSION: f32 = 0.9;

/// Highlights weaker than this are not queued
const MIN_INTENSITY: f32 = 0.01;

const OCCLUSION_MARGIN: f32 = 1e-3;

/// Phong term `max(0, R·V)^shininess * light_intensity` with `R = 2(N·L)N - L`
///
/// All vectors must be unit length. Returns `0` when the light is behind the
/// surface.
pub fn phong(normal: &Vec3, to_light: &Vec3, to_view: &Vec3, shininess: f32, light_intensity: f32) -> f32 {
    let n_dot_l = normal.dot(to_light);
    if n_dot_l <= 0.0 {
        return 0.0;
    }
    let reflection = normal * (2.0 * n_dot_l) - to_light;
    reflection.dot(to_view).max(0.0).powf(shininess.max(1.0)) * light_intensity
}

/// Light description used for a single highlight
#[derive(Debug, Clone, Copy)]
pub struct HighlightLight {
    /// Unit direction from the surface toward the light
    pub to_light: Vec3,
    /// Light tint
    pub color: Color,
    /// Light strength
    pub intensity: f32,
    /// World position for positioned lights; `None` for the directional light
    pub position: Option<Vec3>,
}

/// Queued highlight
#[derive(Debug, Clone, Copy)]
pub struct SpecularHighlight {
    /// Screen-space centre
    pub center: Vec2,
    /// Screen-space radius in pixels
    pub radius: f32,
    /// Additive colour on a 0-255 scale
    pub rgb: [f32; 3],
    /// Phong intensity before tinting
    pub intensity: f32,
    /// Camera-space depth of the source triangle
    pub depth: f32,
    /// Index of the source triangle in the frame's triangle list
    pub triangle: usize,
    /// Owning object index
    pub object: usize,
    surface: Vec3,
    normal: Vec3,
    light_position: Option<Vec3>,
}

/// Highlight queue for one frame
#[derive(Debug, Clone, Default)]
pub struct SpecularPass {
    config: SpecularConfig,
    queue: Vec<SpecularHighlight>,
}

impl SpecularPass {
    /// Empty pass using `config`
    pub fn new(config: SpecularConfig) -> Self {
        Self { config, queue: Vec::new() }
    }

    /// Replace the configuration
    pub fn set_config(&mut self, config: SpecularConfig) {
        self.config = config;
    }

    /// Current configuration
    pub fn config(&self) -> &SpecularConfig {
        &self.config
    }

    /// Drop every queued highlight
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    /// Queued highlights
    pub fn queued(&self) -> &[SpecularHighlight] {
        &self.queue
    }

    /// Queue the highlight `light` produces on `triangle`, if any
    ///
    /// `index` is the triangle's position in the frame's triangle list.
    pub fn queue(&mut self, view: &View, triangle: &Triangle, index: usize, light: &HighlightLight, fog_factor: f32) {
        if !self.config.enabled || fog_factor > FOG_SUPPRESSION {
            return;
        }

        let material = &triangle.material;
        let Some(to_view) = (view.position() - triangle.centroid).try_normalize(1e-9) else {
            return;
        };
        let n = triangle.normal;
        let l = light.to_light;
        let intensity = phong(&n, &l, &to_view, material.shininess, light.intensity);
        if intensity < MIN_INTENSITY {
            return;
        }

        let reflection = n * (2.0 * n.dot(&l)) - l;
        let reflection_cam = view.rotate_to_camera(&reflection);
        let extent = triangle.screen_extent();
        let center = triangle.screen_centroid() + Vec2::new(reflection_cam.y, -reflection_cam.z) * extent * 0.25;

        let shininess_scale = (32.0 / material.shininess.max(1.0)).sqrt().clamp(0.35, 2.5);
        let distance_scale = (20.0 / (20.0 + triangle.average_depth)).max(0.2);
        let radius = (extent * 0.3 * shininess_scale * distance_scale).clamp(1.5, 64.0);

        let [sr, sg, sb] = material.specular.to_rgb_f32();
        let [lr, lg, lb] = light.color.to_rgb_f32();
        let strength = intensity * (1.0 - fog_factor);
        let rgb = [sr / 255.0 * lr * strength, sg / 255.0 * lg * strength, sb / 255.0 * lb * strength];

        self.queue.push(SpecularHighlight {
            center,
            radius,
            rgb,
            intensity,
            depth: triangle.average_depth,
            triangle: index,
            object: triangle.object,
            surface: triangle.centroid,
            normal: n,
            light_position: light.position,
        });
    }

    /// Draw every queued highlight and empty the queue
    ///
    /// Returns the number of highlights that were drawn.
    pub fn flush(
        &mut self,
        frame: &mut FrameBuffer,
        depth: &DepthBuffer,
        triangles: &[Triangle],
        view: &View,
    ) -> usize {
        let highlights = if self.config.per_mesh {
            strongest_per_object(&self.queue)
        } else {
            self.queue.clone()
        };
        self.queue.clear();

        let mut drawn = 0;
        for highlight in &highlights {
            if is_occluded(highlight, triangles, view) {
                continue;
            }
            let gate = DepthGate {
                buffer: depth,
                depth: highlight.depth,
                tolerance: highlight.depth * 0.05 + 0.5,
            };

            if self.config.full_face {
                let Some(triangle) = triangles.get(highlight.triangle) else {
                    continue;
                };
                if fill_additive(frame, depth, triangle, highlight.rgb, gate.tolerance).pixels() == 0 {
                    continue;
                }
            } else if radial_gradient(frame, &highlight.center, highlight.radius, highlight.rgb, 2.0, Some(gate)) == 0 {
                continue;
            }
            drawn += 1;

            if self.config.bloom_enabled && highlight.intensity > self.config.bloom_threshold {
                let excess = (highlight.intensity - self.config.bloom_threshold).min(1.0);
                let scale = self.config.bloom_intensity * excess;
                let rgb = highlight.rgb.map(|c| c * scale);
                radial_gradient(
                    frame,
                    &highlight.center,
                    highlight.radius * self.config.bloom_radius,
                    rgb,
                    3.0,
                    Some(gate),
                );
            }
        }

        log::trace!("Flushed {drawn} of {} specular highlights", highlights.len());
        drawn
    }
}

fn strongest_per_object(queue: &[SpecularHighlight]) -> Vec<SpecularHighlight> {
    let mut best: BTreeMap<usize, SpecularHighlight> = BTreeMap::new();
    for highlight in queue {
        best.entry(highlight.object)
            .and_modify(|current| {
                if highlight.intensity > current.intensity {
                    *current = *highlight;
                }
            })
            .or_insert(*highlight);
    }
    best.into_values().collect()
}

fn is_occluded(highlight: &SpecularHighlight, triangles: &[Triangle], view: &View) -> bool {
    if segment_blocked(&view.position(), &highlight.surface, triangles, Some(highlight.triangle), OCCLUSION_MARGIN) {
        return true;
    }
    highlight.light_position.is_some_and(|light| {
        let origin = highlight.surface + highlight.normal * OCCLUSION_MARGIN;
        segment_blocked(&origin, &light, triangles, Some(highlight.triangle), OCCLUSION_MARGIN)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::clipper::ClipVertex;
    use crate::render::material::Material;
    use crate::render::rasterizer::fill_flat;
    use crate::render::Camera;
    use approx::assert_relative_eq;
    use std::sync::Arc;

    fn view() -> View {
        View::new(&Camera::new(64, 64, 90.0, 0.1, 100.0).unwrap())
    }

    // Camera sits at the origin with no rotation, so world == camera space
    fn facing_quad_half(depth: f32, half: f32, object: usize) -> Triangle {
        let corner = |y: f32, z: f32| {
            let p = Vec3::new(depth, y, z);
            ClipVertex { camera: p, world: p, uv: Vec2::zeros() }
        };
        let corners = [corner(-half, -half), corner(-half, half), corner(half, -half)];
        Triangle::from_clipped(&corners, &view(), Arc::new(Material::default()), object).unwrap()
    }

    fn headlight() -> HighlightLight {
        HighlightLight { to_light: -Vec3::x(), color: Color::WHITE, intensity: 1.0, position: None }
    }

    #[test]
    fn test_phong_head_on_is_full_intensity() {
        let n = -Vec3::x();
        assert_relative_eq!(phong(&n, &n, &n, 32.0, 0.8), 0.8, epsilon = 1e-5);
        assert_eq!(phong(&n, &Vec3::x(), &n, 32.0, 1.0), 0.0);
    }

    #[test]
    fn test_fogged_highlights_are_not_queued() {
        let mut pass = SpecularPass::new(SpecularConfig::default());
        let tri = facing_quad_half(5.0, 1.0, 0);
        pass.queue(&view(), &tri, 0, &headlight(), 0.95);
        assert!(pass.queued().is_empty());
        pass.queue(&view(), &tri, 0, &headlight(), 0.5);
        assert_eq!(pass.queued().len(), 1);
    }

    #[test]
    fn test_disabled_pass_queues_nothing() {
        let config = SpecularConfig { enabled: false, ..SpecularConfig::default() };
        let mut pass = SpecularPass::new(config);
        pass.queue(&view(), &facing_quad_half(5.0, 1.0, 0), 0, &headlight(), 0.0);
        assert!(pass.queued().is_empty());
    }

    #[test]
    fn test_flush_brightens_visible_surface() {
        let view = view();
        let tri = facing_quad_half(5.0, 1.0, 0);
        let mut frame = FrameBuffer::new(64, 64);
        let mut depth = DepthBuffer::new(64, 64);
        fill_flat(&mut frame, &mut depth, &tri, Color::rgb(40, 40, 40));
        let center = tri.screen_centroid();
        let (cx, cy) = (center.x as i32, center.y as i32);
        let before = frame.get(cx, cy).unwrap();

        let mut pass = SpecularPass::new(SpecularConfig::default());
        pass.queue(&view, &tri, 0, &headlight(), 0.0);
        let triangles = vec![tri];
        assert_eq!(pass.flush(&mut frame, &depth, &triangles, &view), 1);
        assert!(frame.get(cx, cy).unwrap().r > before.r);
        assert!(pass.queued().is_empty());
    }

    #[test]
    fn test_full_face_lights_whole_triangle_evenly() {
        let view = view();
        let tri = facing_quad_half(5.0, 1.0, 0);
        let base = Color::rgb(40, 40, 40);
        let mut frame = FrameBuffer::new(64, 64);
        let mut depth = DepthBuffer::new(64, 64);
        fill_flat(&mut frame, &mut depth, &tri, base);
        let covered: Vec<(i32, i32)> = (0..64)
            .flat_map(|y| (0..64).map(move |x| (x, y)))
            .filter(|&(x, y)| frame.get(x, y) == Some(base))
            .collect();
        assert!(covered.len() > 10);

        let config = SpecularConfig { full_face: true, bloom_enabled: false, ..SpecularConfig::default() };
        let mut pass = SpecularPass::new(config);
        pass.queue(&view, &tri, 0, &headlight(), 0.0);
        let triangles = vec![tri];
        assert_eq!(pass.flush(&mut frame, &depth, &triangles, &view), 1);

        let lit = frame.get(covered[0].0, covered[0].1).unwrap();
        assert!(lit.r > base.r);
        for &(x, y) in &covered {
            assert_eq!(frame.get(x, y), Some(lit));
        }
        assert_eq!(frame.get(0, 0), Some(Color::TRANSPARENT));
    }

    #[test]
    fn test_bloom_adds_glow_above_threshold() {
        let view = view();
        let render = |config: SpecularConfig| {
            let tri = facing_quad_half(5.0, 1.0, 0);
            let mut frame = FrameBuffer::new(64, 64);
            let mut depth = DepthBuffer::new(64, 64);
            fill_flat(&mut frame, &mut depth, &tri, Color::rgb(40, 40, 40));
            let mut pass = SpecularPass::new(config);
            pass.queue(&view, &tri, 0, &headlight(), 0.0);
            assert!(pass.queued()[0].intensity > 0.6);
            let triangles = vec![tri];
            pass.flush(&mut frame, &depth, &triangles, &view);
            frame.pixels().iter().flat_map(|p| p[..3].iter()).map(|&c| u64::from(c)).sum::<u64>()
        };

        let plain = render(SpecularConfig { bloom_enabled: false, ..SpecularConfig::default() });
        let bloomed = render(SpecularConfig::default());
        let high_threshold = render(SpecularConfig { bloom_threshold: 1.0, ..SpecularConfig::default() });
        assert!(bloomed > plain);
        assert_eq!(high_threshold, plain);
    }

    #[test]
    fn test_occluded_highlight_is_skipped() {
        let view = view();
        let surface = facing_quad_half(5.0, 1.0, 0);
        let blocker = facing_quad_half(2.0, 3.0, 1);
        let mut frame = FrameBuffer::new(64, 64);
        let depth = DepthBuffer::new(64, 64);
        let mut pass = SpecularPass::new(SpecularConfig::default());
        pass.queue(&view, &surface, 0, &headlight(), 0.0);
        let triangles = vec![surface, blocker];
        assert_eq!(pass.flush(&mut frame, &depth, &triangles, &view), 0);
    }

    #[test]
    fn test_per_mesh_keeps_strongest() {
        let view = view();
        let config = SpecularConfig { per_mesh: true, ..SpecularConfig::default() };
        let mut pass = SpecularPass::new(config);
        let tri = facing_quad_half(5.0, 1.0, 3);
        let weak = HighlightLight { intensity: 0.2, ..headlight() };
        pass.queue(&view, &tri, 0, &weak, 0.0);
        pass.queue(&view, &tri, 0, &headlight(), 0.0);
        let kept = strongest_per_object(pass.queued());
        assert_eq!(kept.len(), 1);
        assert!(kept[0].intensity > 0.5);
    }
}
