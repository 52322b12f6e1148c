//! # Rasterizer
//!
//! Edge-function triangle fill with a per-pixel depth test, plus the small set
//! of additive primitives used by specular highlights, light billboards and
//! the sun/lens-flare effects.
//!
//! ## Conventions
//! - Pixel centres are sampled at `(x + 0.5, y + 0.5)`.
//! - A pixel is covered when all three edge functions share the sign of the
//!   triangle's signed area (zero counts as inside), so both windings fill.
//! - Depth is interpolated linearly from camera-space forward distance:
//!   `d = d0·λ0 + d1·λ1 + d2·λ2`. A pixel is written only when `d` is strictly
//!   smaller than the stored depth.
//! - Texture coordinates are interpolated perspective-correctly.

use crate::foundation::math::Vec2;

use super::color::Color;
use super::framebuffer::{DepthBuffer, FrameBuffer};
use super::texture::Texture;
use super::triangle::Triangle;

/// Triangles with a smaller absolute screen area are skipped
pub const MIN_SCREEN_AREA: f32 = 1e-6;

/// Result of a fill call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterOutcome {
    /// Triangle was scanned; carries the number of pixels that passed the depth test
    Drawn(usize),
    /// Screen-space area too small to rasterize
    Degenerate,
    /// Bounding box lies entirely outside the buffer
    Offscreen,
}

impl RasterOutcome {
    /// Pixels written by this call
    pub fn pixels(self) -> usize {
        match self {
            Self::Drawn(count) => count,
            _ => 0,
        }
    }
}

#[inline]
fn edge(a: &Vec2, b: &Vec2, p: &Vec2) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

/// Walk every covered pixel of `screen`, calling `visit(x, y, barycentrics)`
///
/// Returns `Err` with the appropriate outcome when nothing can be scanned.
fn scan(
    screen: [Vec2; 3],
    width: usize,
    height: usize,
    mut visit: impl FnMut(i32, i32, [f32; 3]),
) -> Result<(), RasterOutcome> {
    let [a, b, c] = screen;
    let area = edge(&a, &b, &c);
    if !area.is_finite() || area.abs() < MIN_SCREEN_AREA {
        return Err(RasterOutcome::Degenerate);
    }

    let min_x = a.x.min(b.x).min(c.x).floor().max(0.0);
    let min_y = a.y.min(b.y).min(c.y).floor().max(0.0);
    let max_x = a.x.max(b.x).max(c.x).ceil().min(width as f32 - 1.0);
    let max_y = a.y.max(b.y).max(c.y).ceil().min(height as f32 - 1.0);
    if min_x > max_x || min_y > max_y {
        return Err(RasterOutcome::Offscreen);
    }

    let sign = area.signum();
    let inv_area = 1.0 / area;
    for y in min_y as i32..=max_y as i32 {
        for x in min_x as i32..=max_x as i32 {
            let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            let w0 = edge(&b, &c, &p);
            let w1 = edge(&c, &a, &p);
            let w2 = edge(&a, &b, &p);
            if w0 * sign >= 0.0 && w1 * sign >= 0.0 && w2 * sign >= 0.0 {
                visit(x, y, [w0 * inv_area, w1 * inv_area, w2 * inv_area]);
            }
        }
    }
    Ok(())
}

fn screen_of(triangle: &Triangle) -> [Vec2; 3] {
    [triangle.vertices[0].screen, triangle.vertices[1].screen, triangle.vertices[2].screen]
}

#[inline]
fn interpolate_depth(triangle: &Triangle, l: [f32; 3]) -> f32 {
    triangle.vertices[0].depth * l[0] + triangle.vertices[1].depth * l[1] + triangle.vertices[2].depth * l[2]
}

/// Depth-tested solid fill with a single pre-lit colour
pub fn fill_flat(frame: &mut FrameBuffer, depth: &mut DepthBuffer, triangle: &Triangle, color: Color) -> RasterOutcome {
    let mut written = 0;
    let result = scan(screen_of(triangle), frame.width(), frame.height(), |x, y, l| {
        let d = interpolate_depth(triangle, l);
        if depth.test_and_set(x, y, d) {
            frame.set(x, y, color);
            written += 1;
        }
    });
    match result {
        Ok(()) => RasterOutcome::Drawn(written),
        Err(outcome) => outcome,
    }
}

/// Depth-tested textured fill
///
/// `shade` converts each sampled texel into its final lit, fogged colour.
pub fn fill_textured(
    frame: &mut FrameBuffer,
    depth: &mut DepthBuffer,
    triangle: &Triangle,
    texture: &Texture,
    shade: impl Fn(Color) -> Color,
) -> RasterOutcome {
    let [v0, v1, v2] = &triangle.vertices;
    let inv_depth = [1.0 / v0.depth, 1.0 / v1.depth, 1.0 / v2.depth];
    let uv_over_depth = [v0.uv * inv_depth[0], v1.uv * inv_depth[1], v2.uv * inv_depth[2]];

    let mut written = 0;
    let result = scan(screen_of(triangle), frame.width(), frame.height(), |x, y, l| {
        let d = interpolate_depth(triangle, l);
        if !depth.test_and_set(x, y, d) {
            return;
        }
        let w = inv_depth[0] * l[0] + inv_depth[1] * l[1] + inv_depth[2] * l[2];
        let uv = if w.abs() > f32::EPSILON {
            (uv_over_depth[0] * l[0] + uv_over_depth[1] * l[1] + uv_over_depth[2] * l[2]) / w
        } else {
            v0.uv
        };
        frame.set(x, y, shade(texture.sample(&uv)));
        written += 1;
    });
    match result {
        Ok(()) => RasterOutcome::Drawn(written),
        Err(outcome) => outcome,
    }
}

/// Additive fill over the triangle's own visible pixels, without depth writes
///
/// A pixel receives `rgb` only when the triangle is the front-most surface
/// there (within `depth_tolerance`).
pub fn fill_additive(
    frame: &mut FrameBuffer,
    depth: &DepthBuffer,
    triangle: &Triangle,
    rgb: [f32; 3],
    depth_tolerance: f32,
) -> RasterOutcome {
    let mut written = 0;
    let result = scan(screen_of(triangle), frame.width(), frame.height(), |x, y, l| {
        let d = interpolate_depth(triangle, l);
        if depth.get(x, y).is_some_and(|stored| d <= stored + depth_tolerance) {
            frame.add(x, y, rgb);
            written += 1;
        }
    });
    match result {
        Ok(()) => RasterOutcome::Drawn(written),
        Err(outcome) => outcome,
    }
}

/// Optional depth gate for additive effects
#[derive(Debug, Clone, Copy)]
pub struct DepthGate<'a> {
    /// Depth buffer to compare against
    pub buffer: &'a DepthBuffer,
    /// Depth of the effect itself
    pub depth: f32,
    /// Allowed amount the effect may sit behind stored geometry
    pub tolerance: f32,
}

impl DepthGate<'_> {
    fn passes(&self, x: i32, y: i32) -> bool {
        self.buffer.get(x, y).is_some_and(|stored| self.depth <= stored + self.tolerance)
    }
}

/// Additive radial gradient disc
///
/// Intensity at distance `r` is `(1 - r / radius)^falloff`. Returns the number
/// of pixels touched.
pub fn radial_gradient(
    frame: &mut FrameBuffer,
    center: &Vec2,
    radius: f32,
    rgb: [f32; 3],
    falloff: f32,
    gate: Option<DepthGate<'_>>,
) -> usize {
    if !(radius > 0.0) || !center.x.is_finite() || !center.y.is_finite() {
        return 0;
    }
    let min_x = (center.x - radius).floor().max(0.0) as i32;
    let max_x = (center.x + radius).ceil().min(frame.width() as f32 - 1.0) as i32;
    let min_y = (center.y - radius).floor().max(0.0) as i32;
    let max_y = (center.y + radius).ceil().min(frame.height() as f32 - 1.0) as i32;

    let mut touched = 0;
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let dx = x as f32 + 0.5 - center.x;
            let dy = y as f32 + 0.5 - center.y;
            let r = (dx * dx + dy * dy).sqrt();
            if r >= radius || gate.as_ref().is_some_and(|g| !g.passes(x, y)) {
                continue;
            }
            let weight = (1.0 - r / radius).powf(falloff);
            frame.add(x, y, [rgb[0] * weight, rgb[1] * weight, rgb[2] * weight]);
            touched += 1;
        }
    }
    touched
}

/// Faint additive horizontal streak centred on `center`
///
/// Brightness falls off linearly along the streak and quadratically across it.
pub fn horizontal_streak(frame: &mut FrameBuffer, center: &Vec2, half_length: f32, thickness: f32, rgb: [f32; 3]) {
    if !(half_length > 0.0 && thickness > 0.0) {
        return;
    }
    let min_x = (center.x - half_length).floor().max(0.0) as i32;
    let max_x = (center.x + half_length).ceil().min(frame.width() as f32 - 1.0) as i32;
    let min_y = (center.y - thickness).floor().max(0.0) as i32;
    let max_y = (center.y + thickness).ceil().min(frame.height() as f32 - 1.0) as i32;
    for y in min_y..=max_y {
        let across = 1.0 - ((y as f32 + 0.5 - center.y) / thickness).abs();
        if across <= 0.0 {
            continue;
        }
        for x in min_x..=max_x {
            let along = 1.0 - ((x as f32 + 0.5 - center.x) / half_length).abs();
            if along <= 0.0 {
                continue;
            }
            let weight = along * across * across;
            frame.add(x, y, [rgb[0] * weight, rgb[1] * weight, rgb[2] * weight]);
        }
    }
}

/// Sort triangles back-to-front by average depth (painter's order)
pub fn sort_back_to_front(triangles: &mut [Triangle]) {
    triangles.sort_by(|a, b| b.average_depth.total_cmp(&a.average_depth));
}
