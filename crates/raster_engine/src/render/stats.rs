//! Per-frame counters

use std::fmt;
use std::time::Duration;

/// Statistics gathered while rendering a single frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameStats {
    /// Mesh faces considered
    pub faces: usize,
    /// Triangles that reached the rasterizer
    pub triangles: usize,
    /// Faces rejected by backface culling
    pub culled: usize,
    /// Faces removed completely by the near plane
    pub clipped: usize,
    /// Faces or triangles skipped for having no area
    pub degenerate: usize,
    /// Objects rejected by the frustum test
    pub frustum_culled: usize,
    /// Active objects in the scene
    pub objects: usize,
    /// Point lights considered this frame
    pub lights: usize,
    /// Specular highlights drawn
    pub specular_highlights: usize,
    /// Pixels written by triangle fills
    pub pixels: usize,
    /// Wall time spent in `render_frame`
    pub render_duration: Duration,
}

impl FrameStats {
    /// Frame time in milliseconds
    pub fn frame_time_ms(&self) -> f32 {
        self.render_duration.as_secs_f32() * 1000.0
    }

    /// Fraction of considered faces that were culled or clipped away
    pub fn rejection_ratio(&self) -> f32 {
        if self.faces == 0 {
            0.0
        } else {
            (self.culled + self.clipped + self.degenerate) as f32 / self.faces as f32
        }
    }
}

impl fmt::Display for FrameStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.2}ms obj {} tri {}/{} cull {} clip {} deg {} frus {} lights {} spec {}",
            self.frame_time_ms(),
            self.objects,
            self.triangles,
            self.faces,
            self.culled,
            self.clipped,
            self.degenerate,
            self.frustum_culled,
            self.lights,
            self.specular_highlights,
        )
    }
}
