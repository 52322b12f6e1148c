//! Frame and depth buffers
//!
//! Both buffers are plain row-major arrays owned by the [`super::Camera`].
//! Every accessor takes signed coordinates and silently ignores writes that
//! fall outside the buffer, so callers never have to pre-clamp.

use super::color::Color;

/// Packed RGBA colour buffer
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    pixels: Vec<[u8; 4]>,
}

impl FrameBuffer {
    /// Allocate a buffer filled with transparent black
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::TRANSPARENT.to_rgba(); width * height],
        }
    }

    /// Width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Resize the buffer, discarding its contents
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(width * height, Color::TRANSPARENT.to_rgba());
    }

    /// Fill every pixel with `color`
    pub fn clear(&mut self, color: Color) {
        self.pixels.fill(color.to_rgba());
    }

    /// Row-major packed pixels
    pub fn pixels(&self) -> &[[u8; 4]] {
        &self.pixels
    }

    /// Raw `RGBA8` bytes, suitable for texture upload or image encoding
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            Some(y as usize * self.width + x as usize)
        } else {
            None
        }
    }

    /// Colour at `(x, y)`, or `None` outside the buffer
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<Color> {
        self.index(x, y).map(|i| Color::from_rgba(self.pixels[i]))
    }

    /// Overwrite the pixel at `(x, y)`
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, color: Color) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color.to_rgba();
        }
    }

    /// Add `rgb` (0-255 scale) to the pixel, saturating per channel
    #[inline]
    pub fn add(&mut self, x: i32, y: i32, rgb: [f32; 3]) {
        if let Some(i) = self.index(x, y) {
            let [r, g, b, a] = self.pixels[i];
            let sum = Color::from_rgb_f32(
                f32::from(r) + rgb[0],
                f32::from(g) + rgb[1],
                f32::from(b) + rgb[2],
            );
            // Light added on top of a transparent background becomes visible
            self.pixels[i] = [sum.r, sum.g, sum.b, a.max(sum.r.max(sum.g).max(sum.b))];
        }
    }

    /// Blend `color` over the pixel with coverage `alpha` in `[0, 1]`
    #[inline]
    pub fn blend(&mut self, x: i32, y: i32, color: Color, alpha: f32) {
        if let Some(i) = self.index(x, y) {
            let dst = Color::from_rgba(self.pixels[i]);
            let alpha = alpha.clamp(0.0, 1.0);
            let mut out = dst.lerp(color, alpha);
            out.a = super::color::channel(f32::from(dst.a) + (255.0 - f32::from(dst.a)) * alpha);
            self.pixels[i] = out.to_rgba();
        }
    }
}

/// Per-pixel camera-space depth
#[derive(Debug, Clone)]
pub struct DepthBuffer {
    width: usize,
    height: usize,
    depth: Vec<f32>,
}

impl DepthBuffer {
    /// Allocate a buffer with every sample at `+inf`
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            depth: vec![f32::INFINITY; width * height],
        }
    }

    /// Width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Resize the buffer, discarding its contents
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.depth.clear();
        self.depth.resize(width * height, f32::INFINITY);
    }

    /// Reset every sample to `+inf`
    pub fn clear(&mut self) {
        self.depth.fill(f32::INFINITY);
    }

    /// Row-major depth samples
    pub fn values(&self) -> &[f32] {
        &self.depth
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            Some(y as usize * self.width + x as usize)
        } else {
            None
        }
    }

    /// Depth at `(x, y)`; `None` outside the buffer
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<f32> {
        self.index(x, y).map(|i| self.depth[i])
    }

    /// Store `depth` when it is strictly closer than the current sample
    ///
    /// Returns whether the sample was written.
    #[inline]
    pub fn test_and_set(&mut self, x: i32, y: i32, depth: f32) -> bool {
        match self.index(x, y) {
            Some(i) if depth > 0.0 && depth < self.depth[i] => {
                self.depth[i] = depth;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds_access_is_ignored() {
        let mut frame = FrameBuffer::new(4, 3);
        frame.set(-1, 0, Color::WHITE);
        frame.set(4, 0, Color::WHITE);
        frame.set(0, 3, Color::WHITE);
        assert!(frame.pixels().iter().all(|p| *p == [0, 0, 0, 0]));
        assert_eq!(frame.get(4, 0), None);
    }

    #[test]
    fn test_additive_blend_saturates() {
        let mut frame = FrameBuffer::new(1, 1);
        frame.clear(Color::rgb(200, 10, 0));
        frame.add(0, 0, [100.0, 20.0, 0.0]);
        assert_eq!(frame.get(0, 0), Some(Color::rgb(255, 30, 0)));
    }

    #[test]
    fn test_depth_only_accepts_closer_samples() {
        let mut depth = DepthBuffer::new(2, 2);
        assert!(depth.test_and_set(1, 1, 5.0));
        assert!(!depth.test_and_set(1, 1, 5.0));
        assert!(!depth.test_and_set(1, 1, 7.0));
        assert!(depth.test_and_set(1, 1, 2.0));
        assert!(!depth.test_and_set(1, 1, -1.0));
        assert_eq!(depth.get(1, 1), Some(2.0));
        depth.clear();
        assert_eq!(depth.get(1, 1), Some(f32::INFINITY));
    }

    #[test]
    fn test_resize_discards_contents() {
        let mut frame = FrameBuffer::new(2, 2);
        frame.clear(Color::WHITE);
        frame.resize(3, 1);
        assert_eq!(frame.pixels().len(), 3);
        assert_eq!(frame.as_bytes().len(), 12);
        assert!(frame.pixels().iter().all(|p| *p == [0, 0, 0, 0]));
    }
}
