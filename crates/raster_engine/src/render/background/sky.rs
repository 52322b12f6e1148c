//! Horizon placement and sky/floor gradients

use crate::render::color::Color;
use crate::render::config::BackgroundConfig;
use crate::render::framebuffer::FrameBuffer;
use crate::render::projection::View;

/// Largest horizon shift from the screen centre, in half-screens
const MAX_HORIZON_SHIFT: f32 = 2.0;

/// Screen row of the horizon: `h/2 * (1 + clamp(tan(pitch) * f, -2, 2))`
///
/// Looking up moves the horizon down the screen. The result may lie outside
/// the viewport for steep pitches.
pub fn horizon_y(view: &View) -> f32 {
    let (sin, cos) = view.pitch_sin_cos();
    let shift = if cos.abs() < 1e-6 {
        MAX_HORIZON_SHIFT.copysign(sin)
    } else {
        (sin / cos * view.focal_length()).clamp(-MAX_HORIZON_SHIFT, MAX_HORIZON_SHIFT)
    };
    view.height() * 0.5 * (1.0 + shift)
}

/// Sky colour for row `y` given the horizon row
pub fn sky_color(config: &BackgroundConfig, y: f32, horizon: f32) -> Color {
    let t = if horizon > 0.0 { (y / horizon).clamp(0.0, 1.0) } else { 1.0 };
    config.sky_zenith.lerp(config.sky_horizon, t)
}

/// Floor colour for row `y`, with `offset` rows of wave displacement
pub fn floor_color(config: &BackgroundConfig, y: f32, horizon: f32, height: f32, offset: f32) -> Color {
    let span = (height - horizon).max(1.0);
    let t = ((y + offset - horizon) / span).clamp(0.0, 1.0);
    config.floor_horizon.lerp(config.floor_nadir, t)
}

/// Fill every row above the horizon with the sky gradient
pub fn draw_sky(frame: &mut FrameBuffer, config: &BackgroundConfig, horizon: f32) {
    let width = frame.width() as i32;
    let last = horizon.ceil().clamp(0.0, frame.height() as f32) as i32;
    for y in 0..last {
        let color = sky_color(config, y as f32 + 0.5, horizon);
        for x in 0..width {
            frame.set(x, y, color);
        }
    }
}

/// Fill every row below the horizon with the floor gradient
///
/// `wave` returns the displacement in rows for a pixel, letting the water
/// surface ripple the gradient.
pub fn draw_floor(frame: &mut FrameBuffer, config: &BackgroundConfig, horizon: f32, wave: impl Fn(f32, f32) -> f32) {
    let (width, height) = (frame.width() as i32, frame.height() as f32);
    let first = horizon.ceil().max(0.0) as i32;
    for y in first..height as i32 {
        let row = y as f32 + 0.5;
        for x in 0..width {
            let offset = wave(x as f32, row);
            frame.set(x, y, floor_color(config, row, horizon, height, offset));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::render::Camera;
    use approx::assert_relative_eq;

    fn view_with_pitch(pitch: f32) -> View {
        let camera = Camera::new(100, 80, 90.0, 0.1, 100.0)
            .unwrap()
            .with_rotation(Vec3::new(0.0, pitch, 0.0));
        View::new(&camera)
    }

    #[test]
    fn test_horizon_follows_pitch() {
        assert_relative_eq!(horizon_y(&view_with_pitch(0.0)), 40.0, epsilon = 1e-4);
        assert!(horizon_y(&view_with_pitch(20.0)) > 40.0);
        assert!(horizon_y(&view_with_pitch(-20.0)) < 40.0);
        // tan(45°) * f = 1 with a 90° field of view
        assert_relative_eq!(horizon_y(&view_with_pitch(45.0)), 80.0, epsilon = 1e-3);
        assert_relative_eq!(horizon_y(&view_with_pitch(89.0)), 120.0, epsilon = 1e-3);
    }

    #[test]
    fn test_gradients_meet_their_stops() {
        let config = BackgroundConfig::default();
        assert_eq!(sky_color(&config, 0.0, 50.0), config.sky_zenith);
        assert_eq!(sky_color(&config, 50.0, 50.0), config.sky_horizon);
        assert_eq!(floor_color(&config, 50.0, 50.0, 100.0, 0.0), config.floor_horizon);
        assert_eq!(floor_color(&config, 100.0, 50.0, 100.0, 0.0), config.floor_nadir);
    }

    #[test]
    fn test_sky_and_floor_split_at_horizon() {
        let config = BackgroundConfig::default();
        let mut frame = FrameBuffer::new(8, 10);
        draw_sky(&mut frame, &config, 5.0);
        draw_floor(&mut frame, &config, 5.0, |_, _| 0.0);
        assert_eq!(frame.get(3, 0), Some(sky_color(&config, 0.5, 5.0)));
        assert_eq!(frame.get(3, 4), Some(sky_color(&config, 4.5, 5.0)));
        assert_eq!(frame.get(3, 5), Some(floor_color(&config, 5.5, 5.0, 10.0, 0.0)));
    }
}
