//! Debug overlay drawn straight into the frame buffer
//!
//! Text uses a built-in 3x5 pixel font covering digits, upper-case letters
//! and a little punctuation. Lower-case input is upper-cased; anything else
//! renders as a blank cell.

use super::color::Color;
use super::framebuffer::FrameBuffer;
use super::stats::FrameStats;

/// Glyph cell width in font pixels
pub const GLYPH_WIDTH: i32 = 3;
/// Glyph cell height in font pixels
pub const GLYPH_HEIGHT: i32 = 5;

const ADVANCE: i32 = GLYPH_WIDTH + 1;
const LINE_HEIGHT: i32 = GLYPH_HEIGHT + 2;
const MARGIN: i32 = 2;

/// Rows of a glyph, three bits each with the leftmost pixel in bit 2
fn glyph(c: char) -> Option<[u8; 5]> {
    let rows = match c.to_ascii_uppercase() {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b010, 0b010],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b011, 0b100, 0b100, 0b100, 0b011],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b110, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b110, 0b100, 0b100],
        'G' => [0b011, 0b100, 0b101, 0b101, 0b011],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b001, 0b001, 0b001, 0b101, 0b010],
        'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'N' => [0b110, 0b101, 0b101, 0b101, 0b101],
        'O' => [0b010, 0b101, 0b101, 0b101, 0b010],
        'P' => [0b110, 0b101, 0b110, 0b100, 0b100],
        'Q' => [0b010, 0b101, 0b101, 0b110, 0b011],
        'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        'S' => [0b011, 0b100, 0b010, 0b001, 0b110],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b101, 0b010],
        'W' => [0b101, 0b101, 0b111, 0b111, 0b101],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        _ => return None,
    };
    Some(rows)
}

/// Width in pixels of `text` at `scale`
pub fn text_width(text: &str, scale: i32) -> i32 {
    let chars = text.chars().count() as i32;
    if chars == 0 {
        0
    } else {
        (chars * ADVANCE - 1) * scale.max(1)
    }
}

/// Draw `text` with its top-left corner at `(x, y)`, returning pixels written
pub fn draw_text(frame: &mut FrameBuffer, x: i32, y: i32, text: &str, scale: i32, color: Color) -> usize {
    let scale = scale.max(1);
    let mut written = 0;
    for (i, c) in text.chars().enumerate() {
        let Some(rows) = glyph(c) else { continue };
        let left = x + i as i32 * ADVANCE * scale;
        for (row, bits) in rows.iter().enumerate() {
            for column in 0..GLYPH_WIDTH {
                if bits & (0b100 >> column) == 0 {
                    continue;
                }
                let px = left + column * scale;
                let py = y + row as i32 * scale;
                for dy in 0..scale {
                    for dx in 0..scale {
                        if frame.get(px + dx, py + dy).is_some() {
                            frame.set(px + dx, py + dy, color);
                            written += 1;
                        }
                    }
                }
            }
        }
    }
    written
}

/// Overlay lines summarising a frame
pub fn stats_lines(stats: &FrameStats) -> [String; 3] {
    [
        format!("{:.2}MS OBJ {}", stats.frame_time_ms(), stats.objects),
        format!("TRI {}/{} CULL {} CLIP {}", stats.triangles, stats.faces, stats.culled, stats.clipped),
        format!("LIGHTS {} SPEC {}", stats.lights, stats.specular_highlights),
    ]
}

/// Draw frame statistics in the top-left corner over a darkened panel
pub fn draw_stats(frame: &mut FrameBuffer, stats: &FrameStats) {
    let lines = stats_lines(stats);
    let width = lines.iter().map(|line| text_width(line, 1)).max().unwrap_or(0) + MARGIN * 2;
    let height = lines.len() as i32 * LINE_HEIGHT + MARGIN;

    for y in 0..height {
        for x in 0..width {
            frame.blend(x, y, Color::BLACK, 0.6);
        }
    }
    for (i, line) in lines.iter().enumerate() {
        draw_text(frame, MARGIN, MARGIN + i as i32 * LINE_HEIGHT, line, 1, Color::WHITE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyph_pixels_match_font() {
        let mut frame = FrameBuffer::new(8, 8);
        frame.clear(Color::BLACK);
        // '1' has 1 + 2 + 1 + 1 + 3 lit pixels
        assert_eq!(draw_text(&mut frame, 0, 0, "1", 1, Color::WHITE), 8);
        assert_eq!(frame.get(1, 0), Some(Color::WHITE));
        assert_eq!(frame.get(0, 0), Some(Color::BLACK));
        assert_eq!(frame.get(0, 4), Some(Color::WHITE));
    }

    #[test]
    fn test_unknown_characters_are_blank_but_advance() {
        let mut frame = FrameBuffer::new(16, 8);
        assert_eq!(draw_text(&mut frame, 0, 0, "#?", 1, Color::WHITE), 0);
        assert_eq!(text_width("#?", 1), 7);
        assert_eq!(text_width("", 3), 0);
    }

    #[test]
    fn test_scaled_text_is_clipped_to_frame() {
        let mut frame = FrameBuffer::new(4, 4);
        let written = draw_text(&mut frame, 2, 2, "8", 2, Color::WHITE);
        assert!(written > 0 && written <= 4);
    }

    #[test]
    fn test_stats_panel_darkens_corner() {
        let mut frame = FrameBuffer::new(200, 40);
        frame.clear(Color::WHITE);
        draw_stats(&mut frame, &FrameStats::default());
        assert_ne!(frame.get(0, 0), Some(Color::WHITE));
        assert_eq!(frame.get(199, 39), Some(Color::WHITE));
    }
}
