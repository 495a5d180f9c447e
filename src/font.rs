//! Fallback bitmap font for the overlay status text, used when no
//! TrueType face can be loaded. 3x5 glyphs, 3 bits per row.

use crate::canvas::{Canvas, Color};

pub fn draw_text_line(canvas: &mut Canvas, x: usize, y: usize, text: &str, color: Color, scale: usize) {
    let mut cx = x;
    for c in text.chars() {
        draw_char(canvas, cx, y, c, color, scale);
        cx += (3 * scale) + scale; // 3 wide + 1 spacing, scaled
    }
}

#[allow(dead_code)]
pub fn measure_text_width(text: &str, scale: usize) -> usize {
    text.len() * ((3 * scale) + scale)
}

fn draw_char(canvas: &mut Canvas, x: usize, y: usize, c: char, color: Color, scale: usize) {
    let map = match c.to_ascii_uppercase() {
        '0' => [0x7, 0x5, 0x5, 0x5, 0x7],
        '1' => [0x2, 0x6, 0x2, 0x2, 0x7],
        '2' => [0x7, 0x1, 0x7, 0x4, 0x7],
        '3' => [0x7, 0x1, 0x7, 0x1, 0x7],
        '4' => [0x5, 0x5, 0x7, 0x1, 0x1],
        '5' => [0x7, 0x4, 0x7, 0x1, 0x7],
        '6' => [0x7, 0x4, 0x7, 0x5, 0x7],
        '7' => [0x7, 0x1, 0x2, 0x4, 0x4],
        '8' => [0x7, 0x5, 0x7, 0x5, 0x7],
        '9' => [0x7, 0x5, 0x7, 0x1, 0x7],
        'A' => [0x2, 0x5, 0x7, 0x5, 0x5],
        'C' => [0x3, 0x4, 0x4, 0x4, 0x3],
        'D' => [0x6, 0x5, 0x5, 0x5, 0x6],
        'E' => [0x7, 0x4, 0x6, 0x4, 0x7],
        'G' => [0x3, 0x4, 0x5, 0x5, 0x3],
        'H' => [0x5, 0x5, 0x7, 0x5, 0x5],
        'I' => [0x7, 0x2, 0x2, 0x2, 0x7],
        'N' => [0x5, 0x7, 0x7, 0x7, 0x5],
        'O' => [0x2, 0x5, 0x5, 0x5, 0x2],
        'P' => [0x6, 0x5, 0x6, 0x4, 0x4],
        'S' => [0x3, 0x4, 0x2, 0x1, 0x6],
        'T' => [0x7, 0x2, 0x2, 0x2, 0x2],
        'U' => [0x5, 0x5, 0x5, 0x5, 0x7],
        ':' => [0x0, 0x2, 0x0, 0x2, 0x0],
        '.' => [0x0, 0x0, 0x0, 0x0, 0x2],
        '-' => [0x0, 0x0, 0x7, 0x0, 0x0],
        ' ' => [0x0, 0x0, 0x0, 0x0, 0x0],
        _ => [0x7, 0x5, 0x5, 0x5, 0x7], // unknown: box
    };

    for (row, bits) in map.iter().enumerate() {
        for col in 0..3 {
            if bits & (0x4 >> col) != 0 {
                for sy in 0..scale {
                    for sx in 0..scale {
                        canvas.put_pixel(
                            (x + col * scale + sx) as i32,
                            (y + row * scale + sy) as i32,
                            color,
                        );
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drawing_status_text_marks_pixels() {
        let mut c = Canvas::new(200, 20);
        draw_text_line(&mut c, 2, 2, "STATUS: PINCHING", (255, 255, 0), 2);
        assert!(c.buffer().iter().any(|&b| b != 0));
    }

    #[test]
    fn space_draws_nothing() {
        let mut c = Canvas::new(20, 20);
        draw_text_line(&mut c, 2, 2, " ", (255, 255, 255), 2);
        assert!(c.buffer().iter().all(|&b| b == 0));
    }

    #[test]
    fn width_scales_with_text_length() {
        assert_eq!(measure_text_width("AB", 2), 2 * 8);
    }
}
