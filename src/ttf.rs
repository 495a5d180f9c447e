use crate::canvas::{Canvas, Color};
use rusttype::{point, Font, Scale};
use std::fs;
use std::path::Path;

pub struct FontRenderer {
    font: Font<'static>,
}

impl FontRenderer {
    /// Searches common system font paths for the family. Returns None when
    /// nothing loads; the caller falls back to the bitmap font.
    pub fn try_load(family: &str) -> Option<Self> {
        let paths = [
            format!("/Library/Fonts/{}.ttf", family),
            format!("/System/Library/Fonts/{}.ttf", family),
            format!("/System/Library/Fonts/Supplemental/{}.ttf", family),
            format!("/usr/share/fonts/truetype/{}.ttf", family),
            format!("{}.ttf", family),
        ];

        for p in paths.iter() {
            if Path::new(p).exists() {
                if let Ok(data) = fs::read(p) {
                    if let Some(font) = Font::try_from_vec(data) {
                        println!("Loaded font from {}", p);
                        return Some(Self { font });
                    }
                }
            }
        }

        println!(
            "Could not find font family '{}'. Falling back to bitmap.",
            family
        );
        None
    }

    pub fn draw_text(&self, canvas: &mut Canvas, x: usize, y: usize, text: &str, color: Color, size_pt: f32) {
        let scale = Scale::uniform(size_pt);
        let v_metrics = self.font.v_metrics(scale);
        let start = point(x as f32, y as f32 + v_metrics.ascent);

        for glyph in self.font.layout(text, scale, start) {
            if let Some(bb) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, v| {
                    if v * 255.0 > 50.0 {
                        let px = bb.min.x + gx as i32;
                        let py = bb.min.y + gy as i32;
                        canvas.put_pixel(px, py, color);
                    }
                });
            }
        }
    }

    #[allow(dead_code)]
    pub fn measure_height(&self, size_pt: f32) -> usize {
        let scale = Scale::uniform(size_pt);
        let v_metrics = self.font.v_metrics(scale);
        (v_metrics.ascent - v_metrics.descent + v_metrics.line_gap) as usize
    }
}
