use image::{ImageBuffer, Rgb};

/// One fixed-size RGB8 drawing surface. The app layers two of these:
/// a base surface carrying the mirrored video passthrough and an overlay
/// surface carrying markers, status text and the ink trail.
pub struct Canvas {
    buffer: Vec<u8>,
    width: usize,
    height: usize,
}

pub type Color = (u8, u8, u8);

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            buffer: vec![0; width * height * 3],
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut [u8] {
        &mut self.buffer
    }

    /// Full clear to black. Every overlay cycle starts here; there is no
    /// incremental diffing.
    pub fn clear(&mut self) {
        self.buffer.fill(0);
    }

    pub fn put_pixel(&mut self, x: i32, y: i32, color: Color) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let idx = (y as usize * self.width + x as usize) * 3;
        if idx + 2 < self.buffer.len() {
            self.buffer[idx] = color.0;
            self.buffer[idx + 1] = color.1;
            self.buffer[idx + 2] = color.2;
        }
    }

    /// Filled disc marker.
    pub fn fill_circle(&mut self, cx: f32, cy: f32, radius: i32, color: Color) {
        let mx = cx as i32;
        let my = cy as i32;
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy <= radius * radius {
                    self.put_pixel(mx + dx, my + dy, color);
                }
            }
        }
    }

    /// Straight line of the given width, plotted as discs along the span.
    pub fn draw_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, width: u32, color: Color) {
        let dx = x1 - x0;
        let dy = y1 - y0;
        let len = (dx * dx + dy * dy).sqrt();
        let steps = (len.ceil() as usize).max(1);
        let radius = (width as i32 / 2).max(0);
        for s in 0..=steps {
            let t = s as f32 / steps as f32;
            let px = x0 + dx * t;
            let py = y0 + dy * t;
            if radius == 0 {
                self.put_pixel(px as i32, py as i32, color);
            } else {
                self.fill_circle(px, py, radius, color);
            }
        }
    }

    /// Strokes a polyline through all points of one segment.
    pub fn stroke_path(&mut self, points: &[crate::types::DrawPoint], width: u32, color: Color) {
        for pair in points.windows(2) {
            self.draw_line(pair[0].x, pair[0].y, pair[1].x, pair[1].y, width, color);
        }
        // A single captured point still leaves a visible dot.
        if points.len() == 1 {
            self.fill_circle(points[0].x, points[0].y, (width as i32 / 2).max(1), color);
        }
    }

    /// Copies a camera frame onto the surface, horizontally mirrored and
    /// blended at the given opacity over the existing pixels. The frame is
    /// expected at the surface's own resolution; mismatches are clamped.
    pub fn blit_mirrored(
        &mut self,
        frame: &ImageBuffer<Rgb<u8>, Vec<u8>>,
        opacity: f32,
    ) {
        let w = self.width.min(frame.width() as usize);
        let h = self.height.min(frame.height() as usize);
        let a = opacity.clamp(0.0, 1.0);
        for y in 0..h {
            for x in 0..w {
                let src = frame.get_pixel((w - 1 - x) as u32, y as u32);
                let idx = (y * self.width + x) * 3;
                for c in 0..3 {
                    let old = self.buffer[idx + c] as f32;
                    self.buffer[idx + c] = (old * (1.0 - a) + src[c] as f32 * a) as u8;
                }
            }
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Color {
        let idx = (y * self.width + x) * 3;
        (self.buffer[idx], self.buffer[idx + 1], self.buffer[idx + 2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DrawPoint;

    #[test]
    fn clear_zeroes_every_pixel() {
        let mut c = Canvas::new(16, 16);
        c.fill_circle(8.0, 8.0, 3, (255, 0, 0));
        c.clear();
        assert!(c.buffer().iter().all(|&b| b == 0));
    }

    #[test]
    fn put_pixel_out_of_bounds_is_ignored() {
        let mut c = Canvas::new(8, 8);
        c.put_pixel(-1, 0, (255, 255, 255));
        c.put_pixel(0, -1, (255, 255, 255));
        c.put_pixel(8, 0, (255, 255, 255));
        c.put_pixel(0, 8, (255, 255, 255));
        assert!(c.buffer().iter().all(|&b| b == 0));
    }

    #[test]
    fn circle_center_is_filled() {
        let mut c = Canvas::new(32, 32);
        c.fill_circle(16.0, 16.0, 6, (0, 255, 0));
        assert_eq!(c.pixel(16, 16), (0, 255, 0));
        assert_eq!(c.pixel(16, 22), (0, 255, 0));
        assert_eq!(c.pixel(0, 0), (0, 0, 0));
    }

    #[test]
    fn line_touches_both_endpoints() {
        let mut c = Canvas::new(64, 64);
        c.draw_line(2.0, 2.0, 60.0, 40.0, 2, (0, 0, 255));
        assert_eq!(c.pixel(2, 2), (0, 0, 255));
        assert_eq!(c.pixel(60, 40), (0, 0, 255));
    }

    #[test]
    fn stroke_path_draws_single_point() {
        let mut c = Canvas::new(16, 16);
        c.stroke_path(&[DrawPoint::new(8.0, 8.0)], 6, (0, 0, 255));
        assert_eq!(c.pixel(8, 8), (0, 0, 255));
    }

    #[test]
    fn blit_mirrors_horizontally() {
        let mut frame = ImageBuffer::from_pixel(4, 4, Rgb([0u8, 0, 0]));
        frame.put_pixel(0, 0, Rgb([200, 0, 0]));
        let mut c = Canvas::new(4, 4);
        c.blit_mirrored(&frame, 1.0);
        // Leftmost source column lands on the right edge.
        assert_eq!(c.pixel(3, 0), (200, 0, 0));
        assert_eq!(c.pixel(0, 0), (0, 0, 0));
    }

    #[test]
    fn blit_applies_opacity() {
        let frame = ImageBuffer::from_pixel(2, 2, Rgb([200u8, 100, 50]));
        let mut c = Canvas::new(2, 2);
        c.blit_mirrored(&frame, 0.5);
        let (r, g, b) = c.pixel(0, 0);
        assert_eq!((r, g, b), (100, 50, 25));
    }
}
