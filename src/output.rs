use anyhow::Result;

use crate::canvas::Canvas;

/// Presents the layered surfaces in a desktop window. The base surface
/// carries the mirrored video passthrough; the overlay surface sits on
/// top with black treated as transparent, so the two are addressed
/// separately but shown composited.
pub struct WindowOutput {
    window: minifb::Window,
    buffer: Vec<u32>,
    width: usize,
    height: usize,
}

impl WindowOutput {
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self> {
        let mut window = minifb::Window::new(
            title,
            width,
            height,
            minifb::WindowOptions {
                resize: true,
                ..minifb::WindowOptions::default()
            },
        )
        .map_err(|e| anyhow::anyhow!("Failed to create window: {}", e))?;

        // The window update rate is the shared refresh signal both
        // cadences tick against.
        window.set_target_fps(60);

        Ok(Self {
            window,
            buffer: vec![0; width * height],
            width,
            height,
        })
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    pub fn is_key_down(&self, key: minifb::Key) -> bool {
        self.window.is_key_down(key)
    }

    pub fn present(&mut self, base: &Canvas, overlay: &Canvas) -> Result<()> {
        if self.buffer.len() != self.width * self.height {
            self.buffer.resize(self.width * self.height, 0);
        }

        let base_buf = base.buffer();
        let over_buf = overlay.buffer();

        for i in 0..self.buffer.len() {
            let idx = i * 3;
            if idx + 2 >= base_buf.len() {
                break;
            }
            let (r, g, b) = if idx + 2 < over_buf.len()
                && (over_buf[idx] | over_buf[idx + 1] | over_buf[idx + 2]) != 0
            {
                (over_buf[idx], over_buf[idx + 1], over_buf[idx + 2])
            } else {
                (base_buf[idx], base_buf[idx + 1], base_buf[idx + 2])
            };
            self.buffer[i] = ((r as u32) << 16) | ((g as u32) << 8) | b as u32;
        }

        self.window
            .update_with_buffer(&self.buffer, self.width, self.height)
            .map_err(|e| anyhow::anyhow!(e))
    }
}
