use anyhow::{anyhow, Context, Result};
use colored::*;
use image::{ImageBuffer, Rgb};
use nokhwa::{
    pixel_format::RgbFormat,
    utils::{CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution},
    Camera,
};

use crate::types::consts;

/// Live video source. Requests 1920x1280 @ 30fps and falls back to the
/// closest format the device offers. Failure to acquire the device
/// propagates as a session-initialization error; there is no silent
/// empty stream.
pub struct CameraSource {
    camera: Camera,
    open: bool,
}

impl CameraSource {
    pub fn new(index: u32) -> Result<Self> {
        let cam_index = CameraIndex::Index(index);
        let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(
            CameraFormat::new(
                Resolution::new(consts::CAPTURE_WIDTH, consts::CAPTURE_HEIGHT),
                FrameFormat::MJPEG,
                consts::CAPTURE_FPS,
            ),
        ));
        let mut camera =
            Camera::new(cam_index, requested).context("Failed to create camera instance")?;

        camera
            .open_stream()
            .map_err(|e| anyhow!(e))
            .context("Failed to open camera stream")?;

        println!(
            "{}",
            format!("Opened camera: {}", camera.info().human_name()).green()
        );
        println!("Format: {}", camera.camera_format());

        Ok(Self { camera, open: true })
    }

    pub fn capture(&mut self) -> Result<ImageBuffer<Rgb<u8>, Vec<u8>>> {
        let frame = self
            .camera
            .frame()
            .map_err(|e| anyhow!(e))
            .context("Failed to get frame")?;
        let decoded = frame
            .decode_image::<RgbFormat>()
            .map_err(|e| anyhow!(e))
            .context("Failed to decode frame")?;
        Ok(decoded)
    }

    pub fn width(&self) -> u32 {
        self.camera.resolution().width()
    }

    pub fn height(&self) -> u32 {
        self.camera.resolution().height()
    }

    pub fn name(&self) -> String {
        self.camera.info().human_name()
    }

    /// Releases the capture stream. Safe to call more than once.
    pub fn stop(&mut self) {
        if self.open {
            let _ = self.camera.stop_stream();
            self.open = false;
        }
    }
}

impl Drop for CameraSource {
    fn drop(&mut self) {
        self.stop();
    }
}
