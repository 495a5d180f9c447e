use anyhow::Result;
use image::{imageops::FilterType, ImageBuffer, Rgb};
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Tensor;
use std::path::Path;

use crate::types::{landmark_index, HandFrame, Landmark};

/// The external landmark model boundary. One call per detection cycle,
/// zero or more hands per call. Non-reentrant per instance: the caller
/// must not issue a second call before the first returns.
pub trait HandDetector: Send {
    fn name(&self) -> String;
    fn detect(
        &mut self,
        frame: &ImageBuffer<Rgb<u8>, Vec<u8>>,
        timestamp_ms: u64,
    ) -> Result<Vec<HandFrame>>;
}

const INPUT_SIZE: u32 = 224;
const SCORE_THRESHOLD: f32 = 0.5;

/// ONNX-backed hand landmarker (MediaPipe hand_landmarker export):
/// 224x224 RGB in, 21 landmarks plus a presence score out.
pub struct OnnxHandDetector {
    session: Session,
}

impl OnnxHandDetector {
    pub fn new(model_path: &str) -> Result<Self> {
        println!("Loading hand landmarker from {}...", model_path);
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(4)?
            .with_execution_providers([
                ort::execution_providers::CoreMLExecutionProvider::default().build(),
                ort::execution_providers::CPUExecutionProvider::default().build(),
            ])?
            .commit_from_file(model_path)?;
        Ok(Self { session })
    }

    pub fn model_exists(model_path: &str) -> bool {
        Path::new(model_path).exists()
    }
}

impl HandDetector for OnnxHandDetector {
    fn name(&self) -> String {
        "Hand Landmarker (21 pts)".to_string()
    }

    fn detect(
        &mut self,
        frame: &ImageBuffer<Rgb<u8>, Vec<u8>>,
        _timestamp_ms: u64,
    ) -> Result<Vec<HandFrame>> {
        let size = INPUT_SIZE;
        let resized = image::imageops::resize(frame, size, size, FilterType::Triangle);

        // HWC -> NCHW planes, normalized to [0, 1]
        let mut input_data = Vec::with_capacity((3 * size * size) as usize);
        for c in 0..3usize {
            for y in 0..size {
                for x in 0..size {
                    let p = resized.get_pixel(x, y)[c];
                    input_data.push(p as f32 / 255.0);
                }
            }
        }

        let input_tensor =
            Tensor::from_array((vec![1usize, 3, size as usize, size as usize], input_data))?;
        let outputs = self.session.run(ort::inputs![input_tensor])?;

        let (_score_shape, score_data) = outputs["score"].try_extract_tensor::<f32>()?;
        if score_data.first().copied().unwrap_or(0.0) < SCORE_THRESHOLD {
            return Ok(Vec::new());
        }

        let (_lm_shape, lm_data) = outputs["landmarks"].try_extract_tensor::<f32>()?;
        if lm_data.len() < landmark_index::LANDMARK_COUNT * 3 {
            return Ok(Vec::new());
        }

        // Landmarks come back in input-pixel coordinates; normalize so
        // x and y land in [0, 1] like the rest of the pipeline expects.
        let mut points = Vec::with_capacity(landmark_index::LANDMARK_COUNT);
        for i in 0..landmark_index::LANDMARK_COUNT {
            points.push(Landmark::new(
                lm_data[i * 3] / size as f32,
                lm_data[i * 3 + 1] / size as f32,
                lm_data[i * 3 + 2] / size as f32,
            ));
        }

        Ok(vec![HandFrame::new(points)])
    }
}

/// Model-free detector for runs without a downloaded model and for tests.
/// Produces one hand whose index tip sweeps the frame and which pinches
/// in bursts, so the trail and segmentation paths get exercised.
pub struct SimulatedHandDetector {
    call_count: u32,
}

impl SimulatedHandDetector {
    pub fn new() -> Self {
        Self { call_count: 0 }
    }
}

impl Default for SimulatedHandDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl HandDetector for SimulatedHandDetector {
    fn name(&self) -> String {
        "No model (Simulated Hand)".to_string()
    }

    fn detect(
        &mut self,
        _frame: &ImageBuffer<Rgb<u8>, Vec<u8>>,
        _timestamp_ms: u64,
    ) -> Result<Vec<HandFrame>> {
        self.call_count += 1;
        let t = self.call_count as f32 * 0.08;

        // Index tip traces a slow circle around frame center.
        let ix = 0.5 + 0.3 * t.cos();
        let iy = 0.5 + 0.3 * t.sin();

        // Pinch for ~2 seconds out of every ~3 at the 100ms cadence.
        let pinching = self.call_count % 30 < 20;
        let thumb_offset = if pinching { 0.02 } else { 0.15 };

        let mut points = vec![Landmark::default(); landmark_index::LANDMARK_COUNT];
        points[landmark_index::WRIST] = Landmark::new(ix, (iy + 0.3).min(1.0), 0.0);
        points[landmark_index::INDEX_FINGER_TIP] = Landmark::new(ix, iy, 0.0);
        points[landmark_index::THUMB_TIP] =
            Landmark::new((ix + thumb_offset).min(1.0), iy, 0.0);

        Ok(vec![HandFrame::new(points)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture;

    fn blank_frame() -> ImageBuffer<Rgb<u8>, Vec<u8>> {
        ImageBuffer::from_pixel(64, 64, Rgb([0, 0, 0]))
    }

    #[test]
    fn simulated_detector_returns_full_hand() {
        let mut det = SimulatedHandDetector::new();
        let hands = det.detect(&blank_frame(), 0).unwrap();
        assert_eq!(hands.len(), 1);
        assert_eq!(hands[0].points.len(), 21);
    }

    #[test]
    fn simulated_detector_pinches_in_bursts() {
        let mut det = SimulatedHandDetector::new();
        let frame = blank_frame();
        let mut saw_pinch = false;
        let mut saw_open = false;
        for i in 0..40 {
            let hands = det.detect(&frame, i * 100).unwrap();
            let state = gesture::classify(&hands[0]).unwrap();
            if state.pinching {
                saw_pinch = true;
            } else {
                saw_open = true;
            }
        }
        assert!(saw_pinch && saw_open);
    }

    #[test]
    fn simulated_landmarks_stay_normalized() {
        let mut det = SimulatedHandDetector::new();
        let frame = blank_frame();
        for i in 0..100 {
            let hands = det.detect(&frame, i).unwrap();
            for p in &hands[0].points {
                assert!(p.x >= 0.0 && p.x <= 1.0, "x out of range: {}", p.x);
                assert!(p.y >= 0.0 && p.y <= 1.0, "y out of range: {}", p.y);
            }
        }
    }
}
