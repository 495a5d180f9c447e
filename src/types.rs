/// A single 3D hand landmark in model-normalized coordinates.
/// x and y are in [0, 1]; z is relative depth with no fixed range.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// One detected hand at one instant: 21 landmarks in MediaPipe order.
/// A malformed frame may carry fewer points; consumers must check.
#[derive(Debug, Clone, Default)]
pub struct HandFrame {
    pub points: Vec<Landmark>,
}

impl HandFrame {
    pub fn new(points: Vec<Landmark>) -> Self {
        Self { points }
    }

    pub fn thumb_tip(&self) -> Option<&Landmark> {
        self.points.get(landmark_index::THUMB_TIP)
    }

    pub fn index_tip(&self) -> Option<&Landmark> {
        self.points.get(landmark_index::INDEX_FINGER_TIP)
    }
}

/// Landmark indices (MediaPipe hand landmark model convention).
#[allow(dead_code)]
pub mod landmark_index {
    pub const WRIST: usize = 0;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_FINGER_TIP: usize = 8;
    pub const MIDDLE_FINGER_TIP: usize = 12;
    pub const RING_FINGER_TIP: usize = 16;
    pub const PINKY_TIP: usize = 20;
    pub const LANDMARK_COUNT: usize = 21;
}

/// Per-hand pinch classification for one detection cycle.
/// Recomputed from the current frame only; no hysteresis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureState {
    pub pinching: bool,
    pub distance: f32,
}

impl GestureState {
    pub fn label(&self) -> &'static str {
        if self.pinching {
            "PINCHING"
        } else {
            "OPEN"
        }
    }
}

/// A 2D point in display-surface pixel coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DrawPoint {
    pub x: f32,
    pub y: f32,
}

impl DrawPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Maps a normalized landmark to surface pixels, mirroring horizontally
    /// to match the front-facing-camera view. Every landmark-derived
    /// position must go through this, including trail capture points,
    /// or the live cursor and the drawn trail diverge.
    pub fn from_landmark(lm: &Landmark, surface_width: u32, surface_height: u32) -> Self {
        Self {
            x: (1.0 - lm.x) * surface_width as f32,
            y: lm.y * surface_height as f32,
        }
    }
}

/// User-visible session lifecycle, for the surrounding UI. A failed
/// session stays failed until externally restarted; there is no retry.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionStatus {
    Loading,
    Running,
    Failed(String),
}

/// Fixed pipeline constants. Part of the contract, not runtime config.
pub mod consts {
    /// Requested capture resolution and frame rate.
    pub const CAPTURE_WIDTH: u32 = 1920;
    pub const CAPTURE_HEIGHT: u32 = 1280;
    pub const CAPTURE_FPS: u32 = 30;

    /// Minimum wall-clock interval between landmark detections.
    pub const PROCESS_INTERVAL_MS: u64 = 100;

    /// Thumb-to-index distance below which the hand counts as pinching,
    /// in normalized landmark units. Strict less-than.
    pub const PINCH_THRESHOLD: f32 = 0.05;

    /// Exponential smoothing factor for the ink trail. Heavy weighting
    /// toward the new sample: low lag, light smoothing.
    pub const SMOOTHING_FACTOR: f32 = 0.8;

    /// Planar distance between consecutive smoothed points above which the
    /// trail breaks into a new stroke, in surface pixels.
    pub const STROKE_BREAK_DISTANCE: f32 = 75.0;

    pub const MARKER_RADIUS: i32 = 6;
    pub const LIVE_LINE_WIDTH: u32 = 2;
    pub const TRAIL_STROKE_WIDTH: u32 = 6;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_landmark_mirrors_horizontally() {
        let lm = Landmark::new(0.3, 0.5, 0.0);
        let p = DrawPoint::from_landmark(&lm, 1000, 500);
        assert_eq!(p.x, 700.0);
        assert_eq!(p.y, 250.0);
    }

    #[test]
    fn from_landmark_stays_in_surface_bounds() {
        for &(x, y) in &[(0.0, 0.0), (1.0, 1.0), (0.5, 0.25)] {
            let p = DrawPoint::from_landmark(&Landmark::new(x, y, 0.0), 1920, 1280);
            assert!(p.x >= 0.0 && p.x <= 1920.0);
            assert!(p.y >= 0.0 && p.y <= 1280.0);
        }
    }

    #[test]
    fn tip_accessors_use_mediapipe_indices() {
        let mut points = vec![Landmark::default(); 21];
        points[4] = Landmark::new(0.1, 0.2, 0.3);
        points[8] = Landmark::new(0.4, 0.5, 0.6);
        let hand = HandFrame::new(points);
        assert_eq!(hand.thumb_tip().unwrap().x, 0.1);
        assert_eq!(hand.index_tip().unwrap().y, 0.5);
    }

    #[test]
    fn short_frame_has_no_index_tip() {
        let hand = HandFrame::new(vec![Landmark::default(); 8]);
        assert!(hand.thumb_tip().is_some());
        assert!(hand.index_tip().is_none());
    }
}
