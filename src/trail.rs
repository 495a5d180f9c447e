use crate::geometry::planar_distance;
use crate::types::{consts, DrawPoint, GestureState};

/// Exponential smoothing over a raw point sequence. The first point is
/// copied verbatim; each later point moves from the previous smoothed
/// point toward the raw sample by the smoothing factor. Output depends
/// only on the input contents, so recomputing on the same snapshot
/// yields identical output.
pub fn smooth(raw: &[DrawPoint]) -> Vec<DrawPoint> {
    let mut smoothed = Vec::with_capacity(raw.len());
    for (i, point) in raw.iter().enumerate() {
        if i == 0 {
            smoothed.push(*point);
        } else {
            let prev = smoothed[i - 1];
            smoothed.push(smooth_step(prev, *point));
        }
    }
    smoothed
}

fn smooth_step(prev: DrawPoint, current: DrawPoint) -> DrawPoint {
    DrawPoint {
        x: prev.x + consts::SMOOTHING_FACTOR * (current.x - prev.x),
        y: prev.y + consts::SMOOTHING_FACTOR * (current.y - prev.y),
    }
}

/// Splits a smoothed trail into disjoint strokes wherever consecutive
/// points jump farther than the break distance. Such gaps come from the
/// pinch toggling off and on; connecting across them would draw long
/// spurious lines between unrelated strokes.
pub fn segments(smoothed: &[DrawPoint]) -> Vec<&[DrawPoint]> {
    let mut out = Vec::new();
    let mut start = 0;
    for i in 1..smoothed.len() {
        if planar_distance(&smoothed[i - 1], &smoothed[i]) > consts::STROKE_BREAK_DISTANCE {
            out.push(&smoothed[start..i]);
            start = i;
        }
    }
    if start < smoothed.len() {
        out.push(&smoothed[start..]);
    }
    out
}

/// Accumulates the pinch-gated ink trail for one session.
///
/// The raw trail is append-only and never pruned. The smoothed trail is
/// kept as an incrementally extended cache rather than replayed from the
/// start on every render pass; each appended element equals what a full
/// `smooth(raw)` recomputation would produce at that index.
#[derive(Debug, Default)]
pub struct TrailSmoother {
    raw: Vec<DrawPoint>,
    smoothed: Vec<DrawPoint>,
}

impl TrailSmoother {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the index-tip position only while pinching. Called once per
    /// detection cycle for the tracked hand. When the gesture is open
    /// nothing is recorded; the resulting positional gap is what the jump
    /// segmentation later detects.
    pub fn maybe_capture(&mut self, gesture: &GestureState, index_tip: DrawPoint) {
        if !gesture.pinching {
            return;
        }
        let next = match self.smoothed.last() {
            Some(&prev) => smooth_step(prev, index_tip),
            None => index_tip,
        };
        self.raw.push(index_tip);
        self.smoothed.push(next);
    }

    pub fn raw(&self) -> &[DrawPoint] {
        &self.raw
    }

    pub fn smoothed(&self) -> &[DrawPoint] {
        &self.smoothed
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}
