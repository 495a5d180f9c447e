use crate::geometry::distance_3d;
use crate::types::{consts, GestureState, HandFrame};

/// Classifies the pinch gesture from the current frame's thumb-tip /
/// index-tip distance. Returns None when the frame is too short to carry
/// both tips (malformed detection); the caller keeps its previous
/// displayed state in that case. No smoothing, no hysteresis.
pub fn classify(hand: &HandFrame) -> Option<GestureState> {
    let thumb = hand.thumb_tip()?;
    let index = hand.index_tip()?;
    let distance = distance_3d(thumb, index);
    Some(GestureState {
        pinching: distance < consts::PINCH_THRESHOLD,
        distance,
    })
}
