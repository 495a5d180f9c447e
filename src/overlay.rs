use crate::canvas::{Canvas, Color};
use crate::config::{parse_hex, UiConfig};
use crate::font;
use crate::gesture;
use crate::trail::{segments, TrailSmoother};
use crate::ttf::FontRenderer;
use crate::types::{consts, DrawPoint, GestureState, HandFrame};

/// Draws the full gesture overlay for one detection cycle: per-hand
/// markers and connecting line, status text, and the smoothed, segmented
/// ink trail. The overlay surface is cleared and repainted every cycle.
pub struct OverlayRenderer {
    thumb_color: Color,
    index_color: Color,
    pinch_color: Color,
    open_color: Color,
    trail_color: Color,
    font: Option<FontRenderer>,
    font_size_pt: f32,
    text_scale: usize,
}

impl OverlayRenderer {
    pub fn from_config(ui: &UiConfig) -> Self {
        Self {
            thumb_color: parse_hex(&ui.thumb_color_hex),
            index_color: parse_hex(&ui.index_color_hex),
            pinch_color: parse_hex(&ui.pinch_color_hex),
            open_color: parse_hex(&ui.open_color_hex),
            trail_color: parse_hex(&ui.trail_color_hex),
            font: FontRenderer::try_load(&ui.font_family),
            font_size_pt: ui.font_size_pt as f32,
            text_scale: ui.text_scale,
        }
    }

    /// Palette-only constructor used by tests and headless callers.
    pub fn with_defaults() -> Self {
        Self {
            thumb_color: (0, 255, 0),
            index_color: (255, 0, 0),
            pinch_color: (255, 255, 0),
            open_color: (255, 255, 255),
            trail_color: (0, 0, 255),
            font: None,
            font_size_pt: 14.0,
            text_scale: 2,
        }
    }

    /// One full overlay pass. Classifies each hand, captures the index tip
    /// into the trail while pinching, and repaints everything. Returns the
    /// last successful classification so the caller can publish the
    /// user-visible pinching flag; None means no hand classified this
    /// cycle and the previously displayed state persists.
    pub fn render(
        &self,
        hands: &[HandFrame],
        trail: &mut TrailSmoother,
        canvas: &mut Canvas,
    ) -> Option<GestureState> {
        canvas.clear();

        let width = canvas.width() as u32;
        let height = canvas.height() as u32;
        let mut last_state = None;

        for hand in hands {
            // Malformed frames (fewer than 9 points) are skipped silently.
            let (Some(thumb_lm), Some(index_lm)) = (hand.thumb_tip(), hand.index_tip()) else {
                continue;
            };
            let Some(state) = gesture::classify(hand) else {
                continue;
            };
            let thumb = DrawPoint::from_landmark(thumb_lm, width, height);
            let index = DrawPoint::from_landmark(index_lm, width, height);

            trail.maybe_capture(&state, index);

            canvas.fill_circle(thumb.x, thumb.y, consts::MARKER_RADIUS, self.thumb_color);
            canvas.fill_circle(index.x, index.y, consts::MARKER_RADIUS, self.index_color);

            let line_color = if state.pinching {
                self.pinch_color
            } else {
                self.open_color
            };
            canvas.draw_line(
                thumb.x,
                thumb.y,
                index.x,
                index.y,
                consts::LIVE_LINE_WIDTH,
                line_color,
            );

            self.draw_text(canvas, 10, 20, &format!("Status: {}", state.label()), line_color);
            self.draw_text(canvas, 10, 40, &format!("Distance: {:.3}", state.distance), line_color);

            last_state = Some(state);
        }

        // The trail renders regardless of hand presence.
        for segment in segments(trail.smoothed()) {
            canvas.stroke_path(segment, consts::TRAIL_STROKE_WIDTH, self.trail_color);
        }

        last_state
    }

    fn draw_text(&self, canvas: &mut Canvas, x: usize, y: usize, text: &str, color: Color) {
        if let Some(fr) = &self.font {
            fr.draw_text(canvas, x, y, text, color, self.font_size_pt);
        } else {
            font::draw_text_line(canvas, x, y, text, color, self.text_scale);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Landmark;

    fn hand(thumb: Landmark, index: Landmark) -> HandFrame {
        let mut points = vec![Landmark::default(); 21];
        points[4] = thumb;
        points[8] = index;
        HandFrame::new(points)
    }

    #[test]
    fn pinching_hand_grows_trail_by_one() {
        let renderer = OverlayRenderer::with_defaults();
        let mut trail = TrailSmoother::new();
        let mut canvas = Canvas::new(640, 480);

        let h = hand(Landmark::new(0.5, 0.5, 0.0), Landmark::new(0.52, 0.5, 0.0));
        let state = renderer.render(&[h], &mut trail, &mut canvas).unwrap();

        assert!(state.pinching);
        assert!((state.distance - 0.02).abs() < 1e-6);
        assert_eq!(trail.len(), 1);
    }

    #[test]
    fn open_hand_draws_but_does_not_capture() {
        let renderer = OverlayRenderer::with_defaults();
        let mut trail = TrailSmoother::new();
        let mut canvas = Canvas::new(640, 480);

        let h = hand(Landmark::new(0.2, 0.5, 0.0), Landmark::new(0.8, 0.5, 0.0));
        let state = renderer.render(&[h], &mut trail, &mut canvas).unwrap();

        assert!(!state.pinching);
        assert!(trail.is_empty());
        // Markers landed on the mirrored positions.
        assert!(canvas.buffer().iter().any(|&b| b != 0));
    }

    #[test]
    fn no_hands_clears_but_keeps_trail() {
        let renderer = OverlayRenderer::with_defaults();
        let mut trail = TrailSmoother::new();
        let pinch = GestureState { pinching: true, distance: 0.01 };
        trail.maybe_capture(&pinch, DrawPoint::new(100.0, 100.0));
        trail.maybe_capture(&pinch, DrawPoint::new(110.0, 100.0));

        let mut canvas = Canvas::new(640, 480);
        let state = renderer.render(&[], &mut trail, &mut canvas);

        assert!(state.is_none());
        // Trail stroke still present after a hand-free cycle.
        assert_eq!(canvas.pixel(105, 100), (0, 0, 255));
    }

    #[test]
    fn malformed_hand_is_skipped_silently() {
        let renderer = OverlayRenderer::with_defaults();
        let mut trail = TrailSmoother::new();
        let mut canvas = Canvas::new(640, 480);

        let short = HandFrame::new(vec![Landmark::default(); 5]);
        let state = renderer.render(&[short], &mut trail, &mut canvas);
        assert!(state.is_none());
        assert!(trail.is_empty());
    }

    #[test]
    fn markers_are_mirrored() {
        let renderer = OverlayRenderer::with_defaults();
        let mut trail = TrailSmoother::new();
        let mut canvas = Canvas::new(1000, 500);

        // Index tip at x=0.3 must land at x=700 after mirroring. The
        // captured trail dot (radius 3) overpaints the marker center, so
        // probe inside the marker but outside the dot.
        let h = hand(Landmark::new(0.3, 0.5, 0.0), Landmark::new(0.3, 0.5, 0.0));
        renderer.render(&[h], &mut trail, &mut canvas);
        assert_eq!(canvas.pixel(700, 255), (255, 0, 0));
    }
}
