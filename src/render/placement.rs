//! Pure placement math for the watermark text box.
//!
//! No I/O and no failure mode — everything here is unit-testable with plain
//! numbers. The returned origin is baseline-anchored: `y` is the text
//! baseline, matching how the compositor offsets the glyph box before
//! drawing.

use crate::config::Position;

/// Top-left-relative pixel coordinate for the baseline-anchored draw call.
///
/// After clamping, `x ∈ [0, canvas_w − text_w]` (collapsing to 0 when the
/// text is wider than the canvas) and `y ∈ [text_h, canvas_h]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawOrigin {
    pub x: u32,
    pub y: u32,
}

/// Compute where to draw `text_w × text_h` text on a `canvas_w × canvas_h`
/// canvas.
///
/// Each position has its own anchor formula; the clamp below is applied
/// unconditionally to every branch, so text may visually overlap an edge
/// when it doesn't fit but never lands outside the canvas.
pub fn place(
    canvas_w: u32,
    canvas_h: u32,
    text_w: u32,
    text_h: u32,
    position: Position,
    margin: u32,
) -> DrawOrigin {
    // i64 throughout: oversized text or margins may drive intermediates
    // negative before the clamp.
    let (cw, ch) = (canvas_w as i64, canvas_h as i64);
    let (tw, th) = (text_w as i64, text_h as i64);
    let m = margin as i64;

    let (x, y) = match position {
        Position::TopLeft => (m, m + th),
        Position::TopRight => (cw - tw - m, m + th),
        Position::BottomLeft => (m, ch - m),
        Position::BottomRight => (cw - tw - m, ch - m),
        Position::Center => ((cw - tw) / 2, (ch + th) / 2),
    };

    // min before max: a canvas narrower than the text collapses x to the
    // left edge, and the baseline never rises above the text height.
    let x = x.min(cw - tw).max(0);
    let y = y.min(ch).max(th);

    DrawOrigin {
        x: x as u32,
        y: y as u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANVAS: (u32, u32) = (1000, 800);
    const TEXT: (u32, u32) = (100, 20);
    const MARGIN: u32 = 20;

    fn place_at(position: Position) -> DrawOrigin {
        place(CANVAS.0, CANVAS.1, TEXT.0, TEXT.1, position, MARGIN)
    }

    #[test]
    fn bottom_right_anchors_to_margin() {
        assert_eq!(place_at(Position::BottomRight), DrawOrigin { x: 880, y: 780 });
    }

    #[test]
    fn top_left_baseline_sits_below_margin() {
        assert_eq!(place_at(Position::TopLeft), DrawOrigin { x: 20, y: 40 });
    }

    #[test]
    fn top_right_mirrors_top_left() {
        assert_eq!(place_at(Position::TopRight), DrawOrigin { x: 880, y: 40 });
    }

    #[test]
    fn bottom_left_mirrors_bottom_right() {
        assert_eq!(place_at(Position::BottomLeft), DrawOrigin { x: 20, y: 780 });
    }

    #[test]
    fn center_splits_both_axes() {
        assert_eq!(place_at(Position::Center), DrawOrigin { x: 450, y: 410 });
    }

    #[test]
    fn text_wider_than_canvas_clamps_to_left_edge() {
        // 100px text on a 50px canvas: x would clamp into [0, -50], which
        // collapses to 0; the baseline stays within the canvas.
        let origin = place(50, 50, 100, 20, Position::TopLeft, 5);
        assert_eq!(origin, DrawOrigin { x: 0, y: 25 });
    }

    #[test]
    fn huge_margin_never_escapes_the_canvas() {
        let origin = place(100, 100, 40, 10, Position::BottomRight, 500);
        assert_eq!(origin, DrawOrigin { x: 0, y: 10 });
    }

    #[test]
    fn zero_margin_touches_the_edges() {
        let origin = place(200, 100, 50, 10, Position::BottomRight, 0);
        assert_eq!(origin, DrawOrigin { x: 150, y: 100 });
    }

    #[test]
    fn text_taller_than_canvas_keeps_baseline_below_ascent() {
        // The baseline floor (text height) wins over the canvas ceiling, so
        // the glyph box top stays at 0 rather than above the canvas.
        let origin = place(100, 30, 60, 50, Position::BottomLeft, 0);
        assert_eq!(origin, DrawOrigin { x: 0, y: 50 });
    }
}
