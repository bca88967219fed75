//! Keeps a rectangle inside the visible viewport.
//!
//! The result is a delta, not a position: callers add it to whatever
//! translation they already apply so repeated calls during a drag compose.

use super::{Bounds, Point, Viewport};
use crate::constants::VIEWPORT_MARGIN;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Translation {
    pub translate_x: i32,
    pub translate_y: i32,
}

impl Translation {
    pub const ZERO: Translation = Translation {
        translate_x: 0,
        translate_y: 0,
    };

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    pub fn as_point(&self) -> Point {
        Point::new(self.translate_x, self.translate_y)
    }
}

/// Translation that brings `edges` back inside `viewport` using the fixed
/// [`VIEWPORT_MARGIN`]. `None` edges (nothing measured yet) never move.
pub fn clamp_translation(edges: Option<Bounds>, viewport: Viewport) -> Translation {
    clamp_translation_with_margin(edges, viewport, VIEWPORT_MARGIN)
}

pub fn clamp_translation_with_margin(
    edges: Option<Bounds>,
    viewport: Viewport,
    margin: i32,
) -> Translation {
    let Some(edges) = edges else {
        return Translation::ZERO;
    };
    Translation {
        translate_x: axis_shift(edges.left, edges.right, viewport.width, margin),
        translate_y: axis_shift(edges.top, edges.bottom, viewport.height, margin),
    }
}

fn axis_shift(near: i32, far: i32, extent: i32, margin: i32) -> i32 {
    if near < margin {
        margin - near
    } else if far > extent {
        // `max` stops a rectangle wider than the viewport from overshooting
        // back past the near margin.
        (margin - near).max(extent - far - margin)
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEW: Viewport = Viewport::new(1024, 768);

    #[test]
    fn missing_edges_do_not_move() {
        assert_eq!(clamp_translation(None, VIEW), Translation::ZERO);
    }

    #[test]
    fn in_bounds_rect_is_left_alone() {
        let edges = Bounds::new(100, 300, 100, 200);
        assert!(clamp_translation(Some(edges), VIEW).is_zero());
    }

    #[test]
    fn overflow_left() {
        let t = clamp_translation(Some(Bounds::new(-10, 10, 10, 20)), VIEW);
        assert_eq!(
            t,
            Translation {
                translate_x: 26,
                translate_y: 6
            }
        );
    }

    #[test]
    fn overflow_right() {
        let t = clamp_translation(Some(Bounds::new(1010, 1030, 10, 20)), VIEW);
        assert_eq!(
            t,
            Translation {
                translate_x: -22,
                translate_y: 6
            }
        );
    }

    #[test]
    fn overflow_top() {
        let t = clamp_translation(Some(Bounds::new(10, 20, -10, 10)), VIEW);
        assert_eq!(
            t,
            Translation {
                translate_x: 6,
                translate_y: 26
            }
        );
    }

    #[test]
    fn overflow_bottom() {
        let t = clamp_translation(Some(Bounds::new(10, 20, 750, 770)), VIEW);
        assert_eq!(
            t,
            Translation {
                translate_x: 6,
                translate_y: -18
            }
        );
    }

    #[test]
    fn wider_than_viewport_keeps_near_margin() {
        // 1200 wide starting at 20: pulling the right edge in would push the
        // left edge past the margin, so only shift back to the margin.
        let t = clamp_translation(Some(Bounds::new(20, 1220, 20, 40)), VIEW);
        assert_eq!(t.translate_x, -4);
        assert_eq!(t.translate_y, 0);
    }

    #[test]
    fn applying_the_result_is_idempotent() {
        let edges = Bounds::new(1010, 1030, -5, 20);
        let first = clamp_translation(Some(edges), VIEW);
        let moved = edges.translate(first.as_point());
        assert!(clamp_translation(Some(moved), VIEW).is_zero());
    }

    #[test]
    fn custom_margin_for_cell_metrics() {
        let t = clamp_translation_with_margin(
            Some(Bounds::new(-2, 5, 0, 3)),
            Viewport::new(80, 24),
            1,
        );
        assert_eq!(t.translate_x, 3);
        assert_eq!(t.translate_y, 1);
    }
}
