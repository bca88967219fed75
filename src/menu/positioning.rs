//! Where menu panels go on screen.

use crate::config::Metrics;
use crate::layout::{Bounds, Point, Size, Viewport, clamp_translation_with_margin};

/// Size assumed for a panel that has not been measured yet.
pub fn estimated_panel_size(entry_count: usize, metrics: &Metrics) -> Size {
    let rows = i32::try_from(entry_count).unwrap_or(i32::MAX);
    Size::new(
        metrics.panel_width,
        rows.saturating_mul(metrics.entry_height)
            .saturating_add(metrics.panel_padding),
    )
}

/// Origin of a pointer-anchored panel, clamped once so its far edges stay in
/// the viewport. A missing or zero measurement falls back to the estimate.
pub fn anchored_menu_origin(
    anchor: Point,
    measured: Option<Size>,
    entry_count: usize,
    viewport: Viewport,
    metrics: &Metrics,
) -> Point {
    let size = measured
        .filter(|size| !size.is_empty())
        .unwrap_or_else(|| estimated_panel_size(entry_count, metrics));
    let bounds = Bounds::from_origin_size(anchor, size);
    let shift = clamp_translation_with_margin(Some(bounds), viewport, metrics.viewport_margin);
    anchor + shift.as_point()
}

/// Bar hanging off the bottom-left corner of `trigger`, as wide as the
/// trigger. `None` when it would land entirely off screen.
pub fn low_menu_bounds(trigger: Bounds, panel_height: i32, viewport: Viewport) -> Option<Bounds> {
    let bounds = Bounds::from_origin_size(
        Point::new(trigger.left, trigger.bottom),
        Size::new(trigger.width(), panel_height),
    );
    if bounds.width() <= 0 || bounds.height() <= 0 {
        return None;
    }
    bounds.intersects(&viewport.bounds()).then_some(bounds)
}

/// Origin of a submenu opened from `parent_row`. Regular submenus sit to the
/// right of the row; low-menu submenus grow upward so they clear the bar.
pub fn submenu_origin(parent_row: Bounds, child_count: usize, low: bool, metrics: &Metrics) -> Point {
    if low {
        let rows = i32::try_from(child_count).unwrap_or(i32::MAX);
        let rise = rows
            .saturating_mul(metrics.low_submenu_step)
            .saturating_add(metrics.low_submenu_extra);
        Point::new(
            parent_row.left + metrics.submenu_offset.x,
            parent_row.top.saturating_sub(rise),
        )
    } else {
        Point::new(
            parent_row.right + metrics.submenu_offset.x,
            parent_row.top + metrics.submenu_offset.y,
        )
    }
}
