//! Geometry and timing knobs shared by every widget.
//!
//! `Metrics::pixels()` carries the reference values (a 34-unit menu row, a
//! 16-unit viewport margin, ...). Terminal hosts use `Metrics::terminal()`,
//! which keeps the same shapes at cell scale.

use std::time::Duration;

use crate::constants::*;
use crate::layout::{Point, Size};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metrics {
    pub entry_height: i32,
    pub panel_padding: i32,
    pub panel_width: i32,
    pub viewport_margin: i32,
    pub submenu_offset: Point,
    pub low_submenu_step: i32,
    pub low_submenu_extra: i32,
    pub window_min: Size,
    pub window_max: Size,
}

impl Metrics {
    pub const fn pixels() -> Self {
        Self {
            entry_height: MENU_ENTRY_HEIGHT,
            panel_padding: MENU_PANEL_PADDING,
            panel_width: MENU_PANEL_WIDTH,
            viewport_margin: VIEWPORT_MARGIN,
            submenu_offset: Point::new(SUBMENU_OFFSET_X, SUBMENU_OFFSET_Y),
            low_submenu_step: LOW_SUBMENU_STEP,
            low_submenu_extra: LOW_SUBMENU_EXTRA,
            window_min: Size::new(WINDOW_MIN_WIDTH, WINDOW_MIN_HEIGHT),
            window_max: Size::new(WINDOW_MAX_WIDTH, WINDOW_MAX_HEIGHT),
        }
    }

    /// Cell-sized preset: one row per entry, a border on each side.
    pub const fn terminal() -> Self {
        Self {
            entry_height: 1,
            panel_padding: 2,
            panel_width: 20,
            viewport_margin: 1,
            submenu_offset: Point::new(0, -1),
            low_submenu_step: 1,
            low_submenu_extra: 2,
            window_min: Size::new(20, 6),
            window_max: Size::new(100, 40),
        }
    }

    pub fn with_viewport_margin(mut self, margin: i32) -> Self {
        self.viewport_margin = margin;
        self
    }

    pub fn with_panel_width(mut self, width: i32) -> Self {
        self.panel_width = width;
        self
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::pixels()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    /// Debounce between a trigger and the panel opening.
    pub arm_delay: Duration,
    /// Delay between pointer-leave and close.
    pub close_delay: Duration,
    /// Grace between hiding a menu panel and detaching it.
    pub detach_grace: Duration,
    /// Grace between hiding a floating window and detaching it.
    pub window_detach_grace: Duration,
    /// Height transition used by `AutoHeight`.
    pub auto_height_duration: Duration,
}

impl Timings {
    pub fn with_close_delay(mut self, delay: Duration) -> Self {
        self.close_delay = delay;
        self
    }

    pub fn with_arm_delay(mut self, delay: Duration) -> Self {
        self.arm_delay = delay;
        self
    }

    pub fn with_detach_grace(mut self, grace: Duration) -> Self {
        self.detach_grace = grace;
        self
    }
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            arm_delay: Duration::from_millis(ARM_DELAY_MS),
            close_delay: Duration::from_millis(CLOSE_DELAY_MS),
            detach_grace: Duration::from_millis(DETACH_GRACE_MS),
            window_detach_grace: Duration::from_millis(DETACH_GRACE_MS),
            auto_height_duration: Duration::from_millis(AUTO_HEIGHT_DURATION_MS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_the_reference_values() {
        let m = Metrics::default();
        assert_eq!(m.entry_height, 34);
        assert_eq!(m.panel_padding, 4);
        assert_eq!(m.panel_width, 200);
        assert_eq!(m.viewport_margin, 16);
    }

    #[test]
    fn default_timings() {
        let t = Timings::default();
        assert_eq!(t.arm_delay, Duration::from_millis(1));
        assert_eq!(t.close_delay, Duration::from_millis(300));
        assert_eq!(t.auto_height_duration, Duration::from_millis(300));
    }
}
