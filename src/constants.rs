//! Shared crate-wide constants.
//!
//! Geometry values are in the "pixel" units of [`crate::config::Metrics::pixels`];
//! the terminal preset scales them down to cells.

/// Inner margin kept between a floating surface and the viewport edges when
/// it is clamped back into view.
pub const VIEWPORT_MARGIN: i32 = 16;

/// Height of one menu row, used to estimate a panel before it is measured.
pub const MENU_ENTRY_HEIGHT: i32 = 34;

/// Vertical padding added to the estimated panel height.
pub const MENU_PANEL_PADDING: i32 = 4;

/// Width assumed for a panel that has not been measured yet.
pub const MENU_PANEL_WIDTH: i32 = 200;

/// Offset of a cascading submenu from its parent row.
pub const SUBMENU_OFFSET_X: i32 = 14;
pub const SUBMENU_OFFSET_Y: i32 = -21;

/// Per-entry upward step for submenus opened from the low menu, plus a fixed
/// extra lift so the submenu clears the low menu's own bottom edge.
pub const LOW_SUBMENU_STEP: i32 = 21;
pub const LOW_SUBMENU_EXTRA: i32 = 8;

/// Default floor for floating-window z-indices. Each window group may pick
/// its own floor; the first window opened gets exactly this value.
pub const MIN_Z_INDEX: i64 = 3000;

/// Z-index reported for a window that has never been stacked.
pub const FALLBACK_Z_INDEX: i64 = 1;

/// Delay between the trigger gesture and the panel committing to open.
pub const ARM_DELAY_MS: u64 = 1;

/// Delay between the pointer leaving a surface and the panel closing.
pub const CLOSE_DELAY_MS: u64 = 300;

/// Grace period between hiding a panel and detaching it from the render tree.
pub const DETACH_GRACE_MS: u64 = 300;

/// Default height transition of `AutoHeight`.
pub const AUTO_HEIGHT_DURATION_MS: u64 = 300;

/// Window size limits in the pixel preset.
pub const WINDOW_MIN_WIDTH: i32 = 200;
pub const WINDOW_MIN_HEIGHT: i32 = 150;
pub const WINDOW_MAX_WIDTH: i32 = 1000;
pub const WINDOW_MAX_HEIGHT: i32 = 1000;

/// Opacity of a window while it is being dragged.
pub const MOVING_OPACITY: f32 = 0.8;
