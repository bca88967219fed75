//! Context menus: model, placement, hover intent and the widgets built on
//! them.

pub mod click_menu;
pub mod context_menu;
pub mod handler;
pub mod hover_intent;
pub mod low_menu;
pub mod model;
pub mod popup;
pub mod positioning;
pub mod submenu;
pub mod surface;

pub use click_menu::{ClickFallback, ClickForMenu};
pub use context_menu::{Confirm, ContextMenu, MenuOutcome};
pub use handler::ContextMenuHandler;
pub use hover_intent::{HoverIntent, HoverState, IntentChange, Trigger};
pub use low_menu::{LOW_MENU_ARIA_LABEL, LowMenu};
pub use model::{
    EntryComposer, Label, MenuAction, MenuEntry, RenderedLabel, SelectionEffect, SelectionTarget,
    compose_entries, entry_at_path,
};
pub use popup::{Panel, Placement, Popup};
pub use positioning::{anchored_menu_origin, estimated_panel_size, low_menu_bounds, submenu_origin};
pub use submenu::SubmenuSlot;
pub use surface::{MenuPanelState, MenuSurface, SurfaceEvent};
