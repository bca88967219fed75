//! Context menus, floating windows and animated panels for `ratatui`
//! applications.
//!
//! Widgets are headless state machines driven through a [`host::Host`]: a
//! virtual clock for timers and animation frames, a document-level listener
//! registry and the viewport. Input arrives as `crossterm` events and drawing
//! goes through [`ui::UiFrame`].

pub mod component_context;
pub mod components;
pub mod config;
pub mod constants;
pub mod dismissal;
pub mod drivers;
pub mod error;
pub mod event_loop;
pub mod host;
pub mod keybindings;
pub mod layout;
pub mod menu;
pub mod theme;
pub mod tracing_sub;
pub mod ui;
pub mod window;

pub use error::WidgetError;
