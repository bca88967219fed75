//! Shared component rendering context
//!
//! `ComponentContext` carries UI metadata a component may need while it
//! renders or handles events, such as whether it has focus or sits inside a
//! window that is being dragged.

/// Context passed to `Component` trait methods describing UI state.
///
/// - `focused`: whether the component is currently focused.
/// - `dimmed`: whether the component is drawn faded, e.g. inside a window
///   that is being moved.
#[derive(Debug, Clone, Copy)]
pub struct ComponentContext {
    focused: bool,
    dimmed: bool,
}

impl ComponentContext {
    /// Create a new `ComponentContext` with the given focus state.
    pub const fn new(focused: bool) -> Self {
        Self {
            focused,
            dimmed: false,
        }
    }

    /// Returns whether the component is focused.
    pub const fn focused(&self) -> bool {
        self.focused
    }

    /// Returns whether the component should render faded.
    pub const fn dimmed(&self) -> bool {
        self.dimmed
    }

    /// Return a new `ComponentContext` with a modified `focused` flag.
    pub const fn with_focus(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Return a new `ComponentContext` with a modified `dimmed` flag.
    pub const fn with_dimmed(mut self, dimmed: bool) -> Self {
        self.dimmed = dimmed;
        self
    }
}

impl Default for ComponentContext {
    fn default() -> Self {
        Self::new(false)
    }
}
