//! Machinery shared by the menu widgets: a [`MenuSurface`] driving one
//! panel, either pointer-anchored or hung under the owning region.

use std::rc::Rc;

use crossterm::event::{Event, KeyEvent};

use crate::host::{EventTarget, Host, Wakeup};
use crate::keybindings::{Action, KeyBindings};
use crate::layout::{Bounds, Point, Size};
use crate::menu::context_menu::{Confirm, ContextMenu, MenuOutcome};
use crate::menu::hover_intent::{HoverState, Trigger};
use crate::menu::low_menu::{LowMenu, low_menu_height};
use crate::menu::model::{MenuEntry, SelectionTarget};
use crate::menu::positioning::{anchored_menu_origin, low_menu_bounds};
use crate::menu::surface::{MenuPanelState, MenuSurface, SurfaceEvent};
use crate::ui::UiFrame;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// At the pointer, clamped into the viewport.
    Anchored,
    /// Under the owning region, as wide as it.
    Low,
}

#[derive(Debug)]
pub enum Panel {
    Anchored(ContextMenu),
    Low(LowMenu),
}

impl Panel {
    fn tree_bounds(&self, out: &mut Vec<Bounds>) {
        match self {
            Panel::Anchored(menu) => menu.tree_bounds(out),
            Panel::Low(menu) => menu.tree_bounds(out),
        }
    }

    fn entries(&self) -> &Rc<[MenuEntry]> {
        match self {
            Panel::Anchored(menu) => menu.entries(),
            Panel::Low(menu) => menu.entries(),
        }
    }

    fn collapse(&mut self, host: &mut Host) {
        match self {
            Panel::Anchored(menu) => menu.collapse(host),
            Panel::Low(menu) => menu.collapse(host),
        }
    }
}

#[derive(Debug)]
pub struct Popup {
    surface: MenuSurface,
    placement: Placement,
    panel: Option<Panel>,
    measured: Option<Size>,
    selection: Option<SelectionTarget>,
    keys: KeyBindings,
}

impl Popup {
    pub fn new(trigger: Trigger, placement: Placement) -> Self {
        Self {
            surface: MenuSurface::new(trigger),
            placement,
            panel: None,
            measured: None,
            selection: None,
            keys: KeyBindings::default(),
        }
    }

    pub fn state(&self) -> HoverState {
        self.surface.state()
    }

    pub fn panel_state(&self) -> MenuPanelState {
        self.surface.panel()
    }

    pub fn is_visible(&self) -> bool {
        self.surface.is_visible()
    }

    pub fn is_mounted(&self) -> bool {
        self.surface.is_mounted()
    }

    pub fn panel(&self) -> Option<&Panel> {
        self.panel.as_ref()
    }

    pub fn selection(&self) -> Option<&SelectionTarget> {
        self.selection.as_ref()
    }

    pub fn set_selection(&mut self, selection: Option<SelectionTarget>) {
        self.selection = selection;
    }

    /// Bounds a pointer-down must land in to count as inside.
    pub fn roots(&self) -> Vec<Bounds> {
        let mut roots = Vec::new();
        if self.surface.is_visible()
            && let Some(panel) = &self.panel
        {
            panel.tree_bounds(&mut roots);
        }
        roots
    }

    pub fn contains(&self, at: Point) -> bool {
        self.roots().iter().any(|b| b.contains(at))
    }

    pub fn open_at(&mut self, at: Point, host: &mut Host) {
        tracing::debug!(x = at.x, y = at.y, "menu requested");
        let event = self.surface.trigger(at, host);
        if let Some(SurfaceEvent::Reanchored(at)) = event {
            self.reposition(at, host);
        }
    }

    pub fn close(&mut self, host: &mut Host) {
        if let Some(panel) = self.panel.as_mut() {
            panel.collapse(host);
        }
        if self.surface.dismiss(host).is_some() {
            tracing::debug!("menu closed");
        }
    }

    fn reposition(&mut self, at: Point, host: &mut Host) {
        if let Some(Panel::Anchored(menu)) = self.panel.as_mut() {
            menu.collapse(host);
            let origin = anchored_menu_origin(
                at,
                self.measured,
                menu.entries().len(),
                host.viewport(),
                &host.metrics(),
            );
            menu.set_origin(origin);
            self.surface.set_resolved(origin);
        }
    }

    /// Track the pointer: `in_region` says whether it is over the owning
    /// element; the panel tree counts as inside too.
    pub fn pointer_moved(&mut self, at: Point, in_region: bool, host: &mut Host) {
        let inside = in_region || self.contains(at);
        self.surface.pointer_over(inside, at, host);
        if !self.surface.is_visible() {
            return;
        }
        match self.panel.as_mut() {
            Some(Panel::Anchored(menu)) => menu.pointer_moved(at, host),
            Some(Panel::Low(menu)) => menu.pointer_moved(at, host),
            None => {}
        }
    }

    /// Capture-phase pointer-down. Returns true when the panel consumed it;
    /// a press outside dismisses the panel and is left for others.
    pub fn pointer_down(&mut self, target: &EventTarget, event: Option<&Event>, host: &mut Host) -> bool {
        if !self.surface.is_visible() {
            return false;
        }
        if self.dismiss_outside(target, host) {
            return false;
        }
        let confirm = Confirm {
            target: self.selection.as_ref(),
            event,
        };
        let outcome = match self.panel.as_mut() {
            Some(Panel::Anchored(menu)) => menu.pointer_down(target, confirm, host),
            Some(Panel::Low(menu)) => menu.pointer_down(target, confirm, host),
            None => MenuOutcome::Ignored,
        };
        self.finish(outcome, host)
    }

    /// Document-level capture listener: closes the panel when a press lands
    /// outside it, whichever widget ends up handling the press.
    pub fn dismiss_outside(&mut self, target: &EventTarget, host: &mut Host) -> bool {
        if !self.surface.is_visible() {
            return false;
        }
        let roots = self.roots();
        if !self.surface.pointer_down(target, &roots, host) {
            return false;
        }
        if let Some(panel) = self.panel.as_mut() {
            panel.collapse(host);
        }
        true
    }

    fn finish(&mut self, outcome: MenuOutcome, host: &mut Host) -> bool {
        match outcome {
            MenuOutcome::Ignored => false,
            MenuOutcome::Consumed => true,
            MenuOutcome::Close => {
                self.close(host);
                true
            }
        }
    }

    pub fn key(&mut self, key: &KeyEvent, event: Option<&Event>, host: &mut Host) -> bool {
        if !self.surface.is_visible() {
            return false;
        }
        let Some(action) = self.keys.menu_action(key) else {
            return false;
        };
        let confirm = Confirm {
            target: self.selection.as_ref(),
            event,
        };
        let outcome = match self.panel.as_mut() {
            Some(Panel::Anchored(menu)) => menu.handle_action(action, confirm, host),
            _ => MenuOutcome::Ignored,
        };
        if outcome == MenuOutcome::Ignored && action == Action::MenuClose {
            self.close(host);
            return true;
        }
        self.finish(outcome, host)
    }

    /// Route a wakeup. `entries` is what the panel shows when it opens and
    /// `region` is the owning element's bounds.
    pub fn on_wakeup(&mut self, wakeup: Wakeup, entries: &Rc<[MenuEntry]>, region: Bounds, host: &mut Host) -> bool {
        let nested = match self.panel.as_mut() {
            Some(Panel::Anchored(menu)) => menu.on_wakeup(wakeup, host),
            Some(Panel::Low(menu)) => menu.on_wakeup(wakeup, host),
            None => false,
        };
        if nested {
            return true;
        }
        match self.surface.on_wakeup(wakeup, host) {
            Some(SurfaceEvent::Opened(at)) => {
                self.mount_panel(at, entries, region, host);
                true
            }
            Some(SurfaceEvent::Reanchored(at)) => {
                self.reposition(at, host);
                true
            }
            Some(SurfaceEvent::Unmounted) => {
                if let Some(mut panel) = self.panel.take() {
                    panel.collapse(host);
                }
                self.measured = None;
                tracing::trace!("menu panel unmounted");
                true
            }
            Some(SurfaceEvent::Hidden) => true,
            None => false,
        }
    }

    fn mount_panel(&mut self, at: Point, entries: &Rc<[MenuEntry]>, region: Bounds, host: &mut Host) {
        let metrics = host.metrics();
        // a panel still mounted from the grace period is reused when it shows
        // the same entries
        let reusable = self
            .panel
            .as_ref()
            .is_some_and(|panel| Rc::ptr_eq(panel.entries(), entries));
        if !reusable {
            // a measurement only describes the panel it was taken from
            self.measured = None;
            if let Some(mut old) = self.panel.take() {
                old.collapse(host);
            }
        }
        match self.placement {
            Placement::Anchored => {
                let origin = anchored_menu_origin(at, self.measured, entries.len(), host.viewport(), &metrics);
                self.surface.set_resolved(origin);
                match self.panel.as_mut() {
                    Some(Panel::Anchored(menu)) => menu.set_origin(origin),
                    _ => self.panel = Some(Panel::Anchored(ContextMenu::new(entries.clone(), origin, metrics))),
                }
            }
            Placement::Low => {
                let Some(bounds) = low_menu_bounds(region, low_menu_height(&metrics), host.viewport()) else {
                    tracing::trace!("low menu off screen, not rendered");
                    self.panel = None;
                    self.surface.unmount(host);
                    return;
                };
                self.surface.set_resolved(bounds.origin());
                match self.panel.as_mut() {
                    Some(Panel::Low(menu)) => menu.set_bounds(bounds),
                    _ => self.panel = Some(Panel::Low(LowMenu::new(entries.clone(), bounds, metrics))),
                }
            }
        }
    }

    pub fn render(&mut self, frame: &mut UiFrame<'_>) {
        if !self.surface.is_visible() {
            return;
        }
        match self.panel.as_ref() {
            Some(Panel::Anchored(menu)) => {
                menu.render(frame);
                self.measured = Some(menu.bounds().size());
            }
            Some(Panel::Low(menu)) => menu.render(frame),
            None => {}
        }
    }

    pub fn unmount(&mut self, host: &mut Host) {
        if let Some(mut panel) = self.panel.take() {
            panel.collapse(host);
        }
        self.measured = None;
        self.surface.unmount(host);
    }
}
