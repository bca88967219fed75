//! Right-click (or hover) menu attached to a region of the screen.
//!
//! Handlers nest: an inner handler shows the outer handler's entries, a
//! divider and then its own. The outer list is handed down explicitly with
//! [`ContextMenuHandler::set_outer_entries`].

use std::rc::Rc;

use crossterm::event::{Event, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::components::{Component, ComponentContext};
use crate::host::{EventTarget, Host, Wakeup, WakeupSink};
use crate::layout::{Bounds, Point};
use crate::menu::hover_intent::{HoverState, Trigger};
use crate::menu::model::{EntryComposer, MenuEntry, SelectionTarget};
use crate::menu::popup::{Panel, Placement, Popup};
use crate::menu::surface::MenuPanelState;
use crate::ui::UiFrame;

#[derive(Debug)]
pub struct ContextMenuHandler {
    placement: Placement,
    region: Bounds,
    entries: Rc<[MenuEntry]>,
    outer: Option<Rc<[MenuEntry]>>,
    composer: EntryComposer,
    popup: Popup,
}

impl ContextMenuHandler {
    /// Right-click menu anchored at the pointer.
    pub fn new(entries: impl Into<Rc<[MenuEntry]>>) -> Self {
        Self::with_placement(entries.into(), Trigger::ContextMenu, Placement::Anchored)
    }

    /// Hover menu: a bar of the handler's own entries under its region.
    pub fn low(entries: impl Into<Rc<[MenuEntry]>>) -> Self {
        Self::with_placement(entries.into(), Trigger::PointerEnter, Placement::Low)
    }

    fn with_placement(entries: Rc<[MenuEntry]>, trigger: Trigger, placement: Placement) -> Self {
        Self {
            placement,
            region: Bounds::default(),
            entries,
            outer: None,
            composer: EntryComposer::new(),
            popup: Popup::new(trigger, placement),
        }
    }

    pub fn is_low(&self) -> bool {
        self.placement == Placement::Low
    }

    pub fn set_entries(&mut self, entries: impl Into<Rc<[MenuEntry]>>) {
        self.entries = entries.into();
    }

    pub fn entries(&self) -> &Rc<[MenuEntry]> {
        &self.entries
    }

    /// Entries of the enclosing handler, if any.
    pub fn set_outer_entries(&mut self, outer: Option<Rc<[MenuEntry]>>) {
        self.outer = outer;
    }

    /// What a right-click here shows, and what nested handlers should get as
    /// their outer entries. The low menu only ever shows its own entries.
    pub fn effective_entries(&mut self) -> Rc<[MenuEntry]> {
        match (&self.outer, self.is_low()) {
            (Some(outer), false) => self.composer.compose(outer, &self.entries),
            _ => self.entries.clone(),
        }
    }

    pub fn set_region(&mut self, region: Bounds) {
        self.region = region;
    }

    pub fn region(&self) -> Bounds {
        self.region
    }

    /// Text selection handed to actions when an entry is confirmed.
    pub fn set_selection(&mut self, selection: Option<SelectionTarget>) {
        self.popup.set_selection(selection);
    }

    pub fn state(&self) -> HoverState {
        self.popup.state()
    }

    pub fn panel_state(&self) -> MenuPanelState {
        self.popup.panel_state()
    }

    pub fn is_visible(&self) -> bool {
        self.popup.is_visible()
    }

    pub fn is_mounted(&self) -> bool {
        self.popup.is_mounted()
    }

    pub fn panel(&self) -> Option<&Panel> {
        self.popup.panel()
    }

    /// Open as if right-clicked at `at`. The panel shows after the arm delay.
    pub fn open_at(&mut self, at: Point, host: &mut Host) {
        self.popup.open_at(at, host);
    }

    pub fn close(&mut self, host: &mut Host) {
        self.popup.close(host);
    }

    pub fn unmount(&mut self, host: &mut Host) {
        self.popup.unmount(host);
    }

    /// Close the panel if `target` is outside it. Returns whether it closed.
    pub fn dismiss_outside(&mut self, target: &EventTarget, host: &mut Host) -> bool {
        self.popup.dismiss_outside(target, host)
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent, event: &Event, host: &mut Host) -> bool {
        let at = Point::from_cell(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                self.popup.pointer_moved(at, self.region.contains(at), host);
                false
            }
            MouseEventKind::Down(button) => {
                if self
                    .popup
                    .pointer_down(&EventTarget::from_mouse(mouse), Some(event), host)
                {
                    return true;
                }
                if button == MouseButton::Right && !self.is_low() && self.region.contains(at) {
                    self.open_at(at, host);
                    return true;
                }
                false
            }
            _ => false,
        }
    }
}

impl Component for ContextMenuHandler {
    fn resize(&mut self, area: Rect, _host: &mut Host) {
        self.region = area.into();
    }

    fn render(&mut self, frame: &mut UiFrame<'_>, _area: Rect, _ctx: &ComponentContext) {
        self.popup.render(frame);
    }

    fn handle_event(&mut self, event: &Event, host: &mut Host, _ctx: &ComponentContext) -> bool {
        match event {
            Event::Mouse(mouse) => self.handle_mouse(mouse, event, host),
            Event::Key(key) => self.popup.key(key, Some(event), host),
            _ => false,
        }
    }
}

impl WakeupSink for ContextMenuHandler {
    fn on_wakeup(&mut self, wakeup: Wakeup, host: &mut Host) -> bool {
        let entries = self.effective_entries();
        self.popup.on_wakeup(wakeup, &entries, self.region, host)
    }
}
