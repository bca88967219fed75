//! Menu opened by a primary click on its region.

use std::rc::Rc;

use crossterm::event::{Event, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::components::{Component, ComponentContext};
use crate::host::{EventTarget, Host, Wakeup, WakeupSink};
use crate::layout::{Bounds, Point};
use crate::menu::hover_intent::{HoverState, Trigger};
use crate::menu::model::MenuEntry;
use crate::menu::popup::{Panel, Placement, Popup};
use crate::ui::UiFrame;

/// Called for clicks when there is nothing to show.
pub type ClickFallback = Box<dyn FnMut(&Event)>;

pub struct ClickForMenu {
    region: Bounds,
    entries: Rc<[MenuEntry]>,
    fallback: Option<ClickFallback>,
    popup: Popup,
}

impl std::fmt::Debug for ClickForMenu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClickForMenu")
            .field("region", &self.region)
            .field("entries", &self.entries.len())
            .field("fallback", &self.fallback.is_some())
            .field("popup", &self.popup)
            .finish()
    }
}

impl ClickForMenu {
    pub fn new(entries: impl Into<Rc<[MenuEntry]>>) -> Self {
        Self {
            region: Bounds::default(),
            entries: entries.into(),
            fallback: None,
            popup: Popup::new(Trigger::Click, Placement::Anchored),
        }
    }

    /// Click handler run while there are no entries. The click still
    /// reports as unhandled.
    pub fn with_fallback(mut self, fallback: impl FnMut(&Event) + 'static) -> Self {
        self.fallback = Some(Box::new(fallback));
        self
    }

    pub fn set_entries(&mut self, entries: impl Into<Rc<[MenuEntry]>>) {
        self.entries = entries.into();
    }

    pub fn set_region(&mut self, region: Bounds) {
        self.region = region;
    }

    pub fn state(&self) -> HoverState {
        self.popup.state()
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

    /// Open as if clicked at `at`.
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
                if button != MouseButton::Left || !self.region.contains(at) {
                    return false;
                }
                if self.entries.is_empty() {
                    if let Some(fallback) = self.fallback.as_mut() {
                        fallback(event);
                    }
                    return false;
                }
                self.open_at(at, host);
                true
            }
            _ => false,
        }
    }
}

impl Component for ClickForMenu {
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

impl WakeupSink for ClickForMenu {
    fn on_wakeup(&mut self, wakeup: Wakeup, host: &mut Host) -> bool {
        let entries = self.entries.clone();
        self.popup.on_wakeup(wakeup, &entries, self.region, host)
    }
}
