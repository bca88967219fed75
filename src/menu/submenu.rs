use std::rc::Rc;

use crate::config::Metrics;
use crate::host::{EventTarget, Host, Wakeup};
use crate::layout::{Bounds, Point};
use crate::menu::context_menu::ContextMenu;
use crate::menu::hover_intent::{HoverState, Trigger};
use crate::menu::model::MenuEntry;
use crate::menu::positioning::submenu_origin;
use crate::menu::surface::{MenuSurface, SurfaceEvent};
use crate::ui::UiFrame;

/// Submenu hanging off one group entry. Opens on hover of the parent row
/// (or on confirming it) and stays open while the pointer is over the row or
/// anywhere in the child panel tree.
#[derive(Debug)]
pub struct SubmenuSlot {
    surface: MenuSurface,
    child: Option<Box<ContextMenu>>,
    low: bool,
}

impl SubmenuSlot {
    pub fn new(low: bool) -> Self {
        Self {
            surface: MenuSurface::new(Trigger::PointerEnter),
            child: None,
            low,
        }
    }

    /// Accessible name for the submenu of `entry`.
    pub fn aria_label(entry: &MenuEntry) -> String {
        format!("Sub menu for {}", entry.aria_label().unwrap_or_default())
    }

    pub fn state(&self) -> HoverState {
        self.surface.state()
    }

    pub fn is_visible(&self) -> bool {
        self.surface.is_visible()
    }

    pub fn is_mounted(&self) -> bool {
        self.surface.is_mounted()
    }

    pub fn child(&self) -> Option<&ContextMenu> {
        self.child.as_deref()
    }

    pub fn child_mut(&mut self) -> Option<&mut ContextMenu> {
        self.child.as_deref_mut()
    }

    /// True when `at` is over the visible child tree.
    pub fn child_contains(&self, at: Point) -> bool {
        self.surface.is_visible() && self.child.as_ref().is_some_and(|c| c.contains(at))
    }

    pub fn tree_bounds(&self, out: &mut Vec<Bounds>) {
        if let Some(child) = self.child.as_ref().filter(|_| self.surface.is_visible()) {
            child.tree_bounds(out);
        }
    }

    pub fn hover(&mut self, inside: bool, at: Point, host: &mut Host) {
        self.surface.pointer_over(inside, at, host);
    }

    /// Open without waiting for hover: confirming the parent entry or the
    /// open-submenu key.
    pub fn open(&mut self, row: Bounds, host: &mut Host) {
        self.surface.trigger(row.origin(), host);
    }

    /// Hide now; the child is dropped once the detach grace runs out.
    pub fn close(&mut self, host: &mut Host) {
        if let Some(child) = self.child.as_mut() {
            child.collapse(host);
        }
        self.surface.dismiss(host);
    }

    pub fn pointer_down(&mut self, target: &EventTarget, row: Bounds, host: &mut Host) {
        let mut roots = vec![row];
        self.tree_bounds(&mut roots);
        if self.surface.pointer_down(target, &roots, host)
            && let Some(child) = self.child.as_mut()
        {
            child.collapse(host);
        }
    }

    pub fn on_wakeup(
        &mut self,
        wakeup: Wakeup,
        row: Bounds,
        group: &[MenuEntry],
        metrics: &Metrics,
        host: &mut Host,
    ) -> bool {
        if let Some(child) = self.child.as_mut()
            && child.on_wakeup(wakeup, host)
        {
            return true;
        }
        match self.surface.on_wakeup(wakeup, host) {
            Some(SurfaceEvent::Opened(_)) => {
                let origin = submenu_origin(row, group.len(), self.low, metrics);
                self.surface.set_resolved(origin);
                match self.child.as_mut() {
                    // reopened during the detach grace: keep the same panel
                    Some(child) => child.set_origin(origin),
                    None => {
                        let entries: Rc<[MenuEntry]> = group.to_vec().into();
                        self.child = Some(Box::new(ContextMenu::new(entries, origin, *metrics)));
                    }
                }
                tracing::trace!(x = origin.x, y = origin.y, "submenu opened");
                true
            }
            Some(SurfaceEvent::Unmounted) => {
                if let Some(mut child) = self.child.take() {
                    child.collapse(host);
                }
                true
            }
            Some(_) => true,
            None => false,
        }
    }

    pub fn unmount(&mut self, host: &mut Host) {
        if let Some(mut child) = self.child.take() {
            child.collapse(host);
        }
        self.surface.unmount(host);
    }

    pub fn render(&self, frame: &mut UiFrame<'_>) {
        if !self.surface.is_visible() {
            return;
        }
        if let Some(child) = self.child.as_ref() {
            child.render(frame);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::WakeupSink;
    use std::time::Duration;

    struct Probe {
        slot: SubmenuSlot,
        group: Vec<MenuEntry>,
        row: Bounds,
        mounted_trace: Vec<bool>,
    }

    impl WakeupSink for Probe {
        fn on_wakeup(&mut self, wakeup: Wakeup, host: &mut Host) -> bool {
            let metrics = host.metrics();
            let handled = self
                .slot
                .on_wakeup(wakeup, self.row, &self.group, &metrics, host);
            self.mounted_trace.push(self.slot.is_mounted());
            handled
        }
    }

    fn probe(low: bool) -> Probe {
        Probe {
            slot: SubmenuSlot::new(low),
            group: vec![MenuEntry::text("a"), MenuEntry::text("b")],
            row: Bounds::new(100, 300, 50, 84),
            mounted_trace: Vec::new(),
        }
    }

    #[test]
    fn aria_label_names_the_parent() {
        assert_eq!(SubmenuSlot::aria_label(&MenuEntry::text("Share")), "Sub menu for Share");
    }

    #[test]
    fn low_submenus_open_upward() {
        let mut host = Host::default();
        let mut p = probe(true);
        p.slot.open(p.row, &mut host);
        host.advance(&mut p, Duration::from_millis(1));
        assert_eq!(p.slot.child().unwrap().origin(), Point::new(114, 50 - 2 * 21 - 8));
    }

    #[test]
    fn rehover_within_close_delay_never_unmounts() {
        let mut host = Host::default();
        let mut p = probe(false);
        p.slot.hover(true, Point::new(110, 60), &mut host);
        host.advance(&mut p, Duration::from_millis(1));
        assert_eq!(p.slot.child().unwrap().origin(), Point::new(314, 29));
        p.slot.hover(false, Point::new(0, 0), &mut host);
        host.advance(&mut p, Duration::from_millis(250));
        p.slot.hover(true, Point::new(110, 60), &mut host);
        host.advance(&mut p, Duration::from_millis(1000));
        assert!(p.mounted_trace.iter().all(|m| *m));
        assert!(p.slot.is_visible());
    }

    #[test]
    fn reopen_during_grace_reuses_the_child() {
        let mut host = Host::default();
        let mut p = probe(false);
        p.slot.open(p.row, &mut host);
        host.advance(&mut p, Duration::from_millis(1));
        p.slot.close(&mut host);
        assert!(!p.slot.is_visible());
        host.advance(&mut p, Duration::from_millis(100));
        p.slot.open(p.row, &mut host);
        host.advance(&mut p, Duration::from_millis(1000));
        assert!(p.slot.is_visible());
        assert!(p.mounted_trace.iter().all(|m| *m));
    }
}
