//! Panel lifecycle shared by the context menu, the low menu, the click menu
//! and submenu slots: hover intent plus outside dismissal plus the
//! visible/mounted pair.

use crate::dismissal::OutsideDismissal;
use crate::host::{EventTarget, Host, Wakeup};
use crate::layout::{Bounds, Point};
use crate::menu::hover_intent::{HoverIntent, HoverState, IntentChange, Trigger};

/// Visibility and placement of one menu panel. `visible` implies `mounted`;
/// mounted but hidden is the closing transient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MenuPanelState {
    pub visible: bool,
    pub mounted: bool,
    /// Where the gesture happened.
    pub anchor: Point,
    /// Where the panel is drawn after clamping.
    pub resolved: Point,
}

/// Notifications for the widget that owns the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// Panel became visible at this anchor; the owner resolves the drawn
    /// position with [`MenuSurface::set_resolved`].
    Opened(Point),
    Reanchored(Point),
    /// Panel is hidden; it stays mounted until the detach grace ends.
    Hidden,
    /// Panel left the render tree.
    Unmounted,
}

#[derive(Debug)]
pub struct MenuSurface {
    intent: HoverIntent,
    dismissal: OutsideDismissal,
    panel: MenuPanelState,
    pointer_inside: bool,
}

impl MenuSurface {
    pub fn new(trigger: Trigger) -> Self {
        Self {
            intent: HoverIntent::new(trigger),
            dismissal: OutsideDismissal::new(),
            panel: MenuPanelState::default(),
            pointer_inside: false,
        }
    }

    pub fn state(&self) -> HoverState {
        self.intent.state()
    }

    pub fn panel(&self) -> MenuPanelState {
        self.panel
    }

    pub fn is_visible(&self) -> bool {
        self.panel.visible
    }

    pub fn is_mounted(&self) -> bool {
        self.panel.mounted
    }

    pub fn dismissal(&self) -> &OutsideDismissal {
        &self.dismissal
    }

    pub fn set_resolved(&mut self, at: Point) {
        self.panel.resolved = at;
    }

    fn apply(&mut self, change: Option<IntentChange>, host: &mut Host) -> Option<SurfaceEvent> {
        match change? {
            IntentChange::Armed => {
                // a hidden panel waiting out its grace is about to be reused
                self.dismissal.abort_detach(host);
                None
            }
            IntentChange::Disarmed => {
                if self.panel.mounted && !self.panel.visible {
                    let grace = host.timings().detach_grace;
                    self.dismissal.schedule_detach(host, grace);
                }
                None
            }
            IntentChange::Opened(at) => {
                self.dismissal.abort_detach(host);
                self.dismissal.listen(host);
                self.panel = MenuPanelState {
                    visible: true,
                    mounted: true,
                    anchor: at,
                    resolved: at,
                };
                Some(SurfaceEvent::Opened(at))
            }
            IntentChange::Reanchored(at) => {
                self.panel.anchor = at;
                self.panel.resolved = at;
                Some(SurfaceEvent::Reanchored(at))
            }
            IntentChange::Held | IntentChange::Closing => None,
            IntentChange::Closed => {
                self.teardown(host);
                Some(SurfaceEvent::Unmounted)
            }
        }
    }

    /// Trigger gesture at `at`.
    pub fn trigger(&mut self, at: Point, host: &mut Host) -> Option<SurfaceEvent> {
        let change = self.intent.trigger(at, host);
        self.apply(change, host)
    }

    /// Report whether the pointer is over the surface (trigger region or any
    /// part of the open panel). Enter and leave fire on the edges only.
    pub fn pointer_over(&mut self, inside: bool, at: Point, host: &mut Host) -> Option<SurfaceEvent> {
        if inside == self.pointer_inside {
            return None;
        }
        self.pointer_inside = inside;
        let change = if inside {
            self.intent.pointer_enter(at, host)
        } else {
            self.intent.pointer_leave(host)
        };
        self.apply(change, host)
    }

    pub fn pointer_inside(&self) -> bool {
        self.pointer_inside
    }

    /// Close now: hide immediately, release the outside listener and detach
    /// after the grace period. Used for selection and outside clicks.
    pub fn dismiss(&mut self, host: &mut Host) -> Option<SurfaceEvent> {
        let was_open = self.intent.force_idle(host) || self.panel.visible;
        self.dismissal.stop_listening(host);
        if !was_open {
            return None;
        }
        self.panel.visible = false;
        if self.panel.mounted {
            let grace = host.timings().detach_grace;
            self.dismissal.schedule_detach(host, grace);
        }
        Some(SurfaceEvent::Hidden)
    }

    /// Capture-phase pointer-down. Returns true when it dismissed the panel.
    pub fn pointer_down(&mut self, target: &EventTarget, roots: &[Bounds], host: &mut Host) -> bool {
        if !self.dismissal.is_outside(target, roots) {
            return false;
        }
        tracing::debug!(?target, "pointer down outside menu panel");
        self.dismiss(host);
        true
    }

    pub fn on_wakeup(&mut self, wakeup: Wakeup, host: &mut Host) -> Option<SurfaceEvent> {
        if self.dismissal.on_wakeup(wakeup) {
            self.panel.mounted = false;
            self.panel.visible = false;
            return Some(SurfaceEvent::Unmounted);
        }
        let change = self.intent.on_wakeup(wakeup);
        self.apply(change, host)
    }

    fn teardown(&mut self, host: &mut Host) {
        self.dismissal.teardown(host);
        self.panel.visible = false;
        self.panel.mounted = false;
    }

    /// Synchronously cancel every timer and listener and drop the panel.
    pub fn unmount(&mut self, host: &mut Host) {
        self.intent.force_idle(host);
        self.teardown(host);
        self.pointer_inside = false;
    }
}
