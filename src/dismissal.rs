//! Closing a floating surface when the pointer goes down somewhere else.
//!
//! Two concerns live here and stay independent of each other:
//!
//! - the capture-phase pointer-down listener, registered on the
//!   [`Document`](crate::host::Document) only while the surface is open;
//! - the detach grace, a timer guarded by an [`AbortController`] that keeps a
//!   hidden surface in the render tree long enough to fade out. Reopening
//!   during the grace aborts the pending detach instead of unmounting and
//!   remounting.

use std::time::Duration;

use crate::host::{AbortController, AbortSignal, EventTarget, Host, ListenerId, ListenerKind};
use crate::host::{TimerId, Wakeup};
use crate::layout::Bounds;

#[derive(Debug)]
struct PendingDetach {
    timer: TimerId,
    signal: AbortSignal,
}

#[derive(Debug, Default)]
pub struct OutsideDismissal {
    listener: Option<ListenerId>,
    controller: Option<AbortController>,
    pending: Option<PendingDetach>,
}

impl OutsideDismissal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listening(&self) -> bool {
        self.listener.is_some()
    }

    pub fn detach_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Start listening for outside pointer-downs. Repeated calls keep a
    /// single listener.
    pub fn listen(&mut self, host: &mut Host) {
        if self.listener.is_none() {
            self.listener = Some(host.document.add_listener(ListenerKind::PointerDownCapture));
        }
    }

    pub fn stop_listening(&mut self, host: &mut Host) {
        if let Some(id) = self.listener.take() {
            host.document.remove_listener(id);
        }
    }

    /// True when a pointer-down on `target` should close a surface made of
    /// `roots` (the panel plus anything it portals, such as open submenus).
    /// Only answers while listening.
    pub fn is_outside(&self, target: &EventTarget, roots: &[Bounds]) -> bool {
        self.listener.is_some() && !roots.iter().any(|root| target.is_within(root))
    }

    /// Schedule detachment after `grace`. Any earlier pending detach is
    /// aborted first so at most one is in flight.
    pub fn schedule_detach(&mut self, host: &mut Host, grace: Duration) {
        self.abort_detach(host);
        let controller = AbortController::new();
        let signal = controller.signal();
        self.controller = Some(controller);
        let timer = host.scheduler.set_timeout(grace);
        self.pending = Some(PendingDetach { timer, signal });
    }

    /// Abort a pending detach; a no-op when none is pending.
    pub fn abort_detach(&mut self, host: &mut Host) {
        if let Some(controller) = self.controller.take() {
            controller.abort();
        }
        if let Some(pending) = self.pending.take() {
            host.scheduler.clear_timeout(pending.timer);
        }
    }

    /// Returns true when `wakeup` is this surface's detach timer firing
    /// un-aborted, i.e. the caller should now drop the surface from the
    /// render tree.
    pub fn on_wakeup(&mut self, wakeup: Wakeup) -> bool {
        let Wakeup::Timer(id) = wakeup else {
            return false;
        };
        match &self.pending {
            Some(pending) if pending.timer == id => {
                let aborted = pending.signal.aborted();
                self.pending = None;
                self.controller = None;
                !aborted
            }
            _ => false,
        }
    }

    /// Release the listener and any pending detach.
    pub fn teardown(&mut self, host: &mut Host) {
        self.stop_listening(host);
        self.abort_detach(host);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::WakeupSink;
    use crate::layout::Point;

    #[derive(Default)]
    struct Probe {
        dismissal: OutsideDismissal,
        detached: usize,
    }

    impl WakeupSink for Probe {
        fn on_wakeup(&mut self, wakeup: Wakeup, _host: &mut Host) -> bool {
            if self.dismissal.on_wakeup(wakeup) {
                self.detached += 1;
                return true;
            }
            false
        }
    }

    #[test]
    fn outside_versus_inside() {
        let mut host = Host::default();
        let mut d = OutsideDismissal::new();
        let root = [Bounds::new(10, 20, 10, 20), Bounds::new(30, 40, 10, 20)];
        let outside = EventTarget::Cell(Point::new(0, 0));
        let inside = EventTarget::Cell(Point::new(12, 12));
        // not listening: nothing is ever outside
        assert!(!d.is_outside(&outside, &root));
        d.listen(&mut host);
        assert!(d.is_outside(&outside, &root));
        assert!(!d.is_outside(&inside, &root));
        assert!(!d.is_outside(&EventTarget::Cell(Point::new(35, 15)), &root));
        assert!(d.is_outside(&EventTarget::Detached, &root));
    }

    #[test]
    fn listener_is_single_and_released() {
        let mut host = Host::default();
        let mut d = OutsideDismissal::new();
        d.listen(&mut host);
        d.listen(&mut host);
        assert_eq!(host.document.listener_count(ListenerKind::PointerDownCapture), 1);
        d.teardown(&mut host);
        assert_eq!(host.document.total_listeners(), 0);
    }

    #[test]
    fn detach_fires_after_grace() {
        let mut host = Host::default();
        let mut probe = Probe::default();
        probe
            .dismissal
            .schedule_detach(&mut host, Duration::from_millis(300));
        host.advance(&mut probe, Duration::from_millis(299));
        assert_eq!(probe.detached, 0);
        host.advance(&mut probe, Duration::from_millis(1));
        assert_eq!(probe.detached, 1);
        assert!(!probe.dismissal.detach_pending());
    }

    #[test]
    fn abort_cancels_pending_detach() {
        let mut host = Host::default();
        let mut probe = Probe::default();
        probe
            .dismissal
            .schedule_detach(&mut host, Duration::from_millis(300));
        probe.dismissal.abort_detach(&mut host);
        probe.dismissal.abort_detach(&mut host);
        host.advance(&mut probe, Duration::from_millis(1000));
        assert_eq!(probe.detached, 0);
        assert_eq!(host.scheduler.pending_timers(), 0);
    }

    #[test]
    fn rescheduling_keeps_one_detach_in_flight() {
        let mut host = Host::default();
        let mut probe = Probe::default();
        probe
            .dismissal
            .schedule_detach(&mut host, Duration::from_millis(300));
        host.advance(&mut probe, Duration::from_millis(200));
        probe
            .dismissal
            .schedule_detach(&mut host, Duration::from_millis(300));
        assert_eq!(host.scheduler.pending_timers(), 1);
        host.advance(&mut probe, Duration::from_millis(200));
        assert_eq!(probe.detached, 0);
        host.advance(&mut probe, Duration::from_millis(100));
        assert_eq!(probe.detached, 1);
    }
}
