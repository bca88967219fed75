//! The environment widgets run in.
//!
//! `Host` bundles the services the widgets consume: a scheduler for timers
//! and animation frames, a document-level listener registry, and the current
//! viewport. Every state change happens inside a call that borrows the host
//! mutably, so there is exactly one event turn at a time.

pub mod abort;
pub mod document;
pub mod scheduler;

pub use abort::{AbortController, AbortSignal};
pub use document::{Document, EventTarget, ListenerId, ListenerKind};
pub use scheduler::{FrameId, Scheduler, TimerId, Wakeup};

use std::time::Duration;

use crate::config::{Metrics, Timings};
use crate::layout::Viewport;

/// Receives timer and frame wakeups. Implementors ignore wakeups whose
/// handle they no longer hold.
pub trait WakeupSink {
    fn on_wakeup(&mut self, wakeup: Wakeup, host: &mut Host) -> bool;
}

impl WakeupSink for [&mut dyn WakeupSink] {
    fn on_wakeup(&mut self, wakeup: Wakeup, host: &mut Host) -> bool {
        let mut handled = false;
        for sink in self.iter_mut() {
            handled |= sink.on_wakeup(wakeup, host);
        }
        handled
    }
}

#[derive(Debug)]
pub struct Host {
    pub scheduler: Scheduler,
    pub document: Document,
    viewport: Viewport,
    metrics: Metrics,
    timings: Timings,
}

impl Host {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            scheduler: Scheduler::new(),
            document: Document::new(),
            viewport,
            metrics: Metrics::default(),
            timings: Timings::default(),
        }
    }

    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_timings(mut self, timings: Timings) -> Self {
        self.timings = timings;
        self
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Record a new viewport size. Widgets that care are told through their
    /// own `viewport_resized` entry points.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        if self.viewport != viewport {
            tracing::debug!(width = viewport.width, height = viewport.height, "viewport resized");
        }
        self.viewport = viewport;
    }

    pub fn metrics(&self) -> Metrics {
        self.metrics
    }

    pub fn timings(&self) -> Timings {
        self.timings
    }

    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    /// Advance the clock by `by`, delivering every timer that falls due in
    /// deadline order. Timers scheduled by a sink during the advance fire in
    /// the same call when their deadline is within the window.
    pub fn advance<S: WakeupSink + ?Sized>(&mut self, sink: &mut S, by: Duration) -> usize {
        let horizon = self.scheduler.now().saturating_add(by);
        self.advance_to(sink, horizon)
    }

    pub fn advance_to<S: WakeupSink + ?Sized>(
        &mut self,
        sink: &mut S,
        horizon: Duration,
    ) -> usize {
        let mut fired = 0;
        while let Some(id) = self.scheduler.pop_due(horizon) {
            fired += 1;
            sink.on_wakeup(Wakeup::Timer(id), self);
        }
        self.scheduler.settle(horizon);
        fired
    }

    /// Run one animation frame: every frame requested before this call is
    /// delivered unless it was cancelled by an earlier callback in the batch.
    pub fn frame<S: WakeupSink + ?Sized>(&mut self, sink: &mut S) -> usize {
        let mut fired = 0;
        for id in self.scheduler.frame_batch() {
            if self.scheduler.claim_frame(id) {
                fired += 1;
                sink.on_wakeup(Wakeup::Frame(id), self);
            }
        }
        fired
    }
}

impl Default for Host {
    fn default() -> Self {
        Self::new(Viewport::new(1024, 768))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        seen: Vec<Wakeup>,
        chain: Option<TimerId>,
        cancel: Option<TimerId>,
    }

    impl WakeupSink for Recorder {
        fn on_wakeup(&mut self, wakeup: Wakeup, host: &mut Host) -> bool {
            self.seen.push(wakeup);
            if let Some(victim) = self.cancel.take() {
                host.scheduler.clear_timeout(victim);
            }
            if self.chain.is_none() && matches!(wakeup, Wakeup::Timer(_)) {
                self.chain = Some(host.scheduler.set_timeout(Duration::from_millis(5)));
            }
            if matches!(wakeup, Wakeup::Frame(_)) {
                host.scheduler.request_frame();
            }
            true
        }
    }

    #[test]
    fn chained_timers_fire_within_the_same_advance() {
        let mut host = Host::default();
        let mut rec = Recorder::default();
        host.scheduler.set_timeout(Duration::from_millis(1));
        assert_eq!(host.advance(&mut rec, Duration::from_millis(10)), 2);
        assert_eq!(host.now(), Duration::from_millis(10));
    }

    #[test]
    fn cancellation_during_a_turn_prevents_later_delivery() {
        let mut host = Host::default();
        let mut rec = Recorder::default();
        let first = host.scheduler.set_timeout(Duration::from_millis(1));
        let second = host.scheduler.set_timeout(Duration::from_millis(2));
        rec.cancel = Some(second);
        rec.chain = Some(first);
        host.advance(&mut rec, Duration::from_millis(3));
        assert_eq!(rec.seen, vec![Wakeup::Timer(first)]);
    }

    #[test]
    fn frames_requested_during_a_frame_wait_for_the_next() {
        let mut host = Host::default();
        let mut rec = Recorder::default();
        host.scheduler.request_frame();
        assert_eq!(host.frame(&mut rec), 1);
        assert_eq!(host.scheduler.pending_frames(), 1);
        assert_eq!(host.frame(&mut rec), 1);
    }
}
