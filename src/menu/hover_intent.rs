//! Debounced open/close state machine shared by every menu surface.
//!
//! ```text
//! Idle --trigger--> Armed --arm timer--> Open --leave--> Closing --close timer--> Idle
//!                     |                   ^                |
//!                     +--leave--> Idle    +---re-enter-----+
//! ```
//!
//! Only one timer is ever in flight. It is cleared before a replacement is
//! scheduled, and a wakeup for any other handle is ignored.

use crate::host::{Host, TimerId, Wakeup};
use crate::layout::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HoverState {
    #[default]
    Idle,
    Armed,
    Open,
    Closing,
}

/// Gesture that opens a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    ContextMenu,
    PointerEnter,
    Click,
}

/// Transitions callers act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentChange {
    Armed,
    /// Arm timer fired; the committed anchor is attached.
    Opened(Point),
    /// A trigger while open or closing moved the anchor.
    Reanchored(Point),
    /// Closing was cancelled by re-entry.
    Held,
    Closing,
    /// Armed state abandoned before anything showed.
    Disarmed,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerRole {
    Arm,
    Close,
}

#[derive(Debug)]
pub struct HoverIntent {
    trigger: Trigger,
    state: HoverState,
    timer: Option<(TimerId, TimerRole)>,
    pending: Point,
}

impl HoverIntent {
    pub fn new(trigger: Trigger) -> Self {
        Self {
            trigger,
            state: HoverState::Idle,
            timer: None,
            pending: Point::default(),
        }
    }

    pub fn state(&self) -> HoverState {
        self.state
    }

    pub fn trigger_kind(&self) -> Trigger {
        self.trigger
    }

    pub fn timer_pending(&self) -> bool {
        self.timer.is_some()
    }

    fn clear_timer(&mut self, host: &mut Host) {
        if let Some((id, _)) = self.timer.take() {
            host.scheduler.clear_timeout(id);
        }
    }

    fn start_timer(&mut self, host: &mut Host, role: TimerRole) {
        self.clear_timer(host);
        let delay = match role {
            TimerRole::Arm => host.timings().arm_delay,
            TimerRole::Close => host.timings().close_delay,
        };
        self.timer = Some((host.scheduler.set_timeout(delay), role));
    }

    /// The surface's trigger gesture happened at `at`.
    pub fn trigger(&mut self, at: Point, host: &mut Host) -> Option<IntentChange> {
        self.pending = at;
        match self.state {
            HoverState::Idle => {
                self.start_timer(host, TimerRole::Arm);
                self.state = HoverState::Armed;
                Some(IntentChange::Armed)
            }
            HoverState::Armed => None,
            HoverState::Open => Some(IntentChange::Reanchored(at)),
            HoverState::Closing => {
                self.clear_timer(host);
                self.state = HoverState::Open;
                Some(IntentChange::Reanchored(at))
            }
        }
    }

    /// Pointer entered the surface or its open panel.
    pub fn pointer_enter(&mut self, at: Point, host: &mut Host) -> Option<IntentChange> {
        match self.state {
            HoverState::Idle if self.trigger == Trigger::PointerEnter => self.trigger(at, host),
            HoverState::Closing => {
                self.clear_timer(host);
                self.state = HoverState::Open;
                Some(IntentChange::Held)
            }
            _ => None,
        }
    }

    /// Pointer left the surface and its open panel.
    pub fn pointer_leave(&mut self, host: &mut Host) -> Option<IntentChange> {
        match self.state {
            HoverState::Armed => {
                self.clear_timer(host);
                self.state = HoverState::Idle;
                Some(IntentChange::Disarmed)
            }
            HoverState::Open => {
                self.start_timer(host, TimerRole::Close);
                self.state = HoverState::Closing;
                Some(IntentChange::Closing)
            }
            HoverState::Idle | HoverState::Closing => None,
        }
    }

    /// Selection or outside dismissal: straight to idle, whatever is pending.
    /// Returns whether anything changed.
    pub fn force_idle(&mut self, host: &mut Host) -> bool {
        self.clear_timer(host);
        let changed = self.state != HoverState::Idle;
        self.state = HoverState::Idle;
        changed
    }

    pub fn on_wakeup(&mut self, wakeup: Wakeup) -> Option<IntentChange> {
        let Wakeup::Timer(fired) = wakeup else {
            return None;
        };
        let (id, role) = self.timer?;
        if id != fired {
            return None;
        }
        self.timer = None;
        match (role, self.state) {
            (TimerRole::Arm, HoverState::Armed) => {
                self.state = HoverState::Open;
                Some(IntentChange::Opened(self.pending))
            }
            (TimerRole::Close, HoverState::Closing) => {
                self.state = HoverState::Idle;
                Some(IntentChange::Closed)
            }
            _ => {
                tracing::trace!(?role, state = ?self.state, "stale hover timer ignored");
                None
            }
        }
    }
}
