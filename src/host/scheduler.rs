//! Virtual clock with macrotask timers and animation frames.
//!
//! Nothing here runs callbacks on its own. The owning [`super::Host`] pops due
//! timers one at a time and hands them to a [`super::WakeupSink`], so a
//! cancellation issued while handling one wakeup always prevents a later one
//! from being delivered.

use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wakeup {
    Timer(TimerId),
    Frame(FrameId),
}

#[derive(Debug, Default)]
pub struct Scheduler {
    now: Duration,
    next_id: u64,
    timers: BTreeMap<TimerId, Duration>,
    frames: Vec<FrameId>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    pub fn set_timeout(&mut self, delay: Duration) -> TimerId {
        let id = TimerId(self.next_id());
        self.timers.insert(id, self.now.saturating_add(delay));
        id
    }

    /// Returns whether the timer was still pending. Clearing a fired or
    /// already-cleared timer is a no-op.
    pub fn clear_timeout(&mut self, id: TimerId) -> bool {
        self.timers.remove(&id).is_some()
    }

    pub fn timer_pending(&self, id: TimerId) -> bool {
        self.timers.contains_key(&id)
    }

    pub fn request_frame(&mut self) -> FrameId {
        let id = FrameId(self.next_id());
        self.frames.push(id);
        id
    }

    pub fn cancel_frame(&mut self, id: FrameId) -> bool {
        let before = self.frames.len();
        self.frames.retain(|f| *f != id);
        before != self.frames.len()
    }

    pub fn frame_pending(&self, id: FrameId) -> bool {
        self.frames.contains(&id)
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.values().min().copied()
    }

    /// Remove the earliest timer due at or before `horizon` and move the
    /// clock to its deadline. Ties resolve in scheduling order.
    pub(crate) fn pop_due(&mut self, horizon: Duration) -> Option<TimerId> {
        let (&id, &deadline) = self
            .timers
            .iter()
            .filter(|(_, deadline)| **deadline <= horizon)
            .min_by_key(|(id, deadline)| (**deadline, **id))?;
        self.timers.remove(&id);
        if deadline > self.now {
            self.now = deadline;
        }
        Some(id)
    }

    pub(crate) fn settle(&mut self, at: Duration) {
        if at > self.now {
            self.now = at;
        }
    }

    /// Frames requested so far. Frames requested while this batch runs land
    /// in the next one.
    pub(crate) fn frame_batch(&self) -> Vec<FrameId> {
        self.frames.clone()
    }

    /// Claim a frame from the current batch; false when it was cancelled in
    /// the meantime.
    pub(crate) fn claim_frame(&mut self, id: FrameId) -> bool {
        self.cancel_frame(id)
    }
}
