//! Container whose height follows its content, with an open/close
//! transition.
//!
//! Opening takes two animation frames: the first collapses the container to
//! one row so the second, which applies the natural height, is a real
//! change. Closing drops to one row at once and removes the content when the
//! transition duration has passed.

use std::time::Duration;

use crossterm::event::Event;
use ratatui::layout::Rect;

use crate::components::{Component, ComponentContext};
use crate::host::{FrameId, Host, TimerId, Wakeup, WakeupSink};
use crate::ui::UiFrame;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoHeightState {
    Closed,
    Opening,
    Open,
    Closing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FramePhase {
    Collapse,
    Expand,
}

pub struct AutoHeight {
    state: AutoHeightState,
    natural: u16,
    height: Option<u16>,
    frame: Option<(FrameId, FramePhase)>,
    close_timer: Option<TimerId>,
    duration: Option<Duration>,
    content: Option<Box<dyn Component>>,
}

impl std::fmt::Debug for AutoHeight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutoHeight")
            .field("state", &self.state)
            .field("natural", &self.natural)
            .field("height", &self.height)
            .field("frame", &self.frame)
            .field("close_timer", &self.close_timer)
            .finish_non_exhaustive()
    }
}

impl AutoHeight {
    pub fn new(hide: bool, natural: u16) -> Self {
        Self {
            state: if hide {
                AutoHeightState::Closed
            } else {
                AutoHeightState::Open
            },
            natural,
            height: (!hide).then_some(natural),
            frame: None,
            close_timer: None,
            duration: None,
            content: None,
        }
    }

    pub fn with_content(mut self, content: impl Component + 'static) -> Self {
        self.content = Some(Box::new(content));
        self
    }

    /// Transition length; defaults to the host's `auto_height_duration`.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn state(&self) -> AutoHeightState {
        self.state
    }

    /// Current target height. `None` once closed: the content is out of the
    /// layout.
    pub fn height(&self) -> Option<u16> {
        self.height
    }

    pub fn set_hide(&mut self, hide: bool, host: &mut Host) {
        match (hide, self.state) {
            (false, AutoHeightState::Closed | AutoHeightState::Closing) => self.open(host),
            (true, AutoHeightState::Open | AutoHeightState::Opening) => self.close(host),
            _ => {}
        }
    }

    fn open(&mut self, host: &mut Host) {
        if let Some(id) = self.close_timer.take() {
            host.scheduler.clear_timeout(id);
        }
        self.cancel_frame(host);
        self.state = AutoHeightState::Opening;
        self.frame = Some((host.scheduler.request_frame(), FramePhase::Collapse));
        tracing::trace!(natural = self.natural, "auto height opening");
    }

    fn close(&mut self, host: &mut Host) {
        self.cancel_frame(host);
        if let Some(id) = self.close_timer.take() {
            host.scheduler.clear_timeout(id);
        }
        self.state = AutoHeightState::Closing;
        self.height = Some(1);
        let duration = self.duration.unwrap_or(host.timings().auto_height_duration);
        self.close_timer = Some(host.scheduler.set_timeout(duration));
        tracing::trace!("auto height closing");
    }

    fn cancel_frame(&mut self, host: &mut Host) {
        if let Some((id, _)) = self.frame.take() {
            host.scheduler.cancel_frame(id);
        }
    }

    /// New natural height of the content. Applied directly while open.
    pub fn content_resized(&mut self, natural: u16) {
        self.natural = natural;
        if self.state == AutoHeightState::Open {
            self.height = Some(natural);
        }
    }

    pub fn unmount(&mut self, host: &mut Host) {
        self.cancel_frame(host);
        if let Some(id) = self.close_timer.take() {
            host.scheduler.clear_timeout(id);
        }
    }
}

impl WakeupSink for AutoHeight {
    fn on_wakeup(&mut self, wakeup: Wakeup, host: &mut Host) -> bool {
        match wakeup {
            Wakeup::Frame(id) => {
                let Some((pending, phase)) = self.frame else {
                    return false;
                };
                if pending != id {
                    return false;
                }
                self.frame = None;
                match phase {
                    FramePhase::Collapse => {
                        self.height = Some(1);
                        self.frame = Some((host.scheduler.request_frame(), FramePhase::Expand));
                    }
                    FramePhase::Expand => {
                        self.height = Some(self.natural);
                        self.state = AutoHeightState::Open;
                    }
                }
                true
            }
            Wakeup::Timer(id) => {
                if self.close_timer != Some(id) {
                    return false;
                }
                self.close_timer = None;
                self.state = AutoHeightState::Closed;
                self.height = None;
                true
            }
        }
    }
}

impl Component for AutoHeight {
    fn resize(&mut self, area: Rect, host: &mut Host) {
        if let Some(content) = self.content.as_mut() {
            content.resize(area, host);
        }
    }

    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext) {
        let Some(height) = self.height else {
            return;
        };
        let Some(content) = self.content.as_mut() else {
            return;
        };
        let area = Rect {
            height: area.height.min(height),
            ..area
        };
        if area.height > 0 {
            content.render(frame, area, ctx);
        }
    }

    fn handle_event(&mut self, event: &Event, host: &mut Host, ctx: &ComponentContext) -> bool {
        if self.state != AutoHeightState::Open {
            return false;
        }
        self.content
            .as_mut()
            .is_some_and(|content| content.handle_event(event, host, ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_follows_hide() {
        assert_eq!(AutoHeight::new(true, 5).height(), None);
        let shown = AutoHeight::new(false, 5);
        assert_eq!(shown.state(), AutoHeightState::Open);
        assert_eq!(shown.height(), Some(5));
    }

    #[test]
    fn open_takes_two_frames() {
        let mut host = Host::default();
        let mut ah = AutoHeight::new(true, 8);
        ah.set_hide(false, &mut host);
        assert_eq!(ah.state(), AutoHeightState::Opening);
        host.frame(&mut ah);
        assert_eq!(ah.height(), Some(1));
        assert_eq!(ah.state(), AutoHeightState::Opening);
        host.frame(&mut ah);
        assert_eq!(ah.height(), Some(8));
        assert_eq!(ah.state(), AutoHeightState::Open);
    }

    #[test]
    fn close_waits_for_duration() {
        let mut host = Host::default();
        let mut ah = AutoHeight::new(false, 8).with_duration(Duration::from_millis(120));
        ah.set_hide(true, &mut host);
        assert_eq!(ah.height(), Some(1));
        host.advance(&mut ah, Duration::from_millis(119));
        assert_eq!(ah.state(), AutoHeightState::Closing);
        host.advance(&mut ah, Duration::from_millis(1));
        assert_eq!(ah.state(), AutoHeightState::Closed);
        assert_eq!(ah.height(), None);
    }

    #[test]
    fn closing_mid_open_cancels_the_frame() {
        let mut host = Host::default();
        let mut ah = AutoHeight::new(true, 8);
        ah.set_hide(false, &mut host);
        host.frame(&mut ah);
        ah.set_hide(true, &mut host);
        assert_eq!(host.scheduler.pending_frames(), 0);
        assert_eq!(host.frame(&mut ah), 0);
        assert_eq!(ah.height(), Some(1));
    }

    #[test]
    fn reopen_while_closing_cancels_the_timer() {
        let mut host = Host::default();
        let mut ah = AutoHeight::new(false, 4);
        ah.set_hide(true, &mut host);
        ah.set_hide(false, &mut host);
        assert_eq!(host.scheduler.pending_timers(), 0);
        host.frame(&mut ah);
        host.frame(&mut ah);
        host.advance(&mut ah, Duration::from_secs(1));
        assert_eq!(ah.state(), AutoHeightState::Open);
        assert_eq!(ah.height(), Some(4));
    }

    #[test]
    fn resize_applies_directly_when_open() {
        let mut ah = AutoHeight::new(false, 4);
        ah.content_resized(9);
        assert_eq!(ah.height(), Some(9));
        let mut closed = AutoHeight::new(true, 4);
        closed.content_resized(9);
        assert_eq!(closed.height(), None);
    }

    #[test]
    fn unmount_leaves_nothing_scheduled() {
        let mut host = Host::default();
        let mut ah = AutoHeight::new(true, 4);
        ah.set_hide(false, &mut host);
        ah.unmount(&mut host);
        assert_eq!(host.scheduler.pending_frames(), 0);
        let mut closing = AutoHeight::new(false, 4);
        closing.set_hide(true, &mut host);
        closing.unmount(&mut host);
        assert_eq!(host.scheduler.pending_timers(), 0);
    }
}
