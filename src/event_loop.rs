use std::io;
use std::time::{Duration, Instant};

use crossterm::event::Event;

use crate::drivers::InputDriver;

pub enum ControlFlow {
    Continue,
    Quit,
}

/// A centralized event loop that drives the main UI thread.
///
/// It owns the input driver, polls it, and hands each event to the handler
/// together with the wall-clock time since the previous call. The handler
/// feeds that time to [`crate::host::Host::advance`] so menu and window
/// timers fire in real time.
pub struct EventLoop<D> {
    driver: D,
    poll_interval: Duration,
    last: Option<Instant>,
}

impl<D: InputDriver> EventLoop<D> {
    pub fn new(driver: D, poll_interval: Duration) -> Self {
        Self {
            driver,
            poll_interval,
            last: None,
        }
    }

    pub fn driver(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    fn elapsed(&mut self) -> Duration {
        let now = Instant::now();
        let elapsed = self.last.map_or(Duration::ZERO, |last| now.duration_since(last));
        self.last = Some(now);
        elapsed
    }

    /// Runs the application loop, taking control of the current thread.
    ///
    /// The `handler` is called with:
    /// - `Some(event)` when an input event occurs;
    /// - `None` when the poll interval elapses without an event (time to
    ///   advance timers, run a frame and draw).
    pub fn run<F>(&mut self, mut handler: F) -> io::Result<()>
    where
        F: FnMut(&mut D, Option<Event>, Duration) -> io::Result<ControlFlow>,
    {
        loop {
            let elapsed = self.elapsed();
            if let ControlFlow::Quit = handler(&mut self.driver, None, elapsed)? {
                break;
            }

            if self.driver.poll(self.poll_interval)? {
                // Drain bursts (mouse drags) before the next draw.
                loop {
                    let event = self.driver.read()?;
                    let elapsed = self.elapsed();
                    if let ControlFlow::Quit = handler(&mut self.driver, Some(event), elapsed)? {
                        return Ok(());
                    }
                    if !self.driver.poll(Duration::from_millis(0))? {
                        break;
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::collections::VecDeque;

    struct Scripted(VecDeque<Event>);

    impl InputDriver for Scripted {
        fn poll(&mut self, _timeout: Duration) -> io::Result<bool> {
            Ok(!self.0.is_empty())
        }

        fn read(&mut self) -> io::Result<Event> {
            self.0.pop_front().ok_or_else(|| io::Error::other("drained"))
        }
    }

    #[test]
    fn events_then_ticks_until_quit() {
        let script = VecDeque::from([
            Event::Key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE)),
            Event::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)),
        ]);
        let mut lp = EventLoop::new(Scripted(script), Duration::from_millis(1));
        let mut seen = Vec::new();
        lp.run(|_, event, _| {
            let quit = matches!(&event, Some(Event::Key(k)) if k.code == KeyCode::Char('q'));
            seen.push(event.is_some());
            Ok(if quit { ControlFlow::Quit } else { ControlFlow::Continue })
        })
        .unwrap();
        assert_eq!(seen, vec![false, true, true]);
    }
}
