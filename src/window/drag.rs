use crate::host::{Host, ListenerId, ListenerKind};
use crate::layout::Point;

/// Title-bar drag in progress.
///
/// The offset grows by the pointer delta between consecutive events rather
/// than being recomputed from the press position, so leaving and re-entering
/// the window mid-drag does not make it jump.
#[derive(Debug)]
pub struct HeaderDrag {
    last: Point,
    listeners: [ListenerId; 3],
}

impl HeaderDrag {
    /// Start a drag at `at` and register the document listeners it needs.
    pub fn begin(at: Point, host: &mut Host) -> Self {
        let listeners = [
            host.document.add_listener(ListenerKind::PointerMove),
            host.document.add_listener(ListenerKind::PointerUp),
            host.document.add_listener(ListenerKind::Resize),
        ];
        Self { last: at, listeners }
    }

    /// Delta since the previous pointer event.
    pub fn step(&mut self, at: Point) -> Point {
        let delta = Point::new(at.x - self.last.x, at.y - self.last.y);
        self.last = at;
        delta
    }

    pub fn end(self, host: &mut Host) {
        for id in self.listeners {
            host.document.remove_listener(id);
        }
    }
}
