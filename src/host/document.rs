//! Document-level listener bookkeeping.
//!
//! Widgets register here while they need document-wide input (outside
//! clicks, drag moves, viewport resizes) and must deregister when done. The
//! registry is what tests inspect to prove nothing leaks after close or
//! unmount.

use std::collections::BTreeMap;

use crossterm::event::MouseEvent;

use crate::layout::{Bounds, Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    PointerDownCapture,
    PointerMove,
    PointerUp,
    Resize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

/// What a pointer event landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTarget {
    /// A rendered cell.
    Cell(Point),
    /// Something that is not part of any rendered element (the host could
    /// not resolve the event to a position).
    Detached,
}

impl EventTarget {
    pub fn from_mouse(mouse: &MouseEvent) -> Self {
        Self::Cell(Point::from_cell(mouse.column, mouse.row))
    }

    pub fn point(&self) -> Option<Point> {
        match self {
            Self::Cell(p) => Some(*p),
            Self::Detached => None,
        }
    }

    /// Containment test used by outside dismissal: a detached target is
    /// never inside anything.
    pub fn is_within(&self, root: &Bounds) -> bool {
        match self {
            Self::Cell(p) => root.contains(*p),
            Self::Detached => false,
        }
    }
}

#[derive(Debug, Default)]
pub struct Document {
    next_id: u64,
    listeners: BTreeMap<ListenerId, ListenerKind>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener(&mut self, kind: ListenerKind) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.listeners.insert(id, kind);
        id
    }

    /// Removing an unknown or already-removed listener is a no-op.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(&id).is_some()
    }

    pub fn is_listening(&self, id: ListenerId) -> bool {
        self.listeners.contains_key(&id)
    }

    pub fn listener_count(&self, kind: ListenerKind) -> usize {
        self.listeners.values().filter(|k| **k == kind).count()
    }

    pub fn total_listeners(&self) -> usize {
        self.listeners.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_remove_listeners() {
        let mut doc = Document::new();
        let a = doc.add_listener(ListenerKind::PointerDownCapture);
        let b = doc.add_listener(ListenerKind::Resize);
        assert_eq!(doc.listener_count(ListenerKind::PointerDownCapture), 1);
        assert!(doc.remove_listener(a));
        assert!(!doc.remove_listener(a));
        assert!(doc.is_listening(b));
        assert_eq!(doc.total_listeners(), 1);
    }

    #[test]
    fn detached_target_is_never_within() {
        let root = Bounds::new(0, 10, 0, 10);
        assert!(!EventTarget::Detached.is_within(&root));
        assert!(EventTarget::Cell(Point::new(2, 2)).is_within(&root));
        assert!(!EventTarget::Cell(Point::new(12, 2)).is_within(&root));
    }
}
