use std::cell::Cell;
use std::rc::Rc;

/// Read side of an [`AbortController`]. Cloned into whatever work may need
/// to be called off later.
#[derive(Debug, Clone, Default)]
pub struct AbortSignal(Rc<Cell<bool>>);

impl AbortSignal {
    pub fn aborted(&self) -> bool {
        self.0.get()
    }
}

#[derive(Debug, Default)]
pub struct AbortController {
    signal: AbortSignal,
}

impl AbortController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signal(&self) -> AbortSignal {
        self.signal.clone()
    }

    /// Idempotent.
    pub fn abort(&self) {
        self.signal.0.set(true);
    }
}
