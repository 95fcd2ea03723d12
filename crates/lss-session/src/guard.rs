//! Non-reentrant latch around the label pipeline.

use std::cell::Cell;

/// A boolean latch. Entry while held is refused, not queued.
#[derive(Debug, Default)]
pub struct ReentrancyGuard {
    held: Cell<bool>,
}

impl ReentrancyGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_held(&self) -> bool {
        self.held.get()
    }

    /// Acquire the latch, or `None` if it is already held.
    ///
    /// The latch is released when the returned value is dropped, including
    /// on early return and unwinding.
    #[must_use]
    pub fn try_enter(&self) -> Option<GuardLatch<'_>> {
        if self.held.replace(true) {
            return None;
        }
        Some(GuardLatch { guard: self })
    }
}

/// Proof that the latch is held.
#[derive(Debug)]
pub struct GuardLatch<'a> {
    guard: &'a ReentrancyGuard,
}

impl Drop for GuardLatch<'_> {
    fn drop(&mut self) {
        self.guard.held.set(false);
    }
}
