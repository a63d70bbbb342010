//! Re-entrancy guard for the sync engine.

use std::cell::Cell;

/// Non-blocking per-instance guard. One sync runs at a time; a nested
/// attempt while held is dropped, never queued. Single-threaded by
/// construction (`Cell`, no `Sync`), matching the browser event loop.
#[derive(Debug, Default)]
pub struct SyncLock {
    held: Cell<bool>,
}

impl SyncLock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire unless already held. The returned guard releases on drop,
    /// including on early returns.
    #[must_use]
    pub fn try_acquire(&self) -> Option<SyncGuard<'_>> {
        if self.held.get() {
            return None;
        }
        self.held.set(true);
        Some(SyncGuard { lock: self })
    }

    #[must_use]
    pub fn is_held(&self) -> bool {
        self.held.get()
    }
}

pub struct SyncGuard<'a> {
    lock: &'a SyncLock,
}

impl Drop for SyncGuard<'_> {
    fn drop(&mut self) {
        self.lock.held.set(false);
    }
}
