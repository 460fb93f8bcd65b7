//! Ownership of at most one outstanding timer.

use super::CancelHandle;

/// Holds the single pending timer of a wrapper.
///
/// Every armed timer is tagged with a generation. A firing timer must
/// [`claim`](Self::claim) its generation before acting; once the slot has been
/// disarmed or re-armed, stale firings fail the claim and become no-ops.
#[derive(Debug)]
pub struct TimerSlot<H> {
    armed: Option<(u64, H)>,
    generation: u64,
}

impl<H: CancelHandle> TimerSlot<H> {
    pub const fn new() -> Self {
        Self {
            armed: None,
            generation: 0,
        }
    }

    pub const fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Reserves the generation for the next timer to be armed.
    pub const fn next_generation(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.generation
    }

    /// Stores the handle for a freshly scheduled timer.
    ///
    /// Any timer still held is cancelled first.
    pub fn arm(&mut self, generation: u64, handle: H) {
        self.disarm();
        self.armed = Some((generation, handle));
    }

    /// Cancels the held timer. Returns whether one was held.
    pub fn disarm(&mut self) -> bool {
        self.armed.take().is_some_and(|(_, handle)| {
            handle.cancel();
            true
        })
    }

    /// Releases the slot on behalf of a firing timer.
    ///
    /// Returns `false` when `generation` is no longer the armed one.
    pub fn claim(&mut self, generation: u64) -> bool {
        match self.armed {
            Some((armed, _)) if armed == generation => {
                self.armed = None;
                true
            }
            _ => false,
        }
    }
}

impl<H: CancelHandle> Default for TimerSlot<H> {
    fn default() -> Self {
        Self::new()
    }
}
