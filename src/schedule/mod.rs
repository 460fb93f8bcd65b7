//! Deferred execution with cancellation.
//!
//! This module provides:
//! - The scheduling capability ([`Scheduler`], [`CancelHandle`])
//! - A tokio-backed implementation for a `LocalSet` ([`TokioScheduler`])
//! - A deterministic virtual clock and scheduler ([`VirtualTime`])
//!
//! The wrappers in [`crate::debounce`] and [`crate::throttle`] only ever talk
//! to these traits, so their state machines can be driven by a real event loop
//! or stepped through virtual time in tests.

mod local;
mod slot;
mod virtual_time;


use std::time::Duration;

pub use local::{TokioScheduler, TokioTimerHandle};
pub(crate) use slot::TimerSlot;
pub use virtual_time::{VirtualTime, VirtualTimerHandle};

/// A deferred action.
///
/// Actions run on the scheduler's event-loop thread, so they need not be `Send`.
pub type Action = Box<dyn FnOnce()>;

/// Handle to a scheduled action.
pub trait CancelHandle {
    /// Prevents the action from running.
    ///
    /// Idempotent: cancelling twice, or cancelling an action that has
    /// already run, does nothing.
    fn cancel(&self);
}

/// Capability to run an action once, no sooner than a delay from now.
pub trait Scheduler {
    /// Handle returned for each scheduled action.
    type Handle: CancelHandle;

    /// Schedules `action` to run once after `delay`.
    ///
    /// Must not run the action synchronously, even for a zero delay.
    fn schedule(&self, delay: Duration, action: Action) -> Self::Handle;
}

impl<S: Scheduler + ?Sized> Scheduler for &S {
    type Handle = S::Handle;

    fn schedule(&self, delay: Duration, action: Action) -> Self::Handle {
        (**self).schedule(delay, action)
    }
}
