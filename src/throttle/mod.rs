//! Throttle: run a callback at most once per window while triggers arrive.
//!
//! This module provides:
//! - Throttle configuration ([`ThrottlePolicy`])
//! - The wrapped callback ([`Throttled`])
//! - A constructor wired to the system clock and tokio event loop ([`throttle`])

mod policy;
mod throttler;


pub use policy::ThrottlePolicy;
pub use throttler::Throttled;

use crate::schedule::TokioScheduler;
use crate::time::SystemClock;

/// Wraps `callback` with throttle semantics on the current tokio `LocalSet`.
///
/// Window boundaries are measured with the system wall clock.
///
/// # Panics
///
/// Triggers that schedule a trailing execution panic if the wrapper is used
/// outside of a [`tokio::task::LocalSet`].
pub fn throttle<C, A, R, F>(
    callback: F,
    policy: ThrottlePolicy,
) -> Throttled<C, A, R, SystemClock, TokioScheduler>
where
    C: 'static,
    A: 'static,
    R: 'static,
    F: Fn(C, A) -> R + 'static,
{
    Throttled::new(callback, policy, SystemClock, TokioScheduler)
}
