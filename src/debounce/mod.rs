//! Debounce: run a callback once a burst of triggers has gone quiet.
//!
//! This module provides:
//! - Debounce configuration ([`DebouncePolicy`])
//! - The wrapped callback ([`Debounced`])
//! - A constructor wired to the tokio event loop ([`debounce`])

mod debouncer;
mod policy;

#[cfg(test)]
mod debouncer_tests;

use std::time::Duration;

pub use debouncer::Debounced;
pub use policy::DebouncePolicy;

use crate::schedule::TokioScheduler;

/// Wraps `callback` with debounce semantics on the current tokio `LocalSet`.
///
/// With `immediate` false the callback runs `wait` after the last trigger of a
/// burst; with `immediate` true it runs on the first trigger instead.
///
/// # Panics
///
/// Triggers panic if the wrapper is used outside of a
/// [`tokio::task::LocalSet`].
pub fn debounce<C, A, R, F>(
    callback: F,
    wait: Duration,
    immediate: bool,
) -> Debounced<C, A, R, TokioScheduler>
where
    C: 'static,
    A: 'static,
    R: Clone + 'static,
    F: Fn(C, A) -> R + 'static,
{
    Debounced::new(
        callback,
        DebouncePolicy::new(wait).with_immediate(immediate),
        TokioScheduler,
    )
}
