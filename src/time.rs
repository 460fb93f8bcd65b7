//! Time abstraction for testability.
//!
//! This module provides a [`Clock`] trait that allows injecting virtual clocks
//! in tests while using the real system clock in production.
//!
//! Wall-clock time is used on purpose: the throttle compares timestamps read
//! from this clock and must cope with the clock being adjusted in either
//! direction. Timers themselves run on the scheduler's own timeline.

use std::time::SystemTime;

/// Abstraction over wall-clock time.
///
/// Implementations provide the current time, allowing tests to inject
/// controlled time values instead of relying on actual system time.
///
/// No `Send`/`Sync` bound: clocks are read from a single event-loop thread.
///
/// # Example
///
/// ```
/// use pacer::time::{Clock, SystemClock};
///
/// let clock = SystemClock;
/// let now = clock.now();
/// assert!(now >= std::time::SystemTime::UNIX_EPOCH);
/// ```
pub trait Clock {
    /// Returns the current time.
    fn now(&self) -> SystemTime;
}

/// Production clock using actual system time.
///
/// This is the default clock implementation that delegates to
/// [`SystemTime::now()`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> SystemTime {
        (**self).now()
    }
}
