//! pacer: debounce and throttle for callbacks
//!
//! A library for rate-limiting how often a callback runs in response to a
//! burst of triggers, plus the line-gating layer behind the `pacer` tool.
//!
//! - [`debounce`]: run once a burst has gone quiet (or on its first trigger)
//! - [`throttle`]: run at most once per window, on either or both edges
//! - [`schedule`]: the timer abstraction both wrappers defer work through
//! - [`time`]: the wall clock abstraction
//! - [`relay`] and [`config`]: the command-line tool's building blocks

pub mod config;
pub mod debounce;
pub mod relay;
pub mod schedule;
pub mod throttle;
pub mod time;

pub use debounce::debounce;
pub use throttle::throttle;
