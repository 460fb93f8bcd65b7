//! The gate: a rate-limited callback that forwards lines to a sink.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use super::{Emission, LineSink, Trigger};
use crate::debounce::{DebouncePolicy, Debounced};
use crate::schedule::Scheduler;
use crate::throttle::{ThrottlePolicy, Throttled};
use crate::time::Clock;

/// Which limiter a [`Gate`] applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimiterMode {
    /// Let a line through once input has gone quiet.
    Debounce(DebouncePolicy),
    /// Let lines through at most once per window.
    Throttle(ThrottlePolicy),
}

impl LimiterMode {
    /// Returns the configured wait.
    #[must_use]
    pub const fn wait(&self) -> Duration {
        match self {
            Self::Debounce(policy) => policy.wait(),
            Self::Throttle(policy) => policy.wait(),
        }
    }

    /// Returns the limiter name as used on the command line.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Debounce(_) => "debounce",
            Self::Throttle(_) => "throttle",
        }
    }
}

impl fmt::Display for LimiterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let wait_ms = self.wait().as_millis();
        match self {
            Self::Debounce(policy) => write!(
                f,
                "debounce(wait: {wait_ms}ms, immediate: {})",
                policy.immediate()
            ),
            Self::Throttle(policy) => write!(
                f,
                "throttle(wait: {wait_ms}ms, leading: {}, trailing: {})",
                policy.leading(),
                policy.trailing()
            ),
        }
    }
}

enum Limiter<K, S: Scheduler> {
    Debounce(Debounced<Trigger, String, u64, S>),
    Throttle(Throttled<Trigger, String, u64, K, S>),
}

/// Rate-limits lines on their way to a [`LineSink`].
///
/// The wrapped callback writes the line and returns the running number of
/// emissions, which [`submit`](Self::submit) surfaces when the line went
/// through synchronously.
pub struct Gate<K, S: Scheduler> {
    mode: LimiterMode,
    limiter: Limiter<K, S>,
    emitted: Rc<Cell<u64>>,
}

impl<K, S> Gate<K, S>
where
    K: Clock + Clone + 'static,
    S: Scheduler + 'static,
{
    /// Builds the limiter selected by `mode` in front of `sink`.
    ///
    /// `clock` stamps emissions and, for throttling, measures windows.
    pub fn new(mode: LimiterMode, sink: Rc<dyn LineSink>, clock: K, scheduler: S) -> Self {
        let emitted = Rc::new(Cell::new(0));

        let callback = {
            let emitted = Rc::clone(&emitted);
            let clock = clock.clone();
            move |trigger: Trigger, line: String| {
                let count = emitted.get() + 1;
                emitted.set(count);

                let held = clock
                    .now()
                    .duration_since(trigger.received_at)
                    .unwrap_or_default();
                tracing::debug!("Emitting line #{} after {held:?}", trigger.seq);

                sink.emit(&Emission {
                    seq: trigger.seq,
                    line,
                    held_ms: u64::try_from(held.as_millis()).unwrap_or(u64::MAX),
                });
                count
            }
        };

        let limiter = match mode {
            LimiterMode::Debounce(policy) => {
                Limiter::Debounce(Debounced::new(callback, policy, scheduler))
            }
            LimiterMode::Throttle(policy) => {
                Limiter::Throttle(Throttled::new(callback, policy, clock, scheduler))
            }
        };

        Self {
            mode,
            limiter,
            emitted,
        }
    }

    /// Submits one line.
    ///
    /// Returns the running emission count when the limiter ran the callback
    /// (or, for immediate debounce, reports its last synchronous result).
    pub fn submit(&self, trigger: Trigger, line: String) -> Option<u64> {
        match &self.limiter {
            Limiter::Debounce(debounced) => debounced.call(trigger, line),
            Limiter::Throttle(throttled) => throttled.call(trigger, line),
        }
    }

    /// Discards any pending line.
    pub fn cancel(&self) {
        match &self.limiter {
            Limiter::Debounce(debounced) => debounced.cancel(),
            Limiter::Throttle(throttled) => throttled.cancel(),
        }
    }

    /// Returns `true` while a line is waiting to be emitted.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        match &self.limiter {
            Limiter::Debounce(debounced) => debounced.is_pending(),
            Limiter::Throttle(throttled) => throttled.is_pending(),
        }
    }

    /// Number of lines emitted so far.
    #[must_use]
    pub fn emitted(&self) -> u64 {
        self.emitted.get()
    }

    /// Returns the limiter configuration.
    #[must_use]
    pub const fn mode(&self) -> LimiterMode {
        self.mode
    }
}

impl<K, S: Scheduler> fmt::Debug for Gate<K, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gate")
            .field("mode", &self.mode)
            .field("emitted", &self.emitted.get())
            .finish_non_exhaustive()
    }
}
