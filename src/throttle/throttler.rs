//! The throttled callback wrapper.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::{Duration, SystemTime};

use super::ThrottlePolicy;
use crate::schedule::{Scheduler, TimerSlot};
use crate::time::Clock;

/// Where a trigger falls relative to the current throttle window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Window {
    /// No execution yet, or `wait` has passed since the last one.
    Open,
    /// The clock reads earlier than the last execution.
    ClockRewound,
    /// The window closes after this much longer.
    Closed(Duration),
}

impl Window {
    /// Classifies `now` against the last allowed execution.
    pub(super) fn at(wait: Duration, last: Option<SystemTime>, now: SystemTime) -> Self {
        let Some(last) = last else {
            return Self::Open;
        };

        match now.duration_since(last) {
            Ok(elapsed) => match wait.checked_sub(elapsed) {
                Some(remaining) if !remaining.is_zero() => Self::Closed(remaining),
                _ => Self::Open,
            },
            // A deadline measured from a later timestamp would never be
            // reached; treat the window as elapsed instead.
            Err(_) => Self::ClockRewound,
        }
    }
}

/// A callback wrapped with throttle semantics.
///
/// Created once per callback; every trigger goes through [`call`](Self::call).
/// The wrapper reads wall time from `K` and defers trailing executions on `S`.
///
/// The wrapper is single-threaded (`!Send`). Dropping it cancels any pending
/// trailing execution.
///
/// # Example
///
/// ```
/// use std::time::{Duration, SystemTime};
/// use pacer::schedule::VirtualTime;
/// use pacer::throttle::{ThrottlePolicy, Throttled};
///
/// let time = VirtualTime::new(SystemTime::UNIX_EPOCH);
/// let throttled = Throttled::new(
///     |_ctx: (), n: u32| n * 2,
///     ThrottlePolicy::new(Duration::from_millis(100)),
///     time.clone(),
///     time.clone(),
/// );
///
/// assert_eq!(throttled.call((), 1), Some(2)); // leading edge
/// assert_eq!(throttled.call((), 2), None); // saved for the trailing edge
/// assert!(throttled.is_pending());
/// ```
pub struct Throttled<C, A, R, K, S: Scheduler> {
    shared: Rc<Shared<C, A, R, K, S>>,
}

struct Shared<C, A, R, K, S: Scheduler> {
    callback: Box<dyn Fn(C, A) -> R>,
    policy: ThrottlePolicy,
    clock: K,
    scheduler: S,
    state: RefCell<State<C, A, S::Handle>>,
}

struct State<C, A, H> {
    timer: TimerSlot<H>,
    /// Time of the last allowed execution; `None` means never.
    last_invocation: Option<SystemTime>,
    /// Latest trigger not yet consumed by the trailing execution.
    saved: Option<(C, A)>,
}

impl<C, A, R, K, S> Throttled<C, A, R, K, S>
where
    C: 'static,
    A: 'static,
    R: 'static,
    K: Clock + 'static,
    S: Scheduler + 'static,
{
    /// Wraps `callback` with the given policy.
    ///
    /// A policy with both edges disabled is accepted and logged as a warning.
    pub fn new<F>(callback: F, policy: ThrottlePolicy, clock: K, scheduler: S) -> Self
    where
        F: Fn(C, A) -> R + 'static,
    {
        if policy.has_no_edges() {
            tracing::warn!(
                "Throttle configured with neither leading nor trailing edge; executions will not follow either edge"
            );
        }

        Self {
            shared: Rc::new(Shared {
                callback: Box::new(callback),
                policy,
                clock,
                scheduler,
                state: RefCell::new(State {
                    timer: TimerSlot::new(),
                    last_invocation: None,
                    saved: None,
                }),
            }),
        }
    }

    /// Handles one trigger.
    ///
    /// Returns the callback's result when this call runs it on the leading
    /// edge, and `None` otherwise. Results of trailing executions are not
    /// surfaced.
    pub fn call(&self, context: C, args: A) -> Option<R> {
        let shared = &self.shared;
        let mut state = shared.state.borrow_mut();
        let now = shared.clock.now();

        if !shared.policy.leading() && state.last_invocation.is_none() {
            state.last_invocation = Some(now);
        }

        let window = Window::at(shared.policy.wait(), state.last_invocation, now);
        let Window::Closed(remaining) = window else {
            if window == Window::ClockRewound {
                tracing::debug!("Throttle: clock moved backwards, treating window as elapsed");
            }
            state.timer.disarm();
            state.last_invocation = Some(now);
            state.saved = None;
            drop(state);
            return Some(shared.run_leading(context, args));
        };

        if shared.policy.trailing() {
            state.saved = Some((context, args));
            if !state.timer.is_armed() {
                let generation = state.timer.next_generation();
                let weak = Rc::downgrade(shared);
                let handle = shared.scheduler.schedule(
                    remaining,
                    Box::new(move || {
                        if let Some(shared) = weak.upgrade() {
                            shared.fire_trailing(generation);
                        }
                    }),
                );
                state.timer.arm(generation, handle);
                tracing::trace!("Throttle: trailing execution scheduled in {remaining:?}");
            }
        }

        None
    }

    /// Resets the throttle to its freshly constructed state.
    ///
    /// Cancels any pending trailing execution and forgets the last execution
    /// time, so the next trigger is handled like the first one ever.
    pub fn cancel(&self) {
        let mut state = self.shared.state.borrow_mut();
        if state.timer.disarm() {
            tracing::debug!("Throttle: cancelled pending trailing execution");
        }
        state.last_invocation = None;
        state.saved = None;
    }

    /// Returns `true` while a trailing execution is scheduled.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.shared.state.borrow().timer.is_armed()
    }

    /// Returns the policy this wrapper was built with.
    #[must_use]
    pub fn policy(&self) -> ThrottlePolicy {
        self.shared.policy
    }
}

impl<C, A, R, K: Clock, S: Scheduler> Shared<C, A, R, K, S> {
    /// Runs the callback for a trigger that opened a new window.
    ///
    /// The state must not be borrowed, so the callback may re-enter.
    fn run_leading(&self, context: C, args: A) -> R {
        tracing::trace!("Throttle: leading edge, invoking callback");
        let result = (self.callback)(context, args);

        let mut state = self.state.borrow_mut();
        if !state.timer.is_armed() {
            state.saved = None;
        }
        result
    }

    fn fire_trailing(&self, generation: u64) {
        let saved = {
            let mut state = self.state.borrow_mut();
            if !state.timer.claim(generation) {
                return;
            }
            state.last_invocation = self.policy.leading().then(|| self.clock.now());
            state.saved.take()
        };

        if let Some((context, args)) = saved {
            tracing::trace!("Throttle: trailing edge, invoking callback");
            let _ = (self.callback)(context, args);
        }
    }
}

impl<C, A, R, K, S: Scheduler> Drop for Throttled<C, A, R, K, S> {
    fn drop(&mut self) {
        if let Ok(mut state) = self.shared.state.try_borrow_mut() {
            state.timer.disarm();
        }
    }
}

impl<C, A, R, K, S: Scheduler> fmt::Debug for Throttled<C, A, R, K, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self
            .shared
            .state
            .try_borrow()
            .map(|state| (state.timer.is_armed(), state.last_invocation))
            .ok();
        f.debug_struct("Throttled")
            .field("policy", &self.shared.policy)
            .field("state", &snapshot)
            .finish_non_exhaustive()
    }
}
