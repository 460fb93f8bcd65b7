//! The debounced callback wrapper.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::DebouncePolicy;
use crate::schedule::{Scheduler, TimerSlot};

/// A callback wrapped with debounce semantics.
///
/// Created once per callback; every trigger goes through [`call`](Self::call).
/// Each instance owns its state: two wrappers around the same function do not
/// interact.
///
/// The wrapper is single-threaded (`!Send`). Deferred invocations run on the
/// scheduler's event loop, which must be the thread that owns the wrapper.
///
/// Dropping the wrapper cancels any pending invocation.
///
/// # Example
///
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use std::time::{Duration, SystemTime};
/// use pacer::debounce::{DebouncePolicy, Debounced};
/// use pacer::schedule::VirtualTime;
///
/// let time = VirtualTime::new(SystemTime::UNIX_EPOCH);
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let sink = Rc::clone(&seen);
/// let debounced = Debounced::new(
///     move |_ctx: (), n: u32| sink.borrow_mut().push(n),
///     DebouncePolicy::new(Duration::from_millis(100)),
///     time.clone(),
/// );
///
/// debounced.call((), 1);
/// time.advance(Duration::from_millis(50));
/// debounced.call((), 2);
/// time.advance(Duration::from_millis(100));
///
/// assert_eq!(*seen.borrow(), vec![2]);
/// ```
pub struct Debounced<C, A, R, S: Scheduler> {
    shared: Rc<Shared<C, A, R, S>>,
}

struct Shared<C, A, R, S: Scheduler> {
    callback: Box<dyn Fn(C, A) -> R>,
    policy: DebouncePolicy,
    scheduler: S,
    state: RefCell<State<R, S::Handle>>,
}

struct State<R, H> {
    timer: TimerSlot<H>,
    /// Result of the last synchronous (leading-edge) invocation.
    last_result: Option<R>,
}

impl<C, A, R, S> Debounced<C, A, R, S>
where
    C: 'static,
    A: 'static,
    R: Clone + 'static,
    S: Scheduler + 'static,
{
    /// Wraps `callback` with the given policy, scheduling on `scheduler`.
    pub fn new<F>(callback: F, policy: DebouncePolicy, scheduler: S) -> Self
    where
        F: Fn(C, A) -> R + 'static,
    {
        Self {
            shared: Rc::new(Shared {
                callback: Box::new(callback),
                policy,
                scheduler,
                state: RefCell::new(State {
                    timer: TimerSlot::new(),
                    last_result: None,
                }),
            }),
        }
    }

    /// Handles one trigger.
    ///
    /// Returns the result of the last leading-edge invocation, which is
    /// produced by this very call when it starts a burst in immediate mode.
    /// In trailing mode the callback has not run yet, so this is always
    /// `None`.
    pub fn call(&self, context: C, args: A) -> Option<R> {
        if self.shared.policy.immediate() {
            self.call_leading(context, args)
        } else {
            self.call_trailing(context, args)
        }
    }

    fn call_trailing(&self, context: C, args: A) -> Option<R> {
        let shared = &self.shared;
        let mut state = shared.state.borrow_mut();
        if state.timer.disarm() {
            tracing::trace!("Debounce: trigger superseded pending invocation");
        }

        let generation = state.timer.next_generation();
        let weak = Rc::downgrade(shared);
        let handle = shared.scheduler.schedule(
            shared.policy.wait(),
            Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    shared.fire_trailing(generation, context, args);
                }
            }),
        );
        state.timer.arm(generation, handle);

        state.last_result.clone()
    }

    fn call_leading(&self, context: C, args: A) -> Option<R> {
        let shared = &self.shared;
        let mut state = shared.state.borrow_mut();
        let call_now = !state.timer.disarm();

        let generation = state.timer.next_generation();
        let weak = Rc::downgrade(shared);
        let handle = shared.scheduler.schedule(
            shared.policy.wait(),
            Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    shared.close_burst(generation);
                }
            }),
        );
        state.timer.arm(generation, handle);

        if !call_now {
            tracing::trace!("Debounce: trigger suppressed, quiet period extended");
            return state.last_result.clone();
        }

        // Release the state before running user code so the callback may
        // re-enter this wrapper.
        drop(state);
        tracing::trace!("Debounce: leading edge, invoking callback");
        let result = (shared.callback)(context, args);
        shared.state.borrow_mut().last_result = Some(result.clone());
        Some(result)
    }

    /// Discards any pending invocation and ends the current burst.
    ///
    /// The next trigger is treated as the first of a new burst. Calling this
    /// with nothing pending is a no-op.
    pub fn cancel(&self) {
        if self.shared.state.borrow_mut().timer.disarm() {
            tracing::debug!("Debounce: cancelled pending timer");
        }
    }

    /// Returns `true` while a trailing invocation is scheduled.
    ///
    /// Always `false` in immediate mode, where the pending timer only marks
    /// the end of a burst.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        !self.shared.policy.immediate() && self.shared.state.borrow().timer.is_armed()
    }

    /// Returns the policy this wrapper was built with.
    #[must_use]
    pub fn policy(&self) -> DebouncePolicy {
        self.shared.policy
    }
}

impl<C, A, R, S: Scheduler> Shared<C, A, R, S> {
    fn fire_trailing(&self, generation: u64, context: C, args: A) {
        if !self.state.borrow_mut().timer.claim(generation) {
            return;
        }
        tracing::trace!("Debounce: quiet period elapsed, invoking callback");
        let _ = (self.callback)(context, args);
    }

    fn close_burst(&self, generation: u64) {
        if self.state.borrow_mut().timer.claim(generation) {
            tracing::trace!("Debounce: burst closed");
        }
    }
}

impl<C, A, R, S: Scheduler> Drop for Debounced<C, A, R, S> {
    fn drop(&mut self) {
        if let Ok(mut state) = self.shared.state.try_borrow_mut() {
            state.timer.disarm();
        }
    }
}

impl<C, A, R, S: Scheduler> fmt::Debug for Debounced<C, A, R, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let armed = self
            .shared
            .state
            .try_borrow()
            .map(|state| state.timer.is_armed())
            .ok();
        f.debug_struct("Debounced")
            .field("policy", &self.shared.policy)
            .field("timer_armed", &armed)
            .finish_non_exhaustive()
    }
}
