//! Deterministic virtual clock and scheduler.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::{Duration, SystemTime};

use crate::time::Clock;

use super::{Action, CancelHandle, Scheduler};

/// Timer queue key: monotonic deadline, then insertion order.
type TimerKey = (Duration, u64);

/// A manually driven clock and scheduler.
///
/// Keeps two timelines, as a browser or OS does:
/// - a monotonic timeline on which timers are due ([`elapsed`](Self::elapsed))
/// - a wall clock exposed through [`Clock`], which normally moves with the
///   monotonic timeline but can be set independently to simulate clock
///   adjustments ([`set_wall_clock`](Self::set_wall_clock))
///
/// Nothing happens until [`advance`](Self::advance) is called. Clones share the
/// same timelines and timer queue.
///
/// # Example
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use std::time::{Duration, SystemTime};
/// use pacer::schedule::{Scheduler, VirtualTime};
///
/// let time = VirtualTime::new(SystemTime::UNIX_EPOCH);
/// let fired = Rc::new(Cell::new(false));
/// let flag = Rc::clone(&fired);
/// let _handle = time.schedule(Duration::from_millis(10), Box::new(move || flag.set(true)));
///
/// time.advance(Duration::from_millis(9));
/// assert!(!fired.get());
/// time.advance(Duration::from_millis(1));
/// assert!(fired.get());
/// ```
#[derive(Clone)]
pub struct VirtualTime {
    inner: Rc<RefCell<Timeline>>,
}

struct Timeline {
    elapsed: Duration,
    wall: SystemTime,
    next_id: u64,
    timers: BTreeMap<TimerKey, Action>,
}

/// Cancels a timer scheduled on [`VirtualTime`].
#[derive(Debug)]
pub struct VirtualTimerHandle {
    key: TimerKey,
    timeline: Weak<RefCell<Timeline>>,
}

impl VirtualTime {
    /// Creates a virtual timeline whose wall clock starts at `start`.
    #[must_use]
    pub fn new(start: SystemTime) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Timeline {
                elapsed: Duration::ZERO,
                wall: start,
                next_id: 0,
                timers: BTreeMap::new(),
            })),
        }
    }

    /// Monotonic time elapsed since creation.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.inner.borrow().elapsed
    }

    /// Number of timers scheduled and not yet fired or cancelled.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.inner.borrow().timers.len()
    }

    /// Moves the wall clock to `to` without touching the monotonic timeline.
    ///
    /// Scheduled timers stay due at the same monotonic deadline.
    pub fn set_wall_clock(&self, to: SystemTime) {
        self.inner.borrow_mut().wall = to;
    }

    /// Advances time by `by`, firing every timer that becomes due.
    ///
    /// Timers fire in deadline order, and in scheduling order for equal
    /// deadlines. While a timer runs, both clocks read its deadline. Timers
    /// scheduled by a firing action are fired too if they fall within the
    /// advanced range.
    ///
    /// A panicking action unwinds out of this call; the timer is already
    /// removed from the queue by then.
    pub fn advance(&self, by: Duration) {
        let target = self.elapsed() + by;

        while let Some(action) = self.pop_due(target) {
            action();
        }

        self.move_to(target);
    }

    /// Removes the earliest timer due at or before `target`, moving the clocks
    /// to its deadline.
    fn pop_due(&self, target: Duration) -> Option<Action> {
        let mut timeline = self.inner.borrow_mut();
        let key = *timeline.timers.keys().next()?;
        if key.0 > target {
            return None;
        }
        let action = timeline.timers.remove(&key)?;
        drop(timeline);

        self.move_to(key.0);
        Some(action)
    }

    fn move_to(&self, deadline: Duration) {
        let mut timeline = self.inner.borrow_mut();
        if deadline > timeline.elapsed {
            let step = deadline - timeline.elapsed;
            timeline.elapsed = deadline;
            timeline.wall += step;
        }
    }
}

impl fmt::Debug for VirtualTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let timeline = self.inner.borrow();
        f.debug_struct("VirtualTime")
            .field("elapsed", &timeline.elapsed)
            .field("wall", &timeline.wall)
            .field("pending_timers", &timeline.timers.len())
            .finish()
    }
}

impl Clock for VirtualTime {
    fn now(&self) -> SystemTime {
        self.inner.borrow().wall
    }
}

impl Scheduler for VirtualTime {
    type Handle = VirtualTimerHandle;

    fn schedule(&self, delay: Duration, action: Action) -> Self::Handle {
        let mut timeline = self.inner.borrow_mut();
        let key = (timeline.elapsed + delay, timeline.next_id);
        timeline.next_id += 1;
        timeline.timers.insert(key, action);

        VirtualTimerHandle {
            key,
            timeline: Rc::downgrade(&self.inner),
        }
    }
}

impl CancelHandle for VirtualTimerHandle {
    fn cancel(&self) {
        if let Some(timeline) = self.timeline.upgrade() {
            timeline.borrow_mut().timers.remove(&self.key);
        }
    }
}
