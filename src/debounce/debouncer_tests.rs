//! Tests for `Debounced` behavior.

use super::{DebouncePolicy, Debounced, debounce};
use crate::schedule::VirtualTime;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::{Duration, SystemTime};

const WAIT: Duration = Duration::from_millis(100);

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

/// One observed invocation of the wrapped callback.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Call {
    context: &'static str,
    value: u32,
    at: Duration,
}

impl Call {
    fn new(context: &'static str, value: u32, at_ms: u64) -> Self {
        Self {
            context,
            value,
            at: ms(at_ms),
        }
    }
}

type Wrapper = Debounced<&'static str, u32, u32, VirtualTime>;

struct Harness {
    time: VirtualTime,
    calls: Rc<RefCell<Vec<Call>>>,
}

impl Harness {
    fn new() -> Self {
        Self {
            time: VirtualTime::new(SystemTime::UNIX_EPOCH + Duration::from_secs(1_000)),
            calls: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Wraps a callback that records each call and returns `value * 10`.
    fn wrap(&self, policy: DebouncePolicy) -> Wrapper {
        let calls = Rc::clone(&self.calls);
        let time = self.time.clone();
        Debounced::new(
            move |context, value| {
                calls.borrow_mut().push(Call {
                    context,
                    value,
                    at: time.elapsed(),
                });
                value * 10
            },
            policy,
            self.time.clone(),
        )
    }

    fn advance_to(&self, at_ms: u64) {
        let target = ms(at_ms);
        let now = self.time.elapsed();
        assert!(target >= now, "cannot move virtual time backwards");
        self.time.advance(target - now);
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }
}

fn trailing() -> DebouncePolicy {
    DebouncePolicy::new(WAIT)
}

fn immediate() -> DebouncePolicy {
    DebouncePolicy::new(WAIT).with_immediate(true)
}

mod trailing_edge {
    use super::*;

    #[test]
    fn single_trigger_runs_after_wait() {
        let h = Harness::new();
        let debounced = h.wrap(trailing());

        assert_eq!(debounced.call("a", 1), None);

        h.advance_to(99);
        assert!(h.calls().is_empty());

        h.advance_to(100);
        assert_eq!(h.calls(), vec![Call::new("a", 1, 100)]);
    }

    #[test]
    fn burst_runs_once_with_last_trigger() {
        let h = Harness::new();
        let debounced = h.wrap(trailing());

        debounced.call("a", 1);
        h.advance_to(30);
        debounced.call("b", 2);
        h.advance_to(60);
        debounced.call("c", 3);

        h.advance_to(159);
        assert!(h.calls().is_empty());

        h.advance_to(500);
        assert_eq!(h.calls(), vec![Call::new("c", 3, 160)]);
    }

    #[test]
    fn bursts_separated_by_quiet_period_each_run() {
        let h = Harness::new();
        let debounced = h.wrap(trailing());

        debounced.call("a", 1);
        h.advance_to(200);
        debounced.call("b", 2);
        h.advance_to(400);

        assert_eq!(
            h.calls(),
            vec![Call::new("a", 1, 100), Call::new("b", 2, 300)]
        );
    }

    #[test]
    fn never_returns_a_result() {
        let h = Harness::new();
        let debounced = h.wrap(trailing());

        debounced.call("a", 1);
        h.advance_to(200);

        assert_eq!(h.calls().len(), 1);
        assert_eq!(debounced.call("b", 2), None);
    }

    #[test]
    fn is_pending_tracks_scheduled_invocation() {
        let h = Harness::new();
        let debounced = h.wrap(trailing());
        assert!(!debounced.is_pending());

        debounced.call("a", 1);
        assert!(debounced.is_pending());

        h.advance_to(100);
        assert!(!debounced.is_pending());
    }

    #[test]
    fn only_one_timer_outstanding() {
        let h = Harness::new();
        let debounced = h.wrap(trailing());

        for value in 0..5 {
            debounced.call("a", value);
        }

        assert_eq!(h.time.pending_timers(), 1);
    }

    #[test]
    fn zero_wait_runs_on_next_turn() {
        let h = Harness::new();
        let debounced = h.wrap(DebouncePolicy::new(Duration::ZERO));

        debounced.call("a", 1);
        assert!(h.calls().is_empty());

        h.time.advance(Duration::ZERO);
        assert_eq!(h.calls(), vec![Call::new("a", 1, 0)]);
    }
}

mod leading_edge {
    use super::*;

    #[test]
    fn first_trigger_runs_synchronously() {
        let h = Harness::new();
        let debounced = h.wrap(immediate());

        assert_eq!(debounced.call("a", 1), Some(10));
        assert_eq!(h.calls(), vec![Call::new("a", 1, 0)]);
    }

    #[test]
    fn triggers_within_burst_return_stale_result() {
        let h = Harness::new();
        let debounced = h.wrap(immediate());

        debounced.call("a", 1);
        h.advance_to(50);

        assert_eq!(debounced.call("b", 2), Some(10));
        assert_eq!(h.calls().len(), 1);
    }

    #[test]
    fn each_trigger_extends_the_burst() {
        let h = Harness::new();
        let debounced = h.wrap(immediate());

        debounced.call("a", 1);
        for at in [50, 140, 239] {
            h.advance_to(at);
            debounced.call("b", 2);
        }
        assert_eq!(h.calls().len(), 1);

        h.advance_to(400);
        assert_eq!(debounced.call("c", 3), Some(30));
        assert_eq!(
            h.calls(),
            vec![Call::new("a", 1, 0), Call::new("c", 3, 400)]
        );
    }

    #[test]
    fn trigger_after_full_wait_starts_new_burst() {
        let h = Harness::new();
        let debounced = h.wrap(immediate());

        debounced.call("a", 1);
        h.advance_to(100);

        assert_eq!(debounced.call("b", 2), Some(20));
        assert_eq!(h.calls().len(), 2);
    }

    #[test]
    fn is_pending_is_false_in_immediate_mode() {
        let h = Harness::new();
        let debounced = h.wrap(immediate());

        debounced.call("a", 1);
        assert!(!debounced.is_pending());
        assert_eq!(h.time.pending_timers(), 1);
    }

    #[test]
    fn timer_only_closes_the_burst() {
        let h = Harness::new();
        let debounced = h.wrap(immediate());

        debounced.call("a", 1);
        debounced.call("b", 2);
        h.advance_to(1_000);

        assert_eq!(h.calls(), vec![Call::new("a", 1, 0)]);
    }
}

mod cancellation {
    use super::*;

    #[test]
    fn cancel_discards_pending_invocation() {
        let h = Harness::new();
        let debounced = h.wrap(trailing());

        debounced.call("a", 1);
        h.advance_to(50);
        debounced.cancel();
        h.advance_to(1_000);

        assert!(h.calls().is_empty());
        assert!(!debounced.is_pending());
        assert_eq!(h.time.pending_timers(), 0);
    }

    #[test]
    fn cancel_with_nothing_pending_is_noop() {
        let h = Harness::new();
        let debounced = h.wrap(trailing());

        debounced.cancel();
        debounced.cancel();

        debounced.call("a", 1);
        h.advance_to(100);
        assert_eq!(h.calls().len(), 1);
    }

    #[test]
    fn trigger_after_cancel_starts_fresh_burst() {
        let h = Harness::new();
        let debounced = h.wrap(trailing());

        debounced.call("a", 1);
        h.advance_to(50);
        debounced.cancel();
        h.advance_to(60);
        debounced.call("b", 2);
        h.advance_to(1_000);

        assert_eq!(h.calls(), vec![Call::new("b", 2, 160)]);
    }

    #[test]
    fn cancel_lets_immediate_mode_fire_again() {
        let h = Harness::new();
        let debounced = h.wrap(immediate());

        debounced.call("a", 1);
        h.advance_to(10);
        debounced.cancel();
        h.advance_to(20);

        assert_eq!(debounced.call("b", 2), Some(20));
        assert_eq!(
            h.calls(),
            vec![Call::new("a", 1, 0), Call::new("b", 2, 20)]
        );
    }

    #[test]
    fn result_follows_latest_leading_call() {
        let h = Harness::new();
        let debounced = h.wrap(immediate());

        debounced.call("a", 1);
        debounced.cancel();
        debounced.call("b", 2);

        assert_eq!(debounced.call("c", 3), Some(20));
    }

    #[test]
    fn drop_cancels_pending_invocation() {
        let h = Harness::new();
        let debounced = h.wrap(trailing());

        debounced.call("a", 1);
        drop(debounced);
        h.advance_to(1_000);

        assert!(h.calls().is_empty());
        assert_eq!(h.time.pending_timers(), 0);
    }
}

mod independence {
    use super::*;

    #[test]
    fn wrappers_do_not_share_state() {
        let h = Harness::new();
        let first = h.wrap(immediate());
        let second = h.wrap(immediate());

        assert_eq!(first.call("a", 1), Some(10));
        assert_eq!(second.call("b", 2), Some(20));
        assert_eq!(h.calls().len(), 2);
    }

    #[test]
    fn callback_may_reenter_wrapper() {
        let time = VirtualTime::new(SystemTime::UNIX_EPOCH);
        let slot: Rc<RefCell<Weak<Debounced<(), u32, u32, VirtualTime>>>> =
            Rc::new(RefCell::new(Weak::new()));
        let inner_result = Rc::new(Cell::new(None));

        let reentry = Rc::clone(&slot);
        let observed = Rc::clone(&inner_result);
        let debounced = Rc::new(Debounced::new(
            move |(), value: u32| {
                if value == 1 {
                    let wrapper = reentry.borrow().upgrade();
                    if let Some(wrapper) = wrapper {
                        observed.set(Some(wrapper.call((), 2)));
                    }
                }
                value
            },
            immediate(),
            time,
        ));
        *slot.borrow_mut() = Rc::downgrade(&debounced);

        assert_eq!(debounced.call((), 1), Some(1));
        assert_eq!(inner_result.get(), Some(None));
    }
}

mod tokio_event_loop {
    use super::*;
    use tokio::task::LocalSet;
    use tokio::time::sleep;

    #[tokio::test(start_paused = true)]
    async fn debounce_runs_last_trigger_on_local_set() {
        LocalSet::new()
            .run_until(async {
                let seen = Rc::new(RefCell::new(Vec::new()));
                let sink = Rc::clone(&seen);
                let debounced = debounce(move |(), value: u32| sink.borrow_mut().push(value), WAIT, false);

                debounced.call((), 1);
                sleep(ms(40)).await;
                debounced.call((), 2);
                sleep(ms(99)).await;
                assert!(seen.borrow().is_empty());

                sleep(ms(2)).await;
                assert_eq!(*seen.borrow(), vec![2]);
            })
            .await;
    }
}
