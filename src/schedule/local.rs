//! Tokio-backed scheduler for single-threaded event loops.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use tokio::task::AbortHandle;

use super::{Action, CancelHandle, Scheduler};

/// Scheduler that runs actions as local tasks on the current `LocalSet`.
///
/// Each scheduled action becomes a task that sleeps for the delay and then
/// runs the action. A panicking action is logged and swallowed so that later
/// timers keep firing.
///
/// # Panics
///
/// [`Scheduler::schedule`] panics when called outside of a
/// [`tokio::task::LocalSet`] context.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

/// Cancels a task spawned by [`TokioScheduler`].
#[derive(Debug)]
pub struct TokioTimerHandle {
    task: AbortHandle,
}

impl CancelHandle for TokioTimerHandle {
    fn cancel(&self) {
        // Aborting a finished task is a no-op.
        self.task.abort();
    }
}

impl Scheduler for TokioScheduler {
    type Handle = TokioTimerHandle;

    fn schedule(&self, delay: Duration, action: Action) -> Self::Handle {
        let task = tokio::task::spawn_local(async move {
            tokio::time::sleep(delay).await;
            if let Err(payload) = catch_unwind(AssertUnwindSafe(action)) {
                tracing::error!("Scheduled action panicked: {}", panic_message(&*payload));
            }
        });

        TokioTimerHandle {
            task: task.abort_handle(),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}
