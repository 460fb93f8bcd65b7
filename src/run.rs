//! Application execution logic.
//!
//! This module contains the async loop that reads standard input line by
//! line and feeds each line through the gate.

use std::future::Future;
use std::io;
use std::rc::Rc;
use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tokio_stream::wrappers::LinesStream;
use tokio_stream::{Stream, StreamExt};

use pacer::config::ValidatedConfig;
use pacer::relay::{EofPolicy, Gate, LineSink, StdoutSink, Trigger};
use pacer::schedule::{Scheduler, TokioScheduler};
use pacer::time::{Clock, SystemClock};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// How often draining checks whether the pending line has been emitted.
const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// Failed to read from standard input.
    #[error("Failed to read input: {0}")]
    Input(#[source] io::Error),
}

/// Why the input loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stop {
    /// Input ended and the end-of-input policy was applied.
    EndOfInput,
    /// A shutdown signal arrived; anything pending was discarded.
    Shutdown,
}

/// Runtime options extracted from validated config.
///
/// This struct holds only the fields needed by the input loop; the limiter
/// and output settings are consumed when building the gate.
struct RuntimeOptions {
    cancel_line: String,
    on_eof: EofPolicy,
}

impl From<&ValidatedConfig> for RuntimeOptions {
    fn from(config: &ValidatedConfig) -> Self {
        Self {
            cancel_line: config.cancel_line.clone(),
            on_eof: config.on_eof,
        }
    }
}

/// Executes the main application loop.
///
/// This function:
/// 1. Builds the gate with a stdout sink, the system clock and the tokio scheduler
/// 2. Feeds stdin lines through the gate until end of input or shutdown (Ctrl+C)
/// 3. Applies the end-of-input policy
///
/// Must run inside a [`tokio::task::LocalSet`].
///
/// # Errors
///
/// Returns an error if standard input cannot be read.
#[cfg(not(tarpaulin_include))]
pub async fn execute(config: ValidatedConfig) -> Result<(), RunError> {
    let options = RuntimeOptions::from(&config);

    let sink: Rc<dyn LineSink> = Rc::new(StdoutSink::new(config.format));
    let gate = Gate::new(config.mode, sink, SystemClock, TokioScheduler);

    tracing::info!(
        "Reading lines from stdin (a line {:?} cancels the pending one)",
        options.cancel_line
    );

    let lines = LinesStream::new(BufReader::new(tokio::io::stdin()).lines());
    let stop = pump(lines, &gate, &SystemClock, &options, shutdown_signal()).await?;

    match stop {
        Stop::EndOfInput => {
            tracing::info!("End of input, {} line(s) emitted", gate.emitted());
        }
        Stop::Shutdown => {
            tracing::info!("Stopped by signal, {} line(s) emitted", gate.emitted());
        }
    }

    Ok(())
}

/// Feeds `lines` through `gate` until input ends or `shutdown` completes.
///
/// Each line except the cancel line becomes a trigger stamped with `clock`.
async fn pump<L, K, S, C>(
    mut lines: L,
    gate: &Gate<K, S>,
    clock: &C,
    options: &RuntimeOptions,
    shutdown: impl Future<Output = ()>,
) -> Result<Stop, RunError>
where
    L: Stream<Item = io::Result<String>> + Unpin,
    K: Clock + Clone + 'static,
    S: Scheduler + 'static,
    C: Clock,
{
    tokio::pin!(shutdown);
    let mut seq = 0;

    loop {
        tokio::select! {
            biased;

            () = &mut shutdown => {
                tracing::info!("Shutdown signal received, stopping...");
                gate.cancel();
                return Ok(Stop::Shutdown);
            }

            line = lines.next() => {
                match line {
                    Some(Ok(line)) if line == options.cancel_line => handle_cancel(gate),
                    Some(Ok(line)) => {
                        seq += 1;
                        handle_line(gate, Trigger::new(seq, clock.now()), line);
                    }
                    Some(Err(e)) => {
                        gate.cancel();
                        return Err(RunError::Input(e));
                    }
                    None => break,
                }
            }
        }
    }

    match options.on_eof {
        EofPolicy::Cancel => {
            if gate.is_pending() {
                tracing::debug!("End of input, discarding pending line");
            }
            gate.cancel();
            Ok(Stop::EndOfInput)
        }
        EofPolicy::Drain => Ok(drain(gate, shutdown).await),
    }
}

fn handle_line<K, S>(gate: &Gate<K, S>, trigger: Trigger, line: String)
where
    K: Clock + Clone + 'static,
    S: Scheduler + 'static,
{
    let seq = trigger.seq;
    match gate.submit(trigger, line) {
        Some(count) => tracing::debug!("Line #{seq} handled synchronously ({count} emitted)"),
        None => tracing::trace!("Line #{seq} deferred"),
    }
}

fn handle_cancel<K, S>(gate: &Gate<K, S>)
where
    K: Clock + Clone + 'static,
    S: Scheduler + 'static,
{
    if gate.is_pending() {
        tracing::info!("Cancel line received, pending line discarded");
    } else {
        tracing::debug!("Cancel line received, nothing pending");
    }
    gate.cancel();
}

/// Waits until the gate has nothing pending, unless `shutdown` completes first.
async fn drain<K, S>(gate: &Gate<K, S>, mut shutdown: impl Future<Output = ()> + Unpin) -> Stop
where
    K: Clock + Clone + 'static,
    S: Scheduler + 'static,
{
    if gate.is_pending() {
        tracing::debug!("End of input, waiting for pending line");
    }

    while gate.is_pending() {
        tokio::select! {
            biased;

            () = &mut shutdown => {
                tracing::info!("Shutdown signal received while draining, discarding pending line");
                gate.cancel();
                return Stop::Shutdown;
            }

            () = tokio::time::sleep(DRAIN_POLL_INTERVAL) => {}
        }
    }

    Stop::EndOfInput
}

/// Returns a future that completes when a shutdown signal is received.
///
/// Excluded from coverage - requires OS signal handling.
#[cfg(not(tarpaulin_include))]
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
