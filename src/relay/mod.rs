//! Line gating: the reusable part of the `pacer` command-line tool.
//!
//! Every input line is a trigger. A [`Gate`] passes lines through a debounced
//! or throttled callback, and the lines that get through are written to a
//! [`LineSink`].
//!
//! This module provides:
//! - Input types ([`Trigger`], [`EofPolicy`])
//! - Output types ([`Emission`], [`OutputFormat`], [`LineSink`], [`StdoutSink`])
//! - The gate itself ([`Gate`], [`LimiterMode`])

mod gate;
mod input;
mod output;


pub use gate::{Gate, LimiterMode};
pub use input::{EofPolicy, Trigger};
pub use output::{Emission, LineSink, OutputFormat, StdoutSink};
