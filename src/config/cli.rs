//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::relay::{EofPolicy, OutputFormat};

use super::defaults;

/// pacer: debounce or throttle lines of standard input
///
/// Each input line is a trigger. Lines that get through the limiter are
/// written to standard output; logs go to standard error.
#[derive(Debug, Parser)]
#[command(name = "pacer")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Limiter to apply (or `init`)
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to configuration file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Output format for emitted lines
    #[arg(long, value_enum, global = true)]
    pub format: Option<FormatArg>,

    /// Input line that cancels the pending invocation
    #[arg(long = "cancel-line", value_name = "TEXT", global = true)]
    pub cancel_line: Option<String>,

    /// What to do with a pending invocation at end of input
    #[arg(long = "on-eof", value_enum, global = true)]
    pub on_eof: Option<EofArg>,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Subcommands for pacer
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Emit a line once input has been quiet for the wait period
    Debounce {
        /// Quiet period in milliseconds
        #[arg(long = "wait-ms", value_name = "N")]
        wait_ms: Option<u64>,

        /// Emit on the first line of a burst instead of after it
        #[arg(long)]
        immediate: bool,
    },

    /// Emit at most one line per wait period
    Throttle {
        /// Window length in milliseconds
        #[arg(long = "wait-ms", value_name = "N")]
        wait_ms: Option<u64>,

        /// Do not emit on the first line of a burst
        #[arg(long = "no-leading")]
        no_leading: bool,

        /// Do not emit the last line of a window when it closes
        #[arg(long = "no-trailing")]
        no_trailing: bool,
    },

    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = defaults::CONFIG_FILE)]
        output: PathBuf,
    },
}

/// Output format argument for CLI parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// The raw line
    Text,
    /// One JSON object per line
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => Self::Text,
            FormatArg::Json => Self::Json,
        }
    }
}

/// End-of-input argument for CLI parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EofArg {
    /// Wait for the pending invocation, then exit
    Drain,
    /// Discard the pending invocation and exit
    Cancel,
}

impl From<EofArg> for EofPolicy {
    fn from(arg: EofArg) -> Self {
        match arg {
            EofArg::Drain => Self::Drain,
            EofArg::Cancel => Self::Cancel,
        }
    }
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Parses CLI arguments from an iterator, returning clap's error on failure.
    ///
    /// # Errors
    ///
    /// Returns an error if the arguments do not match the interface.
    pub fn try_parse_from_iter<I, T>(iter: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::try_parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Some(Command::Init { .. }))
    }
}
