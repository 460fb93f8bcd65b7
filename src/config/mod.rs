//! Configuration layer for pacer.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Configuration values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** - Values explicitly passed via command line
//! 2. **TOML config file** - Values from the configuration file
//! 3. **Built-in defaults** - Hardcoded default values
//!
//! The limiter mode has no default: it comes from the `debounce`/`throttle`
//! subcommand or from `limiter.mode`. A subcommand always wins.
//!
//! # Boolean Flag Semantics
//!
//! `--immediate` uses OR semantics: if set `true` in either CLI or TOML, the
//! result is `true`.
//!
//! `--no-leading` and `--no-trailing` only disable. Without them the TOML
//! `leading`/`trailing` values apply, then the defaults (both enabled). A
//! throttle with both edges disabled is rejected.

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;

#[cfg(test)]
mod cli_tests;

pub use cli::{Cli, Command, EofArg, FormatArg};
pub use error::{ConfigError, field};
pub use toml::{TomlConfig, default_config_template};
pub use validated::{ValidatedConfig, write_default_config};
