//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use crate::debounce::DebouncePolicy;
use crate::relay::{EofPolicy, LimiterMode, OutputFormat};
use crate::throttle::ThrottlePolicy;

use super::cli::{Cli, Command};
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::{LimiterSection, TomlConfig};

/// Fully validated configuration ready for use by the application.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config.
/// The function validates all inputs and returns errors for invalid configurations.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Limiter and its policy
    pub mode: LimiterMode,

    /// Output format for emitted lines
    pub format: OutputFormat,

    /// Input line that cancels the pending invocation
    pub cancel_line: String,

    /// What to do with a pending invocation at end of input
    pub on_eof: EofPolicy,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Config {{ mode: {}, format: {}, on_eof: {}, cancel_line: {:?} }}",
            self.mode, self.format, self.on_eof, self.cancel_line,
        )
    }
}

/// Limiter kind before its policy is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModeKind {
    Debounce,
    Throttle,
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments take precedence over TOML config values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No limiter mode is selected by a subcommand or `limiter.mode`
    /// - A mode, format, or `on_eof` string is not recognized
    /// - A throttle has both edges disabled
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let mode = Self::resolve_mode(cli, toml)?;
        let format = Self::resolve_format(cli, toml)?;
        let on_eof = Self::resolve_on_eof(cli, toml)?;

        let cancel_line = cli
            .cancel_line
            .clone()
            .or_else(|| toml.and_then(|t| t.input.cancel_line.clone()))
            .unwrap_or_else(|| defaults::CANCEL_LINE.to_string());

        Ok(Self {
            mode,
            format,
            cancel_line,
            on_eof,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    fn resolve_mode(cli: &Cli, toml: Option<&TomlConfig>) -> Result<LimiterMode, ConfigError> {
        let section = toml.map(|t| &t.limiter);

        // A subcommand selects the mode and carries its own overrides
        let (kind, cli_wait_ms) = match cli.command {
            Some(Command::Debounce { wait_ms, .. }) => (ModeKind::Debounce, wait_ms),
            Some(Command::Throttle { wait_ms, .. }) => (ModeKind::Throttle, wait_ms),
            Some(Command::Init { .. }) | None => {
                let kind = section
                    .and_then(|s| s.mode.as_deref())
                    .map(parse_mode)
                    .transpose()?
                    .ok_or_else(|| {
                        ConfigError::missing(
                            field::MODE,
                            "Use the debounce or throttle subcommand or set limiter.mode in config file",
                        )
                    })?;
                (kind, None)
            }
        };

        // Priority: CLI explicit > TOML > default
        let wait = cli_wait_ms
            .or_else(|| section.and_then(|s| s.wait_ms))
            .map_or_else(defaults::wait, Duration::from_millis);

        match kind {
            ModeKind::Debounce => Ok(LimiterMode::Debounce(Self::build_debounce_policy(
                cli, section, wait,
            ))),
            ModeKind::Throttle => Self::build_throttle_policy(cli, section, wait)
                .map(LimiterMode::Throttle),
        }
    }

    fn build_debounce_policy(
        cli: &Cli,
        section: Option<&LimiterSection>,
        wait: Duration,
    ) -> DebouncePolicy {
        // OR semantics: enabled if set in either source
        let cli_immediate = matches!(
            cli.command,
            Some(Command::Debounce {
                immediate: true,
                ..
            })
        );
        let immediate = cli_immediate || section.is_some_and(|s| s.immediate);

        DebouncePolicy::new(wait).with_immediate(immediate)
    }

    fn build_throttle_policy(
        cli: &Cli,
        section: Option<&LimiterSection>,
        wait: Duration,
    ) -> Result<ThrottlePolicy, ConfigError> {
        let (no_leading, no_trailing) = match cli.command {
            Some(Command::Throttle {
                no_leading,
                no_trailing,
                ..
            }) => (no_leading, no_trailing),
            _ => (false, false),
        };

        // `--no-*` flags only disable; otherwise TOML, then default
        let leading = !no_leading
            && section
                .and_then(|s| s.leading)
                .unwrap_or(defaults::LEADING);
        let trailing = !no_trailing
            && section
                .and_then(|s| s.trailing)
                .unwrap_or(defaults::TRAILING);

        let policy = ThrottlePolicy::new(wait)
            .with_leading(leading)
            .with_trailing(trailing);

        if policy.has_no_edges() {
            return Err(ConfigError::NoThrottleEdges);
        }

        Ok(policy)
    }

    fn resolve_format(cli: &Cli, toml: Option<&TomlConfig>) -> Result<OutputFormat, ConfigError> {
        // CLI takes precedence
        if let Some(format) = cli.format {
            return Ok(format.into());
        }

        toml.and_then(|t| t.output.format.as_deref())
            .map_or(Ok(OutputFormat::default()), parse_format)
    }

    fn resolve_on_eof(cli: &Cli, toml: Option<&TomlConfig>) -> Result<EofPolicy, ConfigError> {
        // CLI takes precedence
        if let Some(on_eof) = cli.on_eof {
            return Ok(on_eof.into());
        }

        toml.and_then(|t| t.input.on_eof.as_deref())
            .map_or(Ok(EofPolicy::default()), parse_on_eof)
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

// Helper functions

fn parse_mode(s: &str) -> Result<ModeKind, ConfigError> {
    match s.to_lowercase().as_str() {
        "debounce" => Ok(ModeKind::Debounce),
        "throttle" => Ok(ModeKind::Throttle),
        _ => Err(ConfigError::InvalidMode {
            value: s.to_string(),
        }),
    }
}

fn parse_format(s: &str) -> Result<OutputFormat, ConfigError> {
    match s.to_lowercase().as_str() {
        "text" | "plain" => Ok(OutputFormat::Text),
        "json" | "jsonl" | "ndjson" => Ok(OutputFormat::Json),
        _ => Err(ConfigError::InvalidFormat {
            value: s.to_string(),
        }),
    }
}

fn parse_on_eof(s: &str) -> Result<EofPolicy, ConfigError> {
    match s.to_lowercase().as_str() {
        "drain" | "wait" => Ok(EofPolicy::Drain),
        "cancel" | "discard" => Ok(EofPolicy::Cancel),
        _ => Err(ConfigError::InvalidEofPolicy {
            value: s.to_string(),
        }),
    }
}
