//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Limiter configuration section
    #[serde(default)]
    pub limiter: LimiterSection,

    /// Input handling section
    #[serde(default)]
    pub input: InputSection,

    /// Output section
    #[serde(default)]
    pub output: OutputSection,
}

/// Limiter configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LimiterSection {
    /// Limiter mode: "debounce" or "throttle"
    pub mode: Option<String>,

    /// Wait in milliseconds
    pub wait_ms: Option<u64>,

    /// Debounce: emit on the first line of a burst
    #[serde(default)]
    pub immediate: bool,

    /// Throttle: emit on the leading edge
    pub leading: Option<bool>,

    /// Throttle: emit on the trailing edge
    pub trailing: Option<bool>,
}

/// Input handling section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputSection {
    /// Line that cancels the pending invocation
    pub cancel_line: Option<String>,

    /// End-of-input policy: "drain" or "cancel"
    pub on_eof: Option<String>,
}

/// Output section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
    /// Output format: "text" or "json"
    pub format: Option<String>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# pacer Configuration File

[limiter]
# Limiter mode (required unless a subcommand is given)
# Accepted values: "debounce" or "throttle"
mode = "throttle"

# Wait in milliseconds (default: 1000)
# Debounce: quiet period after the last line. Throttle: window length.
wait_ms = 1000

# Debounce only: emit on the first line of a burst instead of after it
# immediate = false

# Throttle only: emit on the first line of a burst (default: true)
# leading = true

# Throttle only: emit the latest line when the window closes (default: true)
# At least one of leading/trailing must be enabled.
# trailing = true

[input]
# A line equal to this text cancels the pending invocation (default: "!cancel")
# cancel_line = "!cancel"

# At end of input: "drain" waits for the pending invocation, "cancel" discards it
# on_eof = "drain"

[output]
# "text" writes the raw line, "json" writes {"seq", "line", "held_ms"} objects
# format = "text"
"#
    .to_string()
}
