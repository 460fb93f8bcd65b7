//! Error types for configuration parsing and validation.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for configuration operations.
///
/// Covers errors from parsing, validation, and file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("Failed to read config file '{}': {source}", path.display())]
    FileRead {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("Failed to parse TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to write configuration file (for init command).
    #[error("Failed to write config file '{}': {source}", path.display())]
    FileWrite {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Missing required field that must be provided by CLI or config file.
    #[error("Missing required field: {field}. {hint}")]
    MissingRequired {
        /// Name of the missing field
        field: &'static str,
        /// Hint for how to provide the value
        hint: &'static str,
    },

    /// Unknown limiter mode.
    #[error("Invalid limiter mode '{value}': expected debounce or throttle")]
    InvalidMode {
        /// The invalid value provided
        value: String,
    },

    /// Unknown output format.
    #[error("Invalid output format '{value}': expected text or json")]
    InvalidFormat {
        /// The invalid value provided
        value: String,
    },

    /// Unknown end-of-input policy.
    #[error("Invalid on_eof value '{value}': expected drain or cancel")]
    InvalidEofPolicy {
        /// The invalid value provided
        value: String,
    },

    /// Throttle with both edges disabled never behaves as documented.
    #[error("Invalid throttle configuration: at least one of leading or trailing must be enabled")]
    NoThrottleEdges,
}

/// Well-known field names for `MissingRequired` errors.
///
/// Use these constants for compile-time safety when matching field names.
pub mod field {
    /// The limiter mode field.
    pub const MODE: &str = "mode";
}

impl ConfigError {
    /// Creates a `MissingRequired` error for a required field.
    #[must_use]
    pub const fn missing(field: &'static str, hint: &'static str) -> Self {
        Self::MissingRequired { field, hint }
    }
}
