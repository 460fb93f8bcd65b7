//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

use std::time::Duration;

/// Default wait in milliseconds, for both limiters.
pub const WAIT_MS: u64 = 1000;

/// Default input line that cancels a pending invocation.
pub const CANCEL_LINE: &str = "!cancel";

/// Throttle fires on the leading edge by default.
pub const LEADING: bool = true;

/// Throttle fires on the trailing edge by default.
pub const TRAILING: bool = true;

/// Default output file for `pacer init`.
pub const CONFIG_FILE: &str = "pacer.toml";

/// Default wait as Duration.
#[must_use]
pub const fn wait() -> Duration {
    Duration::from_millis(WAIT_MS)
}
