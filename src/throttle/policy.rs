//! Throttle configuration.

use std::time::Duration;

/// Policy for throttling invocation requests.
///
/// While triggers keep arriving, the callback runs at most once per `wait`.
/// The two edges are independent:
///
/// | `leading` | `trailing` | Behavior |
/// |-----------|------------|----------|
/// | `true` | `true` | Run on the first trigger, then once per window with the latest arguments |
/// | `true` | `false` | Run on the first trigger of each window; later triggers in the window are dropped |
/// | `false` | `true` | Run only at window ends, `wait` after the first trigger of a burst |
/// | `false` | `false` | Misuse: accepted, but neither edge behaves as documented |
///
/// # Example
///
/// ```
/// use pacer::throttle::ThrottlePolicy;
/// use std::time::Duration;
///
/// let policy = ThrottlePolicy::new(Duration::from_millis(250)).with_leading(false);
/// assert!(!policy.leading());
/// assert!(policy.trailing());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottlePolicy {
    /// Minimum spacing between executions.
    wait: Duration,

    /// Run on the first trigger of a burst.
    leading: bool,

    /// Run once more after the last trigger of a window.
    trailing: bool,
}

impl ThrottlePolicy {
    /// Default window (1 second).
    pub const DEFAULT_WAIT: Duration = Duration::from_secs(1);

    /// Creates a policy with both edges enabled.
    ///
    /// A zero `wait` is accepted and runs the callback on every trigger.
    #[must_use]
    pub const fn new(wait: Duration) -> Self {
        Self {
            wait,
            leading: true,
            trailing: true,
        }
    }

    /// Sets whether the leading edge fires.
    #[must_use]
    pub const fn with_leading(mut self, leading: bool) -> Self {
        self.leading = leading;
        self
    }

    /// Sets whether the trailing edge fires.
    #[must_use]
    pub const fn with_trailing(mut self, trailing: bool) -> Self {
        self.trailing = trailing;
        self
    }

    /// Returns the window length.
    #[must_use]
    pub const fn wait(&self) -> Duration {
        self.wait
    }

    /// Returns whether the leading edge fires.
    #[must_use]
    pub const fn leading(&self) -> bool {
        self.leading
    }

    /// Returns whether the trailing edge fires.
    #[must_use]
    pub const fn trailing(&self) -> bool {
        self.trailing
    }

    /// Returns `true` for the unsupported configuration with both edges off.
    #[must_use]
    pub const fn has_no_edges(&self) -> bool {
        !self.leading && !self.trailing
    }
}

impl Default for ThrottlePolicy {
    /// Creates a policy with a 1-second window and both edges enabled.
    fn default() -> Self {
        Self::new(Self::DEFAULT_WAIT)
    }
}
