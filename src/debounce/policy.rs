//! Debounce configuration.

use std::time::Duration;

/// Policy for debouncing invocation requests.
///
/// A burst is a run of triggers each arriving less than `wait` after the
/// previous one. The policy chooses which edge of a burst runs the callback.
///
/// # Edge Semantics
///
/// | `immediate` | Runs on | Arguments used | Synchronous result |
/// |-------------|---------|----------------|--------------------|
/// | `false` | `wait` after the last trigger | last trigger's | never |
/// | `true` | the first trigger of a burst | first trigger's | first trigger's |
///
/// # Example
///
/// ```
/// use pacer::debounce::DebouncePolicy;
/// use std::time::Duration;
///
/// let policy = DebouncePolicy::new(Duration::from_millis(300)).with_immediate(true);
/// assert!(policy.immediate());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebouncePolicy {
    /// Length of the quiet period that ends a burst.
    wait: Duration,

    /// Fire on the leading edge of a burst instead of the trailing edge.
    immediate: bool,
}

impl DebouncePolicy {
    /// Default quiet period (1 second).
    pub const DEFAULT_WAIT: Duration = Duration::from_secs(1);

    /// Creates a trailing-edge policy with the specified quiet period.
    ///
    /// A zero `wait` is accepted: the callback then runs on the next
    /// scheduler turn after every trigger.
    #[must_use]
    pub const fn new(wait: Duration) -> Self {
        Self {
            wait,
            immediate: false,
        }
    }

    /// Sets whether the leading edge of a burst fires.
    #[must_use]
    pub const fn with_immediate(mut self, immediate: bool) -> Self {
        self.immediate = immediate;
        self
    }

    /// Returns the quiet period.
    #[must_use]
    pub const fn wait(&self) -> Duration {
        self.wait
    }

    /// Returns whether the leading edge fires.
    #[must_use]
    pub const fn immediate(&self) -> bool {
        self.immediate
    }
}

impl Default for DebouncePolicy {
    /// Creates a trailing-edge policy with a 1-second quiet period.
    fn default() -> Self {
        Self::new(Self::DEFAULT_WAIT)
    }
}
