//! Input-side types.

use std::fmt;
use std::time::SystemTime;

/// Invocation context attached to each input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trigger {
    /// 1-based position of the line among submitted lines.
    pub seq: u64,
    /// Wall-clock time the line was read.
    pub received_at: SystemTime,
}

impl Trigger {
    /// Creates a trigger for the `seq`-th line.
    #[must_use]
    pub const fn new(seq: u64, received_at: SystemTime) -> Self {
        Self { seq, received_at }
    }
}

/// What to do with a pending invocation when input ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EofPolicy {
    /// Wait until nothing is pending, then stop.
    #[default]
    Drain,
    /// Cancel whatever is pending and stop.
    Cancel,
}

impl fmt::Display for EofPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Drain => write!(f, "drain"),
            Self::Cancel => write!(f, "cancel"),
        }
    }
}
