//! Output-side types: what gets through the gate and where it goes.

use std::fmt;
use std::io::{self, Write};

use serde::Serialize;

/// A line let through by the gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Emission {
    /// Sequence number of the trigger that carried the line.
    pub seq: u64,
    /// The line itself, without its terminator.
    pub line: String,
    /// How long the line was held between being read and being emitted.
    pub held_ms: u64,
}

/// How emissions are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// The raw line.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

impl OutputFormat {
    /// Renders one emission as a single output line, without terminator.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render(self, emission: &Emission) -> Result<String, serde_json::Error> {
        match self {
            Self::Text => Ok(emission.line.clone()),
            Self::Json => serde_json::to_string(emission),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Destination for emitted lines.
///
/// Sinks are infallible from the gate's point of view; write failures are
/// handled (logged) by the sink itself.
pub trait LineSink {
    /// Writes one emission.
    fn emit(&self, emission: &Emission);
}

/// Writes emissions to standard output, one per line.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink {
    format: OutputFormat,
}

impl StdoutSink {
    /// Creates a sink writing in `format`.
    #[must_use]
    pub const fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    fn write(&self, emission: &Emission) -> io::Result<()> {
        let rendered = self.format.render(emission).map_err(io::Error::other)?;
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{rendered}")?;
        stdout.flush()
    }
}

impl LineSink for StdoutSink {
    fn emit(&self, emission: &Emission) {
        if let Err(e) = self.write(emission) {
            tracing::error!("Failed to write line #{}: {e}", emission.seq);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emission() -> Emission {
        Emission {
            seq: 3,
            line: "hello \"world\"".to_string(),
            held_ms: 40,
        }
    }

    #[test]
    fn text_renders_raw_line() {
        assert_eq!(
            OutputFormat::Text.render(&emission()).unwrap(),
            "hello \"world\""
        );
    }

    #[test]
    fn json_renders_one_object() {
        assert_eq!(
            OutputFormat::Json.render(&emission()).unwrap(),
            r#"{"seq":3,"line":"hello \"world\"","held_ms":40}"#
        );
    }

    #[test]
    fn default_format_is_text() {
        assert_eq!(OutputFormat::default(), OutputFormat::Text);
    }

    #[test]
    fn format_display() {
        assert_eq!(OutputFormat::Text.to_string(), "text");
        assert_eq!(OutputFormat::Json.to_string(), "json");
    }
}
