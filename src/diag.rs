//! Diagnostic side channel.
//!
//! stdout carries the response envelope and nothing else; leveled
//! diagnostics go to a disjoint channel that the host captures but never
//! machine-parses. The sink is a capability handed to the dispatcher at
//! construction, so tests can capture lines without touching a real
//! stream.

use std::fmt;
use std::io::Write;

/// Severity of a diagnostic line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        })
    }
}

/// Sink for leveled diagnostic lines.
pub trait Diagnostics {
    /// Append one `[LEVEL] message` line to the side channel.
    fn write(&mut self, level: Level, message: &str);

    /// Append an info-level line.
    fn info(&mut self, message: &str) {
        self.write(Level::Info, message);
    }

    /// Append a warn-level line.
    fn warn(&mut self, message: &str) {
        self.write(Level::Warn, message);
    }

    /// Append an error-level line.
    fn error(&mut self, message: &str) {
        self.write(Level::Error, message);
    }
}

/// Diagnostics sink backed by the process stderr stream.
///
/// A failed side-channel write is dropped, not propagated; diagnostics
/// never fail an invocation.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrDiagnostics;

impl Diagnostics for StderrDiagnostics {
    fn write(&mut self, level: Level, message: &str) {
        let stderr = std::io::stderr();
        let mut handle = stderr.lock();
        let _ = writeln!(handle, "[{level}] {message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CaptureDiagnostics {
        lines: Vec<String>,
    }

    impl Diagnostics for CaptureDiagnostics {
        fn write(&mut self, level: Level, message: &str) {
            self.lines.push(format!("[{level}] {message}"));
        }
    }

    #[test]
    fn test_leveled_helpers_tag_lines() {
        let mut sink = CaptureDiagnostics::default();
        sink.info("starting");
        sink.warn("slow");
        sink.error("failed");
        assert_eq!(
            sink.lines,
            vec!["[INFO] starting", "[WARN] slow", "[ERROR] failed"]
        );
    }

    #[test]
    fn test_level_display_tags() {
        assert_eq!(Level::Info.to_string(), "INFO");
        assert_eq!(Level::Warn.to_string(), "WARN");
        assert_eq!(Level::Error.to_string(), "ERROR");
    }

    #[test]
    fn test_stderr_sink_does_not_panic() {
        // Stderr output is not captured here; this just verifies the
        // write path completes.
        let mut sink = StderrDiagnostics;
        sink.info("diagnostic smoke line");
    }
}
