//! Terminal result reporting.
//!
//! The host reads exactly one `{"output": ..., "error": ...}` object from
//! stdout when the plugin finishes.

use std::fmt::Display;
use std::io::{self, Write};
use std::time::{Duration, Instant};

use serde::Serialize;

/// Output used when a run ends with neither a message nor an error.
///
/// Kept for host compatibility: plugins on this host report "plugin ended"
/// when they exit without a message. The sync itself always reports a
/// message or an error, or stays silent for a scene-less event.
pub const DEFAULT_OUTPUT: &str = "plugin ended";

/// Wall-clock time since the hook started.
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    started: Instant,
}

impl Stopwatch {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HookResult {
    pub output: Option<String>,
    pub error: Option<String>,
}

impl HookResult {
    pub fn output(message: impl Into<String>) -> Self {
        Self {
            output: Some(message.into()),
            error: None,
        }
    }

    pub fn failure(error: impl Display) -> Self {
        Self {
            output: None,
            error: Some(error.to_string()),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }

    fn normalized(&self) -> Self {
        if self.output.is_none() && self.error.is_none() {
            return Self::output(DEFAULT_OUTPUT);
        }
        self.clone()
    }
}

/// Log the execution time and write `result` as one JSON line to `out`.
pub fn report(result: &HookResult, stopwatch: &Stopwatch, mut out: impl Write) -> io::Result<()> {
    tracing::debug!(
        "Execution time: {:.5}s",
        stopwatch.elapsed().as_secs_f64()
    );

    let line = serde_json::to_string(&result.normalized())?;
    writeln!(out, "{line}")?;
    out.flush()
}
