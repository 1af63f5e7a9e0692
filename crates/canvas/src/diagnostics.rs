//! Diagnostic sink used by the canvas core.

use std::fmt;

use parking_lot::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

/// Receives messages the core cannot surface as errors, such as a shortcut
/// whose original went missing during a load.
pub trait Logger: Send + Sync {
    fn log_message(&self, text: &str, tag: &str, severity: Severity);
}

/// Forwards diagnostics to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log_message(&self, text: &str, tag: &str, severity: Severity) {
        match severity {
            Severity::Debug => tracing::debug!(tag, "{text}"),
            Severity::Info => tracing::info!(tag, "{text}"),
            Severity::Warning => tracing::warn!(tag, "{text}"),
            Severity::Error => tracing::error!(tag, "{text}"),
        }
    }
}

/// One captured diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub text: String,
    pub tag: String,
    pub severity: Severity,
}

/// Keeps diagnostics in memory so callers can report them after a load.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    entries: Mutex<Vec<Diagnostic>>,
}

impl MemoryLogger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything logged so far.
    #[must_use]
    pub fn entries(&self) -> Vec<Diagnostic> {
        self.entries.lock().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Remove and return all captured diagnostics.
    pub fn drain(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.entries.lock())
    }
}

impl Logger for MemoryLogger {
    fn log_message(&self, text: &str, tag: &str, severity: Severity) {
        self.entries.lock().push(Diagnostic {
            text: text.to_owned(),
            tag: tag.to_owned(),
            severity,
        });
    }
}
