//! Component diagnostics
//!
//! Components report misconfiguration through an injected sink instead of
//! writing to a global stream, so tests can run silently or assert on the
//! messages.

use std::cell::RefCell;

/// Severity of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Debug,
    Warn,
}

/// Diagnostic sink handed to every component
pub trait Diagnostics {
    /// Report a message about the element named `tag`
    fn report(&self, level: Level, tag: &str, message: &str);

    fn warn(&self, tag: &str, message: &str) {
        self.report(Level::Warn, tag, message);
    }

    fn debug(&self, tag: &str, message: &str) {
        self.report(Level::Debug, tag, message);
    }
}

/// Forwards diagnostics to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn report(&self, level: Level, tag: &str, message: &str) {
        match level {
            Level::Debug => tracing::debug!(element = tag, "{message}"),
            Level::Warn => tracing::warn!(element = tag, "{message}"),
        }
    }
}

/// Drops every diagnostic
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentDiagnostics;

impl Diagnostics for SilentDiagnostics {
    fn report(&self, _level: Level, _tag: &str, _message: &str) {}
}

/// A recorded diagnostic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub level: Level,
    pub tag: String,
    pub message: String,
}

/// Keeps diagnostics in memory
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    records: RefCell<Vec<Record>>,
}

impl RecordingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything reported so far
    pub fn records(&self) -> Vec<Record> {
        self.records.borrow().clone()
    }

    /// Warnings reported so far
    pub fn warnings(&self) -> Vec<Record> {
        self.records.borrow()
            .iter()
            .filter(|r| r.level == Level::Warn)
            .cloned()
            .collect()
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn report(&self, level: Level, tag: &str, message: &str) {
        self.records.borrow_mut().push(Record {
            level,
            tag: tag.to_string(),
            message: message.to_string(),
        });
    }
}
