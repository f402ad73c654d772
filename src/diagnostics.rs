//! Diagnostic reporting for failed operations.
//!
//! Every failing session operation returns a structured [`Error`] and also
//! reports it to the session's [`DiagnosticSink`]. The sink is injected when
//! the session is constructed, so nothing in this crate writes to a hidden
//! process-wide log unless the caller asks for it.
//!
//! # Example
//!
//! ```rust
//! use zipsession::diagnostics::{CollectingSink, sink_fn};
//! use zipsession::ArchiveSession;
//!
//! // Forward failures to the `log` facade (the default)
//! let session = ArchiveSession::new();
//!
//! // Or capture them for inspection
//! let collected = CollectingSink::new();
//! let session = ArchiveSession::with_sink(collected.clone());
//!
//! // Or handle them with a closure
//! let session = ArchiveSession::with_sink(sink_fn(|operation, error| {
//!     eprintln!("{operation}: {error}");
//! }));
//! ```

use std::sync::{Arc, Mutex};

use crate::error::{CodecFailure, Error, ErrorKind};

/// Receives a report for every failed operation.
pub trait DiagnosticSink: Send {
    /// Called once per failed operation with the operation name and the
    /// error that is about to be returned to the caller.
    fn on_failure(&self, operation: &str, error: &Error);
}

/// Forwards failures to the `log` facade at `error` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn on_failure(&self, operation: &str, error: &Error) {
        match error.codec_failure() {
            Some(failure) => log::error!("Failed to {} {}: {}", operation, failure, error),
            None => log::error!("Failed to {}: {}", operation, error),
        }
    }
}

/// Discards all failure reports.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDiagnostics;

impl DiagnosticSink for NoDiagnostics {
    fn on_failure(&self, _operation: &str, _error: &Error) {}
}

/// A captured failure report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Name of the failed operation.
    pub operation: String,
    /// Kind of the reported error.
    pub kind: ErrorKind,
    /// Codec failure triple, when the error carried one.
    pub failure: Option<CodecFailure>,
    /// Rendered error message.
    pub message: String,
}

/// A sink that keeps every report in memory.
///
/// Clones share the same storage, so one clone can be handed to a session
/// while another is kept for inspection.
#[derive(Debug, Default, Clone)]
pub struct CollectingSink {
    reports: Arc<Mutex<Vec<Diagnostic>>>,
}

impl CollectingSink {
    /// Creates an empty collecting sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the reports collected so far.
    pub fn reports(&self) -> Vec<Diagnostic> {
        self.lock().clone()
    }

    /// Returns the number of reports collected so far.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if nothing has been reported.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Removes and returns all collected reports.
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Diagnostic>> {
        // Reports are plain data; a panic mid-push leaves nothing inconsistent.
        self.reports
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DiagnosticSink for CollectingSink {
    fn on_failure(&self, operation: &str, error: &Error) {
        self.lock().push(Diagnostic {
            operation: operation.to_string(),
            kind: error.kind(),
            failure: error.codec_failure().cloned(),
            message: error.to_string(),
        });
    }
}

/// A closure-based diagnostic sink.
pub struct ClosureSink<F> {
    callback: F,
}

impl<F> ClosureSink<F>
where
    F: Fn(&str, &Error) + Send,
{
    /// Creates a new closure-based sink.
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> DiagnosticSink for ClosureSink<F>
where
    F: Fn(&str, &Error) + Send,
{
    fn on_failure(&self, operation: &str, error: &Error) {
        (self.callback)(operation, error)
    }
}

/// Creates a closure-based diagnostic sink.
pub fn sink_fn<F>(f: F) -> ClosureSink<F>
where
    F: Fn(&str, &Error) + Send,
{
    ClosureSink::new(f)
}

impl<S: DiagnosticSink + Sync> DiagnosticSink for Arc<S> {
    fn on_failure(&self, operation: &str, error: &Error) {
        (**self).on_failure(operation, error)
    }
}

impl DiagnosticSink for Box<dyn DiagnosticSink> {
    fn on_failure(&self, operation: &str, error: &Error) {
        (**self).on_failure(operation, error)
    }
}
