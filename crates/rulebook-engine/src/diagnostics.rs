//! Progress and warning reporting.
//!
//! The engine never logs on its own. Operations that have something to say
//! take a [`DiagnosticSink`] and the caller decides where it goes.

/// Receiver for non-fatal messages.
pub trait DiagnosticSink {
    fn progress(&self, message: &str);
    fn warning(&self, message: &str);
}

/// Forwards everything to the `log` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn progress(&self, message: &str) {
        log::info!("{message}");
    }

    fn warning(&self, message: &str) {
        log::warn!("{message}");
    }
}

/// Drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn progress(&self, _message: &str) {}

    fn warning(&self, _message: &str) {}
}
