//! Diagnostics port
//!
//! The gateway never returns errors to its callers, so its diagnostics are
//! the only record of why a result came back empty. They go through this
//! port so tests can assert on them.

use std::fmt;

use serde::Serialize;
use tracing::{error, info, warn};

/// Log severity of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Routine information
    Info,
    /// Expected "no data" conditions
    Warning,
    /// Transport problems and unexpected provider answers
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A single diagnostic event emitted by the gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// How serious the event is
    pub severity: Severity,
    /// Gateway operation that produced it (e.g. `distance_matrix`)
    pub operation: &'static str,
    /// Human-readable description
    pub message: String,
    /// Failure cause tag, if the event reports a failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

impl Diagnostic {
    /// Create a diagnostic without a cause tag
    #[must_use]
    pub fn new(severity: Severity, operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            severity,
            operation,
            message: message.into(),
            cause: None,
        }
    }

    /// Attach a cause tag
    #[must_use]
    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.cause = Some(cause.into());
        self
    }
}

/// Sink for gateway diagnostics
pub trait DiagnosticsPort: Send + Sync {
    /// Record one diagnostic event
    fn emit(&self, diagnostic: Diagnostic);
}

/// Default diagnostics sink that forwards to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl DiagnosticsPort for TracingDiagnostics {
    fn emit(&self, diagnostic: Diagnostic) {
        let Diagnostic {
            severity,
            operation,
            message,
            cause,
        } = diagnostic;
        let cause = cause.unwrap_or_default();
        match severity {
            Severity::Info => info!(operation, %cause, "{message}"),
            Severity::Warning => warn!(operation, %cause, "{message}"),
            Severity::Error => error!(operation, %cause, "{message}"),
        }
    }
}
