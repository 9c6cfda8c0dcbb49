//! Error handling for Mclax translations
//!
//! This module provides a unified error type and result type for the
//! translation pipeline. Errors are rare by design: the translator prefers
//! degraded output plus warnings over failure, so the error type mostly
//! serves the strict entry points and the CLI.

use std::fmt;

/// Translation error type
#[derive(Debug, Clone)]
pub enum TranslateError {
    /// Parentheses do not balance
    MalformedInput { message: String },
    /// Input nesting exceeded the recursion budget
    RecursionLimitExceeded { depth: usize },
    /// Invalid input
    InvalidInput { message: String },
    /// IO error (for CLI file operations)
    IoError { message: String },
}

impl fmt::Display for TranslateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslateError::MalformedInput { message } => {
                write!(f, "Malformed input: {}", message)
            }
            TranslateError::RecursionLimitExceeded { depth } => {
                write!(f, "Recursion limit exceeded: nesting deeper than {}", depth)
            }
            TranslateError::InvalidInput { message } => {
                write!(f, "Invalid input: {}", message)
            }
            TranslateError::IoError { message } => {
                write!(f, "IO error: {}", message)
            }
        }
    }
}

impl std::error::Error for TranslateError {}

impl From<std::io::Error> for TranslateError {
    fn from(err: std::io::Error) -> Self {
        TranslateError::IoError {
            message: err.to_string(),
        }
    }
}

/// Result type for translation operations
pub type TranslateResult<T> = Result<T, TranslateError>;

// Convenience constructors
impl TranslateError {
    pub fn malformed(message: impl Into<String>) -> Self {
        TranslateError::MalformedInput {
            message: message.into(),
        }
    }

    pub fn recursion_limit(depth: usize) -> Self {
        TranslateError::RecursionLimitExceeded { depth }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        TranslateError::InvalidInput {
            message: message.into(),
        }
    }
}

// =============================================================================
// CLI Diagnostic System
// =============================================================================

/// Severity level for CLI diagnostics (determines coloring).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticSeverity {
    /// Critical problems, e.g. exhausted recursion budget
    Error,
    /// Degraded output, e.g. missing handler arguments
    Warning,
    /// Informational, e.g. passthrough of an unknown tag
    Info,
}

/// Unified diagnostic type for CLI output.
#[derive(Debug, Clone)]
pub struct CliDiagnostic {
    /// Severity level (for coloring)
    pub severity: DiagnosticSeverity,
    /// Warning kind as string (e.g. "unknown tag")
    pub kind: String,
    /// Human-readable message
    pub message: String,
    /// Location context (usually the offending sub-expression)
    pub location: Option<String>,
}

impl CliDiagnostic {
    /// Create a new diagnostic.
    pub fn new(
        severity: DiagnosticSeverity,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            kind: kind.into(),
            message: message.into(),
            location: None,
        }
    }

    /// Add location context.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Get ANSI color code for this diagnostic's severity.
    pub fn color_code(&self) -> &'static str {
        match self.severity {
            DiagnosticSeverity::Error => "\x1b[31m",   // red
            DiagnosticSeverity::Warning => "\x1b[33m", // yellow
            DiagnosticSeverity::Info => "\x1b[36m",    // cyan
        }
    }
}

impl fmt::Display for CliDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref loc) = self.location {
            write!(f, "[{}] {}: {}", self.kind, loc, self.message)
        } else {
            write!(f, "[{}] {}", self.kind, self.message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_display() {
        let err = TranslateError::malformed("unclosed form");
        assert!(err.to_string().contains("Malformed input"));
        assert!(err.to_string().contains("unclosed form"));
    }

    #[test]
    fn test_recursion_limit_display() {
        let err = TranslateError::recursion_limit(64);
        assert!(err.to_string().contains("64"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: TranslateError = io_err.into();
        assert!(matches!(err, TranslateError::IoError { .. }));
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = CliDiagnostic::new(DiagnosticSeverity::Warning, "unknown tag", "passed through")
            .with_location("@FOO");
        let text = diag.to_string();
        assert!(text.contains("unknown tag"));
        assert!(text.contains("@FOO"));
    }
}
