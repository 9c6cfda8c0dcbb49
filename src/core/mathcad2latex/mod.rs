//! Mathcad to LaTeX converter
//!
//! This module implements the tagged-form translator. Mathcad serializes
//! expressions as nested prefix forms such as `(@INTEGRAL 0 1 x^2 x)` or
//! `(@APPLY sin (@ARGS x))`; the parser dispatches on the leading tag,
//! extracts arguments with depth-aware splitting, and emits LaTeX
//! fragments directly. No intermediate tree is built.

pub mod context;
pub mod spacing;
pub mod tokenizer;
mod complex;
mod parser;

pub use context::{Translator, TranslatorOptions, DEFAULT_MAX_DEPTH};

/// Example Mathcad expressions bundled with the translator.
///
/// Exercised by the round-trip tests and printable from the CLI.
pub const EXAMPLE_EXPRESSIONS: &[&str] = &[
    // Basic examples
    "(x + y)",
    "(α + β)",
    "(/ x y)",
    "(^ x 2)",
    // Advanced examples
    "(@INTEGRAL 0 1 x^2 x)",
    "(@DERIV x 1 (^ x 2))",
    "(@PART_DERIV x 1 (@PARENS (+ x y)))",
    "(@LIMIT x 0 (@PARENS (/ (^ x 2) x)))",
    "(@PRODUCT (@IS i 1) n i)",
    "(@NTHROOT 2 x)",
    "(@NTHROOT 3 x)",
    "(@APPLY sin (@ARGS x))",
    "(@APPLY ln (@ARGS x))",
    "(@APPLY abs (@ARGS x))",
    "(+ (* 2 x) (/ y z))",
    "(@IS (^ x 2) (+ y z))",
    "(@LEQ x y)",
    "(@GEQ x y)",
    "(@INTEGRAL 0 1 (@INTEGRAL 0 y x^2 x) y)",
];

// =============================================================================
// Warning System
// =============================================================================

/// Kind of warning generated during translation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// Parentheses do not balance; output is best-effort
    UnbalancedParens,
    /// An unrecognized tag was passed through unchanged
    UnknownTag,
    /// A handler received fewer arguments than its minimum arity
    MissingArguments,
    /// The recursion budget was exhausted; a sub-expression was left unparsed
    DepthLimit,
}

impl std::fmt::Display for WarningKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WarningKind::UnbalancedParens => write!(f, "unbalanced parentheses"),
            WarningKind::UnknownTag => write!(f, "unknown tag"),
            WarningKind::MissingArguments => write!(f, "missing arguments"),
            WarningKind::DepthLimit => write!(f, "depth limit"),
        }
    }
}

/// A warning generated during Mathcad to LaTeX translation
#[derive(Debug, Clone)]
pub struct TranslationWarning {
    /// The kind of warning
    pub kind: WarningKind,
    /// Human-readable message
    pub message: String,
    /// Location context (usually the offending sub-expression)
    pub location: Option<String>,
}

impl TranslationWarning {
    /// Create a new warning
    pub fn new(kind: WarningKind, message: impl Into<String>) -> Self {
        TranslationWarning {
            kind,
            message: message.into(),
            location: None,
        }
    }

    /// Add location context to the warning
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Create an unbalanced-parentheses warning
    pub fn unbalanced(input: &str) -> Self {
        TranslationWarning::new(
            WarningKind::UnbalancedParens,
            "Parentheses do not balance; translating best-effort",
        )
        .with_location(ellipsize(input))
    }

    /// Create an unknown-tag warning
    pub fn unknown_tag(tag: &str) -> Self {
        TranslationWarning::new(
            WarningKind::UnknownTag,
            format!("Unknown tag '{tag}' passed through unchanged"),
        )
        .with_location(tag.to_string())
    }

    /// Create a depth-limit warning
    pub fn depth_limit(limit: usize, expr: &str) -> Self {
        TranslationWarning::new(
            WarningKind::DepthLimit,
            format!("Recursion depth {limit} exceeded; sub-expression left unparsed"),
        )
        .with_location(ellipsize(expr))
    }
}

impl std::fmt::Display for TranslationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref loc) = self.location {
            write!(f, "[{}] {}: {}", self.kind, loc, self.message)
        } else {
            write!(f, "[{}] {}", self.kind, self.message)
        }
    }
}

impl From<TranslationWarning> for crate::utils::error::CliDiagnostic {
    fn from(warning: TranslationWarning) -> Self {
        use crate::utils::error::{CliDiagnostic, DiagnosticSeverity};

        let severity = match warning.kind {
            WarningKind::DepthLimit => DiagnosticSeverity::Error,
            WarningKind::UnbalancedParens | WarningKind::MissingArguments => {
                DiagnosticSeverity::Warning
            }
            WarningKind::UnknownTag => DiagnosticSeverity::Info,
        };

        let mut diag = CliDiagnostic::new(severity, warning.kind.to_string(), warning.message);
        if let Some(loc) = warning.location {
            diag = diag.with_location(loc);
        }
        diag
    }
}

/// Result of a translation with diagnostics
#[derive(Debug, Clone)]
pub struct TranslationResult {
    /// The translated output
    pub output: String,
    /// Warnings generated during translation
    pub warnings: Vec<TranslationWarning>,
}

impl TranslationResult {
    /// Create a new result with no warnings
    pub fn ok(output: String) -> Self {
        TranslationResult {
            output,
            warnings: Vec::new(),
        }
    }

    /// Create a result with warnings
    pub fn with_warnings(output: String, warnings: Vec<TranslationWarning>) -> Self {
        TranslationResult { output, warnings }
    }

    /// Check if there are any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Get warnings as formatted strings
    pub fn format_warnings(&self) -> Vec<String> {
        self.warnings.iter().map(|w| w.to_string()).collect()
    }
}

/// Truncate an expression for use in warning messages.
pub(crate) fn ellipsize(text: &str) -> String {
    const LIMIT: usize = 40;
    if text.chars().count() <= LIMIT {
        text.to_string()
    } else {
        let head: String = text.chars().take(LIMIT).collect();
        format!("{head}...")
    }
}

/// Translate a Mathcad expression to LaTeX
pub fn mathcad_to_latex(input: &str) -> String {
    let mut translator = Translator::new();
    translator.translate(input)
}

/// Translate a Mathcad expression to LaTeX with full diagnostics
pub fn mathcad_to_latex_with_diagnostics(input: &str) -> TranslationResult {
    let mut translator = Translator::new();
    translator.translate_with_diagnostics(input)
}
