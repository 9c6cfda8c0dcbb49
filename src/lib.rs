//! Mclax - Mathcad to LaTeX expression translator
//!
//! Mclax converts Mathcad's tagged prefix notation into LaTeX markup. The
//! pipeline is a pure string-to-string transformation: a recursive
//! dispatch-by-prefix parser over nested parenthesized forms, a spacing
//! normalizer that keeps Greek commands from fusing with identifiers, and
//! an independent refinement pass that cleans up already-generated LaTeX.
//!
//! # Example
//!
//! ```
//! assert_eq!(mclax::translate("(/ x y)"), "\\frac{x}{y}");
//! assert_eq!(mclax::translate("(@APPLY sin (@ARGS x))"), "\\sin(x)");
//! assert_eq!(mclax::translate("α"), "\\alpha");
//! ```
//!
//! Malformed input degrades instead of failing; use
//! [`translate_with_diagnostics`] to observe what was tolerated, or
//! [`try_translate`] for a strict variant.

pub mod core;
pub mod data;
pub mod utils;

pub use crate::core::mathcad2latex::{
    mathcad_to_latex, mathcad_to_latex_with_diagnostics, TranslationResult, TranslationWarning,
    Translator, TranslatorOptions, WarningKind, DEFAULT_MAX_DEPTH, EXAMPLE_EXPRESSIONS,
};
pub use crate::core::refine::{refine, refine_with_annotation};
pub use crate::utils::error::{CliDiagnostic, DiagnosticSeverity, TranslateError, TranslateResult};

/// Translate a Mathcad expression to LaTeX.
///
/// Runs the parser plus the spacing normalizer; the refinement pass is not
/// applied. Total: any input yields some output.
pub fn translate(input: &str) -> String {
    mathcad_to_latex(input)
}

/// Translate a Mathcad expression and return warnings alongside the output.
pub fn translate_with_diagnostics(input: &str) -> TranslationResult {
    mathcad_to_latex_with_diagnostics(input)
}

/// Translate and refine in one step.
///
/// # Example
///
/// ```
/// let latex = mclax::convert("(@SUM (@IS i 1) 10 i^2)");
/// assert!(latex.contains("\\displaystyle\\sum"));
/// assert!(latex.contains("i^{2}"));
/// ```
pub fn convert(input: &str) -> String {
    let mut translator = Translator::new();
    translator.convert(input)
}

/// Translate and refine, returning warnings alongside the output.
pub fn convert_with_diagnostics(input: &str) -> TranslationResult {
    let mut translator = Translator::new();
    translator.convert_with_diagnostics(input)
}

/// Strict translation: fails with [`TranslateError::RecursionLimitExceeded`]
/// when input nesting exhausts the recursion budget, instead of passing the
/// offending sub-expression through unparsed.
pub fn try_translate(input: &str) -> TranslateResult<String> {
    let mut translator = Translator::new();
    translator.try_translate(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_entry_point() {
        assert_eq!(translate("(+ x y)"), "x + y");
        assert_eq!(translate("(^ x 2)"), "{x}^{2}");
    }

    #[test]
    fn test_refine_entry_point() {
        assert_eq!(refine("a/b"), "\\frac{a}{b}");
    }

    #[test]
    fn test_convert_composes_translate_and_refine() {
        let converted = convert("(@NTHROOT 2 x)");
        assert!(converted.starts_with("\\sqrt{x}"));
    }
}
