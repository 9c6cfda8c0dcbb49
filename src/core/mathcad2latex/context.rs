//! Translator state and options
//!
//! The translator itself is a thin shell: the symbol tables live in
//! [`crate::data`] as immutable statics, so the only state carried across a
//! translation is the option set, the warning list, and the recursion
//! budget flag. A single `Translator` can be reused; each entry point
//! resets the per-call state.

use crate::core::mathcad2latex::tokenizer::is_balanced;
use crate::core::mathcad2latex::{TranslationResult, TranslationWarning, WarningKind};
use crate::core::refine::refine_with_annotation;
use crate::utils::error::{TranslateError, TranslateResult};

/// Default bound on input nesting depth.
///
/// Recursion is bounded by the nesting of the input form; pathological
/// inputs hit this ceiling and degrade instead of exhausting the stack.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Options for Mathcad to LaTeX translation
#[derive(Debug, Clone)]
pub struct TranslatorOptions {
    /// Maximum recursion depth before sub-expressions are passed through
    /// unparsed. Default: [`DEFAULT_MAX_DEPTH`]
    pub max_depth: usize,

    /// Run the refinement pass in [`Translator::convert`].
    /// Default: true
    pub refine: bool,

    /// Append the "no further refinements" comment when the refinement
    /// pass changes nothing.
    /// Default: true
    pub annotate_no_refinement: bool,
}

impl Default for TranslatorOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            refine: true,
            annotate_no_refinement: true,
        }
    }
}

impl TranslatorOptions {
    /// Create new options with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Options that skip the refinement pass entirely
    pub fn without_refinement() -> Self {
        Self {
            refine: false,
            ..Self::default()
        }
    }
}

/// Mathcad to LaTeX translator
#[derive(Debug, Default)]
pub struct Translator {
    /// Translation options
    pub options: TranslatorOptions,
    /// Warnings collected during the current translation
    pub(crate) warnings: Vec<TranslationWarning>,
    /// Set once the recursion budget is exhausted
    pub(crate) depth_exceeded: bool,
}

impl Translator {
    /// Create a translator with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a translator with the given options
    pub fn with_options(options: TranslatorOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Translate a Mathcad expression to LaTeX.
    ///
    /// Total: malformed input produces best-effort output, never a panic.
    pub fn translate(&mut self, input: &str) -> String {
        self.reset();
        self.parse_expression(input, 0)
    }

    /// Translate and return the output together with any warnings.
    pub fn translate_with_diagnostics(&mut self, input: &str) -> TranslationResult {
        self.reset();
        if !is_balanced(input.trim()) {
            self.warnings.push(TranslationWarning::unbalanced(input));
        }
        let output = self.parse_expression(input, 0);
        TranslationResult::with_warnings(output, std::mem::take(&mut self.warnings))
    }

    /// Translate and refine in one step.
    pub fn convert(&mut self, input: &str) -> String {
        let translated = self.translate(input);
        if self.options.refine {
            refine_with_annotation(&translated, self.options.annotate_no_refinement)
        } else {
            translated
        }
    }

    /// Translate and refine, returning the output together with warnings.
    pub fn convert_with_diagnostics(&mut self, input: &str) -> TranslationResult {
        let mut result = self.translate_with_diagnostics(input);
        if self.options.refine {
            result.output =
                refine_with_annotation(&result.output, self.options.annotate_no_refinement);
        }
        result
    }

    /// Strict translation: fails when the recursion budget is exhausted
    /// instead of degrading.
    pub fn try_translate(&mut self, input: &str) -> TranslateResult<String> {
        self.reset();
        let output = self.parse_expression(input, 0);
        if self.depth_exceeded {
            return Err(TranslateError::recursion_limit(self.options.max_depth));
        }
        Ok(output)
    }

    /// Warnings collected by the most recent translation
    pub fn warnings(&self) -> &[TranslationWarning] {
        &self.warnings
    }

    fn reset(&mut self) {
        self.warnings.clear();
        self.depth_exceeded = false;
    }

    pub(crate) fn warn(&mut self, warning: TranslationWarning) {
        self.warnings.push(warning);
    }

    pub(crate) fn warn_arity(&mut self, tag: &str, expected: usize, got: usize) {
        self.warnings.push(TranslationWarning::new(
            WarningKind::MissingArguments,
            format!("'{tag}' expects at least {expected} argument(s), got {got}"),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translator_is_reusable() {
        let mut translator = Translator::new();
        assert_eq!(translator.translate("(+ x y)"), "x + y");
        assert_eq!(translator.translate("(/ x y)"), "\\frac{x}{y}");
        assert!(translator.warnings().is_empty());
    }

    #[test]
    fn test_without_refinement_options() {
        let mut translator = Translator::with_options(TranslatorOptions::without_refinement());
        // No refinement pass, so no annotation comment either
        assert_eq!(translator.convert("(^ x 2)"), "{x}^{2}");
    }

    #[test]
    fn test_diagnostics_report_unbalanced_input() {
        let mut translator = Translator::new();
        let result = translator.translate_with_diagnostics("(+ x (/ y z)");
        assert!(result.has_warnings());
        assert!(result
            .warnings
            .iter()
            .any(|w| w.kind == WarningKind::UnbalancedParens));
    }
}
