//! Reconstruction of symbolic evaluation results
//!
//! Evaluation output from Mathcad's symbolic engine mixes raw operator
//! forms with pre-labeled leaves (`(@LABEL ...)`, `(@APPLY ...)`) in ways
//! the strict positional handlers cannot split unambiguously. The handler
//! works in tiers: structural disassembly of the operator root first, a
//! pattern-based rewrite of embedded tagged fragments second, and an
//! explicit re-dispatch of any remaining tags as a last resort.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::core::mathcad2latex::context::Translator;
use crate::core::mathcad2latex::tokenizer::split_top_level;
use crate::data::{CONSTANTS, UNITS};

/// Detect an operator-rooted expression carrying labeled sub-terms.
pub(crate) fn is_complex_evaluation(expr: &str) -> bool {
    let operator_root = expr.starts_with("(/")
        || expr.starts_with("(*")
        || expr.starts_with("(+")
        || expr.starts_with("(-");
    operator_root && (expr.contains("(@LABEL") || expr.contains("(@APPLY"))
}

lazy_static! {
    static ref LABEL_PATTERN: Regex =
        Regex::new(r"\(@LABEL\s+([A-Za-z]+)\s+([^)]+)\)").expect("valid label pattern");
    static ref APPLY_PATTERN: Regex =
        Regex::new(r"\(@APPLY\s+([^)]+)\s+\(@ARGS\s+([^)]+)\)\)").expect("valid apply pattern");
    static ref EMBEDDED_TAG: Regex =
        Regex::new(r"\(@([A-Z_]+)([^)]*)\)").expect("valid tag pattern");
    static ref TAG_REMNANT: Regex = Regex::new(r"\(@[A-Z_]+").expect("valid remnant pattern");
    static ref OPERATOR_REWRITES: Vec<(Regex, &'static str)> = vec![
        (
            Regex::new(r"\(/\s+([^)]+)\s+([^)]+)\)").expect("valid division pattern"),
            "\\frac{${1}}{${2}}",
        ),
        (
            Regex::new(r"\(\*\s+([^)]+)\s+([^)]+)\)").expect("valid multiplication pattern"),
            "${1} \\cdot ${2}",
        ),
        (
            Regex::new(r"\(\+\s+([^)]+)\s+([^)]+)\)").expect("valid addition pattern"),
            "${1} + ${2}",
        ),
        (
            Regex::new(r"\(-\s+([^)]+)\s+([^)]+)\)").expect("valid subtraction pattern"),
            "${1} - ${2}",
        ),
        (
            Regex::new(r"\(\^\s+([^)]+)\s+([^)]+)\)").expect("valid power pattern"),
            "{${1}}^{${2}}",
        ),
    ];
}

/// Resolve one `(@LABEL TYPE value)` occurrence without recursion.
fn resolve_label(label_type: &str, content: &str) -> String {
    match label_type.to_uppercase().as_str() {
        "CONSTANT" => CONSTANTS
            .get(content)
            .map(|latex| latex.to_string())
            .unwrap_or_else(|| content.to_string()),
        "VARIABLE" => content.to_string(),
        "UNIT" => UNITS
            .get(content)
            .map(|latex| latex.to_string())
            .unwrap_or_else(|| format!("\\mathrm{{{content}}}")),
        "FUNCTION" => format!("\\operatorname{{{content}}}"),
        _ => content.to_string(),
    }
}

impl Translator {
    /// Translate an operator-rooted expression containing labeled leaves.
    pub(crate) fn handle_complex_evaluation(&mut self, expr: &str, depth: usize) -> String {
        // Tier 1: structural disassembly of the operator root.
        if let Some(result) = self.disassemble_operator_root(expr, depth) {
            return result;
        }

        // Tier 2: pattern-based rewrite of the embedded tagged fragments.
        let rewritten = self.rewrite_tagged_patterns(expr, depth);
        if rewritten != expr {
            return rewritten;
        }

        // Tier 3: explicitly re-dispatch any recognizable embedded tag.
        let redispatched = self.redispatch_embedded_tags(expr, depth);
        if redispatched != expr {
            return redispatched;
        }

        // Nothing matched; hand back to the plain operator handlers.
        match &expr[..2.min(expr.len())] {
            "(/" => self.handle_division(expr, depth),
            "(*" => self.join_args(expr, depth, " \\cdot ", 1),
            "(+" => self.join_args(expr, depth, " + ", 1),
            "(-" => self.handle_subtraction(expr, depth),
            _ => expr.to_string(),
        }
    }

    /// Split the operator root at top level and recurse into each part.
    fn disassemble_operator_root(&mut self, expr: &str, depth: usize) -> Option<String> {
        let op = expr.as_bytes().get(1).copied()?;
        let body = &expr[2..];
        let content = body.strip_suffix(')').unwrap_or(body).trim();
        let args = split_top_level(content);

        match op {
            b'/' if args.len() >= 2 => {
                let numerator = self.parse_expression(&args[0], depth + 1);
                let denominator = self.parse_expression(&args[1], depth + 1);
                Some(format!("\\frac{{{numerator}}}{{{denominator}}}"))
            }
            b'*' if !args.is_empty() => Some(self.join_parsed(&args, depth, " \\cdot ")),
            b'+' if !args.is_empty() => Some(self.join_parsed(&args, depth, " + ")),
            b'-' if args.len() >= 2 => {
                let minuend = self.parse_expression(&args[0], depth + 1);
                let subtrahend = self.parse_expression(&args[1], depth + 1);
                Some(format!("{minuend} - {subtrahend}"))
            }
            _ => None,
        }
    }

    /// Rewrite labeled leaves, function applications, and raw operator
    /// forms in place, then strip any tag remnants.
    fn rewrite_tagged_patterns(&mut self, expr: &str, depth: usize) -> String {
        let mut result = LABEL_PATTERN
            .replace_all(expr, |caps: &Captures| resolve_label(&caps[1], &caps[2]))
            .into_owned();

        result = APPLY_PATTERN
            .replace_all(&result, |caps: &Captures| {
                let raw_func = caps[1].trim();
                let arg = &caps[2];
                let func = if raw_func.starts_with("(@LABEL") {
                    match LABEL_PATTERN.captures(raw_func) {
                        Some(label) if label[1].to_uppercase() == "FUNCTION" => {
                            format!("\\operatorname{{{}}}", &label[2])
                        }
                        _ => self.parse_expression(raw_func, depth + 1),
                    }
                } else {
                    raw_func.to_string()
                };
                format!("{func}({arg})")
            })
            .into_owned();

        for (pattern, replacement) in OPERATOR_REWRITES.iter() {
            result = pattern.replace_all(&result, *replacement).into_owned();
        }

        // Last-resort cleanup of anything still tagged
        result = TAG_REMNANT.replace_all(&result, "").into_owned();
        result.replace(')', "")
    }

    /// Dispatch each embedded `(@TAG ...)` occurrence through the regular
    /// handler table, leaving unknown tags untouched.
    fn redispatch_embedded_tags(&mut self, expr: &str, depth: usize) -> String {
        EMBEDDED_TAG
            .replace_all(expr, |caps: &Captures| {
                let tag = format!("@{}", &caps[1]);
                let form = format!("(@{}{})", &caps[1], &caps[2]);
                self.dispatch_tag(&tag, &form, depth)
                    .unwrap_or(form)
            })
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detection() {
        assert!(is_complex_evaluation("(/ (@LABEL CONSTANT c) x)"));
        assert!(is_complex_evaluation("(* 2 (@APPLY sin (@ARGS x)))"));
        assert!(!is_complex_evaluation("(/ x y)"));
        assert!(!is_complex_evaluation("(@LABEL CONSTANT c)"));
    }

    #[test]
    fn test_resolve_label() {
        assert_eq!(resolve_label("CONSTANT", "ℏ"), "\\hbar");
        assert_eq!(resolve_label("constant", "q"), "q");
        assert_eq!(resolve_label("UNIT", "kg"), "\\mathrm{kg}");
        assert_eq!(resolve_label("UNIT", "furlong"), "\\mathrm{furlong}");
        assert_eq!(resolve_label("FUNCTION", "f"), "\\operatorname{f}");
        assert_eq!(resolve_label("VARIABLE", "x"), "x");
    }

    #[test]
    fn test_structural_disassembly() {
        let mut translator = Translator::new();
        assert_eq!(
            translator.translate("(/ (@LABEL CONSTANT c) (@LABEL VARIABLE x))"),
            "\\frac{c}{x}"
        );
        assert_eq!(
            translator.translate("(* 2 (@APPLY sin (@ARGS x)))"),
            "2 \\cdot \\sin(x)"
        );
        assert_eq!(
            translator.translate("(+ (@LABEL VARIABLE x) (@LABEL VARIABLE y))"),
            "x + y"
        );
        assert_eq!(
            translator.translate("(- (@LABEL CONSTANT h) (@LABEL VARIABLE y))"),
            "h - y"
        );
    }
}
