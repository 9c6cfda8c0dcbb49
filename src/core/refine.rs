//! Post-hoc refinement of generated LaTeX
//!
//! The refinement pass operates on finished LaTeX text, independent of the
//! tagged form it came from. Rules are pure functions applied in a fixed
//! order; each returns its rewritten text plus a flag saying whether it
//! fired, and the driver composes the flags. When nothing fires, a
//! trailing comment notes that the input was already as refined as this
//! pass can make it.
//!
//! The pass leans idempotent but is not strictly so: a second application
//! must preserve the mathematical structure, though the annotation comment
//! may differ.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

/// A single refinement rule: rewritten text plus a did-anything flag.
type RefineRule = fn(&str) -> (String, bool);

const RULES: [RefineRule; 7] = [
    rule_inline_fractions,
    rule_operator_spacing,
    rule_brace_superscripts,
    rule_size_fraction_parens,
    rule_escape_function_names,
    rule_displaystyle_big_operators,
    rule_wrap_bare_units,
];

/// Operators that receive breathing room when crowded.
const SPACED_OPERATORS: [&str; 10] = [
    "+", "-", "=", "\\times", "\\cdot", "<", ">", "\\leq", "\\geq", "\\neq",
];

/// Function names escaped when they appear bare.
const BARE_FUNCTIONS: [&str; 18] = [
    "sin", "cos", "tan", "cot", "sec", "csc", "arcsin", "arccos", "arctan", "sinh", "cosh",
    "tanh", "log", "ln", "exp", "lim", "max", "min",
];

/// Single letters that are almost always variables, never units.
const UNIT_EXCLUDED_VARIABLES: [&str; 11] = ["x", "y", "z", "i", "j", "k", "t", "n", "a", "b", "c"];

lazy_static! {
    static ref INLINE_DIVISION: Regex =
        Regex::new(r"(\w+|\([^)]+\)) */ *(\w+|\([^)]+\))").expect("valid division pattern");
    static ref OPERATOR_CROWDING: Vec<(Regex, String)> = SPACED_OPERATORS
        .iter()
        .map(|op| {
            let pattern = format!(r"([^\\]){}([^\s])", regex::escape(op));
            let replacement = format!("${{1}} {op} ${{2}}");
            (
                Regex::new(&pattern).expect("valid operator pattern"),
                replacement,
            )
        })
        .collect();
    static ref BARE_SUPERSCRIPT: Regex =
        Regex::new(r"(\w+)\^(\w)").expect("valid superscript pattern");
    static ref FRACTION_PARENS: Regex =
        Regex::new(r"\(([^()]*\\frac\{[^{}]*\}\{[^{}]*\}[^()]*)\)")
            .expect("valid parenthesis pattern");
    static ref BIG_OPERATOR_LIMITS: Vec<Regex> = ["\\int", "\\sum", "\\prod"]
        .iter()
        .map(|cmd| {
            let pattern = format!(r"{}(_\{{[^}}]*\}}\^\{{[^}}]*\}})", regex::escape(cmd));
            Regex::new(&pattern).expect("valid big-operator pattern")
        })
        .collect();
    static ref BARE_UNIT: Regex =
        Regex::new(r"([0-9]+) *([a-zA-Z]+)").expect("valid unit pattern");
}

/// Refine a LaTeX expression for better typesetting and readability.
pub fn refine(latex: &str) -> String {
    refine_with_annotation(latex, true)
}

/// Refine, optionally appending the "no further refinements" comment when
/// no rule fired.
pub fn refine_with_annotation(latex: &str, annotate: bool) -> String {
    if latex.is_empty() {
        return String::new();
    }

    let mut current = latex.to_string();
    let mut any_fired = false;
    for rule in RULES {
        let (next, fired) = rule(&current);
        current = next;
        any_fired |= fired;
    }

    if !any_fired && annotate {
        current.push_str("  % No further refinements available");
    }
    current
}

/// Rule 1: bare `a/b` division becomes a proper fraction.
fn rule_inline_fractions(input: &str) -> (String, bool) {
    if !INLINE_DIVISION.is_match(input) {
        return (input.to_string(), false);
    }
    let out = INLINE_DIVISION
        .replace_all(input, "\\frac{${1}}{${2}}")
        .into_owned();
    (out, true)
}

/// Rule 2: insert spacing around crowded operators, never directly after a
/// backslash so command names stay intact.
fn rule_operator_spacing(input: &str) -> (String, bool) {
    let mut current = input.to_string();
    let mut fired = false;
    for (pattern, replacement) in OPERATOR_CROWDING.iter() {
        if pattern.is_match(&current) {
            fired = true;
            current = pattern
                .replace_all(&current, replacement.as_str())
                .into_owned();
        }
    }
    (current, fired)
}

/// Rule 3: brace single-character exponents.
fn rule_brace_superscripts(input: &str) -> (String, bool) {
    if !BARE_SUPERSCRIPT.is_match(input) {
        return (input.to_string(), false);
    }
    let out = BARE_SUPERSCRIPT
        .replace_all(input, "${1}^{${2}}")
        .into_owned();
    (out, true)
}

/// Rule 4: parenthesized groups containing a fraction get sized delimiters.
fn rule_size_fraction_parens(input: &str) -> (String, bool) {
    if !FRACTION_PARENS.is_match(input) {
        return (input.to_string(), false);
    }
    let out = FRACTION_PARENS
        .replace_all(input, "\\left(${1}\\right)")
        .into_owned();
    (out, true)
}

/// Rule 5: escape bare function-name tokens that are not already commands
/// and not part of a longer identifier.
fn rule_escape_function_names(input: &str) -> (String, bool) {
    let mut current = input.to_string();
    let mut fired = false;

    for func in BARE_FUNCTIONS {
        let mut out = String::with_capacity(current.len() + 4);
        let mut last_char: Option<char> = None;
        let mut changed = false;
        let source = current.as_str();
        let mut i = 0;

        while i < source.len() {
            if source[i..].starts_with(func) {
                let boundary_before =
                    !matches!(last_char, Some(c) if c == '\\' || c.is_ascii_alphabetic());
                let boundary_after = !source[i + func.len()..]
                    .chars()
                    .next()
                    .is_some_and(|c| c.is_ascii_alphabetic());
                if boundary_before && boundary_after {
                    out.push('\\');
                    out.push_str(func);
                    last_char = func.chars().last();
                    i += func.len();
                    changed = true;
                    continue;
                }
            }
            let Some(ch) = source[i..].chars().next() else {
                break;
            };
            out.push(ch);
            last_char = Some(ch);
            i += ch.len_utf8();
        }

        if changed {
            fired = true;
            current = out;
        }
    }
    (current, fired)
}

/// Rule 6: big operators carrying both limits render in display style.
fn rule_displaystyle_big_operators(input: &str) -> (String, bool) {
    let mut current = input.to_string();
    let mut fired = false;

    for pattern in BIG_OPERATOR_LIMITS.iter() {
        let mut out = String::with_capacity(current.len() + 16);
        let mut last_end = 0;
        let mut changed = false;

        for found in pattern.find_iter(&current) {
            out.push_str(&current[last_end..found.start()]);
            // Do not stack prefixes on a second pass
            if current[..found.start()].ends_with("\\displaystyle") {
                out.push_str(found.as_str());
            } else {
                out.push_str("\\displaystyle");
                out.push_str(found.as_str());
                changed = true;
            }
            last_end = found.end();
        }
        out.push_str(&current[last_end..]);

        if changed {
            fired = true;
            current = out;
        }
    }
    (current, fired)
}

/// Rule 7: a number directly against a short alphabetic token reads as a
/// quantity with a unit.
fn rule_wrap_bare_units(input: &str) -> (String, bool) {
    let mut fired = false;
    let out = BARE_UNIT
        .replace_all(input, |caps: &Captures| {
            let number = &caps[1];
            let unit = &caps[2];
            if UNIT_EXCLUDED_VARIABLES.contains(&unit) {
                caps[0].to_string()
            } else {
                fired = true;
                format!("{number}\\,\\mathrm{{{unit}}}")
            }
        })
        .into_owned();
    (out, fired)
}
