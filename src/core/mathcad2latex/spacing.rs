//! Spacing repair for generated LaTeX fragments
//!
//! A Greek command emitted directly against a following identifier would
//! fuse into an undefined command (`\pi` + `b` renders as `\pib`). The
//! normalizer runs in two phases: targeted substitutions for the known
//! Greek command names, then a general scan that closes off any remaining
//! backslash command that collides with an alphanumeric character.

use lazy_static::lazy_static;
use regex::Regex;

/// Greek command names handled by the targeted phase, in substitution order.
const GREEK_COMMANDS: [&str; 24] = [
    "pi", "alpha", "beta", "gamma", "delta", "epsilon", "zeta", "eta", "theta", "iota", "kappa",
    "lambda", "mu", "nu", "xi", "omicron", "rho", "sigma", "tau", "upsilon", "phi", "chi", "psi",
    "omega",
];

/// Multi-letter commands that are always followed by braces or script
/// markers, never by a bare identifier, so the general scan leaves them
/// unspaced.
const COMPLETE_COMMANDS: [&str; 7] = ["int", "sum", "prod", "lim", "frac", "sqrt", "in"];

lazy_static! {
    static ref GREEK_SPACING: Vec<(Regex, String)> = GREEK_COMMANDS
        .iter()
        .map(|name| {
            let pattern = format!(r"\\{}([a-zA-Z0-9])", name);
            // Backslash is literal in a regex replacement; only `$` is special.
            let replacement = format!("\\{} ${{1}}", name);
            (Regex::new(&pattern).expect("valid spacing pattern"), replacement)
        })
        .collect();
}

/// Insert separating spaces after LaTeX commands that would otherwise
/// collide with a following alphanumeric character.
pub fn add_command_spacing(latex: &str) -> String {
    if latex.is_empty() || !latex.contains('\\') {
        return latex.to_string();
    }

    let mut result = latex.to_string();
    for (pattern, replacement) in GREEK_SPACING.iter() {
        result = pattern.replace_all(&result, replacement.as_str()).into_owned();
    }

    space_after_commands(&result)
}

/// General scan: after any backslash command not on the complete-commands
/// list, insert a space when the next character is alphanumeric.
fn space_after_commands(latex: &str) -> String {
    let chars: Vec<char> = latex.chars().collect();
    let mut out = String::with_capacity(latex.len() + 8);
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == '\\' {
            let mut name = String::new();
            let mut j = i + 1;
            while j < chars.len() && chars[j].is_ascii_alphabetic() {
                name.push(chars[j]);
                j += 1;
            }
            out.push('\\');
            out.push_str(&name);
            i = j;
            if !COMPLETE_COMMANDS.contains(&name.as_str())
                && i < chars.len()
                && chars[i].is_alphanumeric()
            {
                out.push(' ');
            }
            continue;
        }
        out.push(chars[i]);
        i += 1;
    }
    out
}
