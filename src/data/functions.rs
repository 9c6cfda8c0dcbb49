//! Named math functions recognized by the apply handler
//!
//! `abs` is intentionally absent: it uses `\left|...\right|` wrapping
//! instead of call syntax and is special-cased by the handler.

use phf::phf_map;

/// Function-name tokens to LaTeX commands
pub static MATH_FUNCTIONS: phf::Map<&'static str, &'static str> = phf_map! {
    "sin" => "\\sin",
    "cos" => "\\cos",
    "tan" => "\\tan",
    "cot" => "\\cot",
    "sec" => "\\sec",
    "csc" => "\\csc",
    "arcsin" => "\\arcsin",
    "arccos" => "\\arccos",
    "arctan" => "\\arctan",
    "sinh" => "\\sinh",
    "cosh" => "\\cosh",
    "tanh" => "\\tanh",
    "ln" => "\\ln",
    "log" => "\\log",
    "log10" => "\\log_{10}",
    "exp" => "\\exp",
    "max" => "\\max",
    "min" => "\\min",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_lookup() {
        assert_eq!(MATH_FUNCTIONS.get("sin"), Some(&"\\sin"));
        assert_eq!(MATH_FUNCTIONS.get("log10"), Some(&"\\log_{10}"));
        assert_eq!(MATH_FUNCTIONS.get("abs"), None);
    }
}
