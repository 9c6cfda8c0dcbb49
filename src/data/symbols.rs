//! Greek letters and special typographic symbols
//!
//! Source tokens are the Unicode characters Mathcad emits in its region
//! dumps; values are the LaTeX fragments they map to.

use phf::phf_map;

/// Greek letter mappings (lowercase and uppercase)
pub static GREEK_LETTERS: phf::Map<&'static str, &'static str> = phf_map! {
    // Lowercase
    "α" => "\\alpha",
    "β" => "\\beta",
    "χ" => "\\chi",
    "δ" => "\\delta",
    "ε" => "\\epsilon",
    "φ" => "\\phi",
    "ϕ" => "\\varphi",
    "γ" => "\\gamma",
    "η" => "\\eta",
    "ι" => "\\iota",
    "κ" => "\\kappa",
    "λ" => "\\lambda",
    "μ" => "\\mu",
    "ν" => "\\nu",
    "ο" => "\\omicron",
    "π" => "\\pi",
    "θ" => "\\theta",
    "ρ" => "\\rho",
    "σ" => "\\sigma",
    "τ" => "\\tau",
    "υ" => "\\upsilon",
    "ω" => "\\omega",
    "ξ" => "\\xi",
    "ψ" => "\\psi",
    "ζ" => "\\zeta",
    "ϑ" => "\\vartheta",

    // Uppercase
    "Α" => "\\Alpha",
    "Β" => "\\Beta",
    "Χ" => "\\Chi",
    "Δ" => "\\Delta",
    "Ε" => "\\Epsilon",
    "Φ" => "\\Phi",
    "Γ" => "\\Gamma",
    "Η" => "\\Eta",
    "Ι" => "\\Iota",
    "Κ" => "\\Kappa",
    "Λ" => "\\Lambda",
    "Μ" => "\\Mu",
    "Ν" => "\\Nu",
    "Ο" => "\\Omicron",
    "Π" => "\\Pi",
    "Θ" => "\\Theta",
    "Ρ" => "\\Rho",
    "Σ" => "\\Sigma",
    "Τ" => "\\Tau",
    "Υ" => "\\Upsilon",
    "Ω" => "\\Omega",
    "Ξ" => "\\Xi",
    "Ψ" => "\\Psi",
    "Ζ" => "\\Zeta",
};

/// Special typographic symbols (daggers, primes, degree)
pub static SPECIAL_SYMBOLS: phf::Map<&'static str, &'static str> = phf_map! {
    "†" => "{\\dagger}",
    "‡" => "{\\ddagger}",
    "∗" => "^{*}",
    "°" => "^{\\circ}",
    "′" => "^{\\prime}",
    "″" => "^{\\prime\\prime}",
    "‴" => "^{\\prime\\prime\\prime}",
};

/// Substitute every Greek letter, special symbol, and infinity glyph
/// occurrence in `text` with its LaTeX fragment.
///
/// All source tokens are single characters, so a character-wise pass is
/// equivalent to per-table substitution and avoids repeated rescans.
pub fn replace_symbols(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut buf = [0u8; 4];
    for ch in text.chars() {
        if ch == '∞' {
            out.push_str("\\infty");
            continue;
        }
        let key: &str = ch.encode_utf8(&mut buf);
        if let Some(latex) = GREEK_LETTERS.get(key) {
            out.push_str(latex);
        } else if let Some(latex) = SPECIAL_SYMBOLS.get(key) {
            out.push_str(latex);
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greek_lookup() {
        assert_eq!(GREEK_LETTERS.get("α"), Some(&"\\alpha"));
        assert_eq!(GREEK_LETTERS.get("Ω"), Some(&"\\Omega"));
        assert_eq!(GREEK_LETTERS.get("x"), None);
    }

    #[test]
    fn test_replace_symbols_mixed() {
        assert_eq!(replace_symbols("2πr"), "2\\pir");
        assert_eq!(replace_symbols("x → ∞"), "x → \\infty");
        assert_eq!(replace_symbols("f°"), "f^{\\circ}");
    }

    #[test]
    fn test_replace_symbols_passthrough() {
        assert_eq!(replace_symbols("x + y"), "x + y");
        assert_eq!(replace_symbols(""), "");
    }
}
