//! SI units and named physical constants

use fxhash::FxHashMap;
use lazy_static::lazy_static;
use phf::phf_map;

/// Unit tokens to LaTeX fragments.
///
/// Newton appears three times on purpose: `N` collides with the symbol `n`
/// once Mathcad lowercases labels, so both spellings plus the written-out
/// form are kept as distinct keys.
pub static UNITS: phf::Map<&'static str, &'static str> = phf_map! {
    // Base SI units
    "m" => "\\mathrm{m}",
    "kg" => "\\mathrm{kg}",
    "s" => "\\mathrm{s}",
    "A" => "\\mathrm{A}",
    "K" => "\\mathrm{K}",
    "mol" => "\\mathrm{mol}",
    "cd" => "\\mathrm{cd}",

    // Derived SI units
    "N" => "\\mathrm{N}",
    "n" => "\\mathrm{n}",
    "newton" => "\\mathrm{N}",
    "Pa" => "\\mathrm{Pa}",
    "J" => "\\mathrm{J}",
    "W" => "\\mathrm{W}",
    "C" => "\\mathrm{C}",
    "V" => "\\mathrm{V}",
    "F" => "\\mathrm{F}",
    "Ω" => "\\Omega",
    "S" => "\\mathrm{S}",
    "T" => "\\mathrm{T}",
    "H" => "\\mathrm{H}",
    "Hz" => "\\mathrm{Hz}",

    // Common non-SI units
    "min" => "\\mathrm{min}",
    "h" => "\\mathrm{h}",
    "day" => "\\mathrm{day}",
    "deg" => "^{\\circ}",
    "rad" => "\\mathrm{rad}",
    "sr" => "\\mathrm{sr}",
    "L" => "\\mathrm{L}",
    "g" => "\\mathrm{g}",
    "t" => "\\mathrm{t}",
    "eV" => "\\mathrm{eV}",
    "bar" => "\\mathrm{bar}",
    "atm" => "\\mathrm{atm}",
    "in" => "\\mathrm{in}",
    "ft" => "\\mathrm{ft}",
    "mi" => "\\mathrm{mi}",
    "lb" => "\\mathrm{lb}",
};

/// Named physical constants.
///
/// Keys are the exact tokens Mathcad labels as CONSTANT, including composed
/// identifier-plus-subscript forms such as `e_c` or `μ_B`.
pub static CONSTANTS: phf::Map<&'static str, &'static str> = phf_map! {
    // Fundamental constants
    "c" => "c",
    "e_c" => "e",
    "h" => "h",
    "ℏ" => "\\hbar",
    "k" => "k_\\mathrm{B}",
    "m_u" => "m_\\mathrm{u}",
    "N_A" => "N_\\mathrm{A}",
    "R" => "R",
    "R_∞" => "R_{\\infty}",
    "α" => "\\alpha",
    "γ" => "\\gamma",
    "ε_0" => "\\varepsilon_0",
    "μ_0" => "\\mu_0",
    "σ" => "\\sigma",
    "Φ_0" => "\\Phi_0",

    // Additional physical constants
    "G" => "G",
    "g" => "g",
    "M_e" => "m_\\mathrm{e}",
    "M_p" => "m_\\mathrm{p}",
    "M_n" => "m_\\mathrm{n}",
    "q_e" => "e",
    "F" => "F",
    "n_0" => "n_0",
    "K_J" => "K_\\mathrm{J}",
    "R_K" => "R_\\mathrm{K}",
    "μ_B" => "\\mu_\\mathrm{B}",
    "μ_N" => "\\mu_\\mathrm{N}",
    "a_0" => "a_0",
    "E_h" => "E_\\mathrm{h}",
    "λ_C" => "\\lambda_\\mathrm{C}",
};

lazy_static! {
    /// Uppercased unit token to canonical table key, for the
    /// case-insensitive fallback paths of the label and scale handlers.
    static ref UNITS_BY_UPPER: FxHashMap<String, &'static str> = {
        let mut index: FxHashMap<String, &'static str> = FxHashMap::default();
        for key in UNITS.keys() {
            index.entry(key.to_uppercase()).or_insert(key);
        }
        // Newton beats the lowercase `n` entry regardless of table order.
        index.insert("N".to_string(), "N");
        index
    };
}

/// Case-insensitive unit lookup, returning the LaTeX fragment of the first
/// table entry whose key matches ignoring case.
pub fn lookup_unit_case_insensitive(name: &str) -> Option<&'static str> {
    UNITS_BY_UPPER
        .get(&name.to_uppercase())
        .and_then(|key| UNITS.get(key))
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_lookup() {
        assert_eq!(UNITS.get("kg"), Some(&"\\mathrm{kg}"));
        assert_eq!(UNITS.get("Ω"), Some(&"\\Omega"));
        assert_eq!(UNITS.get("parsec"), None);
    }

    #[test]
    fn test_case_insensitive_unit_lookup() {
        assert_eq!(lookup_unit_case_insensitive("HZ"), Some("\\mathrm{Hz}"));
        assert_eq!(lookup_unit_case_insensitive("pa"), Some("\\mathrm{Pa}"));
        assert_eq!(lookup_unit_case_insensitive("nope"), None);
    }

    #[test]
    fn test_constant_lookup() {
        assert_eq!(CONSTANTS.get("ℏ"), Some(&"\\hbar"));
        assert_eq!(CONSTANTS.get("e_c"), Some(&"e"));
        assert_eq!(CONSTANTS.get("k"), Some(&"k_\\mathrm{B}"));
    }
}
