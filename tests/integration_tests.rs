//! Integration tests for Mclax translation and refinement

use mclax::{
    convert, refine, translate, translate_with_diagnostics, try_translate, TranslateError,
    WarningKind, EXAMPLE_EXPRESSIONS,
};

// ============================================================================
// Symbol Tests
// ============================================================================

mod symbols {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_single_greek_letters() {
        let letters = [
            ("α", "\\alpha"),
            ("β", "\\beta"),
            ("γ", "\\gamma"),
            ("π", "\\pi"),
            ("ω", "\\omega"),
            ("ϕ", "\\varphi"),
            ("ϑ", "\\vartheta"),
            ("Δ", "\\Delta"),
            ("Σ", "\\Sigma"),
            ("Ω", "\\Omega"),
        ];
        for (input, expected) in letters {
            assert_eq!(translate(input), expected, "for input '{}'", input);
        }
    }

    #[test]
    fn test_special_symbols() {
        assert_eq!(translate("†"), "{\\dagger}");
        assert_eq!(translate("°"), "^{\\circ}");
        assert_eq!(translate("′"), "^{\\prime}");
    }

    #[test]
    fn test_infinity() {
        assert_eq!(translate("∞"), "\\infty");
    }

    #[test]
    fn test_natural_log_base() {
        assert_eq!(translate("e"), "e");
    }

    #[test]
    fn test_symbols_inside_compound_expressions() {
        assert_eq!(translate("(α + β)"), "(\\alpha + \\beta)");
        assert_eq!(translate("(+ α β)"), "\\alpha + \\beta");
    }
}

// ============================================================================
// Operator Tests
// ============================================================================

mod operators {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_basic_arithmetic() {
        assert_eq!(translate("(+ x y)"), "x + y");
        assert_eq!(translate("(- x y)"), "x - y");
        assert_eq!(translate("(* x y)"), "x \\cdot y");
        assert_eq!(translate("(/ x y)"), "\\frac{x}{y}");
        assert_eq!(translate("(^ x 2)"), "{x}^{2}");
    }

    #[test]
    fn test_nary_addition_and_multiplication() {
        assert_eq!(translate("(+ a b c)"), "a + b + c");
        assert_eq!(translate("(* a b c)"), "a \\cdot b \\cdot c");
    }

    #[test]
    fn test_exponential_keeps_bare_base() {
        assert_eq!(translate("(^ e x)"), "e^{x}");
    }

    #[test]
    fn test_nested_operators() {
        assert_eq!(translate("(+ (* 2 x) (/ y z))"), "2 \\cdot x + \\frac{y}{z}");
        assert_eq!(translate("(/ (+ a b) c)"), "\\frac{a + b}{c}");
    }

    #[test]
    fn test_negation() {
        assert_eq!(translate("(@NEG x)"), "-x");
        assert_eq!(translate("(@NEG (+ x y))"), "-\\left(x + y\\right)");
    }
}

// ============================================================================
// Calculus Tests
// ============================================================================

mod calculus {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_integral() {
        assert_eq!(
            translate("(@INTEGRAL 0 1 x^2 x)"),
            "\\int_{0}^{1} x^2 \\, dx"
        );
    }

    #[test]
    fn test_integral_with_too_few_arguments() {
        assert_eq!(translate("(@INTEGRAL 0 1)"), "\\int{}");
    }

    #[test]
    fn test_nested_integral() {
        let result = translate("(@INTEGRAL 0 1 (@INTEGRAL 0 y x^2 x) y)");
        assert_eq!(result, "\\int_{0}^{1} \\int_{0}^{y} x^2 \\, dx \\, dy");
    }

    #[test]
    fn test_derivative_first_order() {
        assert_eq!(
            translate("(@DERIV x 1 (^ x 2))"),
            "\\frac{\\mathrm{d}}{\\mathrm{d}x} {x}^{2}"
        );
    }

    #[test]
    fn test_derivative_placeholder_defaults_to_first_order() {
        assert_eq!(
            translate("(@DERIV x @PLACEHOLDER f)"),
            "\\frac{\\mathrm{d}}{\\mathrm{d}x} f"
        );
    }

    #[test]
    fn test_derivative_higher_order_with_parens() {
        assert_eq!(
            translate("(@DERIV x 2 (@PARENS (* x y)))"),
            "\\frac{\\mathrm{d}^{2}}{\\mathrm{d}x^{2}} \\left(x \\cdot y\\right)"
        );
    }

    #[test]
    fn test_partial_derivative() {
        assert_eq!(
            translate("(@PART_DERIV x 1 (@PARENS (+ x y)))"),
            "\\frac{\\partial^{1}}{\\partial x^{1}} \\left(x + y\\right)"
        );
    }

    #[test]
    fn test_partial_derivative_placeholder_order() {
        assert_eq!(
            translate("(@PART_DERIV x @PLACEHOLDER f 2)"),
            "\\frac{\\partial^{2}}{\\partial x^{2}} f"
        );
        assert_eq!(
            translate("(@PART_DERIV x @PLACEHOLDER f)"),
            "\\frac{\\partial}{\\partial x} f"
        );
    }

    #[test]
    fn test_limit() {
        assert_eq!(
            translate("(@LIMIT x 0 (@PARENS (/ (^ x 2) x)))"),
            "\\lim_{x \\to 0} \\left(\\frac{{x}^{2}}{x}\\right)"
        );
    }

    #[test]
    fn test_limit_directions() {
        assert_eq!(
            translate("(@LIMIT x 0 @RIGHT_HAND f)"),
            "\\lim_{x \\to 0^{+}} f"
        );
        assert_eq!(
            translate("(@LIMIT x 0 @LEFT_HAND f)"),
            "\\lim_{x \\to 0^{-}} f"
        );
    }

    #[test]
    fn test_nthroot() {
        assert_eq!(translate("(@NTHROOT 2 x)"), "\\sqrt{x}");
        assert_eq!(translate("(@NTHROOT 3 x)"), "\\sqrt[3]{x}");
        assert_eq!(translate("(@NTHROOT @PLACEHOLDER x)"), "\\sqrt{x}");
    }

    #[test]
    fn test_sum_with_index_wrapper() {
        assert_eq!(
            translate("(@SUM (@IS i 1) 10 i^2)"),
            "\\sum_{i=1}^{10} i^2"
        );
    }

    #[test]
    fn test_sum_positional_forms() {
        // Three arguments: start defaults to 1
        assert_eq!(translate("(@SUM i n i)"), "\\sum_{i=1}^{n} i");
        // Four arguments: explicit start value
        assert_eq!(translate("(@SUM k 2 n k)"), "\\sum_{k=2}^{n} k");
    }

    #[test]
    fn test_product() {
        assert_eq!(translate("(@PRODUCT (@IS i 1) n i)"), "\\prod_{i=1}^{n} i");
        // Product shares the sum's start-value default
        assert_eq!(translate("(@PRODUCT i n i)"), "\\prod_{i=1}^{n} i");
    }

    #[test]
    fn test_big_operator_degraded_defaults() {
        assert_eq!(translate("(@SUM)"), "\\sum");
        assert_eq!(translate("(@PRODUCT i)"), "");
    }

    #[test]
    fn test_prime_notation() {
        assert_eq!(translate("(@PRIME f)"), "f'");
        assert_eq!(translate("(@PRIME f 3)"), "f'''");
    }
}

// ============================================================================
// Logic and Relation Tests
// ============================================================================

mod logic_and_relations {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_relations() {
        assert_eq!(translate("(@GEQ x y)"), "x \\geq y");
        assert_eq!(translate("(@LEQ x y)"), "x \\leq y");
        assert_eq!(translate("(@NEQ x y)"), "x \\neq y");
        assert_eq!(translate("(@ELEMENT_OF x R)"), "x \\in R");
    }

    #[test]
    fn test_logic_operators() {
        assert_eq!(translate("(@AND p q)"), "p \\land q");
        assert_eq!(translate("(@OR p q)"), "p \\lor q");
        assert_eq!(translate("(@XOR p q)"), "p \\oplus q");
        assert_eq!(translate("(@NOT p)"), "\\neg p");
    }

    #[test]
    fn test_is_equality() {
        assert_eq!(translate("(@IS (^ x 2) (+ y z))"), "{x}^{2} = y + z");
    }

    #[test]
    fn test_bare_equals() {
        assert_eq!(translate("(= x y)"), "x = y");
        assert_eq!(translate("(= (+ a b) c)"), "a + b = c");
    }

    #[test]
    fn test_equation_flattens_arithmetic_rhs() {
        assert_eq!(translate("(@EQ y (+ x 1))"), "y = x + 1");
        assert_eq!(translate("(@EQ y (- a b))"), "y = a - b");
        assert_eq!(translate("(@EQ y (* 2 x))"), "y = 2 \\cdot x");
        assert_eq!(translate("(@EQ y (/ a b))"), "y = \\frac{a}{b}");
        assert_eq!(translate("(@EQ y z)"), "y = z");
    }

    #[test]
    fn test_sym_eval() {
        assert_eq!(
            translate("(@SYM_EVAL (+ x x) (* 2 x))"),
            "x + x \\rightarrow 2 \\cdot x"
        );
        // Keyword stacks between input and result are skipped
        assert_eq!(
            translate("(@SYM_EVAL (+ x x) (@KW_STACK simplify) (* 2 x))"),
            "x + x \\rightarrow 2 \\cdot x"
        );
        assert_eq!(translate("(@SYM_EVAL (+ x x) (@KW_STACK simplify))"), "x + x");
    }
}

// ============================================================================
// Function and Label Tests
// ============================================================================

mod functions_and_labels {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_function_application() {
        assert_eq!(translate("(@APPLY sin (@ARGS x))"), "\\sin(x)");
        assert_eq!(translate("(@APPLY ln (@ARGS x))"), "\\ln(x)");
        assert_eq!(translate("(@APPLY log10 (@ARGS x))"), "\\log_{10}(x)");
    }

    #[test]
    fn test_abs_uses_bar_delimiters() {
        assert_eq!(translate("(@APPLY abs (@ARGS x))"), "\\left|x\\right|");
    }

    #[test]
    fn test_unmapped_function_passes_through() {
        assert_eq!(translate("(@APPLY foo (@ARGS x))"), "foo(x)");
    }

    #[test]
    fn test_multiple_arguments() {
        assert_eq!(translate("(@APPLY max (@ARGS x y))"), "\\max(x, y)");
    }

    #[test]
    fn test_subscripts() {
        assert_eq!(translate("(@SUB k)"), "{k}");
        assert_eq!(translate("(@ID T (@SUB 0))"), "T_{0}");
    }

    #[test]
    fn test_constant_labels() {
        assert_eq!(translate("(@LABEL CONSTANT ℏ)"), "\\hbar");
        assert_eq!(translate("(@LABEL CONSTANT k)"), "k_\\mathrm{B}");
        assert_eq!(translate("(@LABEL CONSTANT G)"), "G");
    }

    #[test]
    fn test_subscripted_constant_composes_table_key() {
        // e with subscript c is the elementary charge
        assert_eq!(translate("(@LABEL CONSTANT (@ID e (@SUB c)))"), "e");
        assert_eq!(translate("(@LABEL CONSTANT (@ID m (@SUB u)))"), "m_\\mathrm{u}");
        // Unknown compositions degrade to plain subscripting
        assert_eq!(translate("(@LABEL CONSTANT (@ID X (@SUB 5)))"), "X_{5}");
    }

    #[test]
    fn test_unit_labels() {
        assert_eq!(translate("(@LABEL UNIT kg)"), "\\mathrm{kg}");
        assert_eq!(translate("(@LABEL UNIT N)"), "\\mathrm{N}");
        // Case-insensitive fallback
        assert_eq!(translate("(@LABEL UNIT HZ)"), "\\mathrm{Hz}");
        // Unknown units still render upright
        assert_eq!(translate("(@LABEL UNIT furlong)"), "\\mathrm{furlong}");
    }

    #[test]
    fn test_variable_and_function_labels() {
        assert_eq!(translate("(@LABEL VARIABLE velocity)"), "velocity");
        assert_eq!(translate("(@LABEL FUNCTION f)"), "\\operatorname{f}");
    }

    #[test]
    fn test_scale_value_with_unit() {
        assert_eq!(translate("(@SCALE 5 m)"), "5\\,\\mathrm{m}");
        assert_eq!(translate("(@SCALE 3 (/ m s))"), "3\\,\\frac{m}{s}");
        assert_eq!(translate("(@SCALE 2 (^ m 2))"), "2\\,\\mathrm{m}^{2}");
    }

    #[test]
    fn test_rscale_result_unit() {
        assert_eq!(
            translate("(@RSCALE (@PARENS 5) (@LABEL UNIT N))"),
            "5\\,\\mathrm{N}"
        );
        assert_eq!(translate("(@RSCALE 9.81 (@LABEL UNIT m))"), "9.81\\,\\mathrm{m}");
    }
}

// ============================================================================
// Matrix and Vector Tests
// ============================================================================

mod matrices_and_vectors {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_two_by_two_matrix() {
        let result = translate("(@MATRIX 2 2 a b c d)");
        assert_eq!(
            result,
            "\\begin{pmatrix}\na & b \\\\\nc & d\n\\end{pmatrix}"
        );
    }

    #[test]
    fn test_matrix_pads_missing_elements() {
        let result = translate("(@MATRIX 2 2 a b c)");
        assert_eq!(
            result,
            "\\begin{pmatrix}\na & b \\\\\nc & 0\n\\end{pmatrix}"
        );
    }

    #[test]
    fn test_matrix_elements_are_parsed() {
        let result = translate("(@MATRIX 1 2 (^ x 2) (/ a b))");
        assert_eq!(result, "\\begin{pmatrix}\n{x}^{2} & \\frac{a}{b}\n\\end{pmatrix}");
    }

    #[test]
    fn test_cross_and_dot_products() {
        assert_eq!(translate("(@CROSS a b)"), "a \\times b");
        assert_eq!(translate("(@DOT a b)"), "a \\cdot b");
    }
}

// ============================================================================
// Complex Evaluation Tests
// ============================================================================

mod complex_evaluation {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_division_of_labeled_terms() {
        assert_eq!(
            translate("(/ (@LABEL CONSTANT c) (@LABEL VARIABLE x))"),
            "\\frac{c}{x}"
        );
    }

    #[test]
    fn test_product_with_applied_function() {
        assert_eq!(
            translate("(* 2 (@APPLY sin (@ARGS x)))"),
            "2 \\cdot \\sin(x)"
        );
    }

    #[test]
    fn test_sum_of_labeled_terms() {
        assert_eq!(
            translate("(+ (@LABEL VARIABLE x) (@LABEL UNIT m))"),
            "x + \\mathrm{m}"
        );
    }

    #[test]
    fn test_degenerate_form_still_resolves_labels() {
        // Too few arguments for structural disassembly; the rewrite tier
        // still resolves the label and strips tag remnants.
        let result = translate("(- (@LABEL CONSTANT c))");
        assert!(result.contains('c'), "got '{}'", result);
        assert!(!result.contains("@LABEL"), "got '{}'", result);
    }
}

// ============================================================================
// Spacing Normalizer Tests
// ============================================================================

mod spacing {
    use mclax::core::mathcad2latex::spacing::add_command_spacing;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_greek_identifier_collision() {
        assert_eq!(add_command_spacing("\\pix"), "\\pi x");
        assert_eq!(add_command_spacing("\\alphab"), "\\alpha b");
    }

    #[test]
    fn test_complete_commands_keep_their_braces() {
        assert_eq!(add_command_spacing("\\sqrt{x}"), "\\sqrt{x}");
        assert_eq!(add_command_spacing("\\frac{a}{b}"), "\\frac{a}{b}");
    }
}

// ============================================================================
// Refinement Tests
// ============================================================================

mod refinement {
    use super::*;

    #[test]
    fn test_division_becomes_fraction() {
        assert_eq!(refine("a/b"), "\\frac{a}{b}");
    }

    #[test]
    fn test_bare_functions_are_escaped() {
        let refined = refine("sin(x) + cos(y)");
        assert!(refined.contains("\\sin"));
        assert!(refined.contains("\\cos"));
    }

    #[test]
    fn test_superscripts_are_braced() {
        assert!(refine("x^2 + 1").contains("x^{2}"));
    }

    #[test]
    fn test_fraction_parens_are_sized() {
        let refined = refine("(\\frac{a}{b})");
        assert!(refined.contains("\\left("));
        assert!(refined.contains("\\right)"));
    }

    #[test]
    fn test_big_operators_get_display_style() {
        let converted = convert("(@SUM (@IS i 1) 10 i^2)");
        assert!(converted.contains("\\displaystyle\\sum"));
        assert!(converted.contains("i^{2}"));
    }

    #[test]
    fn test_numbers_with_units_get_upright_text() {
        let refined = refine("5 kg");
        assert!(refined.contains("5\\,\\mathrm{kg}"));
        // Common variable letters are not units
        let refined = refine("10 i");
        assert!(!refined.contains("\\mathrm{i}"));
    }

    #[test]
    fn test_annotation_when_no_rule_applies() {
        let refined = refine("\\sqrt{x}");
        assert!(refined.contains("% No further refinements available"));
    }

    #[test]
    fn test_double_refine_preserves_structure() {
        for input in ["(@INTEGRAL 0 1 x^2 x)", "(@SUM (@IS i 1) 10 i^2)", "(/ x y)"] {
            let once = convert(input);
            let twice = refine(&once);
            let strip = |s: &str| s.replace("  % No further refinements available", "");
            let once_core = strip(&once);
            let twice_core = strip(&twice);
            assert_eq!(
                once_core.matches("\\frac").count(),
                twice_core.matches("\\frac").count(),
                "fraction structure changed for '{}'",
                input
            );
            assert_eq!(
                once_core.matches("\\displaystyle").count(),
                twice_core.matches("\\displaystyle").count(),
                "display style stacked for '{}'",
                input
            );
        }
    }
}

// ============================================================================
// Diagnostics Tests
// ============================================================================

mod diagnostics {
    use super::*;

    #[test]
    fn test_unbalanced_input_warns_but_translates() {
        let result = translate_with_diagnostics("(+ x (/ y z)");
        assert!(!result.output.is_empty());
        assert!(result
            .warnings
            .iter()
            .any(|w| w.kind == WarningKind::UnbalancedParens));
    }

    #[test]
    fn test_unknown_tag_warns_and_passes_through() {
        let result = translate_with_diagnostics("(@FRACTION α β)");
        assert_eq!(result.output, "(@FRACTION \\alpha \\beta)");
        assert!(result.warnings.iter().any(|w| w.kind == WarningKind::UnknownTag));
    }

    #[test]
    fn test_missing_arguments_warn() {
        let result = translate_with_diagnostics("(@GEQ x)");
        assert_eq!(result.output, "");
        assert!(result
            .warnings
            .iter()
            .any(|w| w.kind == WarningKind::MissingArguments));
    }

    #[test]
    fn test_deep_nesting_degrades_with_warning() {
        let mut expr = String::from("x");
        for _ in 0..80 {
            expr = format!("(@NEG {expr})");
        }
        let result = translate_with_diagnostics(&expr);
        assert!(!result.output.is_empty());
        assert!(result.warnings.iter().any(|w| w.kind == WarningKind::DepthLimit));
    }

    #[test]
    fn test_try_translate_fails_on_deep_nesting() {
        let mut expr = String::from("x");
        for _ in 0..80 {
            expr = format!("(@NEG {expr})");
        }
        match try_translate(&expr) {
            Err(TranslateError::RecursionLimitExceeded { depth }) => {
                assert_eq!(depth, mclax::DEFAULT_MAX_DEPTH);
            }
            other => panic!("expected recursion limit error, got {:?}", other),
        }
    }

    #[test]
    fn test_try_translate_succeeds_on_normal_input() {
        assert_eq!(try_translate("(+ x y)").unwrap(), "x + y");
    }
}

// ============================================================================
// Round-trip Property
// ============================================================================

mod roundtrip {
    use super::*;

    /// Tags whose output always carries at least one LaTeX control sequence.
    const NAMED_OPERATIONS: [&str; 9] = [
        "@INTEGRAL",
        "@DERIV",
        "@PART_DERIV",
        "@LIMIT",
        "@PRODUCT",
        "@NTHROOT",
        "@APPLY",
        "@LEQ",
        "@GEQ",
    ];

    #[test]
    fn test_every_example_translates() {
        for example in EXAMPLE_EXPRESSIONS {
            let output = translate(example);
            assert!(!output.is_empty(), "empty output for '{}'", example);

            if NAMED_OPERATIONS.iter().any(|tag| example.contains(tag)) {
                assert!(
                    output.contains('\\'),
                    "no control sequence in '{}' for '{}'",
                    output,
                    example
                );
            }
        }
    }

    #[test]
    fn test_every_example_converts() {
        for example in EXAMPLE_EXPRESSIONS {
            let output = convert(example);
            assert!(!output.is_empty(), "empty output for '{}'", example);
        }
    }
}
