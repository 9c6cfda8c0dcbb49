//! Tagged-form dispatch and per-tag handlers
//!
//! `parse_expression` is the recursive heart of the translator. Dispatch
//! order matters and is checked first-match-wins: complex symbolic
//! evaluation results, plain operator forms, literal constants, single
//! symbols, then tagged forms. Handlers never abort: a form with too few
//! arguments degrades to an empty or minimal fragment and records a
//! warning.

use lazy_static::lazy_static;
use regex::Regex;

use crate::core::mathcad2latex::complex::is_complex_evaluation;
use crate::core::mathcad2latex::context::Translator;
use crate::core::mathcad2latex::spacing::add_command_spacing;
use crate::core::mathcad2latex::tokenizer::{
    extract_arguments, extract_op_arguments, find_matching_paren,
};
use crate::core::mathcad2latex::TranslationWarning;
use crate::data::symbols::replace_symbols;
use crate::data::units::lookup_unit_case_insensitive;
use crate::data::{CONSTANTS, GREEK_LETTERS, MATH_FUNCTIONS, SPECIAL_SYMBOLS, UNITS};

lazy_static! {
    static ref ID_HEAD: Regex = Regex::new(r"\(@ID\s+([^\s)]+)").expect("valid id pattern");
}

/// Leading `@NAME` token of a tagged form, if any.
fn leading_tag(expr: &str) -> Option<String> {
    let rest = expr.strip_prefix("(@")?;
    let end = rest
        .find(|c: char| c == ' ' || c == '(' || c == ')')
        .unwrap_or(rest.len());
    Some(format!("@{}", &rest[..end]))
}

impl Translator {
    /// Parse one Mathcad expression into a LaTeX fragment.
    pub(crate) fn parse_expression(&mut self, expression: &str, depth: usize) -> String {
        let expression = expression.trim();
        if expression.is_empty() {
            return String::new();
        }

        if depth > self.options.max_depth {
            if !self.depth_exceeded {
                self.depth_exceeded = true;
                let warning = TranslationWarning::depth_limit(self.options.max_depth, expression);
                self.warn(warning);
            }
            return expression.to_string();
        }

        // Symbolic evaluation results mix raw operator roots with labeled
        // leaves and need pattern-based reconstruction instead of strict
        // positional extraction.
        if is_complex_evaluation(expression) {
            return self.handle_complex_evaluation(expression, depth);
        }

        // Plain arithmetic forms
        if expression.starts_with("(+") {
            return self.join_args(expression, depth, " + ", 1);
        } else if expression.starts_with("(-") {
            return self.handle_subtraction(expression, depth);
        } else if expression.starts_with("(*") {
            return self.join_args(expression, depth, " \\cdot ", 1);
        } else if expression.starts_with("(/") {
            return self.handle_division(expression, depth);
        } else if expression.starts_with("(^") {
            return self.handle_power(expression, depth);
        }

        // Literal constants
        if expression == "e" {
            return "e".to_string();
        }
        if expression == "∞" {
            return "\\infty".to_string();
        }

        // Single Greek letters and special symbols
        if expression.chars().count() == 1 {
            if let Some(latex) = GREEK_LETTERS.get(expression) {
                return latex.to_string();
            }
            if let Some(latex) = SPECIAL_SYMBOLS.get(expression) {
                return latex.to_string();
            }
        }

        // Normalize symbols inside compound expressions before dispatch.
        let expression = replace_symbols(expression);

        if let Some(tag) = leading_tag(&expression) {
            if let Some(output) = self.dispatch_tag(&tag, &expression, depth) {
                return add_command_spacing(&output);
            }
            self.warn(TranslationWarning::unknown_tag(&tag));
        } else if expression.starts_with("(=") {
            return add_command_spacing(&self.handle_equals(&expression, depth));
        }

        // Opaque identifier or literal
        add_command_spacing(&expression)
    }

    /// Route a tagged form to its handler. `None` means the tag is unknown
    /// and the caller should fall back to passthrough.
    pub(crate) fn dispatch_tag(&mut self, tag: &str, expr: &str, depth: usize) -> Option<String> {
        let output = match tag {
            "@INTEGRAL" => self.handle_integral(expr, depth),
            "@PART_DERIV" => self.handle_partial_derivative(expr, depth),
            "@LIMIT" => self.handle_limit(expr, depth),
            "@DERIV" => self.handle_derivative(expr, depth),
            "@PRIME" => self.handle_prime(expr, depth),
            "@NTHROOT" => self.handle_nthroot(expr, depth),
            "@PRODUCT" => self.handle_big_operator(expr, depth, "\\prod", ""),
            "@SUM" => self.handle_big_operator(expr, depth, "\\sum", "\\sum"),
            "@APPLY" => self.handle_apply(expr, depth),
            "@ARGS" => self.handle_args(expr, depth),
            "@ELEMENT_OF" => self.handle_binary(expr, depth, " \\in "),
            "@XOR" => self.handle_binary(expr, depth, " \\oplus "),
            "@GEQ" => self.handle_binary(expr, depth, " \\geq "),
            "@LEQ" => self.handle_binary(expr, depth, " \\leq "),
            "@AND" => self.join_args(expr, depth, " \\land ", 2),
            "@OR" => self.join_args(expr, depth, " \\lor ", 2),
            "@NOT" => self.handle_not(expr, depth),
            "@NEQ" => self.handle_binary(expr, depth, " \\neq "),
            "@NEG" => self.handle_negation(expr, depth),
            "@SCALE" => self.handle_scale(expr, depth),
            "@RSCALE" => self.handle_rscale(expr, depth),
            "@PARENS" => self.handle_parens(expr, depth),
            "@LABEL" => self.handle_label(expr, depth),
            "@IS" => self.handle_binary(expr, depth, " = "),
            "@MATRIX" => self.handle_matrix(expr, depth),
            "@CROSS" => self.handle_binary(expr, depth, " \\times "),
            "@DOT" => self.handle_binary(expr, depth, " \\cdot "),
            "@SYM_EVAL" => self.handle_sym_eval(expr, depth),
            "@SUB" => self.handle_subscript(expr, depth),
            "@ID" if expr.contains("(@SUB") => self.handle_id_with_subscript(expr, depth),
            "@EQ" => self.handle_equation(expr, depth),
            _ => return None,
        };
        Some(output)
    }

    // =========================================================================
    // Shared handler shapes
    // =========================================================================

    /// Parse all arguments and join with `separator`.
    pub(super) fn join_args(&mut self, expr: &str, depth: usize, separator: &str, min: usize) -> String {
        let args = extract_arguments(expr);
        if args.len() < min {
            self.warn_arity(expr, min, args.len());
            return String::new();
        }
        args.iter()
            .map(|arg| self.parse_expression(arg, depth + 1))
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// Parse the first two arguments, or `None` with a warning recorded.
    fn binary_args(&mut self, expr: &str, depth: usize) -> Option<(String, String)> {
        let args = extract_arguments(expr);
        if args.len() < 2 {
            self.warn_arity(expr, 2, args.len());
            return None;
        }
        let left = self.parse_expression(&args[0], depth + 1);
        let right = self.parse_expression(&args[1], depth + 1);
        Some((left, right))
    }

    fn handle_binary(&mut self, expr: &str, depth: usize, separator: &str) -> String {
        match self.binary_args(expr, depth) {
            Some((left, right)) => format!("{left}{separator}{right}"),
            None => String::new(),
        }
    }

    /// Unwrap a `@PARENS` argument into `\left(...\right)`, or parse it
    /// plainly. Derivatives and limits share this shape.
    fn parse_function_argument(&mut self, arg: &str, depth: usize) -> String {
        if arg.starts_with("(@PARENS") {
            let inner = extract_arguments(arg);
            match inner.first() {
                Some(first) => {
                    let parsed = self.parse_expression(first, depth + 1);
                    format!("\\left({parsed}\\right)")
                }
                None => String::new(),
            }
        } else {
            self.parse_expression(arg, depth + 1)
        }
    }

    // =========================================================================
    // Arithmetic
    // =========================================================================

    pub(super) fn handle_subtraction(&mut self, expr: &str, depth: usize) -> String {
        match self.binary_args(expr, depth) {
            Some((minuend, subtrahend)) => format!("{minuend} - {subtrahend}"),
            None => String::new(),
        }
    }

    pub(super) fn handle_division(&mut self, expr: &str, depth: usize) -> String {
        match self.binary_args(expr, depth) {
            Some((numerator, denominator)) => format!("\\frac{{{numerator}}}{{{denominator}}}"),
            None => String::new(),
        }
    }

    fn handle_power(&mut self, expr: &str, depth: usize) -> String {
        let (base, exponent) = match self.binary_args(expr, depth) {
            Some(pair) => pair,
            None => return String::new(),
        };
        // The natural-log base keeps its bare form
        if base == "e" {
            format!("e^{{{exponent}}}")
        } else {
            format!("{{{base}}}^{{{exponent}}}")
        }
    }

    // =========================================================================
    // Calculus
    // =========================================================================

    fn handle_integral(&mut self, expr: &str, depth: usize) -> String {
        let args = extract_arguments(expr);
        if args.len() < 4 {
            self.warn_arity("@INTEGRAL", 4, args.len());
            return "\\int{}".to_string();
        }
        let lower = self.parse_expression(&args[0], depth + 1);
        let upper = self.parse_expression(&args[1], depth + 1);
        let integrand = self.parse_expression(&args[2], depth + 1);
        let variable = self.parse_expression(&args[3], depth + 1);
        format!("\\int_{{{lower}}}^{{{upper}}} {integrand} \\, d{variable}")
    }

    fn handle_derivative(&mut self, expr: &str, depth: usize) -> String {
        let args = extract_arguments(expr);
        if args.len() < 3 {
            self.warn_arity("@DERIV", 3, args.len());
            return String::new();
        }
        let variable = self.parse_expression(&args[0], depth + 1);
        let order = if args[1] == "@PLACEHOLDER" {
            "1".to_string()
        } else {
            self.parse_expression(&args[1], depth + 1)
        };
        let function = self.parse_function_argument(&args[2], depth);

        if order == "1" {
            format!("\\frac{{\\mathrm{{d}}}}{{\\mathrm{{d}}{variable}}} {function}")
        } else {
            format!(
                "\\frac{{\\mathrm{{d}}^{{{order}}}}}{{\\mathrm{{d}}{variable}^{{{order}}}}} {function}"
            )
        }
    }

    fn handle_partial_derivative(&mut self, expr: &str, depth: usize) -> String {
        let args = extract_arguments(expr);
        if args.len() < 3 {
            self.warn_arity("@PART_DERIV", 3, args.len());
            return String::new();
        }
        let variable = self.parse_expression(&args[0], depth + 1);

        // Slot 2 carries the order as a bare digit string; a placeholder
        // there may defer the order to a trailing 4th argument.
        let order = if !args[1].is_empty() && args[1].chars().all(|c| c.is_ascii_digit()) {
            args[1].clone()
        } else if args[1] == "@PLACEHOLDER" && args.len() > 3 {
            self.parse_expression(&args[3], depth + 1)
        } else {
            String::new()
        };

        let function = self.parse_function_argument(&args[2], depth);

        if order.is_empty() {
            format!("\\frac{{\\partial}}{{\\partial {variable}}} {function}")
        } else {
            format!("\\frac{{\\partial^{{{order}}}}}{{\\partial {variable}^{{{order}}}}} {function}")
        }
    }

    fn handle_limit(&mut self, expr: &str, depth: usize) -> String {
        let args = extract_arguments(expr);
        if args.len() < 3 {
            self.warn_arity("@LIMIT", 3, args.len());
            return String::new();
        }
        let variable = self.parse_expression(&args[0], depth + 1);
        let approach = self.parse_expression(&args[1], depth + 1);

        let (direction, func_index) = match args[2].as_str() {
            "@LEFT_HAND" => ("^{-}", 3),
            "@RIGHT_HAND" => ("^{+}", 3),
            _ => ("", 2),
        };

        let function = match args.get(func_index) {
            Some(arg) => self.parse_function_argument(arg, depth),
            None => variable.clone(),
        };

        format!("\\lim_{{{variable} \\to {approach}{direction}}} {function}")
    }

    fn handle_prime(&mut self, expr: &str, depth: usize) -> String {
        let args = extract_arguments(expr);
        if args.is_empty() {
            self.warn_arity("@PRIME", 1, 0);
            return String::new();
        }
        let function = self.parse_expression(&args[0], depth + 1);
        let count: usize = args
            .get(1)
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(1);
        format!("{function}{}", "'".repeat(count))
    }

    fn handle_nthroot(&mut self, expr: &str, depth: usize) -> String {
        let args = extract_arguments(expr);
        if args.len() < 2 {
            self.warn_arity("@NTHROOT", 2, args.len());
            return String::new();
        }
        let order = if args[0] == "@PLACEHOLDER" {
            String::new()
        } else {
            self.parse_expression(&args[0], depth + 1)
        };
        let radicand = self.parse_expression(&args[1], depth + 1);

        if order.is_empty() || order == "2" {
            format!("\\sqrt{{{radicand}}}")
        } else {
            format!("\\sqrt[{order}]{{{radicand}}}")
        }
    }

    /// Shared shape of `@SUM` and `@PRODUCT`.
    ///
    /// The index variable and start value come from a leading `(@IS var
    /// start)` wrapper when present; otherwise arguments are read
    /// positionally, with the start value defaulting to `1`.
    fn handle_big_operator(
        &mut self,
        expr: &str,
        depth: usize,
        command: &str,
        empty_default: &str,
    ) -> String {
        let args = extract_arguments(expr);
        if args.len() < 3 {
            self.warn_arity(command, 3, args.len());
            return empty_default.to_string();
        }

        let (variable, start, upper_index) = if args[0].starts_with("(@IS") {
            let is_args = extract_arguments(&args[0]);
            if is_args.len() >= 2 {
                (
                    self.parse_expression(&is_args[0], depth + 1),
                    self.parse_expression(&is_args[1], depth + 1),
                    1,
                )
            } else {
                ("i".to_string(), "1".to_string(), 1)
            }
        } else if args.len() >= 4 {
            (
                self.parse_expression(&args[0], depth + 1),
                self.parse_expression(&args[1], depth + 1),
                2,
            )
        } else {
            (
                self.parse_expression(&args[0], depth + 1),
                "1".to_string(),
                1,
            )
        };

        let upper = self.parse_expression(&args[upper_index], depth + 1);
        let body = self.parse_expression(&args[upper_index + 1], depth + 1);
        format!("{command}_{{{variable}={start}}}^{{{upper}}} {body}")
    }

    // =========================================================================
    // Logic and unary forms
    // =========================================================================

    fn handle_not(&mut self, expr: &str, depth: usize) -> String {
        let args = extract_arguments(expr);
        match args.first() {
            Some(arg) => {
                let operand = self.parse_expression(arg, depth + 1);
                format!("\\neg {operand}")
            }
            None => {
                self.warn_arity("@NOT", 1, 0);
                String::new()
            }
        }
    }

    fn handle_negation(&mut self, expr: &str, depth: usize) -> String {
        let args = extract_arguments(expr);
        let operand = match args.first() {
            Some(arg) => self.parse_expression(arg, depth + 1),
            None => {
                self.warn_arity("@NEG", 1, 0);
                return String::new();
            }
        };
        // Compound operands keep their grouping visible
        if operand.contains(' ') || operand.contains('+') || operand.contains('-') {
            format!("-\\left({operand}\\right)")
        } else {
            format!("-{operand}")
        }
    }

    // =========================================================================
    // Function application
    // =========================================================================

    fn handle_apply(&mut self, expr: &str, depth: usize) -> String {
        let args = extract_arguments(expr);
        if args.is_empty() {
            self.warn_arity("@APPLY", 1, 0);
            return String::new();
        }
        let func_name = args[0].to_lowercase();
        let inner = match args.get(1) {
            Some(second) if second.starts_with("(@ARGS") => Some(self.handle_args(second, depth)),
            _ => None,
        };

        // abs is bar-delimited, not call syntax
        if func_name == "abs" {
            return match inner {
                Some(arg) => format!("\\left|{arg}\\right|"),
                None => "\\left|\\right|".to_string(),
            };
        }

        let latex_func = MATH_FUNCTIONS
            .get(func_name.as_str())
            .map(|f| f.to_string())
            .unwrap_or(func_name);

        match inner {
            Some(arg) => format!("{latex_func}({arg})"),
            None => latex_func,
        }
    }

    fn handle_args(&mut self, expr: &str, depth: usize) -> String {
        let args = extract_arguments(expr);
        args.iter()
            .map(|arg| self.parse_expression(arg, depth + 1))
            .collect::<Vec<_>>()
            .join(", ")
    }

    // =========================================================================
    // Units and labels
    // =========================================================================

    fn handle_scale(&mut self, expr: &str, depth: usize) -> String {
        let args = extract_arguments(expr);
        if args.len() < 2 {
            self.warn_arity("@SCALE", 2, args.len());
            return String::new();
        }
        let value = self.parse_expression(&args[0], depth + 1);
        let unit_expr = &args[1];

        if let Some(unit) = UNITS.get(unit_expr.as_str()) {
            return format!("{value}\\,{unit}");
        }

        if unit_expr.starts_with("(/") {
            // Quotient units such as m/s render as a unit fraction
            let unit_args = extract_arguments(unit_expr);
            if unit_args.len() >= 2 {
                let numerator = self.parse_expression(&unit_args[0], depth + 1);
                let denominator = self.parse_expression(&unit_args[1], depth + 1);
                return format!("{value}\\,\\frac{{{numerator}}}{{{denominator}}}");
            }
            return value;
        }

        if unit_expr.starts_with("(^") {
            let unit_args = extract_arguments(unit_expr);
            if unit_args.len() >= 2 {
                let base = match UNITS.get(unit_args[0].as_str()) {
                    Some(known) => known.to_string(),
                    None => self.parse_expression(&unit_args[0], depth + 1),
                };
                let power = self.parse_expression(&unit_args[1], depth + 1);
                return format!("{value}\\,{base}^{{{power}}}");
            }
            return value;
        }

        let unit = self.parse_expression(unit_expr, depth + 1);
        format!("{value}\\,{unit}")
    }

    fn handle_rscale(&mut self, expr: &str, depth: usize) -> String {
        let args = extract_arguments(expr);
        if args.len() < 2 {
            self.warn_arity("@RSCALE", 2, args.len());
            return String::new();
        }

        let value = if args[0].starts_with("(@PARENS") {
            let inner = extract_arguments(&args[0]);
            match inner.first() {
                Some(first) => self.parse_expression(first, depth + 1),
                None => String::new(),
            }
        } else {
            self.parse_expression(&args[0], depth + 1)
        };

        let unit = self.resolve_result_unit(&args[1], depth);
        format!("{value}\\,{unit}")
    }

    /// Resolve the unit operand of an `@RSCALE` form, usually a
    /// `(@LABEL UNIT x)` wrapper.
    fn resolve_result_unit(&mut self, unit_expr: &str, depth: usize) -> String {
        if !unit_expr.starts_with("(@LABEL") {
            return self.parse_expression(unit_expr, depth + 1);
        }
        let label_args = extract_arguments(unit_expr);
        if label_args.len() < 2 || !label_args[0].eq_ignore_ascii_case("UNIT") {
            return self.parse_expression(unit_expr, depth + 1);
        }
        let unit_name = &label_args[1];
        if let Some(unit) = UNITS.get(unit_name.as_str()) {
            return unit.to_string();
        }
        if let Some(unit) = lookup_unit_case_insensitive(unit_name) {
            return unit.to_string();
        }
        format!("\\mathrm{{{unit_name}}}")
    }

    fn handle_parens(&mut self, expr: &str, depth: usize) -> String {
        let args = extract_arguments(expr);
        match args.first() {
            Some(inner) => {
                let parsed = self.parse_expression(inner, depth + 1);
                format!("\\left({parsed}\\right)")
            }
            None => "()".to_string(),
        }
    }

    fn handle_label(&mut self, expr: &str, depth: usize) -> String {
        let args = extract_arguments(expr);
        if args.is_empty() {
            self.warn_arity("@LABEL", 2, 0);
            return String::new();
        }
        let label_type = args[0].to_uppercase();

        match label_type.as_str() {
            "CONSTANT" => {
                let value = match args.get(1) {
                    Some(v) => v,
                    None => return String::new(),
                };
                if let Some(latex) = CONSTANTS.get(value.as_str()) {
                    return latex.to_string();
                }
                if value.starts_with("(@ID") {
                    // Subscripted constants like e_c are looked up by the
                    // composed key before falling back to plain subscripting.
                    let id_args = extract_arguments(value);
                    if id_args.len() >= 2 {
                        let symbol = &id_args[0];
                        let subscript = self.parse_expression(&id_args[1], depth + 1);
                        let key =
                            format!("{symbol}_{}", subscript.replace(['\\', '{', '}'], ""));
                        if let Some(latex) = CONSTANTS.get(key.as_str()) {
                            return latex.to_string();
                        }
                        // The subscript handler already braced its output
                        return format!("{symbol}_{subscript}");
                    }
                    return value.clone();
                }
                value.clone()
            }
            "UNIT" => {
                let unit_name = match args.get(1) {
                    Some(v) => v,
                    None => return String::new(),
                };
                if let Some(unit) = UNITS.get(unit_name.as_str()) {
                    return unit.to_string();
                }
                if let Some(unit) = lookup_unit_case_insensitive(unit_name) {
                    return unit.to_string();
                }
                format!("\\mathrm{{{unit_name}}}")
            }
            "VARIABLE" => args.get(1).cloned().unwrap_or_default(),
            "FUNCTION" => match args.get(1) {
                Some(name) => format!("\\operatorname{{{name}}}"),
                None => String::new(),
            },
            _ => match args.get(1) {
                Some(payload) => self.parse_expression(payload, depth + 1),
                None => args[0].clone(),
            },
        }
    }

    // =========================================================================
    // Matrices and vectors
    // =========================================================================

    fn handle_matrix(&mut self, expr: &str, depth: usize) -> String {
        const EMPTY_MATRIX: &str = "\\begin{pmatrix} \\end{pmatrix}";

        let args = extract_arguments(expr);
        if args.len() < 3 {
            self.warn_arity("@MATRIX", 3, args.len());
            return EMPTY_MATRIX.to_string();
        }
        let rows: usize = args[0].parse().unwrap_or(0);
        let cols: usize = args[1].parse().unwrap_or(0);
        if rows == 0 || cols == 0 {
            self.warn(TranslationWarning::new(
                crate::core::mathcad2latex::WarningKind::MissingArguments,
                format!("'@MATRIX' has invalid dimensions {}x{}", args[0], args[1]),
            ));
            return EMPTY_MATRIX.to_string();
        }

        let elements = &args[2..];
        let mut latex = String::from("\\begin{pmatrix}\n");
        for row in 0..rows {
            let cells: Vec<String> = (0..cols)
                .map(|col| match elements.get(row * cols + col) {
                    Some(element) => self.parse_expression(element, depth + 1),
                    // Short element lists pad with zeros
                    None => "0".to_string(),
                })
                .collect();
            latex.push_str(&cells.join(" & "));
            if row < rows - 1 {
                latex.push_str(" \\\\\n");
            }
        }
        latex.push_str("\n\\end{pmatrix}");
        latex
    }

    // =========================================================================
    // Equations and evaluation
    // =========================================================================

    fn handle_sym_eval(&mut self, expr: &str, depth: usize) -> String {
        let args = extract_arguments(expr);
        if args.len() < 2 {
            self.warn_arity("@SYM_EVAL", 2, args.len());
            return String::new();
        }
        let left = self.parse_expression(&args[0], depth + 1);

        // Keyword stacks carry evaluation options, not content
        let right_index = if args[1].starts_with("(@KW_STACK") { 2 } else { 1 };
        let right = match args.get(right_index) {
            Some(arg) => self.parse_expression(arg, depth + 1),
            None => String::new(),
        };

        if right.is_empty() {
            left
        } else {
            format!("{left} \\rightarrow {right}")
        }
    }

    fn handle_subscript(&mut self, expr: &str, depth: usize) -> String {
        let args = extract_arguments(expr);
        match args.first() {
            Some(arg) => {
                let subscript = self.parse_expression(arg, depth + 1);
                format!("{{{subscript}}}")
            }
            None => String::new(),
        }
    }

    fn handle_id_with_subscript(&mut self, expr: &str, depth: usize) -> String {
        let identifier = match ID_HEAD.captures(expr) {
            Some(caps) => caps[1].to_string(),
            None => return expr.to_string(),
        };
        let sub_start = match expr.find("(@SUB") {
            Some(pos) => pos,
            None => return identifier,
        };
        let rest = &expr[sub_start..];
        if let Some(close) = find_matching_paren(rest, 0) {
            let sub_args = extract_arguments(&rest[..=close]);
            if let Some(first) = sub_args.first() {
                let subscript = self.parse_expression(first, depth + 1);
                return format!("{identifier}_{{{subscript}}}");
            }
        }
        identifier
    }

    /// `@EQ` renders a user-created equation. An arithmetic right-hand
    /// side is flattened positionally so evaluation output keeps its
    /// operator shape.
    fn handle_equation(&mut self, expr: &str, depth: usize) -> String {
        let args = extract_arguments(expr);
        if args.len() < 2 {
            self.warn_arity("@EQ", 2, args.len());
            return String::new();
        }
        let left = self.parse_expression(&args[0], depth + 1);
        let right_expr = &args[1];

        let right = if let Some(parts) = operator_body_parts(right_expr, '+') {
            if parts.is_empty() {
                self.parse_expression(right_expr, depth + 1)
            } else {
                self.join_parsed(&parts, depth, " + ")
            }
        } else if let Some(parts) = operator_body_parts(right_expr, '-') {
            if parts.len() == 2 {
                let minuend = self.parse_expression(&parts[0], depth + 1);
                let subtrahend = self.parse_expression(&parts[1], depth + 1);
                format!("{minuend} - {subtrahend}")
            } else {
                self.parse_expression(right_expr, depth + 1)
            }
        } else if let Some(parts) = operator_body_parts(right_expr, '*') {
            if parts.is_empty() {
                self.parse_expression(right_expr, depth + 1)
            } else {
                self.join_parsed(&parts, depth, " \\cdot ")
            }
        } else if let Some(parts) = operator_body_parts(right_expr, '/') {
            if parts.len() == 2 {
                let numerator = self.parse_expression(&parts[0], depth + 1);
                let denominator = self.parse_expression(&parts[1], depth + 1);
                format!("\\frac{{{numerator}}}{{{denominator}}}")
            } else {
                self.parse_expression(right_expr, depth + 1)
            }
        } else {
            self.parse_expression(right_expr, depth + 1)
        };

        format!("{left} = {right}")
    }

    pub(super) fn join_parsed(&mut self, parts: &[String], depth: usize, separator: &str) -> String {
        parts
            .iter()
            .map(|part| self.parse_expression(part, depth + 1))
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// Bare `(= left right)` forms split the body at the first top-level
    /// space.
    fn handle_equals(&mut self, expr: &str, depth: usize) -> String {
        let content = expr.strip_prefix("(=").unwrap_or(expr);
        let content = content.strip_suffix(')').unwrap_or(content).trim();

        let mut paren_depth: i32 = 0;
        let mut split_at = None;
        for (index, ch) in content.char_indices() {
            match ch {
                '(' => paren_depth += 1,
                ')' => paren_depth -= 1,
                ' ' if paren_depth == 0 => {
                    split_at = Some(index);
                    break;
                }
                _ => {}
            }
        }

        if let Some(position) = split_at {
            let left = self.parse_expression(&content[..position], depth + 1);
            let right = self.parse_expression(&content[position + 1..], depth + 1);
            return format!("{left} = {right}");
        }

        // Unbalanced bodies may hide the split inside a broken nest
        let mut halves = content.splitn(2, char::is_whitespace);
        if let (Some(left_raw), Some(right_raw)) = (halves.next(), halves.next()) {
            let left = self.parse_expression(left_raw, depth + 1);
            let right = self.parse_expression(right_raw, depth + 1);
            return format!("{left} = {right}");
        }

        expr.to_string()
    }
}

/// Split the body of an operator form `(<op> a b ...)` into its top-level
/// parts, or `None` when `expr` is not that operator's form.
fn operator_body_parts(expr: &str, op: char) -> Option<Vec<String>> {
    let mut prefix = String::from('(');
    prefix.push(op);
    let body = expr.strip_prefix(prefix.as_str())?;
    let body = body.strip_suffix(')').unwrap_or(body);
    Some(extract_op_arguments(body.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> String {
        Translator::new().translate(input)
    }

    #[test]
    fn test_leading_tag() {
        assert_eq!(leading_tag("(@SUM (@IS i 1) 10 i)").as_deref(), Some("@SUM"));
        assert_eq!(leading_tag("(@SUM)").as_deref(), Some("@SUM"));
        assert_eq!(leading_tag("(+ x y)"), None);
        assert_eq!(leading_tag("x"), None);
    }

    #[test]
    fn test_operator_body_parts() {
        assert_eq!(
            operator_body_parts("(+ x 1)", '+'),
            Some(vec!["x".to_string(), "1".to_string()])
        );
        assert_eq!(operator_body_parts("(+ x 1)", '*'), None);
    }

    #[test]
    fn test_arithmetic_forms() {
        assert_eq!(parse("(+ x y)"), "x + y");
        assert_eq!(parse("(- x y)"), "x - y");
        assert_eq!(parse("(* x y z)"), "x \\cdot y \\cdot z");
        assert_eq!(parse("(/ x y)"), "\\frac{x}{y}");
        assert_eq!(parse("(^ x 2)"), "{x}^{2}");
        assert_eq!(parse("(^ e x)"), "e^{x}");
    }

    #[test]
    fn test_nested_arithmetic() {
        assert_eq!(
            parse("(+ (* 2 x) (/ y z))"),
            "2 \\cdot x + \\frac{y}{z}"
        );
    }

    #[test]
    fn test_literals_and_symbols() {
        assert_eq!(parse(""), "");
        assert_eq!(parse("e"), "e");
        assert_eq!(parse("∞"), "\\infty");
        assert_eq!(parse("α"), "\\alpha");
        assert_eq!(parse("†"), "{\\dagger}");
        assert_eq!(parse("x"), "x");
    }

    #[test]
    fn test_degraded_arity() {
        assert_eq!(parse("(@INTEGRAL 0 1)"), "\\int{}");
        assert_eq!(parse("(@SUM)"), "\\sum");
        assert_eq!(parse("(@PRODUCT i)"), "");
        assert_eq!(parse("(@MATRIX 1)"), "\\begin{pmatrix} \\end{pmatrix}");
    }

    #[test]
    fn test_unknown_tag_passes_through() {
        let mut translator = Translator::new();
        let result = translator.translate_with_diagnostics("(@FRACTION α β)");
        assert_eq!(result.output, "(@FRACTION \\alpha \\beta)");
        assert!(result
            .warnings
            .iter()
            .any(|w| w.kind == crate::core::mathcad2latex::WarningKind::UnknownTag));
    }
}
