//! Mclax CLI - Mathcad to LaTeX expression translator

use clap::Parser;
use mclax::{
    convert_with_diagnostics, refine, translate_with_diagnostics, CliDiagnostic,
    TranslationResult, EXAMPLE_EXPRESSIONS,
};
use serde::Serialize;
use std::fs;
use std::io::{self, Read, Write};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "m2l")]
#[command(version)]
#[command(about = "Mclax - Mathcad to LaTeX expression translator", long_about = None)]
struct Cli {
    /// Input file path (reads from stdin if neither this nor -e is given)
    input_file: Option<String>,

    /// Translate an expression given directly on the command line
    #[arg(short, long)]
    expression: Option<String>,

    /// Output file path (writes to stdout if not provided)
    #[arg(short, long)]
    output: Option<String>,

    /// Skip the refinement pass
    #[arg(long)]
    no_refine: bool,

    /// Treat the input as LaTeX and run only the refinement pass
    #[arg(long)]
    refine_only: bool,

    /// Write a JSON diagnostics report to this path
    #[arg(long)]
    report: Option<String>,

    /// Use colored output for diagnostics
    #[arg(long, default_value_t = true)]
    color: bool,

    /// Print the bundled example expressions with their translations
    #[arg(long)]
    examples: bool,
}

#[derive(Serialize)]
struct ConversionReport {
    input: String,
    output: String,
    warnings: Vec<ReportWarning>,
}

#[derive(Serialize)]
struct ReportWarning {
    kind: String,
    message: String,
    location: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.examples {
        print_examples();
        return ExitCode::SUCCESS;
    }

    let input = match read_input(&cli) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };
    let input = input.trim().to_string();

    let result = if cli.refine_only {
        TranslationResult::ok(refine(&input))
    } else if cli.no_refine {
        translate_with_diagnostics(&input)
    } else {
        convert_with_diagnostics(&input)
    };

    report_diagnostics(&result, cli.color);

    if let Some(report_path) = &cli.report {
        if let Err(err) = write_report(report_path, &input, &result) {
            eprintln!("error: could not write report: {err}");
            return ExitCode::FAILURE;
        }
    }

    match write_output(cli.output.as_deref(), &result.output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn read_input(cli: &Cli) -> io::Result<String> {
    if let Some(expression) = &cli.expression {
        return Ok(expression.clone());
    }
    if let Some(path) = &cli.input_file {
        return fs::read_to_string(path);
    }
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}

fn write_output(path: Option<&str>, output: &str) -> io::Result<()> {
    match path {
        Some(file) => fs::write(file, format!("{output}\n")),
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{output}")
        }
    }
}

/// Print warnings to stderr, colored by severity when enabled.
fn report_diagnostics(result: &TranslationResult, color: bool) {
    for warning in &result.warnings {
        let diag: CliDiagnostic = warning.clone().into();
        if color {
            eprintln!("{}{}\x1b[0m", diag.color_code(), diag);
        } else {
            eprintln!("{diag}");
        }
    }
}

fn write_report(path: &str, input: &str, result: &TranslationResult) -> io::Result<()> {
    let report = ConversionReport {
        input: input.to_string(),
        output: result.output.clone(),
        warnings: result
            .warnings
            .iter()
            .map(|warning| ReportWarning {
                kind: warning.kind.to_string(),
                message: warning.message.clone(),
                location: warning.location.clone(),
            })
            .collect(),
    };
    let json = serde_json::to_string_pretty(&report)
        .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
    fs::write(path, json)
}

fn print_examples() {
    for expression in EXAMPLE_EXPRESSIONS {
        let result = convert_with_diagnostics(expression);
        println!("Mathcad: {expression}");
        println!("LaTeX:   {}", result.output);
        println!("{}", "-".repeat(20));
    }
}
