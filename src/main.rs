// minic: lex and parse a source file, reporting the outcome

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use minic::parser::parse::Parser;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("MINIC_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let program_name = args.first().map(|s| s.as_str()).unwrap_or("minic");

    let Some(input) = args.get(1) else {
        eprintln!("Error: No input file provided");
        eprintln!();
        eprintln!("Usage: {} <file.c>", program_name);
        eprintln!();
        eprintln!("Set MINIC_LOG=trace to follow every grammar rule the parser tries.");
        return ExitCode::FAILURE;
    };

    if !Path::new(input).exists() {
        eprintln!("Error: File '{}' not found", input);
        return ExitCode::FAILURE;
    }

    let source = match fs::read_to_string(input) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: Failed to read '{}': {}", input, e);
            return ExitCode::FAILURE;
        }
    };

    eprintln!("Parsing {}...", input);
    let mut parser = match Parser::from_source(&source) {
        Ok(parser) => parser,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    match parser.parse() {
        Ok(unit) => {
            eprintln!(
                "Parsed successfully. Found {} function(s) and {} prototype(s).",
                unit.functions.len(),
                unit.prototypes.len()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
