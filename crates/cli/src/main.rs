mod render;

use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use argot_core::{Command, Input, ParseError, ParseResult};
use argot_diagnostics as diag;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::render::{Format, failure_span, print_summary, render_diagnostic_pretty};

// ── CLI definition ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "argot",
    version,
    about = "argot: match inputs against declarative command grammars"
)]
struct Cli {
    /// Output mode: "pretty" for coloured terminal output, "json" for
    /// machine-readable JSON. Defaults to "pretty" when stdout is a TTY,
    /// "json" otherwise.
    #[arg(long, global = true, value_parser = ["pretty", "json"])]
    output: Option<String>,

    /// Log analyser decisions to stderr (overrides RUST_LOG).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Parse inputs against a grammar file.
    Parse {
        /// Path to the JSON grammar.
        #[arg(long, short)]
        grammar: PathBuf,
        /// Read each input as JSON: a string, or an array of strings and
        /// `{"kind": ..., "data": ...}` units.
        #[arg(long)]
        json_input: bool,
        /// Inputs to parse. `-` reads one input per line from stdin.
        #[arg(required = true)]
        inputs: Vec<String>,
    },

    /// Validate a grammar file and print its keyword index.
    Check { file: PathBuf },

    /// Explain a diagnostic ID (e.g. ARGOT1004).
    Explain { id: String },
}

// ── Main ────────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let format = Format::resolve_or_detect(cli.output.as_deref());

    let outcome = match cli.cmd {
        Cmd::Parse {
            grammar,
            json_input,
            inputs,
        } => cmd_parse(&grammar, json_input, &inputs, format),
        Cmd::Check { file } => cmd_check(&file, format),
        Cmd::Explain { id } => cmd_explain(&id, format),
    };

    if let Err(err) = outcome {
        match format {
            Format::Json => {
                let out = serde_json::json!({
                    "success": false,
                    "error": "command_failed",
                    "message": format!("{err:#}"),
                });
                println!("{out}");
            }
            Format::Pretty => eprintln!("error: {err:#}"),
        }
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .init();
}

// ── Commands ────────────────────────────────────────────────────────────

fn cmd_parse(grammar: &Path, json_input: bool, inputs: &[String], format: Format) -> Result<()> {
    let command = load_grammar(grammar, format)?;
    let sources = collect_inputs(inputs)?;

    let mut entries = Vec::with_capacity(sources.len());
    let (mut matched, mut failed) = (0usize, 0usize);
    for source in &sources {
        let input: Input = if json_input {
            serde_json::from_str(source)
                .with_context(|| format!("input is not a JSON string or token array: {source}"))?
        } else {
            Input::Text(source.clone())
        };
        let outcome = command.analyse(input);
        let error = match &outcome {
            Ok(result) => result.error.as_ref(),
            Err(err) => Some(err),
        };
        match error {
            None => matched += 1,
            Some(_) => failed += 1,
        }

        match format {
            Format::Json => entries.push(json_entry(source, &outcome)),
            Format::Pretty => {
                if let Ok(result) = &outcome {
                    println!("{}", argot_core::to_pretty_json(result));
                }
                if let Some(err) = error {
                    let span = (!json_input)
                        .then(|| failure_span(source, err, command.separator()));
                    render_diagnostic_pretty(source, "input", &err.to_diagnostic(), span);
                }
            }
        }
    }

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
        Format::Pretty => print_summary(matched, failed),
    }

    if failed > 0 {
        process::exit(1);
    }
    Ok(())
}

fn json_entry(source: &str, outcome: &Result<ParseResult, ParseError>) -> serde_json::Value {
    match outcome {
        Ok(result) => serde_json::json!({ "input": source, "result": result }),
        Err(err) => serde_json::json!({
            "input": source,
            "result": { "matched": false, "error": err },
        }),
    }
}

fn cmd_check(file: &Path, format: Format) -> Result<()> {
    let command = load_grammar(file, format)?;
    let keywords: Vec<&str> = command.keywords().iter().collect();

    match format {
        Format::Json => {
            let out = serde_json::json!({
                "success": true,
                "name": command.name(),
                "separator": command.separator(),
                "args": command.args().len(),
                "params": command.params().len(),
                "keywords": keywords,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            use ariadne::Fmt;
            println!(
                "{} grammar `{}`: {} argument(s), {} option(s)/sub-command(s)",
                "ok".fg(ariadne::Color::Green),
                command.name(),
                command.args().len(),
                command.params().len(),
            );
            if !keywords.is_empty() {
                println!("keywords: {}", keywords.join(" "));
            }
        }
    }
    Ok(())
}

fn cmd_explain(id: &str, format: Format) -> Result<()> {
    match format {
        Format::Json => {
            let text = diag::explain(id);
            let out = serde_json::json!({
                "id": id,
                "explanation": text,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            // The explanation is the command's output, so it goes to stdout.
            if let Some(text) = diag::explain(id) {
                use ariadne::Fmt;
                println!("{}: {}", id.fg(ariadne::Color::Cyan), text);
            } else {
                println!("{}: (no explanation available)", id);
            }
        }
    }
    Ok(())
}

// ── Helpers ─────────────────────────────────────────────────────────────

/// Read and build a grammar. A grammar error is reported as a diagnostic and
/// exits with code 1; I/O errors are returned.
fn load_grammar(path: &Path, format: Format) -> Result<Command> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read grammar file '{}'", path.display()))?;
    match Command::from_json(&json) {
        Ok(command) => Ok(command),
        Err(err) => {
            let diagnostic = err.to_diagnostic();
            match format {
                Format::Json => {
                    let out = serde_json::json!({
                        "success": false,
                        "error": "invalid_grammar",
                        "diagnostic": diagnostic,
                    });
                    println!("{}", serde_json::to_string_pretty(&out)?);
                }
                Format::Pretty => {
                    render_diagnostic_pretty(&json, &path.display().to_string(), &diagnostic, None);
                }
            }
            process::exit(1);
        }
    }
}

/// Expand `-` into the non-empty lines of stdin.
fn collect_inputs(inputs: &[String]) -> Result<Vec<String>> {
    let mut out = Vec::new();
    for input in inputs {
        if input == "-" {
            for line in io::stdin().lock().lines() {
                let line = line.context("failed to read stdin")?;
                if !line.trim().is_empty() {
                    out.push(line);
                }
            }
        } else {
            out.push(input.clone());
        }
    }
    Ok(out)
}
