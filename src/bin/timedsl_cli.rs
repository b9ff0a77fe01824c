//! timedsl Command Line Interface
//!
//! A CLI for translating natural-language time expressions into cron
//! schedule strings.
//!
//! # Usage
//!
//! ```bash
//! # Translate an expression
//! timedsl_cli translate "every 5 minutes"
//!
//! # Dump the syntax tree
//! echo "on monday at 09:00" | timedsl_cli parse
//!
//! # Show the normalized schedule (parse + analyze, no rendering)
//! timedsl_cli check "every 2 days starting on day 10"
//!
//! # Interactive loop
//! timedsl_cli repl
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use rustyline::error::ReadlineError;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use timedsl_core::{
    normalize, parse_expression, translate, FieldSpec, FieldValue, IntervalStart, ScheduleField,
    ScheduleUnit,
};

#[derive(Parser)]
#[command(name = "timedsl_cli")]
#[command(version = "0.1.0")]
#[command(about = "Translate natural-language time expressions into cron schedules")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format: json, text, or pretty (default)
    #[arg(long, short = 'o', global = true, default_value = "pretty", value_enum)]
    format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
    Pretty,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate an expression into a cron string (full pipeline)
    Translate {
        /// Expression text (reads --file or stdin if not provided)
        expression: Option<String>,

        /// Input file (reads stdin if not provided)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Parse an expression into its syntax tree (no validation)
    Parse {
        /// Expression text (reads --file or stdin if not provided)
        expression: Option<String>,

        /// Input file (reads stdin if not provided)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Parse and analyze: show the normalized 7-record schedule
    Check {
        /// Expression text (reads --file or stdin if not provided)
        expression: Option<String>,

        /// Input file (reads stdin if not provided)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Show example expressions with their translations
    Examples,

    /// Interactive read-translate-print loop
    Repl,
}

// =============================================================================
// MAIN
// =============================================================================

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Translate { expression, file } => cmd_translate(expression, file, cli.format),
        Commands::Parse { expression, file } => cmd_parse(expression, file, cli.format),
        Commands::Check { expression, file } => cmd_check(expression, file, cli.format),
        Commands::Examples => cmd_examples(cli.format),
        Commands::Repl => cmd_repl(cli.quiet),
    };

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.format == OutputFormat::Json {
                println!(r#"{{"error": "{}"}}"#, e.replace('"', "\\\""));
            } else {
                eprintln!("{}: {}", "error".red().bold(), e);
            }
            ExitCode::FAILURE
        }
    }
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

fn cmd_translate(
    expression: Option<String>,
    file: Option<PathBuf>,
    format: OutputFormat,
) -> Result<(), String> {
    let source = read_input(expression, file)?;

    let cron = translate(&source).map_err(|e| e.to_string())?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "success": true,
                "cron": cron,
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&output)
                    .map_err(|e| format!("JSON serialization failed: {}", e))?
            );
        }
        OutputFormat::Text => println!("{}", cron),
        OutputFormat::Pretty => println!("{} {}", "OK".green().bold(), cron),
    }

    Ok(())
}

fn cmd_parse(
    expression: Option<String>,
    file: Option<PathBuf>,
    format: OutputFormat,
) -> Result<(), String> {
    let source = read_input(expression, file)?;

    let expr = parse_expression(&source).map_err(|e| e.to_string())?;

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&expr)
                    .map_err(|e| format!("JSON serialization failed: {}", e))?
            );
        }
        OutputFormat::Text | OutputFormat::Pretty => {
            println!(
                "{} Parsed {} fragment(s)",
                "OK".green(),
                expr.fragments.len()
            );
            for (i, fragment) in expr.fragments.iter().enumerate() {
                println!("  [{}] {:?}", i, fragment);
            }
        }
    }

    Ok(())
}

fn cmd_check(
    expression: Option<String>,
    file: Option<PathBuf>,
    format: OutputFormat,
) -> Result<(), String> {
    let source = read_input(expression, file)?;

    let units = normalize(&source).map_err(|e| e.to_string())?;

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&units)
                    .map_err(|e| format!("JSON serialization failed: {}", e))?
            );
        }
        OutputFormat::Text | OutputFormat::Pretty => {
            println!("{} Normalized schedule", "OK".green().bold());
            for unit in &units {
                println!("  {:<13} {}", field_label(unit), describe_spec(&unit.spec));
            }
        }
    }

    Ok(())
}

fn cmd_examples(format: OutputFormat) -> Result<(), String> {
    const EXAMPLES: &[&str] = &[
        "at 09:30",
        "at 09:30:15",
        "on monday, friday",
        "on day 1, 15",
        "in january and march",
        "in 2024",
        "every 5 minutes",
        "every hour starting at 6",
        "every 2 days starting on day 10",
        "on monday at 07:30",
    ];

    match format {
        OutputFormat::Json => {
            let mut output = Vec::new();
            for expr in EXAMPLES {
                let cron = translate(expr).map_err(|e| e.to_string())?;
                output.push(serde_json::json!({
                    "expression": expr,
                    "cron": cron,
                }));
            }
            println!(
                "{}",
                serde_json::to_string_pretty(&output)
                    .map_err(|e| format!("JSON serialization failed: {}", e))?
            );
        }
        OutputFormat::Text | OutputFormat::Pretty => {
            for expr in EXAMPLES {
                let cron = translate(expr).map_err(|e| e.to_string())?;
                println!("  {:<36} {}", expr.yellow(), cron.green());
            }
        }
    }

    Ok(())
}

fn cmd_repl(quiet: bool) -> Result<(), String> {
    let mut rl =
        rustyline::DefaultEditor::new().map_err(|e| format!("Failed to start REPL: {}", e))?;

    if !quiet {
        println!(
            "{}",
            "timedsl - type a time expression, 'quit' to exit".cyan()
        );
    }

    loop {
        match rl.readline("timedsl> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if line == "quit" || line == "exit" {
                    break;
                }
                let _ = rl.add_history_entry(line);
                match translate(line) {
                    Ok(cron) => println!("{}", cron.green()),
                    Err(e) => eprintln!("{}: {}", "error".red().bold(), e),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(format!("Readline error: {}", e)),
        }
    }

    Ok(())
}

// =============================================================================
// HELPERS
// =============================================================================

fn read_input(expression: Option<String>, file: Option<PathBuf>) -> Result<String, String> {
    if let Some(expr) = expression {
        return Ok(expr);
    }
    match file {
        Some(path) => std::fs::read_to_string(&path)
            .map_err(|e| format!("Failed to read '{}': {}", path.display(), e)),
        None => {
            // Check if stdin has data
            if atty::is(atty::Stream::Stdin) {
                return Err(
                    "No input provided. Pass an expression, use --file, or pipe input via stdin."
                        .to_string(),
                );
            }
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| format!("Failed to read stdin: {}", e))?;
            Ok(buffer)
        }
    }
}

fn field_label(unit: &ScheduleUnit) -> &'static str {
    match unit.field {
        ScheduleField::Second => "second",
        ScheduleField::Minute => "minute",
        ScheduleField::Hour => "hour",
        ScheduleField::DayOfMonth => "day-of-month",
        ScheduleField::Month => "month",
        ScheduleField::DayOfWeek => "day-of-week",
        ScheduleField::Year => "year",
    }
}

fn describe_spec(spec: &FieldSpec) -> String {
    match spec {
        FieldSpec::Unspecified => "unspecified".to_string(),
        FieldSpec::Values(values) => {
            let rendered: Vec<String> = values
                .iter()
                .map(|v| match v {
                    FieldValue::Number(n) => n.to_string(),
                    FieldValue::Month(m) => m.name().to_string(),
                    FieldValue::Weekday(d) => d.name().to_string(),
                })
                .collect();
            format!("values: {}", rendered.join(", "))
        }
        FieldSpec::Interval { step, from } => {
            let anchor = match from {
                IntervalStart::Number(n) => n.to_string(),
                IntervalStart::Month(m) => m.name().to_string(),
            };
            format!("every {} starting from {}", step, anchor)
        }
    }
}
