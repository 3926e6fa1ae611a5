use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::{Context, Result};
use clap::Parser;
use hazard_report::parse_report_with_trace;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "hazard-report",
    version,
    about = "Normalize raw model output into a hazard report"
)]
struct Cli {
    #[arg(help = "File containing raw model output (stdin when omitted)")]
    input: Option<PathBuf>,
    #[arg(long, help = "Pretty-print the report")]
    pretty: bool,
    #[arg(long, help = "Write silent coercions to stderr as JSON lines")]
    trace: bool,
    #[arg(long, help = "Exit with status 2 when the report has validation errors")]
    strict: bool,
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let raw = read_input(cli.input.as_deref())?;

    let (report, extraction, coercions) = parse_report_with_trace(&raw);
    if extraction.is_fallback() {
        tracing::warn!(source = ?extraction.source, "no parseable JSON object in input");
    }

    if cli.trace {
        for coercion in &coercions {
            eprintln!("{}", serde_json::to_string(coercion)?);
        }
    }

    let rendered = if cli.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{}", rendered);

    if cli.strict && !report.is_valid() {
        tracing::info!(errors = report.validation.errors.len(), "report failed validation");
        return Ok(ExitCode::from(2));
    }
    Ok(ExitCode::SUCCESS)
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            Ok(buf)
        }
    }
}
