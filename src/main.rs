//! `sbom-report`: render CycloneDX SBOM JSON files as printable PDF reports.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]); usage errors exit `1`.
//! 2. Load config ([`config::load_config`]) and apply CLI overrides.
//! 3. Resolve the positional path into SBOM files ([`convert::Input`]).
//! 4. Per file: load ([`loader`]) → project components ([`projector`]) →
//!    assemble the six report sections ([`report::model`]).
//! 5. Emit the report as PDF ([`report::pdf`]), a terminal preview, or JSON.
//! 6. Exit `0`, or `1` if any file failed.

mod cli;
mod config;
mod convert;
mod error;
mod loader;
mod lookup;
mod models;
mod projector;
mod report;

use std::path::Path;
use std::process;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, ReportFormat};
use config::{load_config, Config, OnError};
use convert::{build_report, convert_to_pdf, run_batch, Input};
use error::ConvertError;

const INVALID_INPUT: &str =
    "Invalid input. Please provide a .json file or a directory containing .json files.";

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if err.use_stderr() => {
            let _ = err.print();
            process::exit(1);
        }
        Err(err) => err.exit(),
    };

    init_logging(&cli);

    match run(&cli) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(err) => {
            eprintln!("{} {:#}", "error:".red().bold(), err);
            process::exit(1);
        }
    }
}

fn init_logging(cli: &Cli) {
    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!("warn,sbom_report={}", level)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Returns `Ok(false)` when the run finished but something was rejected or skipped.
fn run(cli: &Cli) -> Result<bool> {
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(dir) = &cli.output_dir {
        config.output.dir = dir.clone();
    }
    if cli.keep_going {
        config.batch.on_error = OnError::Skip;
    }

    let input = match Input::from_path(&cli.path) {
        Ok(input) => input,
        Err(err) => {
            debug!(error = %err, "rejected input path");
            eprintln!("{}", INVALID_INPUT);
            return Ok(false);
        }
    };

    let files = input.sbom_files();
    if files.is_empty() {
        if !cli.quiet {
            eprintln!("No .json files found in {}", cli.path.display());
        }
        return Ok(true);
    }

    let pb = match &input {
        Input::Directory(_) if cli.report == ReportFormat::Pdf && !cli.quiet => {
            let pb = ProgressBar::new(files.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template(
                        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                    )?
                    .progress_chars("#>-"),
            );
            Some(pb)
        }
        _ => None,
    };

    let outcome = run_batch(&files, config.batch.on_error, |file| {
        let result = emit(cli, &config, file, pb.as_ref());
        if let Some(pb) = &pb {
            pb.inc(1);
        }
        result
    });

    if let Some(pb) = &pb {
        pb.finish_and_clear();
    }
    let outcome = outcome?;

    let skipped = outcome.failed.len();
    for (file, err) in outcome.failed {
        eprintln!(
            "{} {}: {}",
            "skipped".yellow().bold(),
            file.display(),
            describe_failure(err)
        );
    }
    if !cli.quiet && skipped > 0 {
        eprintln!("{} converted, {} skipped", outcome.succeeded, skipped);
    }

    Ok(skipped == 0)
}

/// Produce the requested output for one SBOM file.
fn emit(
    cli: &Cli,
    config: &Config,
    file: &Path,
    pb: Option<&ProgressBar>,
) -> Result<(), ConvertError> {
    match cli.report {
        ReportFormat::Pdf => {
            let pdf_path = convert_to_pdf(file, &config.output.dir, &config.layout)?;
            if !cli.quiet {
                let line = format!("Converted {} to {}", file.display(), pdf_path.display());
                match pb {
                    Some(pb) => pb.suspend(|| println!("{}", line)),
                    None => println!("{}", line),
                }
            }
        }
        ReportFormat::Terminal => {
            report::terminal::render(&build_report(file)?);
        }
        ReportFormat::Json => {
            let report = build_report(file)?;
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| ConvertError::Render(e.to_string()))?;
            println!("{}", json);
        }
    }
    Ok(())
}

/// One line with the error and its causes, as `main` prints fatal errors.
fn describe_failure(err: ConvertError) -> String {
    format!("{:#}", anyhow::Error::from(err))
}
