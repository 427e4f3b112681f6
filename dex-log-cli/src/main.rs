//! DEX Log Reader CLI Application
//!
//! This is the command-line interface for the DEX log reader. It uses the
//! dex-log-decoder library and adds:
//! - Glob expansion of input patterns
//! - TOML configuration
//! - Optional parallel processing of files
//! - CSV / JSON export and a text summary

use anyhow::{bail, Context, Result};
use clap::Parser;
use dex_log_decoder::{BatchResult, Decoder};
use rayon::prelude::*;
use std::path::PathBuf;

mod config;
mod input;
mod report;

/// DEX Log Reader - Extract sales data from vending machine DEX logs
#[derive(Parser, Debug)]
#[command(name = "dex-log-cli")]
#[command(about = "Read DEX vending machine log files", long_about = None)]
#[command(version)]
struct Args {
    /// Input file(s) or glob pattern(s) [default: DEX-files/*.log]
    #[arg(value_name = "INPUT")]
    inputs: Vec<String>,

    /// Output CSV file [default: dex_sales_detailed.csv]
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Also write machine info as JSON
    #[arg(long, value_name = "FILE")]
    machine_info: Option<PathBuf>,

    /// Print summary information
    #[arg(long)]
    summary: bool,

    /// Sort rows by machine and slot before export
    #[arg(long)]
    sort_by_slot: bool,

    /// Process files in parallel
    #[arg(long)]
    parallel: bool,

    /// Path to configuration file (config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

/// Default CSV output path
const DEFAULT_OUTPUT: &str = "dex_sales_detailed.csv";

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    log::info!("DEX Log Reader CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using decoder library v{}", dex_log_decoder::VERSION);

    let app_config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => config::AppConfig::default(),
    };

    // Command line wins over the config file
    let inputs = if !args.inputs.is_empty() {
        args.inputs.clone()
    } else if !app_config.input.files.is_empty() {
        app_config.input.files.clone()
    } else {
        vec![input::DEFAULT_INPUT_PATTERN.to_string()]
    };
    let output = args
        .output
        .clone()
        .or(app_config.output.csv.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
    let machine_info_json = args.machine_info.clone().or(app_config.output.machine_info_json.clone());
    let summary = args.summary || app_config.output.summary;
    let sort_by_slot = args.sort_by_slot || app_config.output.sort_by_slot;

    let decoder = Decoder::with_config(app_config.decoder.clone()).context("Invalid decoder configuration")?;

    let paths = input::expand_inputs(&inputs)?;
    if paths.is_empty() {
        bail!("No DEX files found for input(s): {}", inputs.join(", "));
    }
    log::info!("Processing {} file(s)", paths.len());

    let mut batch = if args.parallel {
        process_parallel(&decoder, &paths)
    } else {
        decoder.process_multiple_files(&paths)
    };

    for failure in &batch.failures {
        log::error!("Error processing {:?}: {}", failure.path, failure.error);
    }
    log::info!("Decode statistics: {}", batch.stats);

    if batch.files_processed() == 0 {
        bail!("None of the {} input file(s) could be read", paths.len());
    }
    if batch.sales_rows.is_empty() {
        bail!("No sales data found. Check your input files and try again.");
    }

    if sort_by_slot {
        report::sort_rows(&mut batch.sales_rows);
    }

    report::write_sales_csv_file(&output, &batch.sales_rows)?;
    log::info!("Sales data saved to: {:?}", output);

    if let Some(path) = &machine_info_json {
        report::write_machine_info_json(path, &batch.machine_info)?;
        log::info!("Machine info saved to: {:?}", path);
    }

    if summary {
        let stdout = std::io::stdout();
        report::write_summary(&mut stdout.lock(), &batch.sales_rows, &batch.machine_info)
            .context("Failed to print summary")?;
    }

    log::info!(
        "Processing complete: {} records from {} machine(s)",
        batch.sales_rows.len(),
        batch.machine_info.len()
    );

    Ok(())
}

/// Decode files on the rayon pool, folding results back in input order
fn process_parallel(decoder: &Decoder, paths: &[PathBuf]) -> BatchResult {
    let results: Vec<_> = paths
        .par_iter()
        .map(|path| decoder.process_dex_file(path))
        .collect();

    let mut batch = BatchResult::new();
    for (path, result) in paths.iter().zip(results) {
        batch.record(path, result);
    }
    batch
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
