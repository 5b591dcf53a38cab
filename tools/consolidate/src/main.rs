//! CLI tool that merges bank transaction exports into one normalized CSV file.
//!
//! Every option can be given as a flag or as an environment variable; a `.env`
//! file in the working directory is loaded first.
//!
//! # Usage
//!
//! ```bash
//! # bank1.csv, bank2.csv, bank3.csv -> combined.csv
//! consolidate
//!
//! # Custom file mapping and output date format
//! CSV_FILES_AND_PARSERS='{"a.csv":"Parser1","b.csv":"Parser3"}' \
//! TRANSACTION_TIME_TO_FORMAT='%Y-%m-%d' \
//! RUST_LOG=info consolidate
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use bankcsv::prelude::*;
use clap::Parser;
use tracing::info;

/// Consolidate bank transaction exports into a single CSV file.
///
/// Each input file is parsed with the layout assigned to it, rows are
/// normalized to `time,type,amount,to,from` and appended to the output in
/// file order. The first invalid row aborts the run.
#[derive(Parser, Debug)]
#[command(name = "consolidate")]
#[command(version, about)]
struct Args {
    /// Output file, overwritten on every run.
    #[arg(long, env = "OUTPUT_FILE_NAME", default_value = DEFAULT_OUTPUT_FILE)]
    output: PathBuf,

    /// strftime format of the output date column.
    #[arg(long, env = "TRANSACTION_TIME_TO_FORMAT", default_value = DEFAULT_OUTPUT_DATE_FORMAT)]
    date_format: String,

    /// JSON object mapping input files to layout names, in processing order.
    /// Defaults to bank1.csv, bank2.csv, bank3.csv with Parser1..Parser3.
    #[arg(long, env = "CSV_FILES_AND_PARSERS")]
    files: Option<String>,

    /// JSON object with additional layouts (name -> layout description).
    #[arg(long, env = "CUSTOM_PARSERS")]
    custom_parsers: Option<String>,

    /// Header of the date column.
    #[arg(long, env = "TRANSACTION_TIME_HEADER", default_value = "transaction_time")]
    time_header: String,

    /// Header of the type column.
    #[arg(long, env = "TRANSACTION_TYPE_HEADER", default_value = "transaction_type")]
    type_header: String,

    /// Header of the amount column.
    #[arg(long, env = "TRANSACTION_AMOUNT_HEADER", default_value = "transaction_amount")]
    amount_header: String,

    /// Header of the receiving account column.
    #[arg(long, env = "TRANSACTION_TO_HEADER", default_value = "transaction_to")]
    to_header: String,

    /// Header of the sending account column.
    #[arg(long, env = "TRANSACTION_FROM_HEADER", default_value = "transaction_from")]
    from_header: String,
}

impl Args {
    fn into_config(self) -> Result<Config> {
        let files = match &self.files {
            Some(json) => FileAssignment::from_json(json)?,
            None => FileAssignment::sample(),
        };
        let layouts = match &self.custom_parsers {
            Some(json) => LayoutRegistry::from_json(json)?,
            None => LayoutRegistry::builtin(),
        };

        Ok(Config {
            output_path: self.output,
            output_date_format: self.date_format,
            headers: Headers {
                time: self.time_header,
                tx_type: self.type_header,
                amount: self.amount_header,
                to: self.to_header,
                from: self.from_header,
            },
            files,
            layouts,
        })
    }
}

fn main() {
    // Must run before Args::parse so that clap sees the variables
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();
    let config = args.into_config().context("Failed to load configuration")?;
    let custom_layouts: Vec<_> = config.layouts.custom_names().collect();
    info!(
        files = config.files.len(),
        output = %config.output_path.display(),
        ?custom_layouts,
        "starting"
    );

    let report = Consolidator::new(&config).run().context("Consolidation failed")?;

    // Report to stderr, like the rest of the diagnostics
    eprintln!(
        "Consolidated {} record(s) from {} file(s) into {}",
        report.records,
        report.files,
        config.output_path.display()
    );

    Ok(())
}
