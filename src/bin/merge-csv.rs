use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use places_enricher::constants::BUSINESS_NAME_COLUMN;
use places_enricher::observability::{self, metrics};
use tracing::{debug, error};
use places_enricher::pipeline::merge::{merge_files, JoinMode};

/// Merge two CSV files on a shared key column.
#[derive(Parser, Debug)]
#[command(name = "merge-csv", version, about = "Merge two CSV files based on a key column")]
struct Cli {
    /// Path to the first CSV file
    file1: PathBuf,

    /// Path to the second CSV file
    file2: PathBuf,

    /// Path for the output merged CSV file
    output: PathBuf,

    /// Type of merge to perform
    #[arg(long, value_enum, default_value_t = JoinMode::Inner)]
    merge_type: JoinMode,

    /// Column to join on
    #[arg(long, default_value = BUSINESS_NAME_COLUMN)]
    key: String,
}

fn run(cli: &Cli) -> Result<()> {
    let summary = merge_files(&cli.file1, &cli.file2, &cli.output, &cli.key, cli.merge_type)?;
    println!(
        "Merged {} records from {} and {} input records",
        summary.merged_rows, summary.left_rows, summary.right_rows
    );
    println!("Merged files saved to {}", cli.output.display());
    Ok(())
}

fn main() {
    observability::init_logging("merge_csv.log");
    let metrics_handle = match metrics::init() {
        Ok(handle) => Some(handle),
        Err(e) => {
            error!("{}", e);
            None
        }
    };
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    if let Some(handle) = metrics_handle {
        debug!("Run metrics:\n{}", handle.render());
    }
}
