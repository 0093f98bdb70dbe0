use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, error, info};

use places_enricher::app::enrich_use_case::{EnrichOptions, EnrichUseCase};
use places_enricher::config::EnricherConfig;
use places_enricher::infra::csv_output_adapter::CsvFileOutputAdapter;
use places_enricher::infra::places_http::PlacesHttpClient;
use places_enricher::observability::{self, metrics};
use places_enricher::pipeline::enrich::load_business_names;

/// Enrich a list of business names with Google Places ratings and photos.
#[derive(Parser, Debug)]
#[command(name = "places_enricher")]
#[command(about = "Look up each business in input.csv and write output.csv")]
#[command(version = "0.1.0")]
struct Cli {
    /// Input CSV (defaults to input.csv)
    #[arg(long)]
    input: Option<PathBuf>,

    /// Output CSV (defaults to output.csv)
    #[arg(long)]
    output: Option<PathBuf>,

    /// TOML config file (defaults to enricher.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = EnricherConfig::load(cli.config.as_deref())?;
    if let Some(input) = cli.input {
        config.input_path = input;
    }
    if let Some(output) = cli.output {
        config.output_path = output;
    }

    let names = load_business_names(&config.input_path, &config.name_column)
        .with_context(|| format!("Error reading '{}'", config.input_path.display()))?;

    let lookup = PlacesHttpClient::new(&config.places)?;
    let output = CsvFileOutputAdapter::new(config.output_path.clone());
    let use_case = EnrichUseCase::new(
        Box::new(lookup),
        Box::new(output),
        EnrichOptions::from_config(&config),
    );

    let summary = use_case.run(&names).await;
    info!(
        "Processed {} businesses: {} found, {} not found, {} skipped",
        summary.processed, summary.found, summary.not_found, summary.skipped
    );
    Ok(())
}

#[tokio::main]
async fn main() {
    observability::init_logging("places_enricher.log");
    let metrics_handle = match metrics::init() {
        Ok(handle) => Some(handle),
        Err(e) => {
            error!("{}", e);
            None
        }
    };

    info!("Starting script...");
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!("{:#}. Exiting.", e);
        std::process::exit(1);
    }

    if let Some(handle) = metrics_handle {
        debug!("Run metrics:\n{}", handle.render());
    }
    info!("Script finished.");
}
