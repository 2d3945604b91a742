use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mealwise::config::ServiceConfig;
use mealwise::store_service::StoreService;

/// Look up store prices for the ingredients in meal notes
#[derive(Debug, Parser)]
#[command(name = "mealwise", version)]
struct Args {
    /// Notes file to read; stdin when omitted
    notes: Option<PathBuf>,

    /// Postal code to search around instead of the device position
    #[arg(long)]
    zip: Option<String>,

    /// Seed for reproducible store distances and prices
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays pure JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    info!("Starting mealwise store search");

    let notes = match &args.notes {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read notes from {}", path.display()))?,
        None => {
            let mut notes = String::new();
            io::stdin()
                .read_to_string(&mut notes)
                .context("Failed to read notes from stdin")?;
            notes
        }
    };

    let mut config = ServiceConfig::from_env();
    if let Some(seed) = args.seed {
        config.price_seed = Some(seed);
    }
    let service = StoreService::new(config);

    let result = match args.zip.as_deref() {
        Some(zip) => service.search_stores_and_prices_with_zip(&notes, zip).await,
        None => service.search_stores_and_prices(&notes).await,
    };

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
