//! Car Finder main entry point
//!
//! This is the command-line interface for the Car Finder listing search.

use car_finder::config::{load_config_with_hash, Config};
use car_finder::output::{csv_file_name, print_table, write_csv};
use car_finder::{find_cars, SearchFilters};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Car Finder: a polite used-car listing finder
///
/// Searches public listing sources for used cars matching the given filters,
/// respecting robots.txt and a fixed delay between requests, and saves the
/// combined results as CSV.
#[derive(Parser, Debug)]
#[command(name = "car-finder")]
#[command(version = "1.0.0")]
#[command(about = "A polite used-car listing finder", long_about = None)]
struct Cli {
    /// Zip or city to include in the query (e.g. "Dallas, TX" or 75201)
    #[arg(long, default_value = "Dallas TX")]
    zip: String,

    /// Make (Toyota, Honda, etc.)
    #[arg(long)]
    make: Option<String>,

    /// Model (Camry, Civic, etc.)
    #[arg(long)]
    model: Option<String>,

    /// Extra free-text keywords
    #[arg(long)]
    keywords: Option<String>,

    /// Minimum price
    #[arg(long = "min_price", value_name = "INT")]
    min_price: Option<u32>,

    /// Maximum price
    #[arg(long = "max_price", value_name = "INT")]
    max_price: Option<u32>,

    /// Stop querying further sources once this many listings are collected
    /// (defaults to the configured max-results, 200)
    #[arg(long = "max_results", value_name = "INT")]
    max_results: Option<usize>,

    /// Optional SerpAPI key for broader web search results
    #[arg(long = "serpapi_key", env = "SERPAPI_API_KEY", hide_env_values = true)]
    serpapi_key: Option<String>,

    /// Path to an optional TOML configuration file
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn filters(&self) -> SearchFilters {
        SearchFilters {
            location: Some(self.zip.clone()),
            make: self.make.clone(),
            model: self.model.clone(),
            keywords: self.keywords.clone(),
            min_price: self.min_price,
            max_price: self.max_price,
            api_key: self.serpapi_key.clone(),
            max_results: self.max_results,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_configuration(cli.config.as_deref())?;
    let filters = cli.filters();

    let table = find_cars(&filters, &config).await?;

    if table.is_empty() {
        println!("No results found. Try broader keywords or add additional source scrapers.");
        return Ok(());
    }

    print_table(&table);

    let out_csv = csv_file_name(chrono::Utc::now());
    write_csv(&table, Path::new(&out_csv))?;
    println!("\nSaved {} rows to {}", table.len(), out_csv);

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so stdout only carries the result table.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("car_finder=info,warn"),
            1 => EnvFilter::new("car_finder=debug,info"),
            2 => EnvFilter::new("car_finder=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the configuration file, or the defaults when none is given
fn load_configuration(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        tracing::debug!("No configuration file given, using defaults");
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    match load_config_with_hash(path) {
        Ok((config, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            Ok(config)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            Err(e.into())
        }
    }
}
